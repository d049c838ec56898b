// ABOUTME: Case entity for matters handled on behalf of a client
// ABOUTME: Keeps a denormalized client name alongside status, priority and value

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum CaseStatus {
    #[default]
    #[sea_orm(string_value = "Open")]
    Open,
    #[serde(rename = "In Progress")]
    #[sea_orm(string_value = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    #[sea_orm(string_value = "On Hold")]
    OnHold,
    #[sea_orm(string_value = "Closed")]
    Closed,
}

impl CaseStatus {
    /// Open and in-progress cases count as active work.
    pub fn is_active(self) -> bool {
        matches!(self, CaseStatus::Open | CaseStatus::InProgress)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum CaseType {
    #[default]
    #[sea_orm(string_value = "Civil")]
    Civil,
    #[sea_orm(string_value = "Criminal")]
    Criminal,
    #[sea_orm(string_value = "Corporate")]
    Corporate,
    #[sea_orm(string_value = "Family")]
    Family,
    #[sea_orm(string_value = "Other")]
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Priority {
    #[sea_orm(string_value = "High")]
    High,
    #[default]
    #[sea_orm(string_value = "Medium")]
    Medium,
    #[sea_orm(string_value = "Low")]
    Low,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Option<Uuid>,
    pub case_number: String,
    pub title: String,
    pub client_name: String, // Copy of the client's name at creation, not a reference
    pub status: CaseStatus,
    pub case_type: CaseType,
    pub start_date: DateTimeUtc,
    pub priority: Priority,
    pub next_hearing: Option<DateTimeUtc>,
    pub value: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::case_note::Entity")]
    Notes,
    #[sea_orm(has_many = "super::case_document::Entity")]
    Documents,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::case_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notes.def()
    }
}

impl Related<super::case_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
