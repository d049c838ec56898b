// ABOUTME: Type definitions for API requests, responses and partial-update patches
// ABOUTME: Wire names are camelCase and every record exposes its key as `id`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::entities::case::{CaseStatus, CaseType, Priority};
use crate::entities::case_document::DocumentKind;
use crate::entities::client::ClientStatus;
use crate::entities::user::Role;
use crate::entities::{case, case_document, case_note, client, user};

/// Distinguishes an absent field from an explicit `null`, so a patch can clear
/// nullable columns.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// Account types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<user::Model> for ProfileResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current: String,
    #[serde(default, rename = "new")]
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// Client types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub status: Option<ClientStatus>,
    pub last_contact: Option<DateTime<Utc>>,
}

/// Fields a client update may touch. The case counter is derived and is not
/// patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<ClientStatus>,
    pub last_contact: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub patch: ClientPatch,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdParam {
    pub id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: ClientStatus,
    pub last_contact: DateTime<Utc>,
    pub case_count: i32,
}

impl From<client::Model> for ClientResponse {
    fn from(client: client::Model) -> Self {
        Self {
            id: client.id,
            name: client.name,
            email: client.email,
            phone: client.phone,
            status: client.status,
            last_contact: client.last_contact,
            case_count: client.case_count,
        }
    }
}

// Case types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCase {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub client_name: String,
    pub status: Option<CaseStatus>,
    #[serde(rename = "type")]
    pub case_type: Option<CaseType>,
    pub start_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub next_hearing: Option<DateTime<Utc>>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasePatch {
    pub title: Option<String>,
    pub client_name: Option<String>,
    pub status: Option<CaseStatus>,
    #[serde(rename = "type")]
    pub case_type: Option<CaseType>,
    pub start_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "double_option")]
    pub next_hearing: Option<Option<DateTime<Utc>>>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    pub id: Uuid,
    pub case_number: String,
    pub title: String,
    pub client_name: String,
    pub status: CaseStatus,
    #[serde(rename = "type")]
    pub case_type: CaseType,
    pub start_date: DateTime<Utc>,
    pub priority: Priority,
    pub next_hearing: Option<DateTime<Utc>>,
    pub value: f64,
}

impl From<case::Model> for CaseSummary {
    fn from(case: case::Model) -> Self {
        Self {
            id: case.id,
            case_number: case.case_number,
            title: case.title,
            client_name: case.client_name,
            status: case.status,
            case_type: case.case_type,
            start_date: case.start_date,
            priority: case.priority,
            next_hearing: case.next_hearing,
            value: case.value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetail {
    #[serde(flatten)]
    pub case: CaseSummary,
    pub notes: Vec<NoteResponse>,
    pub documents: Vec<DocumentResponse>,
}

// Note and document types
#[derive(Debug, Serialize, Deserialize)]
pub struct NewNoteRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub content: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<case_note::Model> for NoteResponse {
    fn from(note: case_note::Model) -> Self {
        Self {
            id: note.id,
            content: note.content,
            created_by: note.created_by,
            created_at: note.created_at,
        }
    }
}

/// Metadata-only document, used for invoices rendered by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "invoice_kind")]
    pub kind: DocumentKind,
    #[serde(default)]
    pub size: String,
}

fn invoice_kind() -> DocumentKind {
    DocumentKind::Invoice
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub size: String,
    pub url: Option<String>,
    pub public_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<case_document::Model> for DocumentResponse {
    fn from(doc: case_document::Model) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            kind: doc.kind,
            size: doc.size,
            url: doc.url,
            public_id: doc.public_id,
            created_by: doc.created_by,
            created_at: doc.created_at,
        }
    }
}

// Dashboard types
/// Monthly case count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountPoint {
    pub name: String,
    pub value: u64,
}

/// Monthly revenue total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub active_cases: u64,
    pub total_clients: u64,
    pub pending_actions: u64,
    #[serde(rename = "revenueYTD")]
    pub revenue_ytd: f64,
    pub monthly_data: Vec<CountPoint>,
    pub revenue_data: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearingsResponse {
    pub today: Vec<CaseSummary>,
    pub upcoming: Vec<CaseSummary>,
}
