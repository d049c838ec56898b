// ABOUTME: Case record service scoped to the owning user
// ABOUTME: Generates case numbers, links new cases to clients by name and applies typed patches

use chrono::{Datelike, Utc};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::{Storage, blank, clients};
use crate::entities::{case, case_document, case_note};
use crate::error::{AppError, Result};
use crate::types::{CasePatch, NewCase};

const CASE_NUMBER_PREFIX: &str = "CS";
const CASE_NUMBER_ATTEMPTS: usize = 5;

/// `CS-<year>-<NNN>` with a random three digit suffix.
pub fn draw_case_number(year: i32) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("{}-{}-{:03}", CASE_NUMBER_PREFIX, year, suffix)
}

impl Storage {
    pub async fn list_cases(&self, owner: Uuid) -> Result<Vec<case::Model>> {
        Ok(case::Entity::find()
            .filter(case::Column::UserId.eq(owner))
            .order_by_desc(case::Column::StartDate)
            .all(&self.db)
            .await?)
    }

    pub async fn find_owned_case(&self, owner: Uuid, case_id: Uuid) -> Result<case::Model> {
        case::Entity::find_by_id(case_id)
            .filter(case::Column::UserId.eq(owner))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Case not found".to_string()))
    }

    /// The case with its notes and documents, newest first.
    pub async fn get_case_detail(
        &self,
        owner: Uuid,
        case_id: Uuid,
    ) -> Result<(case::Model, Vec<case_note::Model>, Vec<case_document::Model>)> {
        let case = self.find_owned_case(owner, case_id).await?;

        let notes = case_note::Entity::find()
            .filter(case_note::Column::CaseId.eq(case.id))
            .order_by_desc(case_note::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let documents = case_document::Entity::find()
            .filter(case_document::Column::CaseId.eq(case.id))
            .order_by_desc(case_document::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok((case, notes, documents))
    }

    pub async fn create_case(&self, owner: Uuid, new: NewCase) -> Result<case::Model> {
        if blank(&new.title) || blank(&new.client_name) {
            return Err(AppError::Validation(
                "Title and client name are required".to_string(),
            ));
        }

        let case_number = self.unused_case_number(owner, Utc::now().year()).await?;
        let client_name = new.client_name.trim().to_string();

        // Linking, insert and counter bump land together or not at all
        let txn = self.db.begin().await?;
        let client_id = clients::match_client_by_name(&txn, owner, &client_name).await?;

        let case = case::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner),
            client_id: Set(client_id),
            case_number: Set(case_number),
            title: Set(new.title.trim().to_string()),
            client_name: Set(client_name),
            status: Set(new.status.unwrap_or_default()),
            case_type: Set(new.case_type.unwrap_or_default()),
            start_date: Set(new.start_date.unwrap_or_else(Utc::now)),
            priority: Set(new.priority.unwrap_or_default()),
            next_hearing: Set(new.next_hearing),
            value: Set(new.value.unwrap_or(0.0)),
        }
        .insert(&txn)
        .await?;

        match client_id {
            Some(client_id) => clients::bump_case_count(&txn, client_id).await?,
            None => tracing::debug!(client_name = %case.client_name, "No client matches case client name"),
        }
        txn.commit().await?;

        tracing::info!(case_id = %case.id, case_number = %case.case_number, "Case created");
        Ok(case)
    }

    /// Draws case numbers until one is not yet used by this owner. After a few
    /// collisions the last draw is accepted as is.
    async fn unused_case_number(&self, owner: Uuid, year: i32) -> Result<String> {
        let mut candidate = draw_case_number(year);
        for _ in 1..CASE_NUMBER_ATTEMPTS {
            let taken = case::Entity::find()
                .filter(case::Column::UserId.eq(owner))
                .filter(case::Column::CaseNumber.eq(candidate.as_str()))
                .count(&self.db)
                .await?;
            if taken == 0 {
                break;
            }
            candidate = draw_case_number(year);
        }
        Ok(candidate)
    }

    pub async fn update_case(&self, owner: Uuid, case_id: Uuid, patch: CasePatch) -> Result<case::Model> {
        let existing = self.find_owned_case(owner, case_id).await?;
        let mut case: case::ActiveModel = existing.clone().into();

        if let Some(title) = patch.title {
            case.title = Set(title);
        }
        if let Some(client_name) = patch.client_name {
            case.client_name = Set(client_name);
        }
        if let Some(status) = patch.status {
            case.status = Set(status);
        }
        if let Some(case_type) = patch.case_type {
            case.case_type = Set(case_type);
        }
        if let Some(start_date) = patch.start_date {
            case.start_date = Set(start_date);
        }
        if let Some(priority) = patch.priority {
            case.priority = Set(priority);
        }
        if let Some(next_hearing) = patch.next_hearing {
            case.next_hearing = Set(next_hearing);
        }
        if let Some(value) = patch.value {
            case.value = Set(value);
        }

        if !case.is_changed() {
            return Ok(existing);
        }

        Ok(case.update(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_number_shape() {
        for _ in 0..50 {
            let number = draw_case_number(2025);
            assert!(number.starts_with("CS-2025-"));
            let suffix = &number["CS-2025-".len()..];
            assert_eq!(suffix.len(), 3);
            assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
