// ABOUTME: Case note service: appends immutable notes to an owned case
// ABOUTME: Notes are attributed to the caller's display name

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

use super::{Storage, blank};
use crate::entities::case_note;
use crate::error::{AppError, Result};

impl Storage {
    pub async fn add_note(
        &self,
        owner: Uuid,
        case_id: Uuid,
        content: &str,
        created_by: &str,
    ) -> Result<case_note::Model> {
        let case = self.find_owned_case(owner, case_id).await?;

        if blank(content) {
            return Err(AppError::Validation("Note content is required".to_string()));
        }

        let note = case_note::ActiveModel {
            id: Set(Uuid::new_v4()),
            case_id: Set(case.id),
            content: Set(content.to_string()),
            created_by: Set(created_by.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(note)
    }
}
