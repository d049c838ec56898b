// ABOUTME: Case document service for uploaded files and metadata-only invoices
// ABOUTME: Deletion walks back to the parent case so only its owner can remove a document

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};
use uuid::Uuid;

use super::{Storage, blank};
use crate::entities::case_document::{self, DocumentKind};
use crate::error::{AppError, Result};

/// A document ready to be recorded against a case.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub size: String,
    pub url: Option<String>,
    pub public_id: Option<String>,
}

impl Storage {
    /// Records a document. The caller is expected to have checked case
    /// ownership before doing any upload work.
    pub async fn record_document(
        &self,
        case_id: Uuid,
        doc: NewDocument,
        created_by: &str,
    ) -> Result<case_document::Model> {
        if blank(&doc.name) || blank(&doc.size) {
            return Err(AppError::Validation(
                "Document name and size are required".to_string(),
            ));
        }

        let document = case_document::ActiveModel {
            id: Set(Uuid::new_v4()),
            case_id: Set(case_id),
            name: Set(doc.name),
            kind: Set(doc.kind),
            size: Set(doc.size),
            url: Set(doc.url),
            public_id: Set(doc.public_id),
            created_by: Set(created_by.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(document_id = %document.id, %case_id, kind = ?document.kind, "Document recorded");
        Ok(document)
    }

    /// Deletes a document whose parent case belongs to `owner`. Documents under
    /// other users' cases are reported as not found.
    pub async fn delete_document(&self, owner: Uuid, document_id: Uuid) -> Result<case_document::Model> {
        let document = case_document::Entity::find_by_id(document_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

        self.find_owned_case(owner, document.case_id)
            .await
            .map_err(|err| match err {
                AppError::NotFound(_) => AppError::NotFound("Document not found".to_string()),
                other => other,
            })?;

        document.clone().delete(&self.db).await?;
        tracing::info!(%document_id, "Document deleted");
        Ok(document)
    }
}
