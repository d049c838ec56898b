// ABOUTME: Client record service scoped to the owning user
// ABOUTME: Lists, creates, patches and idempotently deletes clients, and maintains case counters

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{Storage, blank};
use crate::entities::client::{self, ClientStatus};
use crate::error::{AppError, Result, conflict_or_db};
use crate::types::{ClientPatch, NewClient};

impl Storage {
    pub async fn list_clients(&self, owner: Uuid) -> Result<Vec<client::Model>> {
        Ok(client::Entity::find()
            .filter(client::Column::UserId.eq(owner))
            .order_by_desc(client::Column::LastContact)
            .all(&self.db)
            .await?)
    }

    pub async fn count_clients(&self, owner: Uuid) -> Result<u64> {
        Ok(client::Entity::find()
            .filter(client::Column::UserId.eq(owner))
            .count(&self.db)
            .await?)
    }

    pub async fn create_client(&self, owner: Uuid, new: NewClient) -> Result<client::Model> {
        if blank(&new.name) || blank(&new.email) || blank(&new.phone) {
            return Err(AppError::Validation(
                "Name, email and phone are required".to_string(),
            ));
        }

        let client = client::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner),
            name: Set(new.name.trim().to_string()),
            email: Set(new.email.trim().to_string()),
            phone: Set(new.phone.trim().to_string()),
            status: Set(new.status.unwrap_or_default()),
            last_contact: Set(new.last_contact.unwrap_or_else(Utc::now)),
            case_count: Set(0),
        };

        let client = client
            .insert(&self.db)
            .await
            .map_err(|err| conflict_or_db(err, "client"))?;

        tracing::info!(client_id = %client.id, "Client created");
        Ok(client)
    }

    async fn find_owned_client(&self, owner: Uuid, client_id: Uuid) -> Result<client::Model> {
        client::Entity::find_by_id(client_id)
            .filter(client::Column::UserId.eq(owner))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))
    }

    pub async fn update_client(
        &self,
        owner: Uuid,
        client_id: Uuid,
        patch: ClientPatch,
    ) -> Result<client::Model> {
        let existing = self.find_owned_client(owner, client_id).await?;
        let mut client: client::ActiveModel = existing.clone().into();

        if let Some(name) = patch.name {
            client.name = Set(name);
        }
        if let Some(email) = patch.email {
            client.email = Set(email);
        }
        if let Some(phone) = patch.phone {
            client.phone = Set(phone);
        }
        if let Some(status) = patch.status {
            client.status = Set(status);
        }
        if let Some(last_contact) = patch.last_contact {
            client.last_contact = Set(last_contact);
        }

        if !client.is_changed() {
            return Ok(existing);
        }

        client
            .update(&self.db)
            .await
            .map_err(|err| conflict_or_db(err, "client"))
    }

    /// Removes the client if the caller owns it. Missing ids are not an error,
    /// and the client's cases stay in place.
    pub async fn delete_client(&self, owner: Uuid, client_id: Uuid) -> Result<u64> {
        let result = client::Entity::delete_many()
            .filter(client::Column::Id.eq(client_id))
            .filter(client::Column::UserId.eq(owner))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            tracing::debug!(%client_id, "Delete matched no client");
        } else {
            tracing::info!(%client_id, "Client deleted");
        }
        Ok(result.rows_affected)
    }
}

/// Bumps the case counter of a client and marks it Active. The increment is
/// evaluated by the database, not read-modify-write.
pub(super) async fn bump_case_count<C: ConnectionTrait>(db: &C, client_id: Uuid) -> Result<()> {
    client::Entity::update_many()
        .col_expr(
            client::Column::CaseCount,
            Expr::col(client::Column::CaseCount).add(1),
        )
        .col_expr(
            client::Column::Status,
            Expr::value(ClientStatus::Active.to_value()),
        )
        .filter(client::Column::Id.eq(client_id))
        .exec(db)
        .await?;

    Ok(())
}

/// First client of `owner` whose name equals `client_name` exactly.
pub(super) async fn match_client_by_name<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    client_name: &str,
) -> Result<Option<Uuid>> {
    Ok(client::Entity::find()
        .filter(client::Column::UserId.eq(owner))
        .filter(client::Column::Name.eq(client_name))
        .one(db)
        .await?
        .map(|client| client.id))
}
