// ABOUTME: User account persistence: registration, lookup, profile and password updates
// ABOUTME: Email uniqueness is checked up front and backed by a unique index

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{Storage, blank};
use crate::entities::user::{self, Role};
use crate::error::{AppError, Result};

impl Storage {
    pub async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<user::Model> {
        if self.find_user_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let user = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.trim().to_string()),
            email: Set(email.trim().to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(Role::Lawyer),
            created_at: Set(Utc::now()),
        };

        // A concurrent registration can still slip past the check above.
        user.insert(&self.db).await.map_err(|err| match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("User already exists".to_string())
            }
            _ => AppError::Database(err),
        })
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email.trim()))
            .one(&self.db)
            .await?)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<user::Model> {
        user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update_user_name(&self, user_id: Uuid, name: &str) -> Result<user::Model> {
        if blank(name) {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let mut user: user::ActiveModel = self.get_user(user_id).await?.into();
        user.name = Set(name.trim().to_string());
        Ok(user.update(&self.db).await?)
    }

    pub async fn set_password_hash(&self, user_id: Uuid, password_hash: &str) -> Result<()> {
        let mut user: user::ActiveModel = self.get_user(user_id).await?.into();
        user.password_hash = Set(password_hash.to_string());
        user.update(&self.db).await?;
        Ok(())
    }
}
