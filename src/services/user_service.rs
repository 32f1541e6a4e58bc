use sqlx::PgPool;
use tracing::info;

use crate::api::{ResourceCollection, UserResource};
use crate::auth::hash_password;
use crate::database::models::User;
use crate::database::query_builder::{execute, insert_returning_id};
use crate::database::{ChangeSet, DatabaseError, Repository};
use crate::filter::{FilterData, SqlParam};
use crate::validation::{UserStoreRequest, UserUpdateRequest};

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn users(&self) -> Repository<User> {
        Repository::new(User::TABLE, self.pool.clone())
    }

    /// Every live user, unpaginated
    pub async fn list(&self) -> Result<ResourceCollection<UserResource>, DatabaseError> {
        let users = self
            .users()
            .select_any(FilterData { order: Some("id asc".to_string()), ..Default::default() })
            .await?;
        Ok(UserResource::collection(&users))
    }

    pub async fn show(&self, id: i64) -> Result<UserResource, DatabaseError> {
        let user = self.users().select_404(id).await?;
        Ok(UserResource::make(&user))
    }

    pub async fn create(&self, request: UserStoreRequest) -> Result<UserResource, DatabaseError> {
        let mut changes = ChangeSet::new();
        changes
            .set("name", SqlParam::text(request.name))
            .set("email", SqlParam::text(request.email))
            .set("password", SqlParam::text(hash_password(&request.password)?));

        let mut tx = self.pool.begin().await?;
        let id = insert_returning_id(&mut *tx, &changes.to_insert_sql(User::TABLE)?).await?;
        tx.commit().await?;

        info!("Created user {}", id);
        self.show(id).await
    }

    pub async fn update(&self, request: UserUpdateRequest) -> Result<UserResource, DatabaseError> {
        let mut changes = ChangeSet::new();
        if let Some(name) = request.name {
            changes.set("name", SqlParam::text(name));
        }
        if let Some(email) = request.email {
            changes.set("email", SqlParam::text(email));
        }
        if let Some(password) = request.password {
            changes.set("password", SqlParam::text(hash_password(&password)?));
        }

        let mut tx = self.pool.begin().await?;
        let affected = execute(&mut *tx, &changes.to_update_sql(User::TABLE, request.id)?).await?;
        if affected == 0 {
            return Err(not_found(request.id));
        }
        tx.commit().await?;

        info!("Updated user {}", request.id);
        self.show(request.id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let affected = execute(&mut *tx, &ChangeSet::soft_delete_sql(User::TABLE, id)?).await?;
        if affected == 0 {
            return Err(not_found(id));
        }
        tx.commit().await?;

        info!("Soft-deleted user {}", id);
        Ok(())
    }
}

fn not_found(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("No query results for {} {}", User::TABLE, id))
}
