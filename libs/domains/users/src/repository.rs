use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, User, UserRole};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user; the email must be unique
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>>;

    /// Users holding `role`, ordered by id
    async fn list_by_role(&self, role: UserRole) -> UserResult<Vec<User>>;
}

/// In-memory implementation for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<i32, User>>>,
    next_id: Arc<RwLock<i32>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.email_id.eq_ignore_ascii_case(&input.email_id))
        {
            return Err(UserError::DuplicateEmail(input.email_id));
        }

        let mut next_id = self.next_id.write().await;
        *next_id += 1;

        let user = User {
            id: *next_id,
            first_name: input.first_name,
            last_name: input.last_name,
            email_id: input.email_id,
            phone_no: input.phone_no,
            address: input.address,
            role: input.role,
            created_at: chrono::Utc::now(),
        };
        users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, role = %user.role, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn list_by_role(&self, role: UserRole) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().filter(|u| u.role == role).cloned().collect();
        result.sort_by_key(|u| u.id);
        Ok(result)
    }
}
