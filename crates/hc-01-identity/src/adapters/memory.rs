//! In-memory user and profile store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{CareError, CareResult, Role, UserId};

use crate::domain::{normalize_email, Profile, User};
use crate::ports::UserRepository;

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    profiles: HashMap<UserId, Profile>,
    by_email: HashMap<String, UserId>,
}

/// User table keyed by id with a unique email index.
#[derive(Default)]
pub struct InMemoryUserRepository {
    tables: RwLock<Tables>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User, profile: Profile) -> CareResult<()> {
        let mut tables = self.tables.write();
        let key = normalize_email(&user.email);
        if tables.by_email.contains_key(&key) {
            return Err(CareError::conflict(format!("email {} is already registered", key)));
        }
        tables.by_email.insert(key, user.id);
        tables.profiles.insert(user.id, profile);
        tables.users.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> CareResult<Option<User>> {
        Ok(self.tables.read().users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> CareResult<Option<User>> {
        let tables = self.tables.read();
        Ok(tables
            .by_email
            .get(&normalize_email(email))
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn get_profile(&self, user_id: UserId) -> CareResult<Option<Profile>> {
        Ok(self.tables.read().profiles.get(&user_id).cloned())
    }

    async fn save(&self, user: User, profile: Profile) -> CareResult<()> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&user.id) {
            return Err(CareError::not_found("user", user.id));
        }
        tables.profiles.insert(user.id, profile);
        tables.users.insert(user.id, user);
        Ok(())
    }

    async fn set_approved(&self, user_id: UserId, approved: bool) -> CareResult<User> {
        let mut tables = self.tables.write();
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| CareError::not_found("user", user_id))?;
        user.approved = approved;
        Ok(user.clone())
    }

    async fn list(&self, role: Option<Role>, approved: Option<bool>) -> CareResult<Vec<User>> {
        let tables = self.tables.read();
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .filter(|u| approved.map_or(true, |a| u.approved == a))
            .cloned()
            .collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users)
    }
}
