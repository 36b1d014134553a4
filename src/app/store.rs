//! User repository.

use std::sync::{Mutex, PoisonError};

use super::models::{User, UserCreate};

/// Storage for users. Handlers only see this trait, so the in-memory
/// implementation can be replaced without touching them.
pub trait UserRepository: Send + Sync {
    /// Stores a user and returns it with its assigned id.
    fn add(&self, new: UserCreate) -> User;

    /// All users in insertion order.
    fn list(&self) -> Vec<User>;
}

/// Process-lifetime store. Ids start at 1 and follow insertion order.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryUserRepository {
    fn add(&self, new: UserCreate) -> User {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        let user = User {
            id: users.len() as u64 + 1,
            email: new.email,
            full_name: new.full_name,
            is_admin: new.is_admin,
        };
        users.push(user.clone());
        user
    }

    fn list(&self) -> Vec<User> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_insertion_order() {
        let repo = MemoryUserRepository::new();
        for name in ["Ada Lovelace", "Alan Turing"] {
            repo.add(UserCreate {
                email: "x@example.com".to_owned(),
                full_name: name.to_owned(),
                is_admin: false,
            });
        }
        let users = repo.list();
        assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), [1, 2]);
        assert_eq!(users[1].full_name, "Alan Turing");
    }
}
