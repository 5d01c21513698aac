use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::StoreError;
use crate::models::{Experience, ExperienceRef, User};
use crate::remote::{Operation, RemoteStore};

/// In-memory RemoteStore for tests and offline demos.
///
/// Assigns `u{n}` / `e{n}` identifiers, keeps users with raw experience
/// references only, records every call and can be told to fail selected
/// operations.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    experiences: Vec<Experience>,
    next_user: u64,
    next_experience: u64,
    failing: HashSet<Operation>,
    calls: Vec<Operation>,
}

impl Inner {
    fn user_id(&mut self) -> String {
        self.next_user += 1;
        format!("u{}", self.next_user)
    }

    fn experience_id(&mut self) -> String {
        self.next_experience += 1;
        format!("e{}", self.next_experience)
    }

    fn enter(&mut self, op: Operation) -> Result<(), StoreError> {
        self.calls.push(op);
        if self.failing.contains(&op) {
            return Err(StoreError::Network(format!("{op:?} unavailable")));
        }
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed users. Missing ids are assigned.
    pub fn with_users(self, users: impl IntoIterator<Item = User>) -> Self {
        {
            let mut inner = self.lock();
            for mut user in users {
                if user.id.is_none() {
                    user.id = Some(inner.user_id());
                }
                let user = user.with_raw_references();
                inner.users.push(user);
            }
        }
        self
    }

    /// Seed experiences. Missing ids are assigned.
    pub fn with_experiences(self, experiences: impl IntoIterator<Item = Experience>) -> Self {
        {
            let mut inner = self.lock();
            for mut exp in experiences {
                if exp.id.is_none() {
                    exp.id = Some(inner.experience_id());
                }
                inner.experiences.push(exp);
            }
        }
        self
    }

    /// The next created user gets `u{n}`.
    pub fn starting_user_id(self, n: u64) -> Self {
        self.lock().next_user = n.saturating_sub(1);
        self
    }

    /// Make every following call of `op` fail with a network error.
    pub fn fail(&self, op: Operation) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: Operation) {
        self.lock().failing.remove(&op);
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.lock().calls.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RemoteStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut inner = self.lock();
        inner.enter(Operation::ListUsers)?;
        Ok(inner.users.clone())
    }

    async fn create_user(&self, user: &User) -> Result<User, StoreError> {
        let mut inner = self.lock();
        inner.enter(Operation::CreateUser)?;
        let mut stored = user.with_raw_references();
        stored.id = Some(inner.user_id());
        inner.users.push(stored.clone());
        Ok(stored)
    }

    async fn update_user(&self, user: &User) -> Result<User, StoreError> {
        let mut inner = self.lock();
        inner.enter(Operation::UpdateUser)?;
        let id = user.id.as_deref().ok_or(StoreError::MissingId)?;
        let slot = inner
            .users
            .iter_mut()
            .find(|u| u.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))?;
        *slot = user.with_raw_references();
        Ok(slot.clone())
    }

    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.enter(Operation::DeleteUser)?;
        let before = inner.users.len();
        inner.users.retain(|u| u.id.as_deref() != Some(id));
        if inner.users.len() == before {
            return Err(StoreError::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    async fn get_experience(&self, id: &str) -> Result<Experience, StoreError> {
        let mut inner = self.lock();
        inner.enter(Operation::GetExperience)?;
        inner
            .experiences
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("experience {id}")))
    }

    async fn list_experiences(&self) -> Result<Vec<Experience>, StoreError> {
        let mut inner = self.lock();
        inner.enter(Operation::ListExperiences)?;
        Ok(inner.experiences.clone())
    }

    async fn list_experiences_for(&self, user_id: &str) -> Result<Vec<Experience>, StoreError> {
        let mut inner = self.lock();
        inner.enter(Operation::ListExperiencesFor)?;
        Ok(inner
            .experiences
            .iter()
            .filter(|e| e.involves(user_id))
            .cloned()
            .collect())
    }

    async fn create_experience(&self, experience: &Experience) -> Result<Experience, StoreError> {
        let mut inner = self.lock();
        inner.enter(Operation::CreateExperience)?;
        let mut stored = experience.clone();
        stored.id = Some(inner.experience_id());
        inner.experiences.push(stored.clone());
        Ok(stored)
    }

    async fn add_experience_to_user(
        &self,
        user_id: &str,
        experience_id: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.enter(Operation::AddExperienceToUser)?;
        if !inner
            .experiences
            .iter()
            .any(|e| e.id.as_deref() == Some(experience_id))
        {
            return Err(StoreError::NotFound(format!("experience {experience_id}")));
        }
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id.as_deref() == Some(user_id))
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))?;
        if !user
            .experiences
            .iter()
            .any(|slot| slot.id() == Some(experience_id))
        {
            user.experiences
                .push(ExperienceRef::Unresolved(experience_id.to_string()));
        }
        Ok(())
    }

    async fn delete_experience(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.enter(Operation::DeleteExperience)?;
        let before = inner.experiences.len();
        inner.experiences.retain(|e| e.id.as_deref() != Some(id));
        if inner.experiences.len() == before {
            return Err(StoreError::NotFound(format!("experience {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> User {
        User {
            name: "Ann".to_string(),
            mail: "a@x.co".to_string(),
            password: "p".to_string(),
            ..User::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let store = MemoryStore::new().starting_user_id(9);

        let created = store.create_user(&ann()).await.unwrap();
        assert_eq!(created.id.as_deref(), Some("u9"));
        assert_eq!(created.name, "Ann");

        let second = store.create_user(&ann()).await.unwrap();
        assert_eq!(second.id.as_deref(), Some("u10"));
        assert_eq!(store.list_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_users_are_stored_with_raw_references() {
        let store = MemoryStore::new();
        let user = User {
            experiences: vec![Experience::new("e1").with_field("title", "X").into()],
            ..ann()
        };

        store.create_user(&user).await.unwrap();

        let listed = store.list_users().await.unwrap();
        assert_eq!(
            listed[0].experiences,
            vec![ExperienceRef::Unresolved("e1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let store = MemoryStore::new().with_users([ann()]);

        assert_eq!(store.update_user(&ann()).await, Err(StoreError::MissingId));

        let mut stored = store.list_users().await.unwrap().remove(0);
        stored.comment = "hello".to_string();
        let echoed = store.update_user(&stored).await.unwrap();
        assert_eq!(echoed.comment, "hello");
        assert_eq!(store.users()[0].comment, "hello");
    }

    #[tokio::test]
    async fn test_delete_user() {
        let store = MemoryStore::new().with_users([ann()]);

        store.delete_user("u1").await.unwrap();
        assert!(store.users().is_empty());
        assert!(matches!(
            store.delete_user("u1").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_experience_lifecycle() {
        let store = MemoryStore::new().with_users([ann()]);

        let exp = store
            .create_experience(&Experience::default().with_field("owner", "u1"))
            .await
            .unwrap();
        let exp_id = exp.id.clone().unwrap();
        assert_eq!(exp_id, "e1");

        store.add_experience_to_user("u1", &exp_id).await.unwrap();
        store.add_experience_to_user("u1", &exp_id).await.unwrap();
        assert_eq!(store.users()[0].experiences.len(), 1);

        assert_eq!(store.get_experience("e1").await.unwrap(), exp);
        assert_eq!(store.list_experiences_for("u1").await.unwrap().len(), 1);
        assert!(store.list_experiences_for("u2").await.unwrap().is_empty());

        store.delete_experience("e1").await.unwrap();
        assert!(store.list_experiences().await.unwrap().is_empty());
        assert!(matches!(
            store.get_experience("e1").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fault_injection_and_call_log() {
        let store = MemoryStore::new();
        store.fail(Operation::ListUsers);

        assert!(matches!(
            store.list_users().await,
            Err(StoreError::Network(_))
        ));

        store.recover(Operation::ListUsers);
        assert!(store.list_users().await.unwrap().is_empty());
        assert_eq!(store.calls(), vec![Operation::ListUsers, Operation::ListUsers]);
    }
}
