//! # Remote store gateway
//!
//! [`RemoteStore`] is the async interface to the service that persists users and
//! experiences and assigns their identifiers. The users view never touches the
//! network directly; everything goes through this trait, so the same
//! orchestration runs against the REST API (`api::HttpStore`) or against
//! [`crate::MemoryStore`] in tests.
//!
//! Futures are not required to be `Send`: in the browser every call runs on the
//! single UI thread.

use std::future::Future;

use crate::error::StoreError;
use crate::models::{Experience, User};

/// Every call a [`RemoteStore`] serves. Used for call logs and fault injection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    ListUsers,
    CreateUser,
    UpdateUser,
    DeleteUser,
    GetExperience,
    ListExperiences,
    ListExperiencesFor,
    CreateExperience,
    AddExperienceToUser,
    DeleteExperience,
}

/// Async CRUD interface for user and experience records.
pub trait RemoteStore {
    /// All users, with experiences as raw identifiers.
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, StoreError>>;

    /// Persist a new user; the result carries the assigned identifier.
    fn create_user(&self, user: &User) -> impl Future<Output = Result<User, StoreError>>;

    /// Overwrite a stored user. Fails with [`StoreError::MissingId`] when `user.id` is `None`.
    fn update_user(&self, user: &User) -> impl Future<Output = Result<User, StoreError>>;

    fn delete_user(&self, id: &str) -> impl Future<Output = Result<(), StoreError>>;

    fn get_experience(&self, id: &str) -> impl Future<Output = Result<Experience, StoreError>>;

    fn list_experiences(&self) -> impl Future<Output = Result<Vec<Experience>, StoreError>>;

    /// Experiences the user owns or participates in.
    fn list_experiences_for(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Experience>, StoreError>>;

    fn create_experience(
        &self,
        experience: &Experience,
    ) -> impl Future<Output = Result<Experience, StoreError>>;

    /// Append `experience_id` to the user's experience list on the store side.
    fn add_experience_to_user(
        &self,
        user_id: &str,
        experience_id: &str,
    ) -> impl Future<Output = Result<(), StoreError>>;

    fn delete_experience(&self, id: &str) -> impl Future<Output = Result<(), StoreError>>;
}
