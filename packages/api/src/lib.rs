//! # API crate: REST gateway for the users view
//!
//! This crate connects the users view to the backend that stores users and
//! experiences. It provides [`HttpStore`], the [`store::RemoteStore`]
//! implementation used by the web frontend.
//!
//! ## Endpoints
//!
//! Paths are relative to [`store::config::RemoteConfig::base_url`]; the two
//! resource segments come from the same config section.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `list_users` | `GET {base}/{users}` |
//! | `create_user` | `POST {base}/{users}` |
//! | `update_user` | `PUT {base}/{users}/{id}` |
//! | `delete_user` | `DELETE {base}/{users}/{id}` |
//! | `list_experiences` | `GET {base}/{experiences}` |
//! | `get_experience` | `GET {base}/{experiences}/{id}` |
//! | `list_experiences_for` | `GET {base}/{experiences}?participant={id}&owner={id}` |
//! | `create_experience` | `POST {base}/{experiences}` |
//! | `add_experience_to_user` | `PUT {base}/{users}/{id}/addExperience` with `{"experienceId": ...}` |
//! | `delete_experience` | `DELETE {base}/{experiences}/{id}` |
//!
//! Transport failures map to [`store::StoreError::Network`], non-2xx answers to
//! [`store::StoreError::Status`] (404 to [`store::StoreError::NotFound`]) and
//! undecodable bodies to [`store::StoreError::Decode`].

mod http;

pub use http::HttpStore;
pub use store::{Experience, StoreError, User};
