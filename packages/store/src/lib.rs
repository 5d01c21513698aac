pub mod config;
pub mod error;
pub mod form;
pub mod list_state;
pub mod manager;
pub mod models;
pub mod prompt;
pub mod remote;
pub mod resolver;

mod memory;
pub use memory::MemoryStore;

pub use config::{DraftPolicy, UsersConfig};
pub use error::{StoreError, UsersError};
pub use form::{EditSession, UserForm};
pub use list_state::{ListState, Row, RowFlags, RowKey, Toggle};
pub use manager::{DeleteOutcome, DeleteRequest, SubmitRequest, UserManager};
pub use models::{Experience, ExperienceRef, User};
pub use prompt::Prompt;
pub use remote::{Operation, RemoteStore};
pub use resolver::{SlotJob, SlotOutcome};
