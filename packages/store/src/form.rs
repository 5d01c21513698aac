//! Draft form state and the edit session overlay.

use crate::list_state::RowKey;
use crate::models::User;

/// The user being typed into the form, plus the confirmation field and the
/// "form submitted" validation flag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserForm {
    pub draft: User,
    pub confirm_password: String,
    pub submitted: bool,
}

impl UserForm {
    pub fn passwords_match(&self) -> bool {
        self.draft.password == self.confirm_password
    }

    /// Empty draft, empty confirmation, validation flag cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Active edit of one row: which row, and the record as it was when editing
/// started. The draft itself lives in [`UserForm`].
#[derive(Clone, Debug, PartialEq)]
pub struct EditSession {
    pub index: usize,
    pub key: RowKey,
    pub original: User,
}

impl EditSession {
    /// Merge the draft over the original record, keeping its persisted id.
    pub fn merge(&self, draft: &User) -> User {
        User {
            id: self.original.id.clone(),
            ..draft.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_state::ListState;

    #[test]
    fn test_reset_clears_everything() {
        let mut form = UserForm {
            draft: User {
                name: "Ann".to_string(),
                password: "p".to_string(),
                ..User::default()
            },
            confirm_password: "p".to_string(),
            submitted: true,
        };
        assert!(form.passwords_match());

        form.reset();
        assert_eq!(form, UserForm::default());
    }

    #[test]
    fn test_merge_keeps_original_id() {
        let original = User {
            id: Some("u1".to_string()),
            name: "Ann".to_string(),
            ..User::default()
        };
        let session = EditSession {
            index: 0,
            key: ListState::new().append(original.clone()),
            original,
        };
        let draft = User {
            id: Some("forged".to_string()),
            name: "Anna".to_string(),
            ..User::default()
        };

        let merged = session.merge(&draft);
        assert_eq!(merged.id.as_deref(), Some("u1"));
        assert_eq!(merged.name, "Anna");
    }
}
