//! # List state: the authoritative in-memory user list
//!
//! [`ListState`] owns the ordered users shown by the view together with three
//! per-row display flags (details expanded, biography expanded, password
//! visible). Each flag set lives inside its [`Row`], so inserting or removing a
//! user always moves its flags with it and the four sequences cannot drift
//! apart.
//!
//! Rows also carry a [`RowKey`]: a handle that stays valid while indices shift.
//! Hydration outcomes and remote completions address rows by key, so a fetch
//! finishing after a deletion simply finds nothing to update.
//!
//! Nothing here talks to the remote store. Callers mutate the list only after
//! the corresponding remote call has succeeded.

use crate::error::UsersError;
use crate::models::User;
use crate::resolver::{self, SlotJob, SlotOutcome};

/// Stable local handle for a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(u64);

/// Per-row display flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowFlags {
    pub expanded: bool,
    pub biography: bool,
    pub password: bool,
}

/// Which flag [`ListState::toggle`] flips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    Details,
    Biography,
    Password,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub key: RowKey,
    pub user: User,
    pub flags: RowFlags,
}

#[derive(Clone, Debug, Default)]
pub struct ListState {
    rows: Vec<Row>,
    next_key: u64,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_key(&mut self) -> RowKey {
        self.next_key += 1;
        RowKey(self.next_key)
    }

    fn check(&self, index: usize) -> Result<(), UsersError> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(UsersError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            })
        }
    }

    /// Replace the whole list. Flags start cleared. Returns the hydration jobs
    /// for every unresolved experience reference.
    pub fn load(&mut self, users: Vec<User>) -> Vec<SlotJob> {
        self.rows.clear();
        let mut jobs = Vec::new();
        for user in users {
            let key = self.mint_key();
            jobs.extend(resolver::jobs_for(key, &user));
            self.rows.push(Row {
                key,
                user,
                flags: RowFlags::default(),
            });
        }
        jobs
    }

    pub fn append(&mut self, user: User) -> RowKey {
        let key = self.mint_key();
        self.rows.push(Row {
            key,
            user,
            flags: RowFlags::default(),
        });
        key
    }

    /// Overwrite the user at `index`, keeping its flags and, when `user` has
    /// none, its persisted id.
    pub fn replace_at(&mut self, index: usize, mut user: User) -> Result<(), UsersError> {
        self.check(index)?;
        let row = &mut self.rows[index];
        if user.id.is_none() {
            user.id = row.user.id.take();
        }
        row.user = user;
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<User, UsersError> {
        self.check(index)?;
        Ok(self.rows.remove(index).user)
    }

    pub fn toggle(&mut self, kind: Toggle, index: usize) -> Result<bool, UsersError> {
        self.check(index)?;
        let flags = &mut self.rows[index].flags;
        let flag = match kind {
            Toggle::Details => &mut flags.expanded,
            Toggle::Biography => &mut flags.biography,
            Toggle::Password => &mut flags.password,
        };
        *flag = !*flag;
        Ok(*flag)
    }

    pub fn set_expanded(&mut self, index: usize, expanded: bool) -> Result<(), UsersError> {
        self.check(index)?;
        self.rows[index].flags.expanded = expanded;
        Ok(())
    }

    /// Write one resolver outcome into its slot. Returns `false` when the row
    /// or the slot no longer exists.
    pub fn apply(&mut self, outcome: SlotOutcome) -> bool {
        let Some(row) = self.rows.iter_mut().find(|r| r.key == outcome.key) else {
            return false;
        };
        match row.user.experiences.get_mut(outcome.slot) {
            Some(slot) => {
                *slot = outcome.value;
                true
            }
            None => false,
        }
    }

    pub fn index_of(&self, key: RowKey) -> Option<usize> {
        self.rows.iter().position(|r| r.key == key)
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.rows.iter().map(|r| &r.user)
    }

    pub fn expanded(&self) -> Vec<bool> {
        self.rows.iter().map(|r| r.flags.expanded).collect()
    }

    pub fn biography_expanded(&self) -> Vec<bool> {
        self.rows.iter().map(|r| r.flags.biography).collect()
    }

    pub fn password_visible(&self) -> Vec<bool> {
        self.rows.iter().map(|r| r.flags.password).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Experience, ExperienceRef};

    fn user(name: &str, id: Option<&str>) -> User {
        User {
            id: id.map(str::to_string),
            name: name.to_string(),
            ..User::default()
        }
    }

    fn assert_aligned(list: &ListState) {
        let n = list.users().count();
        assert_eq!(list.expanded().len(), n);
        assert_eq!(list.biography_expanded().len(), n);
        assert_eq!(list.password_visible().len(), n);
        assert_eq!(list.len(), n);
    }

    #[test]
    fn test_sequences_stay_aligned() {
        let mut list = ListState::new();
        list.load(vec![user("a", Some("u1")), user("b", Some("u2"))]);
        assert_aligned(&list);

        // deterministic mix of appends and removals from different positions
        for step in 0..40usize {
            if step % 3 == 2 && !list.is_empty() {
                let index = (step * 7) % list.len();
                list.remove_at(index).unwrap();
            } else {
                list.append(user(&format!("n{step}"), None));
            }
            assert_aligned(&list);
        }

        while !list.is_empty() {
            list.remove_at(0).unwrap();
            assert_aligned(&list);
        }
    }

    #[test]
    fn test_load_resets_flags_and_collects_jobs() {
        let mut list = ListState::new();
        list.append(user("old", Some("u0")));
        list.toggle(Toggle::Details, 0).unwrap();

        let with_refs = User {
            experiences: vec![
                ExperienceRef::Unresolved("e1".to_string()),
                Experience::new("e2").into(),
                ExperienceRef::Unresolved("e3".to_string()),
            ],
            ..user("a", Some("u1"))
        };
        let jobs = list.load(vec![with_refs, user("b", Some("u2"))]);

        assert_eq!(list.len(), 2);
        assert_eq!(list.expanded(), vec![false, false]);
        let slots: Vec<_> = jobs.iter().map(|j| (j.slot, j.id.as_str())).collect();
        assert_eq!(slots, vec![(0, "e1"), (2, "e3")]);
    }

    #[test]
    fn test_flags_follow_their_row() {
        let mut list = ListState::new();
        list.load(vec![user("a", Some("u1")), user("b", Some("u2")), user("c", Some("u3"))]);
        list.toggle(Toggle::Password, 2).unwrap();
        list.toggle(Toggle::Biography, 1).unwrap();

        list.remove_at(0).unwrap();

        assert_eq!(list.biography_expanded(), vec![true, false]);
        assert_eq!(list.password_visible(), vec![false, true]);
    }

    #[test]
    fn test_toggle_flips() {
        let mut list = ListState::new();
        list.append(user("a", None));
        assert!(list.toggle(Toggle::Details, 0).unwrap());
        assert!(!list.toggle(Toggle::Details, 0).unwrap());
        assert_eq!(list.rows()[0].flags, RowFlags::default());
    }

    #[test]
    fn test_replace_keeps_persisted_id() {
        let mut list = ListState::new();
        list.append(user("a", Some("u1")));
        list.set_expanded(0, true).unwrap();

        list.replace_at(0, user("renamed", None)).unwrap();

        let row = list.get(0).unwrap();
        assert_eq!(row.user.name, "renamed");
        assert_eq!(row.user.id.as_deref(), Some("u1"));
        assert!(row.flags.expanded);
    }

    #[test]
    fn test_out_of_range() {
        let mut list = ListState::new();
        list.append(user("a", None));

        let err = UsersError::IndexOutOfRange { index: 3, len: 1 };
        assert_eq!(list.remove_at(3), Err(err.clone()));
        assert_eq!(list.replace_at(3, user("x", None)), Err(err.clone()));
        assert_eq!(list.toggle(Toggle::Biography, 3), Err(err));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_apply_targets_key_not_index() {
        let mut list = ListState::new();
        let refs = |id: &str| User {
            experiences: vec![ExperienceRef::Unresolved(id.to_string())],
            ..User::default()
        };
        let jobs = list.load(vec![refs("e1"), refs("e2")]);

        list.remove_at(0).unwrap();

        let stale = SlotOutcome {
            key: jobs[0].key,
            slot: 0,
            value: Experience::new("e1").into(),
        };
        assert!(!list.apply(stale));

        let live = SlotOutcome {
            key: jobs[1].key,
            slot: 0,
            value: Experience::new("e2").into(),
        };
        assert!(list.apply(live));
        assert!(list.get(0).unwrap().user.is_hydrated());
    }
}
