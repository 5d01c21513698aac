//! # Reference resolver: experience hydration
//!
//! A freshly loaded user carries its experiences as raw identifiers. The
//! resolver turns each [`ExperienceRef::Unresolved`] slot into a [`SlotJob`];
//! running a job fetches that one experience and yields a [`SlotOutcome`] that
//! [`crate::ListState::apply`] writes back into the same slot.
//!
//! Jobs are independent: they may complete in any order, a failure never blocks
//! or rolls back a sibling, and nothing is retried or deduplicated. A failed
//! fetch becomes [`ExperienceRef::Failed`] so the view can show it.

use futures::stream::{FuturesUnordered, Stream};

use crate::list_state::RowKey;
use crate::models::{ExperienceRef, User};
use crate::remote::RemoteStore;

/// Fetch of one experience slot of one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotJob {
    pub key: RowKey,
    pub slot: usize,
    pub id: String,
}

/// Result of a [`SlotJob`], addressed to the slot it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotOutcome {
    pub key: RowKey,
    pub slot: usize,
    pub value: ExperienceRef,
}

/// One job per unresolved slot of `user`.
pub fn jobs_for(key: RowKey, user: &User) -> Vec<SlotJob> {
    user.experiences
        .iter()
        .enumerate()
        .filter_map(|(slot, r)| match r {
            ExperienceRef::Unresolved(id) => Some(SlotJob {
                key,
                slot,
                id: id.clone(),
            }),
            _ => None,
        })
        .collect()
}

impl SlotJob {
    pub async fn run<S: RemoteStore>(self, store: &S) -> SlotOutcome {
        let value = match store.get_experience(&self.id).await {
            Ok(experience) => ExperienceRef::Resolved(experience),
            Err(e) => {
                tracing::warn!("Failed to resolve experience {}: {}", self.id, e);
                ExperienceRef::Failed {
                    id: self.id,
                    reason: e.to_string(),
                }
            }
        };
        SlotOutcome {
            key: self.key,
            slot: self.slot,
            value,
        }
    }
}

/// Run every job concurrently; outcomes arrive in completion order.
pub fn hydrate<'a, S: RemoteStore>(
    store: &'a S,
    jobs: Vec<SlotJob>,
) -> impl Stream<Item = SlotOutcome> + 'a {
    jobs.into_iter()
        .map(|job| job.run(store))
        .collect::<FuturesUnordered<_>>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_state::ListState;
    use crate::memory::MemoryStore;
    use crate::models::Experience;
    use futures::StreamExt;

    fn with_refs(ids: &[&str]) -> User {
        User {
            id: Some("u1".to_string()),
            name: "Ann".to_string(),
            experiences: ids
                .iter()
                .map(|id| ExperienceRef::Unresolved(id.to_string()))
                .collect(),
            ..User::default()
        }
    }

    #[tokio::test]
    async fn test_completion_order_does_not_move_slots() {
        let store = MemoryStore::new().with_experiences([
            Experience::new("idA").with_field("title", "A"),
            Experience::new("idB").with_field("title", "B"),
        ]);
        let mut list = ListState::new();
        let jobs = list.load(vec![with_refs(&["idA", "idB"])]);

        let mut outcomes = Vec::new();
        for job in jobs {
            outcomes.push(job.run(&store).await);
        }

        // apply idA first, then the reverse, on two copies of the list
        let mut reversed = list.clone();
        for outcome in outcomes.iter().cloned() {
            assert!(list.apply(outcome));
        }
        for outcome in outcomes.into_iter().rev() {
            assert!(reversed.apply(outcome));
        }

        for state in [&list, &reversed] {
            let user = &state.get(0).unwrap().user;
            assert_eq!(user.experiences[0].id(), Some("idA"));
            assert_eq!(user.experiences[1].id(), Some("idB"));
            assert!(user.is_hydrated());
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_is_observable_and_isolated() {
        let store = MemoryStore::new().with_experiences([Experience::new("e1")]);
        let mut list = ListState::new();
        let jobs = list.load(vec![with_refs(&["missing", "e1"])]);

        let outcomes: Vec<_> = hydrate(&store, jobs).collect().await;
        assert_eq!(outcomes.len(), 2);
        for outcome in outcomes {
            list.apply(outcome);
        }

        let user = &list.get(0).unwrap().user;
        assert!(matches!(
            &user.experiences[0],
            ExperienceRef::Failed { id, .. } if id == "missing"
        ));
        assert_eq!(user.experiences[1], Experience::new("e1").into());
    }

    #[tokio::test]
    async fn test_repeated_ids_are_fetched_each_time() {
        let store = MemoryStore::new().with_experiences([Experience::new("e1")]);
        let jobs = jobs_for(ListState::new().append(User::default()), &with_refs(&["e1", "e1"]));
        assert_eq!(jobs.len(), 2);

        let outcomes: Vec<_> = hydrate(&store, jobs).collect().await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(store.calls().len(), 2);
    }
}
