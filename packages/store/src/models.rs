//! # Records exchanged with the remote store
//!
//! These types mirror the JSON documents served by the REST API, so they are
//! `Serialize + Deserialize` with the API's field names (`_id`, `experiencies`).
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`User`] | A user record. `id` is `None` until the store has assigned one. |
//! | [`Experience`] | An experience record. Only the id is interpreted; every other field is kept as opaque JSON. |
//! | [`ExperienceRef`] | One slot of a user's experience list: a raw id, the resolved record, or a failed resolution. |
//!
//! On the wire a slot is either a string (raw id) or an object (resolved
//! record). Outgoing slots are always written as the id when one is known, so
//! the store only ever receives references.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A user record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier, absent until first persisted.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mail: String,
    #[serde(default)]
    pub password: String,
    /// Free-text biography.
    #[serde(default)]
    pub comment: String,
    #[serde(rename = "experiencies", default)]
    pub experiences: Vec<ExperienceRef>,
}

impl User {
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// True once every experience slot holds a resolved record.
    pub fn is_hydrated(&self) -> bool {
        self.experiences
            .iter()
            .all(|slot| matches!(slot, ExperienceRef::Resolved(_)))
    }

    /// Copy of this user with every slot turned back into a raw id.
    pub fn with_raw_references(&self) -> User {
        User {
            experiences: self
                .experiences
                .iter()
                .map(|slot| match slot.id() {
                    Some(id) => ExperienceRef::Unresolved(id.to_string()),
                    None => slot.clone(),
                })
                .collect(),
            ..self.clone()
        }
    }
}

/// An experience record. Descriptive fields are carried but not interpreted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Experience {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            fields: Map::new(),
        }
    }

    /// Builder method to set a descriptive field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Whether `user_id` is the owner or one of the participants.
    pub fn involves(&self, user_id: &str) -> bool {
        ["owner", "participant", "participants"]
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .any(|value| match value {
                Value::String(s) => s == user_id,
                Value::Array(items) => items.iter().any(|v| v.as_str() == Some(user_id)),
                _ => false,
            })
    }
}

/// One entry of [`User::experiences`].
#[derive(Clone, Debug, PartialEq)]
pub enum ExperienceRef {
    /// Raw identifier as delivered by the store.
    Unresolved(String),
    /// Hydrated record.
    Resolved(Experience),
    /// Fetching the record failed; the id is kept for display and retries.
    Failed { id: String, reason: String },
}

impl ExperienceRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Unresolved(id) | Self::Failed { id, .. } => Some(id),
            Self::Resolved(exp) => exp.id.as_deref(),
        }
    }

    pub fn as_resolved(&self) -> Option<&Experience> {
        match self {
            Self::Resolved(exp) => Some(exp),
            _ => None,
        }
    }
}

impl From<Experience> for ExperienceRef {
    fn from(exp: Experience) -> Self {
        Self::Resolved(exp)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireRef {
    Id(String),
    Record(Experience),
}

impl<'de> Deserialize<'de> for ExperienceRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match WireRef::deserialize(deserializer)? {
            WireRef::Id(id) => Self::Unresolved(id),
            WireRef::Record(exp) => Self::Resolved(exp),
        })
    }
}

impl Serialize for ExperienceRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Resolved(exp) if exp.id.is_none() => exp.serialize(serializer),
            _ => serializer.serialize_str(self.id().unwrap_or_default()),
        }
    }
}
