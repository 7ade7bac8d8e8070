use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{Document, Fields};
use crate::error::{SyncError, ValidationError};

/// How a controller reconciles its mirror after a successful create.
///
/// The policy is fixed per record type. Mixing local inserts and refetches on
/// one collection is how duplicate entries appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatePolicy {
    /// Insert the returned id and draft at the end of the mirror.
    Append,
    /// Insert the returned id and draft at the front of the mirror.
    Prepend,
    /// Replace the mirror with a full refresh.
    Refetch,
}

/// Order applied to a freshly fetched snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Whatever order the store returned.
    Store,
    /// Descending `created_at`; documents without a timestamp go last.
    NewestFirst,
}

impl ListOrder {
    pub fn apply<R>(self, docs: &mut [Document<R>]) {
        match self {
            ListOrder::Store => {}
            ListOrder::NewestFirst => docs.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
    }
}

/// The editable field set of one collection.
///
/// A record doubles as the form draft: `id` and timestamps live on
/// [`Document`], never on the record.
pub trait Record:
    Serialize + DeserializeOwned + Clone + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
    /// Collection name in the store (e.g. `"blogs"`).
    const COLLECTION: &'static str;

    /// Mirror reconciliation after create.
    const CREATE_POLICY: CreatePolicy;

    /// Ordering applied to every refreshed snapshot.
    const ORDER: ListOrder = ListOrder::Store;

    /// Reject the record if a required field is empty.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Drop blank rows from list-typed fields.
    fn strip_empty(&mut self) {}

    /// Give empty list-typed fields a single blank row so a form always has
    /// one input to render.
    fn fill_placeholders(&mut self) {}

    /// Tags used by the tag filter.
    fn tags(&self) -> &[String] {
        &[]
    }

    /// Serialize into store fields.
    fn to_fields(&self) -> Result<Fields, SyncError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(other) => Err(SyncError::Encode {
                collection: Self::COLLECTION,
                message: format!("expected an object, got {}", other),
            }),
            Err(err) => Err(SyncError::Encode {
                collection: Self::COLLECTION,
                message: err.to_string(),
            }),
        }
    }

    /// Deserialize from store fields.
    fn from_fields(fields: Fields) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(fields))
    }
}

/// Fails with [`ValidationError::MissingField`] when `value` is blank.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}
