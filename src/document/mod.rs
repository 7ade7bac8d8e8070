//! Documents - records mirrored from the document store.
//!
//! The store speaks untyped [`StoredDocument`]s: an id, a JSON object of
//! fields, and the timestamps the store stamped at write time. Each
//! collection describes its editable field set as a [`Record`]; a
//! [`Document<R>`] is a stored document decoded into that record.
//!
//! ## Example
//!
//! ```ignore
//! use admin_sync::{CreatePolicy, Record, ValidationError};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase", default)]
//! struct Note {
//!     title: String,
//! }
//!
//! impl Record for Note {
//!     const COLLECTION: &'static str = "notes";
//!     const CREATE_POLICY: CreatePolicy = CreatePolicy::Append;
//!
//!     fn validate(&self) -> Result<(), ValidationError> {
//!         admin_sync::require("title", &self.title)
//!     }
//! }
//! ```

mod record;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use record::{require, CreatePolicy, ListOrder, Record};

/// Field name to value mapping, as exchanged with the store.
pub type Fields = Map<String, Value>;

/// Keys the store owns. They are never accepted from a client payload.
pub const RESERVED_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// A document exactly as the store hands it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            updated_at: None,
            fields,
        }
    }
}

/// Remove store-owned keys from a client payload.
pub fn strip_reserved(fields: &mut Fields) {
    for key in RESERVED_FIELDS {
        fields.remove(key);
    }
}

/// A stored document decoded into its collection's record type.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<R> {
    pub id: String,
    pub fields: R,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<R: Record> Document<R> {
    /// Decode a stored document. Missing fields fall back to the record's
    /// defaults; fields of the wrong type fail the decode.
    pub fn decode(stored: StoredDocument) -> Result<Self, serde_json::Error> {
        let fields = R::from_fields(stored.fields)?;
        Ok(Document {
            id: stored.id,
            fields,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}
