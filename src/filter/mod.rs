//! Filters - derive the visible subset of a mirror.
//!
//! Views are always recomputed from `(mirror, predicate)`; nothing here keeps
//! state or writes back to the mirror.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::document::{Document, Record};

/// The "show everything" selection.
pub const ALL: &str = "All";

/// What the operator selected in the filter bar.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Predicate {
    #[default]
    All,
    /// Documents whose record tags contain this tag.
    Tag(String),
    /// Documents whose serialized field `name` equals `value`.
    Field { name: String, value: Value },
}

impl Predicate {
    /// Map a filter-bar selection to a predicate: `"All"` or a tag name.
    pub fn from_selection(selection: &str) -> Self {
        if selection == ALL {
            Predicate::All
        } else {
            Predicate::Tag(selection.to_string())
        }
    }

    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Field {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn matches<R: Record>(&self, doc: &Document<R>) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Tag(tag) => doc.fields.tags().iter().any(|t| t == tag),
            Predicate::Field { name, value } => match serde_json::to_value(&doc.fields) {
                Ok(Value::Object(fields)) => fields.get(name) == Some(value),
                _ => false,
            },
        }
    }
}

/// The documents of `mirror` matching `predicate`, in mirror order.
pub fn filtered<R: Record>(mirror: &[Document<R>], predicate: &Predicate) -> Vec<Document<R>> {
    match predicate {
        Predicate::All => mirror.to_vec(),
        _ => mirror
            .iter()
            .filter(|doc| predicate.matches(doc))
            .cloned()
            .collect(),
    }
}

/// Distinct tags present in the mirror, sorted.
pub fn available_tags<R: Record>(mirror: &[Document<R>]) -> Vec<String> {
    mirror
        .iter()
        .flat_map(|doc| doc.fields.tags().iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of documents matching `predicate`, without cloning them.
pub fn count<R: Record>(mirror: &[Document<R>], predicate: &Predicate) -> usize {
    mirror.iter().filter(|doc| predicate.matches(doc)).count()
}
