use serde::{Deserialize, Serialize};

use crate::document::{require, CreatePolicy, ListOrder, Record};
use crate::error::ValidationError;

/// A message left through the public "connect with us" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub message: String,
    /// The service the sender is asking about.
    pub service: String,
}

impl Record for ConnectRequest {
    const COLLECTION: &'static str = "connectRequests";
    const CREATE_POLICY: CreatePolicy = CreatePolicy::Append;
    const ORDER: ListOrder = ListOrder::NewestFirst;

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("message", &self.message)
    }
}
