use serde::{Deserialize, Serialize};

use crate::document::{require, CreatePolicy, ListOrder, Record};
use crate::error::ValidationError;

/// An application submitted against a job posting from the public site.
///
/// Only the resume's file name is mirrored; the file itself stays in the
/// store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobApplication {
    pub job_id: String,
    pub job_title: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub cover_letter: String,
    pub resume_name: String,
}

impl Record for JobApplication {
    const COLLECTION: &'static str = "jobApplications";
    const CREATE_POLICY: CreatePolicy = CreatePolicy::Append;
    const ORDER: ListOrder = ListOrder::NewestFirst;

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)
    }
}
