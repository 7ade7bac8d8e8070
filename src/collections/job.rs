use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ensure_row, remove_row, strip_blank};
use crate::controller::ListSync;
use crate::document::{require, CreatePolicy, Document, ListOrder, Record};
use crate::error::{SyncError, ValidationError};
use crate::store::{DocumentStore, StoreError};

/// A job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    pub title: String,
    pub experience: String,
    pub description: String,
    pub link: String,
    pub salary: String,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    /// Visible on the public careers page.
    pub is_active: bool,
}

impl Default for Job {
    fn default() -> Self {
        Self {
            title: String::new(),
            experience: String::new(),
            description: String::new(),
            link: String::new(),
            salary: String::new(),
            skills: Vec::new(),
            education: Vec::new(),
            is_active: true,
        }
    }
}

impl Job {
    pub fn add_skill_row(&mut self) {
        self.skills.push(String::new());
    }

    pub fn remove_skill_row(&mut self, index: usize) {
        remove_row(&mut self.skills, index);
    }

    pub fn add_education_row(&mut self) {
        self.education.push(String::new());
    }

    pub fn remove_education_row(&mut self, index: usize) {
        remove_row(&mut self.education, index);
    }
}

impl Record for Job {
    const COLLECTION: &'static str = "jobs";
    const CREATE_POLICY: CreatePolicy = CreatePolicy::Prepend;
    const ORDER: ListOrder = ListOrder::NewestFirst;

    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("experience", &self.experience)?;
        require("description", &self.description)?;
        require("link", &self.link)
    }

    fn strip_empty(&mut self) {
        strip_blank(&mut self.skills);
        strip_blank(&mut self.education);
    }

    fn fill_placeholders(&mut self) {
        ensure_row(&mut self.skills);
        ensure_row(&mut self.education);
    }
}

/// Posting counts shown above the job list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl JobStats {
    pub fn from_mirror(jobs: &[Document<Job>]) -> Self {
        let active = jobs.iter().filter(|job| job.fields.is_active).count();
        JobStats {
            total: jobs.len(),
            active,
            inactive: jobs.len() - active,
        }
    }
}

/// Flip the visibility of a mirrored job. Returns the new `is_active`.
///
/// Goes through a regular full-field update, so list fields are resubmitted
/// exactly as mirrored.
pub async fn toggle_visibility<S: DocumentStore>(
    jobs: &ListSync<S, Job>,
    id: &str,
) -> Result<bool, SyncError> {
    let current = jobs.get(id)?.ok_or_else(|| StoreError::NotFound {
        collection: Job::COLLECTION.to_string(),
        id: id.to_string(),
    })?;

    let mut fields = current.fields;
    fields.is_active = !fields.is_active;
    let is_active = fields.is_active;

    jobs.update(id, fields).await?;
    info!(%id, is_active, "toggled job visibility");
    Ok(is_active)
}
