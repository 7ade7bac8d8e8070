//! Form sessions - the one editable draft of a list page.
//!
//! ```text
//! Empty ──start_create──▶ Drafting ──submit──▶ Submitting ──ok──▶ Empty
//!   │                        ▲                      │
//!   └──start_edit──▶ Editing ┴───────── err ────────┘
//! ```
//!
//! `cancel` returns to `Empty` from any state. Starting an edit while another
//! draft is open discards that draft without persisting it.

use tracing::debug;

use crate::controller::ListSync;
use crate::document::{Document, Record};
use crate::error::{SyncError, ValidationError};
use crate::store::DocumentStore;

/// Where a form session currently stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormState<R> {
    #[default]
    Empty,
    /// A new document being written.
    Drafting(R),
    /// An existing document being edited.
    Editing { id: String, draft: R },
    /// A submit is waiting on the store.
    Submitting,
}

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Created(String),
    Updated(String),
}

/// Holds at most one draft for a list page.
#[derive(Debug, Clone, Default)]
pub struct FormSession<R> {
    state: FormState<R>,
}

impl<R: Record> FormSession<R> {
    pub fn new() -> Self {
        FormSession {
            state: FormState::Empty,
        }
    }

    pub fn state(&self) -> &FormState<R> {
        &self.state
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, FormState::Empty)
    }

    /// Id of the document being edited, if any.
    pub fn editing_id(&self) -> Option<&str> {
        match &self.state {
            FormState::Editing { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }

    /// The open draft, if any.
    pub fn draft(&self) -> Option<&R> {
        match &self.state {
            FormState::Drafting(draft) | FormState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Mutable access to the open draft, if any.
    pub fn draft_mut(&mut self) -> Option<&mut R> {
        match &mut self.state {
            FormState::Drafting(draft) | FormState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Open a blank create-mode draft, replacing whatever was open.
    pub fn start_create(&mut self) {
        let mut draft = R::default();
        draft.fill_placeholders();
        self.discard("start_create");
        self.state = FormState::Drafting(draft);
    }

    /// Open an edit-mode draft seeded from `doc`, replacing whatever was open.
    pub fn start_edit(&mut self, doc: &Document<R>) {
        let mut draft = doc.fields.clone();
        draft.fill_placeholders();
        self.discard("start_edit");
        self.state = FormState::Editing {
            id: doc.id.clone(),
            draft,
        };
    }

    /// Throw the draft away.
    pub fn cancel(&mut self) {
        self.discard("cancel");
        self.state = FormState::Empty;
    }

    /// Strip blank rows, validate, then create or update through `list`.
    ///
    /// Validation failures never reach the store. On any failure the draft is
    /// left exactly as the operator wrote it, so they can retry.
    pub async fn submit<S: DocumentStore>(
        &mut self,
        list: &ListSync<S, R>,
    ) -> Result<Submitted, SyncError> {
        let (target, draft) = match std::mem::replace(&mut self.state, FormState::Submitting) {
            FormState::Drafting(draft) => (None, draft),
            FormState::Editing { id, draft } => (Some(id), draft),
            other => {
                self.state = other;
                return Err(ValidationError::NoDraft.into());
            }
        };

        let mut outgoing = draft.clone();
        outgoing.strip_empty();

        let result = match outgoing.validate() {
            Err(err) => Err(err.into()),
            Ok(()) => match &target {
                None => list.create(outgoing).await.map(Submitted::Created),
                Some(id) => list
                    .update(id, outgoing)
                    .await
                    .map(|()| Submitted::Updated(id.clone())),
            },
        };

        match result {
            Ok(submitted) => {
                self.state = FormState::Empty;
                Ok(submitted)
            }
            Err(err) => {
                self.state = match target {
                    None => FormState::Drafting(draft),
                    Some(id) => FormState::Editing { id, draft },
                };
                Err(err)
            }
        }
    }

    fn discard(&self, reason: &str) {
        if let Some(id) = self.editing_id() {
            debug!(collection = R::COLLECTION, %id, reason, "discarding edit draft");
        }
    }
}
