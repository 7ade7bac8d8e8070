use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::confirm::Confirm;
use super::mirror::Mirror;
use crate::document::{CreatePolicy, Document, Record, StoredDocument};
use crate::error::SyncError;
use crate::filter::{filtered, Predicate};
use crate::lock::{
    Flight, FlightGuard, InMemoryLock, InMemoryLockManager, LockError, LockGuard, LockManager,
    SingleFlight,
};
use crate::store::DocumentStore;

/// Result of [`ListSync::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// This call fetched the collection; the mirror now holds `n` documents.
    Fetched(usize),
    /// Another refresh was already in flight and succeeded. No fetch was
    /// issued; this call waited for it and the mirror now holds `n` documents.
    Joined(usize),
}

impl Refresh {
    pub fn len(&self) -> usize {
        match self {
            Refresh::Fetched(n) | Refresh::Joined(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of [`ListSync::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delete {
    Removed,
    /// The operator declined the confirmation prompt; nothing was sent.
    Declined,
}

/// Owns the mirror of one collection and reconciles it with the store.
///
/// - `refresh` and `create` are single-flight: overlapping calls never reach
///   the store twice.
/// - `update` and `delete` take a per-document lock, so two mutations of the
///   same id never overlap.
/// - Mutations patch the mirror locally, unless a refresh replaced the mirror
///   while they were in flight. Then the patch is discarded and the mirror is
///   refetched instead.
/// - A refresh whose snapshot was taken before a local patch landed never
///   replaces the patched mirror; it fetches again.
///
/// The mirror is only written from inside the controller. Readers get clones.
pub struct ListSync<S, R> {
    store: S,
    mirror: Mutex<Mirror<R>>,
    refresh_flight: SingleFlight,
    /// Error of the last settled refresh, handed to the callers that joined it.
    last_refresh: Mutex<Option<SyncError>>,
    create_flight: SingleFlight,
    document_locks: InMemoryLockManager,
    revision: watch::Sender<u64>,
}

impl<S: DocumentStore, R: Record> ListSync<S, R> {
    pub fn new(store: S) -> Self {
        let (revision, _) = watch::channel(0);
        ListSync {
            store,
            mirror: Mutex::new(Mirror::new()),
            refresh_flight: SingleFlight::new(),
            last_refresh: Mutex::new(None),
            create_flight: SingleFlight::new(),
            document_locks: InMemoryLockManager::new(),
            revision,
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn collection(&self) -> &'static str {
        R::COLLECTION
    }

    /// Snapshot of the mirror.
    pub fn mirror(&self) -> Result<Vec<Document<R>>, SyncError> {
        Ok(self.lock_mirror()?.docs.clone())
    }

    /// The mirrored document with `id`, if any.
    pub fn get(&self, id: &str) -> Result<Option<Document<R>>, SyncError> {
        let mirror = self.lock_mirror()?;
        Ok(mirror.position(id).map(|index| mirror.docs[index].clone()))
    }

    pub fn len(&self) -> Result<usize, SyncError> {
        Ok(self.lock_mirror()?.docs.len())
    }

    pub fn is_empty(&self) -> Result<bool, SyncError> {
        Ok(self.len()? == 0)
    }

    /// Whether at least one refresh has succeeded.
    pub fn is_fetched(&self) -> Result<bool, SyncError> {
        Ok(self.lock_mirror()?.fetched)
    }

    pub fn is_refreshing(&self) -> Result<bool, SyncError> {
        Ok(self.refresh_flight.in_flight()?)
    }

    pub fn is_creating(&self) -> Result<bool, SyncError> {
        Ok(self.create_flight.in_flight()?)
    }

    /// The mirror filtered by `predicate`, recomputed on every call.
    pub fn view(&self, predicate: &Predicate) -> Result<Vec<Document<R>>, SyncError> {
        Ok(filtered(&self.lock_mirror()?.docs, predicate))
    }

    /// Revision counter bumped on every mirror change. Views subscribe to it
    /// to know when to recompute.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Fetch the whole collection and replace the mirror.
    ///
    /// A call made while another refresh is in flight issues no fetch; it
    /// waits for the running one and reports [`Refresh::Joined`], or that
    /// refresh's error. On failure the previous mirror is left untouched.
    pub async fn refresh(&self) -> Result<Refresh, SyncError> {
        match self.refresh_flight.begin()? {
            Flight::Leader(guard) => self.lead_refresh(guard).await.map(Refresh::Fetched),
            Flight::Follower(waiter) => {
                debug!(collection = R::COLLECTION, "refresh already in flight; joining");
                waiter.settled().await;
                let failure = self.lock_last_refresh()?.clone();
                if let Some(err) = failure {
                    return Err(err);
                }
                Ok(Refresh::Joined(self.len()?))
            }
        }
    }

    /// Create a document from `draft` and return its store-assigned id.
    ///
    /// Rejects blank required fields before touching the store. While one
    /// create is in flight, further creates fail with
    /// [`SyncError::CreateInFlight`].
    pub async fn create(&self, draft: R) -> Result<String, SyncError> {
        draft.validate()?;

        let _flight = match self.create_flight.begin()? {
            Flight::Leader(guard) => guard,
            Flight::Follower(_) => {
                debug!(
                    collection = R::COLLECTION,
                    "create already in flight; rejecting duplicate submit"
                );
                return Err(SyncError::CreateInFlight {
                    collection: R::COLLECTION,
                });
            }
        };

        let fields = draft.to_fields()?;
        let epoch = self.epoch()?;
        let id = match self.store.create(R::COLLECTION, fields).await {
            Ok(id) => id,
            Err(err) => {
                error!(collection = R::COLLECTION, error = %err, "failed to create document");
                return Err(err.into());
            }
        };
        info!(collection = R::COLLECTION, %id, "created document");

        match R::CREATE_POLICY {
            CreatePolicy::Refetch => self.refresh_after_mutation().await,
            policy => {
                let doc = Document {
                    id: id.clone(),
                    fields: draft,
                    created_at: None,
                    updated_at: None,
                };
                self.reconcile(epoch, move |mirror| mirror.insert(doc, policy))
                    .await?;
            }
        }

        Ok(id)
    }

    /// Overwrite the stored fields of `id` with `draft`.
    pub async fn update(&self, id: &str, draft: R) -> Result<(), SyncError> {
        draft.validate()?;

        let _lock = self.lock_document(id)?;
        let fields = draft.to_fields()?;
        let epoch = self.epoch()?;

        if let Err(err) = self.store.update(R::COLLECTION, id, fields).await {
            error!(collection = R::COLLECTION, %id, error = %err, "failed to update document");
            return Err(err.into());
        }
        info!(collection = R::COLLECTION, %id, "updated document");

        self.reconcile(epoch, |mirror| {
            if !mirror.patch(id, draft) {
                debug!(collection = R::COLLECTION, %id, "updated document is not mirrored");
            }
        })
        .await
    }

    /// Delete `id` after the operator confirms.
    pub async fn delete<C>(&self, id: &str, confirm: &C) -> Result<Delete, SyncError>
    where
        C: Confirm + Sync + ?Sized,
    {
        let prompt = format!(
            "Are you sure you want to delete {} document {}?",
            R::COLLECTION,
            id
        );
        if !confirm.confirm(&prompt) {
            info!(collection = R::COLLECTION, %id, "delete declined");
            return Ok(Delete::Declined);
        }

        let lock = self.lock_document(id)?;
        let epoch = self.epoch()?;

        if let Err(err) = self.store.delete(R::COLLECTION, id).await {
            error!(collection = R::COLLECTION, %id, error = %err, "failed to delete document");
            return Err(err.into());
        }
        info!(collection = R::COLLECTION, %id, "deleted document");

        self.reconcile(epoch, |mirror| {
            mirror.remove(id);
        })
        .await?;

        // Released first: forget keeps a lock that is still held or handed out.
        drop(lock);
        self.document_locks.forget(id)?;
        Ok(Delete::Removed)
    }

    /// Apply `patch` if the mirror is still the one the mutation started
    /// against; otherwise refetch.
    async fn reconcile<F>(&self, epoch: u64, patch: F) -> Result<(), SyncError>
    where
        F: FnOnce(&mut Mirror<R>),
    {
        let applied = {
            let mut mirror = self.lock_mirror()?;
            if mirror.epoch == epoch {
                patch(&mut *mirror);
                true
            } else {
                false
            }
        };

        if applied {
            self.bump_revision();
        } else {
            debug!(
                collection = R::COLLECTION,
                "mirror replaced while mutation was in flight; discarding local patch"
            );
            self.refresh_after_mutation().await;
        }
        Ok(())
    }

    /// The mutation already succeeded, so a failed follow-up refresh is
    /// logged rather than reported.
    async fn refresh_after_mutation(&self) {
        if let Err(err) = self.refetch().await {
            warn!(
                collection = R::COLLECTION,
                error = %err,
                "refresh after mutation failed; mirror may be stale"
            );
        }
    }

    /// Refresh with a fetch that starts after this call. A refresh already in
    /// flight may hold a snapshot from before the caller's write, so it is
    /// waited out rather than joined.
    async fn refetch(&self) -> Result<usize, SyncError> {
        loop {
            match self.refresh_flight.begin()? {
                Flight::Leader(guard) => return self.lead_refresh(guard).await,
                Flight::Follower(waiter) => waiter.settled().await,
            }
        }
    }

    /// Run a refresh while holding the flight slot, and record its outcome
    /// for joiners before the slot is released.
    async fn lead_refresh(&self, _flight: FlightGuard<'_>) -> Result<usize, SyncError> {
        let outcome = self.fetch_snapshot().await;
        *self.lock_last_refresh()? = outcome.as_ref().err().cloned();
        outcome
    }

    async fn fetch_snapshot(&self) -> Result<usize, SyncError> {
        loop {
            let generation = self.lock_mirror()?.generation;

            let stored = match self.store.list_all(R::COLLECTION).await {
                Ok(stored) => stored,
                Err(err) => {
                    error!(
                        collection = R::COLLECTION,
                        error = %err,
                        "failed to fetch collection; keeping previous mirror"
                    );
                    return Err(err.into());
                }
            };

            let mut docs = decode_snapshot::<R>(stored);
            R::ORDER.apply(&mut docs);
            let count = docs.len();

            let replaced = {
                let mut mirror = self.lock_mirror()?;
                if mirror.generation == generation {
                    mirror.replace(docs);
                    true
                } else {
                    false
                }
            };

            if replaced {
                self.bump_revision();
                info!(collection = R::COLLECTION, count, "refreshed mirror");
                return Ok(count);
            }
            debug!(
                collection = R::COLLECTION,
                "mirror patched while fetching; snapshot is stale, fetching again"
            );
        }
    }

    fn lock_document(&self, id: &str) -> Result<LockGuard<InMemoryLock>, SyncError> {
        let lock = self.document_locks.get_lock(id)?;
        LockGuard::try_acquire(lock)?.ok_or_else(|| {
            debug!(collection = R::COLLECTION, %id, "document busy; rejecting mutation");
            SyncError::Busy {
                collection: R::COLLECTION,
                id: id.to_string(),
            }
        })
    }

    fn epoch(&self) -> Result<u64, SyncError> {
        Ok(self.lock_mirror()?.epoch)
    }

    fn lock_mirror(&self) -> Result<MutexGuard<'_, Mirror<R>>, SyncError> {
        self.mirror
            .lock()
            .map_err(|_| SyncError::Lock(LockError::Poisoned("mirror".into())))
    }

    fn lock_last_refresh(&self) -> Result<MutexGuard<'_, Option<SyncError>>, SyncError> {
        self.last_refresh
            .lock()
            .map_err(|_| SyncError::Lock(LockError::Poisoned("last refresh".into())))
    }

    fn bump_revision(&self) {
        self.revision
            .send_modify(|revision| *revision = revision.wrapping_add(1));
    }
}

/// Decode a fetched snapshot, skipping documents that do not fit the record.
fn decode_snapshot<R: Record>(stored: Vec<StoredDocument>) -> Vec<Document<R>> {
    stored
        .into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match Document::decode(doc) {
                Ok(doc) => Some(doc),
                Err(err) => {
                    warn!(
                        collection = R::COLLECTION,
                        %id,
                        error = %err,
                        "skipping undecodable document"
                    );
                    None
                }
            }
        })
        .collect()
}
