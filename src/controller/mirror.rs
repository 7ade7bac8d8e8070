use crate::document::{CreatePolicy, Document};

/// The last successful full fetch of a collection, plus local patches.
///
/// `epoch` changes only when a refresh replaces the snapshot wholesale, which
/// lets an in-flight mutation tell whether the mirror it started against is
/// still the one it would patch. `generation` changes on every local patch,
/// which lets an in-flight refresh tell whether its snapshot predates one.
pub(crate) struct Mirror<R> {
    pub(crate) docs: Vec<Document<R>>,
    pub(crate) epoch: u64,
    pub(crate) generation: u64,
    pub(crate) fetched: bool,
}

impl<R> Mirror<R> {
    pub(crate) fn new() -> Self {
        Mirror {
            docs: Vec::new(),
            epoch: 0,
            generation: 0,
            fetched: false,
        }
    }

    pub(crate) fn replace(&mut self, docs: Vec<Document<R>>) {
        self.docs = docs;
        self.epoch += 1;
        self.fetched = true;
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.docs.iter().position(|doc| doc.id == id)
    }

    /// Insert a freshly created document. An entry with the same id is
    /// replaced in place rather than duplicated.
    pub(crate) fn insert(&mut self, doc: Document<R>, policy: CreatePolicy) {
        self.generation += 1;
        if let Some(index) = self.position(&doc.id) {
            self.docs[index] = doc;
            return;
        }
        match policy {
            CreatePolicy::Prepend => self.docs.insert(0, doc),
            CreatePolicy::Append | CreatePolicy::Refetch => self.docs.push(doc),
        }
    }

    /// Overwrite the fields of the entry with `id`. Returns whether it existed.
    pub(crate) fn patch(&mut self, id: &str, fields: R) -> bool {
        match self.position(id) {
            Some(index) => {
                self.docs[index].fields = fields;
                self.generation += 1;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with `id`. Returns whether it existed.
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.docs.remove(index);
                self.generation += 1;
                true
            }
            None => false,
        }
    }
}
