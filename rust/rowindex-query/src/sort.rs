//! Ordering of search hits by clustering key.
//!
//! [`ClusteringKeySorter`] follows the collector protocol of top-N sorting
//! engines: the engine binds each segment in turn, captures candidate
//! documents into numbered slots, designates the current weakest slot as the
//! pivot and compares new documents against it.
//!
//! Stored keys are hex text. They are decoded back to native bytes before
//! every comparison and ordered by the storage engine's comparator, never by
//! their raw bytes. A document without a key, or with a key that cannot be
//! decoded, sorts before every document that has one.

use std::{cmp::Ordering, fmt, sync::Arc};

use rowindex_core::{BinaryDocValues, DocId, SegmentReader};
use rowindex_schema::ClusteringKeyMapper;

pub struct ClusteringKeySorter {
    mapper: ClusteringKeyMapper,
    slots: Vec<Option<Vec<u8>>>,
    pivot: Option<Vec<u8>>,
    values: Option<Arc<dyn BinaryDocValues>>,
}

impl ClusteringKeySorter {
    /// Creates a sorter with room for `num_hits` slots.
    pub fn new(mapper: ClusteringKeyMapper, num_hits: usize) -> ClusteringKeySorter {
        ClusteringKeySorter {
            mapper,
            slots: vec![None; num_hits],
            pivot: None,
            values: None,
        }
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Switches to the documents of `segment`.
    pub fn bind_segment(&mut self, segment: &dyn SegmentReader) {
        self.values = segment.binary_values(ClusteringKeyMapper::FIELD_NAME);
    }

    /// Compares the values captured in two slots.
    pub fn compare(&self, a: usize, b: usize) -> Ordering {
        self.compare_keys(self.value(a), self.value(b))
    }

    /// Makes the value captured in `slot` the pivot.
    pub fn set_pivot(&mut self, slot: usize) {
        self.pivot = self.slots.get(slot).cloned().flatten();
    }

    /// Compares the pivot with the key of `doc` in the bound segment.
    pub fn compare_pivot(&self, doc: DocId) -> Ordering {
        let key = self.doc_key(doc);
        self.compare_keys(self.pivot.as_deref(), key.as_deref())
    }

    /// Captures the key of `doc` into `slot`.
    ///
    /// The slot count is fixed at creation; a capture into a slot beyond it
    /// is logged and ignored.
    pub fn capture(&mut self, slot: usize, doc: DocId) {
        let key = self.doc_key(doc);
        match self.slots.get_mut(slot) {
            Some(captured) => *captured = key,
            None => log::warn!(
                "ignoring capture of document {doc} into slot {slot} of {}",
                self.slots.len()
            ),
        }
    }

    /// Compares the key of `doc` with an already decoded key, as when resuming
    /// a search after a given row.
    pub fn compare_doc_to_value(&self, doc: DocId, value: Option<&[u8]>) -> Ordering {
        let key = self.doc_key(doc);
        self.compare_keys(key.as_deref(), value)
    }

    /// The native key captured in `slot`.
    pub fn value(&self, slot: usize) -> Option<&[u8]> {
        self.slots.get(slot).and_then(|v| v.as_deref())
    }

    fn doc_key(&self, doc: DocId) -> Option<Vec<u8>> {
        let stored = self.values.as_ref()?.get(doc)?;
        match self.mapper.decode(stored) {
            Ok(key) => Some(key),
            Err(e) => {
                log::warn!("treating document {doc} as missing its clustering key: {e}");
                None
            }
        }
    }

    fn compare_keys(&self, a: Option<&[u8]>, b: Option<&[u8]>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => self.mapper.compare(a, b),
        }
    }
}

impl fmt::Debug for ClusteringKeySorter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusteringKeySorter")
            .field("mapper", &self.mapper)
            .field("slots", &self.slots.len())
            .field("bound", &self.values.is_some())
            .finish()
    }
}
