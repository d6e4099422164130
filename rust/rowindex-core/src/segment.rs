//! Read-only view of one index segment.
//!
//! The index engine owns segments; the mapping core only needs three things
//! from each of them:
//!
//! 1. the live-document bitmap, so deleted documents are skipped
//! 2. the distinct terms of a field together with their postings
//! 3. a per-document binary value for a field (used for sorting)

use std::sync::Arc;

use roaring::RoaringBitmap;

/// Segment-local document number.
pub type DocId = u32;

/// One distinct term of a field and the documents containing it, ascending.
#[derive(Debug, Clone, Copy)]
pub struct TermPostings<'a> {
    pub term: &'a [u8],
    pub docs: &'a [DocId],
}

/// Random access to one binary value per document.
pub trait BinaryDocValues: Send + Sync {
    /// Returns the document's value, or `None` when the document has no value
    /// for the field.
    fn get(&self, doc: DocId) -> Option<&[u8]>;
}

pub trait SegmentReader: Send + Sync {
    /// One past the highest document number in the segment.
    fn max_doc(&self) -> DocId;

    /// Documents that are not deleted, or `None` when every document is live.
    fn live_docs(&self) -> Option<&RoaringBitmap>;

    /// Iterates the distinct terms of `field` in term order.
    ///
    /// Returns `None` when the segment has no terms for the field.
    fn terms<'a>(&'a self, field: &str) -> Option<Box<dyn Iterator<Item = TermPostings<'a>> + 'a>>;

    /// Per-document binary values of `field`, or `None` when no document has one.
    fn binary_values(&self, field: &str) -> Option<Arc<dyn BinaryDocValues>>;

    fn is_live(&self, doc: DocId) -> bool {
        doc < self.max_doc() && self.live_docs().is_none_or(|live| live.contains(doc))
    }
}
