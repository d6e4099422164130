//! In-memory segment.
//!
//! `MemorySegment` keeps an inverted term map and a column of binary values per
//! field. It backs unit tests and small embedded uses where no external index
//! engine is available.

use std::{collections::BTreeMap, sync::Arc};

use ahash::AHashMap;
use roaring::RoaringBitmap;

use crate::segment::{BinaryDocValues, DocId, SegmentReader, TermPostings};

/// Fields of one document before it is added to a [`MemorySegment`].
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    terms: Vec<(String, Vec<u8>)>,
    binary: Vec<(String, Vec<u8>)>,
}

impl MemoryDocument {
    pub fn new() -> MemoryDocument {
        MemoryDocument::default()
    }

    /// Indexes `term` under `field`. A field may carry several terms.
    pub fn add_term(&mut self, field: impl Into<String>, term: impl Into<Vec<u8>>) -> &mut Self {
        self.terms.push((field.into(), term.into()));
        self
    }

    /// Sets the per-document binary value of `field`.
    pub fn set_binary(&mut self, field: impl Into<String>, value: impl Into<Vec<u8>>) -> &mut Self {
        self.binary.push((field.into(), value.into()));
        self
    }
}

#[derive(Clone, Default)]
struct MemoryBinaryValues(Vec<Option<Vec<u8>>>);

impl BinaryDocValues for MemoryBinaryValues {
    fn get(&self, doc: DocId) -> Option<&[u8]> {
        self.0.get(doc as usize).and_then(|v| v.as_deref())
    }
}

#[derive(Default)]
pub struct MemorySegment {
    max_doc: DocId,
    deleted: RoaringBitmap,
    live: Option<RoaringBitmap>,
    terms: AHashMap<String, BTreeMap<Vec<u8>, Vec<DocId>>>,
    binary: AHashMap<String, Arc<MemoryBinaryValues>>,
}

impl MemorySegment {
    pub fn new() -> MemorySegment {
        MemorySegment::default()
    }

    /// Appends a document and returns its number.
    pub fn add(&mut self, document: MemoryDocument) -> DocId {
        let doc = self.max_doc;
        self.max_doc += 1;
        for (field, term) in document.terms {
            let postings = self.terms.entry(field).or_default().entry(term).or_default();
            if postings.last() != Some(&doc) {
                postings.push(doc);
            }
        }
        for (field, value) in document.binary {
            let values = self.binary.entry(field).or_default();
            let values = Arc::make_mut(values);
            if values.0.len() <= doc as usize {
                values.0.resize(doc as usize + 1, None);
            }
            values.0[doc as usize] = Some(value);
        }
        if let Some(live) = self.live.as_mut() {
            live.insert(doc);
        }
        doc
    }

    /// Marks a document as deleted. Its postings stay in place, as they would in
    /// an on-disk segment until it is merged.
    pub fn delete(&mut self, doc: DocId) {
        if doc >= self.max_doc {
            return;
        }
        self.deleted.insert(doc);
        let mut live = RoaringBitmap::new();
        live.insert_range(0..self.max_doc);
        live -= &self.deleted;
        self.live = Some(live);
    }
}

impl SegmentReader for MemorySegment {
    fn max_doc(&self) -> DocId {
        self.max_doc
    }

    fn live_docs(&self) -> Option<&RoaringBitmap> {
        self.live.as_ref()
    }

    fn terms<'a>(&'a self, field: &str) -> Option<Box<dyn Iterator<Item = TermPostings<'a>> + 'a>> {
        let terms = self.terms.get(field)?;
        Some(Box::new(terms.iter().map(|(term, docs)| TermPostings {
            term: term.as_slice(),
            docs: docs.as_slice(),
        })))
    }

    fn binary_values(&self, field: &str) -> Option<Arc<dyn BinaryDocValues>> {
        let values = self.binary.get(field)?;
        Some(values.clone() as Arc<dyn BinaryDocValues>)
    }
}
