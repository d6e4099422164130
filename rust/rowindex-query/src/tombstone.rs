//! Exclusion of rows covered by a range tombstone.
//!
//! A range tombstone deletes every row of a partition whose clustering key lies
//! within `[min, max]`. The index does not see the deletion until compaction,
//! so searches exclude the covered documents themselves.

use roaring::RoaringBitmap;
use rowindex_core::SegmentReader;
use rowindex_schema::ClusteringKeyMapper;

/// Inclusive bounds of native clustering keys. A missing or empty bound is
/// unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TombstoneRange {
    pub min: Option<Vec<u8>>,
    pub max: Option<Vec<u8>>,
}

impl TombstoneRange {
    pub fn new(min: Option<Vec<u8>>, max: Option<Vec<u8>>) -> TombstoneRange {
        TombstoneRange { min, max }
    }
}

#[derive(Debug, Clone)]
pub struct RangeTombstoneFilter {
    mapper: ClusteringKeyMapper,
    min: Option<Vec<u8>>,
    max: Option<Vec<u8>>,
}

impl RangeTombstoneFilter {
    pub fn new(mapper: ClusteringKeyMapper, range: &TombstoneRange) -> RangeTombstoneFilter {
        let bound = |b: &Option<Vec<u8>>| b.clone().filter(|b| !b.is_empty());
        RangeTombstoneFilter {
            mapper,
            min: bound(&range.min),
            max: bound(&range.max),
        }
    }

    /// Whether a native key falls within the tombstone.
    pub fn covers(&self, key: &[u8]) -> bool {
        let above_min = self
            .min
            .as_deref()
            .is_none_or(|min| self.mapper.compare(min, key).is_le());
        let below_max = self
            .max
            .as_deref()
            .is_none_or(|max| self.mapper.compare(key, max).is_le());
        above_min && below_max
    }

    /// The live documents of `segment` whose clustering key is covered.
    ///
    /// Each distinct key is decoded once. Keys that cannot be decoded are
    /// skipped.
    pub fn excluded_docs(&self, segment: &dyn SegmentReader) -> RoaringBitmap {
        let mut excluded = RoaringBitmap::new();
        let Some(terms) = segment.terms(ClusteringKeyMapper::FIELD_NAME) else {
            return excluded;
        };
        let live = segment.live_docs();
        let (mut scanned, mut skipped) = (0usize, 0usize);
        for postings in terms {
            scanned += 1;
            let key = match self.mapper.decode(postings.term) {
                Ok(key) => key,
                Err(e) => {
                    skipped += 1;
                    log::warn!("skipping clustering key term: {e}");
                    continue;
                }
            };
            if !self.covers(&key) {
                continue;
            }
            excluded.extend(
                postings
                    .docs
                    .iter()
                    .copied()
                    .filter(|doc| live.is_none_or(|live| live.contains(*doc))),
            );
        }
        log::debug!(
            "range tombstone excluded {} documents after scanning {scanned} keys ({skipped} undecodable)",
            excluded.len()
        );
        excluded
    }
}
