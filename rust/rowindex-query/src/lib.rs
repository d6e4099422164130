//! Search over mapped rows.
//!
//! This crate turns client [`Condition`]s into engine-neutral [`IndexQuery`]s
//! using the field mappers of a [`Schema`], and provides the two pieces that
//! reconcile index results with storage semantics:
//!
//! - [`ClusteringKeySorter`]: puts hits back into storage (clustering) order
//! - [`RangeTombstoneFilter`]: excludes documents deleted by a range tombstone
//!   that the index has not yet observed

pub mod condition;
pub mod query;
pub mod sort;
pub mod tombstone;
pub mod translate;

use rowindex_common::{error::Error, result::Result};
use rowindex_schema::{ClusteringKeyMapper, Schema};

pub use condition::{Condition, Search};
pub use query::{IndexQuery, QueryClause};
pub use sort::ClusteringKeySorter;
pub use tombstone::{RangeTombstoneFilter, TombstoneRange};
pub use translate::{SearchQueries, build_query};

fn clustering_key(schema: &Schema) -> Result<&ClusteringKeyMapper> {
    schema
        .clustering_key()
        .ok_or_else(|| Error::validation("schema has no clustering key mapper"))
}

/// Creates the sorter for `field`, which must be the clustering key field.
///
/// # Errors
/// A validation error when the schema has no clustering key or `field` names
/// another field.
pub fn build_comparator(schema: &Schema, field: &str, expected_hits: usize) -> Result<ClusteringKeySorter> {
    let mapper = clustering_key(schema)?;
    if field != ClusteringKeyMapper::FIELD_NAME {
        return Err(Error::validation(format!(
            "field '{field}' cannot be sorted by clustering key"
        )));
    }
    Ok(ClusteringKeySorter::new(mapper.clone(), expected_hits))
}

/// Creates the filter excluding rows covered by `range`.
///
/// # Errors
/// A validation error when the schema has no clustering key.
pub fn build_tombstone_exclusion_filter(
    schema: &Schema,
    range: &TombstoneRange,
) -> Result<RangeTombstoneFilter> {
    let mapper = clustering_key(schema)?;
    Ok(RangeTombstoneFilter::new(mapper.clone(), range))
}
