//! The auxiliary field holding each row's clustering key.
//!
//! Keys are indexed as lower-case hex text of their native bytes. Hex text
//! sorts like the raw bytes, which is not the storage engine's order, so any
//! comparison decodes back to native bytes and defers to the native
//! comparator.

use std::{cmp::Ordering, fmt, sync::Arc};

use rowindex_common::{error::Error, result::Result};
use rowindex_core::NativeComparator;

use crate::{mapper::IndexableField, value::IndexValue};

#[derive(Clone)]
pub struct ClusteringKeyMapper {
    comparator: Arc<dyn NativeComparator>,
}

impl ClusteringKeyMapper {
    pub const FIELD_NAME: &'static str = "_clustering_key";

    pub fn new(comparator: Arc<dyn NativeComparator>) -> ClusteringKeyMapper {
        ClusteringKeyMapper { comparator }
    }

    pub fn comparator(&self) -> &Arc<dyn NativeComparator> {
        &self.comparator
    }

    pub fn encode(&self, key: &[u8]) -> String {
        hex::encode(key)
    }

    /// Decodes a stored or indexed key back to native bytes.
    pub fn decode(&self, stored: &[u8]) -> Result<Vec<u8>> {
        hex::decode(stored).map_err(|e| {
            Error::invalid_value(Self::FIELD_NAME, format!("malformed clustering key: {e}"))
        })
    }

    /// The untokenized field indexed with every row.
    pub fn field(&self, key: &[u8]) -> IndexableField {
        IndexableField {
            name: Self::FIELD_NAME.to_string(),
            value: IndexValue::Text(self.encode(key)),
            boost: 1.0,
            tokenized: false,
        }
    }

    /// Compares two native keys in storage order.
    pub fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        self.comparator.compare(a, b)
    }
}

impl fmt::Debug for ClusteringKeyMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusteringKeyMapper")
            .field("comparator", &self.comparator.name())
            .finish()
    }
}
