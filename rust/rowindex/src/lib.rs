//! Secondary row index for a wide-column store.
//!
//! The index maps table columns onto an inverted index through a JSON
//! described [`Schema`], translates search conditions into index queries, and
//! reconciles index hits with storage semantics (clustering order and range
//! tombstones). Configuration of one index lives in [`RowIndexConfig`].
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use rowindex::{Condition, EngineSettings, RowIndexConfig, build_query};
//! use rowindex::storage::NativeType;
//! use rowindex::storage::metadata::{ColumnKind, TableMetadata};
//!
//! let table = TableMetadata::new("ks", "users")
//!     .with_column("id", NativeType::Int32, ColumnKind::PartitionKey)
//!     .with_column("name", NativeType::Utf8, ColumnKind::Regular);
//! let options = HashMap::from([(
//!     "schema".to_string(),
//!     r#"{"fields": {"name": {"type": "text"}}}"#.to_string(),
//! )]);
//! let config = RowIndexConfig::new(&table, "users_idx", &options, &EngineSettings::new("/var/lib/data"))
//!     .unwrap();
//!
//! let query = build_query(&Condition::matching("name", "Alice"), config.schema()).unwrap();
//! assert_eq!(query.to_string(), "name:alice");
//! ```

pub mod config;

pub use rowindex_common as common;
pub use rowindex_core as storage;
pub use rowindex_query as query;
pub use rowindex_schema as schema;
pub use rowindex_text as text;

pub use config::{EngineSettings, RowIndexConfig};
pub use rowindex_common::{error::Error, result::Result};
pub use rowindex_query::{
    ClusteringKeySorter, Condition, IndexQuery, RangeTombstoneFilter, Search, TombstoneRange,
    build_comparator, build_query, build_tombstone_exclusion_filter,
};
pub use rowindex_schema::{CellValue, IndexValue, Schema};
