//! Column-to-index mapping.
//!
//! A [`Schema`] maps table columns to [`CellMapper`]s. Each mapper converts the
//! column's runtime values ([`CellValue`]) to [`IndexValue`]s for indexing,
//! and converts query literals for the same column in exactly the same way.
//! The schema may also carry the [`ClusteringKeyMapper`], which stores each
//! row's clustering key so search results can be put back in storage order.

pub mod clustering;
pub mod date;
pub mod document;
pub mod mapper;
pub mod schema;
pub mod value;

pub use clustering::ClusteringKeyMapper;
pub use date::{DEFAULT_DATE_PATTERN, DatePattern};
pub use document::Document;
pub use mapper::{
    CellMapper, ConditionKind, DEFAULT_BOOST, FieldTerm, IndexableField, LogicalType,
};
pub use schema::{Schema, SchemaBuilder};
pub use value::{CellValue, IndexValue};
