//! Storage-engine and index-engine interfaces shared by the mapping crates.
//!
//! The mapping core sits between two external systems and only talks to them
//! through the types defined here:
//!
//! - [`marshal`]: the storage engine's native types, their byte encodings and
//!   the [`NativeComparator`](marshal::NativeComparator) that defines clustering order
//! - [`metadata`]: the table's column definitions, used to validate schemas
//! - [`segment`]: the read-only view of one index segment (live documents,
//!   term postings and per-document binary values)
//! - [`memory`]: an in-memory [`SegmentReader`](segment::SegmentReader)

pub mod memory;
pub mod marshal;
pub mod metadata;
pub mod segment;

pub use marshal::{NativeComparator, NativeType, NativeValue};
pub use segment::{BinaryDocValues, DocId, SegmentReader, TermPostings};
