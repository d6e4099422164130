//! Table column definitions as exposed by the storage engine.
//!
//! Schemas are validated against these definitions when an index is created:
//! every mapped field must name an existing column whose native type the
//! mapper can convert.

use ahash::AHashMap;

use crate::marshal::NativeType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    PartitionKey,
    Clustering,
    Regular,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub native_type: NativeType,
    pub kind: ColumnKind,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, native_type: NativeType, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            native_type,
            kind,
        }
    }
}

/// Definition of one table: keyspace, name and columns in declaration order.
#[derive(Debug, Clone)]
pub struct TableMetadata {
    keyspace: String,
    table: String,
    columns: Vec<ColumnDefinition>,
    by_name: AHashMap<String, usize>,
}

impl TableMetadata {
    pub fn new(keyspace: impl Into<String>, table: impl Into<String>) -> TableMetadata {
        TableMetadata {
            keyspace: keyspace.into(),
            table: table.into(),
            columns: Vec::new(),
            by_name: AHashMap::new(),
        }
    }

    /// Adds a column, replacing any previous definition with the same name.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        native_type: NativeType,
        kind: ColumnKind,
    ) -> TableMetadata {
        let column = ColumnDefinition::new(name, native_type, kind);
        match self.by_name.get(&column.name) {
            Some(&idx) => self.columns[idx] = column,
            None => {
                self.by_name.insert(column.name.clone(), self.columns.len());
                self.columns.push(column);
            }
        }
        self
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.by_name.get(name).map(|&idx| &self.columns[idx])
    }

    pub fn clustering_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Clustering)
    }

    /// The comparator that orders rows within a partition.
    ///
    /// A single clustering column uses its own type; several are combined into a
    /// composite. Tables without clustering columns have no clustering order.
    pub fn clustering_comparator(&self) -> Option<NativeType> {
        let mut types: Vec<NativeType> = self
            .clustering_columns()
            .map(|c| c.native_type.clone())
            .collect();
        match types.len() {
            0 => None,
            1 => types.pop(),
            _ => Some(NativeType::Composite(types)),
        }
    }
}
