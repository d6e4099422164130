//! Index documents built from table rows.

use rowindex_core::memory::MemoryDocument;

use crate::{clustering::ClusteringKeyMapper, mapper::IndexableField, schema::Schema};

/// The indexable fields of one row, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Vec<IndexableField>,
}

impl Document {
    pub fn add(&mut self, field: IndexableField) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[IndexableField] {
        &self.fields
    }

    pub fn get<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a IndexableField> + 'a {
        self.fields.iter().filter(move |f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Converts the document for a [`MemoryDocument`] segment.
    ///
    /// Tokenized fields are run through their mapper's analyzer, every other
    /// field becomes a single term of its display form. The clustering key is
    /// also stored as the document's binary value so it can be sorted on.
    pub fn to_memory(&self, schema: &Schema) -> MemoryDocument {
        let mut memory = MemoryDocument::new();
        for field in &self.fields {
            let term = field.value.to_string();
            if field.name == ClusteringKeyMapper::FIELD_NAME {
                memory.set_binary(field.name.as_str(), term.as_bytes());
            }
            match schema.mapper(&field.name) {
                Ok(mapper) if field.tokenized => {
                    for token in mapper.analyzer().analyze(&term) {
                        memory.add_term(field.name.as_str(), token);
                    }
                }
                _ => {
                    memory.add_term(field.name.as_str(), term);
                }
            }
        }
        memory
    }
}

#[cfg(test)]
mod tests {
    use rowindex_core::{NativeType, SegmentReader, memory::MemorySegment};

    use super::*;
    use crate::value::CellValue;

    #[test]
    fn test_to_memory() {
        let schema = Schema::from_json(
            r#"{"fields": {"title": {"type": "text"}, "year": {"type": "integer"}}}"#,
        )
        .unwrap()
        .with_clustering_key(NativeType::Utf8);
        let title = CellValue::from("The Old Man and the Sea");
        let year = CellValue::from("1952");
        let document = schema
            .document([("title", Some(&title)), ("year", Some(&year))], Some(&b"k1"[..]))
            .unwrap();
        assert_eq!(document.get("year").count(), 1);

        let mut segment = MemorySegment::new();
        let doc = segment.add(document.to_memory(&schema));

        let terms: Vec<Vec<u8>> = segment
            .terms("title")
            .unwrap()
            .map(|t| t.term.to_vec())
            .collect();
        assert_eq!(terms, vec![b"man".to_vec(), b"old".to_vec(), b"sea".to_vec()]);
        assert_eq!(segment.terms("year").unwrap().count(), 1);
        assert_eq!(
            segment.binary_values("_clustering_key").unwrap().get(doc),
            Some(&b"6b31"[..])
        );
    }
}
