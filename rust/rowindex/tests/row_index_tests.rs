use std::collections::HashMap;

use rowindex::schema::ClusteringKeyMapper;
use rowindex::storage::memory::MemorySegment;
use rowindex::storage::metadata::{ColumnKind, TableMetadata};
use rowindex::storage::{DocId, NativeType, NativeValue};
use rowindex::{
    CellValue, EngineSettings, RowIndexConfig, Search, TombstoneRange, build_comparator,
    build_tombstone_exclusion_filter,
};

fn table() -> TableMetadata {
    TableMetadata::new("shop", "orders")
        .with_column("customer", NativeType::Utf8, ColumnKind::PartitionKey)
        .with_column("seq", NativeType::Reversed(Box::new(NativeType::Int32)), ColumnKind::Clustering)
        .with_column("item", NativeType::Utf8, ColumnKind::Regular)
        .with_column("price", NativeType::Double, ColumnKind::Regular)
}

fn config() -> RowIndexConfig {
    let options = HashMap::from([(
        "schema".to_string(),
        r#"{"fields": {"item": {"type": "text"}, "price": {"type": "double"}}}"#.to_string(),
    )]);
    RowIndexConfig::new(&table(), "orders_idx", &options, &EngineSettings::new("/data")).unwrap()
}

fn seq(v: i32) -> Vec<u8> {
    NativeType::Int32.decompose(&NativeValue::Int32(v)).unwrap()
}

/// Rows are indexed through the configured schema; the clustering column is
/// descending, so sorting must follow the reversed native order.
#[test]
fn test_configured_index_end_to_end() {
    let config = config();
    let schema = config.schema();

    let rows = [(3, "red shoes", 40.0), (1, "blue hat", 15.5), (2, "red hat", 12.0)];
    let mut segment = MemorySegment::new();
    for (key, item, price) in rows {
        let item = CellValue::from(item);
        let price = CellValue::Float64(price);
        let document = schema
            .document(
                [("item", Some(&item)), ("price", Some(&price))],
                Some(seq(key).as_slice()),
            )
            .unwrap();
        segment.add(document.to_memory(schema));
    }

    let search = Search::from_json(
        r#"{"filter": {"type": "range", "field": "price", "upper": 20, "include_upper": true}}"#,
    )
    .unwrap();
    assert!(!search.uses_relevance());
    let filter = search.build(schema).unwrap().filter.unwrap();
    let cheap: Vec<i32> = rows
        .iter()
        .filter(|(_, _, price)| {
            let terms = schema
                .mapper("price")
                .unwrap()
                .terms("price", &CellValue::Float64(*price))
                .unwrap();
            filter.matches(&terms)
        })
        .map(|(key, _, _)| *key)
        .collect();
    assert_eq!(cheap, vec![1, 2]);

    let mut sorter = build_comparator(schema, ClusteringKeyMapper::FIELD_NAME, rows.len()).unwrap();
    sorter.bind_segment(&segment);
    for doc in 0..rows.len() {
        sorter.capture(doc, doc as DocId);
    }
    let mut slots: Vec<usize> = (0..rows.len()).collect();
    slots.sort_by(|a, b| sorter.compare(*a, *b));
    let order: Vec<i32> = slots.iter().map(|s| rows[*s].0).collect();
    assert_eq!(order, vec![3, 2, 1]);

    // In descending order the tombstone runs from 3 down to 2
    let filter =
        build_tombstone_exclusion_filter(schema, &TombstoneRange::new(Some(seq(3)), Some(seq(2))))
            .unwrap();
    let excluded: Vec<i32> = filter
        .excluded_docs(&segment)
        .iter()
        .map(|doc| rows[doc as usize].0)
        .collect();
    assert_eq!(excluded, vec![3, 2]);
}
