//! Properties of the streaming join, checked against in-memory data
//!
//! Covers: ordering, schema completeness, last-write-wins, miss defaults,
//! identifier trimming in either dataset, and the three reference scenarios.

use velomerge::velomerge::datasource::{MemoryReader, MemoryWriter, Record};
use velomerge::velomerge::merge::{build_lookup, stream_join, JoinState, StreamingJoiner};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

async fn merge(
    aux_columns: &[&str],
    aux_rows: &[&[&str]],
    fields: &[&str],
    primary_columns: &[&str],
    primary_rows: &[&[&str]],
) -> (u64, MemoryWriter) {
    let mut aux = MemoryReader::from_rows("aux", aux_columns, aux_rows);
    let lookup = build_lookup(&mut aux, aux_columns[0], strings(fields))
        .await
        .unwrap();

    let mut primary = MemoryReader::from_rows("primary", primary_columns, primary_rows);
    let mut out = MemoryWriter::new("out");
    let rows = stream_join(&mut primary, primary_columns[0], lookup, &mut out)
        .await
        .unwrap();
    (rows, out)
}

fn field<'a>(record: &'a Record, column: &str) -> &'a str {
    record.get(column).expect("column present in every output row")
}

#[tokio::test]
async fn test_scenario_match_and_miss() {
    let (rows, out) = merge(
        &["sku", "img", "designer"],
        &[&["A", "u1", "D1"]],
        &["img", "designer"],
        &["sku", "color"],
        &[&["A", "red"], &["B", "blue"]],
    )
    .await;

    assert_eq!(rows, 2);
    assert_eq!(out.schema().unwrap(), strings(&["sku", "color", "img", "designer"]));
    assert_eq!(out.rows()[0], strings(&["A", "red", "u1", "D1"]));
    assert_eq!(out.rows()[1], strings(&["B", "blue", "", ""]));
    assert!(out.is_finalized());
}

#[tokio::test]
async fn test_scenario_empty_auxiliary() {
    let (rows, out) = merge(
        &["sku", "img"],
        &[],
        &["img"],
        &["sku", "color"],
        &[&["A", "red"], &["B", "blue"], &["C", "green"]],
    )
    .await;

    assert_eq!(rows, 3);
    for record in out.records() {
        assert_eq!(field(&record, "img"), "");
    }
}

#[tokio::test]
async fn test_scenario_header_only_primary() {
    let (rows, out) = merge(
        &["sku", "img"],
        &[&["A", "u1"]],
        &["img"],
        &["sku", "color"],
        &[],
    )
    .await;

    assert_eq!(rows, 0);
    assert_eq!(out.schema().unwrap(), strings(&["sku", "color", "img"]));
    assert!(out.rows().is_empty());
}

#[tokio::test]
async fn test_output_order_follows_input_order() {
    let ids: Vec<String> = (0..500).map(|i| format!("SKU{:04}", (i * 7919) % 500)).collect();
    let aux_rows: Vec<Vec<&str>> = ids.iter().rev().map(|id| vec![id.as_str(), id.as_str()]).collect();
    let aux_refs: Vec<&[&str]> = aux_rows.iter().map(|r| r.as_slice()).collect();
    let primary_rows: Vec<Vec<&str>> = ids.iter().map(|id| vec![id.as_str()]).collect();
    let primary_refs: Vec<&[&str]> = primary_rows.iter().map(|r| r.as_slice()).collect();

    let (rows, out) = merge(&["sku", "echo"], &aux_refs, &["echo"], &["sku"], &primary_refs).await;

    assert_eq!(rows, 500);
    for (i, row) in out.rows().iter().enumerate() {
        assert_eq!(row[0], ids[i]);
        assert_eq!(row[1], ids[i]);
    }
}

#[tokio::test]
async fn test_every_row_has_exactly_the_schema_columns() {
    let (_, out) = merge(
        &["sku", "img", "designer"],
        &[&["A", "u1"]],
        &["img", "designer"],
        &["sku", "color", "size"],
        &[&["A"], &["B", "blue"], &["C", "green", "L"]],
    )
    .await;

    let width = out.schema().unwrap().len();
    assert_eq!(width, 5);
    for row in out.rows() {
        assert_eq!(row.len(), width);
    }
    assert_eq!(out.rows()[0], strings(&["A", "", "", "u1", ""]));
}

#[tokio::test]
async fn test_last_auxiliary_record_wins_in_output() {
    let (_, out) = merge(
        &["id", "x"],
        &[&["A", "1"], &["B", "b"], &["A", "2"]],
        &["x"],
        &["id"],
        &[&["A"], &["B"]],
    )
    .await;

    assert_eq!(out.rows()[0], strings(&["A", "2"]));
    assert_eq!(out.rows()[1], strings(&["B", "b"]));
}

#[tokio::test]
async fn test_trimming_applies_on_both_sides() {
    let (_, out) = merge(
        &["sku", "img"],
        &[&[" SKU1 ", "u1"], &["SKU2", "u2"]],
        &["img"],
        &["sku"],
        &[&["SKU1"], &["  SKU2\t"], &["sku1"]],
    )
    .await;

    assert_eq!(out.rows()[0][1], "u1");
    assert_eq!(out.rows()[1][1], "u2");
    // Matching is case-sensitive
    assert_eq!(out.rows()[2][1], "");
}

#[tokio::test]
async fn test_differently_named_key_columns() {
    let mut aux = MemoryReader::from_rows("aux", &["code", "img"], &[&["A", "u1"]]);
    let lookup = build_lookup(&mut aux, "code", strings(&["img"])).await.unwrap();

    let mut primary = MemoryReader::from_rows("primary", &["name", "product_code"], &[&["shirt", "A"]]);
    let mut out = MemoryWriter::new("out");
    let mut joiner = StreamingJoiner::new("product_code", lookup);
    let stats = joiner.run(&mut primary, &mut out).await.unwrap();

    assert_eq!(stats.matched, 1);
    assert_eq!(joiner.state(), JoinState::Completed);
    assert_eq!(out.rows()[0], strings(&["shirt", "A", "u1"]));
}
