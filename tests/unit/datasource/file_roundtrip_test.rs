//! Tests for the CSV file adapters used together
//!
//! Covers: quoting survives a read → write pass, custom delimiters,
//! stdout routing in the sink factory.

use velomerge::velomerge::datasource::file::{
    FileDataSink, FileDataSource, FileSinkConfig, FileSourceConfig,
};
use velomerge::velomerge::datasource::{RecordReader, RecordWriter};

#[tokio::test]
async fn test_quoted_values_survive_copy() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    let content = "sku,title,notes\nA,\"Dress, long\",\"line one\nline two\"\nB,plain,\n";
    std::fs::write(&input, content).unwrap();

    let source = FileDataSource::new(FileSourceConfig::new(input.to_str().unwrap()));
    let sink = FileDataSink::new(FileSinkConfig::new(output.to_str().unwrap()));

    let mut reader = source.create_reader().await.unwrap();
    let mut writer = sink.create_writer().await.unwrap();

    let columns = reader.fetch_columns().await.unwrap();
    writer.write_schema(&columns).await.unwrap();
    while let Some(record) = reader.read().await.unwrap() {
        writer.write(&record.project(&columns)).await.unwrap();
    }
    writer.finalize().await.unwrap();

    assert_eq!(std::fs::read_to_string(&output).unwrap(), content);
    assert_eq!(writer.records_written(), 2);
}

#[tokio::test]
async fn test_semicolon_delimited_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let mut config = FileSinkConfig::new(output.to_str().unwrap());
    config.csv_delimiter = ';';

    let mut writer = FileDataSink::new(config).create_writer().await.unwrap();
    writer
        .write_schema(&["a".to_string(), "b".to_string()])
        .await
        .unwrap();
    writer
        .write(&["1;2".to_string(), "3".to_string()])
        .await
        .unwrap();
    writer.finalize().await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "a;b\n\"1;2\";3\n"
    );
}

#[tokio::test]
async fn test_dash_routes_to_stdout() {
    let sink = FileDataSink::new(FileSinkConfig::new("-"));
    let writer = sink.create_writer().await.unwrap();
    assert_eq!(writer.name(), "<stdout>");
    assert!(!std::path::Path::new("-").exists());
}
