//! Inputs that are not clean UTF-8
//!
//! Covers: Latin-1 bytes in the primary and auxiliary files are replaced
//! with U+FFFD and every row is still merged.

use velomerge::velomerge::datasource::file::{
    FileDataSink, FileDataSource, FileSinkConfig, FileSourceConfig,
};
use velomerge::velomerge::merge::{build_lookup, stream_join};

#[tokio::test]
async fn test_latin1_bytes_do_not_stop_the_merge() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.csv");
    let target = dir.path().join("target.csv");
    let output = dir.path().join("merged_output.csv");
    std::fs::write(&source, b"sku,designer\nA,Ren\xE9e\n").unwrap();
    std::fs::write(&target, b"sku,title\nA,Caf\xE9\nB,Tea\n").unwrap();

    let mut aux = FileDataSource::new(FileSourceConfig::new(source.to_str().unwrap()))
        .create_reader()
        .await
        .unwrap();
    let lookup = build_lookup(aux.as_mut(), "sku", vec!["designer".to_string()])
        .await
        .unwrap();

    let mut primary = FileDataSource::new(FileSourceConfig::new(target.to_str().unwrap()))
        .create_reader()
        .await
        .unwrap();
    let mut writer = FileDataSink::new(FileSinkConfig::new(output.to_str().unwrap()))
        .create_writer()
        .await
        .unwrap();

    let rows = stream_join(primary.as_mut(), "sku", lookup, writer.as_mut())
        .await
        .unwrap();

    assert_eq!(rows, 2);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "sku,title,designer\nA,Caf\u{FFFD},Ren\u{FFFD}e\nB,Tea,\n"
    );
}
