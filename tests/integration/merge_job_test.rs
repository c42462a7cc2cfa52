//! End-to-end merges through `MergeJob` with CSV files on disk

use std::path::Path;
use velomerge::velomerge::config::MergeConfig;
use velomerge::velomerge::merge::MergeJob;
use velomerge::MergeError;

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new(source: &str, target: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("source.csv"), source).unwrap();
        std::fs::write(dir.path().join("target.csv"), target).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_str().unwrap().to_string()
    }

    fn config(&self) -> MergeConfig {
        let mut config = MergeConfig::default();
        config.auxiliary.path = self.path("source.csv");
        config.primary.path = self.path("target.csv");
        config.output.path = self.path("merged_output.csv");
        config
    }

    fn output(&self) -> String {
        std::fs::read_to_string(self.path("merged_output.csv")).unwrap()
    }
}

#[tokio::test]
async fn test_reference_merge() {
    let fixture = Fixture::new(
        "sku,instagramImages,designer\n\
         A,\"https://img/1.jpg,https://img/2.jpg\",D1\n\
         \" C \",https://img/3.jpg,\n",
        "title,sku,color\n\
         Shirt,A,red\n\
         Skirt,B,blue\n\
         Coat,C,\n",
    );

    let summary = MergeJob::new(fixture.config())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.rows(), 3);
    assert_eq!(summary.lookup_keys, 2);
    assert_eq!(summary.join.matched, 2);
    assert_eq!(summary.join.unmatched, 1);
    assert_eq!(
        fixture.output(),
        "title,sku,color,instagramImages,designer\n\
         Shirt,A,red,\"https://img/1.jpg,https://img/2.jpg\",D1\n\
         Skirt,B,blue,,\n\
         Coat,C,,https://img/3.jpg,\n"
    );
}

#[tokio::test]
async fn test_header_only_primary_writes_header() {
    let fixture = Fixture::new("sku,instagramImages,designer\nA,u1,D1\n", "sku,color\n");

    let summary = MergeJob::new(fixture.config())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.rows(), 0);
    assert_eq!(fixture.output(), "sku,color,instagramImages,designer\n");
}

#[tokio::test]
async fn test_empty_auxiliary_keeps_row_count() {
    let fixture = Fixture::new("sku,instagramImages,designer\n", "sku\nA\nB\n");

    let summary = MergeJob::new(fixture.config())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.rows(), 2);
    assert_eq!(summary.lookup_keys, 0);
    assert_eq!(
        fixture.output(),
        "sku,instagramImages,designer\nA,,\nB,,\n"
    );
}

#[tokio::test]
async fn test_missing_auxiliary_file_leaves_no_output() {
    let fixture = Fixture::new("", "sku\nA\n");
    let mut config = fixture.config();
    config.auxiliary.path = fixture.path("does_not_exist.csv");

    let err = MergeJob::new(config).unwrap().run().await.unwrap_err();
    assert!(matches!(err, MergeError::SourceUnavailable { .. }));
    assert!(!Path::new(&fixture.path("merged_output.csv")).exists());
}

#[tokio::test]
async fn test_missing_primary_file_leaves_no_output() {
    let fixture = Fixture::new("sku,instagramImages,designer\n", "");
    let mut config = fixture.config();
    config.primary.path = fixture.path("does_not_exist.csv");

    let err = MergeJob::new(config).unwrap().run().await.unwrap_err();
    assert!(matches!(err, MergeError::SourceUnavailable { .. }));
    assert!(!Path::new(&fixture.path("merged_output.csv")).exists());
}

#[tokio::test]
async fn test_malformed_primary_row_keeps_rows_written_so_far() {
    let fixture = Fixture::new(
        "sku,instagramImages,designer\nA,u1,D1\n",
        "color,sku\nred,A\nblue\ngreen,A\n",
    );

    let err = MergeJob::new(fixture.config())
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, MergeError::MalformedRecord { row: 2, .. }));
    // Output was finalized: header and the first row are on disk
    assert_eq!(
        fixture.output(),
        "color,sku,instagramImages,designer\nred,A,u1,D1\n"
    );
}

#[tokio::test]
async fn test_yaml_config_with_custom_columns() {
    let fixture = Fixture::new(
        "code;image\nX1;a.png\n",
        "name;product_code\nlamp;X1\nchair;X2\n",
    );
    let config_path = fixture.dir.path().join("merge.yaml");
    std::fs::write(
        &config_path,
        "key_column: code\n\
         primary_key_column: product_code\n\
         auxiliary_fields: [image]\n\
         auxiliary:\n  path: source.csv\n  csv_delimiter: \";\"\n\
         primary:\n  path: target.csv\n  csv_delimiter: \";\"\n\
         output:\n  path: merged_output.csv\n",
    )
    .unwrap();

    let config = MergeConfig::from_file(&config_path).unwrap();
    let summary = MergeJob::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.rows(), 2);
    assert_eq!(
        fixture.output(),
        "name,product_code,image\nlamp,X1,a.png\nchair,X2,\n"
    );
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_running() {
    let fixture = Fixture::new("", "");
    let mut config = fixture.config();
    config.auxiliary_fields.clear();

    assert!(MergeJob::new(config).is_err());
    assert!(!Path::new(&fixture.path("merged_output.csv")).exists());
}
