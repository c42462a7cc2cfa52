// Integration tests - Full merges over real files

pub mod merge_job_test;
