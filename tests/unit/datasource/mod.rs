//! Tests for record sources and sinks

pub mod file_roundtrip_test;
pub mod encoding_test;
