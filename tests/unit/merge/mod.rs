//! Tests for the lookup builder and streaming joiner

pub mod join_properties_test;
