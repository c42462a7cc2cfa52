// Unit tests - Fast tests with no external dependencies

// Datasource tests - CSV reader/writer behavior through the public traits
pub mod datasource;
// Merge tests - Lookup and streaming join properties
pub mod merge;
