pub mod types;
pub mod versioning;
