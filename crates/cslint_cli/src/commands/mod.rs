pub mod cache;
pub mod lint;
