pub mod catalog;
pub mod connections;
pub mod schema;
