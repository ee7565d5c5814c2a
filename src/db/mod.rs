use crate::{
    errors::IntrospectError,
    models::catalog::{ColumnRow, ForeignKeyRow, TableRow},
};
use async_trait::async_trait;

pub mod postgres;

/// Read-only access to a relational catalog. Each call returns rows in the
/// order the assembler relies on. `namespace`, when set, is an exact match.
#[async_trait]
pub trait CatalogReader {
    /// User tables ordered by (namespace, table_name).
    async fn list_tables(
        &mut self,
        namespace: Option<String>,
    ) -> Result<Vec<TableRow>, IntrospectError>;
    /// Columns ordered by (namespace, table_name, catalog position).
    async fn list_columns(
        &mut self,
        namespace: Option<String>,
    ) -> Result<Vec<ColumnRow>, IntrospectError>;
    /// One row per constraint column pair, ordered by (constraint_name, ordinal).
    async fn list_foreign_keys(
        &mut self,
        namespace: Option<String>,
    ) -> Result<Vec<ForeignKeyRow>, IntrospectError>;
}
