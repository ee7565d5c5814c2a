use std::path::PathBuf;

use config::AppConfig;
use db::{postgres::PostgresCatalog, CatalogReader};
use errors::{ErdError, IntrospectError};
use log::info;
use models::{
    connections::{ConnectionConfig, Filter},
    schema::Schema,
};

pub mod assembler;
pub mod config;
pub mod db;
pub mod diagram;
pub mod errors;
pub mod models;
pub mod output;
pub mod viewer;

pub use diagram::render;

/// Reads the three catalog row sets from `reader` and assembles a snapshot.
/// Nothing is returned unless every query succeeds.
pub async fn introspect_with<R>(reader: &mut R, filter: &Filter) -> Result<Schema, IntrospectError>
where
    R: CatalogReader + Send + ?Sized,
{
    let namespace = &filter.namespace;

    let tables = reader.list_tables(namespace.clone()).await?;
    let columns = reader.list_columns(namespace.clone()).await?;
    let foreign_keys = reader.list_foreign_keys(namespace.clone()).await?;

    Ok(assembler::assemble(
        tables,
        columns,
        foreign_keys,
        filter.tables.as_deref(),
    ))
}

/// Opens one catalog connection, introspects, and closes the connection
/// whether or not the queries succeeded.
pub async fn introspect(
    connection: &ConnectionConfig,
    filter: &Filter,
) -> Result<Schema, IntrospectError> {
    let mut catalog = PostgresCatalog::connect(connection).await?;
    let result = introspect_with(&mut catalog, filter).await;
    catalog.close().await;

    let schema = result?;
    info!(
        "Introspected {} table(s), {} foreign key(s)",
        schema.tables.len(),
        schema.relationships.len()
    );
    Ok(schema)
}

/// Outcome of a successful regeneration.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub tables: usize,
    pub relationships: usize,
    pub path: PathBuf,
}

/// Renders `schema` and overwrites the artifact at `path`.
pub fn write_schema(schema: &Schema, path: PathBuf) -> Result<Summary, ErdError> {
    output::write_artifact(&path, &render(schema))?;
    Ok(Summary {
        tables: schema.tables.len(),
        relationships: schema.relationships.len(),
        path,
    })
}

/// Full pipeline: introspect, render, and write the artifact.
pub async fn regenerate(config: &AppConfig, filter: &Filter) -> Result<Summary, ErdError> {
    let schema = introspect(&config.connection, filter).await?;
    write_schema(&schema, config.output_path.clone())
}
