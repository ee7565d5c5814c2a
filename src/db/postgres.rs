use async_trait::async_trait;
use log::{debug, warn};
use sqlx::{Connection, PgConnection};

use crate::{
    errors::IntrospectError,
    models::{
        catalog::{ColumnRow, ForeignKeyRow, TableRow},
        connections::ConnectionConfig,
    },
};

use super::CatalogReader;

const TABLES_SQL: &str = r#"
    SELECT
        n.nspname::text AS namespace,
        c.relname::text AS table_name
    FROM pg_catalog.pg_class c
    JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    WHERE c.relkind IN ('r', 'p')
      AND NOT c.relispartition
      AND n.nspname NOT IN ('pg_catalog', 'information_schema')
      AND n.nspname NOT LIKE 'pg\_toast%'
      AND n.nspname NOT LIKE 'pg\_temp\_%'
      AND ($1::text IS NULL OR n.nspname::text = $1)
    ORDER BY n.nspname, c.relname
"#;

const COLUMNS_SQL: &str = r#"
    SELECT
        n.nspname::text AS namespace,
        c.relname::text AS table_name,
        a.attname::text AS column_name,
        t.typname::text AS type_name,
        NOT a.attnotnull AS nullable,
        (pk.indexrelid IS NOT NULL) AS is_primary_key
    FROM pg_catalog.pg_class c
    JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid
                                  AND a.attnum > 0
                                  AND NOT a.attisdropped
    JOIN pg_catalog.pg_type t ON t.oid = a.atttypid
    LEFT JOIN pg_catalog.pg_index pk ON pk.indrelid = c.oid
                                    AND pk.indisprimary
                                    AND a.attnum = ANY (pk.indkey::int2[])
    WHERE c.relkind IN ('r', 'p')
      AND NOT c.relispartition
      AND n.nspname NOT IN ('pg_catalog', 'information_schema')
      AND n.nspname NOT LIKE 'pg\_toast%'
      AND n.nspname NOT LIKE 'pg\_temp\_%'
      AND ($1::text IS NULL OR n.nspname::text = $1)
    ORDER BY n.nspname, c.relname, a.attnum
"#;

// is_unique: some non-partial unique index on the child table has key columns
// exactly equal (as a set) to the constraint's referencing columns.
// Partition copies of a constraint (conparentid <> 0) share its name and are skipped.
const FOREIGN_KEYS_SQL: &str = r#"
    SELECT
        con.conname::text AS constraint_name,
        cn.nspname::text AS from_namespace,
        cc.relname::text AS from_table,
        k.ordinal::int4 AS ordinal,
        ca.attname::text AS from_column,
        pn.nspname::text AS to_namespace,
        pc.relname::text AS to_table,
        pa.attname::text AS to_column,
        EXISTS (
            SELECT 1
            FROM pg_catalog.pg_index ui
            WHERE ui.indrelid = con.conrelid
              AND ui.indisunique
              AND ui.indpred IS NULL
              AND (ui.indkey::int2[])[0:ui.indnkeyatts - 1] @> con.conkey
              AND (ui.indkey::int2[])[0:ui.indnkeyatts - 1] <@ con.conkey
        ) AS is_unique
    FROM pg_catalog.pg_constraint con
    CROSS JOIN LATERAL unnest(con.conkey, con.confkey)
        WITH ORDINALITY AS k(from_attnum, to_attnum, ordinal)
    JOIN pg_catalog.pg_class cc ON cc.oid = con.conrelid
    JOIN pg_catalog.pg_namespace cn ON cn.oid = cc.relnamespace
    JOIN pg_catalog.pg_attribute ca ON ca.attrelid = con.conrelid
                                   AND ca.attnum = k.from_attnum
    JOIN pg_catalog.pg_class pc ON pc.oid = con.confrelid
    JOIN pg_catalog.pg_namespace pn ON pn.oid = pc.relnamespace
    JOIN pg_catalog.pg_attribute pa ON pa.attrelid = con.confrelid
                                   AND pa.attnum = k.to_attnum
    WHERE con.contype = 'f'
      AND con.conparentid = 0
      AND ($1::text IS NULL OR cn.nspname::text = $1)
    ORDER BY con.conname, k.ordinal
"#;

/// Catalog reader over a single PostgreSQL connection.
pub struct PostgresCatalog {
    conn: PgConnection,
}

impl PostgresCatalog {
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, IntrospectError> {
        let options = config
            .connect_options()
            .map_err(|e| IntrospectError::Connection(e.to_string()))?;
        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| IntrospectError::Connection(e.to_string()))?;

        Ok(Self { conn })
    }

    /// Releases the connection. A failed close is logged, not returned: the
    /// reads it guarded have already completed or failed on their own.
    pub async fn close(self) {
        if let Err(e) = self.conn.close().await {
            warn!("Failed to close catalog connection: {}", e);
        }
    }
}

#[async_trait]
impl CatalogReader for PostgresCatalog {
    async fn list_tables(
        &mut self,
        namespace: Option<String>,
    ) -> Result<Vec<TableRow>, IntrospectError> {
        let rows = sqlx::query_as::<_, TableRow>(TABLES_SQL)
            .bind(namespace)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| IntrospectError::Query(e.to_string()))?;
        debug!("Catalog returned {} table row(s)", rows.len());
        Ok(rows)
    }

    async fn list_columns(
        &mut self,
        namespace: Option<String>,
    ) -> Result<Vec<ColumnRow>, IntrospectError> {
        let rows = sqlx::query_as::<_, ColumnRow>(COLUMNS_SQL)
            .bind(namespace)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| IntrospectError::Query(e.to_string()))?;
        debug!("Catalog returned {} column row(s)", rows.len());
        Ok(rows)
    }

    async fn list_foreign_keys(
        &mut self,
        namespace: Option<String>,
    ) -> Result<Vec<ForeignKeyRow>, IntrospectError> {
        let rows = sqlx::query_as::<_, ForeignKeyRow>(FOREIGN_KEYS_SQL)
            .bind(namespace)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| IntrospectError::Query(e.to_string()))?;
        debug!("Catalog returned {} foreign key row(s)", rows.len());
        Ok(rows)
    }
}
