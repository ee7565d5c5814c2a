//! Turns raw catalog rows into a [`Schema`] snapshot.
//!
//! Tables are admitted first (optionally through a case-insensitive name
//! allow-list), columns are attached to admitted tables only, and foreign key
//! rows are grouped by constraint name into one [`Relationship`] each. Column
//! pairs keep the order the rows arrive in, which the reader guarantees is
//! the constraint's declared ordinal.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::models::{
    catalog::{ColumnRow, ForeignKeyRow, TableRow},
    schema::{qualified_key, Column, Relationship, Schema, Table},
};

struct RelationshipBuilder {
    constraint_name: String,
    from_schema: String,
    from_table: String,
    to_schema: String,
    to_table: String,
    is_unique: bool,
    from_columns: Vec<String>,
    to_columns: Vec<String>,
}

impl RelationshipBuilder {
    fn new(row: &ForeignKeyRow) -> Self {
        Self {
            constraint_name: row.constraint_name.clone(),
            from_schema: row.from_namespace.clone(),
            from_table: row.from_table.clone(),
            to_schema: row.to_namespace.clone(),
            to_table: row.to_table.clone(),
            is_unique: row.is_unique,
            from_columns: Vec::new(),
            to_columns: Vec::new(),
        }
    }

    fn push(&mut self, row: &ForeignKeyRow) {
        self.from_columns.push(row.from_column.clone());
        self.to_columns.push(row.to_column.clone());
    }

    fn build(self) -> Relationship {
        Relationship {
            constraint_name: self.constraint_name,
            from_schema: self.from_schema,
            from_table: self.from_table,
            from_columns: self.from_columns,
            to_schema: self.to_schema,
            to_table: self.to_table,
            to_columns: self.to_columns,
            is_unique: self.is_unique,
        }
    }
}

/// Builds a snapshot from the three row sets.
///
/// `table_filter` of `None` or an empty slice admits every table. When a
/// filter is active, relationships with either endpoint outside the admitted
/// set are dropped entirely.
pub fn assemble(
    table_rows: Vec<TableRow>,
    column_rows: Vec<ColumnRow>,
    fk_rows: Vec<ForeignKeyRow>,
    table_filter: Option<&[String]>,
) -> Schema {
    let allow_list: Option<HashSet<String>> = table_filter
        .filter(|names| !names.is_empty())
        .map(|names| names.iter().map(|n| n.to_lowercase()).collect());

    let mut tables: HashMap<String, Table> = table_rows
        .iter()
        .filter(|row| match &allow_list {
            Some(allowed) => allowed.contains(&row.table_name.to_lowercase()),
            None => true,
        })
        .map(|row| {
            let table = Table::new(&row.namespace, &row.table_name);
            (table.key(), table)
        })
        .collect();

    for row in column_rows {
        let key = qualified_key(&row.namespace, &row.table_name);
        if let Some(table) = tables.get_mut(&key) {
            table.columns.push(Column {
                name: row.column_name,
                data_type: row.type_name,
                is_nullable: row.nullable,
                is_primary_key: row.is_primary_key,
                is_foreign_key: false,
            });
        }
    }

    let mut builders: Vec<RelationshipBuilder> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0usize;

    for row in &fk_rows {
        if allow_list.is_some() {
            let from_key = qualified_key(&row.from_namespace, &row.from_table);
            let to_key = qualified_key(&row.to_namespace, &row.to_table);
            if !tables.contains_key(&from_key) || !tables.contains_key(&to_key) {
                dropped += 1;
                continue;
            }
        }

        let index = *by_name
            .entry(row.constraint_name.clone())
            .or_insert_with(|| {
                builders.push(RelationshipBuilder::new(row));
                builders.len() - 1
            });
        builders[index].push(row);
    }

    if dropped > 0 {
        debug!(
            "Dropped {} foreign key row(s) referencing tables outside the filter",
            dropped
        );
    }

    let relationships: Vec<Relationship> =
        builders.into_iter().map(RelationshipBuilder::build).collect();

    for rel in &relationships {
        if let Some(table) = tables.get_mut(&rel.from_key()) {
            for column in table
                .columns
                .iter_mut()
                .filter(|c| rel.from_columns.contains(&c.name))
            {
                column.is_foreign_key = true;
            }
        }
    }

    Schema {
        tables,
        relationships,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(ns: &str, name: &str) -> TableRow {
        TableRow {
            namespace: ns.to_string(),
            table_name: name.to_string(),
        }
    }

    fn column(table: &str, name: &str, ty: &str, nullable: bool, pk: bool) -> ColumnRow {
        ColumnRow {
            namespace: "dbo".to_string(),
            table_name: table.to_string(),
            column_name: name.to_string(),
            type_name: ty.to_string(),
            nullable,
            is_primary_key: pk,
        }
    }

    fn fk(name: &str, ordinal: i32, from: (&str, &str), to: (&str, &str), unique: bool) -> ForeignKeyRow {
        ForeignKeyRow {
            constraint_name: name.to_string(),
            from_namespace: "dbo".to_string(),
            from_table: from.0.to_string(),
            ordinal,
            from_column: from.1.to_string(),
            to_namespace: "dbo".to_string(),
            to_table: to.0.to_string(),
            to_column: to.1.to_string(),
            is_unique: unique,
        }
    }

    fn catalog() -> (Vec<TableRow>, Vec<ColumnRow>, Vec<ForeignKeyRow>) {
        let tables = vec![table("dbo", "categories"), table("dbo", "items")];
        let columns = vec![
            column("categories", "id", "int", false, true),
            column("categories", "name", "nvarchar", false, false),
            column("items", "id", "int", false, true),
            column("items", "category_id", "int", false, false),
            column("items", "name", "nvarchar", false, false),
        ];
        let fks = vec![fk(
            "FK_items_categories",
            1,
            ("items", "category_id"),
            ("categories", "id"),
            false,
        )];
        (tables, columns, fks)
    }

    #[test]
    fn test_assemble_tables_and_columns_in_order() {
        let (tables, columns, fks) = catalog();
        let schema = assemble(tables, columns, fks, None);

        assert_eq!(schema.tables.len(), 2);
        let items = &schema.tables["dbo.items"];
        let names: Vec<&str> = items.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "category_id", "name"]);
        assert!(items.columns[0].is_primary_key);
        assert!(items.columns[1].is_foreign_key);
        assert!(!items.columns[2].is_foreign_key);
        assert!(!schema.tables["dbo.categories"].columns[0].is_foreign_key);
    }

    #[test]
    fn test_composite_key_grouped_in_ordinal_order() {
        let tables = vec![table("dbo", "lines"), table("dbo", "orders")];
        let columns = vec![
            column("lines", "order_region", "int", false, false),
            column("lines", "order_no", "int", false, false),
        ];
        let fks = vec![
            fk("FK_lines_orders", 1, ("lines", "order_no"), ("orders", "no"), false),
            fk("FK_lines_orders", 2, ("lines", "order_region"), ("orders", "region"), false),
        ];

        let schema = assemble(tables, columns, fks, None);

        assert_eq!(schema.relationships.len(), 1);
        let rel = &schema.relationships[0];
        assert_eq!(rel.from_columns, vec!["order_no", "order_region"]);
        assert_eq!(rel.to_columns, vec!["no", "region"]);
        assert!(schema.tables["dbo.lines"]
            .columns
            .iter()
            .all(|c| c.is_foreign_key));
    }

    #[test]
    fn test_relationships_keep_encounter_order() {
        let tables = vec![table("dbo", "a"), table("dbo", "b")];
        let fks = vec![
            fk("FK_b", 1, ("a", "b_id"), ("b", "id"), false),
            fk("FK_a", 1, ("b", "a_id"), ("a", "id"), true),
        ];

        let schema = assemble(tables, Vec::new(), fks, None);

        let names: Vec<&str> = schema
            .relationships
            .iter()
            .map(|r| r.constraint_name.as_str())
            .collect();
        assert_eq!(names, vec!["FK_b", "FK_a"]);
        assert!(schema.relationships[1].is_unique);
    }

    #[test]
    fn test_filter_is_case_insensitive_and_drops_dangling_relationships() {
        let (tables, columns, fks) = catalog();
        let filter = vec!["ITEMS".to_string()];

        let schema = assemble(tables, columns, fks, Some(filter.as_slice()));

        assert_eq!(schema.tables.len(), 1);
        assert!(schema.tables.contains_key("dbo.items"));
        assert!(schema.relationships.is_empty());
        assert!(schema.tables["dbo.items"]
            .columns
            .iter()
            .all(|c| !c.is_foreign_key));
    }

    #[test]
    fn test_empty_filter_admits_everything() {
        let (tables, columns, fks) = catalog();
        let schema = assemble(tables, columns, fks, Some(&[][..]));

        assert_eq!(schema.tables.len(), 2);
        assert_eq!(schema.relationships.len(), 1);
    }

    #[test]
    fn test_filter_matching_nothing_is_empty_snapshot() {
        let (tables, columns, fks) = catalog();
        let filter = vec!["missing".to_string()];

        let schema = assemble(tables, columns, fks, Some(filter.as_slice()));

        assert!(schema.is_empty());
        assert!(schema.relationships.is_empty());
    }

    #[test]
    fn test_table_without_columns_is_kept() {
        let schema = assemble(vec![table("dbo", "empty")], Vec::new(), Vec::new(), None);

        assert!(schema.tables["dbo.empty"].columns.is_empty());
    }

    #[test]
    fn test_fk_flag_matches_relationship_child_columns() {
        let (tables, columns, fks) = catalog();
        let schema = assemble(tables, columns, fks, None);

        for table in schema.tables.values() {
            for column in table.columns.iter().filter(|c| c.is_foreign_key) {
                assert!(schema.relationships.iter().any(|r| {
                    r.from_key() == table.key() && r.from_columns.contains(&column.name)
                }));
            }
        }
    }
}
