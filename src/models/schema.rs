use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Joins a namespace and table name into the `namespace.name` lookup key.
pub fn qualified_key(namespace: &str, name: &str) -> String {
    format!("{}.{}", namespace, name)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
    /// Only set once the owning relationship has been resolved.
    pub is_foreign_key: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub schema: String,
    /// Catalog order, which is also diagram attribute order.
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(schema: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            schema: schema.to_string(),
            columns: Vec::new(),
        }
    }

    pub fn key(&self) -> String {
        qualified_key(&self.schema, &self.name)
    }
}

/// A resolved foreign key. `from_columns[i]` pairs with `to_columns[i]`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Relationship {
    pub constraint_name: String,
    pub from_schema: String,
    pub from_table: String,
    pub from_columns: Vec<String>,
    pub to_schema: String,
    pub to_table: String,
    pub to_columns: Vec<String>,
    /// Child columns exactly match a unique index: one-to-one.
    pub is_unique: bool,
}

impl Relationship {
    pub fn from_key(&self) -> String {
        qualified_key(&self.from_schema, &self.from_table)
    }

    pub fn to_key(&self) -> String {
        qualified_key(&self.to_schema, &self.to_table)
    }
}

/// One point-in-time result of the introspection pipeline.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct Schema {
    pub tables: HashMap<String, Table>,
    pub relationships: Vec<Relationship>,
}

impl Schema {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
