use sqlx::FromRow;

// Raw rows as returned by the catalog reader, before assembly.

#[derive(FromRow, Debug, Clone, PartialEq)]
pub struct TableRow {
    pub namespace: String,
    pub table_name: String,
}

#[derive(FromRow, Debug, Clone, PartialEq)]
pub struct ColumnRow {
    pub namespace: String,
    pub table_name: String,
    pub column_name: String,
    pub type_name: String,
    pub nullable: bool,
    pub is_primary_key: bool,
}

/// One (constraint, column pair) row; composite constraints span several rows.
#[derive(FromRow, Debug, Clone, PartialEq)]
pub struct ForeignKeyRow {
    pub constraint_name: String,
    pub from_namespace: String,
    pub from_table: String,
    pub ordinal: i32,
    pub from_column: String,
    pub to_namespace: String,
    pub to_table: String,
    pub to_column: String,
    pub is_unique: bool,
}
