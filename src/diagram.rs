//! Mermaid `erDiagram` rendering.

use crate::models::schema::{Column, Relationship, Schema};

/// Marker that opens and closes a fenced block.
pub const FENCE: &str = "```";
pub const FENCE_OPEN: &str = "```mermaid";
pub const FENCE_CLOSE: &str = FENCE;

const ONE_TO_ONE: &str = "||--||";
const ONE_TO_MANY: &str = "||--o{";

fn column_line(column: &Column) -> String {
    let mut parts = vec![column.data_type.as_str(), column.name.as_str()];
    if column.is_primary_key {
        parts.push("PK");
    }
    if column.is_foreign_key {
        parts.push("FK");
    }
    // Mermaid has no nullable key token, so it goes in the comment slot.
    if column.is_nullable {
        parts.push("\"nullable\"");
    }
    format!("        {}", parts.join(" "))
}

fn relationship_line(rel: &Relationship) -> String {
    let notation = if rel.is_unique { ONE_TO_ONE } else { ONE_TO_MANY };
    format!(
        "    {} {} {} : \"{}\"",
        rel.to_table,
        notation,
        rel.from_table,
        rel.from_columns.join(", ")
    )
}

/// Renders the snapshot as a fenced Mermaid block.
///
/// Entities are emitted in qualified-key order so the same snapshot always
/// yields the same text; relationships keep their snapshot order.
pub fn render(schema: &Schema) -> String {
    let mut lines = vec![FENCE_OPEN.to_string(), "erDiagram".to_string()];

    let mut keys: Vec<&String> = schema.tables.keys().collect();
    keys.sort();

    for key in keys {
        let table = &schema.tables[key];
        lines.push(format!("    {} {{", table.name));
        lines.extend(table.columns.iter().map(column_line));
        lines.push("    }".to_string());
    }

    lines.push(String::new());

    lines.extend(schema.relationships.iter().map(relationship_line));

    lines.push(FENCE_CLOSE.to_string());
    lines.join("\n")
}
