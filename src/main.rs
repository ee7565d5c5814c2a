use std::path::PathBuf;
use std::process;

use clap::Parser;
use erdgen::config::AppConfig;
use erdgen::errors::ErdError;
use erdgen::models::connections::Filter;
use erdgen::Summary;

/// Generate a Mermaid ERD from a PostgreSQL database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Only include tables in this schema (e.g. public). Defaults to all schemas.
    #[arg(long, value_name = "SCHEMA")]
    schema: Option<String>,

    /// Comma-separated table names to include. Defaults to all tables.
    #[arg(long, value_name = "TABLE1,TABLE2,...")]
    tables: Option<String>,

    /// Output file path. Defaults to ERD_OUTPUT_PATH or output/erd.md.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

async fn run(cli: Cli) -> Result<Summary, ErdError> {
    let config = AppConfig::from_env()?;
    let filter = Filter::new(
        cli.schema,
        cli.tables.as_deref().and_then(Filter::parse_table_list),
    );
    let output = cli.output.unwrap_or_else(|| config.output_path.clone());

    println!("Connecting to database and introspecting schema...");
    let schema = erdgen::introspect(&config.connection, &filter).await?;
    if schema.is_empty() {
        return Err(ErdError::NoTables);
    }

    println!(
        "Found {} table(s), {} foreign key(s).",
        schema.tables.len(),
        schema.relationships.len()
    );
    erdgen::write_schema(&schema, output)
}

#[tokio::main]
async fn main() {
    env_logger::init();

    match run(Cli::parse()).await {
        Ok(summary) => println!("ERD written to: {}", summary.path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
