//! Parse a sheet's CSV export and print the content model
use std::path::PathBuf;

use clap::Parser;
use sheet_content_loader::fetcher::SheetFetcher;
use sheet_content_loader::schema::SectionSchema;
use sheet_content_loader::section::SectionId;
use sheet_content_loader::sheet::{parse_sheet, SheetData};

#[derive(Parser)]
#[command(name = "inspect-sheet")]
#[command(about = "Parse a sheet CSV export and print it as JSON", long_about = None)]
struct Cli {
    /// Local CSV file to parse
    #[arg(conflicts_with = "section")]
    file: Option<PathBuf>,

    /// Fetch this section from SHEET_BASE_URL instead of reading a file
    #[arg(long)]
    section: Option<SectionId>,

    /// Sheet export URL prefix
    #[arg(long, env = "SHEET_BASE_URL")]
    sheet_base_url: Option<String>,

    /// Apply the section's schema (defaults and required columns)
    #[arg(long)]
    validate_as: Option<SectionId>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let data: SheetData = match (&cli.file, cli.section) {
        (Some(path), _) => {
            println!("Reading sheet from: {}", path.display());
            parse_sheet(&std::fs::read_to_string(path)?)
        }
        (None, Some(section)) => {
            let base_url = cli
                .sheet_base_url
                .clone()
                .ok_or("--sheet-base-url or SHEET_BASE_URL is required with --section")?;
            let fetcher = SheetFetcher::new(base_url);
            println!("Fetching sheet: {}", fetcher.sheet_url(section.as_str()));
            fetcher.fetch_sheet(section.as_str()).await?
        }
        (None, None) => return Err("Provide a CSV file or --section".into()),
    };

    let data = match cli.validate_as.or(cli.section) {
        Some(section) => SectionSchema::for_section(section).apply(section, data)?,
        None => data,
    };

    println!("\nConfig entries: {}", data.config().len());
    match &data {
        SheetData::Items { items, .. } => println!("Shape: single table, {} records", items.len()),
        SheetData::Tables { tables, .. } => {
            println!("Shape: {} tables", tables.len());
            for (i, table) in tables.iter().enumerate() {
                println!("  {i}: '{}' ({} records)", table.heading, table.items.len());
            }
        }
    }

    println!("\n{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
