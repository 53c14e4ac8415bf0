//! pagedb demo - builds the student table, indexes it and queries through the
//! bitmap indexes, printing traces along the way.

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use pagedb::access::Record;
use pagedb::{Database, EngineConfig};
use std::path::PathBuf;

/// pagedb demo - paginated record store with bitmap indexes
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Data directory (ignored with --memory)
    #[arg(short = 'D', long, default_value = "./pagedb_data")]
    data_dir: PathBuf,

    /// Keep everything in memory instead of on disk
    #[arg(short, long)]
    memory: bool,

    /// Records per page for newly created tables
    #[arg(short, long, default_value_t = pagedb::config::DEFAULT_PAGE_CAPACITY)]
    page_capacity: usize,

    /// Maximum trace entries kept per table
    #[arg(short, long)]
    trace_retention: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = EngineConfig::default()
        .with_page_capacity(args.page_capacity)
        .with_trace_retention(args.trace_retention);

    let db = if args.memory {
        Database::in_memory(config)
    } else {
        Database::open(&args.data_dir, config).context("Failed to open database")?
    };
    db.reset()?;

    run_demo(&db)
}

fn run_demo(db: &Database) -> Result<()> {
    db.create_table("student", &["id", "name", "major", "semester", "gpa"])?;
    db.insert("student", ["1", "stud1", "CS", "5", "0.9"])?;
    db.insert("student", ["2", "stud2", "BI", "7", "1.2"])?;
    db.insert("student", ["3", "stud3", "CS", "2", "2.4"])?;

    db.create_bitmap_index("student", "gpa")?;
    db.create_bitmap_index("student", "major")?;

    println!(
        "Bitmap of the value of CS from the major index: {}",
        db.get_value_bits("student", "major", "CS")?
    );
    println!(
        "Bitmap of the value of 1.2 from the gpa index: {}",
        db.get_value_bits("student", "gpa", "1.2")?
    );

    db.insert("student", ["4", "stud4", "CS", "9", "1.2"])?;
    db.insert("student", ["5", "stud5", "BI", "4", "3.5"])?;

    println!("After new insertions:");
    println!(
        "Bitmap of the value of CS from the major index: {}",
        db.get_value_bits("student", "major", "CS")?
    );
    println!(
        "Bitmap of the value of 1.2 from the gpa index: {}",
        db.get_value_bits("student", "gpa", "1.2")?
    );

    let queries: [(&str, &[&str], &[&str]); 3] = [
        ("all columns indexed", &["major", "gpa"], &["CS", "1.2"]),
        ("one column indexed", &["major", "semester"], &["CS", "5"]),
        ("some columns indexed", &["major", "semester", "gpa"], &["CS", "5", "0.9"]),
    ];
    for (label, cols, vals) in queries {
        println!("Selection using index ({}):", label);
        print_records(&db.select_index("student", cols, vals)?);
        println!("Last trace of the table: {}", db.get_last_trace("student")?);
        println!("--------------------------------");
    }

    let missing = db.validate("student")?;
    db.recover("student", &missing)?;

    println!("Full trace of the table:");
    println!("{}", db.get_full_trace("student")?);
    println!("--------------------------------");
    println!("Contents of the store:");
    println!("{}", db.storage_trace()?);

    Ok(())
}

fn print_records(records: &[Record]) {
    for record in records {
        println!("{}", record.fields().join(" "));
    }
}
