use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use parchi::{Category, EntryStatus, EntryStore, NewEntry, NewPayment};

/// A utility for creating a test database for the Parchi web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let mut store = EntryStore::load(conn)?;

    println!("Creating demo entries...");

    let demo_entries = [
        NewEntry::new(Category::ChequeReceivables, "2025-01-10", "Khan Traders", 150_000.0)
            .bank_name("HBL")
            .ref_no("CHQ-10231")
            .due_date("2025-02-10"),
        NewEntry::new(Category::ChequeReceivables, "2025-02-03", "Noor Textiles", 82_500.0)
            .bank_name("Meezan Bank")
            .ref_no("CHQ-55120")
            .status(EntryStatus::Overdue),
        NewEntry::new(Category::ChequePayables, "2025-02-15", "City Suppliers", 64_000.0)
            .bank_name("UBL Bank")
            .ref_no("CHQ-00871"),
        NewEntry::new(Category::LongTermPayables, "2024-11-01", "Shop Rent", 600_000.0)
            .status(EntryStatus::Active),
        NewEntry::new(Category::LongTermReceivables, "2024-12-20", "Ali Brothers", 250_000.0)
            .status(EntryStatus::Active),
        NewEntry::new(Category::UnknownOnline, "2025-03-01", "", 18_750.0).bank_name("Alfalah Bank"),
        NewEntry::new(Category::UnknownOnline, "2025-03-02", "", 9_200.0).bank_name("HBL"),
    ];

    let mut ids = Vec::with_capacity(demo_entries.len());
    for new_entry in demo_entries {
        ids.push(store.add_entry(new_entry)?.id.clone());
    }

    println!("Recording demo payments...");

    store.record_payment(&ids[0], NewPayment::new("2025-02-12", 150_000.0))?;
    store.record_payment(&ids[3], NewPayment::new("2024-12-01", 50_000.0))?;
    store.record_payment(&ids[3], NewPayment::new("2025-01-01", 50_000.0))?;
    store.record_payment(&ids[4], NewPayment::new("2025-02-01", 100_000.0))?;
    store.confirm_unknown(&ids[6], "Hassan Stores", "Admin")?;

    println!("Success!");

    Ok(())
}
