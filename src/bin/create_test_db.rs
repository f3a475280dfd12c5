use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use spendlog::{Expense, ExpenseId, ExpenseStore, SQLiteKeyValueStore};

/// A utility for creating a database with sample expenses for spendlog.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of expenses to create, ending today.
    #[arg(long, default_value_t = 60)]
    days: i64,
}

const SAMPLE_ITEMS: [(&str, f64); 8] = [
    ("Coffee", 4.5),
    ("Lunch", 12.0),
    ("Groceries", 54.35),
    ("Taxi", 18.75),
    ("Snacks", 3.2),
    ("Dinner", 27.9),
    ("Books", 15.0),
    ("Electricity bill", 82.4),
];

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
    let mut store = ExpenseStore::open(SQLiteKeyValueStore::new(conn)?);

    println!("Creating sample expenses...");

    let now = OffsetDateTime::now_utc();
    let mut records = Vec::new();

    for day in 0..args.days {
        // A varying number of expenses per day, with some days left empty.
        let count = (day * 7 + 3) % 4;

        for index in 0..count {
            let (description, base_amount) = SAMPLE_ITEMS[((day + index * 3) % 8) as usize];
            let amount = base_amount * (1.0 + ((day + index) % 5) as f64 / 10.0);
            let date = now - Duration::days(day) - Duration::hours(index * 3);

            records.push(Expense {
                id: ExpenseId::generate(date, &records),
                description: description.to_owned(),
                amount: (amount * 100.0).round() / 100.0,
                date,
            });
        }
    }

    let created = store.import(records);

    println!("Created {created} expenses.");
    println!("Success!");

    Ok(())
}
