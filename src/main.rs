use anyhow::Result;
use rusqlite::Connection;
use std::env;

use rickllow::{list, seed_demo_data, setup_database};

/// Database path: RICKLLOW_DB env var, or rickllow.db beside the binary.
fn db_path() -> String {
    env::var("RICKLLOW_DB").unwrap_or_else(|_| "rickllow.db".to_string())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "init" {
        run_init()?;
    } else {
        run_list()?;
    }

    Ok(())
}

fn run_init() -> Result<()> {
    let path = db_path();
    println!("Initializing catalog database at {}", path);

    let conn = Connection::open(&path)?;
    setup_database(&conn)?;
    seed_demo_data(&conn)?;

    let count = list(&conn, None)?.len();
    println!("✓ Schema created, {} demo locations seeded", count);

    Ok(())
}

fn run_list() -> Result<()> {
    let path = db_path();
    let conn = Connection::open(&path)?;

    let locations = list(&conn, None)?;

    if locations.is_empty() {
        eprintln!("No locations found in {}.", path);
        eprintln!("   Run: cargo run init");
        eprintln!("   to create and seed the database first.");
        std::process::exit(1);
    }

    println!("{} locations in {}:\n", locations.len(), path);
    for loc in &locations {
        println!(
            "  {:<24} {:>12.2}  ({} {:.2})  image: {}",
            loc.name,
            loc.cost,
            loc.alt_cost_currency,
            loc.alt_cost_amount,
            loc.image.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
