//! Utility to print a user-day's summary and the adherence report as JSON
//!
//! Usage: daily_report <user_id> [date] [window_days]

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing_subscriber::EnvFilter;

use nutrilog::services::{diary, reports};

fn get_database_path() -> PathBuf {
    std::env::var("NUTRILOG_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("nutrilog.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: daily_report <user_id> [date] [window_days]");
        std::process::exit(1);
    }

    let user_id: i64 = args[1].parse()?;
    let date: NaiveDate = match args.get(2) {
        Some(s) => s.parse()?,
        None => Local::now().date_naive(),
    };
    let window_days: i64 = match args.get(3) {
        Some(s) => s.parse()?,
        None => 30,
    };

    let db = nutrilog::db::Database::new(get_database_path())?;
    db.with_conn(|conn| nutrilog::db::migrations::run_migrations(conn))?;

    let summary = diary::day_summary(&db, user_id, date)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    let report = reports::adherence_report_as_of(&db, user_id, window_days, date)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
