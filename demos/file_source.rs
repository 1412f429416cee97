//! Example: Watching a quality snapshot file
//!
//! This example demonstrates how to use dq-doctor to watch a quality
//! snapshot exported from a data warehouse, without the TUI.
//!
//! The file should contain a JSON object with a `pipelines` array plus
//! optional `crm_match`, `crm_accounts`, and automation sections.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example file_source -- path/to/quality.json
//! ```

use std::env;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use dq_doctor::{DataSource, FileSource};

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example file_source -- <path-to-quality.json>");
        eprintln!();
        eprintln!("The file should contain a JSON snapshot in the format:");
        eprintln!(r#"  {{"pipelines": [{{"source_system": "...", "table_id": "...", ...}}]}}"#);
        std::process::exit(1);
    });

    println!("Watching file: {}", path);
    println!("Press Ctrl+C to stop\n");

    let mut source = FileSource::new(&path);

    loop {
        match source.poll() {
            Some(snapshot) => {
                println!("Snapshot received with {} pipelines:", snapshot.pipelines.len());
                for row in &snapshot.pipelines {
                    println!(
                        "  - {} / {}: {} rows, synced {:.1}h ago",
                        row.source_system, row.table_id, row.row_count, row.hours_since_sync
                    );
                }
                if let Some(ref m) = snapshot.crm_match {
                    println!(
                        "  CRM match rate: {}",
                        m.match_rate_pct.map(|r| format!("{:.1}%", r)).unwrap_or("n/a".into())
                    );
                }
                println!();
            }
            None => {
                if let Some(err) = source.error() {
                    eprint!("\rError: {}  ", err);
                } else {
                    print!("\rWaiting for changes...  ");
                }
                io::stdout().flush().unwrap();
            }
        }

        thread::sleep(Duration::from_millis(500));
    }
}
