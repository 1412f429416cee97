//! Example: Feeding snapshots via a channel
//!
//! This example demonstrates how to integrate dq-doctor into your own
//! application by sending snapshots through a channel.
//!
//! This is useful when you want to:
//! - Push snapshots straight from a warehouse export job
//! - Generate synthetic data for testing
//! - Bridge from any async data source
//!
//! # Usage
//!
//! ```bash
//! cargo run --example channel_source
//! ```

use std::thread;
use std::time::Duration;

use dq_doctor::{ChannelSource, DataSource, PipelineRow, QualitySnapshot};

fn main() {
    println!("Channel source example");
    println!("Generating synthetic quality data...\n");

    // Create a channel source - this returns both a sender and the source
    let (tx, mut source) = ChannelSource::create("synthetic-data");

    // Spawn a thread to generate synthetic snapshots
    thread::spawn(move || {
        let mut counter = 0u64;

        loop {
            counter += 1;

            // Build a synthetic snapshot: one source drifts stale over time
            let snapshot = QualitySnapshot {
                pipelines: vec![
                    PipelineRow {
                        source_system: "crm".to_string(),
                        table_id: "accounts".to_string(),
                        row_count: 120_000 + counter * 50,
                        last_sync_at: None,
                        hours_since_sync: 2.0,
                    },
                    PipelineRow {
                        source_system: "erp".to_string(),
                        table_id: "orders".to_string(),
                        row_count: 800_000,
                        last_sync_at: None,
                        hours_since_sync: 20.0 + counter as f64,
                    },
                ],
                ..Default::default()
            };

            // Send the snapshot
            if tx.send(snapshot).is_err() {
                break; // Receiver dropped
            }

            thread::sleep(Duration::from_secs(1));
        }
    });

    // Poll the source in the main thread
    println!("Receiving snapshots (press Ctrl+C to stop):\n");

    loop {
        if let Some(snapshot) = source.poll() {
            println!("Received snapshot:");
            for row in &snapshot.pipelines {
                println!(
                    "  {} / {}: {} rows, {:.1}h since sync",
                    row.source_system, row.table_id, row.row_count, row.hours_since_sync
                );
            }
            println!();
        }

        thread::sleep(Duration::from_millis(100));
    }
}
