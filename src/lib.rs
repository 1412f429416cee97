// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # dq-doctor
//!
//! A data-quality TUI and library for monitoring warehouse pipeline health.
//!
//! This crate watches quality snapshots exported from a data warehouse
//! (pipeline sync times, CRM match and coverage statistics, account field
//! completeness) and renders them in an interactive terminal UI with a
//! single blended health score.
//!
//! ## Architecture
//!
//! The crate is organized into five main modules:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(scoring) │    │(render) │    │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── FileSource | ChannelSource | AutomationFetcher
//! │  │ (input) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with
//!   implementations for file polling and channel input, plus the optional
//!   workflow-automation API fetcher
//! - **[`data`]**: Data models and processing - classifies freshness and metric
//!   statuses against configurable thresholds, computes the weighted health
//!   score, and tracks history for sparklines
//! - **[`ui`]**: Terminal rendering using ratatui - overview cards and tables,
//!   freshness and automation views, and theme support
//! - **[`config`]**: Layered configuration (TOML file plus `DQDOCTOR_`
//!   environment overrides) with validation
//!
//! ## Features
//!
//! - **Overview**: Headline metrics and all sources with freshness status
//! - **Freshness triage**: Stale sources listed worst-first
//! - **Automation health**: Sync connections, workflows, recent executions
//! - **Historical tracking**: Sparklines and row-rate calculations
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a quality snapshot file (produced by a warehouse export job)
//! dq-doctor --file quality.json
//!
//! # With a config file for thresholds and API credentials
//! dq-doctor --file quality.json --config dq-doctor.toml
//! ```
//!
//! ### As a library with file source
//!
//! ```
//! use dq_doctor::{App, DashboardConfig, FileSource};
//!
//! let source = Box::new(FileSource::new("quality.json"));
//! let app = App::new(source, DashboardConfig::default());
//! ```
//!
//! ### As a library with channel source (for embedding)
//!
//! ```
//! use dq_doctor::{App, ChannelSource, DashboardConfig};
//!
//! // Create a channel for pushing snapshots
//! let (tx, source) = ChannelSource::create("warehouse export");
//!
//! // Create the app
//! let app = App::new(Box::new(source), DashboardConfig::default());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use crate::config::DashboardConfig;
pub use data::{
    compute_health_score, DuplicatePenalty, FreshnessStatus, QualityData, ScoreWeights,
    SourceData, StatusLabel, Thresholds,
};
pub use source::{
    AccountStats, AutomationFetcher, ChannelSource, DataSource, FileSource, MatchStats,
    PipelineRow, QualitySnapshot,
};
