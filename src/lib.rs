//! # synscrape: thesaurus scraper
//!
//! Pops words from a text-file queue, scrapes their synonym pages, and
//! upserts a words / parts of speech / meanings / synonym-links graph into
//! SQLite.
//!
//! ## Architecture
//!
//! - **[`config`]**: JSON configuration loading and validation
//! - **[`queue`]**: Line-oriented work queue of pending words
//! - **[`fetcher`]**: Page fetching and embedded-state extraction
//! - **[`document`]**: Raw meaning documents as scraped
//! - **[`normalize`]**: Raw documents → persistable meaning fragments
//! - **[`db`]**: SQLite schema, insert-if-absent upserts, read-back queries
//! - **[`error_log`]**: Append-only per-word failure log
//! - **[`pipeline`]**: Batch driver tying the above together

pub mod config;
pub mod db;
pub mod document;
pub mod error_log;
pub mod fetcher;
pub mod normalize;
pub mod pipeline;
pub mod queue;
