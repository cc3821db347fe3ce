//! salespipe: a scheduled ETL pipeline for sales records
//!
//! Extracts raw sales rows from a configured source (delimited file
//! or HTTP JSON API), normalizes them into a canonical schema, and
//! appends them idempotently to a SQLite store on a fixed cadence.

pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod load;
pub mod pipeline;
pub mod record;
pub mod schedule;
pub mod store;
pub mod transform;
