//! Bulk order import for the warehouse management backend
//!
//! Reads order spreadsheets, rebuilds nested orders from merged-cell rows and
//! submits them to the bulk-import endpoint.

pub mod api;
pub mod cli;
pub mod config;
pub mod import;
