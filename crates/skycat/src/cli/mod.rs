//! CLI module for skycat
//!
//! Each subcommand builds a catalog, runs one query against it and prints
//! the result as a table or as JSON.

pub mod error;
pub mod output;

pub mod check_template;
pub mod list;
pub mod lookup;
pub mod new;
