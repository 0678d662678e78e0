//! Command handlers, kept out of main.rs so they can be tested
//!
//! Each handler module holds the execution logic for one subcommand plus
//! the pure helpers it is built from.

pub mod config;
pub mod list;
pub mod run;

pub use config::{execute_config, render_config};
pub use list::{execute_list, list_scenarios};
pub use run::{execute_run, resolve_config, select_scenarios};
