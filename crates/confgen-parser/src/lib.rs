//! confgen Parser - Structural parser for CLI-style device configurations
//!
//! This crate decomposes raw hierarchical configuration text into typed
//! [`ModuleBlock`](confgen_core::ModuleBlock) values: path-addressed headers,
//! indented sub-lines, action commands, and multi-line certificate/script
//! imports. Detection of the device form factor (VA/SA/VX/vADC) runs once
//! per file and is stamped onto every block.

pub mod config_parser;
pub mod error;
pub mod form_factor;
pub mod stats;

pub use config_parser::{parse_file, ConfigParser};
pub use error::{ParseError, Result};
pub use stats::{modules_by_path, modules_by_type, ParseStats};
