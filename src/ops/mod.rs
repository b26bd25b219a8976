//! High-level operations.
//!
//! This module contains the implementation of hostconf commands.

pub mod hostconf_configure;
pub mod machines;
pub mod tools;

pub use hostconf_configure::{
    build_type, configure_host, parse_preference, select_machine, ConfigureRequest,
};
pub use machines::{format_listing, list_machines, MachineListing};
pub use tools::{resolve_tools, ToolStatus};
