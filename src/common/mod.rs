//! # Common Components
//!
//! Ambient utilities shared by the library and the `stegvault` binary.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration loading
//! - [`logging`]: `env_logger` setup with the project's line format

pub mod config;
pub mod logging;
