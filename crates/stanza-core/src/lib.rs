//! Core types and configuration for stanza.
//!
//! This crate defines the `stanza.toml` schema ([`StanzaConfig`]), the
//! validated renderer input ([`BuildConfig`]), Node.js project detection
//! ([`NodeProject`]), and shared error types.

pub mod config;
pub mod error;
pub mod project;

pub use config::{
    BuildConfig, BuildSection, CONFIG_FILE, IgnoreConfig, ImageConfig, SourceCopy, StanzaConfig,
    config_template,
};
pub use error::{Error, Result};
pub use project::{NodeProject, PackageManager};
