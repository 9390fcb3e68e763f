//! goodlinks-readwise - send GoodLinks highlights to Readwise
//!
//! This crate provides the core functionality for the `glr` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Run configuration from environment and flags
//! - [`model`] - The highlight data type
//! - [`source`] - GoodLinks SQLite reader
//! - [`readwise`] - Readwise payload mapping and HTTP client
//! - [`sync`] - The sync runner
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod readwise;
pub mod source;
pub mod sync;

pub use error::{Error, Result};
