//! missions - a local tracker for users and their tasks
//!
//! This crate provides the core functionality for the `missions` CLI tool.
//!
//! # Architecture
//!
//! - [`storage`] - SQLite schema and the repository operations
//! - [`model`] - Data types (User, Task, Outcome)
//! - [`validate`] - Input validation shared by storage and CLI
//! - [`cli`] - Command-line interface and interactive menu using clap
//! - [`config`] - Database path resolution
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};
