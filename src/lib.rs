//! tsk - Personal Task List
//!
//! This library provides the core functionality for the tsk CLI tool: a
//! single-owner to-do list over a pluggable storage backend.
//!
//! # Core Concepts
//!
//! - **Tasks**: Records with title, priority, and optional due date
//! - **Collection**: The in-memory list for one owner, loaded as a unit
//! - **Backends**: Local per-owner files or a hosted HTTP table
//! - **Sessions**: A persisted owner identity between invocations
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `task`: Task records, priorities, and creation drafts
//! - `filter`: Pure display filtering of a collection
//! - `store`: The in-memory collection and its mutation rules
//! - `form`: Creation form state and submission lock
//! - `backend`: Storage contract plus local, remote, and memory backends
//! - `session`: Owner identity resolution and sign-in state
//! - `lock`: File locking and atomic writes for the local backend
//! - `ui`: Interactive terminal view

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod form;
pub mod lock;
pub mod output;
pub mod session;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
