//! Core library for the `volley` controller daemon.
//!
//! This crate provides the building blocks used by the binary: the job
//! lifecycle engine that fans out concurrent probe loops, the worker
//! registry that issues and persists fleet identities, first-run
//! configuration, and the JSON control API served over plain TCP. The
//! primary user-facing interface is the `volley` daemon; library APIs may
//! evolve as it grows.
pub mod args;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod logger;
pub mod registry;
pub mod server;
pub mod shutdown;
