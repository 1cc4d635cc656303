//! tutor-proxy: server side of the AI tutor.
//!
//! The library exposes every module so integration tests under `tests/`
//! can build servers and providers directly.

pub mod app;
pub mod cli;
pub mod config;
pub mod paths;
pub mod provider;
pub mod server;
pub mod tutor;
