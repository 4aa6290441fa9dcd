//! Self sign-up username validation service.
//!
//! Wires the [`selfreg_policy`] decision logic to a config-backed identity
//! backend and exposes it over HTTP and the `selfreg` CLI.

pub mod api;
pub mod backend;
pub mod check;
pub mod config;
pub mod logging;
