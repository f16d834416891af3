//! TaskFlow core: a single-user task tracker over a local key-value store.
//!
//! The crate is split into the credential/session store (`auth`), the task
//! engine (`tasks`) and the persistence layer (`store`). The binary in
//! `main.rs` is a thin CLI over these modules.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod ids;
pub mod store;
pub mod tasks;

pub use error::{Error, Result};
