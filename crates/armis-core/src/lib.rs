//! Core types and formatting rules for ARMIS personnel dossiers.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! defines the typed personnel records, the pure formatters (age, initials,
//! display heading), the [`store::PersonnelStore`] loader trait and the
//! dossier assembler that joins them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod age;
pub mod context;
pub mod dossier;
pub mod error;
pub mod name;
pub mod record;
pub mod store;

pub use error::{Error, Result};
