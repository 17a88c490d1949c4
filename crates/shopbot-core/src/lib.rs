//! Core domain + application logic for the catalog bot.
//!
//! This crate is framework-agnostic. Telegram and PostgreSQL live behind ports
//! (traits) implemented in adapter crates.

pub mod activity;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod presenter;

pub use errors::{Error, Result};
