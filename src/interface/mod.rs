//! # Interface Layer
//!
//! Command handlers that turn engine outcomes into chat replies.

pub mod commands;
