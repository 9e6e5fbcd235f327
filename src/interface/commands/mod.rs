//! # Command Handlers
//!
//! Contains specific handler functions for each supported command (add, erase, check, sum, list, help).
//! These handlers are invoked by the Router.

pub mod help;
pub mod reports;
pub mod users;
