//! CLI handlers.
//!
//! - [`monitor`]: Monitor a pull request until it settles
//!
//! Output formatting utilities are in [`output`].

pub mod monitor;
pub mod output;
