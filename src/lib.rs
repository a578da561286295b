//! Sahayak is the conversation core and terminal client for a citizen
//! assistance chat service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the category catalog, per-category message history,
//!   streaming orchestration, and configuration.
//! - [`cli`] parses command-line arguments and runs the interactive chat
//!   loop and the one-shot commands.
//! - [`api`] defines the payload types exchanged with the assistance
//!   backend.
//! - [`utils`] provides URL, text-cleanup, and transcript-logging helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into the chat loop for
//! interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod utils;
