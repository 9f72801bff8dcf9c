//! # Codeform Relay
//!
//! The thin server half of Codeform: `POST /api/paraphrase` forwards a prompt to the
//! completion service with the caller's key, and `/` serves the form page.

pub mod server;

pub use server::{RelayServer, RelayState};
