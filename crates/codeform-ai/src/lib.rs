//! # Codeform AI
//!
//! Network clients for the Codeform workspace:
//!
//! - [`CompletionClient`]: talks to an OpenAI-compatible chat completions endpoint
//!   on behalf of the relay, using the caller's key.
//! - [`HttpTransport`]: the form's side of the relay call.
//!
//! ## Example
//!
//! ```rust,ignore
//! use codeform_ai::CompletionClient;
//! use codeform_core::{CodeformConfig, Credential};
//!
//! let client = CompletionClient::new(&CodeformConfig::from_env())?;
//! let reply = client.complete("write a button", &Credential::from("sk-...")).await?;
//! ```

pub mod openai;
pub mod relay;

pub use openai::{CompletionClient, UpstreamReply};
pub use relay::HttpTransport;

/// Re-export core types for convenience.
pub use codeform_core::{CodeformConfig, CodeformError, Credential, RelayTransport, Result};
