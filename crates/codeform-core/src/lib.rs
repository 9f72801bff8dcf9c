//! # Codeform Core
//!
//! The "Get Code" form as a plain state machine, independent of any surface.
//!
//! ## Features
//!
//! - Form controller with validation, loading flag and response fencing
//! - Prompt construction for the six supported UI libraries
//! - Relay wire types and response classification
//! - Notice queue, clipboard port and configuration
//!
//! ## Example
//!
//! ```rust,ignore
//! use codeform_core::{FormController, LibraryMode};
//! use codeform_ai::HttpTransport;
//!
//! let transport = HttpTransport::new("http://127.0.0.1:3000/api/paraphrase")?;
//! let mut form = FormController::new();
//! form.set_credential("sk-...");
//! form.set_source_text("a login button");
//! form.set_library(LibraryMode::Mui);
//!
//! form.submit(&transport).await?;
//! println!("{}", form.output().unwrap_or_default());
//! ```

pub mod clipboard;
pub mod config;
pub mod credential;
pub mod error;
pub mod form;
pub mod library;
pub mod prompt;
pub mod toast;
pub mod transport;
pub mod wire;
pub mod words;

pub use clipboard::{Clipboard, MemoryClipboard, Osc52Clipboard};
pub use config::{CodeformConfig, OPENAI_CHAT_COMPLETIONS_URL, RELAY_PATH};
pub use credential::Credential;
pub use error::{CodeformError, Result};
pub use form::{Dispatch, FormController, FormPhase, Rejection, Settlement};
pub use library::LibraryMode;
pub use prompt::build_prompt;
pub use toast::{NoticeKind, NoticeView, Toaster};
pub use transport::{MockTransport, RelayTransport};
pub use wire::{ErrorBody, RelayOutcome, RelayRequest};
pub use words::{word_count, word_count_label};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        CodeformConfig, CodeformError, Credential, FormController, LibraryMode, RelayRequest,
        RelayTransport, Result, Settlement,
    };
}
