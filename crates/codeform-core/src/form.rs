//! Form controller - the state machine behind the "Get Code" form.
//!
//! The controller owns everything the page shows: the API key, the description, the
//! selected library, the last generated code, the loading flag and the notice queue.
//! A submission moves it from [`FormPhase::Idle`] to [`FormPhase::Submitting`]; any
//! response, including a failed one, moves it back.
//!
//! Each dispatch gets a sequence number. A response is applied only when it answers the
//! latest dispatch, and a second submission is refused while one is outstanding.

use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::{
    build_prompt,
    clipboard::Clipboard,
    toast::{NoticeKind, NoticeView, Toaster},
    words, CodeformConfig, CodeformError, Credential, LibraryMode, RelayOutcome, RelayRequest,
    RelayTransport, Result,
};

/// Shown when the description is empty.
pub const MSG_MISSING_TEXT: &str = "Enter text to paraphrase!";
/// Shown when the API key is empty.
pub const MSG_MISSING_KEY: &str = "Enter your API Token Key";
/// Shown when the response has neither `choices` nor `error`.
pub const MSG_NO_RESULT: &str = "nothing...";
/// Shown after a successful copy.
pub const MSG_COPIED: &str = "Copied to clipboard";

/// Where the form is in its request cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
}

/// Why a submission did not go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingText,
    MissingKey,
    /// A request is already in flight; the submit control is disabled.
    Busy,
}

impl Rejection {
    /// Notice text for this rejection. `Busy` is silent.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Rejection::MissingText => Some(MSG_MISSING_TEXT),
            Rejection::MissingKey => Some(MSG_MISSING_KEY),
            Rejection::Busy => None,
        }
    }
}

/// A request that has been dispatched and is waiting for its response.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub seq: u64,
    pub request: RelayRequest,
}

/// What applying a response did to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Output replaced with the first choice.
    Generated,
    /// Upstream error message was shown.
    UpstreamError(String),
    /// Unrecognized body; generic notice shown.
    NoResult,
    /// The call itself failed.
    TransportFailed(String),
    /// Response belonged to an older dispatch and was dropped.
    Stale,
}

/// Explicit state for one form.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    credential: Credential,
    source_text: String,
    library: LibraryMode,
    output: Option<String>,
    loading: bool,
    latest_seq: u64,
    toaster: Toaster,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller whose notices live for the configured duration.
    pub fn with_config(config: &CodeformConfig) -> Self {
        Self::new().with_notice_ttl(config.notice_ttl())
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.toaster = Toaster::new(8, ttl);
        self
    }

    pub fn set_credential(&mut self, key: impl Into<Credential>) {
        self.credential = key.into();
    }

    pub fn set_source_text(&mut self, text: impl Into<String>) {
        self.source_text = text.into();
    }

    pub fn set_library(&mut self, library: LibraryMode) {
        self.library = library;
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn library(&self) -> LibraryMode {
        self.library
    }

    /// Last successfully generated code.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> FormPhase {
        if self.loading {
            FormPhase::Submitting
        } else {
            FormPhase::Idle
        }
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.loading
    }

    pub fn word_count(&self) -> Option<usize> {
        words::word_count(&self.source_text)
    }

    pub fn word_count_label(&self) -> Option<String> {
        words::word_count_label(&self.source_text)
    }

    /// The prompt a submission would send right now.
    pub fn prompt(&self) -> String {
        build_prompt(&self.source_text, self.library)
    }

    /// Notices currently visible.
    pub fn notices(&self) -> Vec<NoticeView> {
        self.toaster.visible(Instant::now())
    }

    /// Most recent notice, for surfaces that print rather than render.
    pub fn last_notice(&self) -> Option<(NoticeKind, &str)> {
        self.toaster.last()
    }

    /// Drop expired notices.
    pub fn tick(&mut self) {
        self.toaster.retain_visible(Instant::now());
    }

    /// Validate and, if valid, enter `Submitting` and hand back the request to send.
    ///
    /// Validation failures push an error notice; nothing is sent.
    pub fn begin_submit(&mut self) -> std::result::Result<Dispatch, Rejection> {
        let rejection = if self.loading {
            Some(Rejection::Busy)
        } else if self.source_text.is_empty() {
            Some(Rejection::MissingText)
        } else if self.credential.is_empty() {
            Some(Rejection::MissingKey)
        } else {
            None
        };

        if let Some(rejection) = rejection {
            debug!(?rejection, "submission rejected");
            if let Some(message) = rejection.message() {
                self.notify(NoticeKind::Error, message);
            }
            return Err(rejection);
        }

        self.loading = true;
        self.latest_seq += 1;
        let prompt = self.prompt();
        info!(
            seq = self.latest_seq,
            library = %self.library,
            prompt_len = prompt.len(),
            "dispatching generation request"
        );

        Ok(Dispatch {
            seq: self.latest_seq,
            request: RelayRequest::new(prompt, self.credential.clone()),
        })
    }

    /// Apply the response to dispatch `seq`.
    ///
    /// Responses to anything but the latest, still outstanding dispatch are ignored.
    /// Otherwise the loading flag is cleared whatever the outcome, and the previous
    /// output is only replaced on success.
    pub fn apply_response(&mut self, seq: u64, response: Result<Value>) -> Settlement {
        if seq != self.latest_seq || !self.loading {
            debug!(
                seq,
                latest = self.latest_seq,
                loading = self.loading,
                "dropping stale response"
            );
            return Settlement::Stale;
        }

        let settlement = match response {
            Ok(body) => match RelayOutcome::classify(&body) {
                RelayOutcome::Generated(code) => {
                    info!(seq, code_len = code.len(), "generation succeeded");
                    self.output = Some(code);
                    Settlement::Generated
                }
                RelayOutcome::Upstream(message) => {
                    warn!(seq, %message, "completion service returned an error");
                    self.notify(NoticeKind::Error, message.clone());
                    Settlement::UpstreamError(message)
                }
                RelayOutcome::Unrecognized => {
                    warn!(seq, "unrecognized response body");
                    self.notify(NoticeKind::Error, MSG_NO_RESULT);
                    Settlement::NoResult
                }
            },
            Err(err) => {
                let reason = err.reason();
                warn!(seq, error = %err, "relay call failed");
                self.notify(NoticeKind::Error, format!("Request failed: {}", reason));
                Settlement::TransportFailed(reason)
            }
        };

        self.loading = false;
        settlement
    }

    /// Validate, send through `transport` and apply the response.
    #[instrument(skip(self, transport), fields(transport = transport.name()))]
    pub async fn submit<T>(&mut self, transport: &T) -> std::result::Result<Settlement, Rejection>
    where
        T: RelayTransport + ?Sized,
    {
        let dispatch = self.begin_submit()?;
        let response = transport.send(dispatch.request).await;
        Ok(self.apply_response(dispatch.seq, response))
    }

    /// Copy the generated code and confirm with a notice.
    pub fn copy_output<C>(&mut self, clipboard: &mut C) -> Result<()>
    where
        C: Clipboard + ?Sized,
    {
        let code = self
            .output
            .as_deref()
            .ok_or_else(|| CodeformError::Validation("nothing to copy yet".to_string()))?;

        match clipboard.copy(code) {
            Ok(()) => {
                self.notify(NoticeKind::Success, MSG_COPIED);
                Ok(())
            }
            Err(err) => {
                self.notify(NoticeKind::Error, err.reason());
                Err(err)
            }
        }
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.toaster.push(kind, message, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::MockTransport;
    use serde_json::json;

    fn filled_form() -> FormController {
        let mut form = FormController::new();
        form.set_credential("sk-test");
        form.set_source_text("a login button");
        form.set_library(LibraryMode::Mui);
        form
    }

    fn last_message(form: &FormController) -> Option<String> {
        form.last_notice().map(|(_, m)| m.to_string())
    }

    #[tokio::test]
    async fn test_end_to_end_success() {
        let transport = MockTransport::new().with_response(json!({
            "choices": [{"message": {"content": "<Button>Login</Button>"}}]
        }));
        let mut form = filled_form();

        let settlement = form.submit(&transport).await.unwrap();

        assert_eq!(settlement, Settlement::Generated);
        assert_eq!(form.output(), Some("<Button>Login</Button>"));
        assert!(!form.is_loading());
        assert_eq!(form.phase(), FormPhase::Idle);

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].prompt,
            "write code program with react component for \"a login button\" using MUI as UI library. Show only code."
        );
        assert_eq!(sent[0].user_token.expose(), "sk-test");
    }

    #[tokio::test]
    async fn test_missing_text_sends_nothing() {
        let transport = MockTransport::new();
        let mut form = FormController::new();
        form.set_credential("sk-test");

        assert_eq!(form.submit(&transport).await, Err(Rejection::MissingText));
        assert_eq!(transport.call_count(), 0);
        assert_eq!(last_message(&form).as_deref(), Some(MSG_MISSING_TEXT));
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn test_missing_key_sends_nothing() {
        let transport = MockTransport::new();
        let mut form = FormController::new();
        form.set_source_text("a card");

        assert_eq!(form.submit(&transport).await, Err(Rejection::MissingKey));
        assert_eq!(transport.call_count(), 0);
        assert_eq!(last_message(&form).as_deref(), Some(MSG_MISSING_KEY));
    }

    #[test]
    fn test_text_is_checked_before_key() {
        let mut form = FormController::new();
        assert_eq!(form.begin_submit().unwrap_err(), Rejection::MissingText);
    }

    #[test]
    fn test_loading_spans_dispatch_to_response() {
        let mut form = filled_form();
        assert!(!form.is_loading());

        let dispatch = form.begin_submit().unwrap();
        assert!(form.is_loading());
        assert!(!form.can_submit());

        form.apply_response(dispatch.seq, Ok(json!({})));
        assert!(!form.is_loading());
        assert!(form.can_submit());
    }

    #[test]
    fn test_second_submit_while_loading_is_refused() {
        let mut form = filled_form();
        let first = form.begin_submit().unwrap();

        assert_eq!(form.begin_submit().unwrap_err(), Rejection::Busy);
        assert!(form.is_loading());

        form.apply_response(first.seq, Ok(json!({"choices": [{"message": {"content": "x"}}]})));
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut form = filled_form();
        let dispatch = form.begin_submit().unwrap();

        let stale = form.apply_response(
            dispatch.seq - 1,
            Ok(json!({"choices": [{"message": {"content": "old"}}]})),
        );
        assert_eq!(stale, Settlement::Stale);
        assert_eq!(form.output(), None);
        assert!(form.is_loading());
    }

    #[test]
    fn test_settled_dispatch_cannot_be_applied_twice() {
        let mut form = filled_form();
        let d = form.begin_submit().unwrap();
        form.apply_response(d.seq, Ok(json!({"choices": [{"message": {"content": "v1"}}]})));

        let replay = form.apply_response(
            d.seq,
            Ok(json!({"choices": [{"message": {"content": "v2"}}]})),
        );
        assert_eq!(replay, Settlement::Stale);
        assert_eq!(form.output(), Some("v1"));
        assert!(!form.is_loading());
    }

    #[test]
    fn test_repeated_rejection_is_latest_notice() {
        let mut form = FormController::new();
        assert_eq!(form.begin_submit().unwrap_err(), Rejection::MissingText);
        form.set_source_text("a card");
        assert_eq!(form.begin_submit().unwrap_err(), Rejection::MissingKey);
        form.set_source_text("");
        assert_eq!(form.begin_submit().unwrap_err(), Rejection::MissingText);

        assert_eq!(form.last_notice(), Some((NoticeKind::Error, MSG_MISSING_TEXT)));
    }

    #[test]
    fn test_upstream_error_keeps_previous_output() {
        let mut form = filled_form();
        let d = form.begin_submit().unwrap();
        form.apply_response(d.seq, Ok(json!({"choices": [{"message": {"content": "v1"}}]})));

        let d = form.begin_submit().unwrap();
        let settlement = form.apply_response(
            d.seq,
            Ok(json!({"error": {"message": "Rate limit reached"}})),
        );

        assert_eq!(settlement, Settlement::UpstreamError("Rate limit reached".into()));
        assert_eq!(form.output(), Some("v1"));
        assert_eq!(last_message(&form).as_deref(), Some("Rate limit reached"));
        assert!(!form.is_loading());
    }

    #[test]
    fn test_unrecognized_shows_generic_notice() {
        let mut form = filled_form();
        let d = form.begin_submit().unwrap();
        let settlement = form.apply_response(d.seq, Ok(json!({"id": "cmpl-1"})));

        assert_eq!(settlement, Settlement::NoResult);
        assert_eq!(form.output(), None);
        assert_eq!(last_message(&form).as_deref(), Some(MSG_NO_RESULT));
    }

    #[tokio::test]
    async fn test_transport_failure_resets_loading() {
        let transport = MockTransport::new().with_failure("connection refused");
        let mut form = filled_form();

        let settlement = form.submit(&transport).await.unwrap();

        assert_eq!(settlement, Settlement::TransportFailed("connection refused".into()));
        assert!(!form.is_loading());
        assert_eq!(
            last_message(&form).as_deref(),
            Some("Request failed: connection refused")
        );
    }

    #[test]
    fn test_copy_output() {
        let mut form = filled_form();
        let mut clip = MemoryClipboard::new();
        assert!(form.copy_output(&mut clip).is_err());

        let d = form.begin_submit().unwrap();
        form.apply_response(d.seq, Ok(json!({"choices": [{"message": {"content": "<Card/>"}}]})));

        form.copy_output(&mut clip).unwrap();
        assert_eq!(clip.contents(), Some("<Card/>"));
        assert_eq!(form.last_notice(), Some((NoticeKind::Success, MSG_COPIED)));
    }

    #[test]
    fn test_word_count_tracks_text() {
        let mut form = FormController::new();
        assert_eq!(form.word_count(), None);
        form.set_source_text("a  b   c");
        assert_eq!(form.word_count(), Some(3));
        assert_eq!(form.word_count_label().as_deref(), Some("3 word(s)"));
    }

    #[test]
    fn test_debug_never_leaks_key() {
        let form = filled_form();
        assert!(!format!("{:?}", form).contains("sk-test"));
    }
}
