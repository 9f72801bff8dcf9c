//! JSON shapes exchanged between the form and the relay.
//!
//! The form sends a [`RelayRequest`]; the relay answers with whatever the completion
//! service produced. [`RelayOutcome::classify`] reduces that body to one of the three
//! cases the form knows how to display.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Credential;

/// Body of `POST /api/paraphrase`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    pub prompt: String,

    #[serde(rename = "userToken", default)]
    pub user_token: Credential,
}

impl RelayRequest {
    pub fn new(prompt: impl Into<String>, user_token: Credential) -> Self {
        Self {
            prompt: prompt.into(),
            user_token,
        }
    }
}

/// `{"error": {"message": ...}}`, the failure shape produced by the relay and by
/// OpenAI-compatible services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
            },
        }
    }
}

/// What a relay response means for the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// `choices[0].message.content`, untouched.
    Generated(String),

    /// `error.message` from the service.
    Upstream(String),

    /// Neither shape matched.
    Unrecognized,
}

impl RelayOutcome {
    /// Classify a response body. `choices` wins over `error` when both are present.
    pub fn classify(body: &Value) -> Self {
        let first_choice = body
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first());

        if let Some(choice) = first_choice {
            return match choice.pointer("/message/content").and_then(Value::as_str) {
                Some(content) => RelayOutcome::Generated(content.to_string()),
                None => RelayOutcome::Unrecognized,
            };
        }

        match body.get("error") {
            Some(Value::String(message)) if !message.is_empty() => {
                RelayOutcome::Upstream(message.clone())
            }
            Some(Value::Object(error)) => {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .unwrap_or("Unknown error from the completion service");
                RelayOutcome::Upstream(message.to_string())
            }
            _ => RelayOutcome::Unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_user_token_field() {
        let req = RelayRequest::new("p", Credential::from("sk-test"));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, json!({"prompt": "p", "userToken": "sk-test"}));
    }

    #[test]
    fn test_request_missing_fields_default_to_empty() {
        let req: RelayRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.prompt.is_empty());
        assert!(req.user_token.is_empty());
    }

    #[test]
    fn test_classify_success_takes_first_choice() {
        let body = json!({"choices": [
            {"message": {"content": "<Button>Login</Button>"}},
            {"message": {"content": "second"}}
        ]});
        assert_eq!(
            RelayOutcome::classify(&body),
            RelayOutcome::Generated("<Button>Login</Button>".into())
        );
    }

    #[test]
    fn test_classify_error_object() {
        let body = json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}});
        assert_eq!(
            RelayOutcome::classify(&body),
            RelayOutcome::Upstream("Incorrect API key provided".into())
        );
    }

    #[test]
    fn test_classify_empty_choices_falls_through_to_error() {
        let body = json!({"choices": [], "error": {"message": "quota"}});
        assert_eq!(RelayOutcome::classify(&body), RelayOutcome::Upstream("quota".into()));
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(RelayOutcome::classify(&json!({"ok": true})), RelayOutcome::Unrecognized);
        assert_eq!(RelayOutcome::classify(&json!([1, 2])), RelayOutcome::Unrecognized);
        assert_eq!(RelayOutcome::classify(&json!({"error": null})), RelayOutcome::Unrecognized);
    }

    #[test]
    fn test_classify_falsy_error_is_unrecognized() {
        for error in [json!(false), json!(""), json!(0), json!([])] {
            assert_eq!(
                RelayOutcome::classify(&json!({ "error": error })),
                RelayOutcome::Unrecognized
            );
        }
    }

    #[test]
    fn test_classify_error_without_message() {
        assert_eq!(
            RelayOutcome::classify(&json!({"error": {}})),
            RelayOutcome::Upstream("Unknown error from the completion service".into())
        );
        assert_eq!(
            RelayOutcome::classify(&json!({"error": "bad key"})),
            RelayOutcome::Upstream("bad key".into())
        );
    }

    #[test]
    fn test_error_body_shape() {
        let json = serde_json::to_value(ErrorBody::new("Missing prompt")).unwrap();
        assert_eq!(json, json!({"error": {"message": "Missing prompt"}}));
    }
}
