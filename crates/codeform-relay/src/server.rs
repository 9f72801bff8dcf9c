use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use codeform_ai::CompletionClient;
use codeform_core::{CodeformConfig, ErrorBody, RelayRequest, Result, RELAY_PATH};
use rust_embed::RustEmbed;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(RustEmbed)]
#[folder = "ui/dist/"]
struct Assets;

/// Shared, read-only handler state.
pub struct RelayState {
    client: CompletionClient,
}

/// The relay endpoint plus the embedded form page.
pub struct RelayServer {
    config: CodeformConfig,
    state: Arc<RelayState>,
}

impl RelayServer {
    pub fn new(config: CodeformConfig) -> Result<Self> {
        let client = CompletionClient::new(&config)?;
        Ok(Self {
            config,
            state: Arc::new(RelayState { client }),
        })
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .route(RELAY_PATH, post(paraphrase))
            .route("/health", get(health))
            .fallback(static_handler)
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr()?;
        info!(
            upstream = %self.state.client.url(),
            model = %self.state.client.model(),
            "Codeform relay available at http://{}",
            addr
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
        Ok(())
    }
}

#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn paraphrase(
    State(state): State<Arc<RelayState>>,
    payload: std::result::Result<Json<RelayRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(%rejection, "rejected malformed body");
            return error_response(
                StatusCode::BAD_REQUEST,
                "Request body must be JSON with `prompt` and `userToken`",
            );
        }
    };

    if request.prompt.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing prompt");
    }
    if request.user_token.is_empty() {
        return error_response(StatusCode::UNAUTHORIZED, "Missing API key");
    }

    info!(prompt_len = request.prompt.len(), "relaying prompt");
    match state.client.complete(&request.prompt, &request.user_token).await {
        Ok(reply) => {
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
            info!(%status, "relayed completion reply");
            (status, Json(reply.body)).into_response()
        }
        Err(err) => {
            warn!(error = %err, "completion call failed");
            error_response(StatusCode::BAD_GATEWAY, err.reason())
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

async fn static_handler(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    if path.is_empty() || path == "index.html" {
        return index_html().await;
    }

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn index_html() -> Response {
    match Assets::get("index.html") {
        Some(content) => Html(content.data).into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
