//! HTTP server setup and the forwarding handler.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all forwarding handler
//! - Open the exchange log and start the logging agent
//! - Forward every request to the configured destination
//! - Record each request and response on the log queue
//! - Stop the whole server on the first fatal error

use std::future::IntoFuture;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, Version},
    response::Response,
    routing::any,
    Router,
};
use hyper::ext::ReasonPhrase;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, ForwardAddress, ProxyConfig, ValidationError};
use crate::error::ProxyError;
use crate::http::forward::{forward_url, outbound_headers, relayed_headers};
use crate::lifecycle::{fatal_channel, Fatal};
use crate::recording::{log_file_path, log_queue, EntrySender, ExchangeId, LogEntry, LoggingAgent, RawMessage};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forward: Arc<ForwardAddress>,
    pub client: reqwest::Client,
    pub entries: EntrySender,
    pub fatal: Fatal,
}

/// HTTP server for the recording proxy.
pub struct HttpServer {
    router: Router,
    agent: LoggingAgent,
    fatal_rx: mpsc::UnboundedReceiver<ProxyError>,
    forward: Arc<ForwardAddress>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Opens the destination log file; failing to do so is fatal.
    pub async fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let forward = config
            .forward
            .address
            .clone()
            .map(Arc::new)
            .ok_or_else(|| ConfigError::Validation(vec![ValidationError::MissingForwardAddress]))?;

        let (entries, queue) = log_queue(config.recording.queue_capacity);
        let agent = LoggingAgent::open(log_file_path(&config.recording.logs_dir, &forward), queue).await?;

        // Redirects are relayed to the caller rather than followed.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let (fatal, fatal_rx) = fatal_channel();

        let state = AppState {
            forward: forward.clone(),
            client,
            entries,
            fatal,
        };

        Ok(Self {
            router: Self::build_router(state),
            agent,
            fatal_rx,
            forward,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires or a fatal error occurs.
    ///
    /// On shutdown the log queue is closed and the agent drains it before
    /// this returns. On a fatal error serving stops immediately and the
    /// error is returned.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ProxyError> {
        let Self {
            router,
            agent,
            mut fatal_rx,
            forward,
        } = self;

        let addr = listener.local_addr().map_err(ProxyError::Serve)?;
        tracing::info!(address = %addr, forward = %forward, "HTTP server starting");

        let mut agent_task = tokio::spawn(agent.run());

        let serve = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .into_future();

        tokio::select! {
            served = serve => served.map_err(ProxyError::Serve)?,
            Some(err) = fatal_rx.recv() => {
                // A closed queue means the agent stopped; report its error instead.
                if matches!(err, ProxyError::QueueClosed) {
                    agent_outcome(agent_task.await)?;
                }
                return Err(err);
            }
            joined = &mut agent_task => {
                agent_outcome(joined)?;
                return Err(ProxyError::AgentStopped("log queue closed while serving".into()));
            }
        }

        // The router and every queue sender are gone; let the agent drain.
        agent_outcome(agent_task.await)?;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn agent_outcome(
    joined: Result<Result<(), ProxyError>, tokio::task::JoinError>,
) -> Result<(), ProxyError> {
    joined.map_err(|e| ProxyError::AgentStopped(e.to_string()))?
}

/// Forward one request. Any failure is fatal and the caller gets no response.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    match forward(&state, request).await {
        Ok(response) => response,
        Err(err) => {
            state.fatal.raise(err);
            std::future::pending().await
        }
    }
}

async fn forward(state: &AppState, request: Request<Body>) -> Result<Response, ProxyError> {
    let exchange = ExchangeId::new();
    let (parts, body) = request.into_parts();

    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = forward_url(state.forward.as_url(), target);

    tracing::debug!(
        exchange = %exchange,
        method = %parts.method,
        url = %url,
        "Forwarding request"
    );

    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(ProxyError::Body)?;
    let headers = outbound_headers(&parts.headers);

    let mut send_url = url;
    send_url.set_fragment(None);
    let outbound = state
        .client
        .request(parts.method.clone(), send_url)
        .version(Version::HTTP_11)
        .headers(headers.clone())
        .body(body.clone())
        .build()
        .map_err(|e| ProxyError::InvalidRequest(e.to_string()))?;

    let logged = RawMessage::request(parts.method, parts.uri.path(), Version::HTTP_11, headers, body);
    state.entries.push(LogEntry::now(exchange, logged)).await?;

    let upstream = state.client.execute(outbound).await?;
    let version = upstream.version();
    let status = upstream.status();
    let reason = upstream
        .extensions()
        .get::<ReasonPhrase>()
        .map(|r| String::from_utf8_lossy(r.as_bytes()).into_owned());
    let headers = relayed_headers(upstream.headers());
    let body = upstream.bytes().await?;

    let logged = RawMessage::response(version, status, reason.as_deref(), headers.clone(), body.clone());
    state.entries.push(LogEntry::now(exchange, logged)).await?;

    tracing::debug!(exchange = %exchange, status = %status, bytes = body.len(), "Relaying response");

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
