// jsonrpc-route/src/route.rs
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::warn;

use jsonrpc_protocol::{Request, Response};
use jsonrpc_server::{MethodMapper, Params, RpcMethod};

/// What can go wrong between this engine and a remote endpoint.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote endpoint answered with status {0}")]
    Status(StatusCode),

    #[error("remote endpoint returned something that is not a response")]
    MalformedResponse,
}

/// A method binding that owns no logic of its own: it forwards the
/// request's canonical JSON to a remote JSON-RPC endpoint and relays the
/// remote response.
///
/// Any failure on the way collapses to a declined answer (`None` from
/// [`RpcMethod::handle`]), which the dispatcher turns into an internal
/// error for non-notification calls.
pub struct HttpRoute {
    name: String,
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRoute {
    pub fn new(name: &str, endpoint: &str) -> Self {
        Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Share a client across routes to reuse its connection pool.
    pub fn with_client(name: &str, endpoint: &str, client: reqwest::Client) -> Self {
        Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn forward(&self, request: &Request) -> Result<Response, RouteError> {
        let reply = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(request.to_json().to_string())
            .send()
            .await?;

        let status = reply.status();
        if !status.is_success() {
            return Err(RouteError::Status(status));
        }

        let body = reply.text().await?;
        Response::from_json(&body).ok_or(RouteError::MalformedResponse)
    }
}

#[async_trait]
impl RpcMethod for HttpRoute {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, request: &Request, _params: Option<Params>) -> Option<Response> {
        match self.forward(request).await {
            Ok(response) => Some(response),
            Err(err) => {
                warn!(
                    method = request.method(),
                    endpoint = self.endpoint.as_str(),
                    %err,
                    "route forwarding failed"
                );
                None
            }
        }
    }
}

/// A method mapper whose bindings are all routes, in the spirit of a
/// routing table built once at startup. Duplicate names keep the first
/// route.
pub fn route_mapper(routes: impl IntoIterator<Item = HttpRoute>) -> MethodMapper {
    MethodMapper::from_methods(
        routes
            .into_iter()
            .map(|route| Arc::new(route) as Arc<dyn RpcMethod>),
    )
}
