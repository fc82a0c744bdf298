// jsonrpc-server/src/methods/echo.rs
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde_json::json;

use jsonrpc_protocol::{PresetError, Request, Response};

use crate::handler::{Params, RpcMethod};

/// The bundled sample method: answers with the method name, the params it
/// was given, and a timestamp. Declares no parameter shape, so it sees
/// whatever generic decoding produced.
pub struct EchoMethod;

#[async_trait]
impl RpcMethod for EchoMethod {
    fn name(&self) -> &str {
        "echo"
    }

    async fn handle(&self, request: &Request, params: Option<Params>) -> Option<Response> {
        let Some(params) = params else {
            return Some(Response::error_with_id(
                PresetError::InvalidParams,
                request.id(),
            ));
        };

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();

        Some(Response::success(
            json!({
                "method": request.method(),
                "params": params.into_value(),
                "timestamp": timestamp,
            }),
            Some(request),
        ))
    }
}
