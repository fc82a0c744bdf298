// jsonrpc-protocol/src/request.rs
use serde::Serialize;
use serde_json::{json, Value};

use crate::constants::PROTOCOL_VERSION;

/// A single validated JSON-RPC call.
///
/// ```json
/// {"jsonrpc": "2.0", "method": "subtract", "params": [42, 41], "id": "0"}
/// ```
///
/// Instances only exist for items that passed specification validation:
/// the validator builds them from wire payloads, and [`Request::of`] is the
/// checked builder for programmatic construction. Numeric wire ids are kept
/// in their decimal string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    jsonrpc: String,
    method: String,
    notification: bool,
    raw: String,
    params: Option<String>,
    id: Option<String>,
}

impl Request {
    /// Used by the specification validator once an item has passed every
    /// structural check. A notification never carries an id.
    pub(crate) fn from_validated(
        jsonrpc: String,
        method: String,
        notification: bool,
        raw: String,
        params: Option<String>,
        id: Option<String>,
    ) -> Self {
        debug_assert!(!notification || id.is_none());
        Self {
            jsonrpc,
            method,
            notification,
            raw,
            params,
            id,
        }
    }

    /// Builds a request programmatically, serializing `params` into its raw
    /// form. Returns `None` for an empty method name or unserializable
    /// params. A request built without an id is a notification.
    pub fn of<T: Serialize>(method: &str, params: Option<&T>, id: Option<&str>) -> Option<Self> {
        if method.is_empty() {
            return None;
        }

        let params_json = match params {
            Some(params) => Some(serde_json::to_value(params).ok()?),
            None => None,
        };

        let mut item = serde_json::Map::new();
        item.insert("jsonrpc".to_string(), json!(PROTOCOL_VERSION));
        item.insert("method".to_string(), json!(method));
        if let Some(params) = &params_json {
            item.insert("params".to_string(), params.clone());
        }
        if let Some(id) = id {
            item.insert("id".to_string(), json!(id));
        }

        Some(Self {
            jsonrpc: PROTOCOL_VERSION.to_string(),
            method: method.to_string(),
            notification: id.is_none(),
            raw: Value::Object(item).to_string(),
            params: params_json.map(|params| params.to_string()),
            id: id.map(|id| id.to_string()),
        })
    }

    /// The JSON-RPC version of the originating item.
    pub fn version(&self) -> &str {
        &self.jsonrpc
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// True if no id was present on the wire; such a request must never
    /// produce a response.
    pub fn is_notification(&self) -> bool {
        self.notification
    }

    /// Raw serialized params, if the item carried any.
    pub fn params(&self) -> Option<&str> {
        self.params.as_deref()
    }

    /// The request id in string form. `None` does not imply a notification:
    /// a wire item with `"id": null` is a request without an id.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The canonical serialized form of the whole item.
    pub fn to_json(&self) -> &str {
        &self.raw
    }
}
