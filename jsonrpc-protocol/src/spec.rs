// jsonrpc-protocol/src/spec.rs
use serde_json::Value;

use crate::context::RpcContext;
use crate::error::PresetError;
use crate::request::Request;
use crate::response::Response;

/// Builds a dispatch context from a parsed JSON tree.
///
/// An implementation owns the "is this a well-formed request" decision for
/// one or more protocol versions. When it recognizes the payload shape it
/// must return a context, already done when nothing is left to dispatch,
/// even if every item was invalid. `None` means the payload is not this
/// implementation's to judge.
pub trait ContextBuilder: Send + Sync {
    fn build(&self, tree: Option<&Value>) -> Option<RpcContext>;
}

/// The JSON-RPC specification versions the engine knows, each one a
/// validator for its own structural rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specification {
    /// JSON-RPC 1.0. Unsupported: its validator accepts nothing.
    V1_0,
    /// JSON-RPC 2.0.
    V2_0,
}

impl Specification {
    /// Known versions in the order the any-version builder tries them.
    pub const ALL: [Specification; 2] = [Specification::V1_0, Specification::V2_0];

    pub fn version(&self) -> &'static str {
        match self {
            Specification::V1_0 => "1.0",
            Specification::V2_0 => "2.0",
        }
    }

    /// Whether an item with this version string and id would be a
    /// notification under this specification version.
    pub fn is_notification(&self, jsonrpc: &str, id: Option<&Value>) -> bool {
        match self {
            Specification::V1_0 => false,
            Specification::V2_0 => jsonrpc == self.version() && id.is_none(),
        }
    }

    fn build_v2(&self, tree: Option<&Value>) -> RpcContext {
        let Some(tree) = tree else {
            return RpcContext::failed(false, Response::error(PresetError::ParseError)).done();
        };

        let (batch, items): (bool, Vec<&Value>) = match tree.as_array() {
            Some(array) if !array.is_empty() => (true, array.iter().collect()),
            // An empty array is not a batch: it degenerates to one
            // invalid-request failure.
            Some(_) => {
                return RpcContext::failed(false, Response::error(PresetError::InvalidRequest))
                    .done();
            }
            None => (false, vec![tree]),
        };

        let mut requests = Vec::new();
        let mut responses = Vec::new();

        for item in items {
            match self.validate_item(item) {
                Ok(request) => requests.push(request),
                Err(response) => responses.push(response),
            }
        }

        let context = RpcContext::of(batch, requests, responses);

        if context.requests().is_empty() {
            context.done()
        } else {
            context
        }
    }

    /// One item against the 2.0 structural rules. Checks run in wire-field
    /// order: `jsonrpc`, `id`, `method`, `params`. The first violation
    /// settles the item as an invalid-request failure.
    fn validate_item(&self, item: &Value) -> Result<Request, Response> {
        match item.get("jsonrpc").and_then(Value::as_str) {
            Some(version) if version == self.version() => {}
            _ => return Err(Response::error(PresetError::InvalidRequest)),
        }

        let (id, notification) = match item.get("id") {
            None => (None, true),
            Some(id) => (normalize_id(id)?, false),
        };

        let method = match item.get("method").and_then(Value::as_str) {
            Some(method) if !method.is_empty() => method,
            _ => return Err(Response::error(PresetError::InvalidRequest)),
        };

        let params = item.get("params");
        if params.is_some_and(Value::is_null) {
            return Err(Response::error(PresetError::InvalidRequest));
        }

        Ok(Request::from_validated(
            self.version().to_string(),
            method.to_string(),
            notification,
            item.to_string(),
            params.map(Value::to_string),
            id,
        ))
    }
}

/// The id member may be a string, an integral number, or null. Numbers are
/// normalized to their decimal string form; null is kept as an absent id on
/// a non-notification request.
fn normalize_id(id: &Value) -> Result<Option<String>, Response> {
    match id {
        Value::String(id) => Ok(Some(id.clone())),
        Value::Null => Ok(None),
        Value::Number(id) if id.is_i64() || id.is_u64() => Ok(Some(id.to_string())),
        _ => Err(Response::error(PresetError::InvalidRequest)),
    }
}

impl ContextBuilder for Specification {
    fn build(&self, tree: Option<&Value>) -> Option<RpcContext> {
        match self {
            Specification::V1_0 => None,
            Specification::V2_0 => Some(self.build_v2(tree)),
        }
    }
}

/// Validates against every known version, taking the first one that
/// recognizes the payload shape. When none does, the payload settles as a
/// single invalid-request failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyVersion;

impl ContextBuilder for AnyVersion {
    fn build(&self, tree: Option<&Value>) -> Option<RpcContext> {
        Specification::ALL
            .iter()
            .find_map(|spec| spec.build(tree))
            .or_else(|| {
                Some(RpcContext::failed(false, Response::error(PresetError::InvalidRequest)).done())
            })
    }
}
