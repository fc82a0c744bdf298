// jsonrpc-server/src/handler/mod.rs
pub mod mapper;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use jsonrpc_protocol::{Request, Response};

pub use mapper::{HandlerMapper, Matcher, MethodMapper};

/// Decodes raw parameter JSON into the value shape a method declares.
/// Returning `None` makes the dispatcher answer with Invalid params.
pub type ParamsDecoder = fn(&str) -> Option<Value>;

/// What the dispatcher hands to a method after parameter decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// Decoded through the method's declared parameter shape.
    Typed(Value),
    /// Generic key-value decoding, for methods with no declared shape.
    Map(Map<String, Value>),
    /// The raw serialized params, kept when generic decoding fails too.
    Raw(String),
}

impl Params {
    pub fn into_value(self) -> Value {
        match self {
            Params::Typed(value) => value,
            Params::Map(map) => Value::Object(map),
            Params::Raw(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        }
    }

    /// Deserializes the params into a concrete type. Typed methods call
    /// this on the value their decoder already validated.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.clone().into_value()).ok()
    }
}

/// A named capability a resolved method name maps to.
///
/// Implementations answer a request with a [`Response`], or `None` when
/// they have nothing to say. The dispatcher promotes `None` to an internal
/// error for non-notification calls.
#[async_trait]
pub trait RpcMethod: Send + Sync {
    /// The method name this binding owns.
    fn name(&self) -> &str;

    /// The declared parameter shape, if any. With a decoder declared, the
    /// dispatcher decodes raw params before invoking and answers Invalid
    /// params itself when decoding fails.
    fn params_type(&self) -> Option<ParamsDecoder> {
        None
    }

    async fn handle(&self, request: &Request, params: Option<Params>) -> Option<Response>;
}

/// Decoder builders for [`RpcMethod::params_type`].
pub mod params {
    use super::*;

    /// A decoder that accepts exactly the values deserializable as `T`.
    ///
    /// ```
    /// # use jsonrpc_server::handler::{params, ParamsDecoder};
    /// let decoder: ParamsDecoder = params::typed::<Vec<i64>>;
    /// assert!(decoder("[1, 2, 3]").is_some());
    /// assert!(decoder("\"not a list\"").is_none());
    /// ```
    pub fn typed<T: DeserializeOwned + Serialize>(raw: &str) -> Option<Value> {
        let parsed: T = serde_json::from_str(raw).ok()?;
        serde_json::to_value(parsed).ok()
    }
}
