// jsonrpc-server/src/dispatch.rs
use std::sync::Arc;

use anyhow::{anyhow, Result};
use futures::future;
use serde_json::{Map, Value};
use tracing::debug;

use jsonrpc_protocol::{AnyVersion, ContextBuilder, PresetError, Request, Response, RpcContext};

use crate::handler::{HandlerMapper, MethodMapper, Params, RpcMethod};

/// The entry point of the engine: takes a JSON-RPC payload and returns a
/// payload ready to ship, or `None` when the specification forbids any
/// output (an all-notification payload).
///
/// A dispatcher is stateless across calls; every call builds its own
/// [`RpcContext`] and drives it from open to done. Calls may run
/// concurrently against the same dispatcher.
pub struct Dispatcher {
    mapper: Arc<dyn HandlerMapper>,
    builder: Arc<dyn ContextBuilder>,
}

impl Dispatcher {
    /// A dispatcher over the given mapper, validating with every known
    /// specification version.
    pub fn new(mapper: Arc<dyn HandlerMapper>) -> Self {
        Self {
            mapper,
            builder: Arc::new(AnyVersion),
        }
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Validates, resolves and invokes the payload's requests, and
    /// marshals the outcome.
    ///
    /// Every failure leaves this method as an ordinary serialized failure
    /// response; nothing is thrown across the dispatch boundary.
    pub async fn dispatch(&self, payload: Option<&str>) -> Option<String> {
        let payload = match payload {
            Some(payload) if !payload.is_empty() => payload,
            // An absent payload is not malformed JSON.
            _ => return Response::error(PresetError::InternalError).to_json(),
        };

        let tree: Value = match serde_json::from_str(payload) {
            Ok(tree) => tree,
            Err(err) => {
                debug!(%err, "payload is not valid JSON");
                return Response::error(PresetError::ParseError).to_json();
            }
        };

        let context = match self.builder.build(Some(&tree)) {
            Some(context) => context,
            None => return Response::error(PresetError::InvalidRequest).to_json(),
        };

        if context.is_done() {
            return Self::marshal(&context);
        }

        // One unit of work per pending request, joined before marshaling.
        // Requests are independent; completion order carries no meaning.
        let outcomes =
            future::join_all(context.requests().iter().map(|request| self.resolve_one(request)))
                .await;
        let responses: Vec<Response> = outcomes.into_iter().flatten().collect();

        if responses.is_empty() {
            // Nothing but notifications: the transport must stay silent.
            return None;
        }

        Self::marshal(&context.done_with(responses))
    }

    /// Resolves and invokes one request. Notifications go through the same
    /// path (resolution and invocation still happen) but their outcome is
    /// discarded.
    async fn resolve_one(&self, request: &Request) -> Option<Response> {
        let outcome = match self.mapper.resolve(request).await {
            None => {
                debug!(method = request.method(), "no method matched");
                Some(Response::error_with_id(
                    PresetError::MethodNotFound,
                    request.id(),
                ))
            }
            Some(method) => match Self::decode_params(method.as_ref(), request) {
                Err(response) => Some(response),
                Ok(params) => match method.handle(request, params).await {
                    Some(response) => Some(response),
                    // A non-notification call must be answered.
                    None => Some(Response::error_with_id(
                        PresetError::InternalError,
                        request.id(),
                    )),
                },
            },
        };

        if request.is_notification() {
            None
        } else {
            outcome
        }
    }

    /// Applies the method's declared parameter shape, or the generic
    /// key-value decoding with a raw fallback when no shape is declared.
    fn decode_params(
        method: &dyn RpcMethod,
        request: &Request,
    ) -> Result<Option<Params>, Response> {
        match (method.params_type(), request.params()) {
            (Some(decode), Some(raw)) => match decode(raw) {
                Some(value) => Ok(Some(Params::Typed(value))),
                None => Err(Response::error_with_id(
                    PresetError::InvalidParams,
                    request.id(),
                )),
            },
            (None, Some(raw)) => Ok(Some(
                serde_json::from_str::<Map<String, Value>>(raw)
                    .map(Params::Map)
                    .unwrap_or_else(|_| Params::Raw(raw.to_string())),
            )),
            (_, None) => Ok(None),
        }
    }

    /// A done context with one response and no batch flag marshals as that
    /// response alone; everything else marshals as an array in recorded
    /// order.
    fn marshal(context: &RpcContext) -> Option<String> {
        let responses = context.responses();

        if !context.is_done() || responses.is_empty() {
            return None;
        }

        if !context.is_batch() && responses.len() == 1 {
            return responses[0].to_json();
        }

        let parts: Vec<String> = responses.iter().filter_map(Response::to_json).collect();
        Some(format!("[{}]", parts.join(",")))
    }
}

/// Builder for a [`Dispatcher`], in the spirit of registering methods one
/// by one at startup.
pub struct DispatcherBuilder {
    mapper: Option<Arc<dyn HandlerMapper>>,
    builder: Option<Arc<dyn ContextBuilder>>,
    methods: Vec<Arc<dyn RpcMethod>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            mapper: None,
            builder: None,
            methods: Vec::new(),
        }
    }

    /// Use a custom handler mapper. Cannot be combined with
    /// [`DispatcherBuilder::with_method`].
    pub fn with_mapper(mut self, mapper: Arc<dyn HandlerMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Register a method (collected into a default [`MethodMapper`]).
    pub fn with_method(mut self, method: impl RpcMethod + 'static) -> Self {
        self.methods.push(Arc::new(method));
        self
    }

    /// Validate with a single specification version (or any custom
    /// context builder) instead of the any-version default.
    pub fn with_context_builder(mut self, builder: impl ContextBuilder + 'static) -> Self {
        self.builder = Some(Arc::new(builder));
        self
    }

    pub fn build(self) -> Result<Dispatcher> {
        let mapper = match (self.mapper, self.methods) {
            (Some(mapper), methods) if methods.is_empty() => mapper,
            (Some(_), _) => {
                return Err(anyhow!(
                    "with_method cannot be combined with an explicit mapper"
                ))
            }
            (None, methods) if methods.is_empty() => {
                return Err(anyhow!("a handler mapper or at least one method is required"))
            }
            (None, methods) => {
                Arc::new(MethodMapper::from_methods(methods)) as Arc<dyn HandlerMapper>
            }
        };

        Ok(Dispatcher {
            mapper,
            builder: self.builder.unwrap_or_else(|| Arc::new(AnyVersion)),
        })
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpc_protocol::Specification;
    use serde_json::json;

    #[test]
    fn marshal_returns_nothing_for_an_open_or_empty_context() {
        let open = RpcContext::of(false, Vec::new(), vec![Response::success(json!(1), None)]);
        assert_eq!(Dispatcher::marshal(&open), None);

        let empty = RpcContext::of(false, Vec::new(), Vec::new()).done();
        assert_eq!(Dispatcher::marshal(&empty), None);
    }

    #[test]
    fn marshal_unwraps_a_single_non_batch_response() {
        let context = RpcContext::failed(false, Response::error(PresetError::ParseError)).done();
        let wire = Dispatcher::marshal(&context).unwrap();

        assert!(wire.starts_with('{'));
    }

    #[test]
    fn marshal_wraps_batches_in_an_array() {
        let context = RpcContext::failed(true, Response::error(PresetError::InvalidRequest)).done();
        let wire = Dispatcher::marshal(&context).unwrap();

        let value: Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn marshal_wraps_multiple_responses_even_without_the_batch_flag() {
        let context = RpcContext::of(false, Vec::new(), Vec::new()).done_with(vec![
            Response::success(json!(1), None),
            Response::success(json!(2), None),
        ]);
        let wire = Dispatcher::marshal(&context).unwrap();

        assert!(wire.starts_with('['));
    }

    #[test]
    fn builder_requires_a_mapper_or_a_method() {
        assert!(Dispatcher::builder().build().is_err());
    }

    #[test]
    fn builder_rejects_a_mapper_combined_with_methods() {
        let result = Dispatcher::builder()
            .with_mapper(Arc::new(MethodMapper::empty()))
            .with_method(crate::methods::EchoMethod)
            .build();

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn builder_accepts_a_single_version_engine() {
        let dispatcher = Dispatcher::builder()
            .with_method(crate::methods::EchoMethod)
            .with_context_builder(Specification::V2_0)
            .build()
            .unwrap();

        let wire = dispatcher
            .dispatch(Some(r#"{"jsonrpc": "2.0", "method": "echo", "params": "hi", "id": 1}"#))
            .await
            .unwrap();

        let value: Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(value["result"]["params"], "hi");
    }
}
