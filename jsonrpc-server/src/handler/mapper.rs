// jsonrpc-server/src/handler/mapper.rs
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use jsonrpc_protocol::Request;

use super::RpcMethod;

/// A custom matching strategy. When one is configured it is used
/// exclusively; the name map is not consulted.
pub type Matcher = Arc<dyn Fn(&Request) -> Option<Arc<dyn RpcMethod>> + Send + Sync>;

/// Resolves a request to the method bound to it. `None` is not an error:
/// the dispatcher turns an unmatched request into a method-not-found
/// failure.
#[async_trait]
pub trait HandlerMapper: Send + Sync {
    async fn resolve(&self, request: &Request) -> Option<Arc<dyn RpcMethod>>;
}

/// The default mapper: a name-to-method map behind a read/write lock, with
/// an optional custom matcher. Lookups from in-flight dispatch may run
/// concurrently with mutation; a lookup sees either the old or the new
/// mapping, never a partial one.
pub struct MethodMapper {
    methods: RwLock<HashMap<String, Arc<dyn RpcMethod>>>,
    matcher: Option<Matcher>,
}

impl MethodMapper {
    /// A mapper with the default matching strategy and no methods.
    pub fn empty() -> Self {
        Self {
            methods: RwLock::new(HashMap::new()),
            matcher: None,
        }
    }

    /// A mapper over the given methods. The first binding of a name wins.
    pub fn from_methods(methods: impl IntoIterator<Item = Arc<dyn RpcMethod>>) -> Self {
        let mut map = HashMap::new();
        for method in methods {
            if let Entry::Vacant(entry) = map.entry(method.name().to_string()) {
                entry.insert(method);
            }
        }

        Self {
            methods: RwLock::new(map),
            matcher: None,
        }
    }

    /// A mapper that resolves through the given matcher only.
    pub fn from_matcher(
        matcher: impl Fn(&Request) -> Option<Arc<dyn RpcMethod>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            methods: RwLock::new(HashMap::new()),
            matcher: Some(Arc::new(matcher)),
        }
    }

    /// Replaces the whole mapping. Readers observe either the previous set
    /// or the new one in full.
    pub async fn set_methods(&self, methods: impl IntoIterator<Item = Arc<dyn RpcMethod>>) {
        let mut map = self.methods.write().await;
        map.clear();
        for method in methods {
            map.insert(method.name().to_string(), method);
        }
    }

    /// Binds one method, replacing any previous binding of the name.
    pub async fn add_method(&self, method: Arc<dyn RpcMethod>) {
        self.methods
            .write()
            .await
            .insert(method.name().to_string(), method);
    }

    /// Binds many methods, skipping names that are already bound.
    pub async fn add_methods(&self, methods: impl IntoIterator<Item = Arc<dyn RpcMethod>>) {
        let mut map = self.methods.write().await;
        for method in methods {
            if let Entry::Vacant(entry) = map.entry(method.name().to_string()) {
                entry.insert(method);
            }
        }
    }
}

#[async_trait]
impl HandlerMapper for MethodMapper {
    async fn resolve(&self, request: &Request) -> Option<Arc<dyn RpcMethod>> {
        if let Some(matcher) = &self.matcher {
            return matcher(request);
        }

        self.methods.read().await.get(request.method()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Params;
    use async_trait::async_trait;
    use jsonrpc_protocol::Response;
    use serde_json::json;

    struct Named(&'static str, i64);

    #[async_trait]
    impl RpcMethod for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn handle(&self, request: &Request, _params: Option<Params>) -> Option<Response> {
            Some(Response::success(json!(self.1), Some(request)))
        }
    }

    fn request(method: &str) -> Request {
        Request::of::<serde_json::Value>(method, None, Some("1")).unwrap()
    }

    async fn tag(mapper: &MethodMapper, method: &str) -> Option<i64> {
        let resolved = mapper.resolve(&request(method)).await?;
        let response = resolved.handle(&request(method), None).await?;
        response.result().and_then(serde_json::Value::as_i64)
    }

    #[tokio::test]
    async fn lookup_is_by_method_name() {
        let mapper =
            MethodMapper::from_methods([Arc::new(Named("a", 1)) as Arc<dyn RpcMethod>]);

        assert_eq!(tag(&mapper, "a").await, Some(1));
        assert!(mapper.resolve(&request("b")).await.is_none());
    }

    #[tokio::test]
    async fn from_methods_keeps_the_first_binding_of_a_name() {
        let mapper = MethodMapper::from_methods([
            Arc::new(Named("a", 1)) as Arc<dyn RpcMethod>,
            Arc::new(Named("a", 2)) as Arc<dyn RpcMethod>,
        ]);

        assert_eq!(tag(&mapper, "a").await, Some(1));
    }

    #[tokio::test]
    async fn add_method_overwrites_and_add_methods_does_not() {
        let mapper = MethodMapper::empty();

        mapper.add_method(Arc::new(Named("a", 1))).await;
        mapper.add_method(Arc::new(Named("a", 2))).await;
        assert_eq!(tag(&mapper, "a").await, Some(2));

        mapper
            .add_methods([
                Arc::new(Named("a", 3)) as Arc<dyn RpcMethod>,
                Arc::new(Named("b", 4)) as Arc<dyn RpcMethod>,
            ])
            .await;
        assert_eq!(tag(&mapper, "a").await, Some(2));
        assert_eq!(tag(&mapper, "b").await, Some(4));
    }

    #[tokio::test]
    async fn set_methods_replaces_the_whole_mapping() {
        let mapper =
            MethodMapper::from_methods([Arc::new(Named("a", 1)) as Arc<dyn RpcMethod>]);

        mapper
            .set_methods([Arc::new(Named("b", 2)) as Arc<dyn RpcMethod>])
            .await;

        assert!(mapper.resolve(&request("a")).await.is_none());
        assert_eq!(tag(&mapper, "b").await, Some(2));
    }

    #[tokio::test]
    async fn a_custom_matcher_is_used_exclusively() {
        let fallback: Arc<dyn RpcMethod> = Arc::new(Named("fallback", 9));
        let mapper = MethodMapper::from_matcher(move |request| {
            request.method().starts_with("rpc.").then(|| fallback.clone())
        });

        // The name map stays empty and is never consulted.
        mapper.add_method(Arc::new(Named("a", 1))).await;

        assert!(mapper.resolve(&request("a")).await.is_none());
        assert!(mapper.resolve(&request("rpc.ping")).await.is_some());
    }

    #[tokio::test]
    async fn lookups_interleave_with_mutation() {
        let mapper = Arc::new(MethodMapper::from_methods([
            Arc::new(Named("a", 1)) as Arc<dyn RpcMethod>
        ]));

        let mut tasks = Vec::new();
        for round in 0..16i64 {
            let mapper = mapper.clone();
            tasks.push(tokio::spawn(async move {
                if round % 2 == 0 {
                    mapper.add_method(Arc::new(Named("b", round))).await;
                } else {
                    // Must see a consistent mapping at every point.
                    assert!(mapper.resolve(&request("a")).await.is_some());
                }
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }

        assert!(mapper.resolve(&request("a")).await.is_some());
        assert!(mapper.resolve(&request("b")).await.is_some());
    }
}
