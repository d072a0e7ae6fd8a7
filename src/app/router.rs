//! Exact-path router mapping `(method, path)` to handlers.

use crate::app::handler::{AppError, Handler, RequestContext};
use crate::http::{AppRequest, AppResponse, Method, StatusCode};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

/// The application object: a set of routes plus environment shared with
/// every handler.
///
/// Routes are registered up front; after that the router is immutable and
/// can be shared behind an `Arc` by the server and by test clients.
#[derive(Default)]
pub struct Router {
    /// path -> method -> handler. Methods are ordered so `Allow` headers are stable.
    routes: HashMap<String, BTreeMap<Method, Arc<dyn Handler>>>,
    /// Environment values copied into every request context.
    env: HashMap<String, String>,
}

impl Router {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment value visible to every handler.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Register a handler for an exact method and path.
    pub fn route(
        &mut self,
        method: Method,
        path: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Result<(), AppError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(AppError::new(format!(
                "Route path '{}' must start with '/'",
                path
            )));
        }

        let methods = self.routes.entry(path.clone()).or_default();
        if methods.contains_key(&method) {
            return Err(AppError::new(format!(
                "Route {} {} is already registered",
                method, path
            )));
        }

        info!("Registered route: {} {} -> {}", method, path, handler.name());
        methods.insert(method, handler);
        Ok(())
    }

    /// List registered routes as `(method, path)` pairs, sorted by path.
    pub fn routes(&self) -> Vec<(String, String)> {
        let mut routes: Vec<(String, String)> = self
            .routes
            .iter()
            .flat_map(|(path, methods)| {
                methods
                    .keys()
                    .map(move |method| (method.to_string(), path.clone()))
            })
            .collect();
        routes.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        routes
    }

    /// Route a request to its handler.
    ///
    /// Routing misses become `404`/`405` responses. A handler failure is
    /// returned as `Err` so the caller decides whether to render or raise it.
    pub async fn dispatch(
        &self,
        request: AppRequest,
        request_id: &str,
    ) -> Result<AppResponse, AppError> {
        let Some(methods) = self.routes.get(&request.path) else {
            debug!("No route for {} {} [{}]", request.method, request.path, request_id);
            return Ok(detail_response(StatusCode::NOT_FOUND, "Not Found"));
        };

        let Some(handler) = methods.get(&request.method) else {
            let allow = methods
                .keys()
                .map(|method| method.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            debug!(
                "Method {} not allowed on {} [{}]",
                request.method, request.path, request_id
            );
            return Ok(
                detail_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
                    .header("Allow", allow),
            );
        };

        let ctx = self
            .env
            .iter()
            .fold(RequestContext::new(request_id), |ctx, (key, value)| {
                ctx.with_env(key.as_str(), value.as_str())
            });

        debug!(
            "Dispatching {} {} to '{}' [{}]",
            request.method,
            request.path,
            handler.name(),
            request_id
        );
        handler.handle(request, &ctx).await
    }
}

/// JSON error body of the form `{"detail": "..."}`.
pub fn detail_response(status: StatusCode, detail: impl Into<String>) -> AppResponse {
    let detail = detail.into();
    AppResponse::json_with_status(status, &serde_json::json!({ "detail": detail }))
        .unwrap_or_else(|_| AppResponse::plain(status, detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;

    struct Fixed(&'static str);

    #[async_trait]
    impl Handler for Fixed {
        async fn handle(
            &self,
            _request: AppRequest,
            ctx: &RequestContext,
        ) -> Result<AppResponse, AppError> {
            Ok(AppResponse::text(format!(
                "{} {}",
                self.0,
                ctx.get_env("STAGE").cloned().unwrap_or_default()
            )))
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn rejects_relative_paths() {
        let mut router = Router::new();
        assert!(router
            .route(Method::Get, "chat", Arc::new(Fixed("x")))
            .is_err());
    }

    #[test]
    fn routes_are_listed_in_order() {
        let mut router = Router::new();
        router.route(Method::Post, "/chat", Arc::new(Fixed("a"))).unwrap();
        router.route(Method::Get, "/chat", Arc::new(Fixed("b"))).unwrap();
        router.route(Method::Get, "/about", Arc::new(Fixed("c"))).unwrap();

        assert_eq!(
            router.routes(),
            vec![
                ("GET".to_string(), "/about".to_string()),
                ("GET".to_string(), "/chat".to_string()),
                ("POST".to_string(), "/chat".to_string()),
            ]
        );
    }

    #[test]
    fn env_reaches_handlers() {
        let mut router = Router::new().with_env("STAGE", "dev");
        router.route(Method::Get, "/", Arc::new(Fixed("root"))).unwrap();

        let response =
            tokio_test::block_on(router.dispatch(AppRequest::default(), "req-1")).unwrap();
        assert_eq!(response.body, Some(Bytes::from_static(b"root dev")));
    }
}
