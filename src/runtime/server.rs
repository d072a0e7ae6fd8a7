//! HTTP/1 server exposing the application on a TCP socket.

use crate::app::Router;
use crate::http::AppResponse;
use crate::runtime::pipeline::{build_response, dispatch, generate_request_id};
use crate::runtime::ServerConfig;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Chat server.
///
/// Accepts connections and serves each one on its own task, routing every
/// request through the shared [`Router`].
pub struct AppServer {
    config: ServerConfig,
    app: Arc<Router>,
}

impl AppServer {
    /// Create a new server for an application.
    pub fn new(config: ServerConfig, app: Arc<Router>) -> Self {
        Self { config, app }
    }

    /// Bind and serve until the listener fails.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        info!("Chat server listening on {}", addr);
        self.serve(listener).await
    }

    /// Serve connections from an already-bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let app = self.app.clone();
        let config = self.config.clone();

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);

            let app = app.clone();
            let config = config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let app = app.clone();
                    let config = config.clone();
                    async move { handle_request(req, app, config, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Handle an incoming HTTP request.
async fn handle_request(
    req: Request<Incoming>,
    app: Arc<Router>,
    config: ServerConfig,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let request_id = generate_request_id();

    debug!(
        "Handling request: {} {} from {} [{}]",
        req.method(),
        req.uri().path(),
        remote_addr,
        request_id
    );

    if config.enable_health && req.uri().path() == "/_health" {
        return Ok(build_response(AppResponse::text("OK")));
    }

    match dispatch(&app, req, config.max_body_size, &request_id).await {
        Ok(response) => Ok(response),
        Err(e) => {
            error!("Handler error: {} [{}]", e, request_id);
            Ok(build_response(e.into()))
        }
    }
}
