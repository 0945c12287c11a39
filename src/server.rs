//! HTTP storage endpoint.
//!
//! Two routes over a [`SessionStore`]:
//!
//! - `POST /save` appends the JSON body and answers `{"message": "Session saved"}`.
//! - `GET /sessions` answers the full collection as a JSON array.
//!
//! Bodies that are not JSON get `400`, bodies over [`MAX_BODY_BYTES`] get `413`,
//! storage failures `500`, all with an `{"error": ...}` body. Store calls run on
//! the blocking pool.

use crate::error::Result;
use crate::storage::SessionStore;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Acknowledgement returned by `POST /save`.
pub const SAVED_MESSAGE: &str = "Session saved";

/// Largest `POST /save` body accepted.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Body of a successful `POST /save` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAck {
    /// Human-readable confirmation.
    pub message: String,
}

/// Storage endpoint bound to a listening socket.
pub struct Server {
    listener: TcpListener,
    store: Arc<dyn SessionStore>,
}

impl Server {
    /// Bind the endpoint to `addr`. Port 0 picks a free port.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub async fn bind(addr: SocketAddr, store: Arc<dyn SessionStore>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, store })
    }

    /// Address the endpoint is listening on.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Each connection is served on its own task; a failing connection is logged
    /// and does not stop the listener.
    ///
    /// # Errors
    ///
    /// Currently infallible once bound; the `Result` covers future listener errors.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("storage endpoint shutting down");
                    break;
                }
                accept = self.listener.accept() => {
                    match accept {
                        Ok((stream, peer)) => {
                            debug!(%peer, "connection accepted");
                            let store = Arc::clone(&self.store);
                            tokio::spawn(serve_connection(stream, peer, store));
                        }
                        Err(e) => warn!(error = %e, "failed to accept connection"),
                    }
                }
            }
        }

        Ok(())
    }
}

async fn serve_connection(
    stream: tokio::net::TcpStream,
    peer: SocketAddr,
    store: Arc<dyn SessionStore>,
) {
    let service = service_fn(move |req| {
        let store = Arc::clone(&store);
        async move { Ok::<_, Infallible>(handle(store, req).await) }
    });

    if let Err(e) = Builder::new(TokioExecutor::new())
        .serve_connection(TokioIo::new(stream), service)
        .await
    {
        debug!(%peer, error = %e, "connection closed with error");
    }
}

/// Route one request against `store`.
pub async fn handle<B>(store: Arc<dyn SessionStore>, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match (req.method(), req.uri().path()) {
        (&Method::POST, "/save") => save(store, req.into_body()).await,
        (&Method::GET, "/sessions") => list(store).await,
        (_, "/save" | "/sessions") => {
            json_response(StatusCode::METHOD_NOT_ALLOWED, &json!({"error": "method not allowed"}))
        }
        _ => json_response(StatusCode::NOT_FOUND, &json!({"error": "not found"})),
    };

    info!(%method, %path, status = response.status().as_u16(), "request");
    response
}

async fn save<B>(store: Arc<dyn SessionStore>, body: B) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let bytes = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            return error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("body exceeds {MAX_BODY_BYTES} bytes"),
            );
        }
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("failed to read body: {e}"));
        }
    };

    let record: Value = match serde_json::from_slice(&bytes) {
        Ok(record) => record,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("body is not JSON: {e}"));
        }
    };

    match blocking(move || store.append(&record)).await {
        Ok(()) => json_response(StatusCode::OK, &json!({ "message": SAVED_MESSAGE })),
        Err(message) => {
            error!(error = %message, "failed to save session");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

async fn list(store: Arc<dyn SessionStore>) -> Response<Full<Bytes>> {
    match blocking(move || store.list_all()).await {
        Ok(records) => json_response(StatusCode::OK, &Value::Array(records)),
        Err(message) => {
            error!(error = %message, "failed to list sessions");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

/// Run a store call on the blocking pool, flattening join and store errors.
async fn blocking<T, F>(f: F) -> std::result::Result<T, String>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("storage task failed: {e}")),
    }
}

fn error_response(status: StatusCode, message: String) -> Response<Full<Bytes>> {
    json_response(status, &json!({ "error": message }))
}

fn json_response(status: StatusCode, body: &Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
