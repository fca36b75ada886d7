//! Request logging middleware.
//!
//! Each request runs inside a `tracing` span carrying a fresh `request_id`,
//! and a completion event records its status and latency. The identifier is
//! held in task-local storage so error mapping can log it, and it is echoed
//! back in a `request-id` response header.
//!
//! Tokio task-locals are not inherited by spawned tasks; wrap spawned work in
//! [`RequestId::scope`] to keep the identifier visible.

use std::future::Future;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tokio::task_local;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

task_local! {
    static REQUEST_ID: RequestId;
}

const REQUEST_ID_HEADER: &str = "request-id";

/// Per-request identifier exposed via task-local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The identifier of the request being served, if any.
    pub fn current() -> Option<Self> {
        REQUEST_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `request_id` in scope.
    ///
    /// # Examples
    /// ```
    /// use poi_backend::middleware::RequestId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// assert!(RequestId::current().is_none());
    /// # });
    /// ```
    pub async fn scope<Fut>(request_id: RequestId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        REQUEST_ID.scope(request_id, fut).await
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Middleware logging every request under a request-scoped span.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use poi_backend::middleware::RequestLog;
///
/// let _app = App::new().wrap(RequestLog);
/// ```
#[derive(Clone)]
pub struct RequestLog;

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequestLog`].
pub struct RequestLogMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = RequestId::generate();
        let span = info_span!(
            "http_request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
        );
        let started = Instant::now();
        let fut = self.service.call(req);

        let logged = async move {
            let elapsed_us = |started: Instant| {
                u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX)
            };
            let mut res = match fut.await {
                Ok(res) => res,
                Err(error) => {
                    warn!(%error, elapsed_us = elapsed_us(started), "request failed");
                    return Err(error);
                }
            };
            info!(
                status = res.status().as_u16(),
                elapsed_us = elapsed_us(started),
                "request completed"
            );
            match HeaderValue::from_str(&request_id.to_string()) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }
                Err(error) => warn!(%error, "failed to encode request identifier header"),
            }
            Ok(res)
        };
        Box::pin(RequestId::scope(request_id, logged.instrument(span)))
    }
}
