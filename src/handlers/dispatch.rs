//! The request pipeline for every path except `/` and `/metrics`.
//!
//! whitelist -> rate limit -> route lookup -> parameter substitution -> command.
//! The command runs on its own task: a panic there surfaces as a `JoinError`
//! and becomes a 500 for this request only, and a client hanging up stops
//! neither the command nor its access record.

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::access_log::RequestMeta;
use crate::error::DispatchError;
use crate::executor::{self, ExecutionResult};
use crate::state::AppState;
use crate::substitute::{self, QueryParams};

const NO_ACCESS_BODY: &str = "NOACCESS";
const OK_BODY: &str = "OK";
const ERR_BODY: &str = "ERR";

pub async fn dispatch_handler(State(state): State<Arc<AppState>>, req: Request) -> Response {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let meta = RequestMeta::from_request(&req);
    let Some(source) = meta.source else {
        error!(url = %meta.path, "couldn't determine remote address, dropping request");
        return StatusCode::OK.into_response();
    };

    if !state.config.whitelist.is_allowed(&source.ip().to_string()) {
        meta.log(StatusCode::FORBIDDEN, None);
        return (StatusCode::FORBIDDEN, NO_ACCESS_BODY).into_response();
    }

    if !state.rate_limiter.try_acquire(&meta.path) {
        meta.log(StatusCode::TOO_MANY_REQUESTS, None);
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    let Some(template) = state.routes.get(&meta.path).map(str::to_string) else {
        meta.log(StatusCode::NOT_FOUND, None);
        let body = format!("URL not found or configured! ({:?})", meta.path);
        return (StatusCode::NOT_FOUND, body).into_response();
    };

    let uri = req.uri().clone();
    match spawn_route(state, meta, template, uri).await {
        Ok((status, body)) => (status, body).into_response(),
        Err(join_error) => {
            error!(err = %join_error, "dispatch task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// Runs the matched route and writes its access record on tasks the handler
// doesn't own, so a caller hanging up mid-command still gets logged. The
// inner task is the panic boundary, the outer one only logs and builds the body.
fn spawn_route(
    state: Arc<AppState>,
    meta: RequestMeta,
    template: String,
    uri: Uri,
) -> JoinHandle<(StatusCode, String)> {
    tokio::spawn(async move {
        let task_state = Arc::clone(&state);
        let path = meta.path.clone();
        let outcome =
            tokio::spawn(async move { run_route(&task_state, &path, &template, &uri).await })
                .await;

        let return_result = state.config.return_result;
        match outcome {
            Ok(Ok(result)) => {
                meta.log(StatusCode::OK, None);
                let body = if return_result { result.stdout } else { OK_BODY.to_string() };
                (StatusCode::OK, body)
            }
            Ok(Err(failure)) => {
                meta.log(StatusCode::INTERNAL_SERVER_ERROR, Some(&failure.error));
                let body = if return_result { failure.stderr } else { ERR_BODY.to_string() };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            Err(join_error) => {
                meta.log(StatusCode::INTERNAL_SERVER_ERROR, Some(&join_error));
                (StatusCode::INTERNAL_SERVER_ERROR, String::new())
            }
        }
    })
}

// A matched route that didn't succeed, stderr is empty when nothing ran
#[derive(Debug)]
struct RouteFailure {
    error: DispatchError,
    stderr: String,
}

impl RouteFailure {
    fn before_execution(error: DispatchError) -> Self {
        Self {
            error,
            stderr: String::new(),
        }
    }
}

async fn run_route(
    state: &AppState,
    path: &str,
    template: &str,
    uri: &Uri,
) -> Result<ExecutionResult, RouteFailure> {
    let substitution = &state.config.substitution;
    let command = if substitution.enabled {
        let params = match QueryParams::from_uri(uri) {
            Ok(params) => params,
            Err(e) if substitution.continue_on_error => {
                warn!(path, "ignoring query string: {e}");
                QueryParams::default()
            }
            Err(e) => return Err(RouteFailure::before_execution(e.into())),
        };
        substitute::substitute(template, &params, substitution)
            .map_err(|e| RouteFailure::before_execution(e.into()))?
    } else {
        template.to_string()
    };

    let mut result = executor::execute(&command).await;
    let duration = result.duration;
    match result.error.take() {
        None => {
            info!(
                path,
                duration = ?duration,
                stdout = %result.stdout,
                stderr = %result.stderr,
                "execution success"
            );
            Ok(result)
        }
        Some(e) => {
            error!(
                path,
                duration = ?duration,
                stdout = %result.stdout,
                stderr = %result.stderr,
                err = %e,
                "execution error"
            );
            Err(RouteFailure {
                error: e.into(),
                stderr: result.stderr,
            })
        }
    }
}
