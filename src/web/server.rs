use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{debug, error, info, warn, Level};

use crate::cli::ServeArgs;
use crate::core::report::LabReport;
use crate::parsing::lab_file::{inspect_lab_file, LabFileError, MAX_PARSE_BYTES};
use crate::utils::validation::validate_upload_filename;

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 10;
/// Only this many leading bytes of an uploaded file are ever buffered
pub const MAX_UPLOAD_PREFIX: usize = MAX_PARSE_BYTES;
pub const MAX_REQUEST_BODY_SIZE: usize = 64 * 1024 * 1024; // 64MB
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for uploads the server failed to read
const UPLOAD_FAILED: &str = "upload_failed";
pub const MAX_CONCURRENT_REQUESTS: usize = 100;

/// Multipart field carrying the uploaded lab file
pub const FILE_FIELD: &str = "file";

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    pub error_type: String,
}

/// Success body of the inspection endpoint
#[derive(Serialize)]
struct InspectResponse<'a> {
    ok: bool,
    #[serde(flatten)]
    report: &'a LabReport,
}

/// Leading bytes of an uploaded file
#[derive(Debug)]
struct Upload {
    filename: Option<String>,
    content: Vec<u8>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
#[must_use]
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    let detail = internal_error.unwrap_or("no details");
    if rejection_level(error_type) == Level::ERROR {
        error!("Internal error ({error_type}): {detail}");
    } else {
        warn!("Rejected request ({error_type}): {detail}");
    }

    ErrorResponse {
        ok: false,
        error: user_message.to_string(),
        error_type: error_type.to_string(),
    }
}

/// Level at which a rejection is logged: server-side read failures are
/// errors, everything caused by the client's input is a warning
fn rejection_level(error_type: &str) -> Level {
    if error_type == UPLOAD_FAILED {
        Level::ERROR
    } else {
        Level::WARN
    }
}

fn error_response(
    status: StatusCode,
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> Response {
    (
        status,
        Json(create_safe_error_response(
            error_type,
            user_message,
            internal_error,
        )),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Routes with security headers, timeout, concurrency and body limits.
///
/// Rate limiting is added by [`create_router`] since it needs the peer
/// address of each connection.
pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/health", get(health_handler))
        .route("/api/lab-file", post(inspect_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                ))
                .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE)),
        )
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_router() -> anyhow::Result<Router> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    Ok(router().layer(GovernorLayer {
        config: Arc::new(governor_conf),
    }))
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let app = create_router()?;

    let addr = format!("{}:{}", args.address, args.port);
    info!("Starting lab-peek web server at http://{addr}");
    println!("Starting lab-peek web server at http://{addr}");

    if args.open {
        if let Err(e) = open::that(format!("http://{addr}")) {
            warn!("Failed to open browser: {e}");
        }
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Upload page
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Recognize an uploaded lab file and return its metadata preview
async fn inspect_handler(mut multipart: Multipart) -> Response {
    let upload = match extract_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(error_response) => return error_response,
    };

    let name = upload.filename.as_deref().unwrap_or("<unnamed>");
    match inspect_lab_file(&upload.content) {
        Ok(report) => {
            info!(
                "Recognized lab file {name} ({} header keys, {} columns)",
                report.header.len(),
                report.data_columns.len()
            );
            Json(InspectResponse {
                ok: true,
                report: &report,
            })
            .into_response()
        }
        Err(e @ LabFileError::NotRecognized) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "not_recognized",
            &e.to_string(),
            Some(&format!("{name}: section markers missing")),
        ),
    }
}

/// Pull the `file` field out of the multipart form, keeping only its prefix
async fn extract_upload(multipart: &mut Multipart) -> Result<Upload, Response> {
    let mut fields_received = 0usize;

    loop {
        if fields_received >= MAX_MULTIPART_FIELDS {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "field_limit_exceeded",
                "Too many form fields",
                None,
            ));
        }

        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                let message = if fields_received == 0 {
                    "No data received. Please upload a lab file."
                } else {
                    "No lab file found in upload."
                };
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    "missing_input",
                    message,
                    None,
                ));
            }
            Err(e) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    UPLOAD_FAILED,
                    "Failed to read upload.",
                    Some(&e.to_string()),
                ));
            }
        };
        fields_received += 1;

        if field.name() != Some(FILE_FIELD) {
            continue; // Ignore unknown fields
        }

        let filename = match validate_upload_filename(field.file_name()) {
            Ok(filename) => filename,
            Err(e) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    e.error_type(),
                    "Filename contains invalid or dangerous characters",
                    Some(&e.to_string()),
                ));
            }
        };

        let mut content = Vec::new();
        while content.len() < MAX_UPLOAD_PREFIX {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    let take = chunk.len().min(MAX_UPLOAD_PREFIX - content.len());
                    content.extend_from_slice(&chunk[..take]);
                }
                Ok(None) => break,
                Err(e) => {
                    return Err(error_response(
                        StatusCode::BAD_REQUEST,
                        UPLOAD_FAILED,
                        "Failed to read uploaded file.",
                        Some(&e.to_string()),
                    ));
                }
            }
        }

        debug!("Buffered {} bytes of upload", content.len());
        return Ok(Upload { filename, content });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_level() {
        assert_eq!(rejection_level(UPLOAD_FAILED), Level::ERROR);
        assert_eq!(rejection_level("not_recognized"), Level::WARN);
        assert_eq!(rejection_level("missing_input"), Level::WARN);
        assert_eq!(rejection_level("invalid_filename"), Level::WARN);
    }

    #[test]
    fn test_safe_error_response_hides_internal_detail() {
        let response = create_safe_error_response(
            UPLOAD_FAILED,
            "Failed to read upload.",
            Some("stream error: connection reset"),
        );
        assert!(!response.ok);
        assert_eq!(response.error, "Failed to read upload.");
        assert_eq!(response.error_type, "upload_failed");
    }
}
