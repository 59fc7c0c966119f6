//! HTTP server for the rate uploader.
//!
//! # API Endpoints
//!
//! | Method | Path          | Description                                    |
//! |--------|---------------|------------------------------------------------|
//! | GET    | `/health`     | Health check                                   |
//! | POST   | `/api/upload` | Multipart `file` (CSV) + `object_ids`, uploads |
//! | GET    | `/api/logs`   | SSE stream for real-time logs                  |

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::LOG_BROADCASTER;
use super::types::{error_response, UploadResponse};
use crate::client::CollectionClient;
use crate::error::{PipelineError, ServerError, ServerResult};
use crate::transform::pipeline::upload_bytes;

/// Largest accepted CSV upload (50 MB).
pub const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

type ApiError = (StatusCode, Json<Value>);

/// Build the router around a configured collection client.
pub fn router(client: CollectionClient) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload_rates))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(cors)
        .with_state(client)
}

/// Start the HTTP server
pub async fn start_server(port: u16, client: CollectionClient) -> ServerResult<()> {
    let collection_id = client.config().collection_id;
    let app = router(client);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Rate uploader running on http://localhost:{}", port);
    println!("   POST /api/upload - Upload rates CSV (collection {})", collection_id);
    println!("   GET  /api/logs   - SSE log stream");
    println!("   GET  /health     - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "rate-uploader",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload endpoint: maps the CSV rows for `object_ids` and writes them to the collection.
async fn upload_rates(
    State(client): State<CollectionClient>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut object_ids: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Read error: {}", e)))?;
                file_data = Some(bytes.to_vec());
            }
            "object_ids" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Read error: {}", e)))?;
                object_ids = Some(text);
            }
            _ => {}
        }
    }

    let bytes = file_data.ok_or_else(|| bad_request("No file provided"))?;
    let ids = object_ids
        .filter(|ids| !ids.trim().is_empty())
        .ok_or_else(|| bad_request("No object_ids provided"))?;

    println!(
        "\n📄 NEW UPLOAD: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    );

    let report = upload_bytes(&bytes, &ids, &client)
        .await
        .map_err(|e| pipeline_error(ServerError::from(e)))?;

    Ok(Json(UploadResponse::from(report)))
}

fn bad_request(message: impl Into<String>) -> ApiError {
    let err = ServerError::BadRequest(message.into());
    (StatusCode::BAD_REQUEST, Json(error_response(&err.to_string())))
}

fn pipeline_error(err: ServerError) -> ApiError {
    let status = match &err {
        ServerError::Pipeline(PipelineError::Csv(_) | PipelineError::NoKeys) => {
            StatusCode::BAD_REQUEST
        }
        ServerError::Pipeline(PipelineError::Upload(_)) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    eprintln!("❌ Upload error: {}", err);
    (status, Json(error_response(&err.to_string())))
}
