//! HTTP side of the puzzle generator: accepts an uploaded image, cuts it
//! into a printable puzzle pack and hands back a download link.

mod grid;
mod pack;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::{ServerConfig, DEFAULT_PIECES};
use crate::error::PackError;
use crate::widget::{IMAGE_FIELD, PIECES_FIELD};

pub use grid::{calculate_grid, cell_span};
pub use pack::{build_pack, draw_guide, PuzzlePack, GUIDE_FILE, MAX_PIECES, PACK_FILE};

pub const GENERATED_ROUTE: &str = "/static/generated";
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;
const INVALID_PIECES: &str = "Invalid piece count";

#[derive(Clone)]
struct AppState {
    output_dir: PathBuf,
}

#[derive(Serialize)]
struct Generated {
    download_url: String,
}

/// Error reply in the `{"error": ...}` shape the upload widget expects.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

struct Upload {
    file_name: Option<String>,
    bytes: Vec<u8>,
}

async fn generate(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Generated>, ApiError> {
    let mut upload = None;
    let mut pieces = DEFAULT_PIECES;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
                upload = Some(Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            Some(PIECES_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
                pieces = text
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n <= MAX_PIECES)
                    .ok_or_else(|| ApiError::bad_request(INVALID_PIECES))?;
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("No image uploaded"))?;
    let file_name = match upload.file_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(ApiError::bad_request("No selected file")),
    };

    let session = Uuid::new_v4().to_string();
    let session_dir = state.output_dir.join(&session);
    info!(%session, %file_name, pieces, "📥 generating puzzle pack");

    let bytes = upload.bytes;
    let built = tokio::task::spawn_blocking(move || build_pack(&bytes, pieces, &session_dir))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    match built {
        Ok(pack) => {
            info!(%session, rows = pack.rows, cols = pack.cols, "✅ puzzle pack ready");
            Ok(Json(Generated {
                download_url: format!("{GENERATED_ROUTE}/{session}/{PACK_FILE}"),
            }))
        }
        Err(e @ PackError::PieceCount { .. }) => {
            info!(%session, error = %e, "piece count rejected");
            Err(ApiError::bad_request(INVALID_PIECES))
        }
        Err(e) => {
            error!(%session, error = %e, "puzzle generation failed");
            Err(ApiError::internal(e.to_string()))
        }
    }
}

/// Landing page. Uploads go through `POST /generate`, driven by the
/// `puzzle-pack upload` client; the page itself only documents the API.
async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Puzzle Pack</title>
</head>
<body>
    <h1>🧩 Puzzle Pack</h1>
    <p>POST a multipart form to <code>/generate</code> with an <code>image</code> file
    and an optional <code>pieces</code> count. The JSON reply carries a
    <code>download_url</code> for the zipped pack, or an <code>error</code>.</p>
    <p>From a terminal: <code>puzzle-pack upload photo.jpg --save pack.zip</code></p>
</body>
</html>"#,
    )
}

pub fn router(output_dir: PathBuf) -> Router {
    let state = Arc::new(AppState {
        output_dir: output_dir.clone(),
    });

    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .nest_service(GENERATED_ROUTE, ServeDir::new(output_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;

    info!("🚀 Server running on http://{}", config.bind);
    info!("🧩 Packs are written to {}", config.output_dir.display());

    axum::serve(listener, router(config.output_dir)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use std::io::Cursor;
    use tower::ServiceExt;

    const BOUNDARY: &str = "puzzle-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_request(parts: &[Part]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File(name, file_name, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/generate")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(60, 40, image::Rgba([0, 0, 255, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn generate_returns_download_url() {
        let dir = tempfile::tempdir().unwrap();
        let png = png_bytes();
        let request = multipart_request(&[
            Part::Text(PIECES_FIELD, "6"),
            Part::File(IMAGE_FIELD, "photo.png", &png),
        ]);

        let (status, json) = call(router(dir.path().to_path_buf()), request).await;

        assert_eq!(status, StatusCode::OK);
        let url = json["download_url"].as_str().unwrap();
        assert!(url.starts_with("/static/generated/"));
        assert!(url.ends_with("/puzzle_pack.zip"));
        let session = url.split('/').nth(3).unwrap();
        assert!(dir.path().join(session).join(PACK_FILE).exists());
    }

    #[tokio::test]
    async fn missing_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let request = multipart_request(&[Part::Text(PIECES_FIELD, "6")]);
        let (status, json) = call(router(dir.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No image uploaded");
    }

    #[tokio::test]
    async fn empty_file_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let request = multipart_request(&[Part::File(IMAGE_FIELD, "", b"")]);
        let (status, json) = call(router(dir.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No selected file");
    }

    #[tokio::test]
    async fn bad_piece_count_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let png = png_bytes();
        let request = multipart_request(&[
            Part::Text(PIECES_FIELD, "lots"),
            Part::File(IMAGE_FIELD, "photo.png", &png),
        ]);
        let (status, json) = call(router(dir.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid piece count");
    }

    #[tokio::test]
    async fn oversized_piece_count_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let png = png_bytes();
        let request = multipart_request(&[
            Part::Text(PIECES_FIELD, "1000000000"),
            Part::File(IMAGE_FIELD, "photo.png", &png),
        ]);
        let (status, json) = call(router(dir.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid piece count");
    }

    #[tokio::test]
    async fn more_pieces_than_pixels_is_rejected() {
        // 60x40 image, 2400 pixels
        let dir = tempfile::tempdir().unwrap();
        let png = png_bytes();
        let request = multipart_request(&[
            Part::Text(PIECES_FIELD, "3000"),
            Part::File(IMAGE_FIELD, "photo.png", &png),
        ]);
        let (status, json) = call(router(dir.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid piece count");
    }

    #[tokio::test]
    async fn index_describes_the_api() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router(dir.path().to_path_buf()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("/generate"));
        assert!(!html.contains("<form"));
    }

    #[tokio::test]
    async fn undecodable_image_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let request = multipart_request(&[Part::File(IMAGE_FIELD, "photo.png", b"garbage")]);
        let (status, json) = call(router(dir.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("cannot decode image"));
    }
}
