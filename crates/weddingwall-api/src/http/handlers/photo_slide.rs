//! Slideshow polling endpoint.
//!
//! Each GET advances the conveyor by at most one image and returns the
//! JPEG to show. The kiosk page polls this on a fixed interval.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use weddingwall_core::rotation::service::{PollOutcome, SlideImage};

use crate::http::error::AppError;
use crate::state::AppState;

const NO_IMAGE: &str = "No image available to display";

/// GET /api/photo_slide - Rotate and return the image to display.
pub async fn next_slide(State(state): State<AppState>) -> Result<Response, AppError> {
    let outcome = state.rotation.poll().await?;
    if let PollOutcome::Rotated(img) = &outcome {
        tracing::info!(image = %img.name, bytes = img.bytes.len(), "serving new image");
    }
    match outcome.into_image() {
        Some(img) => Ok(jpeg_response(img)),
        None => Err(AppError::NotFound(NO_IMAGE.to_string())),
    }
}

fn jpeg_response(img: SlideImage) -> Response {
    (
        [
            (header::CONTENT_TYPE, img.content_type),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        img.bytes,
    )
        .into_response()
}
