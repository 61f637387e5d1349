//! Prometheus metrics for chronicle-service.
//!
//! Exposes feed-cache and write-path collectors and an HTTP handler for the
//! `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Feed cache events (hit/miss/error).
    pub static ref FEED_CACHE_EVENTS: IntCounterVec = register_int_counter_vec!(
        "feed_cache_events_total",
        "Feed cache events segmented by outcome",
        &["event"]
    )
    .expect("failed to register feed_cache_events_total");

    /// Content writes (post_create/post_edit/comment_create).
    pub static ref CONTENT_WRITE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "content_write_total",
        "Content mutations segmented by action",
        &["action"]
    )
    .expect("failed to register content_write_total");

    /// Follow-graph changes (follow/unfollow).
    pub static ref FOLLOW_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "follow_events_total",
        "Follow graph changes segmented by action",
        &["action"]
    )
    .expect("failed to register follow_events_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
