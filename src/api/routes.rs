use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::api::handlers::{
    alerts::{list_alerts, resolve_alert},
    metrics::{get_dashboard, get_protocols, get_stats, get_status, get_top_ips, get_traffic},
    packets::get_packets,
};
use crate::api::websocket::ws_index;

/// Root endpoint to provide information about the API
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "name": "netsentry API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Synthetic network telemetry for a live monitoring dashboard",
        "endpoints": [
            {
                "path": "/api/dashboard",
                "method": "GET",
                "description": "Full dashboard snapshot"
            },
            {
                "path": "/api/packets",
                "method": "GET",
                "description": "Live packets; query: filter=all|anomalies, search, limit"
            },
            {
                "path": "/api/alerts",
                "method": "GET",
                "description": "Alerts, newest first; query: include_resolved"
            },
            {
                "path": "/api/alerts/{id}/resolve",
                "method": "POST",
                "description": "Resolve an alert"
            },
            {
                "path": "/api/traffic",
                "method": "GET",
                "description": "Per-minute traffic samples"
            },
            {
                "path": "/api/top-ips",
                "method": "GET",
                "description": "Top source addresses; query: limit"
            },
            {
                "path": "/api/protocols",
                "method": "GET",
                "description": "Protocol distribution"
            },
            {
                "path": "/api/stats",
                "method": "GET",
                "description": "Running totals and session figures"
            },
            {
                "path": "/api/status",
                "method": "GET",
                "description": "Active alerts and network status"
            },
            {
                "path": "/api/ws",
                "method": "GET",
                "description": "WebSocket endpoint for real-time updates"
            }
        ]
    }))
}

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Root endpoint
        .route("/", web::get().to(index))
        .service(
            web::scope("/api")
                // WebSocket route for real-time updates
                .route("/ws", web::get().to(ws_index))
                .route("/dashboard", web::get().to(get_dashboard))
                .route("/packets", web::get().to(get_packets))
                .service(
                    web::scope("/alerts")
                        .route("", web::get().to(list_alerts))
                        .route("/{id}/resolve", web::post().to(resolve_alert)),
                )
                .route("/traffic", web::get().to(get_traffic))
                .route("/top-ips", web::get().to(get_top_ips))
                .route("/protocols", web::get().to(get_protocols))
                .route("/stats", web::get().to(get_stats))
                .route("/status", web::get().to(get_status)),
        );
}
