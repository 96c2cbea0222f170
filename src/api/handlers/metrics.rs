use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardHandle;
use crate::models::stats::{FormattedTotals, SessionStats, TopIpRecord, Totals};

/// Query parameters for the top talkers table
#[derive(Deserialize)]
pub struct TopIpsQuery {
    #[serde(default = "default_top_limit")]
    limit: usize,
}

fn default_top_limit() -> usize {
    8
}

/// Response for the stats cards
#[derive(Serialize)]
struct StatsResponse {
    totals: Totals,
    formatted: FormattedTotals,
    session: SessionStats,
}

/// Full dashboard snapshot
pub async fn get_dashboard(dashboard: web::Data<DashboardHandle>) -> impl Responder {
    HttpResponse::Ok().json(dashboard.snapshot().as_ref())
}

/// Per-minute traffic samples, oldest first
pub async fn get_traffic(dashboard: web::Data<DashboardHandle>) -> impl Responder {
    HttpResponse::Ok().json(&dashboard.snapshot().traffic)
}

/// Busiest source addresses
pub async fn get_top_ips(
    dashboard: web::Data<DashboardHandle>,
    query: web::Query<TopIpsQuery>,
) -> impl Responder {
    let snapshot = dashboard.snapshot();
    let top: Vec<TopIpRecord> = snapshot.top_ips.iter().take(query.limit).cloned().collect();
    HttpResponse::Ok().json(top)
}

/// Protocol distribution
pub async fn get_protocols(dashboard: web::Data<DashboardHandle>) -> impl Responder {
    HttpResponse::Ok().json(&dashboard.snapshot().protocol_stats)
}

/// Running totals and session figures, raw and formatted
pub async fn get_stats(dashboard: web::Data<DashboardHandle>) -> impl Responder {
    let snapshot = dashboard.snapshot();
    HttpResponse::Ok().json(StatsResponse {
        totals: snapshot.totals,
        formatted: snapshot.formatted_totals.clone(),
        session: snapshot.session,
    })
}

/// Header status: active alerts and network health
pub async fn get_status(dashboard: web::Data<DashboardHandle>) -> impl Responder {
    HttpResponse::Ok().json(dashboard.snapshot().status)
}
