use actix_web::{web, HttpResponse, Responder};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardHandle;
use crate::models::filter::{FilterMode, PacketFilter};
use crate::models::packet::Packet;

/// Query parameters for the live packet view
#[derive(Deserialize)]
pub struct PacketsQuery {
    /// `all` or `anomalies`
    #[serde(default)]
    filter: FilterMode,

    /// Search over addresses and protocol
    search: Option<String>,

    /// Maximum packets returned
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for listing packets
#[derive(Serialize)]
struct PacketsResponse {
    packets: Vec<Packet>,
    /// Packets currently buffered
    total: usize,
    /// Buffered packets passing the filter, before the limit
    matched: usize,
    limit: usize,
}

/// Get filtered live packets, newest first
pub async fn get_packets(
    dashboard: web::Data<DashboardHandle>,
    query: web::Query<PacketsQuery>,
) -> impl Responder {
    let snapshot = dashboard.snapshot();
    let query = query.into_inner();
    let filter = PacketFilter::new(query.filter, query.search.filter(|s| !s.is_empty()));

    let matched = snapshot
        .packets
        .iter()
        .filter(|packet| filter.matches(packet))
        .count();
    let packets = filter.apply(&snapshot.packets, query.limit);

    debug!(
        "Returning {} of {} packets (filter: {:?})",
        packets.len(),
        snapshot.packets.len(),
        filter
    );

    HttpResponse::Ok().json(PacketsResponse {
        packets,
        total: snapshot.packets.len(),
        matched,
        limit: query.limit,
    })
}
