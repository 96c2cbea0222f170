use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardHandle;
use crate::models::alert::{Alert, SeverityBreakdown};

/// Query parameters for listing alerts
#[derive(Deserialize)]
pub struct AlertsQuery {
    /// Include alerts that were already resolved
    #[serde(default)]
    include_resolved: bool,
}

/// Response for listing alerts
#[derive(Serialize)]
struct AlertsResponse {
    alerts: Vec<Alert>,
    active: usize,
    breakdown: SeverityBreakdown,
}

/// List alerts, newest first; unresolved only unless asked otherwise
pub async fn list_alerts(
    dashboard: web::Data<DashboardHandle>,
    query: web::Query<AlertsQuery>,
) -> impl Responder {
    let snapshot = dashboard.snapshot();

    let alerts = snapshot
        .alerts
        .iter()
        .filter(|alert| query.include_resolved || !alert.resolved)
        .cloned()
        .collect();

    HttpResponse::Ok().json(AlertsResponse {
        alerts,
        active: snapshot.status.active_alerts,
        breakdown: snapshot.status.severity_breakdown,
    })
}

/// Resolve an alert. Unknown or already resolved ids succeed with `resolved: false`.
pub async fn resolve_alert(
    dashboard: web::Data<DashboardHandle>,
    path: web::Path<String>,
) -> impl Responder {
    let alert_id = path.into_inner();

    match dashboard.resolve_alert(alert_id.clone()).await {
        Ok(resolved) => {
            if resolved {
                info!("Alert {} resolved via API", alert_id);
            }
            HttpResponse::Ok().json(serde_json::json!({
                "status": "success",
                "alert_id": alert_id,
                "resolved": resolved
            }))
        }
        Err(e) => {
            error!("Failed to resolve alert {}: {}", alert_id, e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "error",
                "message": format!("Failed to resolve alert: {}", e)
            }))
        }
    }
}
