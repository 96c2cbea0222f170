use actix_web::{web, Error, HttpRequest, Responder};
use actix_ws::{self, Message};
use futures_util::StreamExt;
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Duration;
use tokio::time::{interval, sleep_until, Instant};
use uuid::Uuid;

use crate::dashboard::DashboardHandle;
use crate::models::snapshot::{DashboardSnapshot, DashboardStatus};
use crate::utils::error::AppResult;

// How often heartbeat pings are sent
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

// Clients silent for this long are dropped
const CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

// Send at most one snapshot per second
const SNAPSHOT_THROTTLE: Duration = Duration::from_secs(1);

/// WebSocket message types that can be sent to clients
#[derive(Serialize)]
#[serde(tag = "type")]
enum WsOutMessage<'a> {
    #[serde(rename = "snapshot")]
    Snapshot { snapshot: &'a DashboardSnapshot },

    #[serde(rename = "status")]
    Status { status: DashboardStatus },

    #[serde(rename = "resolved")]
    Resolved { alert_id: String, resolved: bool },

    #[serde(rename = "ping")]
    Ping { timestamp: i64 },

    #[serde(rename = "error")]
    Error { message: String },
}

/// Text commands a client may send
#[derive(Debug, PartialEq, Eq)]
enum ClientCommand<'a> {
    Snapshot,
    Status,
    Resolve(&'a str),
}

impl<'a> ClientCommand<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let command = match (parts.next()?, parts.next()) {
            ("snapshot", None) => ClientCommand::Snapshot,
            ("status", None) => ClientCommand::Status,
            ("resolve", Some(id)) => ClientCommand::Resolve(id),
            _ => return None,
        };
        match parts.next() {
            Some(_) => None,
            None => Some(command),
        }
    }
}

/// Rate limit for snapshot pushes on one connection.
///
/// Publishes that land inside the window are coalesced into a single push
/// sent as soon as the window ends.
#[derive(Debug)]
struct PushThrottle {
    period: Duration,
    last_push: Option<Instant>,
    pending: bool,
}

impl PushThrottle {
    /// Starts with a push pending so a new client gets the current state
    fn new(period: Duration) -> Self {
        Self {
            period,
            last_push: None,
            pending: true,
        }
    }

    fn mark_pending(&mut self) {
        self.pending = true;
    }

    /// Whether a pending push may go out at `now`
    fn ready(&self, now: Instant) -> bool {
        self.pending
            && self
                .last_push
                .map_or(true, |at| now.saturating_duration_since(at) >= self.period)
    }

    /// When a held-back push becomes due, if one is waiting
    fn deadline(&self) -> Option<Instant> {
        if !self.pending {
            return None;
        }
        self.last_push.map(|at| at + self.period)
    }

    fn record_push(&mut self, at: Instant) {
        self.pending = false;
        self.last_push = Some(at);
    }
}

/// Handle WebSocket connections
pub async fn ws_index(
    req: HttpRequest,
    body: web::Payload,
    dashboard: web::Data<DashboardHandle>,
) -> Result<impl Responder, Error> {
    let addr = req
        .peer_addr()
        .map(|peer| peer.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let connection_id = Uuid::new_v4();
    info!("WebSocket connection {} from: {}", connection_id, addr);

    let (response, mut session, mut msg_stream) = actix_ws::handle(&req, body)?;
    let dashboard = dashboard.get_ref().clone();

    actix_web::rt::spawn(async move {
        let mut updates = dashboard.subscribe();
        let mut heartbeat = interval(HEARTBEAT_INTERVAL);
        let mut last_heard = Instant::now();
        let mut throttle = PushThrottle::new(SNAPSHOT_THROTTLE);
        let mut sent = 0u64;

        let close_reason = loop {
            let now = Instant::now();
            if throttle.ready(now) {
                let snapshot = dashboard.snapshot();
                if send(&mut session, &WsOutMessage::Snapshot { snapshot: &snapshot })
                    .await
                    .is_err()
                {
                    break None;
                }
                throttle.record_push(now);
                sent += 1;
            }
            let flush_at = throttle.deadline();

            tokio::select! {
                msg = msg_stream.next() => match msg {
                    Some(Ok(Message::Ping(bytes))) => {
                        last_heard = Instant::now();
                        if session.pong(&bytes).await.is_err() {
                            break None;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {
                        last_heard = Instant::now();
                    }
                    Some(Ok(Message::Text(text))) => {
                        last_heard = Instant::now();
                        debug!("Received text message on {}: {}", connection_id, text);
                        if handle_command(&mut session, &dashboard, text.trim()).await.is_err() {
                            break None;
                        }
                    }
                    Some(Ok(Message::Close(reason))) => {
                        info!("Client {} requested close", connection_id);
                        break reason;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket protocol error on {}: {}", connection_id, e);
                        break None;
                    }
                    None => break None,
                },
                changed = updates.changed() => {
                    if changed.is_err() {
                        info!("Dashboard service stopped, closing {}", connection_id);
                        break None;
                    }
                    throttle.mark_pending();
                }
                _ = sleep_until(flush_at.unwrap_or(now)), if flush_at.is_some() => {}
                _ = heartbeat.tick() => {
                    if last_heard.elapsed() > CLIENT_TIMEOUT {
                        warn!("WebSocket client {} heartbeat timed out", connection_id);
                        break None;
                    }
                    if session.ping(b"").await.is_err() {
                        break None;
                    }
                    let ping = WsOutMessage::Ping {
                        timestamp: chrono::Utc::now().timestamp(),
                    };
                    if send(&mut session, &ping).await.is_err() {
                        break None;
                    }
                }
            }
        };

        let _ = session.close(close_reason).await;
        info!(
            "WebSocket connection {} closed after {} snapshots",
            connection_id, sent
        );
    });

    Ok(response)
}

/// Answer one client text command
async fn handle_command(
    session: &mut actix_ws::Session,
    dashboard: &DashboardHandle,
    text: &str,
) -> Result<(), actix_ws::Closed> {
    match ClientCommand::parse(text) {
        Some(ClientCommand::Snapshot) => {
            let snapshot = dashboard.snapshot();
            send(session, &WsOutMessage::Snapshot { snapshot: &snapshot }).await
        }
        Some(ClientCommand::Status) => {
            let status = dashboard.snapshot().status;
            send(session, &WsOutMessage::Status { status }).await
        }
        Some(ClientCommand::Resolve(alert_id)) => {
            let message = match dashboard.resolve_alert(alert_id).await {
                Ok(resolved) => WsOutMessage::Resolved {
                    alert_id: alert_id.to_string(),
                    resolved,
                },
                Err(e) => WsOutMessage::Error {
                    message: e.to_string(),
                },
            };
            send(session, &message).await
        }
        None => {
            send(
                session,
                &WsOutMessage::Error {
                    message: format!("Unknown command: {}", text),
                },
            )
            .await
        }
    }
}

/// JSON text frame for one outgoing message
fn encode(msg: &WsOutMessage<'_>) -> AppResult<String> {
    Ok(serde_json::to_string(msg)?)
}

/// Serialize and send one message
async fn send(
    session: &mut actix_ws::Session,
    msg: &WsOutMessage<'_>,
) -> Result<(), actix_ws::Closed> {
    match encode(msg) {
        Ok(json) => session.text(json).await,
        Err(e) => {
            warn!("Failed to serialize WebSocket message: {}", e);
            Ok(())
        }
    }
}
