use log::{debug, info, trace};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::generator::{self, Clock, RandomSource, SystemClock};
use crate::models::alert::{Alert, SeverityBreakdown};
use crate::models::config::AppConfig;
use crate::models::filter::PacketFilter;
use crate::models::packet::Packet;
use crate::models::snapshot::{DashboardSnapshot, DashboardStatus};
use crate::models::stats::{
    FormattedTotals, NetworkStatus, ProtocolStat, SessionStats, TopIpRecord, Totals,
};
use crate::models::traffic::TrafficSample;
use crate::utils::error::{AppError, AppResult};

/// Alerts created by `initialize`
pub const SEED_ALERT_COUNT: usize = 5;

/// Chance that a tick also raises an alert
pub const ALERT_RATE_PER_TICK: f64 = 0.05;

/// What a single tick produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub packet_id: String,
    pub packet_size: u32,
    pub alert_id: Option<String>,
}

/// Owns the live telemetry state and every mutation of it
pub struct TelemetryController<S> {
    /// Application configuration
    config: AppConfig,

    /// Source of every random draw
    rng: S,

    /// Timestamp source for generated packets and alerts
    clock: Arc<dyn Clock>,

    /// Live packets, newest at the front
    packets: VecDeque<Packet>,

    /// Alerts, newest at the front; never removed
    alerts: VecDeque<Alert>,

    traffic: Vec<TrafficSample>,

    top_ips: Vec<TopIpRecord>,

    protocol_stats: Vec<ProtocolStat>,

    /// Running totals since the session started
    totals: Totals,

    /// Figures fixed at construction
    session: SessionStats,

    initialized: bool,
}

impl<S: RandomSource> TelemetryController<S> {
    /// Create a controller on the system clock
    pub fn new(config: AppConfig, rng: S) -> AppResult<Self> {
        Self::with_clock(config, rng, Arc::new(SystemClock))
    }

    /// Create a controller with an explicit clock.
    ///
    /// Session figures are drawn here, once, and never change afterwards.
    pub fn with_clock(config: AppConfig, mut rng: S, clock: Arc<dyn Clock>) -> AppResult<Self> {
        config.validate()?;

        let session = generator::generate_session_stats(&mut rng);
        info!(
            "New telemetry session: {} connections, threat level {}, {}ms latency, {:.2}% uptime",
            session.active_connections,
            session.threat_level.as_str(),
            session.avg_latency_ms,
            session.uptime_percentage
        );

        Ok(Self {
            packets: VecDeque::with_capacity(config.buffer_size),
            config,
            rng,
            clock,
            alerts: VecDeque::new(),
            traffic: Vec::new(),
            top_ips: Vec::new(),
            protocol_stats: Vec::new(),
            totals: Totals::default(),
            session,
            initialized: false,
        })
    }

    /// Seed the snapshots and the initial alerts. Runs once per session.
    pub fn initialize(&mut self) -> AppResult<()> {
        if self.initialized {
            return Err(AppError::AlreadyInitialized);
        }

        self.regenerate_snapshots()?;

        for _ in 0..SEED_ALERT_COUNT {
            let alert = generator::generate_alert(&mut self.rng, self.clock.as_ref());
            self.alerts.push_back(alert);
        }

        self.initialized = true;
        info!(
            "Telemetry initialized: {} traffic samples, {} alerts",
            self.traffic.len(),
            self.alerts.len()
        );
        Ok(())
    }

    /// Generate one packet and, occasionally, one alert
    pub fn tick(&mut self) -> TickOutcome {
        let packet = generator::generate_packet(&mut self.rng, self.clock.as_ref());
        trace!(
            "Generated {} packet {} ({} bytes)",
            packet.protocol,
            packet.id,
            packet.size
        );

        self.totals.total_packets += 1;
        self.totals.total_bytes += u64::from(packet.size);

        let outcome_packet_id = packet.id.clone();
        let outcome_size = packet.size;
        self.packets.push_front(packet);
        self.enforce_buffer_limit();

        let alert_id = if self.rng.chance(ALERT_RATE_PER_TICK) {
            let alert = generator::generate_alert(&mut self.rng, self.clock.as_ref());
            info!(
                "New {} alert [{}]: {}",
                alert.alert_type, alert.severity, alert.message
            );
            let id = alert.id.clone();
            self.alerts.push_front(alert);
            Some(id)
        } else {
            None
        };

        TickOutcome {
            packet_id: outcome_packet_id,
            packet_size: outcome_size,
            alert_id,
        }
    }

    /// Replace traffic, top-IP and protocol snapshots with fresh draws
    pub fn refresh(&mut self) -> AppResult<()> {
        self.regenerate_snapshots()?;
        debug!("Refreshed traffic, top IP and protocol snapshots");
        Ok(())
    }

    /// Mark an alert resolved.
    ///
    /// Returns true only when an unresolved alert was found and flipped.
    /// Unknown ids and already resolved alerts leave state unchanged.
    pub fn resolve_alert(&mut self, alert_id: &str) -> bool {
        match self.alerts.iter_mut().find(|alert| alert.id == alert_id) {
            Some(alert) if !alert.resolved => {
                alert.resolved = true;
                info!("Resolved alert {}", alert_id);
                true
            }
            Some(_) => {
                debug!("Alert {} was already resolved", alert_id);
                false
            }
            None => {
                debug!("Ignoring resolve for unknown alert {}", alert_id);
                false
            }
        }
    }

    fn regenerate_snapshots(&mut self) -> AppResult<()> {
        let now = self.clock.now();
        self.traffic =
            generator::generate_traffic_data(&mut self.rng, now, self.config.window_minutes)?;
        self.top_ips = generator::generate_top_ips(&mut self.rng);
        self.protocol_stats = generator::generate_protocol_stats(&mut self.rng);
        Ok(())
    }

    /// Drop the oldest packets beyond the configured capacity
    fn enforce_buffer_limit(&mut self) {
        while self.packets.len() > self.config.buffer_size {
            if let Some(evicted) = self.packets.pop_back() {
                trace!("Evicted packet {} to maintain buffer size", evicted.id);
            }
        }
    }
}

impl<S> TelemetryController<S> {
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Live packets, newest first
    pub fn packets(&self) -> &VecDeque<Packet> {
        &self.packets
    }

    /// Alerts, newest first
    pub fn alerts(&self) -> &VecDeque<Alert> {
        &self.alerts
    }

    pub fn get_alert(&self, alert_id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|alert| alert.id == alert_id)
    }

    pub fn traffic(&self) -> &[TrafficSample] {
        &self.traffic
    }

    pub fn top_ips(&self) -> &[TopIpRecord] {
        &self.top_ips
    }

    pub fn protocol_stats(&self) -> &[ProtocolStat] {
        &self.protocol_stats
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn session(&self) -> SessionStats {
        self.session
    }

    /// Number of unresolved alerts
    pub fn active_alert_count(&self) -> usize {
        self.alerts.iter().filter(|alert| !alert.resolved).count()
    }

    pub fn severity_breakdown(&self) -> SeverityBreakdown {
        SeverityBreakdown::from_alerts(&self.alerts)
    }

    /// Health derived from the session's threat level
    pub fn network_status(&self) -> NetworkStatus {
        NetworkStatus::from(self.session.threat_level)
    }

    pub fn status(&self) -> DashboardStatus {
        DashboardStatus {
            active_alerts: self.active_alert_count(),
            network_status: self.network_status(),
            severity_breakdown: self.severity_breakdown(),
        }
    }

    pub fn formatted_totals(&self) -> FormattedTotals {
        FormattedTotals::new(&self.totals, &self.session)
    }

    /// Packets passing `filter`, newest first, at most `limit` of them
    pub fn filtered_packets(&self, filter: &PacketFilter, limit: usize) -> Vec<Packet> {
        filter.apply(&self.packets, limit)
    }

    /// Copy of the full dashboard state
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            generated_at: self.clock.now(),
            packets: self.packets.iter().cloned().collect(),
            alerts: self.alerts.iter().cloned().collect(),
            traffic: self.traffic.clone(),
            top_ips: self.top_ips.clone(),
            protocol_stats: self.protocol_stats.clone(),
            totals: self.totals,
            formatted_totals: self.formatted_totals(),
            session: self.session,
            status: self.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{FixedClock, RngSource, ScriptedSource};
    use crate::models::filter::FilterMode;
    use chrono::{TimeZone, Utc};

    fn controller(seed: u64) -> TelemetryController<RngSource<rand::rngs::StdRng>> {
        TelemetryController::new(AppConfig::default(), RngSource::seeded(seed)).unwrap()
    }

    #[test]
    fn test_initialize_seeds_state() {
        let mut controller = controller(1);
        controller.initialize().unwrap();

        assert_eq!(controller.alerts().len(), SEED_ALERT_COUNT);
        assert!(controller.alerts().iter().all(|alert| !alert.resolved));
        assert_eq!(controller.traffic().len(), 31);
        assert_eq!(controller.top_ips().len(), 10);
        assert_eq!(controller.protocol_stats().len(), 5);
        assert!(controller.packets().is_empty());
    }

    #[test]
    fn test_initialize_twice_fails_without_changes() {
        let mut controller = controller(2);
        controller.initialize().unwrap();
        let before = controller.snapshot();

        assert!(matches!(
            controller.initialize(),
            Err(AppError::AlreadyInitialized)
        ));
        let after = controller.snapshot();
        assert_eq!(before.alerts, after.alerts);
        assert_eq!(before.traffic, after.traffic);
        assert_eq!(before.top_ips, after.top_ips);
    }

    #[test]
    fn test_buffer_evicts_oldest_first() {
        let config = AppConfig {
            buffer_size: 3,
            ..AppConfig::default()
        };
        let mut controller = TelemetryController::new(config, RngSource::seeded(3)).unwrap();

        let ids: Vec<String> = (0..5).map(|_| controller.tick().packet_id).collect();

        let kept: Vec<&str> = controller.packets().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(kept, vec![ids[4].as_str(), ids[3].as_str(), ids[2].as_str()]);
        assert_eq!(controller.totals().total_packets, 5);
    }

    #[test]
    fn test_tick_raises_alert_when_draw_hits() {
        // Tick with every draw at 0.0: TCP, 50 bytes, baseline flag fires,
        // high severity, then the alert draw also lands under 5%.
        let mut controller =
            TelemetryController::new(AppConfig::default(), ScriptedSource::constant(0.0)).unwrap();
        let outcome = controller.tick();

        assert!(outcome.alert_id.is_some());
        assert_eq!(controller.alerts().len(), 1);
        assert_eq!(controller.alerts()[0].id, outcome.alert_id.unwrap());
        assert_eq!(outcome.packet_size, 50);
    }

    #[test]
    fn test_tick_without_alert() {
        let mut controller =
            TelemetryController::new(AppConfig::default(), ScriptedSource::constant(0.5)).unwrap();
        let outcome = controller.tick();
        assert!(outcome.alert_id.is_none());
        assert!(controller.alerts().is_empty());
    }

    #[test]
    fn test_new_alerts_are_prepended() {
        let mut controller = controller(4);
        controller.initialize().unwrap();
        let seeded_first = controller.alerts()[0].id.clone();

        let mut newest = None;
        for _ in 0..2000 {
            if let Some(id) = controller.tick().alert_id {
                newest = Some(id);
            }
        }

        let newest = newest.expect("2000 ticks at 5% should raise an alert");
        assert_eq!(controller.alerts()[0].id, newest);
        assert!(controller.alerts().iter().any(|a| a.id == seeded_first));
    }

    #[test]
    fn test_resolve_alert_is_idempotent() {
        let mut controller = controller(5);
        controller.initialize().unwrap();
        let id = controller.alerts()[2].id.clone();

        assert!(controller.resolve_alert(&id));
        let once = controller.alerts().clone();
        assert!(!controller.resolve_alert(&id));
        assert_eq!(controller.alerts(), &once);

        assert!(controller.get_alert(&id).unwrap().resolved);
        assert_eq!(controller.active_alert_count(), SEED_ALERT_COUNT - 1);
    }

    #[test]
    fn test_resolve_unknown_alert_is_noop() {
        let mut controller = controller(6);
        controller.initialize().unwrap();
        let before = controller.alerts().clone();

        assert!(!controller.resolve_alert("alert_0_missing"));
        assert_eq!(controller.alerts(), &before);
    }

    #[test]
    fn test_refresh_replaces_snapshots() {
        let mut controller = controller(7);
        controller.initialize().unwrap();
        let alerts_before = controller.alerts().clone();
        let top_before = controller.top_ips().to_vec();

        controller.refresh().unwrap();

        assert_eq!(controller.top_ips().len(), 10);
        assert_ne!(controller.top_ips(), top_before.as_slice());
        assert_eq!(controller.alerts(), &alerts_before);
    }

    #[test]
    fn test_session_figures_survive_refresh_and_ticks() {
        let mut controller = controller(8);
        let session = controller.session();
        controller.initialize().unwrap();
        for _ in 0..50 {
            controller.tick();
        }
        controller.refresh().unwrap();
        assert_eq!(controller.session(), session);
        assert_eq!(
            controller.network_status(),
            NetworkStatus::from(session.threat_level)
        );
    }

    #[test]
    fn test_filtered_packets() {
        let mut controller = controller(9);
        for _ in 0..100 {
            controller.tick();
        }

        let anomalies = controller
            .filtered_packets(&PacketFilter::new(FilterMode::Anomalies, None), usize::MAX);
        assert!(anomalies.iter().all(|p| p.is_anomaly));
        let expected = controller.packets().iter().filter(|p| p.is_anomaly).count();
        assert_eq!(anomalies.len(), expected);

        let limited = controller.filtered_packets(&PacketFilter::default(), 10);
        assert_eq!(limited.len(), 10);
        assert_eq!(limited[0].id, controller.packets()[0].id);
    }

    #[test]
    fn test_packets_use_injected_clock() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let clock = Arc::new(FixedClock::new(at));
        let mut controller =
            TelemetryController::with_clock(AppConfig::default(), RngSource::seeded(10), clock)
                .unwrap();
        controller.tick();
        assert_eq!(controller.packets()[0].timestamp, at);
        assert!(controller.packets()[0]
            .id
            .starts_with(&format!("pkt_{}_", at.timestamp_millis())));
    }

    #[test]
    fn test_snapshot_stamped_by_injected_clock() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let clock = Arc::new(FixedClock::new(at));
        let mut controller = TelemetryController::with_clock(
            AppConfig::default(),
            RngSource::seeded(10),
            clock.clone(),
        )
        .unwrap();
        controller.initialize().unwrap();
        assert_eq!(controller.snapshot().generated_at, at);

        clock.advance(chrono::Duration::seconds(90));
        assert_eq!(
            controller.snapshot().generated_at,
            at + chrono::Duration::seconds(90)
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AppConfig {
            buffer_size: 0,
            ..AppConfig::default()
        };
        assert!(TelemetryController::new(config, RngSource::seeded(0)).is_err());
    }
}
