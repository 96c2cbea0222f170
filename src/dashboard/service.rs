use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::dashboard::controller::TelemetryController;
use crate::generator::RandomSource;
use crate::models::snapshot::DashboardSnapshot;
use crate::utils::error::{AppError, AppResult};

/// Pending user intents before senders start waiting
const COMMAND_QUEUE_DEPTH: usize = 64;

/// User intents routed onto the service task
enum Command {
    ResolveAlert {
        alert_id: String,
        reply: oneshot::Sender<bool>,
    },
}

/// Runs the telemetry controller on a single task.
///
/// The packet timer, the refresh timer and user commands are all handled by
/// that one task, one event at a time, so every mutation is atomic with
/// respect to the others.
pub struct DashboardService;

impl DashboardService {
    /// Initialize `controller` (if needed) and start its timers
    pub fn spawn<S>(mut controller: TelemetryController<S>) -> AppResult<DashboardHandle>
    where
        S: RandomSource + Send + 'static,
    {
        if !controller.is_initialized() {
            controller.initialize()?;
        }

        let tick_period = controller.config().tick_interval();
        let refresh_period = controller.config().refresh_interval();

        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(controller.snapshot()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            "Starting dashboard service (tick every {:?}, refresh every {:?})",
            tick_period, refresh_period
        );

        let task = tokio::spawn(Self::run(
            controller,
            command_rx,
            snapshot_tx,
            shutdown_rx,
            tick_period,
            refresh_period,
        ));

        Ok(DashboardHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            shutdown: Arc::new(shutdown_tx),
            task: Arc::new(Mutex::new(Some(task))),
        })
    }

    /// Event loop owning the controller until shutdown
    async fn run<S: RandomSource>(
        mut controller: TelemetryController<S>,
        mut commands: mpsc::Receiver<Command>,
        snapshots: watch::Sender<Arc<DashboardSnapshot>>,
        mut shutdown: watch::Receiver<bool>,
        tick_period: Duration,
        refresh_period: Duration,
    ) {
        // Both timers first fire one full period after start
        let start = Instant::now();
        let mut tick_timer = interval_at(start + tick_period, tick_period);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut refresh_timer = interval_at(start + refresh_period, refresh_period);
        refresh_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.changed() => {
                    debug!("Dashboard service received shutdown signal");
                    break;
                }
                _ = tick_timer.tick() => {
                    controller.tick();
                }
                _ = refresh_timer.tick() => {
                    if let Err(e) = controller.refresh() {
                        error!("Failed to refresh telemetry snapshots: {}", e);
                    }
                }
                command = commands.recv() => match command {
                    Some(Command::ResolveAlert { alert_id, reply }) => {
                        let resolved = controller.resolve_alert(&alert_id);
                        if reply.send(resolved).is_err() {
                            debug!("Resolve caller for {} went away before the reply", alert_id);
                        }
                    }
                    None => {
                        info!("All dashboard handles dropped");
                        break;
                    }
                },
            }

            snapshots.send_replace(Arc::new(controller.snapshot()));
        }

        info!(
            "Dashboard service stopped after {} packets",
            controller.totals().total_packets
        );
    }
}

/// Cloneable handle to a running [`DashboardService`]
#[derive(Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Arc<DashboardSnapshot>>,
    shutdown: Arc<watch::Sender<bool>>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl DashboardHandle {
    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardSnapshot>> {
        self.snapshots.clone()
    }

    /// Whether the service task is still accepting commands
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Resolve an alert on the service task.
    ///
    /// `Ok(false)` covers unknown and already resolved ids.
    pub async fn resolve_alert(&self, alert_id: impl Into<String>) -> AppResult<bool> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::ResolveAlert {
                alert_id: alert_id.into(),
                reply,
            })
            .await
            .map_err(|_| AppError::ServiceStopped)?;

        response.await.map_err(|_| AppError::ServiceStopped)
    }

    /// Stop both timers and wait for the service task to exit.
    ///
    /// Nothing mutates the state once this returns. Calling it again is a
    /// no-op.
    pub async fn shutdown(&self) {
        let task = self.task.lock().await.take();
        let Some(task) = task else {
            debug!("Dashboard service already shut down");
            return;
        };

        // The receiver is gone if the task already exited on its own
        let _ = self.shutdown.send(true);

        if let Err(e) = task.await {
            warn!("Dashboard service task ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::RngSource;
    use crate::models::config::AppConfig;

    fn spawn_service(seed: u64) -> DashboardHandle {
        let controller =
            TelemetryController::new(AppConfig::default(), RngSource::seeded(seed)).unwrap();
        DashboardService::spawn(controller).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_initializes_controller() {
        let handle = spawn_service(1);
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.alerts.len(), 5);
        assert_eq!(snapshot.traffic.len(), 31);
        assert!(snapshot.packets.is_empty());
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let handle = spawn_service(2);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(handle.snapshot().totals.total_packets, 3);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(handle.snapshot().totals.total_packets, 5);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_fires_on_its_own_period() {
        let handle = spawn_service(3);
        let initial = handle.snapshot();

        tokio::time::sleep(Duration::from_millis(29_500)).await;
        assert_eq!(handle.snapshot().top_ips, initial.top_ips);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_ne!(handle.snapshot().top_ips, initial.top_ips);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_after_shutdown() {
        let handle = spawn_service(4);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        handle.shutdown().await;
        let stopped_at = handle.snapshot().totals.total_packets;

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.snapshot().totals.total_packets, stopped_at);
        assert!(!handle.is_running());

        // Idempotent
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_alert_through_handle() {
        let handle = spawn_service(5);
        let alert_id = handle.snapshot().alerts[0].id.clone();

        assert!(handle.resolve_alert(alert_id.clone()).await.unwrap());
        assert!(!handle.resolve_alert(alert_id.clone()).await.unwrap());
        assert!(!handle.resolve_alert("alert_missing").await.unwrap());

        let snapshot = handle.snapshot();
        let alert = snapshot.alerts.iter().find(|a| a.id == alert_id).unwrap();
        assert!(alert.resolved);
        assert_eq!(snapshot.status.active_alerts, 4);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_after_shutdown_reports_stopped() {
        let handle = spawn_service(6);
        handle.shutdown().await;

        let result = handle.resolve_alert("alert_any").await;
        assert!(matches!(result, Err(AppError::ServiceStopped)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let handle = spawn_service(7);
        let mut updates = handle.subscribe();

        updates.changed().await.unwrap();
        assert_eq!(updates.borrow().totals.total_packets, 1);

        handle.shutdown().await;
    }
}
