//! The collector façade.
//!
//! Owns one process's measurement tree and interval scheduler, exposes
//! the recording API, and routes snapshots according to the injected
//! process-group role: a worker forwards its serialized tree to the
//! coordinator at every window boundary; the coordinator folds its own
//! tree plus forwarded worker snapshots into the aggregate and
//! delivers the merged document on a phase-shifted cadence.
//!
//! All recording calls are synchronous and non-blocking (a short
//! mutex-guarded critical section). The only suspension points live in
//! the spawned tasks: the timer driver, the delivery loop, and one
//! listener per worker, each of which also selects on the shutdown
//! watch channel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::{Value, json};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use lookout_cluster::{GroupMessage, InstanceRegistry, ProcessGroup, ProcessRole, WorkerLink};
use lookout_engine::{IntervalScheduler, MeasurementTree};
use lookout_stats::PointCtor;

use crate::aggregate::{
    AggregateDocument, AggregationEngine, SourceId, default_transform,
};
use crate::config::CollectorConfig;
use crate::error::{CollectorError, CollectorResult};
use crate::operations::{OperationRegistry, Validator};

/// Typed window notifications, available via
/// [`Collector::window_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// A measurement window ended; `snapshot` is the serialized tree
    /// for that window.
    WindowClosed { closed_at: u64, snapshot: Value },
    /// A new window is in progress, ending at `ends_at`.
    WindowStarted { ends_at: u64 },
}

/// Role-specific state held under the collector lock.
enum RoleState {
    Coordinator {
        engine: AggregationEngine,
        delivery_tx: mpsc::UnboundedSender<AggregateDocument>,
    },
    Worker {
        source_id: String,
    },
}

/// Everything mutated by recording calls and scheduler ticks.
struct Core {
    id: u32,
    name: String,
    interval_ms: u64,
    scale_factor: f64,
    persist: bool,
    scheduler: IntervalScheduler,
    tree: MeasurementTree,
    registry: OperationRegistry,
    role: RoleState,
    group: Arc<dyn ProcessGroup>,
    window_events: Option<mpsc::UnboundedSender<WindowEvent>>,
}

impl Core {
    /// Boundary check; runs on every recording call and every timer
    /// wake.
    fn on_tick(&mut self, now_ms: u64) {
        let Some(close) = self.scheduler.tick(now_ms) else {
            return;
        };

        let snapshot = self.tree.serialize();
        if self.persist {
            // Points keep their identity; only their state restarts.
            self.tree.reset_all(close.next_boundary);
        } else {
            self.tree = MeasurementTree::new();
        }

        debug!(id = self.id, closed_at = close.closed_at, "window boundary reached");

        if let Some(events) = &self.window_events {
            let _ = events.send(WindowEvent::WindowClosed {
                closed_at: close.closed_at,
                snapshot: snapshot.clone(),
            });
        }

        match &mut self.role {
            RoleState::Worker { source_id } => {
                let message = GroupMessage::WorkerSample {
                    instance_id: self.id,
                    source_id: source_id.clone(),
                    sample: snapshot,
                };
                // Lossy by contract: a dropped snapshot just omits this
                // source from the cycle.
                if let Err(error) = self.group.forward(message) {
                    debug!(id = self.id, %error, "snapshot forward dropped");
                }
            }
            RoleState::Coordinator { engine, .. } => {
                engine.fold(snapshot, &SourceId::Master);
            }
        }

        if let Some(events) = &self.window_events {
            let _ = events.send(WindowEvent::WindowStarted {
                ends_at: close.next_boundary,
            });
        }
    }
}

/// One process's metrics collector.
///
/// Must be constructed inside a tokio runtime; background tasks are
/// spawned immediately and stopped by [`Collector::stop`] or drop.
pub struct Collector {
    id: u32,
    core: Arc<Mutex<Core>>,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    delivery_rx: Mutex<Option<mpsc::UnboundedReceiver<AggregateDocument>>>,
}

impl Collector {
    /// Build a collector for the role `group` reports, drawing its
    /// instance id from `instances`.
    pub fn new(
        config: CollectorConfig,
        group: Arc<dyn ProcessGroup>,
        instances: &InstanceRegistry,
    ) -> Self {
        let id = instances.allocate();
        let interval_ms = config.resolved_interval_ms();
        let scale_factor = config.resolved_scale_factor();
        let scheduler = IntervalScheduler::new(config.start_time_hint, interval_ms, epoch_ms());
        let first_boundary = scheduler.next_boundary();

        let (delivery_tx, delivery_rx) = mpsc::unbounded_channel();
        let role = match group.role() {
            ProcessRole::Coordinator => {
                let transform = config
                    .transform
                    .clone()
                    .unwrap_or_else(|| Arc::new(default_transform));
                RoleState::Coordinator {
                    engine: AggregationEngine::new(
                        id,
                        &config.name,
                        interval_ms,
                        scale_factor,
                        transform,
                    ),
                    delivery_tx,
                }
            }
            // The sender is dropped here, so a worker's delivery
            // receiver starts out closed.
            ProcessRole::Worker { source_id } => RoleState::Worker { source_id },
        };
        let coordinator = matches!(role, RoleState::Coordinator { .. });

        let core = Arc::new(Mutex::new(Core {
            id,
            name: config.name.clone(),
            interval_ms,
            scale_factor,
            persist: config.persist,
            scheduler,
            tree: MeasurementTree::new(),
            registry: OperationRegistry::with_builtins(),
            role,
            group: Arc::clone(&group),
            window_events: None,
        }));

        let (shutdown, _) = watch::channel(false);
        let mut tasks = vec![spawn_timer(Arc::clone(&core), shutdown.subscribe())];

        if coordinator {
            tasks.push(spawn_delivery(
                Arc::clone(&core),
                first_boundary,
                interval_ms,
                shutdown.subscribe(),
            ));
            for link in group.take_workers() {
                tasks.push(spawn_worker_listener(
                    Arc::clone(&core),
                    link,
                    shutdown.subscribe(),
                ));
            }
            if let Some(joins) = group.take_joins() {
                tasks.push(spawn_join_listener(
                    Arc::clone(&core),
                    joins,
                    shutdown.subscribe(),
                ));
            }
        }

        info!(id, interval_ms, coordinator, "collector started");

        Self {
            id,
            core,
            shutdown,
            tasks: Mutex::new(tasks),
            delivery_rx: Mutex::new(Some(delivery_rx)),
        }
    }

    /// This collector's instance id within its registry.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The configured name, as carried on delivered documents.
    pub fn name(&self) -> String {
        lock(&self.core).name.clone()
    }

    /// Record a numeric sample (min/max/average/sigma). Non-finite
    /// values are silently dropped without touching any state.
    pub fn sample(&self, path: &[&str], id: &str, value: f64) {
        if !value.is_finite() {
            return;
        }
        let _ = self.apply("sample", path, id, json!(value));
    }

    /// Record a duration as a `[whole, fraction]` unit pair. Pairs
    /// containing non-finite values are silently dropped.
    pub fn timed_sample(&self, path: &[&str], id: &str, duration: [f64; 2]) {
        if !duration.iter().all(|part| part.is_finite()) {
            return;
        }
        let _ = self.apply("timedSample", path, id, json!(duration));
    }

    /// Increment a counter. `None` or a non-finite delta counts as 1.
    pub fn inc(&self, path: &[&str], id: &str, delta: Option<f64>) {
        let raw = match delta {
            Some(delta) => json!(delta),
            None => Value::Null,
        };
        let _ = self.apply("inc", path, id, raw);
    }

    /// Set a value of any JSON type. The value survives window
    /// boundaries in persistent mode until overwritten.
    pub fn set(&self, path: &[&str], id: &str, value: Value) {
        let _ = self.apply("set", path, id, value);
    }

    /// Dynamic dispatch entry point for registered operations.
    ///
    /// Unknown names are an error; a value rejected by the operation's
    /// validator is the usual silent no-op.
    pub fn record(&self, operation: &str, path: &[&str], id: &str, value: Value) -> CollectorResult<()> {
        self.apply(operation, path, id, value)
    }

    /// Register a custom recording operation.
    ///
    /// Conflicts with built-ins or earlier registrations fail here,
    /// never at call time.
    pub fn register_operation(
        &self,
        name: &str,
        ctor: PointCtor,
        validator: Option<Validator>,
    ) -> CollectorResult<()> {
        lock(&self.core).registry.register(name, ctor, validator)
    }

    /// Serialized view of the current window's tree.
    pub fn snapshot(&self) -> Value {
        lock(&self.core).tree.serialize()
    }

    /// Consume the aggregate delivery stream (coordinator only; a
    /// worker's stream starts out closed). One-shot.
    pub fn deliveries(&self) -> Option<mpsc::UnboundedReceiver<AggregateDocument>> {
        lock_plain(&self.delivery_rx).take()
    }

    /// Subscribe to typed window notifications. A later call replaces
    /// the previous subscription.
    pub fn window_events(&self) -> mpsc::UnboundedReceiver<WindowEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.core).window_events = Some(tx);
        rx
    }

    /// Stop all timers and group subscriptions owned by this instance.
    /// Idempotent; safe to invoke repeatedly.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
        for task in lock_plain(&self.tasks).drain(..) {
            task.abort();
        }
    }

    fn apply(&self, name: &str, path: &[&str], id: &str, raw: Value) -> CollectorResult<()> {
        let mut core = lock(&self.core);
        let Some(operation) = core.registry.get(name) else {
            return Err(CollectorError::UnknownOperation(name.to_string()));
        };
        if let Some(validate) = operation.validator {
            if !validate(&raw) {
                // Designed behavior: invalid input leaves the tree and
                // scheduler completely untouched.
                return Ok(());
            }
        }

        // Every write doubles as a boundary check, so a window change
        // is never delayed by the timer alone.
        core.on_tick(epoch_ms());

        let timestamp = core.scheduler.next_boundary();
        let scale_factor = core.scale_factor;
        let interval_ms = core.interval_ms;
        core.tree
            .augment(path, id, operation.ctor, &raw, timestamp, scale_factor, interval_ms);
        Ok(())
    }
}

impl Drop for Collector {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Background tasks ───────────────────────────────────────────────

/// Timer driver: sleeps until the next boundary and ticks.
///
/// The deadline is re-read on every iteration, so a boundary already
/// handled by a recording call simply moves the next sleep; a
/// premature wake finds nothing to fire and re-arms.
fn spawn_timer(core: Arc<Mutex<Core>>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let deadline = lock(&core).scheduler.next_boundary();
            let wait = Duration::from_millis(deadline.saturating_sub(epoch_ms()));
            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    lock(&core).on_tick(epoch_ms());
                }
                _ = shutdown.changed() => break,
            }
        }
    })
}

/// Delivery loop: first fires half an interval after the first
/// boundary, then every interval — phase-shifted so delivery never
/// races a boundary transition.
fn spawn_delivery(
    core: Arc<Mutex<Core>>,
    first_boundary_ms: u64,
    interval_ms: u64,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let first = first_boundary_ms + interval_ms / 2;
        let delay = Duration::from_millis(first.saturating_sub(epoch_ms()));
        let start = tokio::time::Instant::now() + delay;
        let mut ticks = tokio::time::interval_at(start, Duration::from_millis(interval_ms));
        // A descheduled delivery emits once when it catches up, not a
        // burst of empty documents.
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    let mut core = lock(&core);
                    if let RoleState::Coordinator { engine, delivery_tx } = &mut core.role {
                        let document = engine.take();
                        if delivery_tx.send(document).is_err() {
                            debug!(id = core.id, "delivery consumer dropped");
                        }
                    }
                }
                _ = shutdown.changed() => break,
            }
        }
    })
}

/// Per-worker listener: folds snapshots tagged with this collector's
/// instance id; ends when the worker's channel closes (exit) or the
/// collector stops.
fn spawn_worker_listener(
    core: Arc<Mutex<Core>>,
    mut link: WorkerLink,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let source = link.source_id.clone();
        loop {
            tokio::select! {
                message = link.messages.recv() => match message {
                    Some(GroupMessage::WorkerSample { instance_id, source_id, sample }) => {
                        let mut core = lock(&core);
                        if instance_id != core.id {
                            debug!(
                                id = core.id,
                                instance_id,
                                %source_id,
                                "ignoring snapshot for another collector instance"
                            );
                            continue;
                        }
                        if let RoleState::Coordinator { engine, .. } = &mut core.role {
                            engine.fold(sample, &SourceId::Worker(source_id));
                        }
                    }
                    None => {
                        // Worker exited; whatever it merged before
                        // stays in the aggregate as partial data.
                        debug!(source_id = %source, "worker channel closed");
                        break;
                    }
                },
                _ = shutdown.changed() => break,
            }
        }
    })
}

/// Watches for workers joining the group and spins up a listener for
/// each.
fn spawn_join_listener(
    core: Arc<Mutex<Core>>,
    mut joins: mpsc::UnboundedReceiver<WorkerLink>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                link = joins.recv() => match link {
                    Some(link) => {
                        debug!(source_id = %link.source_id, "worker joined");
                        // Spawned listeners exit via the shutdown watch.
                        let _ = spawn_worker_listener(
                            Arc::clone(&core),
                            link,
                            shutdown.clone(),
                        );
                    }
                    None => break,
                },
                _ = shutdown.changed() => break,
            }
        }
    })
}

fn lock<'a>(core: &'a Arc<Mutex<Core>>) -> MutexGuard<'a, Core> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}

fn lock_plain<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
