//! Checkout countdown controller and its one-second tick task

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::{debug, info};

use crate::state::{CheckoutPhase, CountdownSession, TickOutcome};

/// Owned handle to the scheduled tick task. Dropping it aborts the task.
#[derive(Debug)]
struct TickHandle {
    handle: Option<JoinHandle<()>>,
}

impl TickHandle {
    fn new(handle: JoinHandle<()>) -> Self {
        Self { handle: Some(handle) }
    }

    /// Let go of the task without aborting it (used by the task itself when it finishes)
    fn release(mut self) {
        self.handle.take();
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[derive(Debug)]
struct Inner {
    session: Mutex<CountdownSession>,
    /// At most one tick task exists; replacing or clearing this slot aborts the old one
    ticker: Mutex<Option<TickHandle>>,
    updates: watch::Sender<CountdownSession>,
    period: Duration,
}

/// Drives a [`CountdownSession`] with a repeating tick while the overlay is visible.
///
/// Must be used from within a tokio runtime, since starting a checkout
/// spawns the tick task.
#[derive(Debug)]
pub struct CheckoutController {
    inner: Arc<Inner>,
}

impl CheckoutController {
    /// Create an idle controller with the given window length and tick period
    pub fn new(duration_seconds: u64, period: Duration) -> Self {
        let session = CountdownSession::new(duration_seconds);
        let (updates, _) = watch::channel(session.clone());

        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(session),
                ticker: Mutex::new(None),
                updates,
                period,
            }),
        }
    }

    /// Controller ticking once per second
    pub fn with_duration(duration_seconds: u64) -> Self {
        Self::new(duration_seconds, Duration::from_secs(1))
    }

    /// Idle -> Confirming. Returns false (and changes nothing) from any other phase.
    pub fn start_checkout(&self) -> bool {
        let mut session = lock(&self.inner.session);
        if !session.start() {
            debug!("Checkout start ignored in phase {:?}", session.phase());
            return false;
        }

        let generation = session.generation;
        let task = tokio::spawn(run_ticker(
            Arc::downgrade(&self.inner),
            generation,
            Instant::now() + self.inner.period,
            self.inner.period,
        ));
        // Any previous handle is dropped here, aborting its task
        *lock(&self.inner.ticker) = Some(TickHandle::new(task));

        info!(
            "Checkout started: {}s confirmation window (generation {})",
            session.remaining_seconds, generation
        );
        self.inner.updates.send_replace(session.clone());
        true
    }

    /// Confirming -> Idle, stopping the tick. Idempotent no-op from Idle or Placed.
    pub fn cancel(&self) -> bool {
        let mut session = lock(&self.inner.session);
        let remaining = session.remaining_seconds;
        if !session.cancel() {
            debug!("Checkout cancel ignored in phase {:?}", session.phase());
            return false;
        }

        lock(&self.inner.ticker).take();

        info!("Checkout cancelled with {}s remaining", remaining);
        self.inner.updates.send_replace(session.clone());
        true
    }

    /// Placed -> Idle so another checkout can begin
    pub fn acknowledge(&self) -> bool {
        let mut session = lock(&self.inner.session);
        if !session.acknowledge() {
            return false;
        }

        debug!("Placed order acknowledged, countdown back to idle");
        self.inner.updates.send_replace(session.clone());
        true
    }

    /// Current session state
    pub fn snapshot(&self) -> CountdownSession {
        lock(&self.inner.session).clone()
    }

    pub fn phase(&self) -> CheckoutPhase {
        lock(&self.inner.session).phase()
    }

    /// Receiver observing every published session change
    pub fn subscribe(&self) -> watch::Receiver<CountdownSession> {
        self.inner.updates.subscribe()
    }

    /// Whether a tick task is currently owned by the controller
    pub fn has_pending_tick(&self) -> bool {
        lock(&self.inner.ticker).is_some()
    }
}

impl Inner {
    fn apply_tick(&self, generation: u64) -> TickOutcome {
        let mut session = lock(&self.session);
        let outcome = session.tick(generation);

        match outcome {
            TickOutcome::Counting(remaining) => {
                debug!("Checkout countdown: {}s remaining", remaining);
                self.updates.send_replace(session.clone());
            }
            TickOutcome::Placed => {
                // This tick is running inside the task the slot points at
                if let Some(handle) = lock(&self.ticker).take() {
                    handle.release();
                }
                info!("Confirmation window elapsed, order placed");
                self.updates.send_replace(session.clone());
            }
            TickOutcome::Ignored => {
                debug!("Discarding stale tick for generation {}", generation);
            }
        }

        outcome
    }
}

async fn run_ticker(inner: Weak<Inner>, generation: u64, first_tick: Instant, period: Duration) {
    let mut interval = interval_at(first_tick, period);

    loop {
        interval.tick().await;

        let Some(inner) = inner.upgrade() else {
            break;
        };
        match inner.apply_tick(generation) {
            TickOutcome::Counting(_) => {}
            TickOutcome::Placed | TickOutcome::Ignored => break,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
