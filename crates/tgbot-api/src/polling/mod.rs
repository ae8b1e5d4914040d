//! Long-polling update loop.
//!
//! A [`Poller`] owns the `getUpdates` cursor and runs fetch, publish and
//! advance on its own tokio task. Updates reach the caller through a bounded
//! `mpsc` channel; a full channel stalls the next fetch.
//!
//! Delivery is at-least-once. The cursor only moves past an update after it
//! was published, so a session resumed from [`Poller::cursor`] never loses
//! an update, but updates buffered in a stream that was not drained are
//! delivered again by the resumed session.


use std::sync::atomic::{AtomicI64, AtomicU8, Ordering};
use std::sync::Arc;
use tgbot_core::{config::PollConfig, error::BotError, traits::Fetcher, types::Update};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Lifecycle of a [`Poller`]: Idle → Running → Stopping → Stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

impl PollerState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

/// State visible outside the poll task. Only the task writes the cursor.
struct Shared {
    cursor: AtomicI64,
    state: AtomicU8,
}

impl Shared {
    fn state(&self) -> PollerState {
        PollerState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: PollerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn transition(&self, from: PollerState, to: PollerState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

fn request_stop(shared: &Shared, stop_tx: &watch::Sender<bool>) {
    if !shared.transition(PollerState::Running, PollerState::Stopping) {
        shared.transition(PollerState::Idle, PollerState::Stopped);
    }
    stop_tx.send_replace(true);
}

/// Stops a [`Poller`] from any thread or task.
#[derive(Clone)]
pub struct StopHandle {
    shared: Arc<Shared>,
    stop_tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        request_stop(&self.shared, &self.stop_tx);
    }
}

/// Turns a [`Fetcher`] into a stream of updates.
///
/// Dropping the poller stops its task.
pub struct Poller<F: ?Sized> {
    fetcher: Arc<F>,
    shared: Arc<Shared>,
    stop_tx: Arc<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl<F: Fetcher + ?Sized + 'static> Poller<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            fetcher,
            shared: Arc::new(Shared {
                cursor: AtomicI64::new(0),
                state: AtomicU8::new(PollerState::Idle as u8),
            }),
            stop_tx: Arc::new(stop_tx),
            task: None,
        }
    }

    /// Spawn the poll loop and return the update stream.
    ///
    /// Must be called from within a tokio runtime. The stream ends once the
    /// loop has stopped.
    pub fn start(&mut self, config: PollConfig) -> Result<mpsc::Receiver<Update>, BotError> {
        if self.shared.state() != PollerState::Idle {
            return Err(BotError::Config("poller already started".into()));
        }
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.capacity);
        let stop_rx = self.stop_tx.subscribe();
        self.shared.cursor.store(config.offset, Ordering::Release);
        if !self
            .shared
            .transition(PollerState::Idle, PollerState::Running)
        {
            return Err(BotError::Config("poller stopped before start".into()));
        }

        info!(
            offset = config.offset,
            limit = config.limit,
            timeout_secs = config.timeout_secs,
            "telegram poller starting"
        );
        self.task = Some(tokio::spawn(poll_loop(
            self.fetcher.clone(),
            config,
            self.shared.clone(),
            tx,
            stop_rx,
        )));
        Ok(rx)
    }

    /// Ask the loop to stop. Returns immediately; see [`Poller::wait`].
    pub fn stop(&self) {
        request_stop(&self.shared, &self.stop_tx);
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shared: self.shared.clone(),
            stop_tx: self.stop_tx.clone(),
        }
    }

    /// Lowest update id not yet published: the offset to resume from.
    pub fn cursor(&self) -> i64 {
        self.shared.cursor.load(Ordering::Acquire)
    }

    pub fn state(&self) -> PollerState {
        self.shared.state()
    }

    /// Wait for the poll task to finish.
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("telegram poller task failed: {e}");
            }
        }
    }
}

impl<F: ?Sized> Drop for Poller<F> {
    fn drop(&mut self) {
        request_stop(&self.shared, &self.stop_tx);
    }
}

/// Next cursor after publishing `id`. Takes the max, so a batch in any order
/// leaves the cursor one past its highest id. Saturates at `i64::MAX`.
fn advance(cursor: i64, id: i64) -> i64 {
    if id < cursor {
        return cursor;
    }
    match id.checked_add(1) {
        Some(next) => next,
        None => {
            warn!(
                update_id = id,
                "telegram update id at i64::MAX, cursor cannot move past it"
            );
            id
        }
    }
}

/// Marks the poller stopped when the loop exits, including on panic.
struct StoppedOnExit(Arc<Shared>);

impl Drop for StoppedOnExit {
    fn drop(&mut self) {
        self.0.set_state(PollerState::Stopped);
    }
}

async fn poll_loop<F: Fetcher + ?Sized>(
    fetcher: Arc<F>,
    config: PollConfig,
    shared: Arc<Shared>,
    tx: mpsc::Sender<Update>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let _stopped = StoppedOnExit(shared.clone());
    let mut cursor = config.offset;
    let mut failures: u32 = 0;

    'poll: loop {
        if *stop_rx.borrow() {
            break;
        }

        // Cancelling an in-flight fetch is safe: the cursor has not moved.
        let result = tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            result = fetcher.fetch(cursor, config.limit, config.timeout_secs) => result,
        };

        let batch = match result {
            Ok(batch) => {
                failures = 0;
                batch
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                let delay = config.retry.delay_for(failures);
                warn!(offset = cursor, failures, "telegram poll error (retry in {delay:?}): {e}");
                if delay.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::select! {
                        biased;
                        _ = stop_rx.changed() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                continue;
            }
        };

        debug!(
            offset = cursor,
            received = batch.updates.len(),
            skipped = batch.skipped.len(),
            "telegram poll cycle"
        );

        let total = batch.updates.len();
        for (published, update) in batch.updates.into_iter().enumerate() {
            let id = update.update_id;
            // Sends with free capacity win over a pending stop, so a batch
            // is delivered in full whenever the consumer keeps up.
            tokio::select! {
                biased;
                sent = tx.send(update) => {
                    if sent.is_err() {
                        info!("telegram update receiver dropped, stopping poll");
                        break 'poll;
                    }
                }
                _ = stop_rx.changed() => {
                    info!(
                        offset = cursor,
                        unpublished = total - published,
                        "telegram poller stopped mid-batch"
                    );
                    break 'poll;
                }
            }
            cursor = advance(cursor, id);
            shared.cursor.store(cursor, Ordering::Release);
        }

        for id in batch.skipped {
            cursor = advance(cursor, id);
        }
        shared.cursor.store(cursor, Ordering::Release);
    }

    info!(offset = cursor, "telegram poller stopped");
}
