//! Height-sync poller: watches the document height and tells the host to resize the iframe.
//!
//! A spawned task ticks at a fixed period (first tick one period after start),
//! compares the host's current height with the last one it reported, and posts a
//! height envelope when they differ. [`SyncMode`] selects whether it stops after
//! the first change or keeps running; either way the returned handle can stop it.

use crate::error::{DevKitError, Result};
use crate::host::{post_app_message, Host};
use crate::message;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_CORRELATION_PARAM: &str = "resizeId";
/// Parameter name used by older hosts; read when the configured one is absent.
pub const LEGACY_CORRELATION_PARAM: &str = "weekdayId";

/// Whether height sync stops after the first adjustment or runs until stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncMode {
    /// Stop after the first height change; posts `AUTO_ADJUST_MESSAGE_HEIGHT`.
    OneShot,
    /// Keep polling until stopped; posts `SYNC_MESSAGE_HEIGHT` on every change.
    #[default]
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Armed,
    Stopped,
}

/// Last reported height. Starts at 0, so the first non-zero reading is reported.
#[derive(Debug, Default)]
pub struct HeightTracker {
    last: u32,
}

impl HeightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `height`; returns it if it differs from the previous reading.
    pub fn observe(&mut self, height: u32) -> Option<u32> {
        if height == self.last {
            return None;
        }
        self.last = height;
        Some(height)
    }

    pub fn last(&self) -> u32 {
        self.last
    }
}

/// Resolve the correlation id from the host location: `param` first, then the legacy name.
pub fn correlation_id(host: &dyn Host, param: &str) -> Result<String> {
    host.query_param(param)
        .filter(|id| !id.is_empty())
        .or_else(|| {
            host.query_param(LEGACY_CORRELATION_PARAM)
                .filter(|id| !id.is_empty())
        })
        .ok_or_else(|| DevKitError::MissingUserId(param.to_string()))
}

/// Handle to a running poller. Dropping it leaves the task running; call [`stop`](Self::stop).
pub struct HeightSyncHandle {
    stopped: Arc<AtomicBool>,
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

impl HeightSyncHandle {
    /// Request the poller to stop. Idempotent.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    pub fn state(&self) -> SyncState {
        if self.stopped.load(Ordering::SeqCst) || self.task.is_finished() {
            SyncState::Stopped
        } else {
            SyncState::Armed
        }
    }

    /// Wait for the poller task to finish (after `stop`, or after the first change in one-shot mode).
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            log::debug!("height sync task ended abnormally: {}", e);
        }
    }
}

/// Spawn the poller on the current tokio runtime.
///
/// Fails with `UnsupportedEnvironment` outside a runtime and `InvalidArgument` for a zero period.
pub fn start(
    host: Arc<dyn Host>,
    resize_id: impl Into<String>,
    mode: SyncMode,
    period: Duration,
) -> Result<HeightSyncHandle> {
    if period.is_zero() {
        return Err(DevKitError::InvalidArgument(
            "height sync interval must be greater than zero".to_string(),
        ));
    }
    let runtime =
        tokio::runtime::Handle::try_current().map_err(|_| DevKitError::UnsupportedEnvironment)?;
    let resize_id = resize_id.into();
    let stopped = Arc::new(AtomicBool::new(false));
    let wake = Arc::new(Notify::new());
    log::info!(
        "height sync: starting ({:?}, every {} ms, id {})",
        mode,
        period.as_millis(),
        resize_id
    );
    let task = runtime.spawn(run_poll_loop(
        host,
        resize_id,
        mode,
        period,
        stopped.clone(),
        wake.clone(),
    ));
    Ok(HeightSyncHandle {
        stopped,
        wake,
        task,
    })
}

async fn run_poll_loop(
    host: Arc<dyn Host>,
    resize_id: String,
    mode: SyncMode,
    period: Duration,
    stopped: Arc<AtomicBool>,
    wake: Arc<Notify>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tracker = HeightTracker::new();
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = wake.notified() => {}
        }
        if stopped.load(Ordering::SeqCst) {
            break;
        }
        let Some(height) = tracker.observe(host.current_height()) else {
            continue;
        };
        let msg = match mode {
            SyncMode::OneShot => message::auto_adjust_height(resize_id.clone(), height),
            SyncMode::Continuous => message::sync_height(resize_id.clone(), height),
        };
        post_app_message(host.as_ref(), &msg);
        if mode == SyncMode::OneShot {
            stopped.store(true, Ordering::SeqCst);
            break;
        }
    }
    log::info!("height sync: stopped (id {})", resize_id);
}
