//! Background task driving periodic index refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

use super::PoiIndex;

const MIN_REFRESH_PERIOD: Duration = Duration::from_millis(1);

/// Handle to the refresh task.
///
/// The task stops when [`PoiIndexRefresher::shutdown`] is awaited or the
/// handle is dropped.
pub struct PoiIndexRefresher {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PoiIndexRefresher {
    /// Spawn a task refreshing `index` every `refresh_period`.
    ///
    /// The first cycle runs one period after spawning. Ticks missed while a
    /// slow cycle is running are delayed rather than bunched up.
    #[must_use]
    pub fn spawn(index: Arc<PoiIndex>) -> Self {
        let period = index.config().refresh_period.max(MIN_REFRESH_PERIOD);
        let (stop, mut stopped) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if index.refresh().await.is_err() {
                            debug!(index = %index.config().name, "retrying at next tick");
                        }
                    }
                    changed = stopped.changed() => {
                        if changed.is_err() || *stopped.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!(index = %index.config().name, "poi index refresher stopped");
        });
        Self {
            stop,
            task: Some(task),
        }
    }

    /// Signal the task to stop and wait for it to finish its current cycle.
    pub async fn shutdown(mut self) {
        self.stop.send_replace(true);
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(err) = task.await {
            warn!(error = %err, "poi index refresher task ended abnormally");
        }
    }
}

impl Drop for PoiIndexRefresher {
    fn drop(&mut self) {
        self.stop.send_replace(true);
    }
}
