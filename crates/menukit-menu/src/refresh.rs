//! Periodic display refresh.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::trace;

use menukit_contracts::player::PlayerId;
use menukit_core::traits::DisplayHandle;

/// Calls `DisplayHandle::update` every `period`, first after one period.
///
/// Cancelling sets a flag the loop checks before every update and aborts the
/// task, so no update starts after `cancel` returns. Dropping the task
/// cancels it.
pub struct RefreshTask {
    cancelled: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl RefreshTask {
    pub fn spawn(
        runtime: &Handle,
        period: Duration,
        display: Arc<dyn DisplayHandle>,
        player: PlayerId,
    ) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let handle = runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if flag.load(Ordering::Acquire) {
                    break;
                }
                trace!(player = %player, "refreshing display");
                display.update();
            }
        });
        Self { cancelled, handle }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.handle.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
