//! Background inbox polling.

use std::sync::Arc;

use tempmailx_api::MailProvider;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::controller::SessionController;
use super::model::PollOutcome;
use super::store::SessionStore;

impl<P, S> SessionController<P, S>
where
    P: MailProvider + 'static,
    S: SessionStore + 'static,
{
    /// Spawns the polling task.
    ///
    /// The inbox is polled right away and then once per
    /// [`poll_interval`](super::SessionConfig::poll_interval). Whenever the
    /// session is replaced the timer restarts, so no tick ever fires against
    /// the old token. While there is no session the task idles. It runs until
    /// [`shutdown`](Self::shutdown) is called.
    pub fn spawn_polling(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.poll_loop().await })
    }

    async fn poll_loop(&self) {
        let period = self.config().poll_interval;
        let mut shutdown = self.shutdown.subscribe();
        let mut snapshots = self.subscribe();
        let mut generation = snapshots.borrow_and_update().generation;

        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Starting poll loop (interval: {period:?})");
        let mut polls: u64 = 0;

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = snapshots.borrow_and_update().generation;
                    if current != generation {
                        debug!("Session generation {generation} -> {current}, restarting timer");
                        generation = current;
                        ticker.reset_immediately();
                    }
                }
                _ = ticker.tick(), if self.has_session() => {
                    polls += 1;
                    match self.refresh().await {
                        Ok(PollOutcome::Updated { arrival: Some(message) }) => {
                            debug!("Poll #{polls}: new message {}", message.id);
                        }
                        Ok(outcome) => debug!("Poll #{polls}: {outcome:?}"),
                        Err(e) => warn!("Poll #{polls} failed, retrying next tick: {e}"),
                    }
                }
            }
        }

        info!("Poll loop stopped after {polls} polls");
    }
}
