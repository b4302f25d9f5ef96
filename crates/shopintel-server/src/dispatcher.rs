//! Background queue that runs scrape jobs off the request path.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};

use crate::runner::{JobRunner, ScrapeTicket};

#[derive(Debug, Error)]
#[error("job queue is closed")]
pub struct QueueClosed;

/// Handle for enqueueing jobs. Cloning shares the same queue.
///
/// Each queued ticket runs on its own tokio task; competitor follow-ups
/// returned by a run are queued behind it.
#[derive(Debug, Clone)]
pub struct JobDispatcher {
    tx: UnboundedSender<ScrapeTicket>,
}

impl JobDispatcher {
    /// Starts the worker loop on the current runtime. The loop exits once
    /// every handle is dropped and in-flight jobs have finished.
    pub fn spawn(runner: Arc<JobRunner>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(worker_loop(runner, rx, tx.downgrade()));
        Self { tx }
    }

    /// # Errors
    ///
    /// Returns [`QueueClosed`] if the worker loop is no longer running.
    pub fn submit(&self, ticket: ScrapeTicket) -> Result<(), QueueClosed> {
        self.tx.send(ticket).map_err(|_| QueueClosed)
    }
}

async fn worker_loop(
    runner: Arc<JobRunner>,
    mut rx: UnboundedReceiver<ScrapeTicket>,
    requeue: WeakUnboundedSender<ScrapeTicket>,
) {
    tracing::info!("dispatcher: worker started");

    while let Some(ticket) = rx.recv().await {
        tracing::debug!(job_id = ticket.job_id, "dispatcher: job dequeued");
        let runner = Arc::clone(&runner);
        let requeue = requeue.clone();

        tokio::spawn(async move {
            let outcome = runner.run(ticket).await;
            if outcome.follow_ups.is_empty() {
                return;
            }
            let Some(tx) = requeue.upgrade() else {
                tracing::warn!(
                    job_id = outcome.job_id,
                    dropped = outcome.follow_ups.len(),
                    "dispatcher: queue closed; competitor jobs left pending"
                );
                return;
            };
            for follow_up in outcome.follow_ups {
                let job_id = follow_up.job_id;
                if tx.send(follow_up).is_err() {
                    tracing::warn!(job_id, "dispatcher: failed to enqueue competitor job");
                }
            }
        });
    }

    tracing::info!("dispatcher: queue closed; worker exiting");
}
