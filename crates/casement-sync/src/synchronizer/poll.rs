//! Periodic reconcile of native windows against the tracked map.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::Synchronizer;
use crate::tracked::Change;

/// What one poll tick observed and emitted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Visible class-matching windows.
    pub seen: usize,
    /// Class-matching windows skipped as not visible.
    pub hidden: usize,
    pub upserted: usize,
    pub closed: usize,
}

impl Synchronizer {
    /// One enumerate-and-reconcile pass.
    ///
    /// If enumeration itself fails the tick is skipped entirely; the map
    /// is left as-is rather than treating every window as closed.
    pub async fn poll_tick(&self) -> TickReport {
        let snapshot = match self.directory.enumerate(&self.settings.class_filter) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Window enumeration failed, skipping tick");
                return TickReport::default();
            }
        };

        let mut report = TickReport::default();
        let visible: Vec<_> = snapshot
            .filter(|w| {
                let shown = self.directory.is_visible(w.handle);
                if !shown {
                    report.hidden += 1;
                }
                shown
            })
            .collect();
        report.seen = visible.len();

        let mut tracked = self.tracked.lock().await;
        for change in tracked.reconcile(visible) {
            match change {
                Change::Upserted(window) => {
                    tracing::info!(
                        handle = %window.handle,
                        window_type = %window.logical_type,
                        rect = %window.rect,
                        "Window detected/updated"
                    );
                    self.persist(&window.logical_type, window.rect).await;
                    self.publish_upsert(&window);
                    report.upserted += 1;
                }
                Change::Closed(window) => {
                    tracing::info!(
                        handle = %window.handle,
                        window_type = %window.logical_type,
                        "Window closed"
                    );
                    self.publish_closed(&window);
                    report.closed += 1;
                }
            }
        }

        report
    }

    /// Poll every `poll_interval` until `shutdown` flips or its sender is
    /// dropped. Ticks are skipped while nobody is subscribed.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_ms = self.settings.poll_interval.as_millis() as u64,
            class_filter = %self.settings.class_filter,
            "Poll loop started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Poll loop stopping");
                        return;
                    }
                    continue;
                }
            }

            if self.subscriber_count() == 0 {
                continue;
            }

            let report = self.poll_tick().await;
            tracing::trace!(
                seen = report.seen,
                hidden = report.hidden,
                upserted = report.upserted,
                closed = report.closed,
                "Poll tick"
            );
        }
    }
}
