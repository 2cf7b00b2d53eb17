//! Sequential action execution

use tracing::{debug, info, warn};

use super::{Executor, SyncOptions, SyncReport};
use crate::reconcile::{Action, ActionSet};

/// Observer notified as actions are applied.
///
/// Implementations must be thread-safe; the CLI drives a progress bar
/// through it.
pub trait Progress: Send + Sync {
    fn start(&self, _total: usize) {}

    fn advance(&self, _action: &Action) {}

    fn finish(&self) {}
}

/// A [`Progress`] that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Apply `actions` in order through `executor`.
///
/// A failing action is recorded in the report and the remaining actions are
/// still attempted. Nothing is rolled back.
pub async fn execute_actions<E>(
    executor: &E,
    actions: &ActionSet,
    options: &SyncOptions,
    progress: &dyn Progress,
) -> SyncReport
where
    E: Executor + ?Sized,
{
    let mut report = SyncReport::success();
    progress.start(actions.len());

    for action in actions {
        if options.dry_run {
            report.actions.push(dry_run_line(action));
            progress.advance(action);
            continue;
        }

        debug!(action = %action, "executing action");
        match executor.execute(action).await {
            Ok(()) => {
                info!(action = %action, "applied");
                report.actions.push(action.description().to_string());
            }
            Err(e) => {
                warn!(action = %action, error = %e, "action failed");
                report.record_error(format!(
                    "Failed to execute action {}: {}",
                    action.description(),
                    error_chain(&e)
                ));
            }
        }
        progress.advance(action);
    }

    progress.finish();
    report
}

fn dry_run_line(action: &Action) -> String {
    let entity = action.entity();
    format!(
        "[dry-run] Would {} {} {}",
        action.kind().verb().to_lowercase(),
        entity.kind().label(),
        entity.identity()
    )
}

/// Render an error and its sources as `outer: inner: ...`.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pano_model::{Model, VirtualDataSource};

    use crate::reconcile::reconcile;
    use crate::state::{State, StateBuilder};

    #[derive(Debug, thiserror::Error)]
    #[error("rejected {0}")]
    struct Rejected(String);

    /// Records executed actions and rejects data sources named `bad`.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Executor for Recorder {
        type Error = Rejected;

        async fn execute(&self, action: &Action) -> Result<(), Rejected> {
            self.seen.lock().unwrap().push(action.description().to_string());
            if action.identity().name() == "bad" {
                return Err(Rejected(action.identity().to_string()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct Counter {
        started: AtomicUsize,
        advanced: AtomicUsize,
    }

    impl Progress for Counter {
        fn start(&self, total: usize) {
            self.started.store(total, Ordering::SeqCst);
        }

        fn advance(&self, _action: &Action) {
            self.advanced.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn source() -> State {
        StateBuilder::new("local")
            .with(VirtualDataSource::new("bad", "Bad"), Some("bad"))
            .unwrap()
            .with(VirtualDataSource::new("good", "Good"), Some("good"))
            .unwrap()
            .with(Model::new("m1", "db.t").in_dataset("good"), Some("good"))
            .unwrap()
            .build()
    }

    #[tokio::test]
    async fn failure_does_not_abort_the_batch() {
        let executor = Recorder::default();
        let actions = reconcile(&source(), &State::empty());

        let report = execute_actions(&executor, &actions, &SyncOptions::default(), &NoProgress).await;

        assert_eq!(executor.seen.lock().unwrap().len(), 3);
        assert!(!report.success);
        assert_eq!(
            report.errors,
            vec!["Failed to execute action Create data source bad: rejected bad"]
        );
        assert_eq!(report.actions, vec!["Create data source good", "Create model good.m1"]);
    }

    #[tokio::test]
    async fn dry_run_touches_nothing() {
        let executor = Recorder::default();
        let actions = reconcile(&source(), &State::empty());
        let progress = Counter::default();

        let report = execute_actions(&executor, &actions, &SyncOptions { dry_run: true }, &progress).await;

        assert!(executor.seen.lock().unwrap().is_empty());
        assert!(report.success);
        assert_eq!(report.actions[0], "[dry-run] Would create data source bad");
        assert_eq!(progress.started.load(Ordering::SeqCst), 3);
        assert_eq!(progress.advanced.load(Ordering::SeqCst), 3);
    }
}
