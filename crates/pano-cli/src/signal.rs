//! Termination on SIGINT and SIGTERM
//!
//! The process exits at once with `128 + signal number`; an interrupted sync
//! is not rolled back.

const SIGINT: i32 = 2;
#[cfg(unix)]
const SIGTERM: i32 = 15;

/// Exit code for a process terminated by `signal`.
pub fn exit_code(signal: i32) -> i32 {
    128 + signal
}

/// Spawn a task that exits the process when a termination signal arrives.
pub fn install_exit_handler() {
    tokio::spawn(async {
        if let Some(signal) = wait_for_signal().await {
            tracing::debug!(signal, "terminated by signal");
            std::process::exit(exit_code(signal));
        }
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> Option<i32> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt()).ok()?;
    let mut terminate = signal(SignalKind::terminate()).ok()?;
    tokio::select! {
        _ = interrupt.recv() => Some(SIGINT),
        _ = terminate.recv() => Some(SIGTERM),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Option<i32> {
    tokio::signal::ctrl_c().await.ok().map(|_| SIGINT)
}
