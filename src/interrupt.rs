//! Interrupt handling for the batch binaries.

use log::{error, info, warn};
use logcall_core::CancellationToken;
use std::io;
use std::thread;

/// Exit status of a process killed by SIGINT
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// What a received termination signal should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    /// First signal: stop dispatching work and let the run wind down
    Cancel,
    /// The run was already cancelled: leave immediately
    Exit,
}

/// Cancels `token` on the first signal; asks for an exit on any later one.
pub fn on_signal(token: &CancellationToken) -> SignalAction {
    if token.is_cancelled() {
        SignalAction::Exit
    } else {
        token.cancel();
        SignalAction::Cancel
    }
}

/// Cancels `token` when the process receives SIGINT or SIGTERM. A second
/// signal exits the process with status 130.
///
/// Signals are awaited on a dedicated thread running a current-thread
/// tokio runtime, so the scanning code stays synchronous.
pub fn spawn_interrupt_handler(token: CancellationToken) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("interrupt".to_string())
        .spawn(move || {
            runtime.block_on(async {
                loop {
                    if let Err(e) = wait_for_signal().await {
                        error!("Signal handler error: {}", e);
                        return;
                    }
                    match on_signal(&token) {
                        SignalAction::Cancel => warn!(" ---- INTERRUPTED BY USER ---- "),
                        SignalAction::Exit => {
                            warn!("Second interrupt, exiting without finishing the current repository");
                            std::process::exit(INTERRUPTED_EXIT_CODE);
                        }
                    }
                }
            })
        })?;
    Ok(())
}

/// Waits for one termination signal
async fn wait_for_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => info!("Received SIGINT"),
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_signal_cancels() {
        let token = CancellationToken::new();
        assert_eq!(on_signal(&token), SignalAction::Cancel);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_second_signal_exits() {
        let token = CancellationToken::new();
        on_signal(&token);
        assert_eq!(on_signal(&token), SignalAction::Exit);
        assert_eq!(on_signal(&token.clone()), SignalAction::Exit);
    }

    #[test]
    fn test_handler_spawns_without_cancelling() {
        let token = CancellationToken::new();
        spawn_interrupt_handler(token.clone()).unwrap();
        assert!(!token.is_cancelled());
    }
}
