use std::fmt;

use anyhow::Result;
use tokio::signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    Interrupt,
    Terminate,
}

impl fmt::Display for Shutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        })
    }
}

/// Resolve on Ctrl+C or SIGTERM.
///
/// # Errors
/// Returns an error if a signal handler cannot be installed.
pub async fn wait_for_shutdown() -> Result<Shutdown> {
    let received = tokio::select! {
        res = signal::ctrl_c() => res.map(|()| Shutdown::Interrupt)?,
        res = terminate() => res?,
    };
    tracing::info!(signal = %received, "shutdown signal received, draining connections");
    Ok(received)
}

#[cfg(unix)]
async fn terminate() -> Result<Shutdown> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    sigterm.recv().await;
    Ok(Shutdown::Terminate)
}

#[cfg(not(unix))]
async fn terminate() -> Result<Shutdown> {
    std::future::pending().await
}
