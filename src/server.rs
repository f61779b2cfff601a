use crate::config::ConsoleConfig;
use crate::session::Session;
use crate::{ConsoleError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{Instrument, error, info};

/// Mock serial-over-LAN console server
///
/// Listens on a TCP address and runs an independent [`Session`] per
/// accepted connection. Sessions share no state; a failed or closed
/// connection never affects the listener or other connections.
///
/// # Examples
///
/// Basic server setup and running:
///
/// ```no_run
/// use solmock::{ConsoleConfig, MockConsoleServer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = MockConsoleServer::new(ConsoleConfig::default());
///     server.run().await?;
///     Ok(())
/// }
/// ```
///
/// Server on an ephemeral port with shutdown, as used in tests:
///
/// ```no_run
/// use solmock::{ConsoleConfig, MockConsoleServer};
/// use tokio::net::TcpListener;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let listener = TcpListener::bind("127.0.0.1:0").await?;
///     let addr = listener.local_addr()?;
///     let server = MockConsoleServer::new(ConsoleConfig::default());
///     let shutdown = server.shutdown_signal();
///
///     let handle = tokio::spawn(async move { server.serve(listener).await });
///
///     // Drive clients against `addr`...
///
///     let _ = shutdown.send(());
///     handle.await??;
///     Ok(())
/// }
/// ```
pub struct MockConsoleServer {
    config: ConsoleConfig,
    shutdown_signal: Arc<tokio::sync::broadcast::Sender<()>>,
}

impl MockConsoleServer {
    /// Creates a new mock console server with the given configuration
    pub fn new(config: ConsoleConfig) -> Self {
        let (shutdown_signal, _) = tokio::sync::broadcast::channel(1);
        Self {
            config,
            shutdown_signal: Arc::new(shutdown_signal),
        }
    }

    /// Binds to the configured address and serves until shutdown
    ///
    /// Bind failure (e.g. the port is already in use) is fatal and returned
    /// as [`ConsoleError::Bind`]; there is no retry.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .map_err(ConsoleError::Bind)?;
        self.serve(listener).await
    }

    /// Serves connections on an already-bound listener
    ///
    /// Lets tests bind `127.0.0.1:0` themselves and read the ephemeral port
    /// off the listener before handing it over.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr().map_err(ConsoleError::Bind)?;
        info!(address = %addr, "mock serial console listening");

        // Live-session count, for log lines only; accepting is unbounded
        // with no connection limit.
        let connection_count = Arc::new(AtomicUsize::new(0));
        let mut shutdown_rx = self.shutdown_signal.subscribe();

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer)) => {
                            let current = connection_count.fetch_add(1, Ordering::SeqCst) + 1;
                            info!(%peer, current, "accepted connection");

                            let session = Session::new(stream, &self.config);
                            let connection_count = connection_count.clone();
                            let span = tracing::info_span!("session", %peer);

                            tokio::spawn(async move {
                                if let Err(e) = session.run().instrument(span).await {
                                    error!(%peer, error = %e, "session ended with error");
                                }
                                let remaining = connection_count.fetch_sub(1, Ordering::SeqCst) - 1;
                                info!(%peer, current = remaining, "connection closed");
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "failed to accept connection");
                        }
                    }
                }
                _ = signal::ctrl_c() => {
                    info!("received interrupt, stopping server");
                    break;
                }
                _ = shutdown_rx.recv() => {
                    info!("received internal shutdown signal, stopping server");
                    break;
                }
            }
        }

        info!("mock serial console stopped");
        Ok(())
    }

    /// Returns a sender that stops the accept loop when signalled
    ///
    /// Live sessions are not drained; they end when their peers disconnect
    /// or the process exits.
    pub fn shutdown_signal(&self) -> tokio::sync::broadcast::Sender<()> {
        self.shutdown_signal.as_ref().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_new() {
        let server = MockConsoleServer::new(ConsoleConfig::default());
        assert_eq!(server.shutdown_signal().receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_bind_failure_is_fatal() {
        // Occupy a port, then ask the server to bind the same one.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = MockConsoleServer::new(ConsoleConfig {
            bind_addr: addr,
            ..Default::default()
        });

        match server.run().await {
            Err(ConsoleError::Bind(_)) => {}
            other => panic!("expected bind error, got {other:?}"),
        }
    }
}
