use crate::config::ConsoleConfig;
use crate::server::MockConsoleServer;
use crate::{ConsoleError, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Spawns a mock console on an ephemeral port for integration tests
///
/// Binds `127.0.0.1:0` and hands the bound listener to the server, so the
/// returned address is usable immediately with no rebind race. Abort the
/// returned handle to tear the server down.
pub async fn spawn_mock_console(
    config: ConsoleConfig,
) -> Result<(JoinHandle<Result<()>>, SocketAddr)> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(ConsoleError::Bind)?;
    let addr = listener.local_addr().map_err(ConsoleError::Bind)?;

    let server = MockConsoleServer::new(ConsoleConfig {
        bind_addr: addr,
        ..config
    });

    let server_handle = tokio::spawn(async move { server.serve(listener).await });

    Ok((server_handle, addr))
}
