use crate::{ConsoleError, Result};
use bytes::BytesMut;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Configuration for the console test client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Read timeout for operations
    pub read_timeout: Duration,
    /// Write timeout for operations
    pub write_timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Buffer size for reading data
    pub buffer_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(10),
            buffer_size: 1024,
        }
    }
}

/// TCP client for driving the mock console in tests
///
/// The server's replies are not request/response framed (a trailer may
/// follow an echo), so the client exposes exact-length reads and a
/// silence check instead of a single echo round-trip call.
pub struct ConsoleClient {
    stream: TcpStream,
    config: ClientConfig,
}

impl ConsoleClient {
    /// Connect to a server with custom configuration
    pub async fn connect_with_config(addr: SocketAddr, config: ClientConfig) -> Result<Self> {
        let stream = timeout(config.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| ConsoleError::Timeout("connection timeout".to_string()))??;

        Ok(Self { stream, config })
    }

    /// Connect with default configuration
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        Self::connect_with_config(addr, ClientConfig::default()).await
    }

    /// Sends data to the server in a single write
    pub async fn send(&mut self, data: &[u8]) -> Result<()> {
        timeout(self.config.write_timeout, self.stream.write_all(data))
            .await
            .map_err(|_| ConsoleError::Timeout("write timeout".to_string()))??;
        timeout(self.config.write_timeout, self.stream.flush())
            .await
            .map_err(|_| ConsoleError::Timeout("flush timeout".to_string()))??;
        Ok(())
    }

    /// Reads exactly `len` bytes from the server
    ///
    /// Fails with a timeout error if the server does not produce the full
    /// response within the read timeout.
    pub async fn read_exact_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut response = BytesMut::with_capacity(len);
        let mut buffer = vec![0u8; self.config.buffer_size];

        while response.len() < len {
            let remaining = len - response.len();
            let want = remaining.min(buffer.len());
            let read_result =
                timeout(self.config.read_timeout, self.stream.read(&mut buffer[..want])).await;

            match read_result {
                Ok(Ok(0)) => {
                    return Err(ConsoleError::Config(format!(
                        "connection closed after {} of {} expected bytes",
                        response.len(),
                        len
                    )));
                }
                Ok(Ok(n)) => response.extend_from_slice(&buffer[..n]),
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    return Err(ConsoleError::Timeout(format!(
                        "read timeout: expected {} bytes, got {}",
                        len,
                        response.len()
                    )));
                }
            }
        }

        Ok(response.to_vec())
    }

    /// Sends `data` and asserts the server's reply is exactly `expected`
    pub async fn send_and_expect(&mut self, data: &[u8], expected: &[u8]) -> Result<()> {
        self.send(data).await?;
        let response = self.read_exact_bytes(expected.len()).await?;
        if response != expected {
            return Err(ConsoleError::Config(format!(
                "response mismatch: expected {expected:?}, got {response:?}"
            )));
        }
        Ok(())
    }

    /// Verifies the server sends nothing further within `window`
    ///
    /// Used to prove the absence of a spurious trailer after an
    /// unterminated write.
    pub async fn expect_silence(&mut self, window: Duration) -> Result<()> {
        let mut buffer = vec![0u8; self.config.buffer_size];
        match timeout(window, self.stream.read(&mut buffer)).await {
            Err(_) => Ok(()),
            Ok(Ok(0)) => Err(ConsoleError::Config(
                "connection closed while expecting silence".to_string(),
            )),
            Ok(Ok(n)) => Err(ConsoleError::Config(format!(
                "expected silence but received {n} bytes: {:?}",
                &buffer[..n]
            ))),
            Ok(Err(e)) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.read_timeout, Duration::from_secs(5));
        assert_eq!(config.write_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.buffer_size, 1024);
    }
}
