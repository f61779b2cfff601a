use crate::Result;
use crate::config::ConsoleConfig;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Per-connection state machine for one mock console session
///
/// Echoes every received chunk back verbatim, and whenever the accumulated
/// input since the last prompt ends in a line terminator (`\n` or `\r`),
/// writes the prompt trailer and clears the accumulator. This imitates the
/// byte-level behavior a client expects after `sol activate` against a real
/// serial console.
///
/// The session owns its stream for its entire lifetime. It is generic over
/// the stream type so the state machine can be driven through in-memory
/// duplex pipes in tests.
pub struct Session<S> {
    stream: S,
    buffer: Vec<u8>,
    input: BytesMut,
    trailer: Vec<u8>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a session around an accepted stream
    pub fn new(stream: S, config: &ConsoleConfig) -> Self {
        Self {
            stream,
            buffer: vec![0; config.buffer_size],
            input: BytesMut::new(),
            trailer: config.trailer(),
        }
    }

    /// Runs the echo loop until the peer closes the connection or an I/O
    /// error occurs
    ///
    /// A zero-byte read is a normal close and returns `Ok(())`. Any I/O
    /// error is returned to the caller; it only ever affects this session.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let n = self.stream.read(&mut self.buffer).await?;

            if n == 0 {
                info!("client closed connection");
                return Ok(());
            }

            let preview = String::from_utf8_lossy(&self.buffer[..n]);
            info!(size = n, preview = %preview, "received data");

            // Echo back verbatim before any trailer logic runs.
            self.stream.write_all(&self.buffer[..n]).await?;
            self.input.extend_from_slice(&self.buffer[..n]);

            // The accumulator is append-only and cleared after every match,
            // so checking the most recent byte is equivalent to checking
            // whether the whole accumulated line ends in a terminator.
            if matches!(self.input.last(), Some(&(b'\n' | b'\r'))) {
                debug!(line_len = self.input.len(), "line terminated, sending prompt");
                self.stream.write_all(&self.trailer).await?;
                self.input.clear();
            }

            self.stream.flush().await?;
        }
    }
}
