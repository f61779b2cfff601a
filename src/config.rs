use std::net::SocketAddr;

/// Configuration for the mock serial console server
///
/// Host and port are not compiled-in constants; construct a config and hand
/// it to [`MockConsoleServer::new`](crate::MockConsoleServer::new). The
/// defaults match what dependent test clients expect from the fixture.
///
/// # Examples
///
/// ```
/// use solmock::ConsoleConfig;
///
/// let config = ConsoleConfig::default();
/// assert_eq!(config.bind_addr.port(), 9003);
/// assert_eq!(config.buffer_size, 1024);
/// ```
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Buffer size for each read from a connection
    pub buffer_size: usize,
    /// Prompt echoed after each completed input line, preceded by `\r\n`
    /// on the wire. The default produces the exact trailer `\r\n?\r\n`.
    pub prompt: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9003".parse().unwrap(),
            buffer_size: 1024,
            prompt: "?\r\n".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// The full byte sequence written after a line terminator is observed.
    pub fn trailer(&self) -> Vec<u8> {
        format!("\r\n{}", self.prompt).into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ConsoleConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:9003".parse().unwrap());
        assert_eq!(config.buffer_size, 1024);
        assert_eq!(config.prompt, "?\r\n");
    }

    #[test]
    fn test_default_trailer_bytes() {
        let config = ConsoleConfig::default();
        assert_eq!(config.trailer(), b"\r\n?\r\n");
    }

    #[test]
    fn test_custom_prompt_trailer() {
        let config = ConsoleConfig {
            prompt: "host01 # ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.trailer(), b"\r\nhost01 # ");
    }
}
