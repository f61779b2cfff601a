use proptest::prelude::*;
use solmock::test_utils::spawn_mock_console;
use solmock::{ConsoleClient, ConsoleConfig};
use std::time::Duration;

/// Strategy for payloads that never end a line: arbitrary bytes with the
/// terminator bytes stripped out.
fn unterminated_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>().prop_filter("no terminators", |b| *b != b'\n' && *b != b'\r'), 1..512)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: terminator-free input is echoed exactly, with nothing else
    #[test]
    fn echo_preserves_unterminated_data(data in unterminated_bytes()) {
        tokio_test::block_on(async {
            let (server_handle, addr) = spawn_mock_console(ConsoleConfig::default()).await
                .map_err(|e| TestCaseError::fail(format!("server setup failed: {e}")))?;

            let mut client = ConsoleClient::connect(addr).await
                .map_err(|e| TestCaseError::fail(format!("client connection failed: {e}")))?;

            client.send(&data).await
                .map_err(|e| TestCaseError::fail(format!("send failed: {e}")))?;
            let response = client.read_exact_bytes(data.len()).await
                .map_err(|e| TestCaseError::fail(format!("read failed: {e}")))?;
            client.expect_silence(Duration::from_millis(50)).await
                .map_err(|e| TestCaseError::fail(format!("spurious bytes: {e}")))?;

            server_handle.abort();

            prop_assert_eq!(response, data);
            Ok(())
        })?;
    }

    /// Property: any line, however it is split across writes, yields the
    /// echoed line followed by exactly one trailer
    #[test]
    fn terminated_line_gets_one_trailer(
        body in unterminated_bytes(),
        split in 0usize..512,
        terminator in prop_oneof![Just(b'\n'), Just(b'\r')],
    ) {
        tokio_test::block_on(async {
            let (server_handle, addr) = spawn_mock_console(ConsoleConfig::default()).await
                .map_err(|e| TestCaseError::fail(format!("server setup failed: {e}")))?;

            let mut client = ConsoleClient::connect(addr).await
                .map_err(|e| TestCaseError::fail(format!("client connection failed: {e}")))?;

            let mut line = body.clone();
            line.push(terminator);
            let split = split.min(line.len());
            let (head, tail) = line.split_at(split);

            for chunk in [head, tail] {
                if !chunk.is_empty() {
                    client.send(chunk).await
                        .map_err(|e| TestCaseError::fail(format!("send failed: {e}")))?;
                }
            }

            let mut expected = line.clone();
            expected.extend_from_slice(b"\r\n?\r\n");
            let response = client.read_exact_bytes(expected.len()).await
                .map_err(|e| TestCaseError::fail(format!("read failed: {e}")))?;
            client.expect_silence(Duration::from_millis(50)).await
                .map_err(|e| TestCaseError::fail(format!("spurious bytes: {e}")))?;

            server_handle.abort();

            prop_assert_eq!(response, expected);
            Ok(())
        })?;
    }
}
