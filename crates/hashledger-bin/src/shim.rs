//! JSON-lines invocation loop.
//!
//! Each input line is one invocation:
//!
//! ```text
//! {"function": "upload_temp", "args": ["{\"name\":\"invoice\"}"]}
//! ```
//!
//! and produces exactly one output line:
//!
//! ```text
//! {"status":200,"payload":""}
//! {"status":500,"message":"Already exists: Template invoice already exists"}
//! ```
//!
//! Blank input lines are skipped.

use std::time::Instant;

use hashledger_dispatch::{Dispatcher, Response};
use hashledger_observe::logging::{invocation_span, log_slow_invocation, record_invocation_result};
use hashledger_storage::StorageBackend;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::Instrument;

/// Invocations slower than this are logged as warnings.
pub const SLOW_INVOCATION_MS: u128 = 100;

/// One input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&Response> for Reply {
    fn from(response: &Response) -> Self {
        Self {
            status: response.status(),
            payload: response.payload().map(|p| String::from_utf8_lossy(p).into_owned()),
            message: response.message().map(str::to_string),
        }
    }
}

/// Run invocations from `reader` until end of input, writing one reply line
/// per invocation to `writer`.
///
/// Returns the number of invocations handled.
pub async fn serve<S, R, W>(
    dispatcher: &Dispatcher<S>,
    reader: R,
    mut writer: W,
) -> anyhow::Result<u64>
where
    S: StorageBackend,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut sequence = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        sequence += 1;

        let reply = handle_line(dispatcher, &line, sequence).await;
        let mut out = serde_json::to_vec(&reply)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }

    tracing::info!(invocations = sequence, "Input closed");
    Ok(sequence)
}

async fn handle_line<S: StorageBackend>(
    dispatcher: &Dispatcher<S>,
    line: &str,
    sequence: u64,
) -> Reply {
    let invocation: Invocation = match serde_json::from_str(line) {
        Ok(invocation) => invocation,
        Err(e) => {
            tracing::warn!(sequence, error = %e, "Malformed invocation line");
            return Reply::from(&Response::error(format!("Decode error: {e}")));
        },
    };

    let span = invocation_span(&invocation.function, sequence);
    let start = Instant::now();
    let response = dispatcher
        .invoke(&invocation.function, invocation.args.as_slice())
        .instrument(span.clone())
        .await;
    let duration_ms = start.elapsed().as_millis();

    record_invocation_result(&span, response.status(), duration_ms);
    log_slow_invocation(&invocation.function, duration_ms, SLOW_INVOCATION_MS);

    Reply::from(&response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_shapes() {
        let ok = serde_json::to_string(&Reply::from(&Response::success("[]"))).unwrap();
        assert_eq!(ok, r#"{"status":200,"payload":"[]"}"#);

        let err = serde_json::to_string(&Reply::from(&Response::error("boom"))).unwrap();
        assert_eq!(err, r#"{"status":500,"message":"boom"}"#);
    }

    #[test]
    fn test_invocation_args_default_to_empty() {
        let invocation: Invocation = serde_json::from_str(r#"{"function":"query_temp"}"#).unwrap();
        assert!(invocation.args.is_empty());
    }
}
