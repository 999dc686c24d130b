/*!
 * Command-line probe for a running caption server.
 *
 * Sends each line as a final caption update and collects the reply the
 * server produces for it.
 */

use anyhow::{Context, Result, anyhow};
use futures_util::{SinkExt, Stream, StreamExt};
use log::{debug, warn};
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// Sample captions sent when no lines are given
pub const SAMPLE_CAPTIONS: [&str; 2] = [
    "Hello everyone and welcome to the meeting",
    "We will review the quarterly plan.",
];

/// Send `lines` as final captions to `url`, returning the replies in order.
///
/// A line whose reply does not arrive within `reply_timeout` is logged and
/// skipped; the server stays silent when a translation fails.
pub async fn run_probe(
    url: &str,
    lines: &[String],
    targets: Option<&[String]>,
    reply_timeout: Duration,
) -> Result<Vec<String>> {
    let (mut ws_stream, _response) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| anyhow!("Failed to connect to {}: {}", url, e))?;

    let mut replies = Vec::with_capacity(lines.len());
    for line in lines {
        let mut payload = serde_json::json!({ "text": line, "is_final": true });
        if let Some(targets) = targets {
            payload["targets"] = serde_json::json!(targets);
        }
        debug!("Sending {}", payload);
        ws_stream
            .send(WsMessage::Text(payload.to_string().into()))
            .await
            .context("Failed to send caption")?;

        match tokio::time::timeout(reply_timeout, next_text(&mut ws_stream)).await {
            Ok(Some(reply)) => replies.push(reply),
            Ok(None) => return Err(anyhow!("Server closed the connection")),
            Err(_) => warn!("No reply within {:?} for: {}", reply_timeout, line),
        }
    }

    ws_stream.close(None).await.ok();
    Ok(replies)
}

/// Next text frame, skipping control frames; `None` once the stream ends
async fn next_text<S>(ws_stream: &mut S) -> Option<String>
where
    S: Stream<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(frame) = ws_stream.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => return Some(text.as_str().to_string()),
            Ok(WsMessage::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
    None
}
