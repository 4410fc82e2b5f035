//! Line-delimited JSON dispatcher: one request per input line, one response
//! per output line.

use crate::{DialogManager, INVALID_REQUEST};
use dialog_rs_protocol::{Request, Response};
use log::{info, warn};
use serde_json::Value;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Parse and answer a single line; blank lines produce no response.
pub async fn handle_line(manager: &DialogManager, line: &str) -> Option<Response> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let response = match serde_json::from_str::<Request>(trimmed) {
        Ok(request) => manager.handle(request).await,
        Err(err) => {
            warn!("rejecting malformed request: {err}");
            Response::failure(Value::Null, INVALID_REQUEST, format!("malformed request: {err}"))
        }
    };
    Some(response)
}

/// Serve requests from `reader` until EOF, writing responses to `writer`.
pub async fn serve<R, W>(manager: &DialogManager, reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0usize;
    while let Some(line) = lines.next_line().await? {
        let Some(response) = handle_line(manager, &line).await else {
            continue;
        };
        let serialized = serde_json::to_string(&response)?;
        writer.write_all(serialized.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        handled += 1;
    }
    info!("input closed (requests={})", handled);
    Ok(())
}

/// Serve requests on stdin/stdout.
pub async fn serve_stdio(manager: &DialogManager) -> io::Result<()> {
    info!("serving dialog tools on stdio");
    let stdin = io::BufReader::new(io::stdin());
    serve(manager, stdin, io::stdout()).await
}
