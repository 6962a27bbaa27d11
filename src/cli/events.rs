//! JSON-lines event printer

use std::io::Write;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::AgentEvent;

/// Spawn a task that writes each event as one JSON line.
///
/// The task ends once every sender is dropped and the queue is drained, and
/// hands the writer back. Await the handle before exiting so the final
/// event of a run is not lost.
pub fn spawn_event_writer<W>(
    mut rx: mpsc::UnboundedReceiver<AgentEvent>,
    mut out: W,
) -> JoinHandle<W>
where
    W: Write + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let written = serde_json::to_string(&event)
                .map_err(std::io::Error::from)
                .and_then(|line| writeln!(out, "{}", line));
            if let Err(e) = written {
                tracing::warn!("Failed to write event: {}", e);
            }
        }
        let _ = out.flush();
        out
    })
}
