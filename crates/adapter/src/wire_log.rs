//! Wire log - append every protocol line to a file
//!
//! Writes happen on a background task so the turn loop never waits on disk.
//! Each record is one line: `>> ` for lines sent, `<< ` for lines received.

use tokio::sync::mpsc;

#[derive(Debug, Clone)]
enum WireRecord {
    Outbound(String),
    Inbound(String),
}

/// Handle to the background writer. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WireLog {
    tx: mpsc::UnboundedSender<WireRecord>,
}

impl WireLog {
    /// Start the writer task. Must be called inside a tokio runtime.
    ///
    /// Open or write failures stop the writer; they never reach callers.
    pub fn spawn(path: String) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<WireRecord>();
        tokio::spawn(async move {
            use tokio::fs::OpenOptions;
            use tokio::io::AsyncWriteExt;

            let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    log::warn!("wire log {} unavailable: {}", path, e);
                    return;
                }
            };

            let mut buf: Vec<u8> = Vec::with_capacity(4096);
            while let Some(rec) = rx.recv().await {
                buf.clear();
                let (prefix, line) = match &rec {
                    WireRecord::Outbound(l) => (b">> ", l),
                    WireRecord::Inbound(l) => (b"<< ", l),
                };
                buf.extend_from_slice(prefix);
                buf.extend_from_slice(line.as_bytes());
                buf.push(b'\n');
                if file.write_all(&buf).await.is_err() {
                    break;
                }
            }

            let _ = file.flush().await;
        });
        Self { tx }
    }

    pub fn outbound(&self, line: &str) {
        let _ = self.tx.send(WireRecord::Outbound(line.to_string()));
    }

    pub fn inbound(&self, line: &str) {
        let _ = self.tx.send(WireRecord::Inbound(line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn records_both_directions_in_order() {
        let path = std::env::temp_dir()
            .join(format!("hide-and-seek-wire-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let log = WireLog::spawn(path.to_string_lossy().into_owned());
        log.outbound(r#"{"type":"watch"}"#);
        log.inbound(r#"{"type":"view"}"#);
        drop(log);

        let mut content = String::new();
        for _ in 0..50 {
            content = std::fs::read_to_string(&path).unwrap_or_default();
            if content.lines().count() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(content, ">> {\"type\":\"watch\"}\n<< {\"type\":\"view\"}\n");
        let _ = std::fs::remove_file(&path);
    }
}
