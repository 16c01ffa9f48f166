//! Transport to the game server
//!
//! [`GameHandler`] is the seam between the turn loop and the network. The
//! TCP implementation uses two connections:
//!
//! - a **watch** connection, opened per [`GameHandler::watch`] call, on which
//!   the server pushes `view` lines until the game ends or it hangs up;
//! - a **command** connection for request/reply pairs (`declare_readiness`,
//!   `move`, `chat`). Pairs are serialized by a mutex, so the handler may be
//!   shared between the turn loop and chat senders on other tasks.

use std::time::Duration;

use futures::stream::{BoxStream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::protocol::*;
use crate::types::GameView;
use crate::wire_log::WireLog;

/// Snapshots in arrival order. Ends when the server closes the stream; an
/// `Err` item is always the last one.
pub type ViewStream = BoxStream<'static, Result<GameView, ClientError>>;

/// Requests the client can make of the game server.
#[async_trait::async_trait]
pub trait GameHandler: Send + Sync {
    /// Open the snapshot stream for this agent.
    async fn watch(&self, command: WatchCommand) -> Result<ViewStream, ClientError>;
    async fn declare_readiness(&self, command: DeclareReadinessCommand) -> Result<(), ClientError>;
    async fn move_to(&self, command: MoveCommand) -> Result<(), ClientError>;
    async fn send_message(&self, command: ChatCommand) -> Result<(), ClientError>;
}

type LineReader = Lines<BufReader<OwnedReadHalf>>;

struct CommandConnection {
    lines: LineReader,
    writer: OwnedWriteHalf,
}

/// [`GameHandler`] over line-delimited JSON on TCP.
pub struct TcpGameHandler {
    addr: String,
    command_timeout: Duration,
    commands: Mutex<CommandConnection>,
    wire_log: Option<WireLog>,
}

impl TcpGameHandler {
    /// Connect the command connection. The watch connection is opened
    /// later, by [`GameHandler::watch`].
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let addr = config.addr();
        let stream = TcpStream::connect(&addr).await?;
        stream.set_nodelay(true)?;
        let (read_half, writer) = stream.into_split();
        log::info!("connected to {}", addr);

        let wire_log = config.log_path.clone().map(WireLog::spawn);

        Ok(Self {
            addr,
            command_timeout: config.command_timeout(),
            commands: Mutex::new(CommandConnection {
                lines: BufReader::new(read_half).lines(),
                writer,
            }),
            wire_log,
        })
    }

    async fn request(&self, message: ClientMessage) -> Result<(), ClientError> {
        let seq = message.seq();
        let line = serde_json::to_string(&message)?;

        let mut conn = self.commands.lock().await;
        write_line(&mut conn.writer, &line).await?;
        if let Some(log) = self.wire_log.as_ref() {
            log.outbound(&line);
        }

        let timeout_ms = self.command_timeout.as_millis() as u64;
        match tokio::time::timeout(
            self.command_timeout,
            read_reply(&mut conn.lines, seq, self.wire_log.as_ref()),
        )
        .await
        {
            Ok(reply) => reply,
            Err(_) => Err(ClientError::Timeout { seq, timeout_ms }),
        }
    }
}

#[async_trait::async_trait]
impl GameHandler for TcpGameHandler {
    async fn watch(&self, command: WatchCommand) -> Result<ViewStream, ClientError> {
        let stream = TcpStream::connect(&self.addr).await?;
        stream.set_nodelay(true)?;
        let (read_half, mut writer) = stream.into_split();

        let line = serde_json::to_string(&ClientMessage::Watch(command))?;
        write_line(&mut writer, &line).await?;
        if let Some(log) = self.wire_log.as_ref() {
            log.outbound(&line);
        }

        let lines = BufReader::new(read_half).lines();
        Ok(view_stream(lines, writer, self.wire_log.clone()))
    }

    async fn declare_readiness(&self, command: DeclareReadinessCommand) -> Result<(), ClientError> {
        self.request(ClientMessage::DeclareReadiness(command)).await
    }

    async fn move_to(&self, command: MoveCommand) -> Result<(), ClientError> {
        self.request(ClientMessage::Move(command)).await
    }

    async fn send_message(&self, command: ChatCommand) -> Result<(), ClientError> {
        self.request(ClientMessage::Chat(command)).await
    }
}

async fn write_line(writer: &mut OwnedWriteHalf, line: &str) -> Result<(), ClientError> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Wait for the `ack` / `error` answering `seq`.
///
/// Replies to other sequence numbers belong to requests that already timed
/// out and are skipped. Views are only ever pushed on the watch connection.
async fn read_reply<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    seq: u64,
    wire_log: Option<&WireLog>,
) -> Result<(), ClientError> {
    loop {
        let Some(line) = lines.next_line().await? else {
            return Err(ClientError::Closed);
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(log) = wire_log {
            log.inbound(trimmed);
        }

        match parse_server_message(trimmed)? {
            ParsedMessage::Ack(ack) if ack.seq == seq => return Ok(()),
            ParsedMessage::Error(err) if err.seq == seq => return Err(err.into()),
            ParsedMessage::Ack(ack) => log::debug!("stale ack for request {}", ack.seq),
            ParsedMessage::Error(err) => {
                log::warn!("stale error for request {}: {}", err.seq, err.message)
            }
            ParsedMessage::View(_) => {
                return Err(ClientError::UnexpectedMessage("view".to_string()))
            }
            ParsedMessage::Unknown(m) => log::debug!("ignoring {} message", m.msg_type),
        }
    }
}

/// Turn the watch connection into a stream of snapshots.
///
/// `keep_alive` is held until the stream ends: dropping the write half
/// would half-close the socket, which servers may treat as unsubscribing.
fn view_stream<R, W>(lines: Lines<R>, keep_alive: W, wire_log: Option<WireLog>) -> ViewStream
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: Send + 'static,
{
    futures::stream::unfold(Some((lines, keep_alive)), move |state| {
        let wire_log = wire_log.clone();
        async move {
            let (mut lines, keep_alive) = state?;
            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => return None,
                    Err(e) => return Some((Err(ClientError::Io(e)), None)),
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if let Some(log) = wire_log.as_ref() {
                    log.inbound(trimmed);
                }

                match parse_server_message(trimmed) {
                    Ok(ParsedMessage::View(m)) => return Some((Ok(m.view), Some((lines, keep_alive)))),
                    Ok(ParsedMessage::Ack(_)) => continue,
                    Ok(ParsedMessage::Error(err)) => return Some((Err(err.into()), None)),
                    Ok(ParsedMessage::Unknown(m)) => {
                        log::warn!("ignoring {} message on watch stream", m.msg_type);
                        continue;
                    }
                    Err(e) => return Some((Err(ClientError::Json(e)), None)),
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{create_ack, create_error, create_view, ErrorCode};
    use crate::types::{Agent, AgentType, GameStatus, Turn, TurnType};

    fn view_line(seq: u64, turn: u32) -> String {
        let view = GameView::new(
            GameStatus::Ongoing,
            Turn::new(turn, TurnType::PoliceTurn),
            Agent::new(1, AgentType::Police),
        );
        serde_json::to_string(&ServerMessage::View(create_view(seq, view))).unwrap()
    }

    fn ack_line(seq: u64) -> String {
        serde_json::to_string(&ServerMessage::Ack(create_ack(seq))).unwrap()
    }

    fn error_line(seq: u64) -> String {
        let err = create_error(seq, ErrorCode::NotYourTurn, "wait");
        serde_json::to_string(&ServerMessage::Error(err)).unwrap()
    }

    fn stream_of(lines: Vec<String>) -> ViewStream {
        let mut raw = lines.join("\n");
        raw.push('\n');
        let reader = BufReader::new(std::io::Cursor::new(raw.into_bytes()));
        view_stream(reader.lines(), (), None)
    }

    #[tokio::test]
    async fn reply_skips_stale_seqs() {
        let input = format!("{}\n\n{}\n", ack_line(3), ack_line(4));
        let mock = tokio_test::io::Builder::new().read(input.as_bytes()).build();
        let mut lines = BufReader::new(mock).lines();
        assert!(read_reply(&mut lines, 4, None).await.is_ok());
    }

    #[tokio::test]
    async fn reply_error_is_rejection() {
        let input = format!("{}\n", error_line(7));
        let mock = tokio_test::io::Builder::new().read(input.as_bytes()).build();
        let mut lines = BufReader::new(mock).lines();
        match read_reply(&mut lines, 7, None).await {
            Err(ClientError::Rejected { seq, code, .. }) => {
                assert_eq!(seq, 7);
                assert_eq!(code, ErrorCode::NotYourTurn);
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn reply_eof_is_closed() {
        let mock = tokio_test::io::Builder::new().build();
        let mut lines = BufReader::new(mock).lines();
        assert!(matches!(
            read_reply(&mut lines, 1, None).await,
            Err(ClientError::Closed)
        ));
    }

    #[tokio::test]
    async fn reply_view_on_command_connection_is_unexpected() {
        let input = format!("{}\n", view_line(1, 1));
        let mock = tokio_test::io::Builder::new().read(input.as_bytes()).build();
        let mut lines = BufReader::new(mock).lines();
        assert!(matches!(
            read_reply(&mut lines, 1, None).await,
            Err(ClientError::UnexpectedMessage(_))
        ));
    }

    #[tokio::test]
    async fn stream_yields_views_and_skips_noise() {
        let views: Vec<_> = stream_of(vec![
            view_line(1, 1),
            ack_line(1),
            r#"{"type":"heartbeat","seq":9}"#.to_string(),
            String::new(),
            view_line(2, 2),
        ])
        .collect()
        .await;

        let turns: Vec<u32> = views
            .into_iter()
            .map(|v| v.unwrap().turn_number())
            .collect();
        assert_eq!(turns, vec![1, 2]);
    }

    #[tokio::test]
    async fn stream_keeps_going_past_unrecognised_status() {
        let paused = view_line(2, 2).replace("\"ongoing\"", "\"paused\"");
        let items: Vec<_> = stream_of(vec![view_line(1, 1), paused, view_line(3, 3)])
            .collect()
            .await;

        let statuses: Vec<GameStatus> = items.into_iter().map(|v| v.unwrap().status).collect();
        assert_eq!(
            statuses,
            vec![GameStatus::Ongoing, GameStatus::Unknown, GameStatus::Ongoing]
        );
    }

    #[tokio::test]
    async fn stream_ends_after_error() {
        let items: Vec<_> = stream_of(vec![view_line(1, 1), error_line(1), view_line(2, 2)])
            .collect()
            .await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(ClientError::Rejected { .. })));
    }

    #[tokio::test]
    async fn stream_ends_on_malformed_line() {
        let items: Vec<_> = stream_of(vec!["{not json".to_string(), view_line(1, 1)])
            .collect()
            .await;

        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(ClientError::Json(_))));
    }
}
