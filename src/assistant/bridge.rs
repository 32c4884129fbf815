//! Line-delimited JSON transport to the assistant process

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::protocol::{AssistantCommand, AssistantEvent};

/// Commands the session may issue to the assistant
pub trait AssistantHandle: Send + Sync {
    fn start_conversation(&self);
    fn stop_conversation(&self);
}

/// Read events from `reader` and forward them until EOF.
///
/// Malformed lines are logged and skipped. Dropping the sender at EOF tells
/// the session the assistant is gone.
pub fn spawn_event_reader<R>(reader: R, event_tx: mpsc::Sender<AssistantEvent>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("assistant event stream closed");
                    break;
                }
                Err(e) => {
                    warn!(?e, "failed to read assistant event");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<AssistantEvent>(&line) {
                Ok(event) => {
                    debug!(?event, "assistant event");
                    if event_tx.send(event).await.is_err() {
                        debug!("session gone, stopping event reader");
                        break;
                    }
                }
                Err(e) => warn!(%line, error = %e, "ignoring malformed assistant event"),
            }
        }
    })
}

/// Writes commands to the assistant from a background task
#[derive(Debug, Clone)]
pub struct CommandWriter {
    command_tx: mpsc::UnboundedSender<AssistantCommand>,
}

impl CommandWriter {
    /// Start the writer task on `writer`
    pub fn spawn<W>(writer: W) -> (Self, JoinHandle<()>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<AssistantCommand>();

        let handle = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(command) = command_rx.recv().await {
                let mut line = match serde_json::to_vec(&command) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(?command, error = %e, "failed to encode command");
                        continue;
                    }
                };
                line.push(b'\n');

                let written = async {
                    writer.write_all(&line).await?;
                    writer.flush().await
                };
                if let Err(e) = written.await {
                    warn!(?e, "assistant command channel closed");
                    break;
                }
                debug!(?command, "sent assistant command");
            }
        });

        (Self { command_tx }, handle)
    }

    fn send(&self, command: AssistantCommand) {
        if self.command_tx.send(command).is_err() {
            warn!(?command, "assistant writer stopped, command dropped");
        }
    }
}

impl AssistantHandle for CommandWriter {
    fn start_conversation(&self) {
        self.send(AssistantCommand::StartConversation);
    }

    fn stop_conversation(&self) {
        self.send(AssistantCommand::StopConversation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_reader_skips_malformed_lines() {
        let input: &[u8] = b"{\"type\":\"ready\"}\nnot json\n\n{\"type\":\"turn_started\"}\n";
        let (tx, mut rx) = mpsc::channel(8);

        spawn_event_reader(input, tx).await.unwrap();

        assert_eq!(rx.recv().await, Some(AssistantEvent::Ready));
        assert_eq!(rx.recv().await, Some(AssistantEvent::TurnStarted));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_writer_emits_json_lines() {
        let (client, mut server) = tokio::io::duplex(256);
        let (writer, handle) = CommandWriter::spawn(client);

        writer.start_conversation();
        writer.stop_conversation();
        drop(writer);
        handle.await.unwrap();

        let mut out = String::new();
        server.read_to_string(&mut out).await.unwrap();
        assert_eq!(
            out,
            "{\"type\":\"start_conversation\"}\n{\"type\":\"stop_conversation\"}\n"
        );
    }
}
