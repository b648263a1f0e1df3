//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use crate::domain::entities::IncomingMessage;
use crate::domain::traits::Transport;
use crate::application::errors::BotError;

/// Sender used for lines without a `name:` prefix
pub const DEFAULT_SENDER: &str = "console";

/// Reads `sender: text` lines and prints replies
pub struct ConsoleTransport {
    incoming: Mutex<mpsc::Receiver<IncomingMessage>>,
}

impl ConsoleTransport {
    /// Chat from stdin
    pub fn stdin(channel: impl Into<String>) -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()), channel)
    }

    pub fn from_reader<R>(reader: R, channel: impl Into<String>) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let channel = channel.into();
        let (tx, rx) = mpsc::channel(64);

        tokio::spawn(async move {
            let mut lines = reader.lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        if tx.send(parse_console_line(&line, &channel)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Failed to read console input: {}", e);
                        break;
                    }
                }
            }
            tracing::debug!("Console input closed");
        });

        Self {
            incoming: Mutex::new(rx),
        }
    }
}

/// `viewer: !help` is sent by `viewer`; anything else by [`DEFAULT_SENDER`]
pub fn parse_console_line(line: &str, channel: &str) -> IncomingMessage {
    match line.split_once(':') {
        Some((sender, text)) if is_login(sender) => IncomingMessage::new(sender, text.trim_start(), channel),
        _ => IncomingMessage::new(DEFAULT_SENDER, line, channel),
    }
}

fn is_login(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn join(&self, channel: &str) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode) in #{}", channel);
        println!("Type messages as `name: text` (or just `text`). Ctrl-D to quit.");
        Ok(())
    }

    async fn receive(&self) -> Option<IncomingMessage> {
        self.incoming.lock().await.recv().await
    }

    async fn send(&self, channel: &str, text: &str) -> Result<(), BotError> {
        println!("[#{}] {}", channel, text);
        Ok(())
    }

    fn platform_name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_console_line() {
        let message = parse_console_line("viewer: !help now", "streamer");
        assert_eq!(message.sender, "viewer");
        assert_eq!(message.text, "!help now");
        assert_eq!(message.channel, "streamer");

        let message = parse_console_line("!help", "streamer");
        assert_eq!(message.sender, DEFAULT_SENDER);
        assert_eq!(message.text, "!help");

        let message = parse_console_line("!time 12:30", "streamer");
        assert_eq!(message.sender, DEFAULT_SENDER);
        assert_eq!(message.text, "!time 12:30");
    }

    #[tokio::test]
    async fn test_receive_from_reader() {
        let input: &'static [u8] = b"viewer: !help\n\n!list\n";
        let transport = ConsoleTransport::from_reader(input, "streamer");

        let first = transport.receive().await.unwrap();
        assert_eq!((first.sender.as_str(), first.text.as_str()), ("viewer", "!help"));

        let second = transport.receive().await.unwrap();
        assert_eq!((second.sender.as_str(), second.text.as_str()), (DEFAULT_SENDER, "!list"));

        assert!(transport.receive().await.is_none());
    }
}
