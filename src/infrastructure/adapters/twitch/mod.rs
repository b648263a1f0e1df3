//! Twitch IRC adapter over WebSocket

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::application::errors::BotError;
use crate::domain::entities::IncomingMessage;
use crate::domain::traits::Transport;

/// Twitch chat WebSocket endpoint
const IRC_URL: &str = "wss://irc-ws.chat.twitch.tv:443";

/// How long to wait for the server to accept the login
const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = Arc<Mutex<SplitSink<WsStream, Message>>>;

/// Credentials for the bot account
#[derive(Debug, Clone)]
pub struct TwitchConfig {
    pub username: String,
    pub oauth_token: String,
}

impl TwitchConfig {
    pub fn new(username: impl Into<String>, oauth_token: impl Into<String>) -> Self {
        let token = oauth_token.into();
        Self {
            username: username.into().to_lowercase(),
            oauth_token: if token.starts_with("oauth:") {
                token
            } else {
                format!("oauth:{}", token)
            },
        }
    }
}

/// One parsed IRC line
#[derive(Debug, Clone)]
pub enum IrcLine {
    Ping(String),
    PrivMsg(IncomingMessage),
    Welcome,
    LoginFailed(String),
    Other,
}

/// Parse a single IRC line (without the trailing CRLF)
pub fn parse_line(line: &str) -> IrcLine {
    let line = line.trim_end_matches(['\r', '\n']);

    if line == "PING" {
        return IrcLine::Ping(String::new());
    }
    if let Some(payload) = line.strip_prefix("PING ") {
        return IrcLine::Ping(payload.trim().to_string());
    }

    // Tags are not needed for dispatch
    let untagged = match line.strip_prefix('@') {
        Some(tagged) => match tagged.split_once(' ') {
            Some((_, rest)) => rest,
            None => return IrcLine::Other,
        },
        None => line,
    };

    let Some(rest) = untagged.strip_prefix(':') else {
        return IrcLine::Other;
    };
    let Some((prefix, rest)) = rest.split_once(' ') else {
        return IrcLine::Other;
    };

    if let Some(rest) = rest.strip_prefix("PRIVMSG ") {
        return match parse_privmsg(prefix, rest) {
            Some(message) => IrcLine::PrivMsg(message),
            None => IrcLine::Other,
        };
    }
    if rest.starts_with("001 ") {
        return IrcLine::Welcome;
    }
    if let Some(notice) = rest.strip_prefix("NOTICE * :") {
        if notice.contains("authentication failed") || notice.contains("Improperly formatted auth") {
            return IrcLine::LoginFailed(notice.to_string());
        }
    }
    IrcLine::Other
}

/// `user!user@user.tmi.twitch.tv` + `#channel :text`
fn parse_privmsg(prefix: &str, rest: &str) -> Option<IncomingMessage> {
    let login = prefix.split('!').next().filter(|l| !l.is_empty())?;
    let (channel, text) = rest.split_once(" :")?;
    Some(IncomingMessage::new(login, text, channel.trim().trim_start_matches('#')))
}

/// Outgoing chat line; line breaks would start a new IRC command
pub fn format_privmsg(channel: &str, text: &str) -> String {
    let text: String = text
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    format!("PRIVMSG #{} :{}\r\n", channel.trim_start_matches('#'), text)
}

/// Twitch IRC connection
pub struct TwitchTransport {
    writer: WsWriter,
    incoming: Mutex<mpsc::Receiver<IncomingMessage>>,
}

impl TwitchTransport {
    /// Connect, authenticate and start the reader task
    pub async fn connect(config: &TwitchConfig) -> Result<Self, BotError> {
        tracing::info!("Connecting to Twitch IRC...");

        let url = Url::parse(IRC_URL)
            .map_err(|e| BotError::Connection(format!("Invalid Twitch URL: {}", e)))?;
        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| BotError::Connection(format!("Failed to connect to Twitch: {}", e)))?;
        let (write, mut read) = ws_stream.split();
        let writer = Arc::new(Mutex::new(write));

        for line in [
            format!("PASS {}\r\n", config.oauth_token),
            format!("NICK {}\r\n", config.username),
            "CAP REQ :twitch.tv/tags twitch.tv/commands\r\n".to_string(),
        ] {
            send_raw(&writer, line)
                .await
                .map_err(|e| BotError::Connection(format!("Login failed: {}", e)))?;
        }

        tokio::time::timeout(LOGIN_TIMEOUT, wait_for_welcome(&mut read, &writer))
            .await
            .map_err(|_| BotError::Connection("Timed out waiting for Twitch login".to_string()))??;
        tracing::info!(username = %config.username, "Logged in to Twitch IRC");

        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(read_loop(read, Arc::clone(&writer), tx));

        Ok(Self {
            writer,
            incoming: Mutex::new(rx),
        })
    }
}

async fn send_raw(writer: &WsWriter, line: String) -> Result<(), BotError> {
    writer
        .lock()
        .await
        .send(Message::Text(line))
        .await
        .map_err(|e| BotError::Send(e.to_string()))
}

async fn wait_for_welcome(read: &mut SplitStream<WsStream>, writer: &WsWriter) -> Result<(), BotError> {
    while let Some(frame) = read.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(frame)) => {
                return Err(BotError::Connection(format!("Closed during login: {:?}", frame)));
            }
            Ok(_) => continue,
            Err(e) => return Err(BotError::Connection(e.to_string())),
        };
        for line in text.lines() {
            match parse_line(line) {
                IrcLine::Welcome => return Ok(()),
                IrcLine::LoginFailed(notice) => return Err(BotError::Connection(notice)),
                IrcLine::Ping(payload) => {
                    send_raw(writer, format!("PONG {}\r\n", payload)).await?;
                }
                _ => {}
            }
        }
    }
    Err(BotError::Connection("Connection closed during login".to_string()))
}

async fn read_loop(mut read: SplitStream<WsStream>, writer: WsWriter, tx: mpsc::Sender<IncomingMessage>) {
    tracing::debug!("Twitch message reader started");

    while let Some(frame) = read.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                for line in text.lines() {
                    match parse_line(line) {
                        IrcLine::Ping(payload) => {
                            tracing::debug!("Responding to PING");
                            if let Err(e) = send_raw(&writer, format!("PONG {}\r\n", payload)).await {
                                tracing::error!("Failed to send PONG: {}", e);
                            }
                        }
                        IrcLine::PrivMsg(message) => {
                            tracing::debug!(sender = %message.sender, text = %message.text, "Received");
                            if tx.send(message).await.is_err() {
                                tracing::debug!("Receiver dropped, stopping reader");
                                return;
                            }
                        }
                        _ => {}
                    }
                }
            }
            Ok(Message::Ping(payload)) => {
                if let Err(e) = writer.lock().await.send(Message::Pong(payload)).await {
                    tracing::error!("Failed to send pong: {}", e);
                }
            }
            Ok(Message::Close(frame)) => {
                tracing::info!("WebSocket connection closed: {:?}", frame);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
        }
    }

    tracing::warn!("Twitch connection handler exited");
}

#[async_trait]
impl Transport for TwitchTransport {
    async fn join(&self, channel: &str) -> Result<(), BotError> {
        let channel = channel.trim_start_matches('#').to_lowercase();
        send_raw(&self.writer, format!("JOIN #{}\r\n", channel))
            .await
            .map_err(|e| BotError::Connection(format!("Failed to join #{}: {}", channel, e)))?;
        tracing::info!("Joined channel: #{}", channel);
        Ok(())
    }

    async fn receive(&self) -> Option<IncomingMessage> {
        self.incoming.lock().await.recv().await
    }

    async fn send(&self, channel: &str, text: &str) -> Result<(), BotError> {
        send_raw(&self.writer, format_privmsg(channel, text)).await?;
        tracing::debug!("Sent message to #{}: {}", channel, text);
        Ok(())
    }

    fn platform_name(&self) -> &str {
        "twitch"
    }
}
