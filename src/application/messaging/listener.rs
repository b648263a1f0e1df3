//! Message loop - One task per incoming message, drained on exit

use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;
use crate::domain::traits::Transport;
use super::dispatcher::MessageDispatcher;

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The transport has no more messages
    InputClosed,
    /// The shutdown future completed
    Shutdown,
}

/// Receive messages until the transport closes or `shutdown` resolves.
/// Dispatches still in flight are awaited before returning.
pub async fn run_message_loop<F>(
    dispatcher: Arc<MessageDispatcher>,
    transport: Arc<dyn Transport>,
    shutdown: F,
) -> LoopExit
where
    F: Future<Output = ()>,
{
    let mut tasks = JoinSet::new();
    tokio::pin!(shutdown);

    let exit = loop {
        tokio::select! {
            message = transport.receive() => {
                let Some(message) = message else {
                    break LoopExit::InputClosed;
                };

                let dispatcher = Arc::clone(&dispatcher);
                let transport = Arc::clone(&transport);
                tasks.spawn(async move {
                    if let Err(e) = dispatcher.handle(&message, transport.as_ref()).await {
                        tracing::error!(id = %message.id, sender = %message.sender, "Failed to send reply: {}", e);
                    }
                });
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    tracing::error!("Dispatch task failed: {}", e);
                }
            }
            _ = &mut shutdown => {
                break LoopExit::Shutdown;
            }
        }
    };

    if !tasks.is_empty() {
        tracing::debug!(pending = tasks.len(), "Waiting for in-flight dispatches");
    }
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Dispatch task failed: {}", e);
        }
    }

    exit
}
