//! WebSocket server for the real-time telemetry feed
//!
//! One task per connection. Each task owns a hub subscription for its whole
//! lifetime and relays the hub's pre-serialized messages as text frames until
//! the client leaves, a send fails, or the hub drops the channel.

use std::net::SocketAddr;
use std::sync::Arc;

use ecolingua_stream::{BroadcastHub, FeedMessage, HubError, ServerInfo, SubscriberId};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::error::FeedError;

/// Close reason sent when the hub is full
pub const CONNECTION_LIMIT_REASON: &str = "Connection limit reached";

/// Unregisters its subscriber when the connection task ends, however it ends.
struct Registration<'a> {
    hub: &'a BroadcastHub,
    id: SubscriberId,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.hub.unregister(self.id);
    }
}

/// WebSocket feed server
#[derive(Debug)]
pub struct WsServer {
    hub: Arc<BroadcastHub>,
    server_info: ServerInfo,
}

impl WsServer {
    /// Create a server relaying messages from `hub`
    pub fn new(hub: Arc<BroadcastHub>, server_info: ServerInfo) -> Self {
        Self { hub, server_info }
    }

    /// Bind `addr` and serve until the hub shuts down
    pub async fn run(self: Arc<Self>, addr: SocketAddr) -> Result<(), FeedError> {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already-bound listener until the hub shuts down
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> Result<(), FeedError> {
        let local_addr = listener.local_addr()?;
        info!(addr = %local_addr, "WebSocket feed listening");

        let mut shutdown = self.hub.shutdown_signal();
        if *shutdown.borrow() {
            return Ok(());
        }

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        debug!(peer = %peer_addr, "New WebSocket connection");
                        let server = Arc::clone(&self);
                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream, peer_addr).await {
                                warn!(peer = %peer_addr, error = %e, "WebSocket connection error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(addr = %local_addr, "WebSocket feed stopped");
        Ok(())
    }

    async fn handle_connection(
        &self,
        stream: TcpStream,
        peer_addr: SocketAddr,
    ) -> Result<(), FeedError> {
        let ws_stream = accept_async(stream).await?;
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        let mut subscription = match self.hub.register() {
            Ok(subscription) => subscription,
            Err(e) => {
                let frame = match e {
                    HubError::Capacity { .. } => CloseFrame {
                        code: CloseCode::Policy,
                        reason: CONNECTION_LIMIT_REASON.into(),
                    },
                    _ => CloseFrame {
                        code: CloseCode::Away,
                        reason: "Server shutting down".into(),
                    },
                };
                info!(peer = %peer_addr, error = %e, "Refusing WebSocket connection");
                ws_sender.send(Message::Close(Some(frame))).await?;
                return Ok(());
            }
        };
        let registration = Registration {
            hub: &self.hub,
            id: subscription.id,
        };

        let welcome = FeedMessage::welcome(registration.id, self.server_info.clone());
        ws_sender
            .send(Message::Text(serde_json::to_string(&welcome)?))
            .await?;
        info!(peer = %peer_addr, client_id = %registration.id, "Feed client connected");

        loop {
            tokio::select! {
                incoming = ws_receiver.next() => match incoming {
                    Some(Ok(Message::Close(_))) | None => {
                        info!(client_id = %registration.id, "Feed client disconnected");
                        break;
                    }
                    Some(Ok(Message::Text(text))) => {
                        debug!(client_id = %registration.id, len = text.len(), "Ignoring client message");
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(client_id = %registration.id, error = %e, "Error receiving from feed client");
                        break;
                    }
                },
                outgoing = subscription.receiver.recv() => match outgoing {
                    Some(payload) => {
                        if let Err(e) = ws_sender.send(Message::Text(payload.to_string())).await {
                            warn!(client_id = %registration.id, error = %e, "Error sending to feed client");
                            break;
                        }
                    }
                    None => {
                        // Hub pruned or released this subscriber
                        let frame = CloseFrame {
                            code: CloseCode::Away,
                            reason: "Feed closed".into(),
                        };
                        let _ = ws_sender.send(Message::Close(Some(frame))).await;
                        break;
                    }
                },
            }
        }

        drop(registration);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registration_guard_unregisters() {
        let hub = BroadcastHub::new();
        let sub = hub.register().unwrap();
        {
            let _guard = Registration {
                hub: &hub,
                id: sub.id,
            };
            assert_eq!(hub.subscriber_count(), 1);
        }
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_serve_returns_after_shutdown() {
        let hub = Arc::new(BroadcastHub::new());
        hub.shutdown();

        let server = Arc::new(WsServer::new(Arc::clone(&hub), ServerInfo::new("test", 30)));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        assert!(server.serve(listener).await.is_ok());
    }
}
