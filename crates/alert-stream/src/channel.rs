//! WebSocket stream of channel events.

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures::stream::{Stream, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use crate::error::{DecodeError, StreamError};
use crate::types::{decode_alert, Alert};
use crate::AlertClient;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Something that happened on the push channel.
#[derive(Debug)]
pub enum ChannelEvent {
    /// The connection was established.
    Opened,
    /// A well-formed alert arrived.
    Alert(Alert),
    /// A message arrived but could not be decoded. The stream continues.
    Rejected(DecodeError),
    /// The server ended the stream. Last item.
    Closed,
    /// The transport failed. Last item.
    Errored(StreamError),
}

impl ChannelEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Errored(_))
    }
}

/// A stream of events from the alert push channel.
///
/// Yields [`ChannelEvent::Opened`] first, then one event per frame until the
/// connection closes or fails, then ends.
pub struct AlertStream {
    socket: Socket,
    opened: bool,
    finished: bool,
}

impl AlertStream {
    /// Open the WebSocket connection described by the client's configuration.
    ///
    /// Fails with [`StreamError::Connection`] if the handshake is refused,
    /// for example when the server has no such route.
    pub async fn connect(client: &AlertClient) -> Result<Self, StreamError> {
        let url = client.config().events_url();
        info!("Opening WebSocket connection to {}", url);

        let (socket, response) = connect_async(url.as_str())
            .await
            .map_err(|e| StreamError::Connection(format!("{url}: {e}")))?;
        debug!(status = %response.status(), "WebSocket handshake complete");

        Ok(Self {
            socket,
            opened: false,
            finished: false,
        })
    }

    fn finish(&mut self, event: ChannelEvent) -> Poll<Option<ChannelEvent>> {
        self.finished = true;
        Poll::Ready(Some(event))
    }
}

fn decode_frame(text: &str) -> ChannelEvent {
    match decode_alert(text) {
        Ok(alert) => ChannelEvent::Alert(alert),
        Err(e) => {
            warn!("Failed to decode alert: {}", e);
            debug!("Raw data: {}", text);
            ChannelEvent::Rejected(e)
        }
    }
}

impl Stream for AlertStream {
    type Item = ChannelEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.finished {
            return Poll::Ready(None);
        }
        if !this.opened {
            this.opened = true;
            return Poll::Ready(Some(ChannelEvent::Opened));
        }

        loop {
            match ready!(this.socket.poll_next_unpin(cx)) {
                Some(Ok(Message::Text(text))) => {
                    return Poll::Ready(Some(decode_frame(&text)));
                }
                Some(Ok(Message::Binary(bytes))) => {
                    let event = match std::str::from_utf8(&bytes) {
                        Ok(text) => decode_frame(text),
                        Err(e) => {
                            warn!("Dropping binary frame that is not UTF-8: {}", e);
                            ChannelEvent::Rejected(DecodeError::Malformed(e.to_string()))
                        }
                    };
                    return Poll::Ready(Some(event));
                }
                Some(Ok(Message::Close(frame))) => {
                    info!(?frame, "WebSocket closed by server");
                    return this.finish(ChannelEvent::Closed);
                }
                // Ping, pong and raw frames carry no alerts
                Some(Ok(_)) => continue,
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    info!("WebSocket stream ended");
                    return this.finish(ChannelEvent::Closed);
                }
                Some(Err(e)) => {
                    error!("WebSocket error: {}", e);
                    return this.finish(ChannelEvent::Errored(StreamError::WebSocket(
                        e.to_string(),
                    )));
                }
            }
        }
    }
}

/// Open the alert stream for a client.
pub async fn subscribe(client: &AlertClient) -> Result<AlertStream, StreamError> {
    AlertStream::connect(client).await
}
