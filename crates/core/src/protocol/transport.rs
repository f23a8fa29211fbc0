use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::net::UdpSocket;
use tokio::time::{Duration, Instant};

use super::envelope::wrap_envelope;
use super::packet::{build_color_packet, build_enable_packet};
use crate::color::Rgb;
use crate::error::StripError;

/// The device drops out of external control unless Enable is repeated
/// within this window.
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Sink for the frames produced by the animation loop.
///
/// Implementations must not report delivery failures: a lost datagram is
/// superseded by the next tick. An `Err` means the frame could not even be
/// built.
#[async_trait]
pub trait LightOutput: Send + Sync {
    /// Send an Enable command.
    async fn send_enable(&self, enable: bool) -> Result<(), StripError>;

    /// Send one LED-data frame, refreshing the keep-alive first if due.
    async fn send_colors(&self, colors: &[Rgb], gradient_mode: bool) -> Result<(), StripError>;
}

/// Fire-and-forget UDP transport for one strip.
pub struct UdpTransport {
    socket: UdpSocket,
    host: String,
    port: u16,
    last_enable: Mutex<Option<Instant>>,
}

impl UdpTransport {
    /// Bind an ephemeral local socket for talking to `host:port`.
    pub async fn bind(host: &str, port: u16) -> Result<Self, StripError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        log::debug!(
            "Bound UDP socket {} for strip {}:{}",
            socket.local_addr()?,
            host,
            port
        );

        Ok(Self {
            socket,
            host: host.to_string(),
            port,
            last_enable: Mutex::new(None),
        })
    }

    pub fn destination(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// When the last Enable went out, if any did.
    pub fn last_enable(&self) -> Option<Instant> {
        *self.last_enable.lock()
    }

    fn keep_alive_due(&self, now: Instant) -> bool {
        match *self.last_enable.lock() {
            Some(sent) => now.duration_since(sent) > KEEP_ALIVE_INTERVAL,
            None => true,
        }
    }

    // Errors are logged and swallowed; returns whether the datagram left.
    async fn send_frame(&self, frame: &[u8]) -> bool {
        let message = wrap_envelope(frame);
        match self
            .socket
            .send_to(&message, (self.host.as_str(), self.port))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                log::error!("Failed to send to {}: {}", self.destination(), e);
                false
            }
        }
    }
}

#[async_trait]
impl LightOutput for UdpTransport {
    async fn send_enable(&self, enable: bool) -> Result<(), StripError> {
        if self.send_frame(&build_enable_packet(enable)).await {
            *self.last_enable.lock() = Some(Instant::now());
            log::debug!("Sent enable({}) to {}", enable, self.destination());
        }
        Ok(())
    }

    async fn send_colors(&self, colors: &[Rgb], gradient_mode: bool) -> Result<(), StripError> {
        let packet = build_color_packet(colors, gradient_mode)?;

        if self.keep_alive_due(Instant::now()) {
            self.send_enable(true).await?;
        }

        if self.send_frame(&packet).await {
            log::debug!(
                "Sent {} colors to {} (gradient={})",
                colors.len(),
                self.destination(),
                gradient_mode
            );
        }
        Ok(())
    }
}
