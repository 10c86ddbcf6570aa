//! Network infrastructure: tokio implementations of `TcpDialer` and `Sleeper`.

use std::io;
use std::time::Duration;

use tokio::net::TcpStream;

use crate::application::ports::{BannerStream, Sleeper, TcpDialer};

/// Production dialer using `tokio::net::TcpStream`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDialer;

impl TcpDialer for TokioDialer {
    type Stream = TokioBannerStream;

    async fn dial(&self, host: &str, port: u16, timeout: Duration) -> io::Result<TokioBannerStream> {
        match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
            Ok(stream) => Ok(TokioBannerStream { stream: stream? }),
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connect to {host}:{port} timed out"),
            )),
        }
    }
}

/// Connected socket; closed when dropped.
#[derive(Debug)]
pub struct TokioBannerStream {
    stream: TcpStream,
}

/// Longest banner kept; RFC 4253 caps the identification line at 255 bytes.
const BANNER_MAX: usize = 256;

impl BannerStream for TokioBannerStream {
    async fn read_banner(&mut self, timeout: Duration) -> io::Result<Option<String>> {
        let stream = &self.stream;
        let read = async {
            let mut buf = [0u8; BANNER_MAX];
            loop {
                stream.readable().await?;
                match stream.try_read(&mut buf) {
                    Ok(n) => return Ok(banner_text(&buf[..n])),
                    // Readiness can be spurious.
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                    Err(e) => return Err(e),
                }
            }
        };
        match tokio::time::timeout(timeout, read).await {
            Ok(banner) => banner.map(Some),
            Err(_) => Ok(None),
        }
    }
}

/// First line of whatever arrived; the line need not be complete. Empty
/// when the peer closed without sending anything.
fn banner_text(bytes: &[u8]) -> String {
    let line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    String::from_utf8_lossy(line).trim_end().to_string()
}

/// Production sleeper using `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
