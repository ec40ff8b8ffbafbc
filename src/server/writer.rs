//! Bridges the session's synchronous `Write` to the async SSH channel.
//!
//! ratatui writes a frame as many small writes followed by one flush. The
//! writer collects them and hands the whole frame to a pump task on flush;
//! the pump forwards frames to the channel in order.

use std::io::{self, Write};

use log::debug;
use russh::server::Handle;
use russh::{ChannelId, CryptoVec};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct ChannelWriter {
    buffer: Vec<u8>,
    frames: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChannelWriter {
    pub fn new(frames: mpsc::UnboundedSender<Vec<u8>>) -> Self {
        Self {
            buffer: Vec::new(),
            frames,
        }
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let frame = std::mem::take(&mut self.buffer);
        self.frames
            .send(frame)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "channel output closed"))
    }
}

/// Forwards flushed frames to `channel` until every writer is dropped or
/// the channel stops accepting data. Await the handle to drain it.
pub fn spawn_pump(
    handle: Handle,
    channel: ChannelId,
    mut frames: mpsc::UnboundedReceiver<Vec<u8>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if handle.data(channel, CryptoVec::from(frame)).await.is_err() {
                debug!("Channel {:?} closed while sending output", channel);
                break;
            }
        }
    })
}
