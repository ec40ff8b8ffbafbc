//! Per-connection SSH handler.
//!
//! One `ConnectionHandler` exists per TCP connection. Each session channel
//! gets a [`ChannelSlot`] that collects the PTY request and, once the shell
//! starts, holds the senders feeding that channel's session task.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Local;
use log::{debug, info, warn};
use russh::server::{Auth, Handler, Msg, Session};
use russh::{Channel, ChannelId, Pty};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::core::state::Viewport;
use crate::server::SessionShared;
use crate::server::writer::{ChannelWriter, spawn_pump};
use crate::tui::{PtyInfo, SessionContext, SessionEnd, SessionIo, run_session};

#[derive(Default)]
struct ChannelSlot {
    pty: Option<PtyInfo>,
    input: Option<mpsc::UnboundedSender<Vec<u8>>>,
    resizes: Option<mpsc::UnboundedSender<Viewport>>,
    cancel: CancellationToken,
}

pub struct ConnectionHandler {
    shared: Arc<SessionShared>,
    session_id: String,
    peer: Option<SocketAddr>,
    user: Option<String>,
    connected_at: Instant,
    no_pty: bool,
    channels: HashMap<ChannelId, ChannelSlot>,
}

impl ConnectionHandler {
    pub fn new(shared: Arc<SessionShared>, peer: Option<SocketAddr>) -> Self {
        Self {
            shared,
            session_id: Uuid::new_v4().to_string(),
            peer,
            user: None,
            connected_at: Instant::now(),
            no_pty: false,
            channels: HashMap::new(),
        }
    }

    fn peer_ip(&self) -> String {
        self.peer
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn accept(&mut self, user: &str) -> Auth {
        if self.user.is_none() {
            info!(
                "Connection opened | Session: {} | User: {} | IP: {} | Time: {}",
                self.session_id,
                user,
                self.peer_ip(),
                Local::now().to_rfc3339()
            );
        }
        self.user = Some(user.to_string());
        Auth::Accept
    }

    fn close_channel(&mut self, channel: ChannelId) {
        if let Some(slot) = self.channels.remove(&channel) {
            slot.cancel.cancel();
        }
    }
}

impl Drop for ConnectionHandler {
    fn drop(&mut self) {
        for slot in self.channels.values() {
            slot.cancel.cancel();
        }
        let Some(user) = &self.user else {
            return;
        };
        info!(
            "Connection closed{} | Session: {} | User: {} | IP: {} | Duration: {:.1}s",
            if self.no_pty { " (no PTY)" } else { "" },
            self.session_id,
            user,
            self.peer_ip(),
            self.connected_at.elapsed().as_secs_f64()
        );
    }
}

#[async_trait]
impl Handler for ConnectionHandler {
    type Error = russh::Error;

    async fn auth_none(&mut self, user: &str) -> Result<Auth, Self::Error> {
        Ok(self.accept(user))
    }

    async fn auth_publickey(
        &mut self,
        user: &str,
        _public_key: &russh_keys::key::PublicKey,
    ) -> Result<Auth, Self::Error> {
        Ok(self.accept(user))
    }

    async fn channel_open_session(
        &mut self,
        channel: Channel<Msg>,
        _session: &mut Session,
    ) -> Result<bool, Self::Error> {
        debug!("Session {}: channel {:?} opened", self.session_id, channel.id());
        self.channels.insert(channel.id(), ChannelSlot::default());
        Ok(true)
    }

    async fn pty_request(
        &mut self,
        channel: ChannelId,
        term: &str,
        col_width: u32,
        row_height: u32,
        _pix_width: u32,
        _pix_height: u32,
        _modes: &[(Pty, u32)],
        session: &mut Session,
    ) -> Result<(), Self::Error> {
        let size = Viewport::from_cells(col_width, row_height);
        info!(
            "Terminal info | Session: {} | Term: {} | Size: {}x{}",
            self.session_id, term, size.width, size.height
        );
        if let Some(slot) = self.channels.get_mut(&channel) {
            slot.pty = Some(PtyInfo {
                term: term.to_string(),
                size,
            });
        }
        session.channel_success(channel);
        Ok(())
    }

    async fn shell_request(
        &mut self,
        channel: ChannelId,
        session: &mut Session,
    ) -> Result<(), Self::Error> {
        let Some(slot) = self.channels.get_mut(&channel) else {
            session.channel_failure(channel);
            return Ok(());
        };
        if slot.input.is_some() {
            // Already running a shell on this channel.
            session.channel_failure(channel);
            return Ok(());
        }

        let (input_tx, input) = mpsc::unbounded_channel();
        let (resize_tx, resizes) = mpsc::unbounded_channel();
        let (frames_tx, frames) = mpsc::unbounded_channel();
        slot.input = Some(input_tx);
        slot.resizes = Some(resize_tx);
        if slot.pty.is_none() {
            self.no_pty = true;
        }

        let io = SessionIo {
            output: ChannelWriter::new(frames_tx),
            input,
            pty: slot.pty.clone(),
            resizes,
            cancel: slot.cancel.clone(),
        };
        let ctx = SessionContext {
            id: self.session_id.clone(),
            content: Arc::clone(&self.shared.content),
            opener: Arc::clone(&self.shared.opener),
            options: self.shared.options.clone(),
        };

        let handle = session.handle();
        let pump = spawn_pump(handle.clone(), channel, frames);
        let session_id = self.session_id.clone();
        session.channel_success(channel);

        tokio::spawn(async move {
            let result = run_session(io, ctx).await;
            // The session dropped its writer; wait for the last frames.
            if let Err(e) = pump.await {
                warn!("Session {}: output pump failed: {}", session_id, e);
            }

            let status = match result {
                Ok(SessionEnd::NoTerminal) => 0,
                Ok(end) => {
                    debug!("Session {}: ended ({:?})", session_id, end);
                    0
                }
                Err(e) => {
                    warn!("Session error | Session: {} | Error: {}", session_id, e);
                    1
                }
            };
            if handle.exit_status_request(channel, status).await.is_err()
                || handle.eof(channel).await.is_err()
                || handle.close(channel).await.is_err()
            {
                debug!("Session {}: channel already closed", session_id);
            }
        });
        Ok(())
    }

    async fn data(
        &mut self,
        channel: ChannelId,
        data: &[u8],
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        if let Some(input) = self.channels.get(&channel).and_then(|s| s.input.as_ref()) {
            if input.send(data.to_vec()).is_err() {
                debug!("Session {}: input after session ended", self.session_id);
            }
        }
        Ok(())
    }

    async fn window_change_request(
        &mut self,
        channel: ChannelId,
        col_width: u32,
        row_height: u32,
        _pix_width: u32,
        _pix_height: u32,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        let size = Viewport::from_cells(col_width, row_height);
        info!(
            "Terminal resize | Session: {} | New size: {}x{}",
            self.session_id, size.width, size.height
        );
        let Some(slot) = self.channels.get_mut(&channel) else {
            return Ok(());
        };
        if let Some(pty) = slot.pty.as_mut() {
            pty.size = size;
        }
        if let Some(resizes) = &slot.resizes {
            if resizes.send(size).is_err() {
                debug!("Session {}: resize after session ended", self.session_id);
            }
        }
        Ok(())
    }

    async fn channel_eof(
        &mut self,
        channel: ChannelId,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        self.close_channel(channel);
        Ok(())
    }

    async fn channel_close(
        &mut self,
        channel: ChannelId,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        self.close_channel(channel);
        Ok(())
    }
}
