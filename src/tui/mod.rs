//! # TUI Adapter
//!
//! The ratatui-specific layer. Runs one profile session over a remote
//! terminal: decodes channel bytes into keys, feeds them through
//! `core::update`, and draws a frame after every applied action.
//!
//! ## Event Loop
//!
//! Each session is a single task. Exactly one action is applied at a time,
//! whatever its source:
//!
//! ```text
//!   channel bytes ──decode──┐
//!   welcome timer ──────────┤
//!   resize forwarder ───────┼──▶ update(state, content, action) ──▶ draw
//!   URL open completion ────┘              │
//!                                          └──▶ Effect (quit / open URL)
//! ```
//!
//! The resize forwarder is the only other long-lived task. It runs under a
//! child of the session's cancellation token and is awaited before the
//! session returns, so it never outlives the loop. URL opens are spawned
//! fire-and-forget; any still running at teardown are aborted.

mod component;
mod components;
pub mod event;
pub mod styles;
pub mod terminal;
mod ui;

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use crate::browser::UrlOpener;
use crate::core::action::{Action, Effect, update};
use crate::core::config::DEFAULT_WELCOME_DELAY_MS;
use crate::core::content::Content;
use crate::core::state::{Mode, NavigationState, Viewport};
use crate::tui::event::{InputDecoder, key_for};
use crate::tui::styles::{Palette, ThemeError};
use crate::tui::terminal::SessionTerminal;

/// Written to clients that connect without requesting a terminal.
pub const NO_PTY_MESSAGE: &str = "No active terminal, please run with ssh -t\n";

/// Terminal details negotiated by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtyInfo {
    pub term: String,
    pub size: Viewport,
}

/// Everything a session reads from and writes to.
pub struct SessionIo<W> {
    pub output: W,
    /// Raw key bytes from the client. Closing it ends the session.
    pub input: mpsc::UnboundedReceiver<Vec<u8>>,
    /// `None` when the client did not request a pseudo-terminal.
    pub pty: Option<PtyInfo>,
    pub resizes: mpsc::UnboundedReceiver<Viewport>,
    pub cancel: CancellationToken,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub welcome_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            welcome_delay: Duration::from_millis(DEFAULT_WELCOME_DELAY_MS),
        }
    }
}

/// Shared, read-only inputs of a session.
#[derive(Clone)]
pub struct SessionContext {
    /// Used in log lines only.
    pub id: String,
    pub content: Arc<Content>,
    pub opener: Arc<dyn UrlOpener>,
    pub options: SessionOptions,
}

/// How a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// No pseudo-terminal: the diagnostic was written and nothing else ran.
    NoTerminal,
    Quit,
    /// Input closed or the session was cancelled by the transport.
    Disconnected,
}

#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    Theme(ThemeError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "terminal I/O failed: {e}"),
            SessionError::Theme(e) => write!(f, "invalid theme: {e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Io(e) => Some(e),
            SessionError::Theme(e) => Some(e),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(e)
    }
}

impl From<ThemeError> for SessionError {
    fn from(e: ThemeError) -> Self {
        SessionError::Theme(e)
    }
}

/// Runs one session to completion.
///
/// On every exit path after the terminal was entered, the resize forwarder
/// has stopped, pending opens are aborted, and the client's cursor is
/// visible again. A failure mid-session is also reported to the client.
pub async fn run_session<W>(io: SessionIo<W>, ctx: SessionContext) -> Result<SessionEnd, SessionError>
where
    W: Write + Send,
{
    let SessionIo {
        mut output,
        mut input,
        pty,
        resizes,
        cancel,
    } = io;

    let Some(pty) = pty else {
        info!("Session {}: no pseudo-terminal requested", ctx.id);
        output.write_all(NO_PTY_MESSAGE.as_bytes())?;
        output.flush()?;
        return Ok(SessionEnd::NoTerminal);
    };

    let palette = Palette::from_theme(&ctx.content.theme)?;
    let terminal = SessionTerminal::enter(output, pty.size)?;
    debug!(
        "Session {}: terminal {} at {}x{}",
        ctx.id, pty.term, pty.size.width, pty.size.height
    );

    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    let forwarder_cancel = cancel.child_token();
    let forwarder = tokio::spawn(forward_resizes(
        resizes,
        action_tx.clone(),
        forwarder_cancel.clone(),
    ));

    let mut session = Session::new(&ctx, palette, terminal, pty.size, action_tx);
    let result = session
        .event_loop(&mut input, &mut action_rx, &cancel, ctx.options.welcome_delay)
        .await;

    forwarder_cancel.cancel();
    if let Err(e) = forwarder.await {
        warn!("Session {}: resize forwarder failed: {}", ctx.id, e);
    }
    session.abort_pending_opens();

    match result {
        Ok(end) => {
            session.terminal.restore()?;
            Ok(end)
        }
        Err(e) => {
            warn!("Session {}: {}", ctx.id, e);
            if let Err(report) = session.terminal.report_error(&e.to_string()) {
                debug!("Session {}: could not report error: {}", ctx.id, report);
            }
            Err(e)
        }
    }
}

/// Forwards transport resize notifications into the session's action queue
/// until cancelled or either side closes.
async fn forward_resizes(
    mut resizes: mpsc::UnboundedReceiver<Viewport>,
    actions: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            size = resizes.recv() => match size {
                Some(size) => {
                    if actions.send(Action::Resize(size)).is_err() {
                        break;
                    }
                }
                None => break,
            },
        }
    }
}

/// Mutable per-session state owned by the event loop.
struct Session<'a, W: Write> {
    ctx: &'a SessionContext,
    palette: Palette,
    state: NavigationState,
    terminal: SessionTerminal<W>,
    actions: mpsc::UnboundedSender<Action>,
    pending_opens: Vec<AbortHandle>,
}

impl<'a, W: Write> Session<'a, W> {
    fn new(
        ctx: &'a SessionContext,
        palette: Palette,
        terminal: SessionTerminal<W>,
        viewport: Viewport,
        actions: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            ctx,
            palette,
            state: NavigationState::new(viewport),
            terminal,
            actions,
            pending_opens: Vec::new(),
        }
    }

    async fn event_loop(
        &mut self,
        input: &mut mpsc::UnboundedReceiver<Vec<u8>>,
        action_rx: &mut mpsc::UnboundedReceiver<Action>,
        cancel: &CancellationToken,
        welcome_delay: Duration,
    ) -> Result<SessionEnd, SessionError> {
        let mut decoder = InputDecoder::new();
        let welcome = tokio::time::sleep(welcome_delay);
        tokio::pin!(welcome);

        self.draw()?;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(SessionEnd::Disconnected),
                () = &mut welcome, if self.state.mode == Mode::Welcome => {
                    self.apply(Action::WelcomeElapsed)?;
                }
                Some(action) = action_rx.recv() => {
                    if let Some(end) = self.apply(action)? {
                        return Ok(end);
                    }
                }
                bytes = input.recv() => {
                    let Some(bytes) = bytes else {
                        return Ok(SessionEnd::Disconnected);
                    };
                    for event in decoder.feed(&bytes) {
                        if let Some(end) = self.apply(Action::Key(key_for(&event)))? {
                            return Ok(end);
                        }
                    }
                }
            }
        }
    }

    /// Applies one action, carries out its effect, and redraws.
    fn apply(&mut self, action: Action) -> Result<Option<SessionEnd>, SessionError> {
        let before = self.state.viewport;
        let effect = update(&mut self.state, &self.ctx.content, action);

        match effect {
            Effect::Quit => return Ok(Some(SessionEnd::Quit)),
            Effect::OpenUrl(url) => self.spawn_open(url),
            Effect::None => {}
        }

        if self.state.viewport != before {
            self.terminal.resize(self.state.viewport)?;
        }
        self.draw()?;
        Ok(None)
    }

    fn draw(&mut self) -> io::Result<()> {
        let Self {
            ctx,
            palette,
            state,
            terminal,
            ..
        } = self;
        terminal.draw(|f| ui::draw_ui(f, state, &ctx.content, palette))
    }

    fn spawn_open(&mut self, url: String) {
        info!("Session {}: opening {}", self.ctx.id, url);
        let opener = Arc::clone(&self.ctx.opener);
        let actions = self.actions.clone();
        let id = self.ctx.id.clone();

        let handle = tokio::spawn(async move {
            match opener.open(&url).await {
                Ok(()) => {
                    if actions.send(Action::UrlOpened(url)).is_err() {
                        debug!("Session {}: ended before open completed", id);
                    }
                }
                Err(e) => warn!("Session {}: failed to open {}: {}", id, url, e),
            }
        });

        self.pending_opens.retain(|h| !h.is_finished());
        self.pending_opens.push(handle.abort_handle());
    }

    fn abort_pending_opens(&mut self) {
        for handle in self.pending_opens.drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::Key;
    use crate::test_support::{RecordingOpener, links_content, scenario_content};
    use ratatui::layout::Rect;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn context(content: Content, opener: Arc<RecordingOpener>) -> SessionContext {
        SessionContext {
            id: "test".to_string(),
            content: Arc::new(content),
            opener,
            options: SessionOptions {
                welcome_delay: Duration::from_secs(60),
            },
        }
    }

    struct Harness {
        input: mpsc::UnboundedSender<Vec<u8>>,
        resizes: mpsc::UnboundedSender<Viewport>,
        cancel: CancellationToken,
        output: SharedBuf,
    }

    fn session_io(pty: Option<PtyInfo>) -> (SessionIo<SharedBuf>, Harness) {
        let (input_tx, input) = mpsc::unbounded_channel();
        let (resize_tx, resizes) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let output = SharedBuf::default();
        let io = SessionIo {
            output: output.clone(),
            input,
            pty,
            resizes,
            cancel: cancel.clone(),
        };
        let harness = Harness {
            input: input_tx,
            resizes: resize_tx,
            cancel,
            output,
        };
        (io, harness)
    }

    fn pty(width: u16, height: u16) -> Option<PtyInfo> {
        Some(PtyInfo {
            term: "xterm-256color".to_string(),
            size: Viewport::new(width, height),
        })
    }

    #[tokio::test]
    async fn test_no_pty_writes_diagnostic_only() {
        let (io, harness) = session_io(None);
        let ctx = context(scenario_content(), Arc::new(RecordingOpener::default()));

        let end = run_session(io, ctx).await.unwrap();

        assert_eq!(end, SessionEnd::NoTerminal);
        assert_eq!(harness.output.text(), NO_PTY_MESSAGE);
    }

    #[tokio::test]
    async fn test_quit_restores_cursor() {
        let (io, harness) = session_io(pty(80, 24));
        let ctx = context(scenario_content(), Arc::new(RecordingOpener::default()));

        // Any key leaves Welcome, then q quits.
        harness.input.send(b"xq".to_vec()).unwrap();
        let end = run_session(io, ctx).await.unwrap();

        assert_eq!(end, SessionEnd::Quit);
        let out = harness.output.text();
        assert!(out.contains("\x1b[?25l"));
        assert!(out.ends_with("\x1b[?1049l"));
        assert!(out.contains("\x1b[?25h"));
    }

    #[tokio::test]
    async fn test_closed_input_disconnects() {
        let (io, harness) = session_io(pty(80, 24));
        let ctx = context(scenario_content(), Arc::new(RecordingOpener::default()));
        drop(harness.input);

        let end = run_session(io, ctx).await.unwrap();
        assert_eq!(end, SessionEnd::Disconnected);
        assert!(harness.output.text().contains("\x1b[?25h"));
    }

    #[tokio::test]
    async fn test_cancellation_ends_session() {
        let (io, harness) = session_io(pty(80, 24));
        let ctx = context(scenario_content(), Arc::new(RecordingOpener::default()));
        harness.cancel.cancel();

        let end = run_session(io, ctx).await.unwrap();
        assert_eq!(end, SessionEnd::Disconnected);
        drop(harness.resizes);
    }

    #[tokio::test]
    async fn test_bad_theme_fails_before_drawing() {
        let (io, harness) = session_io(pty(80, 24));
        let mut content = scenario_content();
        content.theme.primary = "not-a-color".to_string();
        let ctx = context(content, Arc::new(RecordingOpener::default()));

        let err = run_session(io, ctx).await.unwrap_err();
        assert!(matches!(err, SessionError::Theme(_)));
        assert!(harness.output.text().is_empty());
    }

    #[tokio::test]
    async fn test_welcome_times_out_into_browse() {
        let (io, harness) = session_io(pty(120, 30));
        let opener = Arc::new(RecordingOpener::default());
        let mut ctx = context(links_content(), opener);
        ctx.options.welcome_delay = Duration::from_millis(20);

        let input = harness.input.clone();
        let task = tokio::spawn(run_session(io, ctx));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(harness.output.text().contains("NORMAL"));

        input.send(b"q".to_vec()).unwrap();
        assert_eq!(task.await.unwrap().unwrap(), SessionEnd::Quit);
    }

    #[tokio::test]
    async fn test_resize_updates_next_frame_only() {
        let (action_tx, _action_rx) = mpsc::unbounded_channel();
        let ctx = context(links_content(), Arc::new(RecordingOpener::default()));
        let palette = Palette::from_theme(&ctx.content.theme).unwrap();
        let terminal = SessionTerminal::enter(SharedBuf::default(), Viewport::new(80, 24)).unwrap();
        let mut session = Session::new(&ctx, palette, terminal, Viewport::new(80, 24), action_tx);

        session.apply(Action::Key(Key::Other)).unwrap();
        session.apply(Action::Key(Key::Next)).unwrap();
        session.apply(Action::Key(Key::Tab)).unwrap();
        let before = session.state.clone();

        session.apply(Action::Resize(Viewport::new(40, 10))).unwrap();

        assert_eq!(session.terminal.area(), Rect::new(0, 0, 40, 10));
        assert_eq!(session.state.section_cursor, before.section_cursor);
        assert_eq!(session.state.link_cursor, before.link_cursor);
        assert_eq!(session.state.mode, before.mode);
    }

    #[tokio::test]
    async fn test_activate_dispatches_open_and_reports_completion() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let opener = Arc::new(RecordingOpener::default());
        let ctx = context(scenario_content(), opener.clone());
        let palette = Palette::from_theme(&ctx.content.theme).unwrap();
        let terminal = SessionTerminal::enter(SharedBuf::default(), Viewport::new(80, 24)).unwrap();
        let mut session = Session::new(&ctx, palette, terminal, Viewport::new(80, 24), action_tx);

        for key in [Key::Other, Key::Tab, Key::Activate] {
            assert_eq!(session.apply(Action::Key(key)).unwrap(), None);
        }
        assert_eq!(session.state.status_message, "Opening: https://example.com");

        let completed = action_rx.recv().await.unwrap();
        assert_eq!(completed, Action::UrlOpened("https://example.com".to_string()));
        session.apply(completed).unwrap();
        assert_eq!(session.state.status_message, "Opened: https://example.com");
        assert_eq!(*opener.opened.lock().unwrap(), vec!["https://example.com"]);
    }

    #[tokio::test]
    async fn test_failed_open_is_silent() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let opener = Arc::new(RecordingOpener {
            fail: true,
            ..Default::default()
        });
        let ctx = context(scenario_content(), opener.clone());
        let palette = Palette::from_theme(&ctx.content.theme).unwrap();
        let terminal = SessionTerminal::enter(SharedBuf::default(), Viewport::new(80, 24)).unwrap();
        let mut session = Session::new(&ctx, palette, terminal, Viewport::new(80, 24), action_tx);

        for key in [Key::Other, Key::Tab, Key::Activate] {
            session.apply(Action::Key(key)).unwrap();
        }
        drop(session);

        // The open task held the only other sender; it finishes without sending.
        assert!(action_rx.recv().await.is_none());
        assert_eq!(opener.opened.lock().unwrap().len(), 1);
    }
}
