//! Dashboard runtime: link → session → renderer.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use vyom_core::{Clock, Session, Snapshot};
use vyom_link::{Connection, Subscription};

use crate::config::DashboardConfig;
use crate::{plain, ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Terminal,
    Plain,
}

/// Feed every link event into the session, in arrival order, until the
/// connection closes.
pub async fn drive<C: Clock>(mut subscription: Subscription, mut session: Session<C>) -> Session<C> {
    while let Some(event) = subscription.recv().await {
        debug!(event = event.name(), "link event");
        session.handle(event);
    }
    session
}

pub async fn run(config: DashboardConfig, mode: Mode) -> Result<()> {
    let (connection, subscription) = Connection::open(config.link_config())?;
    let session = Session::new(config.reducer_config());
    let snapshots = session.subscribe();
    let driver = tokio::spawn(drive(subscription, session));

    let result = match mode {
        Mode::Terminal => run_terminal(snapshots).await,
        Mode::Plain => run_plain(snapshots).await,
    };

    connection.close().await;
    match driver.await {
        Ok(session) => info!(samples = session.snapshot().samples, "session ended"),
        Err(err) => warn!(error = %err, "session task failed"),
    }
    result
}

async fn run_plain(mut rx: watch::Receiver<Snapshot>) -> Result<()> {
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let line = plain::render_line(&rx.borrow_and_update());
                println!("{}", line);
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                return Ok(());
            }
        }
    }
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

async fn run_terminal(mut rx: watch::Receiver<Snapshot>) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let mut dirty = true;

    loop {
        if event::poll(Duration::from_millis(10))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let ctrl_c = key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL);
                    if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                        return Ok(());
                    }
                }
                Event::Resize(..) => dirty = true,
                _ => {}
            }
        }

        if dirty || rx.has_changed().unwrap_or(false) {
            let snapshot = rx.borrow_and_update().clone();
            terminal.draw(|frame| ui::draw(frame, &snapshot))?;
            dirty = false;
        }

        tokio::time::sleep(Duration::from_millis(33)).await;
    }
}
