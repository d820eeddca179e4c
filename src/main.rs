//! Terminal runner (default binary).
//!
//! Two threads share one game. This thread polls the keyboard and applies
//! actions; a background thread drives gravity. Every mutation happens
//! under a single mutex, and the gravity thread sleeps on a condvar so an
//! action that changes the cadence (hold, hard drop, a landing move) wakes
//! it immediately instead of waiting out the frame.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;

use tetrion::core::Game;
use tetrion::input::{handle_key_event, should_quit};
use tetrion::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tetrion::types::{
    FrameBudget, INPUT_POLL_MS, LINE_CLEAR_PAUSE_MS, LOCK_DELAY_MS, WAIT_SLICE_MS,
};

struct App {
    game: Game,
    view: GameView,
    frame: FrameBuffer,
    term: TerminalRenderer,
}

impl App {
    fn new(seed: u32) -> Self {
        Self {
            game: Game::new(seed),
            view: GameView::default(),
            frame: FrameBuffer::new(0, 0),
            term: TerminalRenderer::new(),
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let (w, h) = terminal::size().unwrap_or((80, 24));
        self.view
            .render_into(&self.game, Viewport::new(w, h), &mut self.frame);
        self.term.present(&mut self.frame)
    }
}

type Shared = Arc<(Mutex<App>, Condvar)>;

fn main() -> Result<()> {
    let shared: Shared = Arc::new((Mutex::new(App::new(seed_from_clock())), Condvar::new()));
    let (lock, ticker) = &*shared;

    {
        let mut app = lock.lock().expect("game lock should be available");
        app.term.enter()?;
        app.redraw()?;
    }

    let gravity = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || gravity_loop(&shared))
    };

    let result = input_loop(&shared);

    {
        let mut app = lock.lock().expect("game lock should be available");
        app.game.request_exit();
        ticker.notify_all();
    }
    let _ = gravity.join();

    // Always try to restore terminal state.
    let mut app = lock.lock().expect("game lock should be available");
    let restored = app.term.exit();
    result.and(restored)
}

fn seed_from_clock() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos())
        .unwrap_or(1)
}

/// Keyboard loop. Returns when the player quits or the exit flag is set.
fn input_loop(shared: &Shared) -> Result<()> {
    let (lock, ticker) = &**shared;
    loop {
        {
            let app = lock.lock().expect("game lock should be available");
            if app.game.flags().exit {
                return Ok(());
            }
        }
        if !event::poll(Duration::from_millis(INPUT_POLL_MS))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    let mut app = lock.lock().expect("game lock should be available");
                    app.game.request_exit();
                    ticker.notify_all();
                    return Ok(());
                }
                if let Some(action) = handle_key_event(key) {
                    let mut app = lock.lock().expect("game lock should be available");
                    if app.game.apply(action) {
                        app.redraw()?;
                        ticker.notify_all();
                    }
                }
            }
            Event::Resize(_, _) => {
                let mut app = lock.lock().expect("game lock should be available");
                app.term.invalidate();
                app.redraw()?;
            }
            _ => {}
        }
    }
}

/// Gravity loop. Ticks the game, redraws, then waits out whatever frame
/// budget the tick asked for. Menu and pause park on the condvar.
fn gravity_loop(shared: &Shared) {
    let (lock, ticker) = &**shared;
    let mut app = lock.lock().expect("game lock should be available");
    loop {
        if app.game.flags().exit {
            return;
        }
        if !app.game.flags().running() {
            app = ticker.wait(app).expect("game lock should be available");
            continue;
        }

        let budget = app.game.tick();
        if app.redraw().is_err() {
            app.game.request_exit();
            return;
        }

        match budget {
            FrameBudget::Now | FrameBudget::Over => {}
            FrameBudget::Clearing => {
                // The clear pause freezes the whole game, input included.
                thread::sleep(Duration::from_millis(LINE_CLEAR_PAUSE_MS as u64));
                app.game.remove_line_clears();
                if app.redraw().is_err() {
                    app.game.request_exit();
                    return;
                }
            }
            FrameBudget::Fall(ms) => {
                app = wait_budget(ticker, app, ms, fall_interrupted);
            }
            FrameBudget::Grace => {
                app = wait_budget(ticker, app, LOCK_DELAY_MS, grace_interrupted);
            }
        }
    }
}

/// Sleep up to `ms` milliseconds with the lock released, waking early when
/// `interrupted` reports the wait is moot. Checks run on every notification
/// and at least once per millisecond. A pause parks the clock without
/// consuming budget, so resuming continues where the wait left off.
fn wait_budget<'a>(
    ticker: &Condvar,
    mut app: MutexGuard<'a, App>,
    ms: u32,
    interrupted: impl Fn(&Game) -> bool,
) -> MutexGuard<'a, App> {
    let mut left = Duration::from_millis(ms as u64);
    loop {
        if app.game.flags().exit {
            return app;
        }
        if app.game.flags().paused {
            app = ticker.wait(app).expect("game lock should be available");
            continue;
        }
        if !app.game.flags().started || interrupted(&app.game) || left.is_zero() {
            return app;
        }

        let slice = left.min(Duration::from_millis(WAIT_SLICE_MS));
        let before = Instant::now();
        let (woken, _) = ticker
            .wait_timeout(app, slice)
            .expect("game lock should be available");
        app = woken;
        left = left.saturating_sub(before.elapsed());
    }
}

/// A fall wait ends early when a hold or hard drop wants an immediate
/// tick, or when the piece has landed and the grace window should start.
fn fall_interrupted(game: &Game) -> bool {
    match game.piece() {
        Some(piece) => {
            piece.is_hold_requested()
                || piece.is_hard_dropped()
                || piece.has_landed(game.board())
        }
        None => true,
    }
}

/// A grace wait ends early when a hold or hard drop preempts the lock, or
/// when an accepted move cleared the pre-lock mark. The next tick then
/// re-enters the window, or resumes gravity if the piece slid off an edge.
fn grace_interrupted(game: &Game) -> bool {
    match game.piece() {
        Some(piece) => {
            piece.is_hold_requested() || piece.is_hard_dropped() || !piece.is_pre_locked()
        }
        None => true,
    }
}
