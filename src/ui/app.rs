use std::io;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::config::{Config, UiConfig};
use crate::error::Result;
use crate::session::{Session, SessionState};
use crate::timer::Countdown;
use crate::watch::{self, WatchSignal};

use super::model;
use super::view;

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

/// The timer's hold on one task. Only an index into the session's list; it
/// is dropped on every return to the selector, and reloads wait until then.
pub(crate) struct TimerScreen {
    pub(crate) index: usize,
    pub(crate) countdown: Countdown,
}

pub(crate) enum Screen {
    Selector,
    Timer(TimerScreen),
}

pub struct AppState {
    pub(crate) session: Session,
    pub(crate) selected: Option<usize>,
    pub(crate) screen: Screen,
    pub(crate) spinner_frame: usize,
    reload_deferred: bool,
    status_message: Option<String>,
    info_message: Option<String>,
    watch_error: Option<String>,
    viewport_height: u16,
    config: UiConfig,
}

impl AppState {
    pub fn new(session: Session, config: UiConfig) -> Self {
        let selected = model::select_by_description(session.tasks(), None, None);
        Self {
            session,
            selected,
            screen: Screen::Selector,
            spinner_frame: 0,
            reload_deferred: false,
            status_message: None,
            info_message: None,
            watch_error: None,
            viewport_height: 0,
            config,
        }
    }

    fn update_viewport(&mut self, height: u16) {
        self.viewport_height = height;
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.session.state() == SessionState::Loading
    }

    pub(crate) fn timer(&self) -> Option<&TimerScreen> {
        match &self.screen {
            Screen::Timer(timer) => Some(timer),
            Screen::Selector => None,
        }
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        if let Some(error) = self.watch_error.as_ref() {
            return Some((error.clone(), StatusKind::Error));
        }
        if let Some(info) = self.info_message.as_ref() {
            return Some((info.clone(), StatusKind::Info));
        }
        None
    }

    pub(crate) fn footer_hint(&self, now: Instant) -> Option<String> {
        if !self.config.show_hints {
            return None;
        }
        let hint = match self.timer() {
            Some(timer) if timer.countdown.timed_out(now) => {
                "y another round  n stop  d done  h switch  q quit"
            }
            Some(_) => "space pause/resume  h switch  d done  q quit",
            None => "j/k move  enter start timer  r reload  q quit",
        };
        Some(hint.to_string())
    }

    pub(crate) fn task_count_summary(&self) -> String {
        format!(
            "open: {}  done: {}",
            self.session.open_count(),
            self.session.done_count()
        )
    }

    pub(crate) fn list_height(&self) -> usize {
        self.viewport_height.saturating_sub(6) as usize
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    fn move_selection(&mut self, delta: isize) {
        let total = self.session.tasks().len();
        if total == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, total as isize - 1) as usize;
        self.selected = Some(next);
    }

    fn handle_watch_signal(&mut self, signal: WatchSignal) {
        match signal {
            WatchSignal::Check => {
                if self.timer().is_some() {
                    self.reload_deferred = true;
                } else if self.session.poll_changes() {
                    self.session.begin_reload();
                }
            }
            WatchSignal::Error(err) => {
                self.watch_error = Some(err);
            }
        }
    }

    /// Run a reload requested by `begin_reload`, keeping the cursor on the
    /// same task where possible.
    fn finish_reload(&mut self) {
        let previous = self
            .selected
            .and_then(|idx| self.session.task(idx))
            .map(|task| task.description.clone());
        match self.session.reload() {
            Ok(summary) => {
                self.set_info(format!("reloaded {} tasks", summary.current));
            }
            Err(err) => {
                self.set_error(format!("reload failed: {err}"));
            }
        }
        self.selected =
            model::select_by_description(self.session.tasks(), previous.as_deref(), self.selected);
    }

    fn start_timer(&mut self, now: Instant) {
        let Some(index) = self.selected else {
            return;
        };
        let Some(task) = self.session.task(index) else {
            return;
        };
        tracing::debug!(task = %task.description, "starting timer");
        let countdown = Countdown::start(task.estimated_time, now);
        self.info_message = None;
        self.screen = Screen::Timer(TimerScreen { index, countdown });
    }

    /// Leave the timer, recording elapsed time (and completion) on the task.
    fn finish_timer(&mut self, mark_done: bool, now: Instant) {
        let screen = std::mem::replace(&mut self.screen, Screen::Selector);
        let Screen::Timer(timer) = screen else {
            return;
        };
        let description = self
            .session
            .task(timer.index)
            .map(|task| task.description.clone());
        let elapsed = timer.countdown.total_elapsed(now);

        match self.session.record(timer.index, elapsed, mark_done) {
            Ok(()) => {
                let verb = if mark_done { "done" } else { "logged" };
                self.set_info(format!(
                    "{verb}: {} ({})",
                    description.as_deref().unwrap_or("task"),
                    model::format_minutes(elapsed)
                ));
            }
            Err(err) => self.set_error(format!("not saved: {err}")),
        }
        self.selected =
            model::select_by_description(self.session.tasks(), description.as_deref(), self.selected);

        if std::mem::take(&mut self.reload_deferred) && self.session.poll_changes() {
            self.session.begin_reload();
        }
    }
}

pub fn run(session: Session, config: &Config) -> Result<()> {
    let (watch_tx, watch_rx) = mpsc::channel();
    watch::spawn_watch(session.path().to_path_buf(), &config.watch, watch_tx);

    let mut app = AppState::new(session, config.ui.clone());
    run_terminal(&mut app, watch_rx)
}

fn run_terminal(app: &mut AppState, watch_rx: Receiver<WatchSignal>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.update_viewport(size.height);

    let result = run_loop(&mut terminal, app, watch_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    watch_rx: Receiver<WatchSignal>,
) -> Result<()> {
    let poll_timeout = Duration::from_millis(app.config.event_poll_ms);
    let mut dirty = true;
    loop {
        while let Ok(signal) = watch_rx.try_recv() {
            app.handle_watch_signal(signal);
            dirty = true;
        }

        // The countdown moves on its own
        if app.timer().is_some() {
            dirty = true;
        }

        if dirty {
            let now = Instant::now();
            terminal.draw(|frame| {
                app.update_viewport(frame.size().height);
                view::render(frame, app, now);
            })?;
            dirty = false;
        }

        // Loading is drawn once (spinner) before the reload runs
        if app.is_loading() {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            app.finish_reload();
            dirty = true;
        }

        if event::poll(poll_timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if handle_key(app, key, Instant::now()) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, height) => {
                    app.update_viewport(height);
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Returns true when the app should quit.
fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if app.timer().is_some() {
        handle_timer_key(app, key, now)
    } else {
        handle_selector_key(app, key, now)
    }
}

fn handle_selector_key(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::Char('g') | KeyCode::Home => app.move_selection(isize::MIN / 2),
        KeyCode::Char('G') | KeyCode::End => app.move_selection(isize::MAX / 2),
        KeyCode::PageDown => app.move_selection((app.list_height() / 2).max(1) as isize),
        KeyCode::PageUp => app.move_selection(-((app.list_height() / 2).max(1) as isize)),
        KeyCode::Char('r') => app.session.begin_reload(),
        KeyCode::Enter => app.start_timer(now),
        _ => {}
    }
    false
}

fn handle_timer_key(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
    let Screen::Timer(timer) = &mut app.screen else {
        return false;
    };
    let timed_out = timer.countdown.timed_out(now);
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char(' ') => timer.countdown.toggle(now),
        KeyCode::Char('h') => app.finish_timer(false, now),
        KeyCode::Char('d') => app.finish_timer(true, now),
        KeyCode::Char('y') if timed_out => {
            timer.countdown.extend(now);
        }
        KeyCode::Char('n') if timed_out => app.finish_timer(false, now),
        _ => {}
    }
    false
}
