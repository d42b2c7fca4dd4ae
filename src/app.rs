//! App: terminal init, main loop, gravity tick, key and mouse handling.

use crate::catalog::{Catalog, PiecePicker};
use crate::game::GameState;
use crate::input::{Action, Pointer, key_to_action, mouse_to_pointer};
use crate::theme::Theme;
use crate::{Args, GameConfig};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Slowest accepted gravity rate, so `1 / rate` stays finite.
const MIN_TICK_RATE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    Restart,
    Exit,
}

impl QuitOption {
    fn next(self) -> Self {
        match self {
            Self::Resume => Self::Restart,
            Self::Restart => Self::Exit,
            Self::Exit => Self::Resume,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Resume => Self::Exit,
            Self::Restart => Self::Resume,
            Self::Exit => Self::Restart,
        }
    }
}

pub struct App {
    args: Args,
    theme: Theme,
    state: GameState,
    /// Mask-fill movement jumps over gaps in the silhouette.
    hop_moves: bool,
    screen: Screen,
    paused: bool,
    quit_selected: QuitOption,
    last_tick: Instant,
    /// Frame area of the last draw, for mouse hit-testing.
    area: Rect,
    /// Commit count the flash was last started for.
    seen_placed: u32,
    flash_commit: bool,
    /// TachyonFX fade for the latest commit (created by the UI when the flash starts).
    commit_effect: Option<Effect>,
    /// Last time we processed the commit effect (for delta).
    commit_effect_process_time: Option<Instant>,
}

impl App {
    pub fn new(
        args: Args,
        config: &GameConfig,
        catalog: Catalog,
        picker: Box<dyn PiecePicker>,
        theme: Theme,
    ) -> Self {
        let mut state = GameState::new(catalog, config, picker);
        state.reset();
        let screen = if state.is_over() {
            Screen::GameOver
        } else {
            Screen::Playing
        };
        Self {
            args,
            theme,
            state,
            hop_moves: config.eligibility == crate::Eligibility::MaskFill,
            screen,
            paused: false,
            quit_selected: QuitOption::Resume,
            last_tick: Instant::now(),
            area: Rect::default(),
            seen_placed: 0,
            flash_commit: false,
            commit_effect: None,
            commit_effect_process_time: None,
        }
    }

    fn restart(&mut self) {
        self.state.reset();
        self.screen = Screen::Playing;
        self.paused = false;
        self.quit_selected = QuitOption::Resume;
        self.last_tick = Instant::now();
        self.seen_placed = 0;
        self.stop_flash();
        self.sync_screen();
    }

    fn stop_flash(&mut self) {
        self.flash_commit = false;
        self.commit_effect = None;
        self.commit_effect_process_time = None;
    }

    /// Follow the engine after a mutation: start the commit flash, switch to game over.
    fn sync_screen(&mut self) {
        let placed = self.state.placed();
        if placed != self.seen_placed {
            self.seen_placed = placed;
            self.stop_flash();
            self.flash_commit = !self.args.no_animation;
        }
        if self.state.is_over() && self.screen == Screen::Playing {
            self.screen = Screen::GameOver;
        }
    }

    /// Move by one step. In mask-fill play, jump over cells the piece cannot occupy
    /// to the next spot that fits.
    fn hop(&mut self, dx: i32, dy: i32) {
        let grid = self.state.grid();
        let limit = match (self.hop_moves, dx != 0) {
            (false, _) => 1,
            (true, true) => grid.width() as i32,
            (true, false) => grid.height() as i32,
        };
        for step in 1..=limit.max(1) {
            if self.state.move_by(dx * step, dy * step) {
                return;
            }
        }
    }

    /// Hard drop under gravity, then commit; plain commit otherwise.
    fn place(&mut self) {
        if self.args.gravity {
            while self.state.move_by(0, 1) {}
        }
        self.state.place(None);
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::MoveLeft => self.hop(-1, 0),
            Action::MoveRight => self.hop(1, 0),
            Action::MoveUp if !self.args.gravity => self.hop(0, -1),
            Action::MoveUp => {}
            Action::MoveDown if self.args.gravity => {
                self.state.move_by(0, 1);
            }
            Action::MoveDown => self.hop(0, 1),
            Action::Rotate => {
                self.state.rotate_current();
            }
            Action::Place => self.place(),
            Action::Restart | Action::Pause | Action::Quit | Action::None => {}
        }
    }

    /// Returns `true` when the app should exit.
    fn handle_action(&mut self, action: Action) -> bool {
        match self.screen {
            Screen::Playing => {
                if action == Action::Quit {
                    self.screen = Screen::QuitMenu;
                    self.quit_selected = QuitOption::Resume;
                } else if action == Action::Pause {
                    self.paused = !self.paused;
                } else if action == Action::Restart {
                    self.restart();
                } else if !self.paused {
                    self.apply_action(action);
                    self.sync_screen();
                }
            }
            Screen::QuitMenu => match action {
                Action::MoveDown | Action::MoveRight => {
                    self.quit_selected = self.quit_selected.next();
                }
                Action::MoveUp | Action::MoveLeft | Action::Rotate => {
                    self.quit_selected = self.quit_selected.prev();
                }
                Action::Place => match self.quit_selected {
                    QuitOption::Resume => self.screen = Screen::Playing,
                    QuitOption::Restart => self.restart(),
                    QuitOption::Exit => return true,
                },
                Action::Pause | Action::Quit => self.screen = Screen::Playing,
                _ => {}
            },
            Screen::GameOver => match action {
                Action::Quit => return true,
                Action::Restart | Action::Rotate => self.restart(),
                _ => {}
            },
        }
        false
    }

    fn handle_pointer(&mut self, pointer: Pointer) {
        if self.screen != Screen::Playing || self.paused {
            return;
        }
        match pointer {
            Pointer::PlaceAt { column, row } => {
                let Some(cell) = crate::ui::cell_at(self.area, self.state.grid(), column, row)
                else {
                    return;
                };
                if !self.state.place(Some(cell)) {
                    log::debug!("click at ({}, {}) does not fit", cell.x, cell.y);
                }
            }
            Pointer::Rotate => {
                self.state.rotate_current();
            }
            Pointer::None => {}
        }
        self.sync_screen();
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick_interval = Duration::from_secs_f64(1.0 / self.args.tick_rate.max(MIN_TICK_RATE));
        loop {
            let now = Instant::now();
            let snapshot = self.state.snapshot();
            let completed = terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    self.screen,
                    &snapshot,
                    &self.theme,
                    self.paused,
                    self.quit_selected,
                    self.flash_commit,
                    &mut self.commit_effect,
                    &mut self.commit_effect_process_time,
                    now,
                )
            })?;
            self.area = completed.area;

            if self.flash_commit && self.commit_effect.as_ref().is_some_and(|e| e.done()) {
                self.stop_flash();
            }

            // Limit event polling to hit ~60 FPS rendering (16ms)
            let frame_duration = Duration::from_millis(16);
            let timeout = frame_duration.saturating_sub(now.elapsed());

            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) => {
                            // Held keys arrive as Repeat with enhanced keyboards, as Press otherwise.
                            if key.kind == KeyEventKind::Release {
                                continue;
                            }
                            if self.handle_action(key_to_action(key)) {
                                return Ok(());
                            }
                        }
                        Event::Mouse(mouse) => self.handle_pointer(mouse_to_pointer(mouse)),
                        _ => {}
                    }
                }
            }

            if self.args.gravity
                && self.screen == Screen::Playing
                && !self.paused
                && self.last_tick.elapsed() >= tick_interval
            {
                self.last_tick = Instant::now();
                self.state.tick();
                self.sync_screen();
            }
        }
    }
}
