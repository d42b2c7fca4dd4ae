//! Layout and drawing: playfield, current piece, sidebar, pause, quit menu, game over.

use crate::app::{QuitOption, Screen};
use crate::board::{Cell, Grid, Piece, Position};
use crate::game::{GameSnapshot, Outcome};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{
    Alignment, Constraint, Direction, Layout, Position as ScreenPosition, Rect,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Each board cell is two terminal columns wide so cells look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 26;
/// Sidebar sections plus gaps; the game area is at least this tall.
const SIDEBAR_HEIGHT: u16 = 27;
/// Fade of freshly committed cells from piece colour to filled colour.
const COMMIT_FADE_MS: u32 = 350;
const PREVIEW_ROWS: u16 = 4;

/// Terminal length for a board or piece extent, saturating at `u16::MAX`.
fn span(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Playfield size in terminal cells (border + board).
fn playfield_size(grid: &Grid) -> (u16, u16) {
    (
        span(grid.width()).saturating_mul(CELL_WIDTH).saturating_add(2),
        span(grid.height()).saturating_add(2),
    )
}

/// Playfield (with border) and sidebar, centred in `area`. Shared by drawing and mouse hit-testing.
fn layout(area: Rect, grid: &Grid) -> (Rect, Rect) {
    let (pw, ph) = playfield_size(grid);
    let total_w = pw.saturating_add(SIDEBAR_WIDTH);
    let total_h = ph.max(SIDEBAR_HEIGHT);

    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_h),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert_chunks[1]);

    let playfield = Rect {
        height: ph.min(inner[0].height),
        ..inner[0]
    };
    (playfield, inner[1])
}

/// Board only, inside the playfield border.
fn board_rect(playfield: Rect, grid: &Grid) -> Rect {
    Rect {
        x: playfield.x.saturating_add(1),
        y: playfield.y.saturating_add(1),
        width: span(grid.width())
            .saturating_mul(CELL_WIDTH)
            .min(playfield.width.saturating_sub(2)),
        height: span(grid.height()).min(playfield.height.saturating_sub(2)),
    }
}

/// Board cell under terminal cell (`column`, `row`) for a frame of size `area`.
pub fn cell_at(area: Rect, grid: &Grid, column: u16, row: u16) -> Option<Position> {
    let (playfield, _) = layout(area, grid);
    let board = board_rect(playfield, grid);
    let inside = column >= board.x
        && column < board.right()
        && row >= board.y
        && row < board.bottom();
    inside.then(|| {
        Position::new(
            ((column - board.x) / CELL_WIDTH) as i32,
            (row - board.y) as i32,
        )
    })
}

/// Two terminal columns for one board cell. With parity the triangles alternate like the board.
fn glyphs(parity: bool, x: usize, y: usize) -> [&'static str; 2] {
    match (parity, (x + y) % 2) {
        (false, _) => ["█", "█"],
        (true, 0) => ["◢", "◤"],
        (true, _) => ["◥", "◣"],
    }
}

fn paint(buf: &mut Buffer, board: Rect, x: usize, y: usize, symbols: [&str; 2], style: Style) {
    let ry = board.y.saturating_add(span(y));
    for (i, symbol) in symbols.iter().enumerate() {
        let rx = board
            .x
            .saturating_add(span(x).saturating_mul(CELL_WIDTH))
            .saturating_add(i as u16);
        if rx < board.right() && ry < board.bottom() {
            buf[(rx, ry)].set_symbol(symbol).set_style(style);
        }
    }
}

/// Create or update the commit fade (TachyonFX: freshly written cells fade to the filled colour).
fn apply_commit_effect(
    frame: &mut Frame,
    snapshot: &GameSnapshot,
    theme: &Theme,
    commit_effect: &mut Option<Effect>,
    commit_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let (playfield, _) = layout(frame.area(), &snapshot.grid);
    let board = board_rect(playfield, &snapshot.grid);
    let delta = commit_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    let tfx_delta = TfxDuration::from_millis(delta_ms);
    *commit_process_time = Some(now);

    if commit_effect.is_none() {
        let fresh: HashSet<(u16, u16)> = snapshot
            .last_commit
            .iter()
            .flat_map(|p| {
                let x0 = board
                    .x
                    .saturating_add(span(p.x as usize).saturating_mul(CELL_WIDTH));
                let y = board.y.saturating_add(span(p.y as usize));
                (x0..x0.saturating_add(CELL_WIDTH)).map(move |x| (x, y))
            })
            .collect();
        let filter = CellFilter::PositionFn(ref_count(move |pos: ScreenPosition| {
            fresh.contains(&(pos.x, pos.y))
        }));
        let effect = fx::fade_to(
            theme.filled,
            theme.bg,
            (COMMIT_FADE_MS, Interpolation::Linear),
        )
        .with_filter(filter)
        .with_area(board);
        *commit_effect = Some(effect);
    }

    if let Some(effect) = commit_effect {
        frame.render_effect(effect, board, tfx_delta);
    }
}

/// Draw current screen from a snapshot. While `flash_commit` is set, the cells of the latest
/// commit are drawn in the piece colour and faded via `commit_effect`.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    snapshot: &GameSnapshot,
    theme: &Theme,
    paused: bool,
    quit_selected: QuitOption,
    flash_commit: bool,
    commit_effect: &mut Option<Effect>,
    commit_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    draw_game(frame, snapshot, theme, area, flash_commit);
    if flash_commit && !snapshot.last_commit.is_empty() {
        apply_commit_effect(
            frame,
            snapshot,
            theme,
            commit_effect,
            commit_process_time,
            now,
        );
    }
    match screen {
        Screen::Playing => {
            if paused {
                draw_pause_overlay(frame, theme, area);
            }
        }
        Screen::QuitMenu => draw_quit_menu(frame, theme, quit_selected),
        Screen::GameOver => draw_game_over(frame, snapshot, theme, area),
    }
}

fn draw_game(
    frame: &mut Frame,
    snapshot: &GameSnapshot,
    theme: &Theme,
    area: Rect,
    flash_commit: bool,
) {
    let (playfield_area, sidebar_area) = layout(area, &snapshot.grid);
    draw_playfield(frame, snapshot, theme, playfield_area, flash_commit);
    draw_sidebar(frame, snapshot, theme, sidebar_area);
}

fn draw_playfield(
    frame: &mut Frame,
    snapshot: &GameSnapshot,
    theme: &Theme,
    area: Rect,
    flash_commit: bool,
) {
    let title = format!(
        " Silhouette  {}/{} ",
        snapshot.target_cells.saturating_sub(snapshot.remaining()),
        snapshot.target_cells
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, theme.title));
    block.render(area, frame.buffer_mut());

    let board = board_rect(area, &snapshot.grid);
    let fresh: HashSet<Position> = if flash_commit {
        snapshot.last_commit.iter().copied().collect()
    } else {
        HashSet::new()
    };
    let buf = frame.buffer_mut();

    for (y, row) in snapshot.grid.rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let (symbols, colour) = match cell {
                Cell::Empty => ([" ", " "], theme.bg),
                Cell::Playable if !snapshot.parity => (["░", "░"], theme.playable),
                Cell::Playable => (glyphs(true, x, y), theme.playable),
                Cell::Filled if fresh.contains(&Position::new(x as i32, y as i32)) => {
                    (glyphs(snapshot.parity, x, y), theme.piece)
                }
                Cell::Filled => (glyphs(snapshot.parity, x, y), theme.filled),
            };
            paint(
                buf,
                board,
                x,
                y,
                symbols,
                Style::default().fg(colour).bg(theme.bg),
            );
        }
    }

    if let Some(piece) = &snapshot.current {
        let style = Style::default().fg(theme.piece).bg(theme.bg);
        for (r, c) in piece.occupied() {
            let x = snapshot.position.x + c as i32;
            let y = snapshot.position.y + r as i32;
            if x >= 0 && y >= 0 {
                let (x, y) = (x as usize, y as usize);
                paint(buf, board, x, y, glyphs(snapshot.parity, x, y), style);
            }
        }
    }
}

fn sidebar_block(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
}

fn draw_sidebar(frame: &mut Frame, snapshot: &GameSnapshot, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let help_style = Style::default().fg(theme.inactive_fg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PREVIEW_ROWS + 3), // Next (border + title + preview)
            Constraint::Length(1),                // gap
            Constraint::Length(6),                // Stats
            Constraint::Length(1),                // gap
            Constraint::Length(4),                // Progress (border + title + gauge)
            Constraint::Length(1),                // gap
            Constraint::Length(7),                // Controls
        ])
        .split(area);

    // --- Next ---
    let next_block = sidebar_block(theme);
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    let next_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(PREVIEW_ROWS)])
        .split(next_inner);
    Paragraph::new(Line::from(Span::styled("Next", title_style)))
        .render(next_layout[0], frame.buffer_mut());
    if let Some(piece) = &snapshot.next {
        draw_piece_preview(frame, theme, next_layout[1], piece);
    }

    // --- Stats ---
    let stats_block = sidebar_block(theme);
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    let mode = if snapshot.parity {
        format!("{} + parity", snapshot.eligibility.label())
    } else {
        snapshot.eligibility.label().to_string()
    };
    let stats_lines = vec![
        Line::from(vec![
            Span::styled("Mode: ", title_style),
            Span::styled(mode, fg_style),
        ]),
        Line::from(vec![
            Span::styled("Placed: ", title_style),
            Span::styled(snapshot.placed.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Left: ", title_style),
            Span::styled(snapshot.remaining().to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("At: ", title_style),
            Span::styled(
                format!("{}, {}", snapshot.position.x, snapshot.position.y),
                fg_style,
            ),
        ]),
    ];
    Paragraph::new(Text::from(stats_lines)).render(stats_inner, frame.buffer_mut());

    // --- Progress ---
    let progress_block = sidebar_block(theme);
    let progress_inner = progress_block.inner(chunks[4]);
    progress_block.render(chunks[4], frame.buffer_mut());
    let progress_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(progress_inner);
    Paragraph::new(Line::from(Span::styled("Filled", title_style)))
        .render(progress_layout[0], frame.buffer_mut());
    let ratio = snapshot.progress();
    Gauge::default()
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0))
        .gauge_style(Style::default().fg(theme.filled).bg(theme.bg))
        .render(progress_layout[1], frame.buffer_mut());

    // --- Controls ---
    let help_block = sidebar_block(theme);
    let help_inner = help_block.inner(chunks[6]);
    help_block.render(chunks[6], frame.buffer_mut());
    let help_lines = vec![
        Line::from(Span::styled("Arrows/hjkl  move", help_style)),
        Line::from(Span::styled("r/Tab        rotate", help_style)),
        Line::from(Span::styled("Enter/Space  place", help_style)),
        Line::from(Span::styled("Click / R-click", help_style)),
        Line::from(Span::styled("p pause   q quit", help_style)),
    ];
    Paragraph::new(Text::from(help_lines)).render(help_inner, frame.buffer_mut());
}

/// Piece shape centred in `area`, clipped when larger than the preview.
fn draw_piece_preview(frame: &mut Frame, theme: &Theme, area: Rect, piece: &Piece) {
    let pw = span(piece.width()).saturating_mul(CELL_WIDTH);
    let ph = span(piece.height());
    let off_x = area.width.saturating_sub(pw) / 2;
    let off_y = area.height.saturating_sub(ph) / 2;
    let style = Style::default().fg(theme.piece).bg(theme.bg);
    let buf = frame.buffer_mut();
    for (r, c) in piece.occupied() {
        let rx = (area.x + off_x).saturating_add(span(c).saturating_mul(CELL_WIDTH));
        let ry = (area.y + off_y).saturating_add(span(r));
        if ry >= area.bottom() {
            continue;
        }
        for dx in 0..CELL_WIDTH {
            let x = rx.saturating_add(dx);
            if x < area.right() {
                buf[(x, ry)].set_symbol("█").set_style(style);
            }
        }
    }
}

fn centred(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centred(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — Resume    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, snapshot: &GameSnapshot, theme: &Theme, area: Rect) {
    let popup = centred(area, 30, 9);
    let (title, title_style) = match snapshot.phase {
        crate::game::Phase::GameOver(Outcome::Completed) => (
            " Completed! ",
            Style::default().fg(Color::Black).bg(Color::Green),
        ),
        _ => (
            " No room left ",
            Style::default().fg(Color::White).bg(Color::Red),
        ),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(title, title_style)),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Pieces placed: {} ", snapshot.placed),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            format!(" Cells left: {} ", snapshot.remaining()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " R — Restart    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(" Silhouette ", theme.title)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: QuitOption) {
    let quit_rect = centred(frame.area(), 24, 8);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title))
        .title(" Quit? ");

    // Clear background
    for y in quit_rect.y..quit_rect.y + quit_rect.height {
        for x in quit_rect.x..quit_rect.x + quit_rect.width {
            frame.buffer_mut()[(x, y)]
                .set_symbol(" ")
                .set_style(Style::default().bg(theme.bg));
        }
    }

    let inner = block.inner(quit_rect);
    block.render(quit_rect, frame.buffer_mut());

    let options = [
        (QuitOption::Resume, " Resume "),
        (QuitOption::Restart, " Restart "),
        (QuitOption::Exit, " Exit "),
    ];

    for (i, (opt, label)) in options.iter().enumerate() {
        let style = if *opt == selected {
            Style::default()
                .fg(theme.bg)
                .bg(theme.title)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.title)
        };
        let rx = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        let ry = inner.y + 1 + i as u16 * 2;
        if ry < inner.y + inner.height {
            frame.buffer_mut().set_string(rx, ry, label, style);
        }
    }
}
