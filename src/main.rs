//! Silhouette: fill a fixed shape with randomly offered polyomino pieces, in the terminal.

mod app;
mod board;
mod catalog;
mod game;
mod input;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use catalog::{Catalog, CyclePicker, PiecePicker, RandomPicker};
use clap::{Parser, ValueEnum};
use rand::Rng;
use std::path::PathBuf;

/// Options derived from CLI that affect engine behaviour (cell eligibility, parity).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub eligibility: Eligibility,
    pub parity: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let catalog = match &args.board {
        Some(path) => Catalog::load(path, args.merge)
            .with_context(|| format!("failed to load board {}", path.display()))?,
        None => Catalog::parse(catalog::DEFAULT_BOARD, args.merge)
            .context("built-in board is malformed")?,
    };
    let picker: Box<dyn PiecePicker> = if args.cycle {
        Box::new(CyclePicker::default())
    } else {
        let seed = args.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("piece seed {}", seed);
        Box::new(RandomPicker::new(seed))
    };
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig {
        eligibility: args.eligibility,
        parity: args.parity,
    };
    log::info!(
        "starting {} ({} variants)",
        args.board
            .as_deref()
            .map_or_else(|| "built-in board".to_string(), |p| p.display().to_string()),
        catalog.variants().len()
    );

    let mut app = App::new(args, &config, catalog, picker, theme);
    app.run()?;
    Ok(())
}

/// Logs go to a file when requested; the terminal is owned by the UI.
fn init_logging(path: Option<&std::path::Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

/// Silhouette-filling polyomino puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "silhouette",
    version,
    about = "Fill a silhouette with randomly offered pieces, without overlap and without leaving the shape.",
    long_about = "Silhouette is a terminal placement puzzle.\n\n\
        The board is a fixed shape. Pieces are offered one at a time; move, rotate and place \
        them so that they cover the shape exactly. The game ends when the shape is covered or \
        the offered piece fits nowhere.\n\n\
        CONTROLS (normal):\n  Arrows      Move     R / Tab    Rotate     Enter/Space Place\n  P           Pause    Q / Esc    Quit menu\n\n\
        CONTROLS (vim):\n  h/j/k/l     Move     u          Rotate\n\n\
        MOUSE:\n  Left click places the piece at the clicked cell, right click rotates.\n\n\
        BOARD FILE:\n  Rows of 0/1 for the shape, a blank line, then pieces separated by blank lines."
)]
pub struct Args {
    /// Board file (shape, blank line, pieces). Uses the built-in ring board if not set.
    #[arg(value_name = "BOARD")]
    pub board: Option<PathBuf>,

    /// Which cells accept a piece: mask-fill (only uncovered shape cells) or obstacle (anything not filled).
    #[arg(short, long, default_value = "mask-fill")]
    pub eligibility: Eligibility,

    /// Triangle boards: a piece only fits where every covered cell matches the origin's orientation.
    #[arg(long)]
    pub parity: bool,

    /// Collapse every 2x2 block of the board file into one cell (set if any of the four is set).
    #[arg(long)]
    pub merge: bool,

    /// Gravity: the piece falls one row per tick and is placed where it lands.
    #[arg(long)]
    pub gravity: bool,

    /// Gravity ticks per second.
    #[arg(long, default_value = "2.0", value_name = "RATE")]
    pub tick_rate: f64,

    /// Seed for the piece picker (random if not set).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Offer pieces in board-file order instead of at random.
    #[arg(long, conflicts_with = "seed")]
    pub cycle: bool,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the fade on freshly placed cells.
    #[arg(long)]
    pub no_animation: bool,

    /// Write logs to this file (RUST_LOG filters, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

/// Cell eligibility policy, fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Eligibility {
    /// Pieces may land on any cell that is not already filled.
    Obstacle,
    /// Pieces may only land on uncovered cells of the shape.
    #[default]
    #[value(alias = "mask")]
    MaskFill,
}

impl Eligibility {
    pub fn label(self) -> &'static str {
        match self {
            Self::Obstacle => "obstacle",
            Self::MaskFill => "mask-fill",
        }
    }
}
