//! CLI tool for rendering slide decks and presenting them in a terminal.

mod terminal;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deck_core::{ContentFormatter, PreviewRenderer, SlideDeck, SlideshowController};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use terminal::{parse_command, Command, TerminalKeys, TerminalView};

/// Render and present slide decks exported as JSON.
#[derive(Parser, Debug)]
#[command(name = "slide-deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Mode,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Print the rendered markup of every slide
    Render {
        /// Deck file (JSON array of slides)
        deck: PathBuf,

        /// Maximum bullets per slide
        #[arg(short = 'm', long, default_value = "5")]
        max_items: usize,

        /// Order slides by their `order` field
        #[arg(short, long)]
        sort: bool,
    },

    /// Print a collapsible preview of every slide
    Preview {
        /// Deck file (JSON array of slides)
        deck: PathBuf,

        /// Characters shown before the "show more" toggle
        #[arg(short = 'l', long, default_value = "120")]
        max_length: usize,

        /// Order slides by their `order` field
        #[arg(short, long)]
        sort: bool,
    },

    /// Step through the deck interactively
    Present {
        /// Deck file (JSON array of slides)
        deck: PathBuf,

        /// Order slides by their `order` field
        #[arg(short, long)]
        sort: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match args.command {
        Mode::Render {
            deck,
            max_items,
            sort,
        } => {
            let deck = load_deck(&deck, sort)?;
            let formatter = ContentFormatter::new().with_max_items(max_items);
            print!("{}", render_deck(&deck, &formatter));
        }
        Mode::Preview {
            deck,
            max_length,
            sort,
        } => {
            let deck = load_deck(&deck, sort)?;
            print!("{}", preview_deck(&deck, &PreviewRenderer::new(), max_length));
        }
        Mode::Present { deck, sort } => {
            let deck = load_deck(&deck, sort)?;
            present(deck)?;
        }
    }

    Ok(())
}

/// Read and parse a deck file.
fn load_deck(path: &Path, sort: bool) -> Result<SlideDeck> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let deck = SlideDeck::from_json(&json)
        .with_context(|| format!("Failed to parse deck {}", path.display()))?;

    log::debug!("Loaded {} slides from {}", deck.len(), path.display());

    Ok(if sort { deck.sorted_by_order() } else { deck })
}

fn render_deck(deck: &SlideDeck, formatter: &ContentFormatter) -> String {
    deck.iter()
        .enumerate()
        .map(|(idx, slide)| {
            format!(
                "== {}. {} ==\n{}\n\n",
                slide.display_number(idx),
                slide.display_title(idx + 1),
                formatter.render_full(&slide.content)
            )
        })
        .collect()
}

fn preview_deck(deck: &SlideDeck, renderer: &PreviewRenderer, max_length: usize) -> String {
    deck.iter()
        .map(|slide| {
            let id = Some(slide.id.as_str()).filter(|id| !id.is_empty());
            format!("{}\n", renderer.render(&slide.content, max_length, id))
        })
        .collect()
}

/// Run an interactive session reading commands from stdin.
fn present(deck: SlideDeck) -> Result<()> {
    let mut slideshow = SlideshowController::new(TerminalView::default(), TerminalKeys::default());
    if slideshow.start(deck).is_err() {
        // The view already reported the notice.
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    while slideshow.keyboard().is_listening() {
        write!(stdout, "{}", slideshow.view().frame())?;
        write!(stdout, "[n]ext [p]rev [home] [end] <number> [q]uit > ")?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read command")?;

        match parse_command(&line) {
            Some(Command::Key(key)) => {
                slideshow.handle_key(key);
            }
            Some(Command::Jump(number)) => {
                if number == 0 || !slideshow.go_to(number - 1) {
                    eprintln!("No slide {}", number);
                }
            }
            None => eprintln!("Unknown command: {}", line.trim()),
        }
    }

    slideshow.exit();
    Ok(())
}
