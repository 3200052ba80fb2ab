//! Interactive menu loop.
//!
//! Reads choices from standard input, resolves the working directory and
//! hands off to the pipeline or the download pass. Invalid input re-prompts;
//! nothing here aborts the loop except "exit" or end of input.

use anyhow::{bail, Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::context::AppContext;
use crate::models::{PassKind, PassResult};
use crate::passes::download;
use crate::pipeline::Pipeline;

const BANNER: &str = r"
  ___  ___  _ __  (_) ___       / _| ___  _ __ __ _  ___
 / __|/ _ \| '_ \ | |/ __|_____| |_ / _ \| '__/ _` |/ _ \
 \__ \ (_) | | | || | (_|_____|  _| (_) | | | (_| |  __/
 |___/\___/|_| |_||_|\___|    |_|  \___/|_|  \__, |\___|
                                             |___/";

const TAGLINE: &str = "Convert, rename, tag and download your music in bulk";

pub const FAREWELL: &str = "Bye! Your music is in good shape.";

// ============================================================================
// Menu parsing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Pass(PassKind),
    Download,
    RenameAndLyrics,
    Combined,
    Exit,
}

pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "0" => Some(MenuChoice::Exit),
        "5" => Some(MenuChoice::Download),
        "6" => Some(MenuChoice::RenameAndLyrics),
        "7" => Some(MenuChoice::Combined),
        other => other
            .parse::<u8>()
            .ok()
            .and_then(PassKind::from_number)
            .map(MenuChoice::Pass),
    }
}

/// Parse a comma-separated pass selection such as "3,1". Blank items are
/// ignored; anything else outside 1-4 rejects the whole selection.
pub fn parse_pass_selection(input: &str) -> Result<Vec<PassKind>> {
    let mut passes = Vec::new();
    for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind = item
            .parse::<u8>()
            .ok()
            .and_then(PassKind::from_number)
            .with_context(|| format!("'{}' is not a pass number (1-4)", item))?;
        passes.push(kind);
    }
    if passes.is_empty() {
        bail!("No passes selected");
    }
    Ok(passes)
}

/// Trim, strip surrounding quotes (drag-and-drop paths) and fall back to
/// `default` when nothing is left.
pub fn clean_path_input(input: &str, default: &Path) -> PathBuf {
    let cleaned = input.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if cleaned.is_empty() {
        default.to_path_buf()
    } else {
        PathBuf::from(cleaned)
    }
}

/// Directory of the running executable, used when the prompt is left empty.
pub fn default_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

// ============================================================================
// Shell
// ============================================================================

pub struct Shell<'a, R> {
    ctx: &'a AppContext,
    input: R,
    default_dir: PathBuf,
    interactive: bool,
}

impl<'a> Shell<'a, io::StdinLock<'static>> {
    pub fn stdin(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            input: io::stdin().lock(),
            default_dir: default_dir(),
            interactive: true,
        }
    }
}

impl<'a, R: BufRead> Shell<'a, R> {
    /// Shell over arbitrary input, without screen clearing or pauses.
    pub fn with_input(ctx: &'a AppContext, input: R, default_dir: PathBuf) -> Self {
        Self {
            ctx,
            input,
            default_dir,
            interactive: false,
        }
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        // The first menu keeps startup warnings on screen
        let mut clear = false;
        loop {
            self.print_menu(clear)?;
            clear = true;
            let Some(line) = self.read_line("Choose an option: ")? else {
                return Ok(());
            };
            let Some(choice) = parse_menu_choice(&line) else {
                println!("{}", "Invalid option, try again.".red());
                clear = false;
                continue;
            };
            debug!(?choice, "Menu choice");
            match choice {
                MenuChoice::Exit => {
                    println!("{}", FAREWELL);
                    return Ok(());
                }
                MenuChoice::Pass(kind) => {
                    if !self.run_passes(&[kind])? {
                        return Ok(());
                    }
                }
                MenuChoice::RenameAndLyrics => {
                    if !self.run_passes(&[PassKind::Rename, PassKind::EmbedLyrics])? {
                        return Ok(());
                    }
                }
                MenuChoice::Combined => {
                    let Some(passes) = self.prompt_selection()? else {
                        return Ok(());
                    };
                    if !self.run_passes(&passes)? {
                        return Ok(());
                    }
                }
                MenuChoice::Download => {
                    if !self.download()? {
                        return Ok(());
                    }
                }
            }
            if !self.pause()? {
                return Ok(());
            }
        }
    }

    fn print_menu(&self, clear: bool) -> Result<()> {
        if clear && self.interactive {
            execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
                .context("Failed to clear the terminal")?;
        }
        println!("{}", BANNER.cyan());
        println!("  {}\n", TAGLINE.dim());
        for kind in PassKind::ALL {
            println!("  [{}] {}", kind.number(), capitalize(&kind.to_string()));
        }
        println!("  [5] Download a song");
        println!("  [6] Rename and embed lyrics");
        println!("  [7] Combined (choose passes)");
        println!("  [0] Exit\n");
        Ok(())
    }

    /// Print `prompt` and read one trimmed line. None on end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from standard input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Resolve the working directory: the configured one when it exists,
    /// otherwise a prompt that repeats until an existing directory is given.
    fn prompt_dir(&mut self) -> Result<Option<PathBuf>> {
        if let Some(dir) = &self.ctx.settings.dir {
            if dir.is_dir() {
                return Ok(Some(dir.clone()));
            }
            println!(
                "{}",
                format!("Configured folder '{}' is not a directory.", dir.display()).red()
            );
        }
        let prompt = format!(
            "Music folder (empty for {}): ",
            self.default_dir.display()
        );
        loop {
            let Some(line) = self.read_line(&prompt)? else {
                return Ok(None);
            };
            let dir = clean_path_input(&line, &self.default_dir);
            if dir.is_dir() {
                return Ok(Some(dir));
            }
            println!(
                "{}",
                format!("'{}' is not a directory, try again.", dir.display()).red()
            );
        }
    }

    fn prompt_selection(&mut self) -> Result<Option<Vec<PassKind>>> {
        loop {
            let Some(line) = self.read_line("Passes to run, comma separated (e.g. 1,3): ")? else {
                return Ok(None);
            };
            match parse_pass_selection(&line) {
                Ok(passes) => return Ok(Some(passes)),
                Err(e) => println!("{}", format!("{}, try again.", e).red()),
            }
        }
    }

    /// Returns false when input ended before the passes could start.
    fn run_passes(&mut self, selection: &[PassKind]) -> Result<bool> {
        let Some(dir) = self.prompt_dir()? else {
            return Ok(false);
        };
        let pipeline = Pipeline::new(dir, selection);
        let report = pipeline.run(self.ctx);

        println!();
        for run in &report.runs {
            match &run.outcome {
                Ok(result) => print_summary(run.kind, result),
                Err(e) => println!(
                    "{} {}: {:#}",
                    "✘".red(),
                    capitalize(&run.kind.to_string()),
                    e
                ),
            }
        }
        Ok(true)
    }

    fn download(&mut self) -> Result<bool> {
        let query = loop {
            let Some(line) = self.read_line("Song name or URL: ")? else {
                return Ok(false);
            };
            if !line.is_empty() {
                break line;
            }
            println!("{}", "Enter a song name or a URL.".red());
        };
        let Some(dir) = self.prompt_dir()? else {
            return Ok(false);
        };

        match download::run(self.ctx, &query, &dir) {
            Ok(report) => println!(
                "{} Saved '{}' ({} - {})",
                "✔".green(),
                report.path.display(),
                report.artist,
                report.title
            ),
            Err(e) => println!("{} {:#}", "✘".red(), e),
        }
        Ok(true)
    }

    fn pause(&mut self) -> Result<bool> {
        if !self.interactive {
            return Ok(true);
        }
        Ok(self
            .read_line("\nPress ENTER to return to the menu...")?
            .is_some())
    }
}

fn print_summary(kind: PassKind, result: &PassResult) {
    println!(
        "{} {}: {}",
        "■".cyan(),
        capitalize(&kind.to_string()),
        result.summary()
    );
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
