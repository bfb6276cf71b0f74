use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use autotype::document::{BufferDocument, Document};
use autotype::notify::ConsoleNotifier;
use autotype::session::{SessionOutcome, TypingConfig, TypingController};
use autotype::source::SourceFile;
use autotype::stats::source_stats;

const PROMPT_LABEL: &str = "Enter a file path to use with auto-type:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LanguageArg {
    /// Detect from the file extension.
    Auto,
    Plain,
    Javascript,
}

impl LanguageArg {
    fn language_name(self, input: &Path) -> String {
        match self {
            LanguageArg::Plain => "Plain Text".to_string(),
            LanguageArg::Javascript => "JavaScript".to_string(),
            LanguageArg::Auto => {
                let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("");
                if matches!(ext, "js" | "jsx" | "mjs" | "cjs") {
                    "JavaScript".to_string()
                } else {
                    "Plain Text".to_string()
                }
            }
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "autotype")]
#[command(about = "Human-like file retyping for live-coding demos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Retype a file into a console preview document
    Run {
        /// Input file to retype (prompted for when omitted)
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,

        /// Language mode for the preview document.
        #[arg(long, value_enum, default_value_t = LanguageArg::Auto)]
        language: LanguageArg,

        /// Optional RNG seed (for debugging)
        #[arg(long)]
        seed: Option<u64>,

        /// Disable console typing trace output
        #[arg(long)]
        no_trace: bool,
    },

    /// Print keystroke statistics for a file (JSON)
    Stats {
        /// Input file to analyze
        #[arg(long, value_name = "PATH")]
        input: PathBuf,
    },
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn prompt_for_path() -> Result<PathBuf> {
    eprint!("{PROMPT_LABEL} ");

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read a file path from stdin")?;

    let entered = line.trim();
    ensure!(!entered.is_empty(), "no file path entered");
    Ok(PathBuf::from(entered))
}

/// Write-through preview document: every mutation is echoed to stdout so the
/// terminal shows the typing live. Cursor-only moves produce no output, and
/// host-side assistance (auto-close) is not simulated here, so the echo
/// matches the buffer byte for byte.
struct ConsoleDocument {
    inner: BufferDocument,
}

impl ConsoleDocument {
    fn new(inner: BufferDocument) -> Self {
        Self { inner }
    }

    fn echo(&self, s: &str) {
        print!("{s}");
        io::stdout().flush().ok();
    }
}

impl Document for ConsoleDocument {
    fn language_name(&self) -> String {
        self.inner.language_name()
    }

    fn cursor_position(&self) -> (usize, usize) {
        self.inner.cursor_position()
    }

    fn line_at(&self, row_offset: isize) -> Option<String> {
        self.inner.line_at(row_offset)
    }

    fn insert_text(&mut self, text: &str) -> Result<()> {
        self.inner.insert_text(text)?;
        self.echo(text);
        Ok(())
    }

    fn insert_newline(&mut self) -> Result<()> {
        self.inner.insert_newline()?;
        self.echo("\n");
        Ok(())
    }

    fn move_to_beginning_of_line(&mut self) -> Result<()> {
        self.inner.move_to_beginning_of_line()
    }

    fn move_to_end_of_line(&mut self) -> Result<()> {
        self.inner.move_to_end_of_line()
    }

    fn move_down(&mut self, rows: usize) -> Result<()> {
        self.inner.move_down(rows)
    }

    fn delete_backward(&mut self, count: usize) -> Result<()> {
        self.inner.delete_backward(count)?;
        for _ in 0..count {
            self.echo("\x08 \x08");
        }
        Ok(())
    }
}

fn run_typing(
    input: Option<PathBuf>,
    language: LanguageArg,
    seed: Option<u64>,
    no_trace: bool,
) -> Result<()> {
    let path = match input {
        Some(path) => path,
        None => prompt_for_path()?,
    };
    let file = SourceFile::new(&path);

    let config = TypingConfig {
        trace: !no_trace,
        ..Default::default()
    };
    let controller = TypingController::new(config, ConsoleNotifier);

    let stop = controller.cancel_token();
    ctrlc::set_handler(move || stop.cancel()).context("failed to install Ctrl+C handler")?;

    if let Ok(content) = file.read() {
        let stats = source_stats(&content);
        eprintln!(
            "Typing: {} lines, {} paced keystrokes, ~{:.1}s. Ctrl+C stops.",
            stats.lines,
            stats.paced_keystrokes,
            stats.expected_ms as f64 / 1000.0
        );
    }

    let mut doc = ConsoleDocument::new(
        BufferDocument::new().with_language(language.language_name(&path)),
    );
    let mut rng = rng_from_seed(seed);

    let outcome = controller.start_from_file(&mut doc, &file, &mut rng);

    println!();
    match outcome {
        SessionOutcome::Completed => eprintln!("Done."),
        SessionOutcome::Cancelled => eprintln!("Stopped."),
        SessionOutcome::Failed => eprintln!("Session failed; see the log above."),
        SessionOutcome::Rejected => {}
    }

    Ok(())
}

fn print_stats(input: &Path) -> Result<()> {
    let content = SourceFile::new(input).read()?;
    let stats = source_stats(&content);

    let json = serde_json::to_string_pretty(&stats).context("failed to serialize stats")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            input,
            language,
            seed,
            no_trace,
        } => run_typing(input, language, seed, no_trace),
        Command::Stats { input } => print_stats(&input),
    }
}
