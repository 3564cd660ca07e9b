use anyhow::Result;
use clap::{Parser, Subcommand};
use sheetchat::{export, logging, parser, replay, tui};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sheetchat")]
#[command(version = env!("SHEETCHAT_VERSION"))]
#[command(about = "Render streamed AI analysis responses as progressive terminal UI")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a captured response file and print the rendered blocks
    Render {
        /// Response document (JSON)
        file: PathBuf,
    },

    /// Replay a captured response chunk-by-chunk in the TUI
    Replay {
        /// Capture file: a response document or a chunk timeline
        file: PathBuf,
        /// Prompt line shown above the response
        #[arg(short, long, default_value = "replayed response")]
        prompt: String,
    },

    /// Render a complete response to a markdown report on stdout
    Export {
        /// Response document (JSON)
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    logging::cleanup_old_logs();
    logging::info("sheetchat starting");

    let args = Args::parse();

    match args.command {
        Command::Render { file } => render(&file).await,
        Command::Replay { file, prompt } => replay_tui(&file, &prompt).await,
        Command::Export { file } => export_report(&file).await,
    }
}

/// One-shot parse and plain print of a response file
async fn render(file: &PathBuf) -> Result<()> {
    let content = tokio::fs::read_to_string(file).await?;
    let result = parser::parse_response(&content);

    if let Some(error) = &result.error {
        anyhow::bail!("{}", error);
    }
    if !result.is_complete {
        logging::warn(&format!("{} is not a complete response", file.display()));
        eprintln!("note: capture is incomplete; showing extracted blocks only");
    }

    for block in &result.blocks {
        for line in tui::render::render_block(block) {
            println!("{}", line);
        }
        println!();
    }
    Ok(())
}

/// Stream a capture through the TUI
async fn replay_tui(file: &PathBuf, prompt: &str) -> Result<()> {
    let events = replay::load(file).await?;
    let chunks = replay::stream_events(events);

    let mut terminal = ratatui::init();
    let mut app = tui::App::new();
    let result = app.run(&mut terminal, prompt, chunks).await;
    ratatui::restore();
    result
}

/// Print the markdown report for a complete response
async fn export_report(file: &PathBuf) -> Result<()> {
    let content = tokio::fs::read_to_string(file).await?;
    let result = parser::parse_response(&content);

    if let Some(error) = &result.error {
        anyhow::bail!("{}", error);
    }
    if !result.is_complete {
        anyhow::bail!("capture is incomplete; only complete responses can be exported");
    }

    print!("{}", export::render_report(&result.blocks));
    Ok(())
}
