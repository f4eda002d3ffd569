use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use podcast_wizard::api::{resolve_audio_url, HttpBackend, PodcastBackend};
use podcast_wizard::config::Config;
use podcast_wizard::script::format_dialogue;

mod app;
mod logging;

use app::App;

#[derive(Parser)]
#[command(name = "podwiz")]
#[command(about = "Turn daily news into a two-host podcast, one step at a time")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Backend address, overrides api.base_url
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print today's news as plain text
    News,

    /// Generate an outline from news content
    Outline {
        /// Read content from FILE instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Generate interview questions from news content
    Questions {
        /// Read content from FILE instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Generate the podcast script from an outline and questions
    Script {
        #[arg(long)]
        outline: PathBuf,

        #[arg(long)]
        questions: PathBuf,

        /// Print the script exactly as the backend returned it
        #[arg(long)]
        raw: bool,
    },

    /// Voice a script and print the audio URL
    Audio {
        /// Read the script from FILE instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Write the default configuration to ./podcast-wizard.toml
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::News) => {
            let backend = backend(&config)?;
            println!("{}", backend.fetch_daily_news().await?);
        }
        Some(Commands::Outline { input }) => {
            let content = read_input(input.as_deref())?;
            let backend = backend(&config)?;
            println!("{}", backend.generate_outline(&content).await?);
        }
        Some(Commands::Questions { input }) => {
            let content = read_input(input.as_deref())?;
            let backend = backend(&config)?;
            println!("{}", backend.generate_questions(&content).await?);
        }
        Some(Commands::Script {
            outline,
            questions,
            raw,
        }) => {
            cmd_script(&config, &outline, &questions, raw).await?;
        }
        Some(Commands::Audio { input }) => {
            let script = read_input(input.as_deref())?;
            if script.trim().is_empty() {
                bail!("script is empty");
            }
            let backend = backend(&config)?;
            let file = backend.generate_audio(&script).await?;
            println!("{}", resolve_audio_url(backend.base_url(), &file));
        }
        Some(Commands::InitConfig { force }) => {
            cmd_init_config(force)?;
        }
        None => {
            run_tui(config, logging_handle.log_file_path).await?;
        }
    }

    Ok(())
}

fn backend(config: &Config) -> Result<HttpBackend> {
    Ok(HttpBackend::new(&config.api)?)
}

/// Read FILE, or stdin when no file is given
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

async fn cmd_script(config: &Config, outline: &Path, questions: &Path, raw: bool) -> Result<()> {
    let outline = read_input(Some(outline))?;
    let questions = read_input(Some(questions))?;
    if outline.is_empty() || questions.is_empty() {
        bail!("both the outline and the questions are required");
    }

    let script = backend(config)?
        .generate_script(&outline, &questions)
        .await?;
    if raw || !config.script.format_dialogue {
        println!("{script}");
    } else {
        println!("{}", format_dialogue(&script, &config.script.speakers));
    }
    Ok(())
}

fn cmd_init_config(force: bool) -> Result<()> {
    let path = Config::local_config_path();
    Config::write_default(&path, force)?;
    println!("Wrote {}", path.display());
    Ok(())
}

async fn run_tui(config: Config, log_file_path: Option<PathBuf>) -> Result<()> {
    let app = App::new(config)?;
    let result = app.run().await;

    if let Some(log_path) = log_file_path {
        if log_path.metadata().map(|m| m.len() > 0).unwrap_or(false) {
            eprintln!("Session log: {}", log_path.display());
        }
    }

    result.map(|_| ())
}
