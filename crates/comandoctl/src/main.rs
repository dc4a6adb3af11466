//! Comando Control - interactive command interpreter
//!
//! Reads utterances from the terminal and shows how they were interpreted.

mod display;

use anyhow::Result;
use clap::Parser;
use comando_common::{Autotokenizer, ComandoConfig, PromptResolver};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Version is embedded at build time
const VERSION: &str = env!("COMANDO_VERSION");

/// Words that end the interactive session
const EXIT_WORDS: &[&str] = &["sair", "exit", "quit"];

#[derive(Parser)]
#[command(name = "comandoctl")]
#[command(about = "Comando - natural-language command interpreter", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Configuration file (overrides $COMANDO_CONFIG and the default locations)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to ~/.config/comando/config.toml and exit
    #[arg(long)]
    save_config: bool,

    /// Verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Utterance to interpret once; starts an interactive session when omitted
    text: Vec<String>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("COMANDO_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn is_exit(line: &str) -> bool {
    let lower = line.trim().to_lowercase();
    EXIT_WORDS.contains(&lower.as_str())
}

fn show(result: &comando_common::TokenizedCommand, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        display::print_result(result);
    }
    Ok(())
}

fn run_repl(pipeline: &mut Autotokenizer<'_>, json: bool) -> Result<()> {
    let stdin = io::stdin();
    loop {
        print!("Você: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            println!();
            break;
        }

        if is_exit(&line) {
            println!("Encerrando o chat. Até logo!");
            break;
        }

        let result = pipeline.autotokenize(line.trim_end_matches(&['\r', '\n'][..]));
        show(&result, json)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ComandoConfig::load(cli.config.as_deref())?;
    info!(
        "comandoctl v{} using data in {}",
        VERSION,
        config.paths.data_dir.display()
    );

    if cli.save_config {
        config.save()?;
        if let Some(path) = ComandoConfig::user_config_path() {
            println!("Configuração salva em {}", path.display());
        }
        return Ok(());
    }

    let mut pipeline = Autotokenizer::from_config(&config, PromptResolver::stdio());

    if cli.text.is_empty() {
        run_repl(&mut pipeline, cli.json)
    } else {
        let result = pipeline.autotokenize(&cli.text.join(" "));
        show(&result, cli.json)
    }
}
