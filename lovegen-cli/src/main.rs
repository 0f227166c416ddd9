use clap::{Parser, Subcommand};
use log::debug;
use lovegen_config::{Config, ConfigSource, Settings, load};
use lovegen_utils::trimmed_or_none;
use std::io::{self, Write};
use std::process::ExitCode;

mod error;
mod exit_codes;
mod scaffold;

use error::LovegenError;
use scaffold::{Scaffolded, run_scaffold};

const SEPARATOR: &str = "--------------------------------------";

/// lovegen CLI entry point.
///
/// lovegen asks Gemini to write a playable Love2D `main.lua` from a one-line
/// game concept such as "a cat collects fish and avoids a patrolling dog".
#[derive(Parser, Debug, Clone)]
#[command(
    name = "lovegen",
    author,
    version,
    about = "Generate Love2D game code from a short game concept.",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Generate main.lua for a game concept using Gemini.
    Scaffold {
        /// The game concept to build.
        #[arg(long, value_name = "TEXT")]
        prompt: String,
    },
    /// Create a new game workspace.
    Init,
    /// Break a game concept down into entities and assets.
    Plan,
    /// Produce sprites with an external sprite editor.
    GenerateAssets,
    /// Launch the generated game.
    Run,
    /// Package the generated game.
    Build,
    /// Upload the packaged game.
    Publish,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Scaffold { .. } => "scaffold",
            Command::Init => "init",
            Command::Plan => "plan",
            Command::GenerateAssets => "generate-assets",
            Command::Run => "run",
            Command::Build => "build",
            Command::Publish => "publish",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {path:?}"),
        Err(error) => debug!("No .env file loaded ({error})"),
    }

    let context = load_settings();

    for warning in &context.warnings {
        println!("{warning}");
    }

    let mut stdout = io::stdout().lock();
    match dispatch(&cli.command, &context.settings, &mut stdout) {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("Error: failed to write output ({error}).");
            ExitCode::from(exit_codes::IO_ERROR)
        }
    }
}

#[derive(Debug)]
struct StartupContext {
    settings: Settings,
    warnings: Vec<String>,
}

fn load_settings() -> StartupContext {
    let mut warnings = Vec::new();

    let config = match load() {
        Ok(loaded) => {
            if let ConfigSource::File(path) = &loaded.source {
                debug!("Using configuration from {}", path.display());
            }
            loaded.config
        }
        Err(error) => {
            warnings.push(format!(
                "Warning: failed to load lovegen configuration ({error}). Falling back to defaults."
            ));
            Config::default()
        }
    };

    StartupContext {
        settings: Settings::from_config(&config),
        warnings,
    }
}

fn dispatch<W: Write>(command: &Command, settings: &Settings, out: &mut W) -> io::Result<u8> {
    match command {
        Command::Scaffold { prompt } => handle_scaffold(prompt, settings, out, run_scaffold),
        other => {
            let error = LovegenError::NotImplemented(other.name());
            write_lines(out, &error.report())?;
            Ok(error.exit_code())
        }
    }
}

fn handle_scaffold<W, F>(prompt: &str, settings: &Settings, out: &mut W, generate: F) -> io::Result<u8>
where
    W: Write,
    F: FnOnce(&str, &Settings) -> error::Result<Scaffolded>,
{
    writeln!(out, "--- Running scaffold (AI code generation) ---")?;

    if trimmed_or_none(Some(prompt)).is_none() {
        writeln!(
            out,
            "Error: No prompt provided for scaffolding. Use --prompt 'your game concept'."
        )?;
        writeln!(out, "{SEPARATOR}")?;
        return Ok(exit_codes::USAGE_ERROR);
    }

    writeln!(out, "Game concept: {prompt}")?;
    writeln!(out, "Sending prompt to Gemini ({})...", settings.model)?;
    writeln!(out, "Waiting for Gemini to generate code...")?;
    out.flush()?;

    match generate(prompt, settings) {
        Ok(scaffolded) => {
            writeln!(out, "--- Generated Lua code (main.lua) ---")?;
            writeln!(out, "{}", scaffolded.code)?;
            writeln!(out, "{SEPARATOR}")?;
            writeln!(
                out,
                "Successfully saved generated code to: {}",
                scaffolded.project.main_file.display()
            )?;
            writeln!(
                out,
                "Add sprites under {}, then run 'love .' from {}",
                scaffolded.project.assets_dir.display(),
                settings.output_dir.display()
            )?;
            writeln!(out, "{SEPARATOR}")?;
            Ok(exit_codes::SUCCESS)
        }
        Err(error) => {
            writeln!(out, "Failed to generate Lua code.")?;
            write_lines(out, &error.report())?;
            writeln!(out, "{SEPARATOR}")?;
            Ok(error.exit_code())
        }
    }
}

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
