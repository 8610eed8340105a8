use clap::{Parser as ClapParser, Subcommand};
use jack_analyzer::config::{Config, OutputFormat};
use jack_analyzer::driver::{analyze_path, render_tokens, render_unit};
use jack_analyzer::error::CompilerError;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(author, version, about = "Jack syntax analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a .jack file, or every .jack file in a directory
    Analyze {
        /// File or directory to analyze
        path: PathBuf,
        /// Write outputs here instead of next to each source file
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Output format for the parse
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Also write the flat token listing for each unit
        #[arg(long)]
        tokens: bool,
        /// Print the parse of a single file to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
        /// Report each file as it is processed
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the token listing of a file
    Tokens {
        /// Source file
        file: PathBuf,
    },
    /// Manage analyzer configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a config file with defaults
    Init,
    /// Print where the config file is read from
    Path,
}

fn run(cli: Cli) -> Result<bool, CompilerError> {
    let mut config = Config::load()?;

    match cli.command {
        Commands::Analyze {
            path,
            out_dir,
            format,
            tokens,
            stdout,
            verbose,
        } => {
            if let Some(format) = format {
                config.format = format;
            }
            config.emit_tokens |= tokens;
            config.verbose |= verbose;

            if stdout {
                let source = fs::read_to_string(&path)?;
                let rendered = render_unit(&source, &path, &config)?;
                io::stdout().write_all(&rendered)?;
                return Ok(true);
            }

            let summary = analyze_path(&path, out_dir.as_deref(), &config)?;
            if config.verbose {
                for written in &summary.written {
                    eprintln!("Wrote {}", written.display());
                }
            }
            for (file, error) in &summary.failed {
                eprintln!("Error in {}:\n{}", file.display(), error);
            }
            Ok(summary.failed.is_empty())
        }
        Commands::Tokens { file } => {
            let source = fs::read_to_string(&file)?;
            let rendered = render_tokens(&source, &file, &config)?;
            io::stdout().write_all(&rendered)?;
            Ok(true)
        }
        Commands::Config { command } => {
            match command {
                ConfigCommands::Show => {
                    let contents = serde_json::to_string_pretty(&config)
                        .map_err(|e| CompilerError::Config(e.to_string()))?;
                    println!("{}", contents);
                }
                ConfigCommands::Init => {
                    let config_path = Config::get_config_path();
                    if config_path.exists() {
                        println!("Config file already exists at: {}", config_path.display());
                    } else {
                        Config::default().save()?;
                        println!("Initialized new config file at: {}", config_path.display());
                    }
                }
                ConfigCommands::Path => {
                    println!("{}", Config::get_config_path().display());
                }
            }
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
