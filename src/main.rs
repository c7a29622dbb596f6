use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use loxparse::token::Token;
use loxparse::{stream, Parser, Program};

/// Exit status when the parser reported at least one diagnostic.
const EXIT_PARSE_ERROR: i32 = 65;

#[derive(ClapParser, Debug)]
#[command(version, about = "Parser for a small Lox-style scripting language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to loxparse.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parses a JSON token stream and prints the syntax tree as JSON
    Parse { filename: Option<PathBuf> },

    /// Parses a JSON token stream and only reports diagnostics
    Check { filename: Option<PathBuf> },
}

/// Reads the token stream from a file, or from stdin when no file is given.
fn read_tokens(filename: Option<PathBuf>) -> Result<Vec<Token>> {
    match filename {
        Some(filename) => {
            info!("Reading file: {:?}", filename);

            let file =
                File::open(&filename).context(format!("Failed to open file {:?}", filename))?;

            stream::from_reader(BufReader::new(file))
                .context(format!("Failed to load tokens from {:?}", filename))
        }

        None => {
            info!("Reading tokens from stdin");

            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;

            stream::from_slice(&buf).context("Failed to load tokens from stdin")
        }
    }
}

fn init_logger() -> Result<()> {
    let log_file = File::create("loxparse.log").context("Failed to create loxparse.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("loxparse::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env() // RUST_LOG overrides the default level
        .init();

    info!("Logger initialized, writing to loxparse.log");
    Ok(())
}

fn report(program: &Program<'_>) {
    for error in &program.errors {
        debug!("Parse debug: {:?}", error);
        eprintln!("{}", error);
    }
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let failed = match args.commands {
        Commands::Parse { filename } => {
            info!("Running Parse subcommand");

            let tokens = read_tokens(filename)?;
            let program = Parser::new(&tokens)?.parse();

            let tree = serde_json::to_string_pretty(&program.statements)
                .context("Failed to serialize syntax tree")?;
            println!("{}", tree);

            report(&program);
            program.has_errors()
        }

        Commands::Check { filename } => {
            info!("Running Check subcommand");

            let tokens = read_tokens(filename)?;
            let program = Parser::new(&tokens)?.parse();

            report(&program);

            if !program.has_errors() {
                println!("ok: {} declaration(s)", program.statements.len());
            }
            program.has_errors()
        }
    };

    if failed {
        debug!("Parsing reported errors, exiting with code {}", EXIT_PARSE_ERROR);
        std::process::exit(EXIT_PARSE_ERROR);
    }

    info!("Completed successfully");
    Ok(())
}
