use colored::{Color, ColoredString, Colorize};
use log::Level;
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use structopt::StructOpt;

mod parse;
mod tokens;

pub use parse::{OutputFormat, ParseCmdOptions};
pub use tokens::TokensOptions;

#[derive(Debug, StructOpt)]
#[structopt(name = "rsyntax", about = "error tolerant parser for R sources")]
pub struct Cli {
    #[structopt(
        long, env = "LOG_LEVEL",
        help = "Sets the log level",
        default_value = "warn",
        possible_values = &["off", "error", "warn", "info", "debug", "trace"],
        global = true
    )]
    log_level: log::LevelFilter,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Parse a file and print its tree and diagnostics
    Parse(ParseCmdOptions),
    /// Print the token stream of a file
    Tokens(TokensOptions),
}

pub struct CmdError {
    msg: String,
}

impl<E: Error> From<E> for CmdError {
    fn from(e: E) -> Self {
        CmdError { msg: e.to_string() }
    }
}

/// Reads `path`, or standard input when it is `-`.
fn read_input(path: &str) -> Result<String, CmdError> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn display_name(path: &str) -> String {
    if path == "-" {
        str!("<stdin>")
    } else {
        str!(path)
    }
}

pub fn run() {
    // get the subcommand
    let cli: Cli = Cli::from_args();

    // set up logging
    let logger = fern::Dispatch::new()
        .format(move |out, message, record| {
            let level = record.level();
            let color = match level {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Blue,
                Level::Debug => Color::Magenta,
                Level::Trace => Color::Green,
            };
            out.finish(format_args!(
                "{} {}",
                ColoredString::from((level.to_string().to_lowercase() + ":").as_str())
                    .color(color)
                    .to_string(),
                message
            ))
        })
        .level(cli.log_level)
        .chain(io::stderr())
        .apply();
    if let Err(err) = logger {
        eprintln!("{} {}", "could not set up logging:".red(), err);
    }

    let result = match cli.cmd {
        Command::Parse(options) => parse::action(options),
        Command::Tokens(options) => tokens::action(options),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{} {}", "error:".red(), err.msg);
            std::process::exit(2)
        }
    }
}
