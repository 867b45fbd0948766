use std::{fs, path::PathBuf, str::FromStr, time::Instant};

use structopt::StructOpt;

use super::{display_name, read_input, CmdError};
use crate::{
    parse::{parse_source_with, ParseOptions},
    span::source::LineIndex,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Tree,
    Sexpr,
    Json,
    None,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tree" => Ok(OutputFormat::Tree),
            "sexpr" => Ok(OutputFormat::Sexpr),
            "json" => Ok(OutputFormat::Json),
            "none" => Ok(OutputFormat::None),
            _ => Err(format!("unknown output format `{}`", s)),
        }
    }
}

#[derive(Debug, StructOpt)]
pub struct ParseCmdOptions {
    #[structopt(name = "INPUT", help = "R source file, `-` reads standard input")]
    pub input: String,

    #[structopt(
        long,
        help = "How to print the tree",
        default_value = "tree",
        possible_values = &["tree", "sexpr", "json", "none"]
    )]
    pub format: OutputFormat,

    #[structopt(long, help = "JSON file with parse options")]
    pub config: Option<PathBuf>,

    #[structopt(long, help = "Maximum nesting depth before giving up on a construct")]
    pub max_depth: Option<usize>,

    #[structopt(long, help = "Do not warn about empty trailing call arguments")]
    pub no_empty_argument_warnings: bool,
}

impl ParseCmdOptions {
    /// Options from `--config` if given, then overridden by flags.
    pub fn parse_options(&self) -> Result<ParseOptions, CmdError> {
        let mut options = match &self.config {
            Some(path) => {
                log::debug!("reading parse options from {}", path.display());
                let text = fs::read_to_string(path)?;
                serde_json::from_str(&text)?
            }
            None => ParseOptions::default(),
        };
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        if self.no_empty_argument_warnings {
            options.warn_empty_arguments = false;
        }
        Ok(options)
    }
}

/// Returns `false` when any error (not warning) was reported.
pub(super) fn action(options: ParseCmdOptions) -> Result<bool, CmdError> {
    let start_time = Instant::now();
    let parse_options = options.parse_options()?;
    let src = read_input(&options.input)?;
    let filepath = display_name(&options.input);
    log::info!("parsing {} ({} bytes)", filepath, src.len());

    let ast = parse_source_with(&src, &parse_options);
    match options.format {
        OutputFormat::Tree => print!("{}", ast.dump()),
        OutputFormat::Sexpr => println!("{}", ast.sexpr(ast.root())),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ast)?),
        OutputFormat::None => {}
    }

    let lines = LineIndex::new(&src);
    for err in ast.errors() {
        err.emit(&filepath, &src, &lines);
    }

    let elapsed = start_time.elapsed();
    log::info!(
        "built {} nodes with {} diagnostics in {:?}",
        ast.len(),
        ast.errors().len(),
        elapsed
    );
    Ok(!ast.has_errors())
}

#[cfg(test)]
mod parse_cmd_tests {
    use std::str::FromStr;

    use super::OutputFormat;
    use crate::parse::ParseOptions;

    #[test]
    fn output_formats() {
        assert_eq!(OutputFormat::from_str("sexpr"), Ok(OutputFormat::Sexpr));
        assert!(OutputFormat::from_str("xml").is_err());
    }

    #[test]
    fn options_from_json_fill_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{ "max_depth": 32 }"#).unwrap();
        assert_eq!(options.max_depth, 32);
        assert!(options.warn_empty_arguments);
    }
}
