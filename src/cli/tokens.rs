use itertools::Itertools;
use serde::Serialize;
use structopt::StructOpt;

use super::{read_input, CmdError};
use crate::{
    ast::token::{Token, TokenKind},
    parse::tokenize_with_comments,
    span::source::{LineIndex, TextProvider},
};

#[derive(Debug, StructOpt)]
pub struct TokensOptions {
    #[structopt(name = "INPUT", help = "R source file, `-` reads standard input")]
    pub input: String,

    #[structopt(long, help = "Also list comments, in source order")]
    pub comments: bool,

    #[structopt(long, help = "Print tokens as JSON")]
    pub json: bool,
}

#[derive(Serialize)]
struct TokenRow<'a> {
    #[serde(flatten)]
    token: Token,
    text: &'a str,
}

pub(super) fn action(options: TokensOptions) -> Result<bool, CmdError> {
    let src = read_input(&options.input)?;
    let (tokens, comments) = tokenize_with_comments(&src);
    log::info!("{} tokens, {} comments", tokens.len(), comments.len());

    let mut all = tokens.iter().copied().collect::<Vec<_>>();
    if options.comments {
        all = all
            .into_iter()
            .merge_by(comments.into_iter(), |a, b| a.span.start <= b.span.start)
            .collect();
    }

    if options.json {
        let rows = all
            .iter()
            .map(|tok| TokenRow {
                token: *tok,
                text: src.text(tok.span),
            })
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        let lines = LineIndex::new(&src);
        for tok in all.iter() {
            println!("{}", format_token(tok, src.text(tok.span), &lines));
        }
    }

    Ok(!all.iter().any(|t| t.kind == TokenKind::Unknown))
}

fn format_token(tok: &Token, text: &str, lines: &LineIndex) -> String {
    format!(
        "{:<8} {:<14} {:?}",
        lines.pos(tok.span.start).to_string(),
        tok.kind.desc(),
        text
    )
}

#[cfg(test)]
mod tokens_cmd_tests {
    use super::format_token;
    use crate::{
        ast::token::{Token, TokenKind},
        span::{source::LineIndex, Span},
    };

    #[test]
    fn token_rows() {
        let src = "x <- 1\ny";
        let lines = LineIndex::new(src);
        let tok = Token::new(TokenKind::Identifier, Span::new(7, 8));
        let row = format_token(&tok, "y", &lines);
        assert!(row.starts_with("2:1 "));
        assert!(row.ends_with("\"y\""));
    }
}
