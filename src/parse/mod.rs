pub mod lexer;
mod parser;

pub use lexer::{tokenize, tokenize_with_comments, Lexer};
pub use parser::{ParseContext, ParseOptions, Parser, Restrictions};

use crate::{
    ast::{token::TokenList, Ast},
    span::source::TextProvider,
};

/// Builds the tree for a whole file from an already tokenized buffer.
pub fn parse<T: TextProvider + ?Sized>(text: &T, tokens: &TokenList, options: &ParseOptions) -> Ast {
    Parser::new(text.full_text(), tokens, options).parse_file()
}

/// Parses a single expression, for tooling that works on fragments.
pub fn parse_expression<T: TextProvider + ?Sized>(
    text: &T,
    tokens: &TokenList,
    options: &ParseOptions,
) -> Ast {
    Parser::new(text.full_text(), tokens, options).parse_single_expression()
}

/// Tokenizes and parses `src` with default options.
pub fn parse_source(src: &str) -> Ast {
    parse_source_with(src, &ParseOptions::default())
}

pub fn parse_source_with(src: &str, options: &ParseOptions) -> Ast {
    let (tokens, comments) = tokenize_with_comments(src);
    let mut ast = parse(src, &tokens, options);
    ast.set_comments(comments);
    ast
}
