use crate::{
    ast::token::{Keyword, Token, TokenKind, TokenList},
    span::Span,
};

/// Operators in longest-match order.
const OPERATORS: &[&str] = &[
    "<<-", "->>", ":::", "<-", "->", "<=", ">=", "==", "!=", "&&", "||", "::", "|>", ":=", "**",
    "+", "-", "*", "/", "^", "<", ">", "!", "&", "|", "~", "?", ":", "=", "$", "@", "\\",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Bracket {
    Paren,
    Curly,
    Single,
    Double,
}

fn is_valid_id_start(c: char) -> bool {
    c.is_alphabetic() || c == '.'
}

fn is_valid_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Splits R source into tokens. Whitespace is skipped, comments are kept
/// on a side list, and every byte of input ends up in some token or in the
/// gaps between them.
pub struct Lexer<'src> {
    src: &'src str,
    offset: usize,
    brackets: Vec<Bracket>,
    comments: Vec<Token>,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Lexer<'src> {
        Lexer {
            src,
            offset: 0,
            brackets: vec![],
            comments: vec![],
        }
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.src.len()
    }

    fn rest(&self) -> &'src str {
        &self.src[self.offset..]
    }

    fn first(&self) -> char {
        self.rest().chars().next().unwrap_or('\0')
    }

    fn second(&self) -> char {
        self.rest().chars().nth(1).unwrap_or('\0')
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.rest().chars().next()?;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    fn next_char_while(&mut self, mut f: impl FnMut(char) -> bool) {
        while !self.is_eof() && f(self.first()) {
            self.next_char();
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, Span::new(start, self.offset))
    }

    /// Produces the next non-comment token, `EndOfStream` once the input
    /// is exhausted.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.next_char_while(|c| c.is_whitespace());
            if self.is_eof() {
                return Token::end_of_stream(self.src.len());
            }
            if self.first() == '#' {
                let start = self.offset;
                self.next_char_while(|c| c != '\n' && c != '\r');
                let comment = self.token(TokenKind::Comment, start);
                self.comments.push(comment);
                continue;
            }
            return self.scan();
        }
    }

    fn scan(&mut self) -> Token {
        let start = self.offset;
        let c = self.first();
        let kind = match c {
            '(' => self.open(Bracket::Paren, TokenKind::OpenParen),
            '{' => self.open(Bracket::Curly, TokenKind::OpenCurly),
            ')' => self.close(Bracket::Paren, TokenKind::CloseParen),
            '}' => self.close(Bracket::Curly, TokenKind::CloseCurly),
            '[' => {
                if self.second() == '[' {
                    self.next_char();
                    self.open(Bracket::Double, TokenKind::OpenDoubleBracket)
                } else {
                    self.open(Bracket::Single, TokenKind::OpenBracket)
                }
            }
            ']' => {
                if self.brackets.last() == Some(&Bracket::Double) && self.second() == ']' {
                    self.next_char();
                    self.close(Bracket::Double, TokenKind::CloseDoubleBracket)
                } else {
                    self.close(Bracket::Single, TokenKind::CloseBracket)
                }
            }
            ',' => {
                self.next_char();
                TokenKind::Comma
            }
            ';' => {
                self.next_char();
                TokenKind::Semicolon
            }
            '"' | '\'' => {
                self.next_char();
                self.quoted_string(c);
                TokenKind::String
            }
            '`' => {
                self.next_char();
                if self.quoted_string('`') {
                    TokenKind::Identifier
                } else {
                    TokenKind::Unknown
                }
            }
            'r' | 'R' if matches!(self.second(), '"' | '\'') => {
                self.raw_string();
                TokenKind::String
            }
            '%' => self.custom_operator(),
            c if c.is_ascii_digit() => self.number(),
            '.' if self.second().is_ascii_digit() => self.number(),
            c if is_valid_id_start(c) => self.ident_or_keyword(),
            _ => match OPERATORS.iter().find(|op| self.rest().starts_with(*op)) {
                Some(op) => {
                    self.offset += op.len();
                    if *op == "\\" {
                        TokenKind::Keyword
                    } else {
                        TokenKind::Operator
                    }
                }
                None => {
                    self.next_char();
                    TokenKind::Unknown
                }
            },
        };
        self.token(kind, start)
    }

    fn open(&mut self, bracket: Bracket, kind: TokenKind) -> TokenKind {
        self.next_char();
        self.brackets.push(bracket);
        kind
    }

    fn close(&mut self, bracket: Bracket, kind: TokenKind) -> TokenKind {
        self.next_char();
        if self.brackets.last() == Some(&bracket) {
            self.brackets.pop();
        }
        kind
    }

    /// Consumes up to and including the closing quote. The opening quote is
    /// already consumed. Returns whether the closing quote was found.
    fn quoted_string(&mut self, quote: char) -> bool {
        while let Some(ch) = self.next_char() {
            match ch {
                c if c == quote => return true,
                '\\' => {
                    self.next_char();
                }
                _ => {}
            }
        }
        false
    }

    fn raw_string(&mut self) {
        // r or R
        self.next_char();
        let quote = self.next_char().unwrap_or('"');
        let dashes = self.rest().chars().take_while(|c| *c == '-').count();
        self.offset += dashes;
        let close = match self.first() {
            '(' => ')',
            '[' => ']',
            '{' => '}',
            _ => {
                // not a valid raw string opener, treat the rest as a plain string
                self.quoted_string(quote);
                return;
            }
        };
        self.next_char();
        let terminator = format!("{}{}{}", close, "-".repeat(dashes), quote);
        match self.rest().find(&terminator) {
            Some(idx) => self.offset += idx + terminator.len(),
            None => self.offset = self.src.len(),
        }
    }

    fn custom_operator(&mut self) -> TokenKind {
        self.next_char();
        let rest = self.rest();
        let line_end = rest.find(|c| c == '\n' || c == '\r').unwrap_or(rest.len());
        match rest[..line_end].find('%') {
            Some(idx) => {
                self.offset += idx + 1;
                TokenKind::Operator
            }
            None => TokenKind::Unknown,
        }
    }

    fn number(&mut self) -> TokenKind {
        if self.first() == '0' && matches!(self.second(), 'x' | 'X') {
            self.offset += 2;
            self.next_char_while(|c| c.is_ascii_hexdigit());
        } else {
            self.next_char_while(|c| c.is_ascii_digit());
            if self.first() == '.' {
                self.next_char();
                self.next_char_while(|c| c.is_ascii_digit());
            }
            if matches!(self.first(), 'e' | 'E') {
                let sign = matches!(self.second(), '+' | '-');
                let digit_at = if sign { 2 } else { 1 };
                if self
                    .rest()
                    .chars()
                    .nth(digit_at)
                    .map_or(false, |c| c.is_ascii_digit())
                {
                    self.offset += digit_at;
                    self.next_char_while(|c| c.is_ascii_digit());
                }
            }
        }
        match self.first() {
            'L' => {
                self.next_char();
                TokenKind::Number
            }
            'i' => {
                self.next_char();
                TokenKind::Complex
            }
            _ => TokenKind::Number,
        }
    }

    fn ident_or_keyword(&mut self) -> TokenKind {
        let start = self.offset;
        self.next_char_while(is_valid_id_char);
        let id = &self.src[start..self.offset];
        match id {
            "..." => TokenKind::Ellipsis,
            "TRUE" | "FALSE" => TokenKind::Logical,
            "NULL" => TokenKind::Null,
            "NA" | "NA_integer_" | "NA_real_" | "NA_character_" | "NA_complex_" => {
                TokenKind::Missing
            }
            "Inf" => TokenKind::Infinity,
            "NaN" => TokenKind::NaN,
            _ if Keyword::from_lexeme(id).is_some() => TokenKind::Keyword,
            _ => TokenKind::Identifier,
        }
    }

    pub fn comments(&self) -> &[Token] {
        &self.comments
    }

    pub fn into_comments(self) -> Vec<Token> {
        self.comments
    }
}

/// Tokenizes `src`, returning the token list and the comments found.
pub fn tokenize_with_comments(src: &str) -> (TokenList, Vec<Token>) {
    let mut lexer = Lexer::new(src);
    let mut tokens = vec![];
    loop {
        let token = lexer.next_token();
        let is_eof = token.is_end_of_stream();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    (TokenList::new(tokens), lexer.into_comments())
}

pub fn tokenize(src: &str) -> TokenList {
    tokenize_with_comments(src).0
}

#[cfg(test)]
mod lexer_tests {
    use super::{tokenize, tokenize_with_comments};
    use crate::ast::token::TokenKind;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).iter().map(|t| t.kind).collect()
    }

    fn lexemes(src: &str) -> Vec<&str> {
        tokenize(src)
            .iter()
            .map(|t| &src[t.span.start..t.span.end])
            .collect()
    }

    #[test]
    fn assignment_and_call() {
        assert_eq!(
            lexemes("x <- f(a, b = 1L)"),
            vec!["x", "<-", "f", "(", "a", ",", "b", "=", "1L", ")"]
        );
        assert_eq!(
            kinds("x <- f(a)"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::Identifier,
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn operators_take_the_longest_match() {
        assert_eq!(
            lexemes("a<<-b->>c:::d%in%e|>f**g<=h"),
            vec![
                "a", "<<-", "b", "->>", "c", ":::", "d", "%in%", "e", "|>", "f", "**", "g", "<=",
                "h"
            ]
        );
        assert_eq!(lexemes("x<-1"), vec!["x", "<-", "1"]);
        assert_eq!(lexemes("x < -1"), vec!["x", "<", "-", "1"]);
    }

    #[test]
    fn double_brackets_follow_the_open_stack() {
        assert_eq!(
            kinds("x[[1]]"),
            vec![
                TokenKind::Identifier,
                TokenKind::OpenDoubleBracket,
                TokenKind::Number,
                TokenKind::CloseDoubleBracket,
            ]
        );
        assert_eq!(
            kinds("x[y[1]]"),
            vec![
                TokenKind::Identifier,
                TokenKind::OpenBracket,
                TokenKind::Identifier,
                TokenKind::OpenBracket,
                TokenKind::Number,
                TokenKind::CloseBracket,
                TokenKind::CloseBracket,
            ]
        );
        assert_eq!(
            kinds("x[[y[1]]]"),
            vec![
                TokenKind::Identifier,
                TokenKind::OpenDoubleBracket,
                TokenKind::Identifier,
                TokenKind::OpenBracket,
                TokenKind::Number,
                TokenKind::CloseBracket,
                TokenKind::CloseDoubleBracket,
            ]
        );
    }

    #[test]
    fn literals() {
        assert_eq!(
            kinds("1 1.5e-3 0xFF .5 2i 3L TRUE NULL NA_real_ Inf NaN ..."),
            vec![
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Complex,
                TokenKind::Number,
                TokenKind::Logical,
                TokenKind::Null,
                TokenKind::Missing,
                TokenKind::Infinity,
                TokenKind::NaN,
                TokenKind::Ellipsis,
            ]
        );
        assert_eq!(lexemes(".x ..1 x.y_z"), vec![".x", "..1", "x.y_z"]);
    }

    #[test]
    fn strings() {
        assert_eq!(
            lexemes(r#"'a' "b\"c" r"(x")" `odd name`"#),
            vec!["'a'", r#""b\"c""#, r#"r"(x")""#, "`odd name`"]
        );
        let tokens = tokenize("x <- \"open");
        let last = tokens.get(tokens.len() - 1);
        assert_eq!(last.kind, TokenKind::String);
        assert_eq!(last.span.end, 10);
    }

    #[test]
    fn keywords_and_lambda() {
        assert_eq!(
            kinds("if else function \\(x) repeat"),
            vec![
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::OpenParen,
                TokenKind::Identifier,
                TokenKind::CloseParen,
                TokenKind::Keyword,
            ]
        );
    }

    #[test]
    fn comments_go_to_the_side() {
        let src = "x # note\ny";
        let (tokens, comments) = tokenize_with_comments(src);
        assert_eq!(tokens.len(), 2);
        assert_eq!(comments.len(), 1);
        assert_eq!(&src[comments[0].span.start..comments[0].span.end], "# note");
    }

    #[test]
    fn unknown_characters() {
        assert_eq!(
            kinds("a ` b"),
            vec![TokenKind::Identifier, TokenKind::Unknown]
        );
        assert_eq!(
            kinds("a % b"),
            vec![TokenKind::Identifier, TokenKind::Unknown, TokenKind::Identifier]
        );
        assert_eq!(kinds("\u{00a7}"), vec![TokenKind::Unknown]);
    }

    #[test]
    fn sentinel_sits_at_end_of_text() {
        let tokens = tokenize("a  ");
        assert!(tokens.end_of_stream().is_end_of_stream());
        assert_eq!(tokens.end_of_stream().span.start, 3);
        assert!(tokenize("").is_empty());
    }
}
