//! Lexer for the script subset, built on logos.

use std::fmt;

use logos::Logos;

use crate::error::CompileError;

/// A span in the source input (byte offsets).
pub type Span = std::ops::Range<usize>;

/// A token with its source span.
pub type SpannedToken = (Token, Span);

fn lex_int(lex: &mut logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

fn lex_real(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

fn lex_double_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1])
}

fn lex_single_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    unescape(&slice[1..slice.len() - 1])
}

fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            _ => return None,
        }
    }
    Some(out)
}

/// Tokens of the script subset.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // More specific numeric patterns first: a real literal must not lex as
    // an integer followed by garbage.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", lex_real, priority = 5)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", lex_real, priority = 4)]
    Real(f64),

    #[regex(r"[0-9]+", lex_int, priority = 2)]
    Int(i64),

    #[regex(r#""([^"\\]|\\.)*""#, lex_double_string)]
    #[regex(r"'([^'\\]|\\.)*'", lex_single_string)]
    Str(String),

    #[token("var")]
    Var,
    #[token("function")]
    Function,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[token("==")]
    EqEq,
    #[token("!=")]
    Ne,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("&&")]
    And,
    #[token("||")]
    Or,

    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Not,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("=")]
    Assign,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Real(v) => write!(f, "{v}"),
            Token::Int(v) => write!(f, "{v}"),
            Token::Str(s) => write!(f, "{s:?}"),
            Token::Var => write!(f, "var"),
            Token::Function => write!(f, "function"),
            Token::Return => write!(f, "return"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::EqEq => write!(f, "'=='"),
            Token::Ne => write!(f, "'!='"),
            Token::Le => write!(f, "'<='"),
            Token::Ge => write!(f, "'>='"),
            Token::And => write!(f, "'&&'"),
            Token::Or => write!(f, "'||'"),
            Token::Lt => write!(f, "'<'"),
            Token::Gt => write!(f, "'>'"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Percent => write!(f, "'%'"),
            Token::Not => write!(f, "'!'"),
            Token::Question => write!(f, "'?'"),
            Token::Colon => write!(f, "':'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::Dot => write!(f, "'.'"),
            Token::Comma => write!(f, "','"),
            Token::Semi => write!(f, "';'"),
            Token::Assign => write!(f, "'='"),
        }
    }
}

/// Tokenizes `source`, failing on the first unrecognized or malformed
/// token.
pub fn lex(source: &str) -> Result<Vec<SpannedToken>, CompileError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                return Err(CompileError::new(
                    format!(
                        "unrecognized or malformed token {:?}",
                        &source[span.clone()]
                    ),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        lex(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_binding_statement() {
        assert_eq!(
            kinds("var a = obj.geta();"),
            vec![
                Token::Var,
                Token::Ident("a".into()),
                Token::Assign,
                Token::Ident("obj".into()),
                Token::Dot,
                Token::Ident("geta".into()),
                Token::LParen,
                Token::RParen,
                Token::Semi,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("3 3.5 1e3"),
            vec![Token::Int(3), Token::Real(3.5), Token::Real(1000.0)]
        );
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            kinds(r#""a\"b" 'c'"#),
            vec![Token::Str("a\"b".into()), Token::Str("c".into())]
        );
    }

    #[test]
    fn test_keywords_vs_identifiers() {
        assert_eq!(
            kinds("true truth"),
            vec![Token::True, Token::Ident("truth".into())]
        );
    }

    #[test]
    fn test_unrecognized_character() {
        let err = lex("a @ b").unwrap_err();
        assert_eq!(err.span, 2..3);
    }
}
