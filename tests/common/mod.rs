//! Token fixtures.  The crate has no lexer, so tests spell programs as
//! whitespace separated words, one source line per text line.

#![allow(dead_code)]

use loxparse::token::{Token, TokenType};

fn kind_of(word: &str) -> TokenType {
    match word {
        "(" => TokenType::LEFT_PAREN,
        ")" => TokenType::RIGHT_PAREN,
        "{" => TokenType::LEFT_BRACE,
        "}" => TokenType::RIGHT_BRACE,
        "," => TokenType::COMMA,
        "." => TokenType::DOT,
        "-" => TokenType::MINUS,
        "+" => TokenType::PLUS,
        ";" => TokenType::SEMICOLON,
        "/" => TokenType::SLASH,
        "*" => TokenType::STAR,
        "!" => TokenType::BANG,
        "!=" => TokenType::BANG_EQUAL,
        "=" => TokenType::EQUAL,
        "==" => TokenType::EQUAL_EQUAL,
        ">" => TokenType::GREATER,
        ">=" => TokenType::GREATER_EQUAL,
        "<" => TokenType::LESS,
        "<=" => TokenType::LESS_EQUAL,
        "and" => TokenType::AND,
        "break" => TokenType::BREAK,
        "class" => TokenType::CLASS,
        "continue" => TokenType::CONTINUE,
        "else" => TokenType::ELSE,
        "false" => TokenType::FALSE,
        "fun" => TokenType::FUN,
        "for" => TokenType::FOR,
        "if" => TokenType::IF,
        "nil" => TokenType::NIL,
        "or" => TokenType::OR,
        "print" => TokenType::PRINT,
        "return" => TokenType::RETURN,
        "super" => TokenType::SUPER,
        "this" => TokenType::THIS,
        "true" => TokenType::TRUE,
        "var" => TokenType::VAR,
        "while" => TokenType::WHILE,
        w if w.starts_with('"') => TokenType::STRING(w.trim_matches('"').to_string()),
        w if w.starts_with(|c: char| c.is_ascii_digit()) => {
            TokenType::NUMBER(w.parse().expect("numeric fixture word"))
        }
        _ => TokenType::IDENTIFIER,
    }
}

/// Token vector for `source`, terminated by `EOF`.
pub fn tokens(source: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut line = 1;

    for (index, text) in source.lines().enumerate() {
        line = index + 1;
        for word in text.split_whitespace() {
            out.push(Token::new(kind_of(word), word, line));
        }
    }

    out.push(Token::eof(line));
    out
}
