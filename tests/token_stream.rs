mod common;

#[cfg(test)]
mod token_stream_tests {
    use loxparse::error::StreamError;
    use loxparse::stream;
    use loxparse::token::{Token, TokenType};
    use loxparse::Parser;

    use crate::common::tokens;

    #[test]
    fn test_token_display() {
        assert_eq!(
            Token::new(TokenType::NUMBER(3.0), "3", 1).to_string(),
            "NUMBER 3 3.0"
        );
        assert_eq!(
            Token::new(TokenType::NUMBER(3.25), "3.25", 1).to_string(),
            "NUMBER 3.25 3.25"
        );
        assert_eq!(
            Token::new(TokenType::STRING("hi".into()), "\"hi\"", 1).to_string(),
            "STRING \"hi\" hi"
        );
        assert_eq!(
            Token::new(TokenType::IDENTIFIER, "x", 1).to_string(),
            "IDENTIFIER x null"
        );
        assert_eq!(Token::eof(4).to_string(), "EOF  null");
    }

    #[test]
    fn test_token_type_equality_ignores_payload() {
        assert_eq!(TokenType::NUMBER(1.0), TokenType::NUMBER(2.0));
        assert_eq!(
            TokenType::STRING("a".into()),
            TokenType::STRING("b".into())
        );
        assert_ne!(TokenType::PLUS, TokenType::MINUS);
    }

    #[test]
    fn test_load_json_stream() {
        let json = br#"[
            { "token_type": "PRINT", "lexeme": "print", "line": 1 },
            { "token_type": { "NUMBER": 1.0 }, "lexeme": "1", "line": 1 },
            { "token_type": "SEMICOLON", "lexeme": ";", "line": 1 },
            { "token_type": "EOF", "lexeme": "", "line": 1 }
        ]"#;

        let loaded = stream::from_slice(json).expect("stream should load");
        assert_eq!(loaded, tokens("print 1 ;"));

        let program = Parser::new(&loaded).expect("valid stream").parse();
        assert!(!program.has_errors());
    }

    #[test]
    fn test_json_round_trip_through_reader() {
        let original = tokens("var name = \"lox\" ;");
        let encoded = serde_json::to_vec(&original).expect("tokens serialize");

        let decoded = stream::from_reader(encoded.as_slice()).expect("stream should load");
        assert_eq!(decoded, original);
        assert!(matches!(&decoded[3].token_type, TokenType::STRING(s) if s == "lox"));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = stream::from_slice(b"{ not tokens").unwrap_err();
        assert!(matches!(err, StreamError::Json(_)));
    }

    #[test]
    fn test_empty_stream_is_rejected() {
        assert!(matches!(stream::validate(&[]), Err(StreamError::Empty)));
        assert!(matches!(
            stream::from_slice(b"[]"),
            Err(StreamError::Empty)
        ));
    }

    #[test]
    fn test_missing_eof_is_rejected() {
        let mut toks = tokens("print 1 ;");
        toks.pop();

        assert!(matches!(
            Parser::new(&toks),
            Err(StreamError::MissingEof { line: 1 })
        ));
    }

    #[test]
    fn test_early_eof_is_rejected() {
        let mut toks = tokens("print 1 ;");
        toks.insert(1, Token::eof(1));

        let err = stream::validate(&toks).unwrap_err();
        assert!(matches!(err, StreamError::EarlyEof { index: 1, line: 1 }));
        assert_eq!(
            err.to_string(),
            "unexpected EOF at index 1 (line 1) before end of token stream"
        );
    }
}
