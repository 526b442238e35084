use rstest::rstest;
use super::*;

fn token_types(source: &str) -> Vec<TokenType> {
    tokenize(source).iter().map(Token::token_type).collect()
}

fn token_sources(source: &str) -> Vec<String> {
    tokenize(source).iter().map(|token| token.source().to_owned()).collect()
}

mod scanning {
    use pretty_assertions::assert_eq;
    use super::*;

    #[rstest]
    #[case("")]
    #[case("   \t\r ")]
    #[case("\n\n\n")]
    #[case("// just a comment")]
    #[case("// one\n  // two\n")]
    #[case("  \t// trailing comment without newline")]
    pub fn test_blank_input_is_single_eof(#[case] source: &str) {
        assert_eq!(vec![TokenType::Eof], token_types(source));
    }

    #[test]
    pub fn test_function_with_call() {
        assert_eq!(vec![
            TokenType::Vibe, TokenType::Identifier,
            TokenType::ParenthesisLeft, TokenType::ParenthesisRight,
            TokenType::BracketLeft,
            TokenType::Say, TokenType::ParenthesisLeft, TokenType::String, TokenType::ParenthesisRight,
            TokenType::BracketRight,
            TokenType::Eof,
        ], token_types("vibe main ( ) { say ( \"hi\" ) }"));

        let tokens = tokenize("vibe main ( ) { say ( \"hi\" ) }");
        assert_eq!("main", tokens[1].source());
        assert_eq!("hi", tokens[7].source());
    }

    #[test]
    pub fn test_keywords_are_case_insensitive() {
        let tokens = tokenize("LIT Lit lIt Vibe YAP sPiLl");

        assert_eq!(vec![
            TokenType::Lit, TokenType::Lit, TokenType::Lit,
            TokenType::Vibe, TokenType::Yap, TokenType::Spill,
            TokenType::Eof,
        ], tokens.iter().map(Token::token_type).collect::<Vec<_>>());
        assert_eq!("lIt", tokens[2].source());
    }

    #[test]
    pub fn test_identifiers_keep_their_case() {
        let tokens = tokenize("Counter my_var x2");

        assert_eq!(vec![TokenType::Identifier, TokenType::Identifier, TokenType::Identifier, TokenType::Eof],
                   tokens.iter().map(Token::token_type).collect::<Vec<_>>());
        assert_eq!(vec!["Counter", "my_var", "x2", ""], token_sources("Counter my_var x2"));
    }

    #[test]
    pub fn test_reserved_keywords_tokenize() {
        assert_eq!(vec![
            TokenType::Bet, TokenType::Cap, TokenType::Nocap, TokenType::Squad,
            TokenType::Fam, TokenType::Yes, TokenType::Jawn, TokenType::Else,
            TokenType::Eof,
        ], token_types("bet cap nocap squad fam yes jawn else"));
    }

    #[test]
    pub fn test_operators() {
        assert_eq!(vec![
            TokenType::Equal, TokenType::NotEqual, TokenType::GreaterEqual, TokenType::LessEqual,
            TokenType::Assign, TokenType::Greater, TokenType::Less,
            TokenType::Plus, TokenType::Minus, TokenType::Multiply, TokenType::Divide,
            TokenType::Comma, TokenType::Colon, TokenType::Semicolon,
            TokenType::Eof,
        ], token_types("== != >= <= = > < + - * / , : ;"));
    }

    #[test]
    pub fn test_two_character_operators_without_spaces() {
        assert_eq!(vec![
            TokenType::Identifier, TokenType::Equal, TokenType::Number,
            TokenType::Identifier, TokenType::Assign, TokenType::Assign, TokenType::Number,
            TokenType::Eof,
        ], token_types("x==1 y= =2"));
    }

    #[test]
    pub fn test_numbers_are_digits_only() {
        assert_eq!(vec!["12", "5", "abc", ""], token_sources("12.5abc"));
        assert_eq!(vec![TokenType::Number, TokenType::Number, TokenType::Identifier, TokenType::Eof],
                   token_types("12.5abc"));
    }

    #[test]
    pub fn test_minus_is_never_part_of_a_number() {
        assert_eq!(vec![TokenType::Minus, TokenType::Number, TokenType::Eof], token_types("-3"));
    }

    #[test]
    pub fn test_comment_after_code() {
        assert_eq!(vec![TokenType::Lit, TokenType::Identifier, TokenType::Assign, TokenType::Number, TokenType::Eof],
                   token_types("lit x = 1 // the answer\n"));
    }

    #[test]
    pub fn test_single_slash_is_division() {
        assert_eq!(vec![TokenType::Number, TokenType::Divide, TokenType::Number, TokenType::Eof],
                   token_types("6 / 3"));
    }

    #[test]
    pub fn test_string_keeps_contents_verbatim() {
        let tokens = tokenize("\"lit x = 1 // not a comment\"");

        assert_eq!(TokenType::String, tokens[0].token_type());
        assert_eq!("lit x = 1 // not a comment", tokens[0].source());
    }

    #[test]
    pub fn test_multibyte_characters() {
        let tokens = tokenize("say(\"héllo wörld\") café");

        assert_eq!("héllo wörld", tokens[2].source());
        assert_eq!(TokenType::Identifier, tokens[4].token_type());
        assert_eq!("café", tokens[4].source());
    }
}

mod positions {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_lines_advance_on_newlines_and_comments() {
        let tokens = tokenize("lit\n// comment\nx");

        assert_eq!(TokenPos::new(1, 1), *tokens[0].start());
        assert_eq!(TokenPos::new(3, 1), *tokens[1].start());
    }

    #[test]
    pub fn test_newlines_inside_strings_count() {
        let tokens = tokenize("\"a\nb\" x");

        assert_eq!("a\nb", tokens[0].source());
        assert_eq!(2, tokens[1].start().line);
    }

    #[test]
    pub fn test_eof_sits_after_last_character() {
        let tokens = tokenize("ab\n");

        assert_eq!(TokenPos::new(2, 1), *tokens[1].start());
    }
}

mod diagnostics {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_unterminated_string_is_reported_not_raised() {
        let mut lexer = Lexer::new("say(\"oops");
        let tokens = lexer.tokenize();

        assert_eq!(vec![TokenType::Say, TokenType::ParenthesisLeft, TokenType::String, TokenType::Eof],
                   tokens.iter().map(Token::token_type).collect::<Vec<_>>());
        assert_eq!("oops", tokens[2].source());
        assert_eq!(vec![LexerDiagnostic::UnterminatedString { pos: TokenPos::new(1, 5), text: String::from("oops") }],
                   lexer.diagnostics().to_vec());
    }

    #[test]
    pub fn test_unknown_characters_are_skipped_silently() {
        let mut lexer = Lexer::new("lit @x = 1 # ! $");
        let tokens = lexer.tokenize();

        assert_eq!(vec![TokenType::Lit, TokenType::Identifier, TokenType::Assign, TokenType::Number, TokenType::Eof],
                   tokens.iter().map(Token::token_type).collect::<Vec<_>>());
        assert!(lexer.diagnostics().is_empty());
    }

    #[test]
    pub fn test_strict_mode_reports_unknown_characters() {
        let mut lexer = Lexer::with_config("x @ y", KeywordTable::default(), LexerOptions { strict: true });
        let tokens = lexer.tokenize();

        assert_eq!(3, tokens.len());
        assert_eq!(vec![LexerDiagnostic::UnexpectedCharacter(TokenPos::new(1, 3), '@')], lexer.take_diagnostics());
        assert!(lexer.diagnostics().is_empty());
    }
}

mod keywords {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_default_table() {
        let table = KeywordTable::default();

        assert_eq!(14, table.len());
        assert_eq!(Some(TokenType::Yap), table.lookup("YaP"));
        assert_eq!(None, table.lookup("while"));
    }

    #[test]
    pub fn test_custom_table() {
        let table = KeywordTable::new([("Let", TokenType::Lit), ("print", TokenType::Say)]);
        let tokens = Lexer::with_config("let lit PRINT", table, LexerOptions::default()).tokenize();

        assert_eq!(vec![TokenType::Lit, TokenType::Identifier, TokenType::Say, TokenType::Eof],
                   tokens.iter().map(Token::token_type).collect::<Vec<_>>());
    }
}
