pub mod util;
pub mod lang;

use std::path::PathBuf;
use clap::Parser as ClapParser;
use tracing::{debug, info};
use crate::lang::environment::AssignPolicy;
use crate::lang::interpreter::{Interpreter, InterpreterOptions, RuntimeError};
use crate::lang::io::{InputChannel, OutputChannel};
use crate::lang::lexer::{KeywordTable, Lexer, LexerDiagnostic, LexerOptions, Token};
use crate::lang::parser::{ColonBody, ParseError, Parser, ParserOptions};
use crate::lang::ast::Program;

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(default_value = "main.zl", help = "Program to run")]
    pub input: PathBuf,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
    #[clap(long, help = "Report characters that don't start any token")]
    pub strict_lexing: bool,
    #[clap(long, help = "Fail when assigning to a variable that was never declared")]
    pub no_implicit_declare: bool,
    #[clap(long, help = "Let ':' introduce a single statement instead of the rest of its line")]
    pub colon_single: bool,

    #[clap(long, help = "Print the token stream instead of running the program")]
    pub tokens: bool,
    #[clap(long, conflicts_with = "tokens", help = "Print the parsed program instead of running it")]
    pub ast: bool,
}

/// Settings for every stage of the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub lexer: LexerOptions,
    pub parser: ParserOptions,
    pub interpreter: InterpreterOptions,
}

impl From<&Config> for Options {
    fn from(config: &Config) -> Self {
        Options {
            lexer: LexerOptions { strict: config.strict_lexing },
            parser: ParserOptions {
                colon_body: if config.colon_single { ColonBody::Single } else { ColonBody::RestOfLine },
            },
            interpreter: InterpreterOptions {
                assign_policy: if config.no_implicit_declare { AssignPolicy::Strict } else { AssignPolicy::DefineInnermost },
                ..InterpreterOptions::default()
            },
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

pub fn tokenize_source(source: &str, options: &Options) -> (Vec<Token>, Vec<LexerDiagnostic>) {
    let mut lexer = Lexer::with_config(source, KeywordTable::default(), options.lexer);
    let tokens = lexer.tokenize();

    (tokens, lexer.take_diagnostics())
}

/// Lexer diagnostics are logged, never fatal.
pub fn parse_source(source: &str, options: &Options) -> Result<Program, Error> {
    let (tokens, _) = tokenize_source(source, options);

    Ok(Parser::with_options(tokens, options.parser).parse()?)
}

/// Runs a whole program against the given channels and hands them back afterwards.
pub fn run_source<I, O>(source: &str, options: &Options, input: I, output: O) -> Result<(I, O), Error>
where
    I: InputChannel,
    O: OutputChannel,
{
    let program = parse_source(source, options)?;

    let mut interpreter = Interpreter::with_channels(input, output, options.interpreter);
    interpreter.interpret(&program)?;

    Ok(interpreter.into_channels())
}

pub fn run(config: &Config) -> Result<(), Error> {
    let options = Options::from(config);

    let source = std::fs::read_to_string(&config.input)
        .map_err(|source| Error::Io { path: config.input.clone(), source })?;
    debug!(path = ?config.input, bytes = source.len(), "read source");

    if config.tokens {
        let (tokens, _) = tokenize_source(&source, &options);
        for token in &tokens {
            println!("{} {:?} {}", token.start(), token.token_type(), token);
        }

        return Ok(());
    }

    let program = parse_source(&source, &options)?;

    if config.ast {
        print!("{:?}", program);
        return Ok(());
    }

    info!(path = ?config.input, "running program");
    Interpreter::with_options(options.interpreter).interpret(&program)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_default_options_from_arguments() {
        let config = match Config::try_parse_from(["zlang"]) {
            Ok(config) => config,
            Err(err) => panic!("{}", err),
        };

        assert_eq!(PathBuf::from("main.zl"), config.input);
        assert_eq!(Options::default(), Options::from(&config));
    }

    #[test]
    pub fn test_flags_map_to_options() {
        let config = match Config::try_parse_from(["zlang", "demo.zl", "--strict-lexing", "--no-implicit-declare", "--colon-single"]) {
            Ok(config) => config,
            Err(err) => panic!("{}", err),
        };
        let options = Options::from(&config);

        assert!(options.lexer.strict);
        assert_eq!(ColonBody::Single, options.parser.colon_body);
        assert_eq!(AssignPolicy::Strict, options.interpreter.assign_policy);
    }

    #[test]
    pub fn test_missing_file_is_an_io_error() {
        let config = match Config::try_parse_from(["zlang", "does/not/exist.zl"]) {
            Ok(config) => config,
            Err(err) => panic!("{}", err),
        };

        assert!(matches!(run(&config), Err(Error::Io { .. })));
    }
}
