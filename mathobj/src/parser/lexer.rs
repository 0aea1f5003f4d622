//! A lexer for the record stream format.

use crate::{parser::ParserError, utils::is_symbol_character, Error, MathObjResult};
use std::{
    fmt,
    io::{self, BufRead},
};

/// A token in the record stream format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// The `(` token.
    OpenParen,

    /// The `)` token.
    CloseParen,

    /// A symbol: any non-empty sequence of characters other than whitespace, parentheses, `"` and
    /// `;`, that does not start with `:`. Node kinds and entry headers are symbols.
    Symbol(String),

    /// A symbol preceded by `:`, e.g. `:name`. This has the leading `:` character removed.
    Keyword(String),

    /// A string literal. Inside it, `""` stands for a single `"`.
    String(String),

    /// A signal token to indicate the end of the input.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Symbol(s) => write!(f, "{}", s),
            Token::Keyword(k) => write!(f, ":{}", k),
            Token::String(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// Represents a position (line and column numbers) in the source input.
pub type Position = (usize, usize);

/// A lexer for the record stream format.
pub struct Lexer<R> {
    input: R,
    current_line: Option<std::vec::IntoIter<char>>,
    current_char: Option<char>,
    position: Position,
}

impl<R: BufRead> Lexer<R> {
    /// Constructs a new `Lexer` from a type that implements `BufRead`.
    ///
    /// This operation can fail if there is an IO error on the first line.
    pub fn new(mut input: R) -> io::Result<Self> {
        let mut buf = String::new();
        let read = input.read_line(&mut buf)?;
        if read == 0 {
            Ok(Lexer {
                input,
                current_line: None,
                current_char: None,
                position: (0, 0),
            })
        } else {
            let mut line = buf.chars().collect::<Vec<_>>().into_iter();
            let current_char = line.next();
            Ok(Lexer {
                input,
                current_line: Some(line),
                current_char,
                position: (1, 1),
            })
        }
    }

    /// Advances the lexer by one character, and returns the previous `current_char`.
    fn next_char(&mut self) -> io::Result<Option<char>> {
        // If there are no more characters in the current line, go to the next line
        if let Some(line) = &self.current_line {
            if line.as_slice().is_empty() {
                self.next_line()?;
            }
        }

        let new = if let Some(line) = &mut self.current_line {
            self.position.1 += 1;
            line.next()
        } else {
            None
        };
        let old = std::mem::replace(&mut self.current_char, new);
        Ok(old)
    }

    /// Advances the lexer by one line, discarding the remaining contents of the current line.
    fn next_line(&mut self) -> io::Result<()> {
        let mut buf = String::new();
        let read = self.input.read_line(&mut buf)?;
        if read == 0 {
            self.current_line = None;
        } else {
            let line = buf.chars().collect::<Vec<_>>().into_iter();
            self.current_line = Some(line);
            self.position.0 += 1;
            self.position.1 = 0;
        }
        Ok(())
    }

    /// Reads characters while the given predicate returns `true`, and stores them in a `String`.
    fn read_chars_while<P: Fn(char) -> bool>(&mut self, predicate: P) -> io::Result<String> {
        let mut result = String::new();
        while let Some(c) = self.current_char {
            if !predicate(c) {
                break;
            }
            result.push(c);
            self.next_char()?;
        }
        Ok(result)
    }

    fn drop_while_whitespace(&mut self) -> io::Result<()> {
        while let Some(c) = self.current_char {
            if !c.is_whitespace() {
                break;
            }
            self.next_char()?;
        }
        Ok(())
    }

    /// Consumes all leading whitespace and comments in the input source.
    fn consume_whitespace(&mut self) -> io::Result<()> {
        self.drop_while_whitespace()?;
        while self.current_char == Some(';') {
            self.next_line()?;
            self.next_char()?;
            self.drop_while_whitespace()?;
        }
        Ok(())
    }

    /// Reads a token from the input source.
    pub fn next_token(&mut self) -> MathObjResult<(Token, Position)> {
        self.consume_whitespace()?;
        let start_position = self.position;
        let token = match self.current_char {
            Some('(') => {
                self.next_char()?;
                Token::OpenParen
            }
            Some(')') => {
                self.next_char()?;
                Token::CloseParen
            }
            Some('"') => self.read_string()?,
            Some(':') => {
                self.next_char()?; // Consume `:`
                Token::Keyword(self.read_chars_while(is_symbol_character)?)
            }
            Some(_) => Token::Symbol(self.read_chars_while(is_symbol_character)?),
            None => Token::Eof,
        };
        Ok((token, start_position))
    }

    /// Reads a string literal from the input source.
    fn read_string(&mut self) -> MathObjResult<Token> {
        self.next_char()?; // Consume `"`
        let mut result = String::new();
        loop {
            result += &self.read_chars_while(|c| c != '"')?;
            if self.current_char.is_none() {
                return Err(Error::Parser(ParserError::EofInString, self.position));
            }
            self.next_char()?; // Consume `"`
            if self.current_char == Some('"') {
                self.next_char()?;
                result.push('"');
            } else {
                break;
            }
        }
        Ok(Token::String(result))
    }
}
