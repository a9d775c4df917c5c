use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(String),
    Char(String),
    Str(String),
    // Identifiers
    Ident(String),
    // Keywords
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
    // Operators the parser inspects
    Star,      // *
    Arrow,     // <-
    Tilde,     // ~
    Pipe,      // |
    Assign,    // =
    Define,    // :=
    Ellipsis,  // ...
    Inc,       // ++
    Dec,       // --
    Dot,       // .
    Comma,     // ,
    Colon,     // :
    Semicolon, // ; (explicit or inserted at line end)
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }
    // Every other operator, kept verbatim
    Op(String),
    Eof,
}

impl TokenKind {
    /// Whether a newline after this token terminates the statement.
    fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::Number(_)
                | TokenKind::Char(_)
                | TokenKind::Str(_)
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Fallthrough
                | TokenKind::Return
                | TokenKind::Inc
                | TokenKind::Dec
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Number(s) | TokenKind::Char(s) | TokenKind::Ident(s) | TokenKind::Op(s) => {
                return f.write_str(s)
            }
            TokenKind::Str(s) => return write!(f, "{:?}", s),
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Chan => "chan",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Default => "default",
            TokenKind::Defer => "defer",
            TokenKind::Else => "else",
            TokenKind::Fallthrough => "fallthrough",
            TokenKind::For => "for",
            TokenKind::Func => "func",
            TokenKind::Go => "go",
            TokenKind::Goto => "goto",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::Interface => "interface",
            TokenKind::Map => "map",
            TokenKind::Package => "package",
            TokenKind::Range => "range",
            TokenKind::Return => "return",
            TokenKind::Select => "select",
            TokenKind::Struct => "struct",
            TokenKind::Switch => "switch",
            TokenKind::Type => "type",
            TokenKind::Var => "var",
            TokenKind::Star => "*",
            TokenKind::Arrow => "<-",
            TokenKind::Tilde => "~",
            TokenKind::Pipe => "|",
            TokenKind::Assign => "=",
            TokenKind::Define => ":=",
            TokenKind::Ellipsis => "...",
            TokenKind::Inc => "++",
            TokenKind::Dec => "--",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Eof => "EOF",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Error)]
pub enum LexerError {
    #[error("lexer error [{line}:{col}]: {msg}")]
    Error {
        msg: String,
        line: usize,
        col: usize,
    },
}

fn keyword(s: &str) -> Option<TokenKind> {
    match s {
        "break" => Some(TokenKind::Break),
        "case" => Some(TokenKind::Case),
        "chan" => Some(TokenKind::Chan),
        "const" => Some(TokenKind::Const),
        "continue" => Some(TokenKind::Continue),
        "default" => Some(TokenKind::Default),
        "defer" => Some(TokenKind::Defer),
        "else" => Some(TokenKind::Else),
        "fallthrough" => Some(TokenKind::Fallthrough),
        "for" => Some(TokenKind::For),
        "func" => Some(TokenKind::Func),
        "go" => Some(TokenKind::Go),
        "goto" => Some(TokenKind::Goto),
        "if" => Some(TokenKind::If),
        "import" => Some(TokenKind::Import),
        "interface" => Some(TokenKind::Interface),
        "map" => Some(TokenKind::Map),
        "package" => Some(TokenKind::Package),
        "range" => Some(TokenKind::Range),
        "return" => Some(TokenKind::Return),
        "select" => Some(TokenKind::Select),
        "struct" => Some(TokenKind::Struct),
        "switch" => Some(TokenKind::Switch),
        "type" => Some(TokenKind::Type),
        "var" => Some(TokenKind::Var),
        _ => None,
    }
}

// Longest first, so that `<<=` wins over `<<` and `<`.
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "+", "-", "*", "/", "%", "&", "|",
    "^", "<", ">", "=", "!", "~", "(", ")", "[", "]", "{", "}", ",", ";", ".", ":",
];

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn error(&self, msg: impl Into<String>) -> LexerError {
        LexerError::Error {
            msg: msg.into(),
            line: self.line,
            col: self.col,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();

        while self.pos < self.chars.len() {
            self.scan_token(&mut tokens)?;
        }

        // A file may end without a trailing newline
        self.insert_semicolon(&mut tokens, self.line, self.col);

        tokens.push(Token {
            kind: TokenKind::Eof,
            line: self.line,
            col: self.col,
        });

        Ok(tokens)
    }

    fn insert_semicolon(&self, tokens: &mut Vec<Token>, line: usize, col: usize) {
        let needed = tokens
            .last()
            .map(|t| t.kind.ends_statement())
            .unwrap_or(false);
        if needed {
            tokens.push(Token {
                kind: TokenKind::Semicolon,
                line,
                col,
            });
        }
    }

    fn scan_token(&mut self, tokens: &mut Vec<Token>) -> Result<(), LexerError> {
        let ch = match self.current() {
            Some(c) => c,
            None => return Ok(()),
        };

        // Byte order mark, only allowed as the first character
        if ch == '\u{feff}' && self.pos == 0 {
            self.pos += 1;
            return Ok(());
        }

        if ch == ' ' || ch == '\t' || ch == '\r' {
            self.advance();
            return Ok(());
        }

        if ch == '\n' {
            let (line, col) = (self.line, self.col);
            self.advance();
            self.insert_semicolon(tokens, line, col);
            return Ok(());
        }

        // Comments
        if ch == '/' && self.peek(1) == Some('/') {
            self.skip_line_comment();
            return Ok(());
        }
        if ch == '/' && self.peek(1) == Some('*') {
            let (line, col) = (self.line, self.col);
            if self.skip_block_comment()? {
                self.insert_semicolon(tokens, line, col);
            }
            return Ok(());
        }

        if ch == '"' {
            let tok = self.scan_string()?;
            tokens.push(tok);
            return Ok(());
        }

        if ch == '`' {
            let tok = self.scan_raw_string()?;
            tokens.push(tok);
            return Ok(());
        }

        if ch == '\'' {
            let tok = self.scan_rune()?;
            tokens.push(tok);
            return Ok(());
        }

        if ch.is_ascii_digit() || (ch == '.' && self.peek(1).is_some_and(|c| c.is_ascii_digit())) {
            tokens.push(self.scan_number());
            return Ok(());
        }

        if ch.is_alphabetic() || ch == '_' {
            tokens.push(self.scan_identifier());
            return Ok(());
        }

        let tok = self.scan_operator()?;
        tokens.push(tok);
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos] != '\n' {
            self.advance();
        }
    }

    /// Returns true when the comment spans a line break.
    fn skip_block_comment(&mut self) -> Result<bool, LexerError> {
        self.advance(); // /
        self.advance(); // *
        let mut multiline = false;
        loop {
            match self.current() {
                None => return Err(self.error("Unterminated block comment")),
                Some('*') if self.peek(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    return Ok(multiline);
                }
                Some(c) => {
                    if c == '\n' {
                        multiline = true;
                    }
                    self.advance();
                }
            }
        }
    }

    fn scan_string(&mut self) -> Result<Token, LexerError> {
        let line = self.line;
        let col = self.col;
        self.advance(); // consume opening "

        let mut value = String::new();
        loop {
            match self.current() {
                None | Some('\n') => return Err(self.error("Unterminated string literal")),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some(c) => {
                            value.push('\\');
                            value.push(c);
                        }
                        None => return Err(self.error("Unterminated string literal")),
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        Ok(Token {
            kind: TokenKind::Str(value),
            line,
            col,
        })
    }

    fn scan_raw_string(&mut self) -> Result<Token, LexerError> {
        let line = self.line;
        let col = self.col;
        self.advance(); // consume opening `

        let mut value = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error("Unterminated raw string literal")),
                Some('`') => break,
                Some('\r') => {}
                Some(c) => value.push(c),
            }
        }

        Ok(Token {
            kind: TokenKind::Str(value),
            line,
            col,
        })
    }

    fn scan_rune(&mut self) -> Result<Token, LexerError> {
        let line = self.line;
        let col = self.col;
        let mut text = String::new();
        text.push('\'');
        self.advance();

        loop {
            match self.current() {
                None | Some('\n') => return Err(self.error("Unterminated rune literal")),
                Some('\'') => {
                    text.push('\'');
                    self.advance();
                    break;
                }
                Some('\\') => {
                    text.push('\\');
                    self.advance();
                    match self.advance() {
                        Some(c) => text.push(c),
                        None => return Err(self.error("Unterminated rune literal")),
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }

        Ok(Token {
            kind: TokenKind::Char(text),
            line,
            col,
        })
    }

    fn scan_number(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        let mut num_str = String::new();
        let hex = self.current() == Some('0') && matches!(self.peek(1), Some('x') | Some('X'));

        while let Some(c) = self.current() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                num_str.push(c);
                self.advance();
                let exponent = if hex {
                    matches!(c, 'p' | 'P')
                } else {
                    matches!(c, 'e' | 'E')
                };
                if exponent && matches!(self.current(), Some('+') | Some('-')) {
                    if let Some(sign) = self.advance() {
                        num_str.push(sign);
                    }
                }
            } else {
                break;
            }
        }

        Token {
            kind: TokenKind::Number(num_str),
            line,
            col,
        }
    }

    fn scan_identifier(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        let mut ident = String::new();

        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let kind = keyword(&ident).unwrap_or(TokenKind::Ident(ident));
        Token { kind, line, col }
    }

    fn scan_operator(&mut self) -> Result<Token, LexerError> {
        let line = self.line;
        let col = self.col;

        let op = OPERATORS
            .iter()
            .find(|op| {
                op.chars()
                    .enumerate()
                    .all(|(i, c)| self.peek(i) == Some(c))
            })
            .copied();
        let op = match op {
            Some(op) => op,
            None => {
                let other = self.current().unwrap_or('\0');
                return Err(self.error(format!("Unknown character: {:?}", other)));
            }
        };
        for _ in 0..op.chars().count() {
            self.advance();
        }

        let kind = match op {
            "*" => TokenKind::Star,
            "<-" => TokenKind::Arrow,
            "~" => TokenKind::Tilde,
            "|" => TokenKind::Pipe,
            "=" => TokenKind::Assign,
            ":=" => TokenKind::Define,
            "..." => TokenKind::Ellipsis,
            "++" => TokenKind::Inc,
            "--" => TokenKind::Dec,
            "." => TokenKind::Dot,
            "," => TokenKind::Comma,
            ":" => TokenKind::Colon,
            ";" => TokenKind::Semicolon,
            "(" => TokenKind::LParen,
            ")" => TokenKind::RParen,
            "[" => TokenKind::LBracket,
            "]" => TokenKind::RBracket,
            "{" => TokenKind::LBrace,
            "}" => TokenKind::RBrace,
            other => TokenKind::Op(other.to_string()),
        };

        Ok(Token { kind, line, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .expect("lex failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn semicolon_inserted_after_closing_paren_at_line_end() {
        assert_eq!(
            kinds("Do(int)\n"),
            vec![
                TokenKind::Ident("Do".to_string()),
                TokenKind::LParen,
                TokenKind::Ident("int".to_string()),
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn no_semicolon_after_opening_brace() {
        assert_eq!(
            kinds("interface {\n}"),
            vec![
                TokenKind::Interface,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn multiline_block_comment_acts_as_newline() {
        let toks = kinds("x /* a\n b */ y");
        assert_eq!(toks[1], TokenKind::Semicolon);
    }

    #[test]
    fn hex_exponent_sign_is_part_of_number() {
        assert_eq!(kinds("0x1p-2")[0], TokenKind::Number("0x1p-2".to_string()));
        assert_eq!(kinds("0xe+2")[0], TokenKind::Number("0xe".to_string()));
    }
}
