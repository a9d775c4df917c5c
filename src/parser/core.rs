use super::*;

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.is_empty() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                line: 1,
                col: 1,
            });
        }
        Parser {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub(super) fn error(&self, msg: impl Into<String>) -> ParseError {
        self.error_at(self.position(), msg)
    }

    pub(super) fn error_at(&self, pos: Pos, msg: impl Into<String>) -> ParseError {
        ParseError::Error {
            msg: msg.into(),
            line: pos.line,
            col: pos.col,
        }
    }

    pub(super) fn current(&self) -> &Token {
        self.peek(0)
    }

    pub(super) fn peek(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(super) fn previous(&self) -> Option<&Token> {
        self.pos.checked_sub(1).and_then(|idx| self.tokens.get(idx))
    }

    pub(super) fn advance(&mut self) -> &Token {
        let idx = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    pub(super) fn position(&self) -> Pos {
        let tok = self.current();
        Pos {
            line: tok.line,
            col: tok.col,
        }
    }

    pub(super) fn check_exact(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    pub(super) fn is_eof(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    pub(super) fn expect_exact(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if &self.current().kind == kind {
            Ok(self.advance().clone())
        } else {
            Err(self.error(format!(
                "expected '{}', found '{}'",
                kind,
                self.current().kind
            )))
        }
    }

    pub(super) fn expect_ident(&mut self, what: &str) -> Result<Ident, ParseError> {
        let pos = self.position();
        match &self.current().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(Ident { name, pos })
            }
            other => Err(self.error(format!("expected {}, found '{}'", what, other))),
        }
    }

    pub(super) fn skip_semicolons(&mut self) {
        while self.check_exact(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Consumes the `;` ending a declaration; a closing bracket or EOF also ends it.
    pub(super) fn expect_terminator(&mut self) -> Result<(), ParseError> {
        match &self.current().kind {
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => Ok(()),
            other => Err(self.error(format!("expected ';', found '{}'", other))),
        }
    }

    /// Errors the parser recovered from, drained.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    pub fn parse(&mut self) -> Result<SourceFile, ParseError> {
        self.skip_semicolons();
        let package = self.parse_package_clause()?;
        self.skip_semicolons();

        let mut imports = Vec::new();
        while self.check_exact(&TokenKind::Import) {
            imports.extend(self.parse_import_decl()?);
            self.skip_semicolons();
        }

        let mut decls = Vec::new();
        while !self.is_eof() {
            self.parse_top_level(&mut decls)?;
            self.skip_semicolons();
        }

        Ok(SourceFile {
            package,
            imports,
            decls,
        })
    }

    pub(super) fn parse_top_level(&mut self, decls: &mut Vec<Decl>) -> Result<(), ParseError> {
        match &self.current().kind {
            TokenKind::Type => {
                self.advance();
                let specs = self.parse_group(Self::parse_type_spec)?;
                decls.extend(specs.into_iter().map(Decl::Type));
            }
            TokenKind::Var | TokenKind::Const => {
                self.advance();
                let specs = self.parse_group(Self::parse_value_spec)?;
                decls.extend(specs.into_iter().map(Decl::Value));
            }
            TokenKind::Func => decls.push(Decl::Func(self.parse_func_decl()?)),
            TokenKind::Semicolon => {
                self.advance();
            }
            TokenKind::Import => {
                return Err(self.error("imports must appear before other declarations"));
            }
            other => {
                return Err(self.error(format!(
                    "expected declaration, found '{}'",
                    other
                )));
            }
        }
        Ok(())
    }

    /// Parses either a single spec or a parenthesized group of specs after a
    /// declaration keyword.
    pub(super) fn parse_group<T>(
        &mut self,
        mut spec: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut specs = Vec::new();
        if self.check_exact(&TokenKind::LParen) {
            self.advance();
            loop {
                self.skip_semicolons();
                if self.check_exact(&TokenKind::RParen) || self.is_eof() {
                    break;
                }
                specs.push(spec(self)?);
                self.expect_terminator()?;
            }
            self.expect_exact(&TokenKind::RParen)?;
        } else {
            specs.push(spec(self)?);
        }
        self.expect_terminator()?;
        Ok(specs)
    }
}
