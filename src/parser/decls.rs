use super::*;

impl Parser {
    pub(super) fn parse_type_spec(&mut self) -> Result<TypeSpec, ParseError> {
        let name = self.expect_ident("type name")?;

        let type_params = if self.check_exact(&TokenKind::LBracket) && self.is_type_param_list() {
            self.parse_type_params()?
        } else {
            Vec::new()
        };

        let alias = self.check_exact(&TokenKind::Assign);
        if alias {
            self.advance();
        }

        let ty = self.parse_type()?;
        Ok(TypeSpec {
            name,
            type_params,
            alias,
            ty,
        })
    }

    /// Tells `type A[T any] ...` apart from the array type in `type A [N]int`.
    ///
    /// `[P *C]` and `[P (C)]` read as array lengths, as in Go, unless the
    /// list has a trailing comma or more than one entry, or the operand is
    /// a type literal such as `*struct{}`.
    fn is_type_param_list(&self) -> bool {
        if !matches!(self.peek(1).kind, TokenKind::Ident(_)) {
            return false;
        }
        match self.peek(2).kind {
            TokenKind::Star | TokenKind::LParen => {
                starts_type_literal(&self.peek(3).kind) || self.bracket_has_top_level_comma()
            }
            TokenKind::Ident(_)
            | TokenKind::Comma
            | TokenKind::Tilde
            | TokenKind::LBracket
            | TokenKind::Interface
            | TokenKind::Struct
            | TokenKind::Func
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Arrow => true,
            _ => false,
        }
    }

    /// Scans the `[` at the current token up to its `]`.
    fn bracket_has_top_level_comma(&self) -> bool {
        let mut depth = 0usize;
        let mut idx = 0;
        loop {
            match &self.peek(idx).kind {
                TokenKind::Eof => return false,
                TokenKind::LBracket | TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RBracket | TokenKind::RParen | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return false;
                    }
                }
                TokenKind::Comma if depth == 1 => return true,
                _ => {}
            }
            idx += 1;
        }
    }

    pub(super) fn parse_type_params(&mut self) -> Result<Vec<Field>, ParseError> {
        self.expect_exact(&TokenKind::LBracket)?;
        let mut groups = Vec::new();

        while !self.check_exact(&TokenKind::RBracket) && !self.is_eof() {
            let first = self.expect_ident("type parameter name")?;
            let pos = first.pos;
            let mut names = vec![first];
            while self.check_exact(&TokenKind::Comma) {
                self.advance();
                names.push(self.expect_ident("type parameter name")?);
            }
            let ty = self.parse_constraint()?;
            groups.push(Field { names, ty, pos });

            if self.check_exact(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        self.expect_exact(&TokenKind::RBracket)?;
        Ok(groups)
    }

    pub(super) fn parse_value_spec(&mut self) -> Result<ValueSpec, ParseError> {
        let mut names = vec![self.expect_ident("variable name")?];
        while self.check_exact(&TokenKind::Comma) {
            self.advance();
            names.push(self.expect_ident("variable name")?);
        }

        let ty = match &self.current().kind {
            TokenKind::Assign
            | TokenKind::Semicolon
            | TokenKind::RParen
            | TokenKind::Eof => None,
            _ => Some(self.parse_type()?),
        };

        let mut literals = Vec::new();
        if self.check_exact(&TokenKind::Assign) {
            self.advance();
            self.scan_tokens(&mut literals, true)?;
        }

        Ok(ValueSpec {
            names,
            ty,
            literals,
        })
    }
}

fn starts_type_literal(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LBracket
            | TokenKind::Struct
            | TokenKind::Interface
            | TokenKind::Func
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Arrow
            | TokenKind::Tilde
    )
}
