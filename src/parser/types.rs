use super::*;

impl Parser {
    pub(super) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        match &self.current().kind {
            TokenKind::Ident(_) => self.parse_type_name(),
            TokenKind::Star => {
                self.advance();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            TokenKind::LBracket => self.parse_array_type(),
            TokenKind::Map => {
                self.advance();
                self.expect_exact(&TokenKind::LBracket)?;
                let key = self.parse_type()?;
                self.expect_exact(&TokenKind::RBracket)?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            TokenKind::Chan => {
                self.advance();
                let dir = if self.check_exact(&TokenKind::Arrow) {
                    self.advance();
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let value = self.parse_type()?;
                Ok(TypeExpr::Chan {
                    dir,
                    value: Box::new(value),
                })
            }
            TokenKind::Arrow => {
                self.advance();
                self.expect_exact(&TokenKind::Chan)?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    value: Box::new(value),
                })
            }
            TokenKind::Func => {
                self.advance();
                Ok(TypeExpr::Func(self.parse_signature()?))
            }
            TokenKind::Struct => self.parse_struct_type(),
            TokenKind::Interface => self.parse_interface_type(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect_exact(&TokenKind::RParen)?;
                Ok(TypeExpr::Paren(Box::new(inner)))
            }
            other => Err(self.error(format!("expected type, found '{}'", other))),
        }
    }

    fn parse_type_name(&mut self) -> Result<TypeExpr, ParseError> {
        let first = self.expect_ident("type name")?;

        let mut base = if self.check_exact(&TokenKind::Dot)
            && matches!(self.peek(1).kind, TokenKind::Ident(_))
        {
            self.advance(); // .
            let name = self.expect_ident("type name")?;
            TypeExpr::Qualified {
                package: first,
                name,
            }
        } else {
            TypeExpr::Name(first)
        };

        if self.check_exact(&TokenKind::LBracket) {
            self.advance();
            let mut args = Vec::new();
            while !self.check_exact(&TokenKind::RBracket) && !self.is_eof() {
                args.push(self.parse_type()?);
                if self.check_exact(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            self.expect_exact(&TokenKind::RBracket)?;
            base = TypeExpr::Generic {
                base: Box::new(base),
                args,
            };
        }

        Ok(base)
    }

    fn parse_array_type(&mut self) -> Result<TypeExpr, ParseError> {
        self.expect_exact(&TokenKind::LBracket)?;

        let len = if self.check_exact(&TokenKind::RBracket) {
            None
        } else {
            Some(self.parse_array_len()?)
        };
        self.expect_exact(&TokenKind::RBracket)?;

        let elem = self.parse_type()?;
        Ok(TypeExpr::Array {
            len,
            elem: Box::new(elem),
        })
    }

    /// Collects the length expression as text, e.g. `4`, `...`, `N * 2`.
    fn parse_array_len(&mut self) -> Result<String, ParseError> {
        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            let kind = self.current().kind.clone();
            match kind {
                TokenKind::Eof => return Err(self.error("unterminated array length")),
                TokenKind::RBracket if depth == 0 => break,
                TokenKind::LBracket | TokenKind::LParen => depth += 1,
                TokenKind::RBracket | TokenKind::RParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            match &kind {
                TokenKind::Op(_) | TokenKind::Star | TokenKind::Pipe => {
                    text.push(' ');
                    text.push_str(&kind.to_string());
                    text.push(' ');
                }
                TokenKind::Comma => text.push_str(", "),
                other => text.push_str(&other.to_string()),
            }
            self.advance();
        }
        Ok(text)
    }

    fn parse_struct_type(&mut self) -> Result<TypeExpr, ParseError> {
        self.expect_exact(&TokenKind::Struct)?;
        self.expect_exact(&TokenKind::LBrace)?;

        let mut fields = Vec::new();
        loop {
            self.skip_semicolons();
            if self.check_exact(&TokenKind::RBrace) || self.is_eof() {
                break;
            }
            fields.push(self.parse_struct_field()?);
            self.expect_terminator()?;
        }

        self.expect_exact(&TokenKind::RBrace)?;
        Ok(TypeExpr::Struct(StructType { fields }))
    }

    fn parse_struct_field(&mut self) -> Result<Field, ParseError> {
        let pos = self.position();

        let (names, ty) = match &self.current().kind {
            TokenKind::Star => (Vec::new(), self.parse_type()?),
            TokenKind::Ident(_) => match &self.peek(1).kind {
                TokenKind::Dot
                | TokenKind::Semicolon
                | TokenKind::RBrace
                | TokenKind::Str(_) => (Vec::new(), self.parse_type()?),
                TokenKind::LBracket if !self.bracket_starts_array_type(1) => {
                    (Vec::new(), self.parse_type()?)
                }
                _ => {
                    let mut names = vec![self.expect_ident("field name")?];
                    while self.check_exact(&TokenKind::Comma) {
                        self.advance();
                        names.push(self.expect_ident("field name")?);
                    }
                    (names, self.parse_type()?)
                }
            },
            other => return Err(self.error(format!("expected field, found '{}'", other))),
        };

        // Tags never influence the analysis.
        if matches!(self.current().kind, TokenKind::Str(_)) {
            self.advance();
        }

        Ok(Field { names, ty, pos })
    }

    pub(super) fn parse_interface_type(&mut self) -> Result<TypeExpr, ParseError> {
        self.expect_exact(&TokenKind::Interface)?;
        self.expect_exact(&TokenKind::LBrace)?;

        let mut methods = Vec::new();
        let mut incomplete = false;
        loop {
            self.skip_semicolons();
            if self.check_exact(&TokenKind::RBrace) {
                self.advance();
                break;
            }
            if self.is_eof() {
                let err = self.error("unterminated interface body");
                self.errors.push(err);
                return Ok(TypeExpr::Interface(InterfaceType {
                    methods: None,
                    incomplete: true,
                }));
            }

            let entry = self.parse_interface_elem().and_then(|entry| {
                if matches!(
                    self.current().kind,
                    TokenKind::Semicolon | TokenKind::RBrace
                ) {
                    Ok(entry)
                } else {
                    Err(self.error(format!(
                        "unexpected '{}' in interface",
                        self.current().kind
                    )))
                }
            });
            match entry {
                Ok(entry) => methods.push(entry),
                Err(err) => {
                    self.errors.push(err);
                    incomplete = true;
                    self.recover_in_block();
                }
            }
        }

        Ok(TypeExpr::Interface(InterfaceType {
            methods: Some(methods),
            incomplete,
        }))
    }

    fn parse_interface_elem(&mut self) -> Result<MethodEntry, ParseError> {
        if matches!(self.current().kind, TokenKind::Ident(_))
            && matches!(self.peek(1).kind, TokenKind::LParen)
        {
            let name = self.expect_ident("method name")?;
            let sig = self.parse_signature()?;
            return Ok(MethodEntry::Method { name, sig });
        }
        Ok(MethodEntry::Embedded(self.parse_constraint()?))
    }

    /// `T`, `~T`, or a union of such terms.
    pub(super) fn parse_constraint(&mut self) -> Result<TypeExpr, ParseError> {
        let mut terms = vec![self.parse_constraint_term()?];
        while self.check_exact(&TokenKind::Pipe) {
            self.advance();
            terms.push(self.parse_constraint_term()?);
        }
        if terms.len() == 1 {
            if let Some(term) = terms.pop() {
                return Ok(term);
            }
        }
        Ok(TypeExpr::Union(terms))
    }

    fn parse_constraint_term(&mut self) -> Result<TypeExpr, ParseError> {
        if self.check_exact(&TokenKind::Tilde) {
            self.advance();
            return Ok(TypeExpr::Tilde(Box::new(self.parse_type()?)));
        }
        self.parse_type()
    }
}
