use super::*;

/// One comma-separated entry of a parameter list before grouping.
enum ParamEntry {
    /// A lone identifier: a parameter name or a type, depending on its neighbours.
    Bare(Ident),
    Typed {
        name: Option<Ident>,
        ty: TypeExpr,
        pos: Pos,
    },
}

pub(super) fn starts_type(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Star
            | TokenKind::LBracket
            | TokenKind::LParen
            | TokenKind::Func
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Struct
            | TokenKind::Interface
            | TokenKind::Arrow
    )
}

impl Parser {
    pub(super) fn parse_func_decl(&mut self) -> Result<FuncDecl, ParseError> {
        self.expect_exact(&TokenKind::Func)?;

        let recv = if self.check_exact(&TokenKind::LParen) {
            self.parse_parameter_list()?.into_iter().next()
        } else {
            None
        };

        let name = self.expect_ident("function name")?;
        let type_params = if self.check_exact(&TokenKind::LBracket) {
            self.parse_type_params()?
        } else {
            Vec::new()
        };

        let sig = self.parse_signature()?;
        let body = if self.check_exact(&TokenKind::LBrace) {
            self.parse_block()?
        } else {
            Vec::new()
        };
        self.expect_terminator()?;

        Ok(FuncDecl {
            recv,
            name,
            type_params,
            sig,
            body,
        })
    }

    pub(super) fn parse_signature(&mut self) -> Result<FuncType, ParseError> {
        let params = self.parse_parameter_list()?;
        let results = self.parse_results()?;
        Ok(FuncType { params, results })
    }

    fn parse_results(&mut self) -> Result<Vec<Field>, ParseError> {
        if self.check_exact(&TokenKind::LParen) {
            return self.parse_parameter_list();
        }
        if starts_type(&self.current().kind) {
            let pos = self.position();
            let ty = self.parse_type()?;
            return Ok(vec![Field {
                names: Vec::new(),
                ty,
                pos,
            }]);
        }
        Ok(Vec::new())
    }

    pub(super) fn parse_parameter_list(&mut self) -> Result<Vec<Field>, ParseError> {
        self.expect_exact(&TokenKind::LParen)?;
        let mut entries = Vec::new();

        while !self.check_exact(&TokenKind::RParen) && !self.is_eof() {
            entries.push(self.parse_param_entry()?);
            if self.check_exact(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        self.expect_exact(&TokenKind::RParen)?;
        self.group_params(entries)
    }

    fn parse_param_entry(&mut self) -> Result<ParamEntry, ParseError> {
        let pos = self.position();

        if !matches!(self.current().kind, TokenKind::Ident(_)) {
            let ty = self.parse_param_type()?;
            return Ok(ParamEntry::Typed {
                name: None,
                ty,
                pos,
            });
        }

        match &self.peek(1).kind {
            TokenKind::Comma | TokenKind::RParen => {
                Ok(ParamEntry::Bare(self.expect_ident("parameter")?))
            }
            // pkg.Type
            TokenKind::Dot => Ok(ParamEntry::Typed {
                name: None,
                ty: self.parse_type()?,
                pos,
            }),
            // `xs []int` versus the instantiation `List[int]`
            TokenKind::LBracket if !self.bracket_starts_array_type(1) => {
                Ok(ParamEntry::Typed {
                    name: None,
                    ty: self.parse_type()?,
                    pos,
                })
            }
            _ => {
                let name = self.expect_ident("parameter name")?;
                let ty = self.parse_param_type()?;
                Ok(ParamEntry::Typed {
                    name: Some(name),
                    ty,
                    pos,
                })
            }
        }
    }

    fn parse_param_type(&mut self) -> Result<TypeExpr, ParseError> {
        if self.check_exact(&TokenKind::Ellipsis) {
            self.advance();
            return Ok(TypeExpr::Ellipsis(Box::new(self.parse_type()?)));
        }
        self.parse_type()
    }

    /// Looks at the `[` at `offset`: true when it opens an array or slice type
    /// (`[]T`, `[4]T`), false when it is a type argument list.
    pub(super) fn bracket_starts_array_type(&self, offset: usize) -> bool {
        if matches!(self.peek(offset + 1).kind, TokenKind::RBracket) {
            return true;
        }
        let mut depth = 0usize;
        let mut idx = offset;
        loop {
            match &self.peek(idx).kind {
                TokenKind::Eof => return false,
                TokenKind::LBracket | TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RBracket | TokenKind::RParen | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return starts_type(&self.peek(idx + 1).kind);
                    }
                }
                _ => {}
            }
            idx += 1;
        }
    }

    /// Applies Go's rule: either every entry carries a name or none does.
    fn group_params(&self, entries: Vec<ParamEntry>) -> Result<Vec<Field>, ParseError> {
        let named = entries
            .iter()
            .any(|e| matches!(e, ParamEntry::Typed { name: Some(_), .. }));

        if !named {
            return Ok(entries
                .into_iter()
                .map(|entry| match entry {
                    ParamEntry::Bare(ident) => Field {
                        names: Vec::new(),
                        pos: ident.pos,
                        ty: TypeExpr::Name(ident),
                    },
                    ParamEntry::Typed { ty, pos, .. } => Field {
                        names: Vec::new(),
                        ty,
                        pos,
                    },
                })
                .collect());
        }

        let mut fields = Vec::new();
        let mut pending: Vec<Ident> = Vec::new();
        for entry in entries {
            match entry {
                ParamEntry::Bare(ident) => pending.push(ident),
                ParamEntry::Typed {
                    name: Some(name),
                    ty,
                    ..
                } => {
                    let mut names = std::mem::take(&mut pending);
                    names.push(name);
                    let pos = names[0].pos;
                    fields.push(Field { names, ty, pos });
                }
                ParamEntry::Typed { name: None, pos, .. } => {
                    return Err(self.error_at(pos, "mixed named and unnamed parameters"));
                }
            }
        }

        if let Some(dangling) = pending.first() {
            return Err(self.error_at(dangling.pos, "mixed named and unnamed parameters"));
        }

        Ok(fields)
    }
}
