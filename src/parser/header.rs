use super::*;

impl Parser {
    pub(super) fn parse_package_clause(&mut self) -> Result<Ident, ParseError> {
        self.expect_exact(&TokenKind::Package)?;
        let name = self.expect_ident("package name")?;
        self.expect_terminator()?;
        Ok(name)
    }

    pub(super) fn parse_import_decl(&mut self) -> Result<Vec<Import>, ParseError> {
        self.expect_exact(&TokenKind::Import)?;
        self.parse_group(Self::parse_import_spec)
    }

    fn parse_import_spec(&mut self) -> Result<Import, ParseError> {
        let pos = self.position();
        let name = match &self.current().kind {
            TokenKind::Ident(_) => Some(self.expect_ident("import name")?),
            TokenKind::Dot => {
                self.advance();
                Some(Ident {
                    name: ".".to_string(),
                    pos,
                })
            }
            _ => None,
        };

        match &self.current().kind {
            TokenKind::Str(path) => {
                let path = path.clone();
                self.advance();
                Ok(Import { name, path })
            }
            other => Err(self.error(format!("expected import path, found '{}'", other))),
        }
    }
}
