use super::*;

impl Parser {
    /// Reads a `{ ... }` function body, keeping only the type declarations
    /// and type literals it contains.
    pub(super) fn parse_block(&mut self) -> Result<Vec<BodyItem>, ParseError> {
        self.expect_exact(&TokenKind::LBrace)?;
        let mut items = Vec::new();
        self.scan_tokens(&mut items, false)?;
        self.expect_exact(&TokenKind::RBrace)?;
        Ok(items)
    }

    /// Skips statements or an expression with bracket balancing. Stops before
    /// an unmatched closing bracket, at EOF, or (when `stop_at_semicolon`) at a
    /// top-level `;`.
    pub(super) fn scan_tokens(
        &mut self,
        items: &mut Vec<BodyItem>,
        stop_at_semicolon: bool,
    ) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            match &self.current().kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                    self.advance();
                }
                TokenKind::Semicolon if depth == 0 && stop_at_semicolon => return Ok(()),
                TokenKind::Type if !self.in_type_switch() => {
                    self.advance();
                    let specs = self.parse_group(Self::parse_type_spec)?;
                    items.extend(specs.into_iter().map(BodyItem::Type));
                }
                TokenKind::Interface | TokenKind::Struct => {
                    let ty = self.parse_type()?;
                    items.push(BodyItem::Literal(ty));
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // `x.(type)`
    fn in_type_switch(&self) -> bool {
        matches!(
            self.previous().map(|t| &t.kind),
            Some(TokenKind::LParen)
        )
    }

    /// Skips the rest of a malformed entry inside `{ ... }`, consuming the
    /// terminating `;` but leaving a closing `}` in place.
    pub(super) fn recover_in_block(&mut self) {
        let mut depth = 0usize;
        loop {
            match &self.current().kind {
                TokenKind::Eof => return,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }
}
