use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::id_generator::IdGenerator;
use crate::lower::lower;
use crate::tokenizer::{unescape_literal, Token};
use crate::widget::WidgetNode;
use logos::Logos;
use std::ops::Range;
use tracing::debug;

type Spanned<'src> = (Token<'src>, Range<usize>);

/// Where a raw (character level) skip stops
#[derive(Debug, Clone, Copy, PartialEq)]
enum RawStop {
    /// Starts on an opening bracket, ends after its matching close
    Group,
    /// Ends after the first unmatched `}`
    BlockEnd,
    /// Ends after `;`, or before `return` / an unmatched `}`
    Statement,
    /// Ends before `,` or an unmatched closing bracket
    Entry,
}

/// Parser for the JSX component dialect
///
/// Tokens are lexed on demand from the current byte offset rather than up
/// front, because JSX text and attribute strings need to be scanned raw.
pub struct Parser<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    /// Parse a complete document
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut imports = Vec::new();
        let mut components: Vec<Component> = Vec::new();
        let mut default_export = None;

        while let Some((token, span)) = self.peek()? {
            match token {
                Token::Import => imports.push(self.parse_import()?),
                Token::Export => {
                    self.advance()?;
                    if self.match_token(Token::Default)? {
                        match self.peek()? {
                            Some((Token::Ident(name), _)) => {
                                self.advance()?;
                                default_export = Some(name.to_string());
                                self.match_token(Token::Semicolon)?;
                            }
                            _ => components.push(self.parse_component(span.start, true)?),
                        }
                    } else {
                        components.push(self.parse_component(span.start, true)?);
                    }
                }
                Token::Const | Token::Let | Token::Var | Token::Function => {
                    components.push(self.parse_component(span.start, false)?);
                }
                Token::Semicolon => {
                    self.advance()?;
                }
                other => {
                    return Err(ParseError::unexpected_token(
                        span.start,
                        "import, component definition or export",
                        other.to_string(),
                    ));
                }
            }
        }

        let mut components = components.into_iter();
        let component = components.next().ok_or_else(|| {
            ParseError::invalid_syntax(self.source.len(), "No component definition found")
        })?;

        if let Some(extra) = components.next() {
            return Err(ParseError::invalid_syntax(
                extra.span.start,
                format!(
                    "Only a single top-level component is supported, found a second one: '{}'",
                    extra.name
                ),
            ));
        }

        Ok(Program {
            imports,
            component,
            default_export,
            span: Span::new(0, self.source.len()),
        })
    }

    /// Parse an import declaration
    fn parse_import(&mut self) -> ParseResult<Import> {
        let start = self.expect(Token::Import)?.start;

        let mut default = None;
        let mut namespace = None;
        let mut named = Vec::new();

        // Side-effect import: import './styles.css';
        if let Some((Token::String(raw), _)) = self.peek()? {
            self.advance()?;
            self.match_token(Token::Semicolon)?;
            return Ok(Import {
                default,
                namespace,
                named,
                source: unescape_literal(raw),
                span: Span::new(start, self.pos),
            });
        }

        let mut needs_more = true;
        if let Some((Token::Ident(name), _)) = self.peek()? {
            self.advance()?;
            default = Some(name.to_string());
            needs_more = self.match_token(Token::Comma)?;
        }

        if needs_more {
            match self.peek()? {
                Some((Token::Star, _)) => {
                    self.advance()?;
                    self.expect(Token::As)?;
                    namespace = Some(self.expect_ident()?);
                }
                Some((Token::LBrace, _)) => {
                    self.advance()?;
                    while !self.match_token(Token::RBrace)? {
                        let imported = self.expect_specifier_name()?;
                        let local = if self.match_token(Token::As)? {
                            self.expect_ident()?
                        } else {
                            imported.clone()
                        };
                        named.push(ImportSpecifier { imported, local });

                        if !self.match_token(Token::Comma)? {
                            self.expect(Token::RBrace)?;
                            break;
                        }
                    }
                }
                _ => return Err(self.error_here("import specifiers")),
            }
        }

        self.expect(Token::From)?;
        let source = self.expect_string()?;
        self.match_token(Token::Semicolon)?;

        Ok(Import {
            default,
            namespace,
            named,
            source,
            span: Span::new(start, self.pos),
        })
    }

    /// Parse the component definition. The leading `export`/`export default`
    /// (if any) has already been consumed.
    fn parse_component(&mut self, start: usize, exported: bool) -> ParseResult<Component> {
        let (keyword, keyword_span) = self
            .advance()?
            .ok_or_else(|| ParseError::unexpected_eof(self.source.len(), "component definition"))?;

        let (name, root) = match keyword {
            Token::Function => {
                let name = self.expect_ident()?;
                self.skip_raw_group('(')?;
                self.expect(Token::LBrace)?;
                (name, self.parse_block_body()?)
            }
            Token::Const | Token::Let | Token::Var => {
                let name = self.expect_ident()?;
                if self.match_token(Token::Colon)? {
                    self.skip_type_annotation(Token::Equals)?;
                }
                self.expect(Token::Equals)?;
                (name, self.parse_function_value()?)
            }
            other => {
                return Err(ParseError::unexpected_token(
                    keyword_span.start,
                    "component definition",
                    other.to_string(),
                ));
            }
        };

        self.match_token(Token::Semicolon)?;
        debug!(component = %name, "parsed component definition");

        Ok(Component {
            name,
            exported,
            root,
            span: Span::new(start, self.pos),
        })
    }

    /// Arrow function or function expression returning JSX
    fn parse_function_value(&mut self) -> ParseResult<JsxElement> {
        if self.match_token(Token::Function)? {
            self.match_token(Token::Ident(""))?;
            self.skip_raw_group('(')?;
            self.expect(Token::LBrace)?;
            return self.parse_block_body();
        }

        match self.peek()? {
            Some((Token::LParen, _)) => self.skip_raw_group('(')?,
            Some((Token::Ident(_), _)) => {
                self.advance()?;
            }
            _ => return Err(self.error_here("arrow function")),
        }

        if self.match_token(Token::Colon)? {
            self.skip_type_annotation(Token::Arrow)?;
        }
        self.expect(Token::Arrow)?;

        if self.match_token(Token::LBrace)? {
            self.parse_block_body()
        } else {
            self.parse_returned_jsx()
        }
    }

    /// Parse a function body up to and including its closing brace,
    /// returning the JSX of its `return` statement
    fn parse_block_body(&mut self) -> ParseResult<JsxElement> {
        loop {
            match self.peek()? {
                None => return Err(ParseError::unexpected_eof(self.source.len(), "'return' statement")),
                Some((Token::Return, _)) => {
                    self.advance()?;
                    let root = self.parse_returned_jsx()?;
                    self.match_token(Token::Semicolon)?;
                    self.skip_raw(RawStop::BlockEnd)?;
                    return Ok(root);
                }
                Some((Token::RBrace, span)) => {
                    return Err(ParseError::invalid_syntax(
                        span.start,
                        "Component body has no return statement",
                    ));
                }
                Some(_) => self.skip_raw(RawStop::Statement)?,
            }
        }
    }

    fn parse_returned_jsx(&mut self) -> ParseResult<JsxElement> {
        if self.match_token(Token::LParen)? {
            let root = self.parse_returned_jsx()?;
            self.expect(Token::RParen)?;
            Ok(root)
        } else {
            self.parse_jsx_element()
        }
    }

    /// Skip a type annotation up to (not including) `terminator` at depth 0
    fn skip_type_annotation(&mut self, terminator: Token<'src>) -> ParseResult<()> {
        let mut depth = 0usize;
        loop {
            match self.peek()? {
                None => return Err(ParseError::unexpected_eof(self.source.len(), terminator.to_string())),
                Some((token, _)) if depth == 0 && same_kind(&token, &terminator) => return Ok(()),
                Some((Token::LAngle | Token::LParen | Token::LBracket | Token::LBrace, _)) => depth += 1,
                Some((Token::RAngle | Token::RParen | Token::RBracket | Token::RBrace, _)) => {
                    depth = depth.saturating_sub(1);
                }
                Some(_) => {}
            }
            self.advance()?;
        }
    }

    // JSX

    /// Parse an element or fragment starting at `<`
    fn parse_jsx_element(&mut self) -> ParseResult<JsxElement> {
        self.skip_trivia();
        let start = self.pos;
        self.expect_char('<', "JSX element")?;
        self.skip_trivia();

        if self.eat_char('>') {
            let name = JsxName::fragment();
            let children = self.parse_jsx_children(&name)?;
            return Ok(JsxElement {
                name,
                attributes: vec![],
                children,
                self_closing: false,
                span: Span::new(start, self.pos),
            });
        }

        let name = self.parse_jsx_element_name()?;
        let mut attributes = Vec::new();

        loop {
            self.skip_trivia();
            match self.peek_char() {
                Some('/') => {
                    self.pos += 1;
                    self.skip_trivia();
                    self.expect_char('>', "'>'")?;
                    return Ok(JsxElement {
                        name,
                        attributes,
                        children: vec![],
                        self_closing: true,
                        span: Span::new(start, self.pos),
                    });
                }
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                // Spread attributes carry no literal data
                Some('{') => self.skip_raw_group('{')?,
                Some(_) => attributes.push(self.parse_jsx_attribute()?),
                None => return Err(ParseError::unexpected_eof(self.source.len(), "'>'")),
            }
        }

        let children = self.parse_jsx_children(&name)?;

        Ok(JsxElement {
            name,
            attributes,
            children,
            self_closing: false,
            span: Span::new(start, self.pos),
        })
    }

    fn parse_jsx_element_name(&mut self) -> ParseResult<JsxName> {
        let mut segments = vec![self.expect_jsx_name("element name")?];

        loop {
            self.skip_trivia();
            if !self.eat_char('.') {
                break;
            }
            self.skip_trivia();
            segments.push(self.expect_jsx_name("member name")?);
        }

        Ok(JsxName { segments })
    }

    fn parse_jsx_attribute(&mut self) -> ParseResult<JsxAttribute> {
        let start = self.pos;
        let name = self.expect_jsx_name("attribute name")?;
        self.skip_trivia();

        let value = if self.eat_char('=') {
            self.skip_trivia();
            match self.peek_char() {
                Some(quote @ ('"' | '\'')) => AttrValue::Literal(Literal::String(self.scan_attr_string(quote)?)),
                Some('{') => match self.parse_expression_container()? {
                    JsxExpression::Literal(literal) => AttrValue::Literal(literal),
                    JsxExpression::Empty | JsxExpression::Dynamic => AttrValue::Dynamic,
                },
                Some('<') => {
                    self.parse_jsx_element()?;
                    AttrValue::Dynamic
                }
                _ => return Err(self.char_error("attribute value")),
            }
        } else {
            AttrValue::Absent
        };

        Ok(JsxAttribute {
            name,
            value,
            span: Span::new(start, self.pos),
        })
    }

    /// Parse children up to and including the closing tag of `parent`
    fn parse_jsx_children(&mut self, parent: &JsxName) -> ParseResult<Vec<JsxChild>> {
        let mut children = Vec::new();

        loop {
            let source = self.source;
            let rest = &source[self.pos..];
            let text_len = rest.find(['<', '{']).unwrap_or(rest.len());

            if text_len > 0 {
                children.push(JsxChild::Text {
                    value: rest[..text_len].to_string(),
                    span: Span::new(self.pos, self.pos + text_len),
                });
                self.pos += text_len;
            }

            match self.peek_char() {
                None => {
                    return Err(ParseError::unexpected_eof(
                        self.source.len(),
                        format!("closing tag </{}>", parent.full()),
                    ));
                }
                Some('{') => {
                    let start = self.pos;
                    let expression = self.parse_expression_container()?;
                    children.push(JsxChild::Expression {
                        expression,
                        span: Span::new(start, self.pos),
                    });
                }
                Some(_) => {
                    let tag_start = self.pos;
                    self.pos += 1;
                    self.skip_trivia();

                    if self.eat_char('/') {
                        self.skip_trivia();
                        let closing = if self.peek_char() == Some('>') {
                            JsxName::fragment()
                        } else {
                            self.parse_jsx_element_name()?
                        };
                        self.skip_trivia();
                        self.expect_char('>', "'>'")?;

                        if closing != *parent {
                            return Err(ParseError::invalid_syntax(
                                tag_start,
                                format!(
                                    "Expected closing tag </{}>, found </{}>",
                                    parent.full(),
                                    closing.full()
                                ),
                            ));
                        }
                        return Ok(children);
                    }

                    self.pos = tag_start;
                    children.push(JsxChild::Element(self.parse_jsx_element()?));
                }
            }
        }
    }

    /// Parse `{ ... }`. Literal contents are kept; anything else is skipped.
    fn parse_expression_container(&mut self) -> ParseResult<JsxExpression> {
        let open = self.pos;
        self.expect_char('{', "'{'")?;
        self.skip_trivia();

        if self.eat_char('}') {
            return Ok(JsxExpression::Empty);
        }

        if let Ok(Some(literal)) = self.parse_literal() {
            if self.match_token(Token::RBrace).unwrap_or(false) {
                return Ok(JsxExpression::Literal(literal));
            }
        }

        self.pos = open;
        self.skip_raw_group('{')?;
        Ok(JsxExpression::Dynamic)
    }

    /// Parse a literal expression. `Ok(None)` means the expression is not a
    /// literal; the position is then unspecified and callers must rewind.
    fn parse_literal(&mut self) -> ParseResult<Option<Literal>> {
        let Some((token, _)) = self.peek()? else {
            return Ok(None);
        };

        let literal = match token {
            Token::String(raw) => {
                self.advance()?;
                Literal::String(unescape_literal(raw))
            }
            Token::Template(raw) => {
                if raw.contains("${") {
                    return Ok(None);
                }
                self.advance()?;
                Literal::String(unescape_literal(raw))
            }
            Token::Number(raw) => {
                self.advance()?;
                match raw.parse::<f64>() {
                    Ok(n) => Literal::Number(n),
                    Err(_) => return Ok(None),
                }
            }
            Token::Minus => {
                self.advance()?;
                match self.advance()? {
                    Some((Token::Number(raw), _)) => match raw.parse::<f64>() {
                        Ok(n) => Literal::Number(-n),
                        Err(_) => return Ok(None),
                    },
                    _ => return Ok(None),
                }
            }
            Token::True => {
                self.advance()?;
                Literal::Bool(true)
            }
            Token::False => {
                self.advance()?;
                Literal::Bool(false)
            }
            Token::LBracket => {
                self.advance()?;
                let mut items = Vec::new();
                while !self.match_token(Token::RBracket)? {
                    let Some(item) = self.parse_literal()? else {
                        return Ok(None);
                    };
                    items.push(item);

                    if !self.match_token(Token::Comma)? {
                        if !self.match_token(Token::RBracket)? {
                            return Ok(None);
                        }
                        break;
                    }
                }
                Literal::Array(items)
            }
            Token::LBrace => return self.parse_object_literal(),
            _ => return Ok(None),
        };

        Ok(Some(literal))
    }

    /// Object literal whose non-literal entries are dropped one by one
    fn parse_object_literal(&mut self) -> ParseResult<Option<Literal>> {
        self.expect(Token::LBrace)?;
        let mut entries = Vec::new();

        while !self.match_token(Token::RBrace)? {
            let key = match self.peek()? {
                Some((Token::Ident(name), _)) => {
                    self.advance()?;
                    Some(name.to_string())
                }
                Some((Token::String(raw), _)) => {
                    self.advance()?;
                    Some(unescape_literal(raw))
                }
                Some((Token::Number(raw), _)) => {
                    self.advance()?;
                    Some(raw.to_string())
                }
                // Spreads and computed keys
                Some((Token::Ellipsis | Token::LBracket, _)) => None,
                _ => return Ok(None),
            };

            match key {
                Some(key) if self.match_token(Token::Colon)? => {
                    let entry_start = self.pos;
                    let value = self.parse_literal().ok().flatten();
                    let complete = value.is_some() && self.at_entry_end();

                    match value {
                        Some(value) if complete => entries.push((key, value)),
                        _ => {
                            self.pos = entry_start;
                            self.skip_raw(RawStop::Entry)?;
                        }
                    }
                }
                // Shorthand, method, spread or computed entry
                _ => self.skip_raw(RawStop::Entry)?,
            }

            if !self.match_token(Token::Comma)? {
                if !self.match_token(Token::RBrace)? {
                    return Ok(None);
                }
                break;
            }
        }

        Ok(Some(Literal::Object(entries)))
    }

    fn at_entry_end(&self) -> bool {
        matches!(
            self.peek(),
            Ok(Some((Token::Comma | Token::RBrace, _)))
        )
    }

    // Character level scanning

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn eat_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect_char(&mut self, c: char, expected: &str) -> ParseResult<()> {
        if self.eat_char(c) {
            Ok(())
        } else {
            Err(self.char_error(expected))
        }
    }

    /// Skip whitespace and JS comments (valid inside tags, not in JSX text)
    fn skip_trivia(&mut self) {
        loop {
            let rest = &self.source[self.pos..];
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if trimmed.starts_with("//") {
                self.pos += trimmed.find('\n').unwrap_or(trimmed.len());
            } else if let Some(body) = trimmed.strip_prefix("/*") {
                self.pos += body.find("*/").map(|i| i + 4).unwrap_or(trimmed.len());
            } else {
                break;
            }
        }
    }

    fn expect_jsx_name(&mut self, expected: &str) -> ParseResult<String> {
        let rest = &self.source[self.pos..];
        let mut chars = rest.char_indices();

        match chars.next() {
            Some((_, c)) if c.is_alphabetic() || c == '_' || c == '$' => {}
            _ => return Err(self.char_error(expected)),
        }

        let len = chars
            .find(|(_, c)| !(c.is_alphanumeric() || matches!(c, '_' | '$' | '-' | ':')))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        self.pos += len;
        Ok(rest[..len].to_string())
    }

    /// Raw JSX attribute string: no escape processing
    fn scan_attr_string(&mut self, quote: char) -> ParseResult<String> {
        let start = self.pos;
        self.pos += quote.len_utf8();
        let rest = &self.source[self.pos..];

        match rest.find(quote) {
            Some(len) => {
                self.pos += len + quote.len_utf8();
                Ok(rest[..len].to_string())
            }
            None => Err(ParseError::invalid_syntax(start, "Unterminated attribute string")),
        }
    }

    fn skip_raw_group(&mut self, open: char) -> ParseResult<()> {
        self.skip_trivia();
        if self.peek_char() != Some(open) {
            return Err(self.char_error(&format!("'{}'", open)));
        }
        self.skip_raw(RawStop::Group)
    }

    /// Skip source text without tokenizing it, balancing brackets and
    /// stepping over strings and comments
    fn skip_raw(&mut self, stop: RawStop) -> ParseResult<()> {
        let bytes = self.source.as_bytes();
        let mut depth = 0usize;
        let mut i = self.pos;

        while i < bytes.len() {
            match bytes[i] {
                quote @ (b'\'' | b'"' | b'`') => {
                    i = skip_quoted(bytes, i, quote)?;
                    continue;
                }
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i = find_bytes(bytes, i + 2, b"*/").map(|end| end + 2).unwrap_or(bytes.len());
                    continue;
                }
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => {
                    if depth == 0 {
                        return match stop {
                            RawStop::BlockEnd if bytes[i] == b'}' => {
                                self.pos = i + 1;
                                Ok(())
                            }
                            RawStop::Statement | RawStop::Entry => {
                                self.pos = i;
                                Ok(())
                            }
                            _ => Err(ParseError::invalid_syntax(i, "Unbalanced closing bracket")),
                        };
                    }
                    depth -= 1;
                    if depth == 0 && stop == RawStop::Group {
                        self.pos = i + 1;
                        return Ok(());
                    }
                }
                b';' if depth == 0 && stop == RawStop::Statement => {
                    self.pos = i + 1;
                    return Ok(());
                }
                b',' if depth == 0 && stop == RawStop::Entry => {
                    self.pos = i;
                    return Ok(());
                }
                b'r' if depth == 0
                    && stop == RawStop::Statement
                    && i > self.pos
                    && is_word_at(bytes, i, b"return") =>
                {
                    self.pos = i;
                    return Ok(());
                }
                _ => {}
            }
            i += 1;
        }

        let expected = match stop {
            RawStop::Group => "closing bracket",
            RawStop::BlockEnd => "'}'",
            RawStop::Statement => "end of statement",
            RawStop::Entry => "',' or '}'",
        };
        Err(ParseError::unexpected_eof(bytes.len(), expected))
    }

    // Token helpers

    fn lex_at(&self, pos: usize) -> ParseResult<Option<Spanned<'src>>> {
        let source: &'src str = self.source;
        let mut lexer = Token::lexer(&source[pos..]);

        match lexer.next() {
            None => Ok(None),
            Some(Ok(token)) => {
                let span = lexer.span();
                Ok(Some((token, pos + span.start..pos + span.end)))
            }
            Some(Err(())) => Err(ParseError::lexer_error(pos + lexer.span().start)),
        }
    }

    fn peek(&self) -> ParseResult<Option<Spanned<'src>>> {
        self.lex_at(self.pos)
    }

    fn advance(&mut self) -> ParseResult<Option<Spanned<'src>>> {
        let next = self.peek()?;
        if let Some((_, span)) = &next {
            self.pos = span.end;
        }
        Ok(next)
    }

    fn check(&self, token: &Token<'src>) -> ParseResult<bool> {
        Ok(matches!(self.peek()?, Some((t, _)) if same_kind(&t, token)))
    }

    fn match_token(&mut self, token: Token<'src>) -> ParseResult<bool> {
        if self.check(&token)? {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, token: Token<'src>) -> ParseResult<Range<usize>> {
        match self.peek()? {
            Some((t, span)) if same_kind(&t, &token) => {
                self.pos = span.end;
                Ok(span)
            }
            _ => Err(self.error_here(token.to_string())),
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek()? {
            Some((Token::Ident(s), span)) => {
                self.pos = span.end;
                Ok(s.to_string())
            }
            _ => Err(self.error_here("identifier")),
        }
    }

    /// Import specifiers may name keywords (`default as Foo`)
    fn expect_specifier_name(&mut self) -> ParseResult<String> {
        match self.peek()? {
            Some((Token::Default, span)) => {
                self.pos = span.end;
                Ok("default".to_string())
            }
            _ => self.expect_ident(),
        }
    }

    fn expect_string(&mut self) -> ParseResult<String> {
        match self.peek()? {
            Some((Token::String(raw), span)) => {
                self.pos = span.end;
                Ok(unescape_literal(raw))
            }
            _ => Err(self.error_here("string literal")),
        }
    }

    fn error_here(&self, expected: impl Into<String>) -> ParseError {
        match self.peek() {
            Ok(Some((token, span))) => ParseError::unexpected_token(span.start, expected, token.to_string()),
            Ok(None) => ParseError::unexpected_eof(self.source.len(), expected),
            Err(e) => e,
        }
    }

    fn char_error(&self, expected: &str) -> ParseError {
        match self.peek_char() {
            Some(c) => ParseError::unexpected_token(self.pos, expected, format!("'{}'", c)),
            None => ParseError::unexpected_eof(self.source.len(), expected),
        }
    }
}

fn same_kind(a: &Token, b: &Token) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> ParseResult<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Ok(i + 1),
            b'\n' if quote != b'`' => break,
            _ => i += 1,
        }
    }
    Err(ParseError::invalid_syntax(start, "Unterminated string literal"))
}

fn find_bytes(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

fn is_word_at(bytes: &[u8], i: usize, word: &[u8]) -> bool {
    let is_ident = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'$';
    bytes[i..].starts_with(word)
        && (i == 0 || !is_ident(bytes[i - 1]))
        && bytes.get(i + word.len()).map_or(true, |b| !is_ident(*b))
}

/// Parse source text into its syntax tree
pub fn parse_program(source: &str) -> ParseResult<Program> {
    Parser::new(source).parse_program()
}

/// Parse source text into widgets, minting ids from `ids`
pub fn parse_with_ids(source: &str, ids: &mut IdGenerator) -> ParseResult<Vec<WidgetNode>> {
    let program = parse_program(source)?;
    let widgets = lower(&program, ids);
    debug!(count = widgets.len(), "lowered widgets from source");
    Ok(widgets)
}

/// Parse source text into widgets with a fresh id generator
pub fn parse(source: &str) -> ParseResult<Vec<WidgetNode>> {
    parse_with_ids(source, &mut IdGenerator::new("<anonymous>"))
}
