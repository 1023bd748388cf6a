//! Turtle tokenizer.
//!
//! Turns a Turtle document into a stream of spanned tokens using winnow,
//! failing fast on the first lexical error with a line/column diagnostic
//! that includes the offending source line.

use std::sync::Arc;

use winnow::ascii::digit1;
use winnow::combinator::{alt, opt, peek, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location, Stream};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use crate::error::{line_col, source_line, ParseError, Result};

/// Lexer input type; tracks byte offsets for spans.
pub type Input<'a> = LocatingSlice<&'a str>;

/// A token with its byte span in the source.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The token kind
    pub kind: TokenKind,
    /// Start byte offset
    pub start: usize,
    /// End byte offset
    pub end: usize,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

/// Turtle token kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// IRI reference: `<http://example.org/>`
    IriRef(Arc<str>),
    /// Prefixed name with a local part: `ex:alice`
    PName {
        /// Namespace prefix (empty for the default prefix)
        prefix: Arc<str>,
        /// Local name
        local: Arc<str>,
    },
    /// Bare prefixed namespace: `ex:` (also `:`)
    PNameNs(Arc<str>),
    /// Labeled blank node: `_:b0`
    BlankLabel(Arc<str>),
    /// Anonymous blank node: `[]`
    Anon,
    /// Empty collection: `()`
    Nil,
    /// String literal, unescaped content
    StringLit(Arc<str>),
    /// Integer literal
    Integer(i64),
    /// Decimal literal, lexical form preserved
    Decimal(Arc<str>),
    /// Double literal (mantissa + exponent)
    Double(f64),
    /// Language tag without the `@`: `en`, `en-US`
    LangTag(Arc<str>),
    /// `@prefix`
    PrefixDecl,
    /// `@base`
    BaseDecl,
    /// SPARQL-style `PREFIX`
    SparqlPrefix,
    /// SPARQL-style `BASE`
    SparqlBase,
    /// `a` (rdf:type shorthand)
    A,
    /// `true`
    True,
    /// `false`
    False,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `^^`
    DatatypeMarker,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// End of input
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::IriRef(s) => write!(f, "<{}>", s),
            TokenKind::PName { prefix, local } => write!(f, "{}:{}", prefix, local),
            TokenKind::PNameNs(s) => write!(f, "{}:", s),
            TokenKind::BlankLabel(s) => write!(f, "_:{}", s),
            TokenKind::Anon => write!(f, "[]"),
            TokenKind::Nil => write!(f, "()"),
            TokenKind::StringLit(s) => write!(f, "\"{}\"", s),
            TokenKind::Integer(n) => write!(f, "{}", n),
            TokenKind::Decimal(s) => write!(f, "{}", s),
            TokenKind::Double(n) => write!(f, "{:e}", n),
            TokenKind::LangTag(s) => write!(f, "@{}", s),
            TokenKind::PrefixDecl => write!(f, "@prefix"),
            TokenKind::BaseDecl => write!(f, "@base"),
            TokenKind::SparqlPrefix => write!(f, "PREFIX"),
            TokenKind::SparqlBase => write!(f, "BASE"),
            TokenKind::A => write!(f, "a"),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::DatatypeMarker => write!(f, "^^"),
            TokenKind::OpenBracket => write!(f, "["),
            TokenKind::CloseBracket => write!(f, "]"),
            TokenKind::OpenParen => write!(f, "("),
            TokenKind::CloseParen => write!(f, ")"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

/// Tokenize a Turtle document.
///
/// Stops at the first invalid token and reports it with line/column and a
/// caret pointing into the offending source line.
pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut input = LocatingSlice::new(src);

    loop {
        skip_trivia(&mut input);

        if input.is_empty() {
            let at = input.current_token_start();
            tokens.push(Token::new(TokenKind::Eof, at, at));
            return Ok(tokens);
        }

        let start = input.current_token_start();
        match scan_token(&mut input) {
            Ok(kind) => {
                let end = input.current_token_start();
                tokens.push(Token::new(kind, start, end));
            }
            Err(_) => return Err(lex_error(src, start, &input)),
        }
    }
}

/// Build the fail-fast diagnostic for an invalid token.
fn lex_error(src: &str, offset: usize, input: &Input<'_>) -> ParseError {
    let bad = input.as_ref().chars().next().unwrap_or('?');
    let (line, column) = line_col(src, offset);
    let excerpt = source_line(src, line);
    let caret = " ".repeat(column.saturating_sub(1));

    // The failure is reported at the token start, so an invalid escape
    // inside a string still points at the opening quote.
    let what = match bad {
        '"' | '\'' => "unterminated or invalid string literal".to_string(),
        '<' => "invalid or unterminated IRI".to_string(),
        c => format!("unexpected character '{}'", c.escape_default()),
    };

    ParseError::syntax(
        src,
        offset,
        format!("{}\n  |\n{} | {}\n  | {}^", what, line, excerpt, caret),
    )
}

/// Skip whitespace and `#` comments.
fn skip_trivia(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str, ContextError> = take_while(0.., is_ws).parse_next(input);
        if input.starts_with('#') {
            let _: ModalResult<&str, ContextError> =
                take_till(0.., |c| c == '\n' || c == '\r').parse_next(input);
            let _: ModalResult<Option<char>, ContextError> =
                opt(one_of(['\n', '\r'])).parse_next(input);
        } else {
            break;
        }
    }
}

fn scan_token(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        "^^".map(|_| TokenKind::DatatypeMarker),
        scan_iri_ref,
        scan_blank_label,
        scan_anon,
        scan_nil,
        scan_at_word,
        scan_default_pname,
        scan_pname_or_keyword,
        scan_string,
        scan_numeric,
        scan_punct,
    ))
    .parse_next(input)
}

fn backtrack<T>() -> ModalResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

// ---------------------------------------------------------------------------
// IRI references
// ---------------------------------------------------------------------------

fn scan_iri_ref(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    '<'.parse_next(input)?;
    let mut iri = String::new();
    loop {
        let chunk: &str = take_while(0.., is_iri_char).parse_next(input)?;
        iri.push_str(chunk);

        if input.starts_with('>') {
            break;
        }
        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            // Only \u / \U escapes are legal inside an IRI
            let c: char = any.parse_next(input)?;
            match c {
                'u' => iri.push(hex_escape(input, 4)?),
                'U' => iri.push(hex_escape(input, 8)?),
                _ => return backtrack(),
            }
        } else {
            return backtrack();
        }
    }
    '>'.parse_next(input)?;
    // Empty IRIs are legal (relative reference to the base)
    Ok(TokenKind::IriRef(Arc::from(iri)))
}

// ---------------------------------------------------------------------------
// Directives and language tags
// ---------------------------------------------------------------------------

fn scan_at_word(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    '@'.parse_next(input)?;
    let word: &str =
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-').parse_next(input)?;
    match word {
        "prefix" => Ok(TokenKind::PrefixDecl),
        "base" => Ok(TokenKind::BaseDecl),
        _ => Ok(TokenKind::LangTag(Arc::from(word))),
    }
}

// ---------------------------------------------------------------------------
// Prefixed names and keywords
// ---------------------------------------------------------------------------

/// `:local` or bare `:` (the default prefix).
fn scan_default_pname(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ':'.parse_next(input)?;
    match opt(scan_local_name).parse_next(input)? {
        Some(local) => Ok(TokenKind::PName {
            prefix: Arc::from(""),
            local: Arc::from(local.as_str()),
        }),
        None => Ok(TokenKind::PNameNs(Arc::from(""))),
    }
}

/// A word that is either `prefix:local`, `prefix:`, or one of the bare
/// keywords (`a`, `true`, `false`, `PREFIX`, `BASE`).
fn scan_pname_or_keyword(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let start = input.checkpoint();

    let first = match input.as_ref().chars().next() {
        Some(c) => c,
        None => return backtrack(),
    };
    let valid_prefix_start = is_pn_chars_base(first);

    let mut word = String::new();
    let c: char = any.parse_next(input)?;
    word.push(c);

    // PN_PREFIX allows interior dots but cannot end with one
    loop {
        let chunk: &str = take_while(0.., is_pn_chars).parse_next(input)?;
        word.push_str(chunk);

        if input.starts_with('.') {
            let after_dot = input.as_ref()[1..].chars().next();
            if after_dot.is_some_and(is_pn_chars) {
                '.'.parse_next(input)?;
                word.push('.');
                continue;
            }
        }
        break;
    }

    if peek(opt(':')).parse_next(input)?.is_some() {
        if !valid_prefix_start {
            input.reset(&start);
            return backtrack();
        }
        ':'.parse_next(input)?;
        match opt(scan_local_name).parse_next(input)? {
            Some(local) => Ok(TokenKind::PName {
                prefix: Arc::from(word.as_str()),
                local: Arc::from(local.as_str()),
            }),
            None => Ok(TokenKind::PNameNs(Arc::from(word.as_str()))),
        }
    } else {
        match word.as_str() {
            "a" => Ok(TokenKind::A),
            "true" => Ok(TokenKind::True),
            "false" => Ok(TokenKind::False),
            "PREFIX" => Ok(TokenKind::SparqlPrefix),
            "BASE" => Ok(TokenKind::SparqlBase),
            _ => {
                input.reset(&start);
                backtrack()
            }
        }
    }
}

/// PN_LOCAL: the part after the colon, with `%XX` and `\`-escapes.
fn scan_local_name(input: &mut Input<'_>) -> ModalResult<String> {
    let first = match input.as_ref().chars().next() {
        Some(c) => c,
        None => return backtrack(),
    };
    if !is_pn_local_start(first) && first != '%' && first != '\\' {
        return backtrack();
    }

    let mut local = String::new();
    loop {
        let chunk: &str =
            take_while(0.., |c: char| is_pn_chars(c) || c == ':').parse_next(input)?;
        local.push_str(chunk);

        if input.starts_with('.') {
            let after_dot = input.as_ref()[1..].chars().next();
            if after_dot.is_some_and(|c| is_pn_chars(c) || c == ':' || c == '%' || c == '\\') {
                '.'.parse_next(input)?;
                local.push('.');
                continue;
            }
            break;
        }

        if input.starts_with('%') {
            '%'.parse_next(input)?;
            let hex: &str = take_while(2..=2, AsChar::is_hex_digit).parse_next(input)?;
            local.push('%');
            local.push_str(hex);
        } else if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            let escaped: char = any.parse_next(input)?;
            if "_~.-!$&'()*+,;=/?#@%".contains(escaped) {
                local.push(escaped);
            } else {
                return backtrack();
            }
        } else {
            break;
        }
    }

    if local.is_empty() {
        return backtrack();
    }
    Ok(local)
}

// ---------------------------------------------------------------------------
// Blank nodes and NIL
// ---------------------------------------------------------------------------

fn scan_blank_label(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    preceded("_:", scan_blank_name)
        .map(|name: &str| TokenKind::BlankLabel(Arc::from(name)))
        .parse_next(input)
}

fn scan_blank_name<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    (
        take_while(1, |c: char| is_pn_chars_u(c) || c.is_ascii_digit()),
        // interior dots only; a trailing dot is the statement terminator
        |i: &mut Input<'a>| -> ModalResult<()> {
            loop {
                let _: &str = take_while(0.., is_pn_chars).parse_next(i)?;
                if i.starts_with('.') {
                    let after_dot = i.as_ref()[1..].chars().next();
                    if after_dot.is_some_and(is_pn_chars) {
                        '.'.parse_next(i)?;
                        continue;
                    }
                }
                return Ok(());
            }
        },
    )
        .take()
        .parse_next(input)
}

fn scan_anon(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ('[', take_while(0.., is_ws), ']')
        .map(|_| TokenKind::Anon)
        .parse_next(input)
}

fn scan_nil(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    ('(', take_while(0.., is_ws), ')')
        .map(|_| TokenKind::Nil)
        .parse_next(input)
}

// ---------------------------------------------------------------------------
// String literals
// ---------------------------------------------------------------------------

fn scan_string(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        |i: &mut Input<'_>| scan_long_string(i, '"', "\"\"\""),
        |i: &mut Input<'_>| scan_long_string(i, '\'', "'''"),
        |i: &mut Input<'_>| scan_short_string(i, '"'),
        |i: &mut Input<'_>| scan_short_string(i, '\''),
    ))
    .parse_next(input)
}

/// Single-line string in `quote` delimiters, escape sequences expanded.
fn scan_short_string(input: &mut Input<'_>, mut quote: char) -> ModalResult<TokenKind> {
    quote.parse_next(input)?;
    let mut content = String::new();
    loop {
        let chunk: &str =
            take_while(0.., |c: char| c != quote && c != '\\' && c != '\n' && c != '\r')
                .parse_next(input)?;
        content.push_str(chunk);

        if input.starts_with(quote) {
            break;
        }
        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            content.push(unescape(input)?);
        } else {
            // EOF or raw newline before the closing quote
            return backtrack();
        }
    }
    quote.parse_next(input)?;
    Ok(TokenKind::StringLit(Arc::from(content)))
}

/// Triple-quoted string; may span lines and contain unescaped quotes.
fn scan_long_string(
    input: &mut Input<'_>,
    quote: char,
    mut delim: &'static str,
) -> ModalResult<TokenKind> {
    delim.parse_next(input)?;
    let mut content = String::new();
    loop {
        let chunk: &str = take_while(0.., |c: char| c != quote && c != '\\').parse_next(input)?;
        content.push_str(chunk);

        if input.starts_with(delim) {
            break;
        }
        if input.starts_with('\\') {
            '\\'.parse_next(input)?;
            content.push(unescape(input)?);
        } else if input.starts_with(quote) {
            let c: char = any.parse_next(input)?;
            content.push(c);
        } else {
            return backtrack();
        }
    }
    delim.parse_next(input)?;
    Ok(TokenKind::StringLit(Arc::from(content)))
}

/// Expand one escape sequence (the backslash is already consumed).
fn unescape(input: &mut Input<'_>) -> ModalResult<char> {
    let c: char = any.parse_next(input)?;
    match c {
        't' => Ok('\t'),
        'b' => Ok('\x08'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        'f' => Ok('\x0C'),
        '"' => Ok('"'),
        '\'' => Ok('\''),
        '\\' => Ok('\\'),
        'u' => hex_escape(input, 4),
        'U' => hex_escape(input, 8),
        _ => backtrack(),
    }
}

fn hex_escape(input: &mut Input<'_>, len: usize) -> ModalResult<char> {
    let hex: &str = take_while(len..=len, AsChar::is_hex_digit).parse_next(input)?;
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .map_or_else(backtrack, Ok)
}

// ---------------------------------------------------------------------------
// Numeric literals
// ---------------------------------------------------------------------------

fn scan_numeric(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((scan_double, scan_decimal, scan_integer)).parse_next(input)
}

fn scan_integer(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let sign = opt(one_of(['+', '-'])).parse_next(input)?;
    let digits: &str = digit1.parse_next(input)?;

    // An exponent or a fractional part means this is not an integer
    if peek(opt(one_of(['e', 'E']))).parse_next(input)?.is_some() {
        return backtrack();
    }
    if input.starts_with('.') {
        let after_dot = input.as_ref()[1..].chars().next();
        if after_dot.is_some_and(|c| c.is_ascii_digit()) {
            return backtrack();
        }
    }

    let mut lexical = String::new();
    if let Some(s) = sign {
        lexical.push(s);
    }
    lexical.push_str(digits);
    match lexical.parse::<i64>() {
        Ok(value) => Ok(TokenKind::Integer(value)),
        Err(_) => backtrack(),
    }
}

fn scan_decimal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let sign = opt(one_of(['+', '-'])).parse_next(input)?;
    let (whole, frac) = alt((
        (digit1, preceded('.', digit1)).map(|(w, f): (&str, &str)| (Some(w), f)),
        preceded('.', digit1).map(|f: &str| (None, f)),
    ))
    .parse_next(input)?;

    if peek(opt(one_of(['e', 'E']))).parse_next(input)?.is_some() {
        return backtrack();
    }

    let mut lexical = String::new();
    if let Some(s) = sign {
        lexical.push(s);
    }
    if let Some(w) = whole {
        lexical.push_str(w);
    }
    lexical.push('.');
    lexical.push_str(frac);
    Ok(TokenKind::Decimal(Arc::from(lexical)))
}

fn scan_double(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let sign = opt(one_of(['+', '-'])).parse_next(input)?;
    let mantissa: &str = alt((
        (digit1, '.', opt(digit1)).take(),
        ('.', digit1).take(),
        digit1,
    ))
    .parse_next(input)?;
    one_of(['e', 'E']).parse_next(input)?;
    let exp_sign = opt(one_of(['+', '-'])).parse_next(input)?;
    let exp: &str = digit1.parse_next(input)?;

    let mut lexical = String::new();
    if let Some(s) = sign {
        lexical.push(s);
    }
    lexical.push_str(mantissa);
    lexical.push('e');
    if let Some(s) = exp_sign {
        lexical.push(s);
    }
    lexical.push_str(exp);

    match lexical.parse::<f64>() {
        Ok(value) => Ok(TokenKind::Double(value)),
        Err(_) => backtrack(),
    }
}

// ---------------------------------------------------------------------------
// Punctuation
// ---------------------------------------------------------------------------

fn scan_punct(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c| match c {
        '.' => Some(TokenKind::Dot),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        '[' => Some(TokenKind::OpenBracket),
        ']' => Some(TokenKind::CloseBracket),
        '(' => Some(TokenKind::OpenParen),
        ')' => Some(TokenKind::CloseParen),
        _ => None,
    })
    .parse_next(input)
}

// ---------------------------------------------------------------------------
// Character classes (Turtle grammar productions, shared with SPARQL)
// ---------------------------------------------------------------------------

/// PN_CHARS_BASE
fn is_pn_chars_base(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | 'a'..='z'
        | '\u{00C0}'..='\u{00D6}'
        | '\u{00D8}'..='\u{00F6}'
        | '\u{00F8}'..='\u{02FF}'
        | '\u{0370}'..='\u{037D}'
        | '\u{037F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// PN_CHARS_U = PN_CHARS_BASE | '_'
fn is_pn_chars_u(c: char) -> bool {
    is_pn_chars_base(c) || c == '_'
}

/// PN_CHARS
fn is_pn_chars(c: char) -> bool {
    is_pn_chars_u(c)
        || c == '-'
        || c.is_ascii_digit()
        || c == '\u{00B7}'
        || matches!(c, '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// First character of PN_LOCAL
fn is_pn_local_start(c: char) -> bool {
    is_pn_chars_u(c) || c == ':' || c.is_ascii_digit()
}

fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Characters allowed unescaped inside `<...>`.
fn is_iri_char(c: char) -> bool {
    !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\x00'..='\x20')
}
