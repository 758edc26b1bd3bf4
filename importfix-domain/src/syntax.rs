//! Import directive recognition.
//!
//! One tokenizing pass over the text yields structured occurrences with exact byte spans;
//! rewriting works on those spans and never re-searches the text.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*(#[ \t]*((?i:import|include)))[ \t]*(["<])([^"<>\r\n]*)([">])"#)
        .expect("directive pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    /// `"Module/Header.h"`
    QuotedWithSlash,
    /// `<Module/Header.h>`
    AngleWithSlash,
    /// `"Header.h"` or `<Header.h>`
    NoSlash,
    /// Mismatched delimiters around a path, or an empty payload.
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Quote,
    Angle,
}

impl Delimiter {
    fn from_char(c: &str) -> Self {
        if c == "<" || c == ">" {
            Delimiter::Angle
        } else {
            Delimiter::Quote
        }
    }
}

/// One import directive found in source text.
///
/// For `#import "Kit/Views/Button.h"`: `directive` is `#import`, `payload` is
/// `Kit/Views/Button.h`, `module` is `Kit` and `header` is `Views/Button.h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOccurrence<'a> {
    /// Byte range of `raw` within the scanned text.
    pub span: Range<usize>,
    /// 1-based line number.
    pub line: u32,
    pub raw: &'a str,
    /// Directive text up to the keyword's end, e.g. `#import` or `# include`.
    pub directive: &'a str,
    pub keyword: &'a str,
    pub open: Delimiter,
    pub close: Delimiter,
    pub payload: &'a str,
    pub module: Option<&'a str>,
    pub header: Option<&'a str>,
    pub kind: SyntaxKind,
}

fn classify(open: Delimiter, payload: &str, close: Delimiter) -> SyntaxKind {
    let has_slash = payload.contains('/');
    if open == Delimiter::Quote && close == Delimiter::Quote && has_slash {
        SyntaxKind::QuotedWithSlash
    } else if !has_slash && !payload.is_empty() {
        SyntaxKind::NoSlash
    } else if open == Delimiter::Angle && close == Delimiter::Angle && has_slash {
        SyntaxKind::AngleWithSlash
    } else {
        SyntaxKind::Unrecognized
    }
}

/// Lazy iterator over the import directives of a text, in source order.
///
/// `Scan` is `Clone`; a clone restarts from the clone point.
#[derive(Debug, Clone)]
pub struct Scan<'a> {
    text: &'a str,
    pos: usize,
    line: u32,
    line_pos: usize,
}

pub fn scan(text: &str) -> Scan<'_> {
    Scan {
        text,
        pos: 0,
        line: 1,
        line_pos: 0,
    }
}

impl<'a> Iterator for Scan<'a> {
    type Item = ImportOccurrence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos > self.text.len() {
            return None;
        }
        let caps = DIRECTIVE.captures_at(self.text, self.pos)?;
        let directive = caps.get(1)?;
        let end = caps.get(0)?.end();
        let start = directive.start();
        self.pos = end;

        self.line += self.text[self.line_pos..start].matches('\n').count() as u32;
        self.line_pos = start;

        let open = Delimiter::from_char(caps.get(3)?.as_str());
        let payload = caps.get(4)?.as_str();
        let close = Delimiter::from_char(caps.get(5)?.as_str());
        let kind = classify(open, payload, close);

        let (module, header) = match kind {
            SyntaxKind::QuotedWithSlash | SyntaxKind::AngleWithSlash => {
                match payload.split_once('/') {
                    Some((m, h)) => (Some(m), Some(h)),
                    None => (None, None),
                }
            }
            SyntaxKind::NoSlash => (None, Some(payload)),
            SyntaxKind::Unrecognized => (None, None),
        };

        Some(ImportOccurrence {
            span: start..end,
            line: self.line,
            raw: &self.text[start..end],
            directive: directive.as_str(),
            keyword: caps.get(2)?.as_str(),
            open,
            close,
            payload,
            module,
            header,
            kind,
        })
    }
}
