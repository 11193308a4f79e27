//! Source positions as emitted by srcML.
//!
//! srcML annotates every element with `pos:start` and `pos:end` attributes
//! of the form `"line:column"` (both 1-based) when it runs with `--position`.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// A `line:column` location inside a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    line: u32,
    column: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The 1-based line number.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The 1-based column number.
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Error returned when a `pos:start` / `pos:end` attribute is not `line:column`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid position `{0}`, expected `line:column`")]
pub struct InvalidPosition(pub String);

impl FromStr for Position {
    type Err = InvalidPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPosition(s.to_string());
        let (line, column) = s.split_once(':').ok_or_else(invalid)?;
        let line = line.trim().parse().map_err(|_| invalid())?;
        let column = column.trim().parse().map_err(|_| invalid())?;
        Ok(Self { line, column })
    }
}

/// A start/end pair of positions, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    start: Position,
    end: Position,
}

impl Span {
    /// Create a span covering `start..=end`.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Start of the span.
    pub fn start(&self) -> Position {
        self.start
    }

    /// End of the span (inclusive).
    pub fn end(&self) -> Position {
        self.end
    }

    /// Create a union of two spans (encompassing both).
    pub fn union(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Convert the span to a byte range inside `source`.
    ///
    /// Lines and columns are 1-based and the end is inclusive. Columns are
    /// counted in characters. Out-of-range positions are clamped to the
    /// source length.
    pub fn to_byte_range(&self, source: &str) -> std::ops::Range<usize> {
        let start = byte_offset(source, self.start);
        let end = byte_offset(source, self.end);
        let end = source[end..]
            .chars()
            .next()
            .map_or(end, |c| end + c.len_utf8());
        start..end.max(start)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn byte_offset(source: &str, position: Position) -> usize {
    let mut offset = 0;
    for (idx, line) in source.split_inclusive('\n').enumerate() {
        if idx + 1 == position.line as usize {
            let column = position.column.saturating_sub(1) as usize;
            return offset
                + line
                    .char_indices()
                    .nth(column)
                    .map_or(line.len(), |(byte, _)| byte);
        }
        offset += line.len();
    }
    source.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        let pos: Position = "12:7".parse().unwrap();
        assert_eq!(pos.line(), 12);
        assert_eq!(pos.column(), 7);
        assert_eq!(pos.to_string(), "12:7");
    }

    #[test]
    fn test_parse_invalid_position() {
        assert!("12".parse::<Position>().is_err());
        assert!("a:b".parse::<Position>().is_err());
        assert!("".parse::<Position>().is_err());
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }

    #[test]
    fn test_span_union() {
        let a = Span::new(Position::new(1, 1), Position::new(1, 5));
        let b = Span::new(Position::new(2, 1), Position::new(3, 2));
        let u = a.union(b);
        assert_eq!(u.start(), Position::new(1, 1));
        assert_eq!(u.end(), Position::new(3, 2));
    }

    #[test]
    fn test_span_to_byte_range() {
        let source = "int a;\nvoid f();\n";
        let span = Span::new(Position::new(2, 1), Position::new(2, 9));
        assert_eq!(&source[span.to_byte_range(source)], "void f();");
    }

    #[test]
    fn test_span_to_byte_range_clamped() {
        let source = "int a;";
        let span = Span::new(Position::new(4, 1), Position::new(5, 1));
        assert_eq!(span.to_byte_range(source), 6..6);
    }
}
