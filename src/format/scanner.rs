use crate::error::{Found, ParseError, Separator};
use std::str::FromStr;

/// Strict whitespace-delimited reader over test file text.
///
/// Tokens are maximal runs of non-whitespace characters; separators are
/// matched exactly (one space between tokens, one `\n` per line).
pub(crate) struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    pub(crate) fn scan_token(&mut self, variable: &str) -> Result<&'a str, ParseError> {
        match self.peek() {
            None => Err(ParseError::Unparsable {
                variable: variable.to_string(),
                found: Found::Eof,
            }),
            Some(ch) if ch.is_whitespace() => Err(ParseError::Unparsable {
                variable: variable.to_string(),
                found: Found::Whitespace,
            }),
            Some(_) => {
                let rest = &self.input[self.pos..];
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                self.pos += end;
                Ok(&rest[..end])
            }
        }
    }

    /// Read one token and convert it; out-of-range numbers fail like any other
    /// unconvertible token.
    pub(crate) fn parse_value<T: FromStr>(&mut self, variable: &str) -> Result<T, ParseError> {
        let token = self.scan_token(variable)?;
        token.parse::<T>().map_err(|_| ParseError::Unparsable {
            variable: variable.to_string(),
            found: Found::Token(token.to_string()),
        })
    }

    pub(crate) fn expect_space(&mut self, after: Option<&str>) -> Result<(), ParseError> {
        self.expect(' ', Separator::Space, after)
    }

    pub(crate) fn expect_newline(&mut self, after: Option<&str>) -> Result<(), ParseError> {
        self.expect('\n', Separator::Newline, after)
    }

    fn expect(&mut self, ch: char, expected: Separator, after: Option<&str>) -> Result<(), ParseError> {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            return Ok(());
        }
        Err(ParseError::MissingSeparator {
            expected,
            after: after.map(str::to_string),
        })
    }

    pub(crate) fn expect_eof(&self) -> Result<(), ParseError> {
        if self.pos < self.input.len() {
            return Err(ParseError::TrailingInput);
        }
        Ok(())
    }

    pub(crate) fn at_line_end(&self) -> bool {
        matches!(self.peek(), None | Some('\n'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_value() {
        let mut scanner = Scanner::new("123");
        let value: i32 = scanner.parse_value("X").unwrap();
        assert_eq!(value, 123);
        assert!(scanner.expect_eof().is_ok());
    }

    #[test]
    fn leading_whitespace_is_rejected() {
        let mut scanner = Scanner::new(" 123");
        let err = scanner.parse_value::<i32>("X").unwrap_err();
        assert_eq!(err.to_string(), "Cannot parse for 'X'. Found: <whitespace>");
    }

    #[test]
    fn empty_input_reports_eof() {
        let mut scanner = Scanner::new("");
        let err = scanner.parse_value::<i32>("X").unwrap_err();
        assert_eq!(err.to_string(), "Cannot parse for 'X'. Found: <EOF>");
    }

    #[test]
    fn overflow_reports_literal_token() {
        let mut scanner = Scanner::new("12345678901234567890");
        let err = scanner.parse_value::<i32>("X").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot parse for 'X'. Found: '12345678901234567890'"
        );
    }

    #[test]
    fn type_mismatch_reports_literal_token() {
        let mut scanner = Scanner::new("abc123");
        let err = scanner.parse_value::<i32>("X").unwrap_err();
        assert_eq!(err.to_string(), "Cannot parse for 'X'. Found: 'abc123'");
    }

    #[test]
    fn separators_are_strict() {
        let mut scanner = Scanner::new("1  2");
        let _: i32 = scanner.parse_value("A").unwrap();
        scanner.expect_space(Some("A")).unwrap();
        let err = scanner.parse_value::<i32>("B").unwrap_err();
        assert_eq!(err.to_string(), "Cannot parse for 'B'. Found: <whitespace>");

        let mut scanner = Scanner::new("1 2");
        let _: i32 = scanner.parse_value("A").unwrap();
        assert!(!scanner.at_line_end());
        let err = scanner.expect_newline(Some("A")).unwrap_err();
        assert_eq!(err.to_string(), "Expected: <newline> after 'A'");
    }

    #[test]
    fn trailing_text_is_rejected() {
        let mut scanner = Scanner::new("1\n2");
        let _: i32 = scanner.parse_value("A").unwrap();
        scanner.expect_newline(Some("A")).unwrap();
        assert_eq!(scanner.expect_eof(), Err(ParseError::TrailingInput));
    }
}
