//! Token cursor consumed by the model builder.
//!
//! The builder only talks to the [`Reader`] trait. [`StfReader`] is the
//! implementation over tokens produced by [`crate::lexer`]; it records every
//! warning and error it is asked to report so the loader can attach them to
//! the finished model.

use crate::diagnostics::{Diagnostic, Severity};
use crate::error::StfError;
use crate::lexer::{self, Spanned, Token};
use crate::model::Range;
use crate::units::{self, Units};

pub trait Reader {
    /// Next token's text. `(` and `)` come back as themselves.
    fn read_token(&mut self) -> Result<String, StfError>;

    /// Consume the next token, which must equal `literal` (case-insensitive).
    fn must_match(&mut self, literal: &str) -> Result<(), StfError>;

    /// True when the current block has no more items. A closing `)` is
    /// consumed; end of input also ends every open block (reported once as
    /// a warning).
    fn at_end_of_block(&mut self) -> bool;

    /// Discard tokens up to and including the `)` closing the current block.
    fn skip_rest_of_block(&mut self) -> Result<(), StfError>;

    /// Discard one whole `( ... )` block starting at the next token.
    fn skip_block(&mut self) -> Result<(), StfError> {
        self.must_match("(")?;
        self.skip_rest_of_block()
    }

    fn read_int(&mut self, units: Units) -> Result<i32, StfError>;

    fn read_float(&mut self, units: Units) -> Result<f32, StfError>;

    /// Declared element count. Negative counts read as 0; a count above
    /// `limit` is fatal.
    fn read_count(&mut self, limit: usize) -> Result<usize, StfError>;

    /// Boolean value block. A keyword with no block, or an empty `()`,
    /// yields `default_if_bare`.
    fn read_bool_flag(&mut self, default_if_bare: bool) -> Result<bool, StfError>;

    /// True once every token has been consumed.
    fn eof(&self) -> bool;

    fn warn(&mut self, message: &str);

    fn error(&mut self, message: &str);

    /// `( n )`
    fn read_int_block(&mut self, units: Units) -> Result<i32, StfError> {
        self.must_match("(")?;
        let value = self.read_int(units)?;
        self.skip_rest_of_block()?;
        Ok(value)
    }

    /// `( x )`
    fn read_float_block(&mut self, units: Units) -> Result<f32, StfError> {
        self.must_match("(")?;
        let value = self.read_float(units)?;
        self.skip_rest_of_block()?;
        Ok(value)
    }

    /// `( min max )`, anything after the pair is ignored.
    fn read_range(&mut self, units: Units) -> Result<Range, StfError> {
        self.must_match("(")?;
        let min = self.read_float(units)?;
        let max = self.read_float(units)?;
        self.skip_rest_of_block()?;
        Ok(Range::new(min, max))
    }
}

// ──────────────────────────────────────────────
// StfReader
// ──────────────────────────────────────────────

pub struct StfReader {
    tokens: Vec<Spanned>,
    pos: usize,
    filename: String,
    line: u32,
    diagnostics: Vec<Diagnostic>,
    truncation_reported: bool,
}

impl StfReader {
    pub fn new(tokens: Vec<Spanned>, filename: &str) -> Self {
        let mut tokens = tokens;
        if !matches!(tokens.last(), Some(Spanned { token: Token::Eof, .. })) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Spanned {
                token: Token::Eof,
                line,
            });
        }
        StfReader {
            tokens,
            pos: 0,
            filename: filename.to_owned(),
            line: 1,
            diagnostics: Vec::new(),
            truncation_reported: false,
        }
    }

    /// Lex `src` and wrap the tokens.
    pub fn from_source(src: &str, filename: &str) -> Result<Self, StfError> {
        Ok(StfReader::new(lexer::lex(src, filename)?, filename))
    }

    pub fn file_name(&self) -> &str {
        &self.filename
    }

    /// Line of the most recently consumed token.
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn advance(&mut self) -> Token {
        let t = self.cur().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        self.line = t.line;
        t.token
    }

    fn eof_err(&self, expected: &str) -> StfError {
        StfError::UnexpectedEof {
            file: self.filename.clone(),
            line: self.cur().line,
            expected: expected.to_owned(),
        }
    }

    fn number_err(&self, literal: &str) -> StfError {
        StfError::InvalidNumber {
            file: self.filename.clone(),
            line: self.line,
            literal: literal.to_owned(),
        }
    }

    fn take_value(&mut self, expected: &str) -> Result<String, StfError> {
        match self.peek() {
            Token::Eof => Err(self.eof_err(expected)),
            _ => Ok(self.advance().text().to_owned()),
        }
    }

    fn report(&mut self, severity: Severity, message: &str) {
        let d = Diagnostic::new(severity, &self.filename, self.line, message);
        d.log();
        self.diagnostics.push(d);
    }
}

impl Reader for StfReader {
    fn read_token(&mut self) -> Result<String, StfError> {
        self.take_value("an item")
    }

    fn must_match(&mut self, literal: &str) -> Result<(), StfError> {
        let found = self.take_value(&format!("'{}'", literal))?;
        if found.eq_ignore_ascii_case(literal) {
            Ok(())
        } else {
            Err(StfError::UnexpectedToken {
                file: self.filename.clone(),
                line: self.line,
                expected: literal.to_owned(),
                found,
            })
        }
    }

    fn at_end_of_block(&mut self) -> bool {
        match self.peek() {
            Token::RParen => {
                self.advance();
                true
            }
            Token::Eof => {
                if !self.truncation_reported {
                    self.truncation_reported = true;
                    self.warn("unexpected end of file inside a block");
                }
                true
            }
            _ => false,
        }
    }

    fn skip_rest_of_block(&mut self) -> Result<(), StfError> {
        let mut depth = 1usize;
        loop {
            match self.peek() {
                Token::Eof => return Err(self.eof_err("')'")),
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn read_int(&mut self, units: Units) -> Result<i32, StfError> {
        let literal = self.take_value("an integer")?;
        units::parse_int(&literal, units).ok_or_else(|| self.number_err(&literal))
    }

    fn read_float(&mut self, units: Units) -> Result<f32, StfError> {
        let literal = self.take_value("a number")?;
        units::parse_float(&literal, units).ok_or_else(|| self.number_err(&literal))
    }

    fn read_count(&mut self, limit: usize) -> Result<usize, StfError> {
        let count = self.read_int(Units::None)?;
        let declared = usize::try_from(count).unwrap_or(0);
        if declared > limit {
            return Err(StfError::CountTooLarge {
                file: self.filename.clone(),
                line: self.line,
                count,
                limit,
            });
        }
        Ok(declared)
    }

    fn read_bool_flag(&mut self, default_if_bare: bool) -> Result<bool, StfError> {
        if self.peek() != &Token::LParen {
            return Ok(default_if_bare);
        }
        self.advance();
        if self.peek() == &Token::RParen {
            self.advance();
            return Ok(default_if_bare);
        }
        let literal = self.take_value("a boolean")?;
        let value = match literal.to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            other => match units::parse_float(other, Units::None) {
                Some(n) => n != 0.0,
                None => return Err(self.number_err(&literal)),
            },
        };
        self.skip_rest_of_block()?;
        Ok(value)
    }

    fn eof(&self) -> bool {
        self.peek() == &Token::Eof
    }

    fn warn(&mut self, message: &str) {
        self.report(Severity::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.report(Severity::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(src: &str) -> StfReader {
        StfReader::from_source(src, "t.sms").expect("lex")
    }

    #[test]
    fn end_of_block_consumes_close() {
        let mut r = reader(") next");
        assert!(r.at_end_of_block());
        assert_eq!(r.read_token().unwrap(), "next");
        assert!(r.at_end_of_block(), "end of input ends the block");
        assert!(r.at_end_of_block());
        assert!(r.eof());
        let diags = r.into_diagnostics();
        assert_eq!(diags.len(), 1, "truncation is reported once");
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn skip_rest_of_block_handles_nesting() {
        let mut r = reader("a ( b ( c ) ) d ) after");
        r.skip_rest_of_block().unwrap();
        assert_eq!(r.read_token().unwrap(), "after");
    }

    #[test]
    fn skip_rest_of_block_at_eof_is_fatal() {
        let mut r = reader("a ( b )");
        assert!(matches!(
            r.skip_rest_of_block(),
            Err(StfError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn must_match_is_case_insensitive_and_fatal_on_mismatch() {
        let mut r = reader("TR_SMS (");
        r.must_match("tr_sms").unwrap();
        r.must_match("(").unwrap();
        let mut r = reader("Volume");
        let err = r.must_match("(").unwrap_err();
        assert!(matches!(err, StfError::UnexpectedToken { ref found, .. } if found == "Volume"));
    }

    #[test]
    fn numeric_blocks() {
        let mut r = reader("( 42 ) ( 0.25 ignored ) ( 80 100 )");
        assert_eq!(r.read_int_block(Units::None).unwrap(), 42);
        assert_eq!(r.read_float_block(Units::None).unwrap(), 0.25);
        assert_eq!(r.read_range(Units::None).unwrap(), Range::new(80.0, 100.0));
    }

    #[test]
    fn unparsable_number_is_fatal() {
        let mut r = reader("( loud )");
        let err = r.read_float_block(Units::None).unwrap_err();
        assert!(matches!(err, StfError::InvalidNumber { ref literal, .. } if literal == "loud"));
    }

    #[test]
    fn counts_clamp_negative_and_reject_oversized() {
        let mut r = reader("3 -2 1024 1025");
        assert_eq!(r.read_count(1024).unwrap(), 3);
        assert_eq!(r.read_count(1024).unwrap(), 0);
        assert_eq!(r.read_count(1024).unwrap(), 1024);
        let err = r.read_count(1024).unwrap_err();
        assert!(
            matches!(err, StfError::CountTooLarge { count: 1025, limit: 1024, .. }),
            "{:?}",
            err
        );
    }

    #[test]
    fn bool_flag_forms() {
        let mut r = reader("x");
        assert!(r.read_bool_flag(true).unwrap(), "bare keyword");
        let mut r = reader("( )");
        assert!(r.read_bool_flag(true).unwrap(), "empty block");
        let mut r = reader("( 0 )");
        assert!(!r.read_bool_flag(true).unwrap());
        let mut r = reader("( True )");
        assert!(r.read_bool_flag(false).unwrap());
        let mut r = reader("( maybe )");
        assert!(r.read_bool_flag(true).is_err());
    }

    #[test]
    fn diagnostics_carry_current_line() {
        let mut r = reader("a\nb\nc");
        r.read_token().unwrap();
        r.read_token().unwrap();
        r.warn("something odd");
        r.error("something broken");
        let diags = r.into_diagnostics();
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].line, 2);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[1].severity, Severity::Error);
    }
}
