//! Output harness for golden comparison
//!
//! Renders raw byte strings and decimal integers to an output stream in the
//! exact call order issued by the scenarios. Nothing is buffered out of
//! order; the concatenated stream is the golden comparison target.
//!
//! Integers are emitted sign-then-magnitude over a *negative* accumulator
//! (print `-`, then the digits of `-n`), so the most negative value prints
//! correctly without overflowing on negation.

use crate::errors::MemoryError;
use std::io::Write;

/// Byte-stream writer for scenario output
#[derive(Debug)]
pub struct Output<W: Write> {
    writer: W,
}

impl<W: Write> Output<W> {
    pub fn new(writer: W) -> Self {
        Output { writer }
    }

    /// Recover the underlying writer (tests capture into a `Vec<u8>`)
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Emit a single byte
    pub fn put_char(&mut self, c: u8) -> Result<(), MemoryError> {
        self.writer.write_all(&[c])?;
        Ok(())
    }

    /// Emit a string verbatim
    pub fn put_str(&mut self, s: &str) -> Result<(), MemoryError> {
        self.writer.write_all(s.as_bytes())?;
        Ok(())
    }

    /// Emit a decimal integer
    pub fn put_int(&mut self, n: i64) -> Result<(), MemoryError> {
        if n < 0 {
            self.put_char(b'-')?;
            self.put_magnitude(n)
        } else {
            self.put_magnitude(-n)
        }
    }

    /// Emit the digits of `-n` for `n <= 0`
    fn put_magnitude(&mut self, n: i64) -> Result<(), MemoryError> {
        if n <= -10 {
            self.put_magnitude(n / 10)?;
        }
        self.put_char(b'0' + (-(n % 10)) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Output<Vec<u8>>) -> Result<(), MemoryError>) -> String {
        let mut out = Output::new(Vec::new());
        f(&mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn integers_render_as_decimal() {
        assert_eq!(render(|o| o.put_int(0)), "0");
        assert_eq!(render(|o| o.put_int(42)), "42");
        assert_eq!(render(|o| o.put_int(-123)), "-123");
        assert_eq!(render(|o| o.put_int(i64::MAX)), i64::MAX.to_string());
        assert_eq!(render(|o| o.put_int(i64::MIN)), i64::MIN.to_string());
    }

    #[test]
    fn output_preserves_call_order() {
        let text = render(|o| {
            o.put_str("pt1: ")?;
            o.put_int(5)?;
            o.put_str(" ")?;
            o.put_int(6)?;
            o.put_char(b'\n')
        });
        assert_eq!(text, "pt1: 5 6\n");
    }
}
