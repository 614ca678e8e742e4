use std::borrow::Cow;
use std::io::{self, BufRead};

/// Line reader that never buffers more than `max_line_length + 1` bytes of a line.
///
/// The excess of an overlong line is read and discarded. `\n` and `\r\n`
/// endings are stripped; invalid UTF-8 is replaced rather than fatal.
pub struct LineReader<R> {
    inner: R,
    keep: usize,
    buf: Vec<u8>,
    line_number: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R, max_line_length: usize) -> Self {
        Self {
            inner,
            keep: max_line_length.saturating_add(1),
            buf: Vec::new(),
            line_number: 0,
        }
    }

    /// Lines handed out so far.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// `Ok(None)` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<SourceLine<'_>>> {
        self.buf.clear();
        let mut read_any = false;
        let mut raw_len = 0usize;
        let mut ends_with_cr = false;

        loop {
            let available = match self.inner.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if available.is_empty() {
                break;
            }
            read_any = true;

            let (chunk_len, consumed, done) = match available.iter().position(|b| *b == b'\n') {
                Some(i) => (i, i + 1, true),
                None => (available.len(), available.len(), false),
            };

            if chunk_len > 0 {
                ends_with_cr = available[chunk_len - 1] == b'\r';
            }
            raw_len = raw_len.saturating_add(chunk_len);

            let room = self.keep.saturating_sub(self.buf.len());
            self.buf.extend_from_slice(&available[..chunk_len.min(room)]);
            self.inner.consume(consumed);

            if done {
                break;
            }
        }

        if !read_any {
            return Ok(None);
        }

        if ends_with_cr {
            raw_len -= 1;
            // Only present when the whole line fit.
            if self.buf.len() > raw_len {
                self.buf.pop();
            }
        }

        self.line_number += 1;
        Ok(Some(SourceLine {
            number: self.line_number,
            text: String::from_utf8_lossy(&self.buf),
            raw_len,
        }))
    }
}

/// One line as read from a source.
#[derive(Debug)]
pub struct SourceLine<'a> {
    pub number: u64,
    /// Decoded text, cut short for overlong lines.
    pub text: Cow<'a, str>,
    /// Length in bytes as it appeared in the source, without the line ending.
    pub raw_len: usize,
}
