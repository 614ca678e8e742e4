use crate::parse::FailureReason;

/// Left-to-right field scanner over a single line.
///
/// Each accessor skips leading spaces, consumes exactly one field and leaves
/// the cursor just past it. Running out of input is always `TruncatedLine`;
/// a field that starts with the wrong delimiter gets the caller's reason.
pub(crate) struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    fn skip_spaces(&mut self) {
        self.rest = self.rest.trim_start_matches([' ', '\t']);
    }

    /// A run of non-space bytes.
    pub(crate) fn bare(&mut self) -> Result<&'a str, FailureReason> {
        self.skip_spaces();
        if self.rest.is_empty() {
            return Err(FailureReason::TruncatedLine);
        }

        let end = self.rest.find([' ', '\t']).unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(token)
    }

    /// `[ ... ]` with the brackets stripped.
    pub(crate) fn bracketed(&mut self, wrong_shape: FailureReason) -> Result<&'a str, FailureReason> {
        self.skip_spaces();
        let Some(body) = self.opening(b'[', wrong_shape)? else {
            return Err(FailureReason::TruncatedLine);
        };

        let end = body.find(']').ok_or(FailureReason::TruncatedLine)?;
        self.rest = &body[end + 1..];
        Ok(&body[..end])
    }

    /// `" ... "` with the quotes stripped. Backslash escapes are skipped over
    /// and kept verbatim in the returned slice.
    pub(crate) fn quoted(&mut self, wrong_shape: FailureReason) -> Result<&'a str, FailureReason> {
        self.skip_spaces();
        let Some(body) = self.opening(b'"', wrong_shape)? else {
            return Err(FailureReason::TruncatedLine);
        };

        let bytes = body.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'"' => {
                    self.rest = &body[i + 1..];
                    return Ok(&body[..i]);
                }
                _ => i += 1,
            }
        }

        Err(FailureReason::TruncatedLine)
    }

    fn opening(&self, open: u8, wrong_shape: FailureReason) -> Result<Option<&'a str>, FailureReason> {
        match self.rest.as_bytes().first() {
            None => Ok(None),
            Some(b) if *b == open => Ok(Some(&self.rest[1..])),
            Some(_) => Err(wrong_shape),
        }
    }
}
