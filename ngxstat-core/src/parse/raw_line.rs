/// A single physical line handed over by the ingestion side.
///
/// `number` is 1-based within its source. The text is borrowed and never
/// retained past parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub number: u64,
    pub text: &'a str,
    /// Byte length of the line in its source, line ending excluded. Differs
    /// from `text.len()` when the reader cut the line short or replaced
    /// invalid UTF-8.
    pub raw_len: usize,
}

impl<'a> RawLine<'a> {
    pub fn new(number: u64, text: &'a str) -> Self {
        Self {
            number,
            text,
            raw_len: text.trim_end_matches(['\r', '\n']).len(),
        }
    }

    pub fn with_raw_len(mut self, raw_len: usize) -> Self {
        self.raw_len = raw_len;
        self
    }
}
