//! Reassembles newline-terminated lines from arbitrarily split fragments.

/// Holds the unterminated tail of the stream between reads.
///
/// The tail is kept as raw bytes so a multi-byte UTF-8 sequence split across
/// two fragments is decoded only once it is whole. `\n` never occurs inside a
/// multi-byte sequence, so splitting on it before decoding is safe. The tail
/// never contains a newline, so each append scans only the new bytes.
#[derive(Debug, Default)]
pub struct LineBuffer {
    tail: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return every line completed by it, trimmed.
    ///
    /// The segment after the last newline stays buffered. Blank lines are
    /// returned as empty strings; filtering them is up to the caller.
    pub fn append(&mut self, fragment: &[u8]) -> Vec<String> {
        let held = self.tail.len();
        self.tail.extend_from_slice(fragment);

        let Some(last_newline) = fragment.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };
        let last_newline = held + last_newline;

        let lines = self.tail[..last_newline]
            .split(|b| *b == b'\n')
            .map(decode_line)
            .collect();
        self.tail.drain(..=last_newline);
        lines
    }

    /// Take whatever is left at end of stream, if it holds anything but whitespace.
    pub fn flush(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.tail);
        let line = decode_line(&rest);
        (!line.is_empty()).then_some(line)
    }

    /// Number of bytes waiting for a line terminator.
    pub fn pending(&self) -> usize {
        self.tail.len()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}
