//! Incremental UTF-8 decoding for chunked response bodies.
//!
//! The transport delivers raw bytes with no framing, so a multi-byte sequence
//! can be split across chunk boundaries. The decoder carries the incomplete
//! tail from one chunk into the next instead of decoding each chunk in
//! isolation. Invalid bytes become U+FFFD rather than an error.

pub struct Utf8StreamDecoder {
    /// Incomplete trailing sequence held back from the previous chunk.
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Decode the next chunk, returning all text that is complete so far.
    pub fn decode(&mut self, input: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(input);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&rest[..valid]));
                    match err.error_len() {
                        Some(invalid) => {
                            out.push('\u{FFFD}');
                            rest = &rest[valid + invalid..];
                        }
                        None => {
                            // Incomplete sequence at the end of the chunk.
                            self.pending = rest[valid..].to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush the decoder at end of stream. A dangling incomplete sequence
    /// becomes a single replacement character.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            '\u{FFFD}'.to_string()
        }
    }
}

impl Default for Utf8StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"The"), "The");
        assert_eq!(decoder.decode(b"ft reports"), "ft reports");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn multibyte_sequence_split_across_chunks() {
        // "₹" (U+20B9) is three bytes: E2 82 B9.
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(&[0xE2]), "");
        assert_eq!(decoder.decode(&[0x82]), "");
        assert_eq!(decoder.decode(&[0xB9, b'5', b'0', b'0']), "\u{20B9}500");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn four_byte_sequence_split_mid_text() {
        // "🚲" (U+1F6B2) is F0 9F 9A B2.
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"bike \xF0\x9F"), "bike ");
        assert_eq!(decoder.decode(b"\x9A\xB2 stolen"), "\u{1F6B2} stolen");
    }

    #[test]
    fn invalid_bytes_become_replacement_characters() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"ok\xFFok"), "ok\u{FFFD}ok");
    }

    #[test]
    fn dangling_partial_sequence_flushes_as_replacement() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"end\xE2\x82"), "end");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        // Flushing again is a no-op.
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn empty_chunks_are_harmless() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b""), "");
        assert_eq!(decoder.decode(b"text"), "text");
        assert_eq!(decoder.decode(b""), "");
    }
}
