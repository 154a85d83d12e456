// src/discovery/binary.rs

/// Checks if a byte sample looks like binary content.
///
/// Only content that `content_inspector` classifies as binary (NUL bytes in
/// the head) is rejected. Text in a legacy 8-bit encoding stays in, since the
/// charset survey has to see it.
///
/// # Examples
/// ```
/// use ecguess::discovery::is_binary_sample;
///
/// assert!(!is_binary_sample(b"fn main() {}\n"));
/// assert!(is_binary_sample(b"\x7fELF\x02\x01\x01\0\0\0"));
/// assert!(!is_binary_sample(&[b'c', b'a', b'f', 0xE9, b'\n'])); // latin1 "cafe"
/// ```
pub fn is_binary_sample(sample: &[u8]) -> bool {
    content_inspector::inspect(sample).is_binary()
}
