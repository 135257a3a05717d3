const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Renders `src` as space-separated two-digit hex pairs into `dst`.
///
/// Stops before `dst` would overflow and always NUL-terminates (unless
/// `dst` is empty). Returns the number of bytes written, terminator
/// included: 3 bytes per pair minus the trailing separator, plus the NUL.
///
/// A destination of `3 * src.len() + 1` bytes fits everything.
pub fn build_hex(dst: &mut [u8], src: &[u8]) -> usize {
    if dst.is_empty() {
        return 0;
    }

    let mut pos = 0;
    for &byte in src {
        // a pair plus its separator must leave room for the terminator
        if dst.len() - pos <= 3 {
            break;
        }
        dst[pos] = HEX_DIGITS[(byte >> 4) as usize];
        dst[pos + 1] = HEX_DIGITS[(byte & 0x0F) as usize];
        dst[pos + 2] = b' ';
        pos += 3;
    }
    // the terminator replaces the last separator
    if pos > 0 {
        pos -= 1;
    }
    dst[pos] = 0;
    pos + 1
}
