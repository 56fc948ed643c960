/// Bytes that may appear inside a bare URL in prose: ASCII letters and
/// digits, the RFC 3986 punctuation, and `{ } \ ^ |`, which real links use.
const URL_CHARS: [bool; 256] = {
    let punct = b"-._~:/?#[]@!$&'()*+,;=%{}\\^|";
    let mut table = [false; 256];

    let mut c = 0;
    while c < table.len() {
        table[c] = (c as u8).is_ascii_alphanumeric();
        c += 1;
    }

    let mut i = 0;
    while i < punct.len() {
        table[punct[i] as usize] = true;
        i += 1;
    }

    table
};

/// Whether `c` may appear inside a bare URL in prose.
#[inline(always)]
pub const fn is_url_char(&c: &u8) -> bool { URL_CHARS[c as usize] }

#[cfg(test)]
mod tests {
    use super::is_url_char;

    #[test]
    fn prose_delimiters_are_not_url_chars() {
        for c in [b' ', b'<', b'>', b'"', b'`', b'\n', 0xC3] {
            assert!(!is_url_char(&c), "{:?}", c as char);
        }

        for c in [b'a', b'Z', b'7', b'/', b'?', b'#', b'=', b'&', b'(', b')', b'%', b'~', b'|'] {
            assert!(is_url_char(&c), "{:?}", c as char);
        }
    }
}
