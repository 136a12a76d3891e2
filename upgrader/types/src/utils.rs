/// The storage key of an entry in a keyed collection:
/// `len(namespace) as u16 BE | namespace | key`.
///
/// The length prefix keeps one namespace from being a byte prefix of
/// another's keys, e.g. `done` and `doneb`.
#[doc(hidden)]
pub fn namespace_with_key(namespace: &[u8], key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + namespace.len() + key.len());
    out.extend_from_slice(&encode_length(namespace));
    out.extend_from_slice(namespace);
    out.extend_from_slice(key);
    out
}

/// The length of a byte slice as two big-endian bytes.
///
/// Panics if the slice is longer than `u16::MAX`.
#[doc(hidden)]
pub fn encode_length<B>(bytes: B) -> [u8; 2]
where
    B: AsRef<[u8]>,
{
    let len = bytes.as_ref().len();
    let Ok(len) = u16::try_from(len) else {
        panic!("namespace too long: {len} > {}", u16::MAX);
    };

    len.to_be_bytes()
}

/// A byte string greater than every string starting with `bytes`, used as
/// the exclusive upper bound when scanning a namespace.
///
/// Doesn't work if every byte is 255, which a length-prefixed namespace
/// can't be unless it's 65535 bytes long.
#[doc(hidden)]
pub fn increment_last_byte(mut bytes: Vec<u8>) -> Vec<u8> {
    debug_assert!(
        bytes.iter().any(|x| *x != u8::MAX),
        "bytes are entirely 255"
    );
    for byte in bytes.iter_mut().rev() {
        if *byte == u8::MAX {
            *byte = 0;
        } else {
            *byte += 1;
            break;
        }
    }
    bytes
}

#[doc(hidden)]
pub fn concat(namespace: &[u8], key: &[u8]) -> Vec<u8> {
    let mut joined = Vec::with_capacity(namespace.len() + key.len());
    joined.extend_from_slice(namespace);
    joined.extend_from_slice(key);
    joined
}

#[doc(hidden)]
pub fn trim(namespace: &[u8], key: &[u8]) -> Vec<u8> {
    key[namespace.len()..].to_vec()
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case(vec![1, 2, 3] => vec![1, 2, 4]; "no overflow")]
    #[test_case(vec![1, 2, 255] => vec![1, 3, 0]; "carry once")]
    #[test_case(vec![1, 255, 255] => vec![2, 0, 0]; "carry twice")]
    fn incrementing_last_byte(bytes: Vec<u8>) -> Vec<u8> {
        increment_last_byte(bytes)
    }

    #[test]
    fn keys_are_length_prefixed() {
        assert_eq!(namespace_with_key(b"done", b"v2"), b"\x00\x04donev2");
        assert_eq!(namespace_with_key(b"", b"v2"), b"\x00\x00v2");
    }
}
