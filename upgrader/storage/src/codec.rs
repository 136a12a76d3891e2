use {
    borsh::{BorshDeserialize, BorshSerialize},
    upgrader_types::{BorshDeExt, BorshSerExt, StdError, StdResult},
};

/// A marker that designates encoding/decoding schemes.
pub trait Codec<T> {
    fn encode(data: &T) -> StdResult<Vec<u8>>;

    fn decode(data: &[u8]) -> StdResult<T>;
}

// ----------------------------------- borsh -----------------------------------

/// Represents the Borsh encoding scheme.
#[derive(Clone)]
pub struct Borsh;

impl<T> Codec<T> for Borsh
where
    T: BorshSerialize + BorshDeserialize,
{
    fn encode(data: &T) -> StdResult<Vec<u8>> {
        data.to_borsh_vec()
    }

    fn decode(data: &[u8]) -> StdResult<T> {
        data.deserialize_borsh()
    }
}

// --------------------------------- big endian --------------------------------

/// Represents an unsigned integer as fixed-length big-endian bytes.
///
/// Unlike Borsh, which is little-endian, this is readable by tools that know
/// nothing about Rust, and sorts the same way as the number it encodes.
pub struct BigEndian;

impl Codec<u64> for BigEndian {
    fn encode(data: &u64) -> StdResult<Vec<u8>> {
        Ok(data.to_be_bytes().to_vec())
    }

    fn decode(data: &[u8]) -> StdResult<u64> {
        let bytes = data.try_into().map_err(|_| {
            StdError::deserialize::<u64, _>(
                "big-endian",
                format!("expecting 8 bytes, got {}", data.len()),
            )
        })?;

        Ok(u64::from_be_bytes(bytes))
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case(0, [0, 0, 0, 0, 0, 0, 0, 0]; "zero")]
    #[test_case(11, [0, 0, 0, 0, 0, 0, 0, 11]; "small")]
    #[test_case(0x0102030405060708, [1, 2, 3, 4, 5, 6, 7, 8]; "large")]
    fn big_endian_encoding(value: u64, bytes: [u8; 8]) {
        assert_eq!(BigEndian::encode(&value).unwrap(), bytes);
        assert_eq!(BigEndian::decode(&bytes).unwrap(), value);
    }

    #[test]
    fn big_endian_rejects_wrong_length() {
        assert!(matches!(
            BigEndian::decode(&[1, 2, 3]),
            Err(StdError::Deserialize { codec: "big-endian", .. })
        ));
    }
}
