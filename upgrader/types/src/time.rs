use {
    borsh::{BorshDeserialize, BorshSerialize},
    chrono::{DateTime, SecondsFormat, Utc},
    serde::{Deserialize, Serialize},
    serde_with::{serde_as, DisplayFromStr},
    std::{fmt, ops::Add},
};

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Block time, as nanoseconds since the UNIX epoch.
pub type Timestamp = Duration;

/// A span of time in nanoseconds.
///
/// Stored with Borsh as a little-endian `u128`. In JSON it's a string, since
/// JSON numbers can't safely hold a `u128`.
#[serde_as]
#[derive(
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
pub struct Duration(#[serde_as(as = "DisplayFromStr")] u128);

impl Duration {
    pub const fn from_nanos(nanos: u128) -> Self {
        Self(nanos)
    }

    pub const fn from_seconds(seconds: u128) -> Self {
        Self(seconds * NANOS_PER_SECOND)
    }

    /// Read as a point in time, e.g. `2020-01-01T00:00:00Z`. `None` if it's
    /// outside the range `chrono` can represent.
    pub fn to_rfc3339(&self) -> Option<String> {
        let secs = i64::try_from(self.0 / NANOS_PER_SECOND).ok()?;
        let nanos = (self.0 % NANOS_PER_SECOND) as u32;

        DateTime::<Utc>::from_timestamp(secs, nanos)
            .map(|datetime| datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let secs = self.0 / NANOS_PER_SECOND;
        let nanos = self.0 % NANOS_PER_SECOND;

        if nanos == 0 {
            write!(f, "{secs}s")
        } else {
            write!(f, "{secs}.{nanos:09}s")
        }
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        crate::{BorshDeExt, BorshSerExt, Duration, JsonDeExt, JsonSerExt, Timestamp},
        test_case::test_case,
    };

    #[test]
    fn block_time_encodings() {
        const TIME: Timestamp = Timestamp::from_nanos(1_700_000_005_250_000_000);

        let json = TIME.to_json_string().unwrap();
        assert_eq!(json, "\"1700000005250000000\"");
        assert_eq!(json.deserialize_json::<Timestamp>().unwrap(), TIME);

        let bytes = TIME.to_borsh_vec().unwrap();
        assert_eq!(bytes, 1_700_000_005_250_000_000_u128.to_le_bytes());
        assert_eq!(bytes.deserialize_borsh::<Timestamp>().unwrap(), TIME);
    }

    #[test]
    fn adding_block_time() {
        let genesis = Timestamp::from_seconds(1_700_000_000);

        assert_eq!(
            genesis + Duration::from_seconds(5),
            Timestamp::from_seconds(1_700_000_005)
        );
    }

    #[test_case(Timestamp::from_seconds(1_577_836_800) => Some("2020-01-01T00:00:00Z".to_string()); "whole seconds")]
    #[test_case(Timestamp::from_nanos(1_577_836_800_500_000_000) => Some("2020-01-01T00:00:00.500Z".to_string()); "fractional seconds")]
    #[test_case(Timestamp::from_nanos(u128::MAX) => None; "out of range")]
    fn formatting_as_rfc3339(time: Timestamp) -> Option<String> {
        time.to_rfc3339()
    }

    #[test_case(Duration::from_nanos(0), "0s"; "zero")]
    #[test_case(Duration::from_seconds(12), "12s"; "whole seconds")]
    #[test_case(Duration::from_nanos(1_250_000_000), "1.250000000s"; "fractional seconds")]
    fn display_works(duration: Duration, expect: &str) {
        assert_eq!(duration.to_string(), expect);
    }
}
