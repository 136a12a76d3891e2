use {
    crate::{BlockInfo, Timestamp},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    std::fmt,
    thiserror::Error,
};

/// A chain upgrade, to be performed once the chain reaches either a given
/// block height or a given block time.
///
/// The name identifies the upgrade across the chain's entire history. It is
/// also how the node's software tells whether it knows how to perform this
/// upgrade: a handler must be registered under the same name.
#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub name: String,
    /// The block height at which the upgrade is to be performed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    /// The block time at which the upgrade is to be performed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Timestamp>,
    /// Arbitrary information, e.g. where to download the new binary. Not
    /// interpreted by the chain.
    #[serde(default)]
    pub info: String,
}

impl Plan {
    pub fn at_height<N>(name: N, height: u64) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            height: Some(height),
            time: None,
            info: String::new(),
        }
    }

    pub fn at_time<N>(name: N, time: Timestamp) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            height: None,
            time: Some(time),
            info: String::new(),
        }
    }

    pub fn with_info<I>(mut self, info: I) -> Self
    where
        I: Into<String>,
    {
        self.info = info.into();
        self
    }

    /// Check the plan is well formed: it must have a name, and exactly one of
    /// height or time. Return the target if so.
    ///
    /// This doesn't check whether the target is in the future, which depends
    /// on the current block.
    pub fn validate_basic(&self) -> Result<Target, PlanError> {
        if self.name.is_empty() {
            return Err(PlanError::EmptyName);
        }

        match (self.height, self.time) {
            (Some(height), None) => Ok(Target::Height(height)),
            (None, Some(time)) => Ok(Target::Time(time)),
            (None, None) => Err(PlanError::MissingTarget),
            (Some(_), Some(_)) => Err(PlanError::ConflictingTargets),
        }
    }

    /// Whether the plan is due at the given block: its time has been reached,
    /// or its height has been reached.
    pub fn should_trigger(&self, block: &BlockInfo) -> bool {
        let time_reached = self.time.is_some_and(|time| block.timestamp >= time);
        let height_reached = self.height.is_some_and(|height| height <= block.height);

        time_reached || height_reached
    }
}

/// Multi-line summary, e.g.
///
/// ```text
/// Upgrade Plan
///   Name: v2
///   Height: 100
///   Info: https://example.com/v2
/// ```
///
/// The time is shown in RFC 3339 when set, otherwise the height.
impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Upgrade Plan")?;
        writeln!(f, "  Name: {}", self.name)?;

        match self.time {
            Some(time) => match time.to_rfc3339() {
                Some(datetime) => writeln!(f, "  Time: {datetime}")?,
                None => writeln!(f, "  Time: {time}")?,
            },
            None => writeln!(f, "  Height: {}", self.height.unwrap_or_default())?,
        }

        write!(f, "  Info: {}", self.info)
    }
}

/// The point at which a [`Plan`] is to be triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Height(u64),
    Time(Timestamp),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Target::Height(height) => write!(f, "height {height}"),
            Target::Time(time) => write!(f, "time {time}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("upgrade name cannot be empty")]
    EmptyName,

    #[error("either height or time must be specified")]
    MissingTarget,

    #[error("only one of height or time can be specified")]
    ConflictingTargets,
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{BorshDeExt, BorshSerExt, JsonDeExt, JsonSerExt},
        test_case::test_case,
    };

    const BLOCK: BlockInfo = BlockInfo {
        height: 10,
        timestamp: Timestamp::from_seconds(100),
    };

    #[test_case(
        Plan::at_height("", 11)
        => Err(PlanError::EmptyName);
        "empty name"
    )]
    #[test_case(
        Plan { name: "v2".to_string(), height: None, time: None, info: String::new() }
        => Err(PlanError::MissingTarget);
        "neither height nor time"
    )]
    #[test_case(
        Plan { height: Some(11), ..Plan::at_time("v2", Timestamp::from_seconds(200)) }
        => Err(PlanError::ConflictingTargets);
        "both height and time"
    )]
    #[test_case(
        Plan::at_height("v2", 11)
        => Ok(Target::Height(11));
        "height only"
    )]
    #[test_case(
        Plan::at_time("v2", Timestamp::from_seconds(200))
        => Ok(Target::Time(Timestamp::from_seconds(200)));
        "time only"
    )]
    fn validating_plans(plan: Plan) -> Result<Target, PlanError> {
        plan.validate_basic()
    }

    #[test_case(Plan::at_height("v2", 9) => true; "height in the past")]
    #[test_case(Plan::at_height("v2", 10) => true; "height equals current")]
    #[test_case(Plan::at_height("v2", 11) => false; "height in the future")]
    #[test_case(Plan::at_time("v2", Timestamp::from_seconds(99)) => true; "time in the past")]
    #[test_case(Plan::at_time("v2", Timestamp::from_seconds(100)) => true; "time equals current")]
    #[test_case(Plan::at_time("v2", Timestamp::from_seconds(101)) => false; "time in the future")]
    fn triggering_plans(plan: Plan) -> bool {
        plan.should_trigger(&BLOCK)
    }

    #[test]
    fn serialization_round_trips() {
        let plan = Plan::at_time("v2", Timestamp::from_seconds(200))
            .with_info("https://example.com/binaries/v2.tar.gz");

        let bytes = plan.to_borsh_vec().unwrap();
        assert_eq!(bytes.deserialize_borsh::<Plan>().unwrap(), plan);

        let json = plan.to_json_string().unwrap();
        assert_eq!(json.deserialize_json::<Plan>().unwrap(), plan);
    }

    #[test]
    fn json_omits_unset_target() {
        let plan = Plan::at_height("v2", 11);

        assert_eq!(
            plan.to_json_string().unwrap(),
            r#"{"name":"v2","height":11,"info":""}"#
        );
    }

    #[test_case(
        Plan::at_time("test", Timestamp::from_seconds(1_577_836_800))
        => "Upgrade Plan\n  Name: test\n  Time: 2020-01-01T00:00:00Z\n  Info: ";
        "time"
    )]
    #[test_case(
        Plan::at_height("test", 100)
        => "Upgrade Plan\n  Name: test\n  Height: 100\n  Info: ";
        "height"
    )]
    #[test_case(
        Plan::at_height("v2", 11).with_info("https://example.com/v2")
        => "Upgrade Plan\n  Name: v2\n  Height: 11\n  Info: https://example.com/v2";
        "with info"
    )]
    fn displaying_plans(plan: Plan) -> String {
        plan.to_string()
    }
}
