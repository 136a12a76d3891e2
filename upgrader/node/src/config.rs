use {
    config::{Config, Environment, File, FileFormat},
    serde::Deserialize,
    std::path::Path,
    upgrader_types::{Duration, Plan, Timestamp},
};

/// Prefix of environment variables that override the config file, e.g.
/// `UPGRADER__CHAIN__BLOCK_TIME=2`.
const ENV_PREFIX: &str = "UPGRADER";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub upgrade: UpgradeConfig,
    #[serde(default)]
    pub governance: Vec<GovernanceConfig>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ChainConfig {
    pub genesis_height: u64,
    /// Seconds since the UNIX epoch.
    pub genesis_time: u64,
    /// Seconds between two blocks.
    pub block_time: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            genesis_height: 0,
            genesis_time: 0,
            block_time: 5,
        }
    }
}

impl ChainConfig {
    pub fn genesis_time(&self) -> Timestamp {
        Timestamp::from_seconds(self.genesis_time.into())
    }

    pub fn block_time(&self) -> Duration {
        Duration::from_seconds(self.block_time.into())
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UpgradeConfig {
    /// Names of the upgrades this binary knows how to perform.
    pub supported: Vec<String>,
    /// Where to write the details of a needed upgrade when halting, for an
    /// external process supervisor to pick up.
    pub upgrade_info_file: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceAction {
    Schedule,
    Clear,
}

/// A governance decision, executed in the block of the given height.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GovernanceConfig {
    pub at_height: u64,
    pub action: GovernanceAction,
    /// The plan to schedule. Ignored when clearing.
    #[serde(default)]
    pub plan: Option<Plan>,
}

impl NodeConfig {
    /// Load the config from a TOML file, overridden by environment variables.
    pub fn load<P>(path: P) -> Result<Self, config::ConfigError>
    where
        P: AsRef<Path>,
    {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env<P>(path: P, env: Environment) -> Result<Self, config::ConfigError>
    where
        P: AsRef<Path>,
    {
        let env_override = env
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("upgrade.supported");

        let config = Config::builder()
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
            .add_source(env_override)
            .build()?;

        config.try_deserialize()
    }
}

// ----------------------------------- tests -----------------------------------
