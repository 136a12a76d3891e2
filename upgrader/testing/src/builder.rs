use {
    crate::{setup_tracing_subscriber, TestSuite},
    std::time::{SystemTime, UNIX_EPOCH},
    tracing::Level,
    upgrader_app::{App, AppResult, Db, HandlerRegistry, UpgradeCtx},
    upgrader_db_memory::MemDb,
    upgrader_types::{BlockInfo, Duration, Plan, Timestamp},
};

const DEFAULT_TRACING_LEVEL: Level = Level::INFO;
const DEFAULT_GENESIS_HEIGHT: u64 = 0;
const DEFAULT_BLOCK_TIME: Duration = Duration::from_seconds(5);

pub struct TestBuilder {
    tracing_level: Option<Level>,
    genesis_height: Option<u64>,
    genesis_time: Option<Timestamp>,
    block_time: Option<Duration>,
    db: Option<MemDb>,
    handlers: HandlerRegistry,
}

// Clippy incorrectly thinks we can derive `Default` here, which we can't.
#[allow(clippy::new_without_default)]
impl TestBuilder {
    pub fn new() -> Self {
        Self {
            tracing_level: Some(DEFAULT_TRACING_LEVEL),
            genesis_height: None,
            genesis_time: None,
            block_time: None,
            db: None,
            handlers: HandlerRegistry::new(),
        }
    }

    // Setting this to `None` means no tracing.
    pub fn set_tracing_level(mut self, level: Option<Level>) -> Self {
        self.tracing_level = level;
        self
    }

    pub fn set_genesis_height(mut self, genesis_height: u64) -> Self {
        self.genesis_height = Some(genesis_height);
        self
    }

    pub fn set_genesis_time(mut self, genesis_time: Timestamp) -> Self {
        self.genesis_time = Some(genesis_time);
        self
    }

    pub fn set_block_time(mut self, block_time: Duration) -> Self {
        self.block_time = Some(block_time);
        self
    }

    /// Resume from an existing database instead of starting a new chain.
    /// This is how a node restarting with a new binary is simulated.
    pub fn set_db(mut self, db: MemDb) -> Self {
        self.db = Some(db);
        self
    }

    pub fn add_handler<N, F>(mut self, name: N, handler: F) -> Self
    where
        N: Into<String>,
        F: Fn(UpgradeCtx<'_>, &Plan) -> AppResult<()> + Send + Sync + 'static,
    {
        self.handlers.set(name, handler);
        self
    }

    pub fn set_on_upgrade_needed<F>(mut self, hook: F) -> Self
    where
        F: Fn(BlockInfo, &Plan) + Send + Sync + 'static,
    {
        self.handlers.set_on_upgrade_needed(hook);
        self
    }

    pub fn build(self) -> anyhow::Result<TestSuite> {
        if let Some(tracing_level) = self.tracing_level {
            setup_tracing_subscriber(tracing_level);
        }

        let block_time = self.block_time.unwrap_or(DEFAULT_BLOCK_TIME);

        let db = self.db.unwrap_or_default();
        let resuming = db.latest_version().is_some();
        let app = App::new(db, self.handlers);

        let block = if resuming {
            app.last_finalized_block()?
        } else {
            // Use the current system time as genesis time, if unspecified.
            let genesis_time = match self.genesis_time {
                Some(time) => time,
                None => Timestamp::from_nanos(
                    SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos(),
                ),
            };

            let genesis_block = BlockInfo {
                height: self.genesis_height.unwrap_or(DEFAULT_GENESIS_HEIGHT),
                timestamp: genesis_time,
            };

            app.do_init_chain(genesis_block)?;

            genesis_block
        };

        Ok(TestSuite::new(app, block, block_time))
    }
}
