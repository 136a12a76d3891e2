use {
    upgrader_app::{App, AppError, AppResult, Db, UpgradeStatus},
    upgrader_db_memory::MemDb,
    upgrader_types::{BlockInfo, Duration, Plan},
};

pub struct TestSuite<DB = MemDb>
where
    DB: Db,
{
    pub app: App<DB>,
    /// Interally track the last finalized block.
    pub block: BlockInfo,
    /// Each time we make a new block, we set the new block's time as the
    /// previous block's time plus this value.
    pub block_time: Duration,
}

impl<DB> TestSuite<DB>
where
    DB: Db,
    AppError: From<DB::Error>,
{
    /// Create a new test suite.
    ///
    /// It's not recommended to call this directly. Use [`TestBuilder`](crate::TestBuilder)
    /// instead.
    pub fn new(app: App<DB>, block: BlockInfo, block_time: Duration) -> Self {
        Self {
            app,
            block,
            block_time,
        }
    }

    /// The block that will be made next.
    pub fn next_block(&self) -> BlockInfo {
        BlockInfo {
            height: self.block.height + 1,
            timestamp: self.block.timestamp + self.block_time,
        }
    }

    /// Make a new block, then execute the given action in it, as if it's a
    /// transaction included in the block.
    ///
    /// The outer result is that of the block; the inner one is the action's.
    /// The block is committed regardless of whether the action succeeds. If
    /// the block fails (e.g. the node halts), the action isn't executed and
    /// nothing is committed.
    pub fn try_make_block_with<F, T>(
        &mut self,
        action: F,
    ) -> AppResult<(UpgradeStatus, AppResult<T>)>
    where
        F: FnOnce(&mut App<DB>) -> AppResult<T>,
    {
        let block = self.next_block();

        let status = self.app.do_finalize_block(block)?;
        let outcome = action(&mut self.app);

        self.app.do_commit()?;
        self.block = block;

        Ok((status, outcome))
    }

    /// Make a new empty block.
    pub fn try_make_block(&mut self) -> AppResult<UpgradeStatus> {
        self.try_make_block_with(|_| Ok(()))
            .map(|(status, _)| status)
    }

    /// Make a new empty block, panicking on error.
    pub fn make_block(&mut self) -> UpgradeStatus {
        self.try_make_block().unwrap_or_else(|err| {
            panic!("fatal error while making block: {err}");
        })
    }

    /// Make empty blocks until the given height is reached.
    pub fn make_blocks_until(&mut self, height: u64) -> Vec<UpgradeStatus> {
        let mut statuses = vec![];

        while self.block.height < height {
            statuses.push(self.make_block());
        }

        statuses
    }

    /// Schedule an upgrade in a new block, as a governance proposal would.
    pub fn schedule_upgrade(&mut self, plan: Plan) -> AppResult<()> {
        let (_, outcome) = self
            .try_make_block_with(|app| app.schedule_upgrade(plan))
            .unwrap_or_else(|err| {
                panic!("fatal error while making block: {err}");
            });

        outcome
    }

    /// Clear the scheduled upgrade in a new block.
    pub fn clear_upgrade_plan(&mut self) {
        self.try_make_block_with(|app| {
            app.clear_upgrade_plan();
            Ok(())
        })
        .unwrap_or_else(|err| {
            panic!("fatal error while making block: {err}");
        });
    }
}
