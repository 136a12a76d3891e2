use {
    crate::{
        AppError, AppResult, Db, HandlerRegistry, Keeper, UpgradeStatus, LAST_FINALIZED_BLOCK,
    },
    upgrader_types::{BlockInfo, Plan, PrefixStore},
};

/// The namespace under which the keeper's state is stored.
pub const UPGRADE_NAMESPACE: &[u8] = b"upgrade";

/// The host application: drives the keeper block by block, on top of a
/// database.
pub struct App<DB>
where
    DB: Db,
{
    db: DB,
    keeper: Keeper<PrefixStore<DB::Storage>>,
}

impl<DB> App<DB>
where
    DB: Db,
    AppError: From<DB::Error>,
{
    pub fn new(db: DB, handlers: HandlerRegistry) -> Self {
        let storage = PrefixStore::new(db.state_storage(), UPGRADE_NAMESPACE);

        Self {
            keeper: Keeper::new(storage, handlers),
            db,
        }
    }

    pub fn db(&self) -> &DB {
        &self.db
    }

    pub fn keeper(&self) -> &Keeper<PrefixStore<DB::Storage>> {
        &self.keeper
    }

    pub fn keeper_mut(&mut self) -> &mut Keeper<PrefixStore<DB::Storage>> {
        &mut self.keeper
    }

    /// Record the genesis block and commit it. Must be called exactly once,
    /// before any block is finalized.
    pub fn do_init_chain(&self, genesis: BlockInfo) -> AppResult<u64> {
        let mut storage = self.db.state_storage();

        if let Some(block) = LAST_FINALIZED_BLOCK.may_load(&storage)? {
            return Err(AppError::AlreadyInitialized {
                height: block.height,
            });
        }

        LAST_FINALIZED_BLOCK.save(&mut storage, &genesis)?;

        let version = self.db.commit()?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            height = genesis.height,
            time = %genesis.timestamp,
            version,
            "Initialized chain"
        );

        Ok(version)
    }

    pub fn last_finalized_block(&self) -> AppResult<BlockInfo> {
        Ok(LAST_FINALIZED_BLOCK.load(&self.db.state_storage())?)
    }

    /// Evaluate the scheduled upgrade at the given block.
    ///
    /// On error (including a halt), the DB changeset is discarded, so the
    /// block can be replayed from the last committed state.
    pub fn do_finalize_block(&mut self, block: BlockInfo) -> AppResult<UpgradeStatus> {
        match self.finalize_block(block) {
            Ok(status) => {
                #[cfg(feature = "tracing")]
                tracing::info!(height = block.height, status = ?status, "Finalized block");

                Ok(status)
            },
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(height = block.height, err = err.to_string(), "Failed to finalize block");

                self.db.discard_changeset();

                Err(err)
            },
        }
    }

    fn finalize_block(&mut self, block: BlockInfo) -> AppResult<UpgradeStatus> {
        let mut storage = self.db.state_storage();
        let last_finalized_block = LAST_FINALIZED_BLOCK.load(&storage)?;

        // Make sure the new block height is exactly the last finalized height
        // plus one.
        if block.height != last_finalized_block.height + 1 {
            return Err(AppError::IncorrectBlockHeight {
                expect: last_finalized_block.height + 1,
                actual: block.height,
            });
        }

        let status = self.keeper.begin_block(block)?;

        LAST_FINALIZED_BLOCK.save(&mut storage, &block)?;

        Ok(status)
    }

    pub fn do_commit(&self) -> AppResult<u64> {
        let version = self.db.commit()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(version, "Committed state");

        Ok(version)
    }

    /// Schedule an upgrade, taking the last finalized block as the current one.
    pub fn schedule_upgrade(&mut self, plan: Plan) -> AppResult<()> {
        let block = self.last_finalized_block()?;

        self.keeper.schedule_upgrade(block, plan)
    }

    pub fn clear_upgrade_plan(&mut self) {
        self.keeper.clear_upgrade_plan()
    }

    pub fn upgrade_plan(&self) -> AppResult<Option<Plan>> {
        self.keeper.upgrade_plan()
    }

    pub fn done_height(&self, name: &str) -> AppResult<Option<u64>> {
        self.keeper.done_height(name)
    }

    pub fn done_upgrades(&self) -> AppResult<Vec<(String, u64)>> {
        self.keeper.done_upgrades()
    }
}
