use {
    crate::{AppError, AppResult, Halt, HandlerRegistry, UpgradeCtx, DONE, PLAN},
    upgrader_types::{BlockInfo, Buffer, Order, Plan, StdResult, Storage, StorageWrapper, Target},
};

/// The outcome of evaluating a block that didn't halt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeStatus {
    /// There is no pending upgrade.
    Idle,
    /// An upgrade is pending, but not yet due, and this node doesn't have a
    /// handler for it yet, which is expected.
    Pending { name: String },
    /// An upgrade was due and has been applied in this block.
    Applied { name: String, height: u64 },
}

/// Coordinates chain upgrades: accepts schedule requests, and decides for
/// each block whether a scheduled upgrade is to be applied, or the node is to
/// halt.
///
/// The keeper owns the storage it persists its state in, and the registry of
/// upgrades this node's software supports.
pub struct Keeper<S> {
    storage: S,
    handlers: HandlerRegistry,
}

impl<S> Keeper<S> {
    pub fn new(storage: S, handlers: HandlerRegistry) -> Self {
        Self { storage, handlers }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Register a handler for the upgrade of the given name. A handler must
    /// be registered for an upgrade to proceed, even if it does nothing.
    ///
    /// Registering doesn't revisit blocks already evaluated. It only affects
    /// blocks evaluated afterwards.
    pub fn set_upgrade_handler<N, F>(&mut self, name: N, handler: F)
    where
        N: Into<String>,
        F: Fn(UpgradeCtx<'_>, &Plan) -> AppResult<()> + Send + Sync + 'static,
    {
        self.handlers.set(name, handler);
    }

    pub fn into_inner(self) -> (S, HandlerRegistry) {
        (self.storage, self.handlers)
    }
}

impl<S> Keeper<S>
where
    S: Storage,
{
    /// Schedule an upgrade, replacing the one currently scheduled if any.
    pub fn schedule_upgrade(&mut self, block: BlockInfo, plan: Plan) -> AppResult<()> {
        let target = plan.validate_basic()?;

        let in_future = match target {
            Target::Height(height) => height > block.height,
            Target::Time(time) => time > block.timestamp,
        };

        if !in_future {
            return Err(AppError::ScheduleInPast {
                target,
                height: block.height,
                time: block.timestamp,
            });
        }

        if let Some(height) = DONE.may_load(&self.storage, plan.name.as_str())? {
            return Err(AppError::AlreadyCompleted {
                name: plan.name,
                height,
            });
        }

        PLAN.save(&mut self.storage, &plan)?;

        #[cfg(feature = "tracing")]
        tracing::info!(plan = %plan, "Scheduled upgrade");

        Ok(())
    }

    /// Delete the scheduled upgrade. No-op if there isn't one.
    pub fn clear_upgrade_plan(&mut self) {
        PLAN.remove(&mut self.storage);

        #[cfg(feature = "tracing")]
        tracing::info!("Cleared upgrade plan");
    }

    pub fn upgrade_plan(&self) -> AppResult<Option<Plan>> {
        Ok(PLAN.may_load(&self.storage)?)
    }

    /// The height at which the upgrade of the given name was applied, if it
    /// has been.
    pub fn done_height(&self, name: &str) -> AppResult<Option<u64>> {
        Ok(DONE.may_load(&self.storage, name)?)
    }

    /// All upgrades that have been applied, ascending by name.
    pub fn done_upgrades(&self) -> AppResult<Vec<(String, u64)>> {
        Ok(DONE
            .range(&self.storage, Order::Ascending)
            .collect::<StdResult<Vec<_>>>()?)
    }

    /// Evaluate the scheduled upgrade against the block that is beginning.
    ///
    /// Either all effects (the handler's writes, clearing the plan, marking
    /// the upgrade done) are persisted, or, if a halt or any other error is
    /// returned, none is.
    pub fn begin_block(&mut self, block: BlockInfo) -> AppResult<UpgradeStatus> {
        let mut buffer = Buffer::new(StorageWrapper::new(&self.storage), None);
        let status = evaluate(&mut buffer, &self.handlers, block)?;

        let (_, batch) = buffer.disassemble();
        self.storage.flush(batch);

        Ok(status)
    }
}

fn evaluate(
    storage: &mut dyn Storage,
    handlers: &HandlerRegistry,
    block: BlockInfo,
) -> AppResult<UpgradeStatus> {
    let Some(plan) = PLAN.may_load(storage)? else {
        #[cfg(feature = "tracing")]
        tracing::debug!(height = block.height, "No upgrade scheduled");

        return Ok(UpgradeStatus::Idle);
    };

    let handler = handlers.get(&plan.name);

    if !plan.should_trigger(&block) {
        // The upgrade isn't due, but the binary already knows about it. This
        // means the binary was swapped too early.
        if handler.is_some() {
            #[cfg(feature = "tracing")]
            tracing::error!(
                name = plan.name,
                height = block.height,
                "UNKNOWN UPGRADE - in binary but not executed on chain"
            );

            return Err(Halt::HandlerBeforeTrigger {
                name: plan.name,
                height: block.height,
            }
            .into());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(name = plan.name, height = block.height, "Upgrade pending");

        return Ok(UpgradeStatus::Pending { name: plan.name });
    }

    let Some(handler) = handler else {
        #[cfg(feature = "tracing")]
        tracing::error!(
            name = plan.name,
            height = block.height,
            info = plan.info,
            "UPGRADE NEEDED"
        );

        handlers.notify_upgrade_needed(block, &plan);

        return Err(Halt::UpgradeNeeded {
            name: plan.name,
            height: block.height,
            info: plan.info,
        }
        .into());
    };

    #[cfg(feature = "tracing")]
    tracing::info!(height = block.height, plan = %plan, "Applying upgrade");

    handler(
        UpgradeCtx {
            storage: &mut *storage,
            block,
        },
        &plan,
    )?;

    PLAN.remove(storage);
    DONE.save(storage, plan.name.as_str(), &block.height)?;

    Ok(UpgradeStatus::Applied {
        name: plan.name,
        height: block.height,
    })
}

// ----------------------------------- tests -----------------------------------
