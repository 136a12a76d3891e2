use {
    crate::config::{GovernanceAction, GovernanceConfig, NodeConfig},
    anyhow::bail,
    clap::Parser,
    serde::Serialize,
    std::{collections::BTreeMap, fs, path::PathBuf},
    upgrader_app::{App, HandlerRegistry, UpgradeCtx, UpgradeStatus},
    upgrader_db_memory::MemDb,
    upgrader_types::{BlockInfo, JsonSerExt, Plan},
};

#[derive(Parser)]
pub struct RunCmd {
    /// Path to the node's TOML config file
    #[arg(long)]
    config: PathBuf,

    /// Number of blocks to produce after genesis
    #[arg(long, default_value = "100")]
    blocks: u64,
}

impl RunCmd {
    pub fn run(self) -> anyhow::Result<()> {
        let cfg = NodeConfig::load(&self.config)?;

        run_chain(cfg, self.blocks)?;

        Ok(())
    }
}

/// The content of the upgrade-info file, written when the node halts because
/// it needs an upgrade it doesn't know how to perform.
#[derive(Serialize, Debug)]
pub struct UpgradeInfo<'a> {
    pub name: &'a str,
    pub height: u64,
    pub info: &'a str,
}

fn build_handlers(cfg: &NodeConfig) -> HandlerRegistry {
    let mut handlers = HandlerRegistry::new();

    for name in &cfg.upgrade.supported {
        handlers.set(name.clone(), |ctx: UpgradeCtx, plan: &Plan| {
            tracing::info!(
                name = plan.name,
                height = ctx.block.height,
                "Performing upgrade"
            );

            Ok(())
        });
    }

    if let Some(path) = cfg.upgrade.upgrade_info_file.clone() {
        handlers.set_on_upgrade_needed(move |block, plan| {
            if let Err(err) = write_upgrade_info(&path, block, plan) {
                tracing::error!(path, err = err.to_string(), "Failed to write upgrade info");
            }
        });
    }

    handlers
}

fn write_upgrade_info(path: &str, block: BlockInfo, plan: &Plan) -> anyhow::Result<()> {
    let json = UpgradeInfo {
        name: &plan.name,
        height: block.height,
        info: &plan.info,
    }
    .to_json_string_pretty()?;

    fs::write(path, json)?;

    tracing::info!(path, "Wrote upgrade info");

    Ok(())
}

/// Run a chain from genesis for the given number of blocks. Return the last
/// committed block.
///
/// Governance actions are executed in the block of their height, after the
/// upgrade has been evaluated, as transactions would. A rejected action is
/// logged and doesn't stop the chain.
pub fn run_chain(cfg: NodeConfig, blocks: u64) -> anyhow::Result<BlockInfo> {
    let mut governance = BTreeMap::<u64, Vec<GovernanceConfig>>::new();
    for action in &cfg.governance {
        governance
            .entry(action.at_height)
            .or_default()
            .push(action.clone());
    }

    let mut app = App::new(MemDb::new(), build_handlers(&cfg));

    let mut block = BlockInfo {
        height: cfg.chain.genesis_height,
        timestamp: cfg.chain.genesis_time(),
    };

    app.do_init_chain(block)?;

    for _ in 0..blocks {
        let Some(height) = block.height.checked_add(1) else {
            bail!("chain can't advance past height {}", block.height);
        };

        let next = BlockInfo {
            height,
            timestamp: block.timestamp + cfg.chain.block_time(),
        };

        let status = match app.do_finalize_block(next) {
            Ok(status) => status,
            Err(err) => {
                if let Some(halt) = err.as_halt() {
                    tracing::error!(
                        name = halt.name(),
                        height = halt.height(),
                        "Node halted: {halt}"
                    );
                }

                return Err(err.into());
            },
        };

        if let UpgradeStatus::Applied { name, height } = &status {
            tracing::info!(name, height, "Upgrade applied");
        }

        for action in governance.remove(&next.height).unwrap_or_default() {
            execute_governance(&mut app, action);
        }

        app.do_commit()?;

        block = next;
    }

    if !governance.is_empty() {
        bail!(
            "chain stopped at height {} with unexecuted governance actions at heights {:?}",
            block.height,
            governance.keys().collect::<Vec<_>>()
        );
    }

    Ok(block)
}

fn execute_governance(app: &mut App<MemDb>, action: GovernanceConfig) {
    match (action.action, action.plan) {
        (GovernanceAction::Schedule, Some(plan)) => {
            let name = plan.name.clone();
            match app.schedule_upgrade(plan) {
                Ok(()) => tracing::info!(name, "Governance scheduled upgrade"),
                Err(err) => tracing::warn!(
                    name,
                    err = err.to_string(),
                    "Governance failed to schedule upgrade"
                ),
            }
        },
        (GovernanceAction::Schedule, None) => {
            tracing::warn!(
                at_height = action.at_height,
                "Governance schedule action without a plan"
            );
        },
        (GovernanceAction::Clear, _) => {
            app.clear_upgrade_plan();
            tracing::info!("Governance cleared upgrade plan");
        },
    }
}

// ----------------------------------- tests -----------------------------------
