use {
    crate::AppResult,
    std::{collections::HashMap, fmt},
    upgrader_types::{BlockInfo, Plan, Storage},
};

/// What an upgrade handler is given to work with.
pub struct UpgradeCtx<'a> {
    /// The state of the block being processed. Writes made here are only
    /// persisted if the whole block evaluation succeeds.
    pub storage: &'a mut dyn Storage,
    pub block: BlockInfo,
}

/// An action that performs an upgrade, typically a state migration.
pub type UpgradeHandler = Box<dyn Fn(UpgradeCtx<'_>, &Plan) -> AppResult<()> + Send + Sync>;

/// A callback invoked right before a node halts because it doesn't know how to
/// perform a due upgrade.
pub type UpgradeNeededHook = Box<dyn Fn(BlockInfo, &Plan) + Send + Sync>;

/// The upgrades this node's software knows how to perform, indexed by name.
///
/// The registry lives in memory only. It describes the binary, not the chain,
/// so it's built when the node starts and is never persisted.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, UpgradeHandler>,
    on_upgrade_needed: Option<UpgradeNeededHook>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under the given name, replacing any handler
    /// previously registered under the same name.
    pub fn set<N, F>(&mut self, name: N, handler: F)
    where
        N: Into<String>,
        F: Fn(UpgradeCtx<'_>, &Plan) -> AppResult<()> + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    pub fn with_handler<N, F>(mut self, name: N, handler: F) -> Self
    where
        N: Into<String>,
        F: Fn(UpgradeCtx<'_>, &Plan) -> AppResult<()> + Send + Sync + 'static,
    {
        self.set(name, handler);
        self
    }

    pub fn set_on_upgrade_needed<F>(&mut self, hook: F)
    where
        F: Fn(BlockInfo, &Plan) + Send + Sync + 'static,
    {
        self.on_upgrade_needed = Some(Box::new(hook));
    }

    pub fn with_on_upgrade_needed<F>(mut self, hook: F) -> Self
    where
        F: Fn(BlockInfo, &Plan) + Send + Sync + 'static,
    {
        self.set_on_upgrade_needed(hook);
        self
    }

    pub fn get(&self, name: &str) -> Option<&UpgradeHandler> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Names of all registered handlers, in ascending order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.handlers.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn notify_upgrade_needed(&self, block: BlockInfo, plan: &Plan) {
        if let Some(hook) = &self.on_upgrade_needed {
            hook(block, plan);
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .field("on_upgrade_needed", &self.on_upgrade_needed.is_some())
            .finish()
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        upgrader_types::{MockStorage, MOCK_BLOCK},
    };

    #[test]
    fn registering_overwrites() {
        let mut registry = HandlerRegistry::new()
            .with_handler("v2", |ctx: UpgradeCtx, _: &Plan| {
                ctx.storage.write(b"migrated", b"first");
                Ok(())
            })
            .with_handler("v1", |_: UpgradeCtx, _: &Plan| Ok(()));

        registry.set("v2", |ctx: UpgradeCtx, _: &Plan| {
            ctx.storage.write(b"migrated", b"second");
            Ok(())
        });

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("v1"));
        assert!(!registry.contains("v3"));
        assert_eq!(registry.names(), ["v1", "v2"]);

        let mut storage = MockStorage::new();
        let handler = registry.get("v2").unwrap();

        handler(
            UpgradeCtx {
                storage: &mut storage,
                block: MOCK_BLOCK,
            },
            &Plan::at_height("v2", 1),
        )
        .unwrap();

        assert_eq!(storage.read(b"migrated"), Some(b"second".to_vec()));
    }

    #[test]
    fn upgrade_needed_hook_is_optional() {
        let plan = Plan::at_height("v2", 1);

        // No hook: nothing happens.
        HandlerRegistry::new().notify_upgrade_needed(MOCK_BLOCK, &plan);

        let calls = Arc::new(AtomicUsize::new(0));
        let registry = HandlerRegistry::new().with_on_upgrade_needed({
            let calls = calls.clone();
            move |block, plan| {
                assert_eq!(block, MOCK_BLOCK);
                assert_eq!(plan.name, "v2");
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });

        registry.notify_upgrade_needed(MOCK_BLOCK, &plan);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
