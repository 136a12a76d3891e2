use {
    std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    upgrader_app::{AppError, Db, Halt, UpgradeCtx, UpgradeStatus},
    upgrader_testing::{HaltExt, TestBuilder},
    upgrader_types::{Duration, Plan, ResultExt, Storage, Timestamp},
};

/// A migration that records which upgrade ran it.
mod migration {
    use {
        upgrader_app::{AppResult, UpgradeCtx},
        upgrader_storage::Item,
        upgrader_types::Plan,
    };

    pub const MIGRATED_BY: Item<String> = Item::new("migrated_by");

    pub fn handler(ctx: UpgradeCtx, plan: &Plan) -> AppResult<()> {
        MIGRATED_BY.save(ctx.storage, &plan.name)?;

        Ok(())
    }
}

#[test]
fn binary_swapped_before_trigger_halts() {
    let mut suite = TestBuilder::new()
        .set_genesis_time(Timestamp::from_seconds(0))
        .set_block_time(Duration::from_seconds(1))
        .add_handler("v2", migration::handler)
        .build()
        .unwrap();

    // Schedule at block 1, for block 5.
    suite
        .schedule_upgrade(Plan::at_height("v2", 5).with_info("v2.0.0"))
        .should_succeed();

    suite.app.upgrade_plan().should_succeed_and_equal(Some(
        Plan::at_height("v2", 5).with_info("v2.0.0"),
    ));

    // Block 2: this binary already knows the upgrade, which isn't due. That
    // means the binary was swapped too early.
    suite.try_make_block().should_halt_with(Halt::HandlerBeforeTrigger {
        name: "v2".to_string(),
        height: 2,
    });

    // Nothing was committed.
    assert_eq!(suite.block.height, 1);
    assert_eq!(suite.app.db().latest_version(), Some(1));
}

#[test]
fn upgrade_applies_after_restart_with_new_binary() {
    let old_binary = TestBuilder::new()
        .set_genesis_time(Timestamp::from_seconds(0))
        .set_block_time(Duration::from_seconds(1));

    let mut suite = old_binary.build().unwrap();

    suite
        .schedule_upgrade(Plan::at_height("v2", 5).with_info("v2.0.0"))
        .should_succeed();

    // Blocks 2 to 4 are uneventful.
    for status in suite.make_blocks_until(4) {
        assert_eq!(status, UpgradeStatus::Pending {
            name: "v2".to_string(),
        });
    }

    // Block 5: the old binary doesn't know how to perform the upgrade.
    suite.try_make_block().should_halt_with(Halt::UpgradeNeeded {
        name: "v2".to_string(),
        height: 5,
        info: "v2.0.0".to_string(),
    });

    // Halting again and again: the node can't get past this block.
    suite.try_make_block().should_halt();
    assert_eq!(suite.block.height, 4);

    // Restart with the new binary, on the same DB.
    let mut suite = TestBuilder::new()
        .set_block_time(Duration::from_seconds(1))
        .set_db(suite.app.db().clone())
        .add_handler("v2", migration::handler)
        .build()
        .unwrap();

    assert_eq!(suite.block.height, 4);

    assert_eq!(suite.make_block(), UpgradeStatus::Applied {
        name: "v2".to_string(),
        height: 5,
    });

    suite.app.upgrade_plan().should_succeed_and_equal(None);
    suite.app.done_height("v2").should_succeed_and_equal(Some(5));

    // The handler's writes are persisted.
    let storage = suite.app.keeper().storage().clone();
    migration::MIGRATED_BY
        .load(&storage)
        .should_succeed_and_equal("v2".to_string());

    // The name can never be used again.
    suite
        .schedule_upgrade(Plan::at_height("v2", 100))
        .should_fail_with_error(AppError::AlreadyCompleted {
            name: "v2".to_string(),
            height: 5,
        });

    // Later blocks are uneventful, and the handler is kept around harmlessly.
    assert_eq!(suite.make_block(), UpgradeStatus::Idle);
}

#[test]
fn time_based_upgrade_triggers_at_first_block_past_the_time() {
    let calls = Arc::new(AtomicUsize::new(0));

    let mut suite = TestBuilder::new()
        .set_genesis_time(Timestamp::from_seconds(0))
        .set_block_time(Duration::from_seconds(10))
        .build()
        .unwrap();

    // Block 1 is at 10 seconds. Schedule for 35 seconds.
    suite
        .schedule_upgrade(Plan::at_time("v2", Timestamp::from_seconds(35)))
        .should_succeed();

    // Blocks 2 (20s) and 3 (30s) are before the time.
    suite.make_blocks_until(3);

    let mut suite = TestBuilder::new()
        .set_block_time(Duration::from_seconds(10))
        .set_db(suite.app.db().clone())
        .add_handler("v2", {
            let calls = calls.clone();
            move |ctx: UpgradeCtx, _: &Plan| {
                assert_eq!(ctx.block.height, 4);
                assert_eq!(ctx.block.timestamp, Timestamp::from_seconds(40));
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .build()
        .unwrap();

    // Block 4 (40s) is past the time.
    assert_eq!(suite.make_block(), UpgradeStatus::Applied {
        name: "v2".to_string(),
        height: 4,
    });

    suite.make_blocks_until(10);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn rejected_schedules_leave_existing_plan_in_place() {
    let mut suite = TestBuilder::new()
        .set_genesis_height(100)
        .set_genesis_time(Timestamp::from_seconds(1_000))
        .build()
        .unwrap();

    suite
        .schedule_upgrade(Plan::at_height("v2", 200))
        .should_succeed();

    // Block 102 is the current one when this is executed.
    suite
        .schedule_upgrade(Plan::at_height("v3", 102))
        .should_fail_with_error("upgrade cannot be scheduled in the past");

    suite
        .schedule_upgrade(Plan::at_height("", 300))
        .should_fail_with_error("upgrade name cannot be empty");

    suite
        .schedule_upgrade(Plan {
            height: Some(300),
            ..Plan::at_time("v3", Timestamp::from_seconds(5_000))
        })
        .should_fail_with_error("only one of height or time can be specified");

    suite
        .app
        .upgrade_plan()
        .should_succeed_and_equal(Some(Plan::at_height("v2", 200)));

    // A governance decision cancels it.
    suite.clear_upgrade_plan();

    suite.app.upgrade_plan().should_succeed_and_equal(None);
    suite.make_blocks_until(250).into_iter().for_each(|status| {
        assert_eq!(status, UpgradeStatus::Idle);
    });
}

#[test]
fn halting_does_not_persist_pending_changes() {
    let mut suite = TestBuilder::new()
        .set_genesis_time(Timestamp::from_seconds(0))
        .build()
        .unwrap();

    suite
        .schedule_upgrade(Plan::at_height("v2", 3))
        .should_succeed();
    suite.make_block();

    let committed_before = suite
        .app
        .db()
        .with_committed_storage(|committed| committed.clone());

    // Write something in the pending changeset, as a transaction would.
    suite.app.db().state_storage().write(b"dirty", b"data");

    suite.try_make_block().should_halt();

    // The changeset was discarded along with the halting block.
    assert!(!suite.app.db().has_changeset());
    assert_eq!(
        suite
            .app
            .db()
            .with_committed_storage(|committed| committed.clone()),
        committed_before
    );
    assert!(!suite.app.db().state_storage().has(b"dirty"));
}

#[test]
fn upgrade_needed_hook_is_called_on_halt() {
    let seen = Arc::new(AtomicUsize::new(0));

    let mut suite = TestBuilder::new()
        .set_genesis_time(Timestamp::from_seconds(0))
        .set_on_upgrade_needed({
            let seen = seen.clone();
            move |block, plan| {
                assert_eq!(block.height, 3);
                assert_eq!(plan.info, "https://example.com/v2");
                seen.fetch_add(1, Ordering::SeqCst);
            }
        })
        .build()
        .unwrap();

    suite
        .schedule_upgrade(Plan::at_height("v2", 3).with_info("https://example.com/v2"))
        .should_succeed();

    suite.make_block();
    assert_eq!(seen.load(Ordering::SeqCst), 0);

    suite.try_make_block().should_halt();
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    suite.try_make_block().should_halt();
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn finalizing_out_of_order_is_rejected() {
    let mut suite = TestBuilder::new()
        .set_genesis_height(7)
        .set_genesis_time(Timestamp::from_seconds(0))
        .build()
        .unwrap();

    let mut block = suite.next_block();
    block.height += 1;

    suite
        .app
        .do_finalize_block(block)
        .should_fail_with_error(AppError::IncorrectBlockHeight {
            expect: 8,
            actual: 9,
        });

    suite.make_block();
    assert_eq!(suite.app.last_finalized_block().unwrap().height, 8);

    suite
        .app
        .do_init_chain(suite.block)
        .should_fail_with_error(AppError::AlreadyInitialized { height: 8 });
}
