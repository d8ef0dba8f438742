#![cfg(test)]

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env, String,
};

use crate::types::{EntryKind, EntryStatus, PositionStatus};
use crate::{Error, Plan, YieldVault, YieldVaultClient};

const UNIT: i128 = 10_000_000; // 7 decimals

struct TestContext {
    env: Env,
    admin: Address,
    user1: Address,
    user2: Address,
    token: Address,
    vault_id: Address,
    client: YieldVaultClient<'static>,
}

fn setup() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let user1 = Address::generate(&env);
    let user2 = Address::generate(&env);
    let token_admin = Address::generate(&env);

    // Stablecoin the vault holds
    let sac = env.register_stellar_asset_contract_v2(token_admin.clone());
    let token = sac.address();
    let token_mint = StellarAssetClient::new(&env, &token);
    token_mint.mint(&user1, &(1_000_000 * UNIT));
    token_mint.mint(&user2, &(1_000_000 * UNIT));
    token_mint.mint(&admin, &(10_000_000 * UNIT));

    let vault_id = env.register(YieldVault, ());
    let client = YieldVaultClient::new(&env, &vault_id);
    client.initialize(&admin, &token);

    TestContext {
        env,
        admin,
        user1,
        user2,
        token,
        vault_id,
        client,
    }
}

/// Standard test plan: 1% per 60s period, 3 periods, 100..10_000 bounds.
fn create_test_plan(ctx: &TestContext) -> u32 {
    ctx.client.create_plan(
        &String::from_str(&ctx.env, "Starter"),
        &100u32, // 1%
        &60u64,
        &3u32,
        &(100 * UNIT),
        &(10_000 * UNIT),
    )
}

/// Deposit and approve, leaving the user with a spendable balance.
fn fund(ctx: &TestContext, user: &Address, amount: i128) {
    let entry_id = ctx.client.deposit(user, &amount);
    ctx.client.approve_entry(&entry_id);
}

fn advance_time(ctx: &TestContext, secs: u64) {
    ctx.env.ledger().with_mut(|li| {
        li.timestamp += secs;
    });
}

// ─── Initialization & plan catalog ──────────────────────────────

#[test]
fn test_initialize_only_once() {
    let ctx = setup();
    assert_eq!(
        ctx.client.try_initialize(&ctx.admin, &ctx.token),
        Err(Ok(Error::AlreadyInitialized))
    );
}

#[test]
fn test_create_plan() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);
    assert_eq!(plan_id, 1);

    let plan = ctx.client.get_plan(&plan_id);
    assert_eq!(plan.rate_bps, 100);
    assert_eq!(plan.period_secs, 60);
    assert_eq!(plan.total_periods, 3);
    assert_eq!(plan.min_amount, 100 * UNIT);
    assert_eq!(plan.max_amount, 10_000 * UNIT);

    assert_eq!(ctx.client.list_plans().len(), 1);
}

#[test]
fn test_plan_param_validation() {
    let ctx = setup();
    let name = String::from_str(&ctx.env, "Bad");

    assert_eq!(
        ctx.client
            .try_create_plan(&name, &100, &0, &3, &UNIT, &(10 * UNIT)),
        Err(Ok(Error::InvalidPeriod))
    );
    assert_eq!(
        ctx.client
            .try_create_plan(&name, &100, &60, &0, &UNIT, &(10 * UNIT)),
        Err(Ok(Error::InvalidDuration))
    );
    assert_eq!(
        ctx.client
            .try_create_plan(&name, &100, &60, &3, &(10 * UNIT), &UNIT),
        Err(Ok(Error::InvalidBounds))
    );
    assert_eq!(
        ctx.client.try_create_plan(&name, &100, &60, &3, &0, &UNIT),
        Err(Ok(Error::InvalidBounds))
    );
}

#[test]
fn test_remove_plan() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);

    ctx.client.remove_plan(&plan_id);
    assert_eq!(ctx.client.list_plans().len(), 0);
    assert_eq!(
        ctx.client.try_get_plan(&plan_id),
        Err(Ok(Error::PlanNotFound))
    );
    assert_eq!(
        ctx.client.try_remove_plan(&plan_id),
        Err(Ok(Error::PlanNotFound))
    );
}

// ─── Deposits (contribution proofs) ─────────────────────────────

#[test]
fn test_deposit_credits_on_approval() {
    let ctx = setup();
    let token = TokenClient::new(&ctx.env, &ctx.token);

    let entry_id = ctx.client.deposit(&ctx.user1, &(1000 * UNIT));

    // Escrowed, not yet spendable
    assert_eq!(token.balance(&ctx.vault_id), 1000 * UNIT);
    assert_eq!(ctx.client.balance_of(&ctx.user1), 0);
    assert_eq!(ctx.client.pending_entries().len(), 1);

    ctx.client.approve_entry(&entry_id);

    assert_eq!(ctx.client.balance_of(&ctx.user1), 1000 * UNIT);
    assert_eq!(ctx.client.pending_entries().len(), 0);

    let account = ctx.client.get_account(&ctx.user1);
    assert_eq!(account.total_contributed, 1000 * UNIT);

    let entries = ctx.client.entries_of(&ctx.user1);
    assert_eq!(entries.len(), 1);
    let entry = entries.get_unchecked(0);
    assert_eq!(entry.kind, EntryKind::Contribution);
    assert_eq!(entry.status, EntryStatus::Settled);

    assert_eq!(ctx.client.get_stats().total_contributed, 1000 * UNIT);
}

#[test]
fn test_deposit_reject_returns_escrow() {
    let ctx = setup();
    let token = TokenClient::new(&ctx.env, &ctx.token);
    let before = token.balance(&ctx.user1);

    let entry_id = ctx.client.deposit(&ctx.user1, &(1000 * UNIT));
    ctx.client.reject_entry(&entry_id);

    assert_eq!(ctx.client.balance_of(&ctx.user1), 0);
    assert_eq!(token.balance(&ctx.user1), before);
    assert_eq!(
        ctx.client.entries_of(&ctx.user1).get_unchecked(0).status,
        EntryStatus::Rejected
    );
}

#[test]
fn test_entry_decided_only_once() {
    let ctx = setup();
    let entry_id = ctx.client.deposit(&ctx.user1, &(100 * UNIT));
    ctx.client.approve_entry(&entry_id);

    assert_eq!(
        ctx.client.try_approve_entry(&entry_id),
        Err(Ok(Error::EntryNotPending))
    );
    assert_eq!(
        ctx.client.try_reject_entry(&entry_id),
        Err(Ok(Error::EntryNotPending))
    );
    assert_eq!(
        ctx.client.try_approve_entry(&999u64),
        Err(Ok(Error::EntryNotFound))
    );
}

// ─── Positions ──────────────────────────────────────────────────

#[test]
fn test_open_position_debits_principal() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);
    fund(&ctx, &ctx.user1, 1000 * UNIT);

    let opened_at = ctx.env.ledger().timestamp();
    let position_id = ctx.client.open_position(&ctx.user1, &plan_id, &(500 * UNIT));

    assert_eq!(ctx.client.balance_of(&ctx.user1), 500 * UNIT);

    let position = ctx.client.get_position(&position_id);
    assert_eq!(position.owner, ctx.user1);
    assert_eq!(position.principal, 500 * UNIT);
    assert_eq!(position.rate_bps, 100);
    assert_eq!(position.periods_settled, 0);
    assert_eq!(position.next_due, opened_at + 60);
    assert_eq!(position.status, PositionStatus::Active);

    let account = ctx.client.get_account(&ctx.user1);
    assert_eq!(account.total_invested, 500 * UNIT);
    assert_eq!(ctx.client.get_stats().open_positions, 1);
}

#[test]
fn test_open_position_validation() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);
    fund(&ctx, &ctx.user1, 1000 * UNIT);

    assert_eq!(
        ctx.client.try_open_position(&ctx.user1, &99u32, &(500 * UNIT)),
        Err(Ok(Error::PlanNotFound))
    );
    assert_eq!(
        ctx.client.try_open_position(&ctx.user1, &plan_id, &(50 * UNIT)),
        Err(Ok(Error::BelowPlanMinimum))
    );
    assert_eq!(
        ctx.client
            .try_open_position(&ctx.user1, &plan_id, &(20_000 * UNIT)),
        Err(Ok(Error::AbovePlanMaximum))
    );
    // bounds allow it, balance does not
    assert_eq!(
        ctx.client
            .try_open_position(&ctx.user1, &plan_id, &(2000 * UNIT)),
        Err(Ok(Error::InsufficientBalance))
    );
}

// ─── Settlement ─────────────────────────────────────────────────

#[test]
fn test_settlement_catch_up_to_maturity() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);
    fund(&ctx, &ctx.user1, 1000 * UNIT);
    ctx.client.open_position(&ctx.user1, &plan_id, &(1000 * UNIT));
    assert_eq!(ctx.client.balance_of(&ctx.user1), 0);

    // 185s covers the periods due at +60, +120 and +180 but never a 4th
    advance_time(&ctx, 185);
    assert_eq!(ctx.client.run_settlement(), 3);

    assert_eq!(ctx.client.balance_of(&ctx.user1), 30 * UNIT);

    let position = ctx.client.get_position(&1u64);
    assert_eq!(position.periods_settled, 3);
    assert_eq!(position.yield_paid, 30 * UNIT);
    assert_eq!(position.status, PositionStatus::Completed);

    // Newest first: periods 3, 2, 1, then the funding contribution
    let entries = ctx.client.entries_of(&ctx.user1);
    assert_eq!(entries.len(), 4);
    for (i, period) in [3u32, 2, 1].iter().enumerate() {
        let entry = entries.get_unchecked(i as u32);
        assert_eq!(entry.kind, EntryKind::Accrual);
        assert_eq!(entry.status, EntryStatus::Settled);
        assert_eq!(entry.amount, 10 * UNIT);
        assert_eq!(entry.plan_id, Some(plan_id));
        assert_eq!(entry.period, Some(*period));
    }

    let stats = ctx.client.get_stats();
    assert_eq!(stats.total_accrued, 30 * UNIT);
    assert_eq!(stats.open_positions, 0);
    assert_eq!(stats.completed_positions, 1);

    // No accrual past maturity, however far the clock runs
    advance_time(&ctx, 10_000);
    assert_eq!(ctx.client.run_settlement(), 0);
    assert_eq!(ctx.client.entries_of(&ctx.user1).len(), 4);
    assert_eq!(ctx.client.balance_of(&ctx.user1), 30 * UNIT);
}

#[test]
fn test_settlement_idempotent_with_unchanged_clock() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);
    fund(&ctx, &ctx.user1, 1000 * UNIT);
    ctx.client.open_position(&ctx.user1, &plan_id, &(1000 * UNIT));

    advance_time(&ctx, 60);
    assert_eq!(ctx.client.run_settlement(), 1);
    let balance = ctx.client.balance_of(&ctx.user1);
    let entries = ctx.client.entries_of(&ctx.user1).len();

    // Same clock: strict no-op
    assert_eq!(ctx.client.run_settlement(), 0);
    assert_eq!(ctx.client.balance_of(&ctx.user1), balance);
    assert_eq!(ctx.client.entries_of(&ctx.user1).len(), entries);
    assert_eq!(ctx.client.get_position(&1u64).periods_settled, 1);
}

#[test]
fn test_settlement_period_by_period() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);
    fund(&ctx, &ctx.user1, 1000 * UNIT);
    ctx.client.open_position(&ctx.user1, &plan_id, &(1000 * UNIT));

    advance_time(&ctx, 61);
    assert_eq!(ctx.client.run_settlement(), 1);
    assert_eq!(ctx.client.balance_of(&ctx.user1), 10 * UNIT);

    advance_time(&ctx, 60);
    assert_eq!(ctx.client.run_settlement(), 1);
    assert_eq!(ctx.client.balance_of(&ctx.user1), 20 * UNIT);
    assert_eq!(ctx.client.get_position(&1u64).periods_settled, 2);
    assert_eq!(
        ctx.client.get_position(&1u64).status,
        PositionStatus::Active
    );
}

#[test]
fn test_settlement_skips_orphaned_position() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);
    fund(&ctx, &ctx.user1, 1000 * UNIT);
    fund(&ctx, &ctx.user2, 1000 * UNIT);

    ctx.client.open_position(&ctx.user1, &plan_id, &(1000 * UNIT));

    // Orphan user1's position, then give user2 a live plan to settle on
    ctx.client.remove_plan(&plan_id);
    let plan2 = ctx.client.create_plan(
        &String::from_str(&ctx.env, "Starter"),
        &100u32,
        &60u64,
        &3u32,
        &(100 * UNIT),
        &(10_000 * UNIT),
    );
    assert_eq!(plan2, 2);
    ctx.client.open_position(&ctx.user2, &plan2, &(1000 * UNIT));

    advance_time(&ctx, 185);
    // The orphan is skipped, the live position settles, the pass never faults
    assert_eq!(ctx.client.run_settlement(), 3);
    assert_eq!(ctx.client.balance_of(&ctx.user1), 0);
    assert_eq!(ctx.client.balance_of(&ctx.user2), 30 * UNIT);

    let orphan = ctx.client.get_position(&1u64);
    assert_eq!(orphan.periods_settled, 0);
    assert_eq!(orphan.status, PositionStatus::Active);

    // Still skipped on the next pass
    advance_time(&ctx, 60);
    assert_eq!(ctx.client.run_settlement(), 0);
    assert_eq!(ctx.client.get_position(&1u64).periods_settled, 0);
}

#[test]
fn test_plan_edit_does_not_touch_open_positions() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);
    fund(&ctx, &ctx.user1, 2000 * UNIT);
    ctx.client.open_position(&ctx.user1, &plan_id, &(1000 * UNIT));

    // Crank the live plan to 50% per 10s
    ctx.client.update_plan(&Plan {
        id: plan_id,
        name: String::from_str(&ctx.env, "Starter"),
        rate_bps: 5000,
        period_secs: 10,
        total_periods: 3,
        min_amount: 100 * UNIT,
        max_amount: 10_000 * UNIT,
    });

    // The open position still pays 1% on its original 60s schedule
    advance_time(&ctx, 60);
    assert_eq!(ctx.client.run_settlement(), 1);
    assert_eq!(ctx.client.balance_of(&ctx.user1), 1000 * UNIT + 10 * UNIT);

    // A position opened after the edit gets the new terms
    let position_id = ctx.client.open_position(&ctx.user1, &plan_id, &(100 * UNIT));
    let position = ctx.client.get_position(&position_id);
    assert_eq!(position.rate_bps, 5000);
    assert_eq!(position.period_secs, 10);
}

// ─── Withdrawals ────────────────────────────────────────────────

#[test]
fn test_withdrawal_approved_pays_out() {
    let ctx = setup();
    let token = TokenClient::new(&ctx.env, &ctx.token);
    fund(&ctx, &ctx.user1, 1000 * UNIT);
    let before = token.balance(&ctx.user1);

    let entry_id = ctx.client.request_withdrawal(&ctx.user1, &(400 * UNIT));
    assert_eq!(ctx.client.balance_of(&ctx.user1), 600 * UNIT);

    ctx.client.approve_entry(&entry_id);
    assert_eq!(ctx.client.balance_of(&ctx.user1), 600 * UNIT);
    assert_eq!(token.balance(&ctx.user1), before + 400 * UNIT);

    let account = ctx.client.get_account(&ctx.user1);
    assert_eq!(account.total_withdrawn, 400 * UNIT);
    assert_eq!(ctx.client.get_stats().total_withdrawn, 400 * UNIT);
}

#[test]
fn test_withdrawal_reject_releases_hold() {
    let ctx = setup();
    fund(&ctx, &ctx.user1, 1000 * UNIT);

    let entry_id = ctx.client.request_withdrawal(&ctx.user1, &(300 * UNIT));
    assert_eq!(ctx.client.balance_of(&ctx.user1), 700 * UNIT);

    ctx.client.reject_entry(&entry_id);
    assert_eq!(ctx.client.balance_of(&ctx.user1), 1000 * UNIT);
    assert_eq!(ctx.client.get_account(&ctx.user1).total_withdrawn, 0);
}

#[test]
fn test_overdrawn_withdrawal_leaves_no_trace() {
    let ctx = setup();
    fund(&ctx, &ctx.user1, 100 * UNIT);

    assert_eq!(
        ctx.client.try_request_withdrawal(&ctx.user1, &(200 * UNIT)),
        Err(Ok(Error::InsufficientBalance))
    );

    // Fail-fast: no ledger entry, no hold
    assert_eq!(ctx.client.entries_of(&ctx.user1).len(), 1);
    assert_eq!(ctx.client.balance_of(&ctx.user1), 100 * UNIT);
    assert_eq!(ctx.client.pending_entries().len(), 0);
}

// ─── Balance projection ─────────────────────────────────────────

#[test]
fn test_balance_reconstructable_from_ledger() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);

    let check = |expected: i128| {
        assert_eq!(ctx.client.balance_of(&ctx.user1), expected);
        assert_eq!(ctx.client.reconstructed_balance(&ctx.user1), expected);
    };

    fund(&ctx, &ctx.user1, 1000 * UNIT);
    check(1000 * UNIT);

    ctx.client.open_position(&ctx.user1, &plan_id, &(500 * UNIT));
    check(500 * UNIT);

    // Two periods at 1% of 500
    advance_time(&ctx, 125);
    assert_eq!(ctx.client.run_settlement(), 2);
    check(510 * UNIT);

    let wd = ctx.client.request_withdrawal(&ctx.user1, &(200 * UNIT));
    check(310 * UNIT);

    ctx.client.approve_entry(&wd);
    check(310 * UNIT);

    let wd2 = ctx.client.request_withdrawal(&ctx.user1, &(50 * UNIT));
    check(260 * UNIT);

    ctx.client.reject_entry(&wd2);
    check(310 * UNIT);

    // A pending deposit stays invisible to both sides of the equation
    ctx.client.deposit(&ctx.user1, &(100 * UNIT));
    check(310 * UNIT);
}

// ─── Operational controls ───────────────────────────────────────

#[test]
fn test_blocked_account_cannot_transact() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);
    fund(&ctx, &ctx.user1, 1000 * UNIT);

    ctx.client.set_blocked(&ctx.user1, &true);

    assert_eq!(
        ctx.client.try_deposit(&ctx.user1, &(100 * UNIT)),
        Err(Ok(Error::AccountBlocked))
    );
    assert_eq!(
        ctx.client.try_request_withdrawal(&ctx.user1, &(100 * UNIT)),
        Err(Ok(Error::AccountBlocked))
    );
    assert_eq!(
        ctx.client.try_open_position(&ctx.user1, &plan_id, &(500 * UNIT)),
        Err(Ok(Error::AccountBlocked))
    );

    ctx.client.set_blocked(&ctx.user1, &false);
    ctx.client.open_position(&ctx.user1, &plan_id, &(500 * UNIT));
}

#[test]
fn test_pause_suspends_then_settlement_catches_up() {
    let ctx = setup();
    let plan_id = create_test_plan(&ctx);
    fund(&ctx, &ctx.user1, 1000 * UNIT);
    ctx.client.open_position(&ctx.user1, &plan_id, &(1000 * UNIT));

    ctx.client.pause();
    assert!(ctx.client.is_paused());

    assert_eq!(
        ctx.client.try_deposit(&ctx.user1, &(100 * UNIT)),
        Err(Ok(Error::ContractPaused))
    );
    assert_eq!(
        ctx.client.try_run_settlement(),
        Err(Ok(Error::ContractPaused))
    );

    // The whole schedule elapses under pause
    advance_time(&ctx, 185);

    ctx.client.unpause();
    assert_eq!(ctx.client.run_settlement(), 3);
    assert_eq!(ctx.client.balance_of(&ctx.user1), 30 * UNIT);
}

#[test]
fn test_fund_reserve_covers_yield_payouts() {
    let ctx = setup();
    let token = TokenClient::new(&ctx.env, &ctx.token);
    let plan_id = create_test_plan(&ctx);

    fund(&ctx, &ctx.user1, 1000 * UNIT);
    ctx.client.open_position(&ctx.user1, &plan_id, &(1000 * UNIT));
    advance_time(&ctx, 185);
    ctx.client.run_settlement();

    // Yield is a platform liability; admin tops up the reserve
    ctx.client.fund_reserve(&(30 * UNIT));
    assert_eq!(token.balance(&ctx.vault_id), 1030 * UNIT);

    let wd = ctx.client.request_withdrawal(&ctx.user1, &(30 * UNIT));
    ctx.client.approve_entry(&wd);
    assert_eq!(token.balance(&ctx.vault_id), 1000 * UNIT);
}
