#![no_std]

mod admin;
mod error;
mod events;
mod ledger;
mod settlement;
mod storage;
mod types;
mod user_ops;
mod validation;

use admin::Admin;
use ledger::Ledger;
use settlement::Settlement;
use storage::Storage;
use user_ops::UserOps;

pub use error::Error;
pub use types::{
    Account, EntryKind, EntryStatus, LedgerEntry, Plan, PlatformStats, Position, PositionStatus,
};

use soroban_sdk::{contract, contractimpl, Address, Env, String, Vec};

#[contract]
pub struct YieldVault;

#[contractimpl]
impl YieldVault {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the vault with an admin and the stablecoin it holds
    pub fn initialize(env: Env, admin: Address, token: Address) -> Result<(), Error> {
        Admin::initialize(&env, &admin, &token)
    }

    /// Pause user operations and settlement (Admin only)
    pub fn pause(env: Env) -> Result<(), Error> {
        Admin::pause(&env)
    }

    /// Unpause; the next settlement pass catches up (Admin only)
    pub fn unpause(env: Env) -> Result<(), Error> {
        Admin::unpause(&env)
    }

    /// Create an investment plan (Admin only)
    pub fn create_plan(
        env: Env,
        name: String,
        rate_bps: u32,
        period_secs: u64,
        total_periods: u32,
        min_amount: i128,
        max_amount: i128,
    ) -> Result<u32, Error> {
        Admin::create_plan(
            &env,
            name,
            rate_bps,
            period_secs,
            total_periods,
            min_amount,
            max_amount,
        )
    }

    /// Replace a plan's terms; open positions keep their snapshot (Admin only)
    pub fn update_plan(env: Env, plan: Plan) -> Result<(), Error> {
        Admin::update_plan(&env, plan)
    }

    /// Remove a plan from the catalog (Admin only)
    pub fn remove_plan(env: Env, plan_id: u32) -> Result<(), Error> {
        Admin::remove_plan(&env, plan_id)
    }

    /// Settle a pending contribution or withdrawal (Admin only)
    pub fn approve_entry(env: Env, entry_id: u64) -> Result<(), Error> {
        Admin::approve_entry(&env, entry_id)
    }

    /// Reject a pending contribution or withdrawal (Admin only)
    pub fn reject_entry(env: Env, entry_id: u64) -> Result<(), Error> {
        Admin::reject_entry(&env, entry_id)
    }

    /// Block or unblock an account (Admin only)
    pub fn set_blocked(env: Env, user: Address, blocked: bool) -> Result<(), Error> {
        Admin::set_blocked(&env, &user, blocked)
    }

    /// Top up the token reserve backing accrued yield (Admin only)
    pub fn fund_reserve(env: Env, amount: i128) -> Result<(), Error> {
        Admin::fund_reserve(&env, amount)
    }

    // ============================================
    // USER OPERATIONS
    // ============================================

    /// Deposit stablecoin; credited to the balance on admin approval
    pub fn deposit(env: Env, user: Address, amount: i128) -> Result<u64, Error> {
        UserOps::deposit(&env, &user, amount)
    }

    /// Request a withdrawal; the amount is held until an admin decides
    pub fn request_withdrawal(env: Env, user: Address, amount: i128) -> Result<u64, Error> {
        UserOps::request_withdrawal(&env, &user, amount)
    }

    /// Commit principal to a plan, snapshotting its terms
    pub fn open_position(env: Env, user: Address, plan_id: u32, amount: i128) -> Result<u64, Error> {
        UserOps::open_position(&env, &user, plan_id, amount)
    }

    // ============================================
    // SETTLEMENT
    // ============================================

    /// Run one settlement pass over all active positions. Anyone can
    /// call this; catch-up makes the schedule indifferent to who does,
    /// or how late. Returns the number of periods settled.
    pub fn run_settlement(env: Env) -> Result<u32, Error> {
        Settlement::run(&env)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Get a plan by id
    pub fn get_plan(env: Env, plan_id: u32) -> Result<Plan, Error> {
        Storage::get_plan(&env, plan_id).ok_or(Error::PlanNotFound)
    }

    /// All plans currently in the catalog
    pub fn list_plans(env: Env) -> Vec<Plan> {
        let ids = Storage::plan_ids(&env);
        let mut plans = Vec::new(&env);
        for id in ids.iter() {
            if let Some(plan) = Storage::get_plan(&env, id) {
                plans.push_back(plan);
            }
        }
        plans
    }

    /// Spendable balance (the running cache)
    pub fn balance_of(env: Env, user: Address) -> i128 {
        UserOps::balance_of(&env, &user)
    }

    /// Full account record
    pub fn get_account(env: Env, user: Address) -> Account {
        Storage::get_account_or_new(&env, &user)
    }

    /// Get a position by id
    pub fn get_position(env: Env, position_id: u64) -> Result<Position, Error> {
        UserOps::get_position(&env, position_id)
    }

    /// Every position a user has opened, including completed ones
    pub fn positions_of(env: Env, user: Address) -> Vec<Position> {
        UserOps::positions_of(&env, &user)
    }

    /// A user's ledger entries, newest first
    pub fn entries_of(env: Env, user: Address) -> Vec<LedgerEntry> {
        Ledger::entries_of(&env, &user)
    }

    /// Entries awaiting an admin decision, oldest first
    pub fn pending_entries(env: Env) -> Vec<LedgerEntry> {
        Ledger::pending(&env)
    }

    /// The balance recomputed from the ledger fold. Must always equal
    /// `balance_of`; any divergence is a defect.
    pub fn reconstructed_balance(env: Env, user: Address) -> i128 {
        Ledger::reconstruct_balance(&env, &user)
    }

    /// Platform-wide accounting
    pub fn get_stats(env: Env) -> PlatformStats {
        Storage::get_stats(&env)
    }

    /// Whether user operations and settlement are paused
    pub fn is_paused(env: Env) -> bool {
        Storage::is_paused(&env)
    }
}

#[cfg(test)]
mod test;
