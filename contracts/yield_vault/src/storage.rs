use crate::types::{Account, DataKey, LedgerEntry, Plan, PlatformStats, Position};
use soroban_sdk::{Address, Env, Vec};

const INSTANCE_TTL_THRESHOLD: u32 = 100;
const INSTANCE_TTL_EXTEND: u32 = 500;
const PERSISTENT_TTL_THRESHOLD: u32 = 100;
const PERSISTENT_TTL_EXTEND: u32 = 1000;

pub struct Storage;

impl Storage {
    // Admin / token

    pub fn has_admin(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Admin)
    }

    pub fn get_admin(env: &Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Admin)
    }

    pub fn set_admin(env: &Env, admin: &Address) {
        env.storage().instance().set(&DataKey::Admin, admin);
        Self::extend_instance_ttl(env);
    }

    pub fn get_token(env: &Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Token)
    }

    pub fn set_token(env: &Env, token: &Address) {
        env.storage().instance().set(&DataKey::Token, token);
    }

    // Pause flag

    pub fn is_paused(env: &Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Paused)
            .unwrap_or(false)
    }

    pub fn set_paused(env: &Env, paused: bool) {
        env.storage().instance().set(&DataKey::Paused, &paused);
    }

    // Id counters, 1-based

    pub fn next_plan_id(env: &Env) -> u32 {
        let id: u32 = env
            .storage()
            .instance()
            .get(&DataKey::NextPlanId)
            .unwrap_or(0)
            + 1;
        env.storage().instance().set(&DataKey::NextPlanId, &id);
        id
    }

    pub fn next_position_id(env: &Env) -> u64 {
        let id: u64 = env
            .storage()
            .instance()
            .get(&DataKey::NextPositionId)
            .unwrap_or(0)
            + 1;
        env.storage().instance().set(&DataKey::NextPositionId, &id);
        id
    }

    pub fn next_entry_id(env: &Env) -> u64 {
        let id: u64 = env
            .storage()
            .instance()
            .get(&DataKey::NextEntryId)
            .unwrap_or(0)
            + 1;
        env.storage().instance().set(&DataKey::NextEntryId, &id);
        id
    }

    // Plans

    pub fn get_plan(env: &Env, plan_id: u32) -> Option<Plan> {
        let key = DataKey::Plan(plan_id);
        let result = env.storage().persistent().get(&key);
        if result.is_some() {
            Self::extend_persistent_ttl(env, &key);
        }
        result
    }

    pub fn set_plan(env: &Env, plan: &Plan) {
        let key = DataKey::Plan(plan.id);
        env.storage().persistent().set(&key, plan);
        Self::extend_persistent_ttl(env, &key);
    }

    pub fn has_plan(env: &Env, plan_id: u32) -> bool {
        env.storage().persistent().has(&DataKey::Plan(plan_id))
    }

    pub fn remove_plan(env: &Env, plan_id: u32) {
        env.storage().persistent().remove(&DataKey::Plan(plan_id));
        let ids = Self::plan_ids(env);
        let mut kept = Vec::new(env);
        for id in ids.iter() {
            if id != plan_id {
                kept.push_back(id);
            }
        }
        env.storage().persistent().set(&DataKey::PlanIds, &kept);
    }

    pub fn plan_ids(env: &Env) -> Vec<u32> {
        env.storage()
            .persistent()
            .get(&DataKey::PlanIds)
            .unwrap_or(Vec::new(env))
    }

    pub fn add_plan_id(env: &Env, plan_id: u32) {
        let mut ids = Self::plan_ids(env);
        ids.push_back(plan_id);
        env.storage().persistent().set(&DataKey::PlanIds, &ids);
        Self::extend_persistent_ttl(env, &DataKey::PlanIds);
    }

    // Positions

    pub fn get_position(env: &Env, position_id: u64) -> Option<Position> {
        let key = DataKey::Position(position_id);
        let result = env.storage().persistent().get(&key);
        if result.is_some() {
            Self::extend_persistent_ttl(env, &key);
        }
        result
    }

    pub fn set_position(env: &Env, position: &Position) {
        let key = DataKey::Position(position.id);
        env.storage().persistent().set(&key, position);
        Self::extend_persistent_ttl(env, &key);
    }

    pub fn active_positions(env: &Env) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::ActivePositions)
            .unwrap_or(Vec::new(env))
    }

    pub fn set_active_positions(env: &Env, ids: &Vec<u64>) {
        env.storage()
            .persistent()
            .set(&DataKey::ActivePositions, ids);
        Self::extend_persistent_ttl(env, &DataKey::ActivePositions);
    }

    pub fn add_active_position(env: &Env, position_id: u64) {
        let mut ids = Self::active_positions(env);
        ids.push_back(position_id);
        Self::set_active_positions(env, &ids);
    }

    pub fn user_positions(env: &Env, user: &Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::UserPositions(user.clone()))
            .unwrap_or(Vec::new(env))
    }

    pub fn add_user_position(env: &Env, user: &Address, position_id: u64) {
        let key = DataKey::UserPositions(user.clone());
        let mut ids = Self::user_positions(env, user);
        ids.push_back(position_id);
        env.storage().persistent().set(&key, &ids);
        Self::extend_persistent_ttl(env, &key);
    }

    // Accounts

    pub fn get_account(env: &Env, user: &Address) -> Option<Account> {
        let key = DataKey::Account(user.clone());
        let result = env.storage().persistent().get(&key);
        if result.is_some() {
            Self::extend_persistent_ttl(env, &key);
        }
        result
    }

    /// Fetch the account, creating a zero-balance record on first use.
    pub fn get_account_or_new(env: &Env, user: &Address) -> Account {
        Self::get_account(env, user).unwrap_or(Account {
            balance: 0,
            total_contributed: 0,
            total_invested: 0,
            total_withdrawn: 0,
            blocked: false,
            created_at: env.ledger().timestamp(),
        })
    }

    pub fn set_account(env: &Env, user: &Address, account: &Account) {
        let key = DataKey::Account(user.clone());
        env.storage().persistent().set(&key, account);
        Self::extend_persistent_ttl(env, &key);
    }

    // Ledger entries

    pub fn get_entry(env: &Env, entry_id: u64) -> Option<LedgerEntry> {
        let key = DataKey::Entry(entry_id);
        let result = env.storage().persistent().get(&key);
        if result.is_some() {
            Self::extend_persistent_ttl(env, &key);
        }
        result
    }

    pub fn set_entry(env: &Env, entry: &LedgerEntry) {
        let key = DataKey::Entry(entry.id);
        env.storage().persistent().set(&key, entry);
        Self::extend_persistent_ttl(env, &key);
    }

    pub fn user_entries(env: &Env, user: &Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::UserEntries(user.clone()))
            .unwrap_or(Vec::new(env))
    }

    pub fn add_user_entry(env: &Env, user: &Address, entry_id: u64) {
        let key = DataKey::UserEntries(user.clone());
        let mut ids = Self::user_entries(env, user);
        ids.push_back(entry_id);
        env.storage().persistent().set(&key, &ids);
        Self::extend_persistent_ttl(env, &key);
    }

    pub fn pending_entries(env: &Env) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::PendingEntries)
            .unwrap_or(Vec::new(env))
    }

    pub fn add_pending_entry(env: &Env, entry_id: u64) {
        let mut ids = Self::pending_entries(env);
        ids.push_back(entry_id);
        env.storage()
            .persistent()
            .set(&DataKey::PendingEntries, &ids);
        Self::extend_persistent_ttl(env, &DataKey::PendingEntries);
    }

    pub fn remove_pending_entry(env: &Env, entry_id: u64) {
        let ids = Self::pending_entries(env);
        let mut kept = Vec::new(env);
        for id in ids.iter() {
            if id != entry_id {
                kept.push_back(id);
            }
        }
        env.storage()
            .persistent()
            .set(&DataKey::PendingEntries, &kept);
    }

    // Stats

    pub fn get_stats(env: &Env) -> PlatformStats {
        env.storage()
            .instance()
            .get(&DataKey::Stats)
            .unwrap_or(PlatformStats {
                total_contributed: 0,
                total_invested: 0,
                total_accrued: 0,
                total_withdrawn: 0,
                open_positions: 0,
                completed_positions: 0,
            })
    }

    pub fn set_stats(env: &Env, stats: &PlatformStats) {
        env.storage().instance().set(&DataKey::Stats, stats);
        Self::extend_instance_ttl(env);
    }

    // TTL management

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
    }

    fn extend_persistent_ttl(env: &Env, key: &DataKey) {
        env.storage()
            .persistent()
            .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
    }
}
