use crate::error::Error;
use crate::events::{DepositRequestedEvent, PositionOpenedEvent, WithdrawalRequestedEvent};
use crate::ledger::Ledger;
use crate::storage::Storage;
use crate::types::{EntryKind, EntryStatus, Position, PositionStatus};
use crate::validation::Validator;
use soroban_sdk::{token, Address, Env, Symbol, Vec};

pub struct UserOps;

impl UserOps {
    /// Deposit stablecoin into the vault. Tokens are escrowed immediately;
    /// the balance is credited only once an admin settles the entry.
    pub fn deposit(env: &Env, user: &Address, amount: i128) -> Result<u64, Error> {
        user.require_auth();

        Validator::check_not_paused(env)?;
        Validator::check_not_blocked(env, user)?;
        Validator::check_positive(amount)?;

        let token = Storage::get_token(env).ok_or(Error::NotInitialized)?;
        let token_client = token::Client::new(env, &token);
        token_client.transfer(user, &env.current_contract_address(), &amount);

        // Materialize the account on first contact
        let account = Storage::get_account_or_new(env, user);
        Storage::set_account(env, user, &account);

        let entry_id = Ledger::append(
            env,
            user,
            amount,
            EntryKind::Contribution,
            EntryStatus::Pending,
            None,
            None,
        );

        env.events().publish(
            (Symbol::new(env, "dep_req"), user.clone()),
            DepositRequestedEvent {
                entry_id,
                user: user.clone(),
                amount,
            },
        );

        Ok(entry_id)
    }

    /// Request a withdrawal. Fails fast when the spendable balance is too
    /// low, before any ledger entry exists; otherwise the amount is held
    /// back from the balance until an admin decides the entry.
    pub fn request_withdrawal(env: &Env, user: &Address, amount: i128) -> Result<u64, Error> {
        user.require_auth();

        Validator::check_not_paused(env)?;
        Validator::check_not_blocked(env, user)?;
        Validator::check_positive(amount)?;

        let mut account = Storage::get_account_or_new(env, user);
        if account.balance < amount {
            return Err(Error::InsufficientBalance);
        }

        account.balance -= amount;
        Storage::set_account(env, user, &account);

        let entry_id = Ledger::append(
            env,
            user,
            amount,
            EntryKind::Withdrawal,
            EntryStatus::Pending,
            None,
            None,
        );

        env.events().publish(
            (Symbol::new(env, "wd_req"), user.clone()),
            WithdrawalRequestedEvent {
                entry_id,
                user: user.clone(),
                amount,
            },
        );

        Ok(entry_id)
    }

    /// Commit principal to a plan. The principal is debited atomically
    /// with position creation, and the plan's rate/duration terms are
    /// snapshotted so later plan edits do not touch this position.
    pub fn open_position(
        env: &Env,
        user: &Address,
        plan_id: u32,
        amount: i128,
    ) -> Result<u64, Error> {
        user.require_auth();

        Validator::check_not_paused(env)?;
        Validator::check_not_blocked(env, user)?;

        let plan = Storage::get_plan(env, plan_id).ok_or(Error::PlanNotFound)?;
        Validator::validate_contribution(&plan, amount)?;

        let mut account = Storage::get_account_or_new(env, user);
        if account.balance < amount {
            return Err(Error::InsufficientBalance);
        }

        account.balance -= amount;
        account.total_invested += amount;
        Storage::set_account(env, user, &account);

        let now = env.ledger().timestamp();
        let position_id = Storage::next_position_id(env);
        let position = Position {
            id: position_id,
            owner: user.clone(),
            plan_id,
            principal: amount,
            rate_bps: plan.rate_bps,
            period_secs: plan.period_secs,
            total_periods: plan.total_periods,
            periods_settled: 0,
            yield_paid: 0,
            opened_at: now,
            next_due: now + plan.period_secs,
            status: PositionStatus::Active,
        };

        Storage::set_position(env, &position);
        Storage::add_user_position(env, user, position_id);
        Storage::add_active_position(env, position_id);

        let mut stats = Storage::get_stats(env);
        stats.total_invested += amount;
        stats.open_positions += 1;
        Storage::set_stats(env, &stats);

        env.events().publish(
            (Symbol::new(env, "pos_open"), position_id, user.clone()),
            PositionOpenedEvent {
                position_id,
                user: user.clone(),
                plan_id,
                principal: amount,
                next_due: position.next_due,
            },
        );

        Ok(position_id)
    }

    // Views

    pub fn balance_of(env: &Env, user: &Address) -> i128 {
        Storage::get_account(env, user).map_or(0, |account| account.balance)
    }

    pub fn get_position(env: &Env, position_id: u64) -> Result<Position, Error> {
        Storage::get_position(env, position_id).ok_or(Error::PositionNotFound)
    }

    pub fn positions_of(env: &Env, user: &Address) -> Vec<Position> {
        let ids = Storage::user_positions(env, user);
        let mut positions = Vec::new(env);
        for id in ids.iter() {
            if let Some(position) = Storage::get_position(env, id) {
                positions.push_back(position);
            }
        }
        positions
    }
}
