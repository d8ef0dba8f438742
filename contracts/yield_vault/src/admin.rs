use crate::error::Error;
use crate::events::{
    AccountBlockedEvent, EntryRejectedEvent, EntrySettledEvent, PlanCreatedEvent, PlanRemovedEvent,
    PlanUpdatedEvent,
};
use crate::storage::Storage;
use crate::types::{EntryKind, EntryStatus, Plan};
use crate::validation::Validator;
use soroban_sdk::{token, Address, Env, String, Symbol};

pub struct Admin;

impl Admin {
    /// One-time setup: store the admin and the stablecoin the vault holds.
    pub fn initialize(env: &Env, admin: &Address, token: &Address) -> Result<(), Error> {
        if Storage::has_admin(env) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        Storage::set_admin(env, admin);
        Storage::set_token(env, token);
        Storage::set_paused(env, false);

        Ok(())
    }

    /// Pause user operations and settlement (emergency)
    pub fn pause(env: &Env) -> Result<(), Error> {
        Self::require_admin(env)?;
        Storage::set_paused(env, true);
        Ok(())
    }

    /// Resume user operations and settlement. Settlement catches up on
    /// everything that came due while paused.
    pub fn unpause(env: &Env) -> Result<(), Error> {
        Self::require_admin(env)?;
        Storage::set_paused(env, false);
        Ok(())
    }

    pub fn create_plan(
        env: &Env,
        name: String,
        rate_bps: u32,
        period_secs: u64,
        total_periods: u32,
        min_amount: i128,
        max_amount: i128,
    ) -> Result<u32, Error> {
        Self::require_admin(env)?;

        Validator::validate_plan_params(period_secs, total_periods, min_amount, max_amount)?;

        let plan_id = Storage::next_plan_id(env);
        let plan = Plan {
            id: plan_id,
            name,
            rate_bps,
            period_secs,
            total_periods,
            min_amount,
            max_amount,
        };

        Storage::set_plan(env, &plan);
        Storage::add_plan_id(env, plan_id);

        env.events().publish(
            (Symbol::new(env, "plan_new"), plan_id),
            PlanCreatedEvent {
                plan_id,
                rate_bps,
                period_secs,
                total_periods,
                min_amount,
                max_amount,
            },
        );

        Ok(plan_id)
    }

    /// Replace a plan's terms. Open positions keep the terms they
    /// snapshotted at creation; only future positions see the edit.
    pub fn update_plan(env: &Env, plan: Plan) -> Result<(), Error> {
        Self::require_admin(env)?;

        if !Storage::has_plan(env, plan.id) {
            return Err(Error::PlanNotFound);
        }

        Validator::validate_plan_params(
            plan.period_secs,
            plan.total_periods,
            plan.min_amount,
            plan.max_amount,
        )?;

        Storage::set_plan(env, &plan);

        env.events().publish(
            (Symbol::new(env, "plan_upd"), plan.id),
            PlanUpdatedEvent {
                plan_id: plan.id,
                rate_bps: plan.rate_bps,
                period_secs: plan.period_secs,
                total_periods: plan.total_periods,
            },
        );

        Ok(())
    }

    /// Remove a plan from the catalog. Positions still referencing it are
    /// skipped by settlement as a data-integrity fault from then on.
    pub fn remove_plan(env: &Env, plan_id: u32) -> Result<(), Error> {
        Self::require_admin(env)?;

        if !Storage::has_plan(env, plan_id) {
            return Err(Error::PlanNotFound);
        }

        Storage::remove_plan(env, plan_id);

        env.events().publish(
            (Symbol::new(env, "plan_del"), plan_id),
            PlanRemovedEvent { plan_id },
        );

        Ok(())
    }

    /// Settle a pending entry: credit a contribution's balance, or pay a
    /// withdrawal out of the vault's token reserve.
    pub fn approve_entry(env: &Env, entry_id: u64) -> Result<(), Error> {
        Self::require_admin(env)?;

        let mut entry = Storage::get_entry(env, entry_id).ok_or(Error::EntryNotFound)?;
        if entry.status != EntryStatus::Pending {
            return Err(Error::EntryNotPending);
        }

        let mut account = Storage::get_account_or_new(env, &entry.user);
        let mut stats = Storage::get_stats(env);

        match entry.kind {
            EntryKind::Contribution => {
                account.balance += entry.amount;
                account.total_contributed += entry.amount;
                stats.total_contributed += entry.amount;
            }
            EntryKind::Withdrawal => {
                // Held back at request time; pay out the tokens now
                account.total_withdrawn += entry.amount;
                stats.total_withdrawn += entry.amount;

                let token = Storage::get_token(env).ok_or(Error::NotInitialized)?;
                let token_client = token::Client::new(env, &token);
                token_client.transfer(&env.current_contract_address(), &entry.user, &entry.amount);
            }
            // Accruals settle inside the settlement pass, never via the queue
            EntryKind::Accrual => return Err(Error::EntryNotPending),
        }

        Storage::set_account(env, &entry.user, &account);
        Storage::set_stats(env, &stats);

        entry.status = EntryStatus::Settled;
        Storage::set_entry(env, &entry);
        Storage::remove_pending_entry(env, entry_id);

        env.events().publish(
            (Symbol::new(env, "ent_ok"), entry_id),
            EntrySettledEvent {
                entry_id,
                user: entry.user.clone(),
                amount: entry.amount,
            },
        );

        Ok(())
    }

    /// Decline a pending entry. A rejected withdrawal releases its hold
    /// back to the balance; a rejected contribution returns the escrowed
    /// tokens to the user.
    pub fn reject_entry(env: &Env, entry_id: u64) -> Result<(), Error> {
        Self::require_admin(env)?;

        let mut entry = Storage::get_entry(env, entry_id).ok_or(Error::EntryNotFound)?;
        if entry.status != EntryStatus::Pending {
            return Err(Error::EntryNotPending);
        }

        match entry.kind {
            EntryKind::Contribution => {
                let token = Storage::get_token(env).ok_or(Error::NotInitialized)?;
                let token_client = token::Client::new(env, &token);
                token_client.transfer(&env.current_contract_address(), &entry.user, &entry.amount);
            }
            EntryKind::Withdrawal => {
                let mut account = Storage::get_account_or_new(env, &entry.user);
                account.balance += entry.amount;
                Storage::set_account(env, &entry.user, &account);
            }
            EntryKind::Accrual => return Err(Error::EntryNotPending),
        }

        entry.status = EntryStatus::Rejected;
        Storage::set_entry(env, &entry);
        Storage::remove_pending_entry(env, entry_id);

        env.events().publish(
            (Symbol::new(env, "ent_rej"), entry_id),
            EntryRejectedEvent {
                entry_id,
                user: entry.user.clone(),
                amount: entry.amount,
            },
        );

        Ok(())
    }

    /// Block or unblock an account from transacting
    pub fn set_blocked(env: &Env, user: &Address, blocked: bool) -> Result<(), Error> {
        Self::require_admin(env)?;

        let mut account = Storage::get_account_or_new(env, user);
        account.blocked = blocked;
        Storage::set_account(env, user, &account);

        env.events().publish(
            (Symbol::new(env, "blocked"), user.clone()),
            AccountBlockedEvent {
                user: user.clone(),
                blocked,
            },
        );

        Ok(())
    }

    /// Top up the vault's token reserve that backs accrued yield.
    pub fn fund_reserve(env: &Env, amount: i128) -> Result<(), Error> {
        let admin = Self::require_admin(env)?;
        Validator::check_positive(amount)?;

        let token = Storage::get_token(env).ok_or(Error::NotInitialized)?;
        let token_client = token::Client::new(env, &token);
        token_client.transfer(&admin, &env.current_contract_address(), &amount);

        Ok(())
    }

    fn require_admin(env: &Env) -> Result<Address, Error> {
        let admin = Storage::get_admin(env).ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(admin)
    }
}
