use crate::error::Error;
use crate::storage::Storage;
use crate::types::Plan;
use soroban_sdk::{Address, Env};

pub struct Validator;

impl Validator {
    pub fn validate_plan_params(
        period_secs: u64,
        total_periods: u32,
        min_amount: i128,
        max_amount: i128,
    ) -> Result<(), Error> {
        if period_secs == 0 {
            return Err(Error::InvalidPeriod);
        }

        if total_periods == 0 {
            return Err(Error::InvalidDuration);
        }

        if min_amount <= 0 || min_amount > max_amount {
            return Err(Error::InvalidBounds);
        }

        Ok(())
    }

    /// Principal must land inside the plan's contribution bounds.
    pub fn validate_contribution(plan: &Plan, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        if amount < plan.min_amount {
            return Err(Error::BelowPlanMinimum);
        }

        if amount > plan.max_amount {
            return Err(Error::AbovePlanMaximum);
        }

        Ok(())
    }

    pub fn check_not_paused(env: &Env) -> Result<(), Error> {
        if Storage::is_paused(env) {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    pub fn check_not_blocked(env: &Env, user: &Address) -> Result<(), Error> {
        if let Some(account) = Storage::get_account(env, user) {
            if account.blocked {
                return Err(Error::AccountBlocked);
            }
        }
        Ok(())
    }

    pub fn check_positive(amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        Ok(())
    }
}
