use crate::error::Error;
use crate::events::{AccrualEvent, PositionCompletedEvent, PositionSkippedEvent};
use crate::ledger::Ledger;
use crate::storage::Storage;
use crate::types::{EntryKind, EntryStatus, Position, PositionStatus, BPS_DENOM};
use crate::validation::Validator;
use soroban_sdk::{Address, Env, Map, Symbol, Vec};

/// Yield for one period: principal × rate_bps / 10_000.
///
/// Simple interest on the original principal, never on the running
/// balance. `None` on i128 overflow.
pub fn accrual_amount(principal: i128, rate_bps: u32) -> Option<i128> {
    principal
        .checked_mul(rate_bps as i128)?
        .checked_div(BPS_DENOM)
}

/// Everything one settlement pass owes a single position at time `now`.
pub struct DueSettlement {
    /// Number of periods to settle in this pass
    pub periods: u32,
    /// Yield per period (constant, non-compounding)
    pub amount_per_period: i128,
    /// Sum credited across all settled periods
    pub yield_total: i128,
    /// Position's next_due after the pass
    pub next_due: u64,
    /// True when the last plan period has been settled
    pub completed: bool,
}

/// Walk the position's schedule up to `now`, one period at a time.
///
/// The catch-up while loop is the only guard against double-crediting:
/// `next_due` advances serially, so a pass with an unchanged clock owes
/// nothing, and a pass after a long suspension owes every missed period
/// up to (never past) the plan's maturity. `None` on overflow.
pub fn settle_due(position: &Position, now: u64) -> Option<DueSettlement> {
    let amount_per_period = accrual_amount(position.principal, position.rate_bps)?;

    let mut periods_settled = position.periods_settled;
    let mut next_due = position.next_due;
    let mut yield_total: i128 = 0;
    let mut periods: u32 = 0;

    while now >= next_due && periods_settled < position.total_periods {
        yield_total = yield_total.checked_add(amount_per_period)?;
        periods_settled += 1;
        periods += 1;
        next_due += position.period_secs;
    }

    Some(DueSettlement {
        periods,
        amount_per_period,
        yield_total,
        next_due,
        completed: periods_settled == position.total_periods,
    })
}

pub struct Settlement;

impl Settlement {
    /// One settlement pass over every active position.
    ///
    /// Settles all elapsed periods per position, appends one Settled
    /// accrual entry per period, and applies each user's credit once at
    /// the end of the pass. Positions whose plan is gone, or whose
    /// arithmetic would overflow, are skipped with an event and the pass
    /// continues. Returns the number of periods settled.
    pub fn run(env: &Env) -> Result<u32, Error> {
        Validator::check_not_paused(env)?;

        let now = env.ledger().timestamp();
        let active = Storage::active_positions(env);
        let mut retained: Vec<u64> = Vec::new(env);
        let mut credits: Map<Address, i128> = Map::new(env);
        let mut total_periods: u32 = 0;
        let mut total_yield: i128 = 0;
        let mut completed_count: u32 = 0;

        for position_id in active.iter() {
            // Dangling ids in the work list are dropped, not fatal
            let mut position = match Storage::get_position(env, position_id) {
                Some(position) => position,
                None => continue,
            };

            if position.status != PositionStatus::Active {
                continue;
            }

            // Data-integrity fault: plan was removed under the position.
            // Skip it, surface it, keep processing the rest.
            if !Storage::has_plan(env, position.plan_id) {
                Self::publish_skip(env, &position);
                retained.push_back(position_id);
                continue;
            }

            let due = match settle_due(&position, now) {
                Some(due) => due,
                None => {
                    Self::publish_skip(env, &position);
                    retained.push_back(position_id);
                    continue;
                }
            };

            if due.periods == 0 {
                retained.push_back(position_id);
                continue;
            }

            for i in 0..due.periods {
                let period = position.periods_settled + 1 + i;
                Ledger::append(
                    env,
                    &position.owner,
                    due.amount_per_period,
                    EntryKind::Accrual,
                    EntryStatus::Settled,
                    Some(position.plan_id),
                    Some(period),
                );

                env.events().publish(
                    (Symbol::new(env, "accrual"), position_id),
                    AccrualEvent {
                        position_id,
                        user: position.owner.clone(),
                        plan_id: position.plan_id,
                        period,
                        amount: due.amount_per_period,
                    },
                );
            }

            position.periods_settled += due.periods;
            position.yield_paid += due.yield_total;
            position.next_due = due.next_due;

            let owed = credits.get(position.owner.clone()).unwrap_or(0);
            credits.set(position.owner.clone(), owed + due.yield_total);

            total_periods += due.periods;
            total_yield += due.yield_total;

            if due.completed {
                position.status = PositionStatus::Completed;
                completed_count += 1;

                env.events().publish(
                    (Symbol::new(env, "pos_done"), position_id),
                    PositionCompletedEvent {
                        position_id,
                        user: position.owner.clone(),
                        yield_paid: position.yield_paid,
                    },
                );
            } else {
                retained.push_back(position_id);
            }

            Storage::set_position(env, &position);
        }

        // Batch balance credits, one write per user per pass
        for (user, amount) in credits.iter() {
            let mut account = Storage::get_account_or_new(env, &user);
            account.balance += amount;
            Storage::set_account(env, &user, &account);
        }

        if total_periods > 0 || retained.len() != active.len() {
            Storage::set_active_positions(env, &retained);
        }

        if total_periods > 0 {
            let mut stats = Storage::get_stats(env);
            stats.total_accrued += total_yield;
            stats.open_positions -= completed_count;
            stats.completed_positions += completed_count;
            Storage::set_stats(env, &stats);
        }

        Ok(total_periods)
    }

    fn publish_skip(env: &Env, position: &Position) {
        env.events().publish(
            (Symbol::new(env, "pos_skip"), position.id),
            PositionSkippedEvent {
                position_id: position.id,
                plan_id: position.plan_id,
            },
        );
    }
}
