use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct PlanCreatedEvent {
    pub plan_id: u32,
    pub rate_bps: u32,
    pub period_secs: u64,
    pub total_periods: u32,
    pub min_amount: i128,
    pub max_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PlanUpdatedEvent {
    pub plan_id: u32,
    pub rate_bps: u32,
    pub period_secs: u64,
    pub total_periods: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PlanRemovedEvent {
    pub plan_id: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct DepositRequestedEvent {
    pub entry_id: u64,
    pub user: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WithdrawalRequestedEvent {
    pub entry_id: u64,
    pub user: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct EntrySettledEvent {
    pub entry_id: u64,
    pub user: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct EntryRejectedEvent {
    pub entry_id: u64,
    pub user: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PositionOpenedEvent {
    pub position_id: u64,
    pub user: Address,
    pub plan_id: u32,
    pub principal: i128,
    pub next_due: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct AccrualEvent {
    pub position_id: u64,
    pub user: Address,
    pub plan_id: u32,
    pub period: u32,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PositionCompletedEvent {
    pub position_id: u64,
    pub user: Address,
    pub yield_paid: i128,
}

/// Data-integrity fault: a position was left out of a settlement pass.
/// Surfaced for operators; the pass itself continues.
#[contracttype]
#[derive(Clone, Debug)]
pub struct PositionSkippedEvent {
    pub position_id: u64,
    pub plan_id: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct AccountBlockedEvent {
    pub user: Address,
    pub blocked: bool,
}
