use soroban_sdk::{contracttype, Address, String};

// Constants
pub const BPS_DENOM: i128 = 10_000; // rate denominator, 100 bps = 1%

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plan {
    /// Unique plan identifier
    pub id: u32,
    /// Display name
    pub name: String,
    /// Yield per period, in basis points of principal (non-compounding)
    pub rate_bps: u32,
    /// Length of one accrual period in seconds
    pub period_secs: u64,
    /// Number of periods until maturity
    pub total_periods: u32,
    /// Minimum principal per position
    pub min_amount: i128,
    /// Maximum principal per position
    pub max_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PositionStatus {
    /// Accruing yield, has periods left to settle
    Active,
    /// All periods settled, terminal
    Completed,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    /// Unique position identifier
    pub id: u64,
    /// Owning user
    pub owner: Address,
    /// Plan this position was opened against
    pub plan_id: u32,
    /// Principal, fixed at creation
    pub principal: i128,
    /// Terms snapshot taken at creation; plan edits do not float in
    pub rate_bps: u32,
    pub period_secs: u64,
    pub total_periods: u32,
    /// Periods settled so far (monotonic)
    pub periods_settled: u32,
    /// Total yield credited so far (monotonic)
    pub yield_paid: i128,
    /// Creation timestamp
    pub opened_at: u64,
    /// Due time of the next unsettled period; meaningful while Active
    pub next_due: u64,
    pub status: PositionStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// External deposit into the platform
    Contribution,
    /// Payout request out of the platform
    Withdrawal,
    /// One settled period of yield
    Accrual,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EntryStatus {
    /// Awaiting an admin decision
    Pending,
    /// Final, counted by the balance fold
    Settled,
    /// Final, declined by an admin
    Rejected,
}

/// Immutable record of a balance-affecting event. Append-only; the only
/// permitted mutation is the single Pending -> Settled/Rejected transition.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerEntry {
    pub id: u64,
    pub user: Address,
    pub amount: i128,
    pub kind: EntryKind,
    pub status: EntryStatus,
    pub timestamp: u64,
    /// For accruals: the plan the yield came from
    pub plan_id: Option<u32>,
    /// For accruals: 1-based period index within the position
    pub period: Option<u32>,
}

/// Per-user running totals. `balance` is a cache of the ledger fold and
/// must stay reconstructable from entries plus opened positions.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Account {
    pub balance: i128,
    pub total_contributed: i128,
    pub total_invested: i128,
    pub total_withdrawn: i128,
    pub blocked: bool,
    pub created_at: u64,
}

/// Platform-wide accounting for reporting
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlatformStats {
    /// Total settled contributions
    pub total_contributed: i128,
    /// Total principal committed to positions
    pub total_invested: i128,
    /// Total yield credited by settlement
    pub total_accrued: i128,
    /// Total settled withdrawals
    pub total_withdrawn: i128,
    /// Positions currently accruing
    pub open_positions: u32,
    /// Positions that reached maturity
    pub completed_positions: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Token,
    Paused,
    Stats,
    NextPlanId,
    NextPositionId,
    NextEntryId,
    PlanIds,                // Vec<u32>
    Plan(u32),              // plan_id -> Plan
    Position(u64),          // position_id -> Position
    ActivePositions,        // Vec<u64>, settlement work list
    UserPositions(Address), // user -> Vec<u64>, every position ever opened
    Account(Address),       // user -> Account
    Entry(u64),             // entry_id -> LedgerEntry
    UserEntries(Address),   // user -> Vec<u64>, append order
    PendingEntries,         // Vec<u64>, admin decision queue
}
