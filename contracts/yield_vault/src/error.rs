use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION / OPERATIONAL ERRORS (10-19)
    // ============================================
    /// Caller is not the admin
    Unauthorized = 10,
    /// Contract is paused
    ContractPaused = 11,
    /// Account is blocked by an admin
    AccountBlocked = 12,

    // ============================================
    // PLAN ERRORS (20-29)
    // ============================================
    /// Plan not found
    PlanNotFound = 20,
    /// Period length must be positive
    InvalidPeriod = 21,
    /// Total periods must be at least one
    InvalidDuration = 22,
    /// Contribution bounds must satisfy 0 < min <= max
    InvalidBounds = 23,

    // ============================================
    // POSITION ERRORS (30-39)
    // ============================================
    /// Position not found
    PositionNotFound = 30,
    /// Principal below the plan minimum
    BelowPlanMinimum = 31,
    /// Principal above the plan maximum
    AbovePlanMaximum = 32,

    // ============================================
    // AMOUNT / BALANCE ERRORS (40-49)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 40,
    /// Spendable balance too low for the request
    InsufficientBalance = 41,

    // ============================================
    // LEDGER ENTRY ERRORS (50-59)
    // ============================================
    /// Ledger entry not found
    EntryNotFound = 50,
    /// Entry is not pending an admin decision
    EntryNotPending = 51,
}
