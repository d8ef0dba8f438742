use crate::storage::Storage;
use crate::types::{EntryKind, EntryStatus, LedgerEntry};
use soroban_sdk::{Address, Env, Vec};

/// Sole writer of ledger entries. Entries are immutable after append; the
/// single Pending -> Settled/Rejected transition is applied by the admin
/// module through `Storage::set_entry` on a loaded copy.
pub struct Ledger;

impl Ledger {
    /// Append a new entry. Always succeeds; returns the assigned id.
    pub fn append(
        env: &Env,
        user: &Address,
        amount: i128,
        kind: EntryKind,
        status: EntryStatus,
        plan_id: Option<u32>,
        period: Option<u32>,
    ) -> u64 {
        let entry_id = Storage::next_entry_id(env);
        let entry = LedgerEntry {
            id: entry_id,
            user: user.clone(),
            amount,
            kind,
            status: status.clone(),
            timestamp: env.ledger().timestamp(),
            plan_id,
            period,
        };

        Storage::set_entry(env, &entry);
        Storage::add_user_entry(env, user, entry_id);

        if status == EntryStatus::Pending {
            Storage::add_pending_entry(env, entry_id);
        }

        entry_id
    }

    /// All entries for a user, newest first (display order).
    pub fn entries_of(env: &Env, user: &Address) -> Vec<LedgerEntry> {
        let ids = Storage::user_entries(env, user);
        let mut entries = Vec::new(env);
        for i in (0..ids.len()).rev() {
            let id = ids.get_unchecked(i);
            if let Some(entry) = Storage::get_entry(env, id) {
                entries.push_back(entry);
            }
        }
        entries
    }

    /// Entries awaiting an admin decision, oldest first.
    pub fn pending(env: &Env) -> Vec<LedgerEntry> {
        let ids = Storage::pending_entries(env);
        let mut entries = Vec::new(env);
        for id in ids.iter() {
            if let Some(entry) = Storage::get_entry(env, id) {
                entries.push_back(entry);
            }
        }
        entries
    }

    /// The authoritative balance: fold the user's entries in append order,
    /// then subtract the principal of every position they opened.
    ///
    /// Settled accruals and contributions credit; withdrawals debit while
    /// Pending (the hold taken at request time) and stay debited once
    /// Settled. A rejected withdrawal nets to zero. The cached
    /// `Account.balance` must equal this fold at all times.
    pub fn reconstruct_balance(env: &Env, user: &Address) -> i128 {
        let mut balance: i128 = 0;

        for id in Storage::user_entries(env, user).iter() {
            let entry = match Storage::get_entry(env, id) {
                Some(entry) => entry,
                None => continue,
            };

            match entry.kind {
                EntryKind::Contribution | EntryKind::Accrual => {
                    if entry.status == EntryStatus::Settled {
                        balance += entry.amount;
                    }
                }
                EntryKind::Withdrawal => {
                    if entry.status != EntryStatus::Rejected {
                        balance -= entry.amount;
                    }
                }
            }
        }

        for id in Storage::user_positions(env, user).iter() {
            if let Some(position) = Storage::get_position(env, id) {
                balance -= position.principal;
            }
        }

        balance
    }
}
