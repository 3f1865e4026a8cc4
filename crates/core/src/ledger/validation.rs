//! Journal entry validation.
//!
//! Validation is pure: account existence is resolved through an injected
//! lookup closure so the store can call this without the core crate
//! knowing anything about storage.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{Account, CreateEntryInput, EntryTotals, JournalLineInput};
use kasira_shared::types::AccountId;

/// Validates line shapes: non-negative amounts, exactly one side set.
pub fn validate_lines(lines: &[JournalLineInput]) -> Result<(), LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::EmptyEntry);
    }

    for (idx, line) in lines.iter().enumerate() {
        let n = idx + 1;
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount { line: n });
        }
        if line.debit > Decimal::ZERO && line.credit > Decimal::ZERO {
            return Err(LedgerError::DebitAndCredit { line: n });
        }
        if line.debit == Decimal::ZERO && line.credit == Decimal::ZERO {
            return Err(LedgerError::ZeroLine { line: n });
        }
    }

    Ok(())
}

/// Validates that an account may receive a journal line.
pub fn validate_postable(account: &Account) -> Result<(), LedgerError> {
    if !account.is_live() {
        return Err(LedgerError::AccountNotFound(account.id));
    }
    if account.is_header {
        return Err(LedgerError::HeaderAccount(account.id, account.code.clone()));
    }
    if !account.is_active {
        return Err(LedgerError::AccountInactive(account.id, account.code.clone()));
    }
    Ok(())
}

/// Validates a full entry input and returns its totals.
///
/// Checks, in order: line shapes, account postability (via the injected
/// `lookup`), and debit/credit balance within `tolerance`.
pub fn validate_entry<'a, F>(
    input: &CreateEntryInput,
    tolerance: Decimal,
    mut lookup: F,
) -> Result<EntryTotals, LedgerError>
where
    F: FnMut(AccountId) -> Option<&'a Account>,
{
    validate_lines(&input.lines)?;

    for line in &input.lines {
        let account = lookup(line.account_id).ok_or(LedgerError::AccountNotFound(line.account_id))?;
        validate_postable(account)?;
    }

    let totals = EntryTotals::of(&input.lines);
    if !totals.is_balanced_within(tolerance) {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.debit,
            credit: totals.credit,
            tolerance,
        });
    }

    Ok(totals)
}
