use thiserror::Error;

/// Native value quantity.
///
/// 128 bits covers every realistic deposit; all ledger arithmetic goes
/// through the checked helpers below so overflow surfaces as an error
/// instead of wrapping. Block heights share this width: a deadline is an
/// absolute height stored in an `Amount`.
pub type Amount = u128;

/// Overflow during ledger arithmetic.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("amount arithmetic overflowed")]
pub struct AmountOverflow;

/// Checked addition; overflow is an error, never wraparound.
pub fn checked_add(a: Amount, b: Amount) -> Result<Amount, AmountOverflow> {
    a.checked_add(b).ok_or(AmountOverflow)
}

/// Checked subtraction; underflow is an error, never wraparound.
pub fn checked_sub(a: Amount, b: Amount) -> Result<Amount, AmountOverflow> {
    a.checked_sub(b).ok_or(AmountOverflow)
}
