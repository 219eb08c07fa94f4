//! Overflow/underflow-safe encrypted arithmetic.
//!
//! Both helpers return an encrypted success flag next to the result and never
//! branch on encrypted data: the two candidate outcomes are always computed
//! and one is picked with [`FheOps::select`]. On failure the result is the
//! unchanged `current` value. The only cleartext branch is on handle
//! initialization, which is public.

use crate::{EncryptedAmount, EncryptedBool, FheOps};

/// `current + delta`, or `current` if the sum would exceed `u64::MAX`.
pub fn try_increase<F: FheOps>(
    current: EncryptedAmount,
    delta: EncryptedAmount,
) -> (EncryptedBool, EncryptedAmount) {
    if !current.is_initialized() {
        return (F::as_encrypted_bool(true), delta);
    }
    let sum = F::add(current, delta);
    // a wrapped sum is strictly smaller than either operand
    let ok = F::ge(sum, current);
    (ok, F::select(ok, sum, current))
}

/// `current - delta`, or `current` if `delta > current`.
pub fn try_decrease<F: FheOps>(
    current: EncryptedAmount,
    delta: EncryptedAmount,
) -> (EncryptedBool, EncryptedAmount) {
    if !current.is_initialized() {
        if !delta.is_initialized() {
            return (F::as_encrypted_bool(true), current);
        }
        return (F::eq(delta, F::as_encrypted(0)), F::as_encrypted(0));
    }
    let ok = F::ge(current, delta);
    let difference = F::sub(current, delta);
    (ok, F::select(ok, difference, current))
}
