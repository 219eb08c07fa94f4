//! Types and traits for the confidential staking crates
#![cfg_attr(not(feature = "std"), no_std)]

use frame_support::{pallet_prelude::*, BoundedVec};
use parity_scale_codec::DecodeWithMemTracking;

pub mod safe_math;

/// Opaque reference to a ciphertext held by the FHE coprocessor.
/// The all-zero handle is never produced by the coprocessor and marks a
/// value that was never assigned.
pub type Handle = [u8; 32];

/// Handle value of a never-assigned ciphertext.
pub const UNINITIALIZED: Handle = [0u8; 32];

/// Encrypted 64-bit unsigned integer (analogous to `euint64`).
#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Encode,
    Decode,
    DecodeWithMemTracking,
    MaxEncodedLen,
    TypeInfo,
    RuntimeDebug,
)]
pub struct EncryptedAmount(pub Handle);

/// Encrypted boolean (analogous to `ebool`).
#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Encode,
    Decode,
    DecodeWithMemTracking,
    MaxEncodedLen,
    TypeInfo,
    RuntimeDebug,
)]
pub struct EncryptedBool(pub Handle);

impl EncryptedAmount {
    #[inline]
    pub fn handle(&self) -> Handle {
        self.0
    }

    /// False for a value that was never assigned, which is distinct from an
    /// encrypted zero.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.0 != UNINITIALIZED
    }
}

impl EncryptedBool {
    #[inline]
    pub fn handle(&self) -> Handle {
        self.0
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.0 != UNINITIALIZED
    }
}

/// Opaque "external" encrypted amount (analogous to `externalEuint64`), as
/// submitted by a user before verification.
pub type MaxCiphertextLen = ConstU32<128>;
pub type ExternalEncryptedAmount = BoundedVec<u8, MaxCiphertextLen>;

/// Proof/aux data blob used by the backend to validate an external ciphertext.
pub type MaxProofLen = ConstU32<8192>;
pub type InputProof = BoundedVec<u8, MaxProofLen>;

// ------------------------------
// Coprocessor abstraction
// ------------------------------

/// Homomorphic operations over encrypted `u64` values.
///
/// Every operation derives a **new** handle; nothing is mutated in place.
/// Uninitialized operands are treated as an encrypted zero. Arithmetic wraps
/// modulo 2^64, exactly like the plaintext it mirrors.
pub trait FheOps {
    /// Trivially encrypt a public constant.
    fn as_encrypted(value: u64) -> EncryptedAmount;
    fn as_encrypted_bool(value: bool) -> EncryptedBool;

    fn add(lhs: EncryptedAmount, rhs: EncryptedAmount) -> EncryptedAmount;
    fn sub(lhs: EncryptedAmount, rhs: EncryptedAmount) -> EncryptedAmount;

    fn ge(lhs: EncryptedAmount, rhs: EncryptedAmount) -> EncryptedBool;
    fn eq(lhs: EncryptedAmount, rhs: EncryptedAmount) -> EncryptedBool;

    /// `cond ? if_true : if_false`, evaluated without revealing `cond`.
    fn select(
        cond: EncryptedBool,
        if_true: EncryptedAmount,
        if_false: EncryptedAmount,
    ) -> EncryptedAmount;
}

/// Coprocessor boundary: input verification and off-chain style disclosure.
pub trait FheBackend<AccountId>: FheOps {
    /// Verify `ciphertext` against `proof` for submitter `who` and
    /// materialize it as a handle.
    fn from_external(
        who: &AccountId,
        ciphertext: &ExternalEncryptedAmount,
        proof: &InputProof,
    ) -> Result<EncryptedAmount, DispatchError>;

    /// Decrypt `amount` for `who`. Fails unless `who` holds a grant on it.
    fn disclose(amount: &EncryptedAmount, who: &AccountId) -> Result<u64, DispatchError>;
}

// ------------------------------
// ACL
// ------------------------------

/// Capability layer: which principal may decrypt or operate on which handle.
///
/// Grants are additive. Persistent grants are never revoked; a fresh handle
/// starts with none.
pub trait AccessControl<AccountId> {
    fn authorize(handle: &Handle, who: &AccountId);

    /// Grant for the duration of the current call only.
    fn authorize_transient(handle: &Handle, who: &AccountId);
    fn clear_transient(handle: &Handle, who: &AccountId);

    fn is_authorized(handle: &Handle, who: &AccountId) -> bool;
}

// ------------------------------
// Custody
// ------------------------------

/// Confidential token ledger that actually holds the staked units.
///
/// The implementation enforces its own balance sufficiency and access
/// control. The returned amount is what was really moved and may be an
/// encrypted zero.
pub trait ConfidentialCustody<AccountId> {
    /// Principal the custody ledger acts as when checking grants.
    fn account() -> AccountId;

    /// Move `amount` from `from` to `to` on behalf of `operator`.
    fn confidential_transfer_from(
        operator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: EncryptedAmount,
    ) -> Result<EncryptedAmount, DispatchError>;

    /// Move `amount` from `from`'s own balance to `to`.
    fn confidential_transfer(
        from: &AccountId,
        to: &AccountId,
        amount: EncryptedAmount,
    ) -> Result<EncryptedAmount, DispatchError>;
}

// ------------------------------
// Staking
// ------------------------------

/// Trait so other pallets can stake/unstake without extrinsics.
/// `amount` must already be authorized for `who`.
pub trait ConfidentialStaking<AccountId> {
    fn staked_balance_of(who: &AccountId) -> EncryptedAmount;
    fn total_staked() -> EncryptedAmount;

    /// Returns the amount custody actually moved into the ledger.
    fn stake(who: &AccountId, amount: EncryptedAmount) -> Result<EncryptedAmount, DispatchError>;

    /// Returns the amount custody actually moved back to `who`.
    fn unstake(who: &AccountId, amount: EncryptedAmount)
        -> Result<EncryptedAmount, DispatchError>;
}
