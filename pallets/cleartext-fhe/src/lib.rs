//! pallet-cleartext-fhe: plaintext stand-in for the FHE coprocessor.
//!
//! Implements [`FheBackend`] by keeping the plaintext behind every handle in
//! storage. It offers **no confidentiality** and exists so that ledger logic
//! can be exercised end-to-end in tests and dev runtimes. Handle allocation,
//! wrapping arithmetic, uninitialized-as-zero semantics and ACL-gated
//! disclosure follow the coprocessor contract.
//!
//! External ciphertexts are the 8-byte little-endian plaintext; the matching
//! input proof is [`Pallet::input_proof`], which binds the ciphertext to its
//! submitter.

#![cfg_attr(not(feature = "std"), no_std)]

use frame_support::pallet_prelude::*;
use parity_scale_codec::Encode;
use sp_std::prelude::*;

use confidential_staking_primitives::{
    AccessControl, EncryptedAmount, EncryptedBool, ExternalEncryptedAmount, FheBackend, FheOps,
    Handle, InputProof, UNINITIALIZED,
};

pub use pallet::*;

#[cfg(test)]
mod mock;

const LOG_TARGET: &str = "runtime::cleartext-fhe";
const INPUT_DOMAIN: &[u8] = b"cleartext-fhe/input";
const HANDLE_DOMAIN: &[u8] = b"cleartext-fhe/handle";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        /// Grant relation consulted on disclosure.
        type Acl: AccessControl<Self::AccountId>;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    #[pallet::storage]
    pub type NextNonce<T: Config> = StorageValue<_, u64, ValueQuery>;

    /// Plaintext behind each handle; booleans are stored as 0 / 1.
    #[pallet::storage]
    pub type Plaintexts<T: Config> = StorageMap<_, Identity, Handle, u64, OptionQuery>;

    #[pallet::error]
    pub enum Error<T> {
        /// External ciphertext is not an 8-byte encoding.
        MalformedCiphertext,
        /// Proof does not bind the ciphertext to the submitter.
        InvalidInputProof,
        /// Principal holds no grant on the handle.
        NotAuthorized,
        /// Handle was never produced by this coprocessor.
        UnknownHandle,
    }

    impl<T: Config> Pallet<T> {
        /// Client side: the proof accompanying `ciphertext` submitted by `who`.
        pub fn input_proof(who: &T::AccountId, ciphertext: &[u8]) -> [u8; 32] {
            sp_io::hashing::blake2_256(&(INPUT_DOMAIN, who, ciphertext).encode())
        }

        /// Client side: "encrypt" `value` for submission by `who`.
        pub fn encrypt_input(who: &T::AccountId, value: u64) -> (ExternalEncryptedAmount, InputProof) {
            let ciphertext = value.to_le_bytes().to_vec();
            let proof = Self::input_proof(who, &ciphertext).to_vec();
            (
                BoundedVec::truncate_from(ciphertext),
                BoundedVec::truncate_from(proof),
            )
        }

        fn fresh(value: u64) -> Handle {
            let nonce = NextNonce::<T>::mutate(|n| {
                let cur = *n;
                *n = n.wrapping_add(1);
                cur
            });
            let handle = sp_io::hashing::blake2_256(&(HANDLE_DOMAIN, nonce).encode());
            Plaintexts::<T>::insert(handle, value);
            handle
        }

        fn value_of(handle: &Handle) -> u64 {
            Plaintexts::<T>::get(handle).unwrap_or(0)
        }
    }

    impl<T: Config> FheOps for Pallet<T> {
        fn as_encrypted(value: u64) -> EncryptedAmount {
            EncryptedAmount(Self::fresh(value))
        }

        fn as_encrypted_bool(value: bool) -> EncryptedBool {
            EncryptedBool(Self::fresh(value as u64))
        }

        fn add(lhs: EncryptedAmount, rhs: EncryptedAmount) -> EncryptedAmount {
            let v = Self::value_of(&lhs.0).wrapping_add(Self::value_of(&rhs.0));
            EncryptedAmount(Self::fresh(v))
        }

        fn sub(lhs: EncryptedAmount, rhs: EncryptedAmount) -> EncryptedAmount {
            let v = Self::value_of(&lhs.0).wrapping_sub(Self::value_of(&rhs.0));
            EncryptedAmount(Self::fresh(v))
        }

        fn ge(lhs: EncryptedAmount, rhs: EncryptedAmount) -> EncryptedBool {
            Self::as_encrypted_bool(Self::value_of(&lhs.0) >= Self::value_of(&rhs.0))
        }

        fn eq(lhs: EncryptedAmount, rhs: EncryptedAmount) -> EncryptedBool {
            Self::as_encrypted_bool(Self::value_of(&lhs.0) == Self::value_of(&rhs.0))
        }

        fn select(
            cond: EncryptedBool,
            if_true: EncryptedAmount,
            if_false: EncryptedAmount,
        ) -> EncryptedAmount {
            let picked = if Self::value_of(&cond.0) != 0 { if_true } else { if_false };
            EncryptedAmount(Self::fresh(Self::value_of(&picked.0)))
        }
    }

    impl<T: Config> FheBackend<T::AccountId> for Pallet<T> {
        fn from_external(
            who: &T::AccountId,
            ciphertext: &ExternalEncryptedAmount,
            proof: &InputProof,
        ) -> Result<EncryptedAmount, DispatchError> {
            let bytes: [u8; 8] = ciphertext
                .as_slice()
                .try_into()
                .map_err(|_| Error::<T>::MalformedCiphertext)?;
            ensure!(
                proof.as_slice() == Self::input_proof(who, ciphertext.as_slice()).as_slice(),
                Error::<T>::InvalidInputProof
            );
            let amount = EncryptedAmount(Self::fresh(u64::from_le_bytes(bytes)));
            log::trace!(target: LOG_TARGET, "materialized input {:?}", amount);
            Ok(amount)
        }

        fn disclose(amount: &EncryptedAmount, who: &T::AccountId) -> Result<u64, DispatchError> {
            if amount.0 == UNINITIALIZED {
                return Ok(0);
            }
            ensure!(T::Acl::is_authorized(&amount.0, who), Error::<T>::NotAuthorized);
            Plaintexts::<T>::get(amount.0).ok_or_else(|| Error::<T>::UnknownHandle.into())
        }
    }
}
