//! **pallet-confidential-staking**
//!
//! Staking ledger whose balances never leave the encrypted domain. The pallet
//! keeps one encrypted balance per account plus an encrypted running total
//! and updates both with the overflow/underflow-safe helpers from
//! `confidential_staking_primitives::safe_math`.
//!
//! Flow:
//! - `stake`: custody moves the requested ciphertext into the ledger account
//!   and reports what it actually moved; exactly that amount is credited to
//!   the account balance and the total.
//! - `unstake`: the request is clamped homomorphically to zero when it exceeds
//!   the staked balance, debited from balance and total, then moved back out
//!   of custody.
//!
//! Notes:
//! - Arithmetic failure is never an error. An oversize unstake succeeds and
//!   changes nothing but the handles, so observers cannot tell it apart from a
//!   real one.
//! - Every derived value is granted to the ledger account and to the acting
//!   account before it is stored or returned; a value without grants is dead.
//! - Both operations run in one storage transaction. A custody failure rolls
//!   back every balance update made in the same call.

#![cfg_attr(not(feature = "std"), no_std)]

use frame_support::{pallet_prelude::*, traits::Get, transactional, PalletId};
use frame_system::pallet_prelude::*;
use sp_runtime::traits::{AccountIdConversion, TrailingZeroInput};

use confidential_staking_primitives::{
    safe_math, AccessControl, ConfidentialCustody, ConfidentialStaking, EncryptedAmount,
    ExternalEncryptedAmount, FheBackend, FheOps, InputProof,
};

pub use pallet::*;
pub use weights::WeightInfo;

mod gateway;
pub mod weights;

#[cfg(test)]
mod mock;

const LOG_TARGET: &str = "runtime::confidential-staking";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// FHE coprocessor: input verification and homomorphic arithmetic.
        type Fhe: FheBackend<Self::AccountId>;

        /// Grant relation over ciphertext handles.
        type Acl: AccessControl<Self::AccountId>;

        /// Confidential token ledger holding the staked units.
        type Custody: ConfidentialCustody<Self::AccountId>;

        /// PalletId to derive the ledger account (holds custody, operates on values).
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    /// Encrypted staked balance per account. Never-staked accounts read as
    /// the uninitialized handle.
    #[pallet::storage]
    pub type StakedBalance<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, EncryptedAmount, ValueQuery>;

    /// Encrypted sum of all `StakedBalance` entries.
    #[pallet::storage]
    pub type TotalStaked<T: Config> = StorageValue<_, EncryptedAmount, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// `amount` is what custody actually moved in.
        Staked {
            who: T::AccountId,
            amount: EncryptedAmount,
            new_balance: EncryptedAmount,
        },
        /// `amount` is the applied amount: the request, or zero if it
        /// exceeded the staked balance.
        Unstaked {
            who: T::AccountId,
            amount: EncryptedAmount,
            new_balance: EncryptedAmount,
        },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller holds no grant on the presented ciphertext handle.
        NotAuthorized,
        /// Custody ledger rejected the transfer.
        CustodyTransferFailed,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn integrity_test() {
            if let Err(e) = Self::validate_config() {
                panic!("pallet-confidential-staking misconfigured: {e}");
            }
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Stake an amount submitted as an external ciphertext plus input proof.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::stake())]
        #[transactional]
        pub fn stake(
            origin: OriginFor<T>,
            ciphertext: ExternalEncryptedAmount,
            proof: InputProof,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let amount = T::Fhe::from_external(&who, &ciphertext, &proof)?;
            Self::authorize(amount, &who);
            Self::do_stake(&who, amount)?;
            Ok(())
        }

        /// Stake an existing ciphertext handle the caller is authorized on.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::stake_handle())]
        #[transactional]
        pub fn stake_handle(origin: OriginFor<T>, amount: EncryptedAmount) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_authorized(&who, amount)?;
            Self::do_stake(&who, amount)?;
            Ok(())
        }

        /// Unstake an amount submitted as an external ciphertext plus input proof.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::unstake())]
        #[transactional]
        pub fn unstake(
            origin: OriginFor<T>,
            ciphertext: ExternalEncryptedAmount,
            proof: InputProof,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let amount = T::Fhe::from_external(&who, &ciphertext, &proof)?;
            Self::authorize(amount, &who);
            Self::do_unstake(&who, amount)?;
            Ok(())
        }

        /// Unstake an existing ciphertext handle the caller is authorized on.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::unstake_handle())]
        #[transactional]
        pub fn unstake_handle(origin: OriginFor<T>, amount: EncryptedAmount) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::ensure_authorized(&who, amount)?;
            Self::do_unstake(&who, amount)?;
            Ok(())
        }
    }

    impl<T: Config> Pallet<T> {
        #[inline]
        pub fn account_id() -> T::AccountId {
            T::PalletId::get().into_account_truncating()
        }

        pub fn staked_balance_of(who: &T::AccountId) -> EncryptedAmount {
            StakedBalance::<T>::get(who)
        }

        pub fn total_staked() -> EncryptedAmount {
            TotalStaked::<T>::get()
        }

        /// Custody must be a real principal distinct from the ledger itself.
        pub fn validate_config() -> Result<(), &'static str> {
            let custody = T::Custody::account();
            let zero = T::AccountId::decode(&mut TrailingZeroInput::zeroes())
                .map_err(|_| "account id cannot be decoded from zeroes")?;
            ensure!(custody != zero, "custody account is the zero account");
            ensure!(
                custody != Self::account_id(),
                "custody account equals the staking account"
            );
            Ok(())
        }

        /// Keep the ledger able to operate on `value` in later calls.
        #[inline]
        pub(crate) fn authorize_self(value: EncryptedAmount) {
            T::Acl::authorize(&value.handle(), &Self::account_id());
        }

        #[inline]
        pub(crate) fn authorize(value: EncryptedAmount, who: &T::AccountId) {
            T::Acl::authorize(&value.handle(), who);
        }

        fn ensure_authorized(who: &T::AccountId, amount: EncryptedAmount) -> DispatchResult {
            ensure!(
                T::Acl::is_authorized(&amount.handle(), who),
                Error::<T>::NotAuthorized
            );
            Ok(())
        }

        /// Grant `value` to the ledger and to `who`.
        fn share(value: EncryptedAmount, who: &T::AccountId) {
            Self::authorize_self(value);
            Self::authorize(value, who);
        }

        #[transactional]
        pub(crate) fn do_stake(
            who: &T::AccountId,
            amount: EncryptedAmount,
        ) -> Result<EncryptedAmount, DispatchError> {
            let transferred = Self::move_in(who, amount)?;
            Self::share(transferred, who);

            let (_, new_balance) =
                safe_math::try_increase::<T::Fhe>(StakedBalance::<T>::get(who), transferred);
            Self::share(new_balance, who);
            StakedBalance::<T>::insert(who, new_balance);

            let (_, new_total) =
                safe_math::try_increase::<T::Fhe>(TotalStaked::<T>::get(), transferred);
            Self::share(new_total, who);
            TotalStaked::<T>::put(new_total);

            log::debug!(
                target: LOG_TARGET,
                "staked: amount {:?} new balance {:?}",
                transferred,
                new_balance
            );
            Self::deposit_event(Event::Staked {
                who: who.clone(),
                amount: transferred,
                new_balance,
            });
            Ok(transferred)
        }

        #[transactional]
        pub(crate) fn do_unstake(
            who: &T::AccountId,
            amount: EncryptedAmount,
        ) -> Result<EncryptedAmount, DispatchError> {
            let (ok, new_balance) =
                safe_math::try_decrease::<T::Fhe>(StakedBalance::<T>::get(who), amount);
            let applied = T::Fhe::select(ok, amount, T::Fhe::as_encrypted(0));
            Self::share(applied, who);

            Self::share(new_balance, who);
            StakedBalance::<T>::insert(who, new_balance);

            let (_, new_total) = safe_math::try_decrease::<T::Fhe>(TotalStaked::<T>::get(), applied);
            Self::share(new_total, who);
            TotalStaked::<T>::put(new_total);

            let transferred = Self::move_out(who, applied)?;
            Self::share(transferred, who);

            log::debug!(
                target: LOG_TARGET,
                "unstaked: amount {:?} new balance {:?}",
                applied,
                new_balance
            );
            Self::deposit_event(Event::Unstaked {
                who: who.clone(),
                amount: applied,
                new_balance,
            });
            Ok(transferred)
        }
    }

    impl<T: Config> ConfidentialStaking<T::AccountId> for Pallet<T> {
        fn staked_balance_of(who: &T::AccountId) -> EncryptedAmount {
            StakedBalance::<T>::get(who)
        }

        fn total_staked() -> EncryptedAmount {
            TotalStaked::<T>::get()
        }

        fn stake(
            who: &T::AccountId,
            amount: EncryptedAmount,
        ) -> Result<EncryptedAmount, DispatchError> {
            Self::ensure_authorized(who, amount)?;
            Self::do_stake(who, amount)
        }

        fn unstake(
            who: &T::AccountId,
            amount: EncryptedAmount,
        ) -> Result<EncryptedAmount, DispatchError> {
            Self::ensure_authorized(who, amount)?;
            Self::do_unstake(who, amount)
        }
    }
}
