//! pallet-acl: access control over confidential value handles.
//!
//! Every ciphertext handle produced by the FHE coprocessor starts without any
//! grant. A grant `(handle, who)` lets `who` decrypt the value or pass it to
//! another operation that checks authorization. Grants are kept as a relation
//! keyed by handle, so a derived value never inherits the grants of its
//! inputs.
//!
//! Two kinds of grants exist:
//! - persistent: additive, never revoked;
//! - transient: scoped to a single call (the caller clears them once the
//!   nested call returns). Anything left over is swept in `on_finalize`, at
//!   most `MaxTransientSweep` entries per block.

#![cfg_attr(not(feature = "std"), no_std)]

use frame_support::{pallet_prelude::*, weights::constants::RocksDbWeight};
use frame_system::pallet_prelude::*;

use confidential_staking_primitives::{AccessControl, Handle};

pub use pallet::*;

#[cfg(test)]
mod mock;

const LOG_TARGET: &str = "runtime::acl";

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Upper bound on leftover transient grants removed per block.
        #[pallet::constant]
        type MaxTransientSweep: Get<u32>;

        type WeightInfo: WeightData;
    }

    /// Minimal weights (override in runtime).
    pub trait WeightData {
        fn allow() -> Weight;
        fn sweep_transient(n: u32) -> Weight;
    }
    impl WeightData for () {
        // Grants (r:2 w:1), System::Events (w:1)
        fn allow() -> Weight {
            Weight::from_parts(20_000_000, 3_500)
                .saturating_add(RocksDbWeight::get().reads(2_u64))
                .saturating_add(RocksDbWeight::get().writes(2_u64))
        }
        // TransientGrants (r:n w:n)
        fn sweep_transient(n: u32) -> Weight {
            Weight::from_parts(2_000_000, 0)
                .saturating_add(Weight::from_parts(1_000_000, 0).saturating_mul(n.into()))
                .saturating_add(RocksDbWeight::get().reads_writes(n.into(), n.into()))
        }
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    /// Persistent grants: (handle, principal).
    #[pallet::storage]
    pub type Grants<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        Handle,
        Blake2_128Concat,
        T::AccountId,
        (),
        OptionQuery,
    >;

    /// Call-scoped grants.
    #[pallet::storage]
    pub type TransientGrants<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        Handle,
        Blake2_128Concat,
        T::AccountId,
        (),
        OptionQuery,
    >;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// `who` may now decrypt / operate on `handle`.
        Authorized { handle: Handle, who: T::AccountId },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Caller holds no grant on the handle it tried to share.
        NotAuthorized,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn on_initialize(_n: BlockNumberFor<T>) -> Weight {
            // reserve the worst-case sweep done in on_finalize
            T::WeightInfo::sweep_transient(T::MaxTransientSweep::get())
        }

        fn on_finalize(_n: BlockNumberFor<T>) {
            let res = TransientGrants::<T>::clear(T::MaxTransientSweep::get(), None);
            if res.unique > 0 {
                log::debug!(target: LOG_TARGET, "swept {} stale transient grants", res.unique);
            }
            if res.maybe_cursor.is_some() {
                log::warn!(target: LOG_TARGET, "transient sweep limit reached, rest deferred");
            }
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Share a handle the caller is already authorized on with `who`.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::allow())]
        pub fn allow(origin: OriginFor<T>, handle: Handle, who: T::AccountId) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            ensure!(
                <Self as AccessControl<T::AccountId>>::is_authorized(&handle, &caller),
                Error::<T>::NotAuthorized
            );
            <Self as AccessControl<T::AccountId>>::authorize(&handle, &who);
            Ok(())
        }
    }

    impl<T: Config> AccessControl<T::AccountId> for Pallet<T> {
        fn authorize(handle: &Handle, who: &T::AccountId) {
            if Grants::<T>::contains_key(handle, who) {
                return;
            }
            Grants::<T>::insert(handle, who, ());
            Self::deposit_event(Event::Authorized {
                handle: *handle,
                who: who.clone(),
            });
        }

        fn authorize_transient(handle: &Handle, who: &T::AccountId) {
            log::trace!(target: LOG_TARGET, "transient grant on {:?}", handle);
            TransientGrants::<T>::insert(handle, who, ());
        }

        fn clear_transient(handle: &Handle, who: &T::AccountId) {
            TransientGrants::<T>::remove(handle, who);
        }

        fn is_authorized(handle: &Handle, who: &T::AccountId) -> bool {
            Grants::<T>::contains_key(handle, who) || TransientGrants::<T>::contains_key(handle, who)
        }
    }
}
