//! Custody boundary. Moves ciphertexts between the custody ledger and the
//! staking account; holds no state of its own.
//!
//! Custody is granted a transient right on the amount for the duration of
//! the nested call only, unless it already holds one. Whatever custody returns is taken as the amount
//! actually moved; it is never assumed to equal the request.

use crate::{pallet::*, LOG_TARGET};
use confidential_staking_primitives::{AccessControl, ConfidentialCustody, EncryptedAmount};
use frame_support::pallet_prelude::*;

impl<T: Config> Pallet<T> {
    /// Pull `amount` from `from` into the ledger account.
    pub(crate) fn move_in(
        from: &T::AccountId,
        amount: EncryptedAmount,
    ) -> Result<EncryptedAmount, DispatchError> {
        let ledger = Self::account_id();
        Self::with_custody_grant(amount, || {
            T::Custody::confidential_transfer_from(&ledger, from, &ledger, amount)
        })
    }

    /// Send `amount` from the ledger account back to `to`.
    pub(crate) fn move_out(
        to: &T::AccountId,
        amount: EncryptedAmount,
    ) -> Result<EncryptedAmount, DispatchError> {
        let ledger = Self::account_id();
        Self::with_custody_grant(amount, || T::Custody::confidential_transfer(&ledger, to, amount))
    }

    fn with_custody_grant(
        amount: EncryptedAmount,
        transfer: impl FnOnce() -> Result<EncryptedAmount, DispatchError>,
    ) -> Result<EncryptedAmount, DispatchError> {
        let custody = T::Custody::account();
        // an enclosing scope may already have granted custody; leave that grant alone
        let scoped = !T::Acl::is_authorized(&amount.handle(), &custody);
        if scoped {
            T::Acl::authorize_transient(&amount.handle(), &custody);
        }
        let res = transfer();
        if scoped {
            T::Acl::clear_transient(&amount.handle(), &custody);
        }

        res.map_err(|e| {
            log::debug!(target: LOG_TARGET, "custody transfer rejected: {:?}", e);
            Error::<T>::CustodyTransferFailed.into()
        })
    }
}
