//! Weights for `pallet-confidential-staking`.
//!
//! Hand-estimated from storage access counts; coprocessor ops and custody
//! calls are charged as one read + one write each.

#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, Weight},
};

pub trait WeightInfo {
    fn stake() -> Weight;
    fn stake_handle() -> Weight;
    fn unstake() -> Weight;
    fn unstake_handle() -> Weight;
}

/// Storage: `ConfidentialStaking::StakedBalance` (r:1 w:1)
/// Storage: `ConfidentialStaking::TotalStaked` (r:1 w:1)
/// Storage: `Acl::Grants` (r:8 w:8)
/// Coprocessor + custody: ~10 reads / ~10 writes
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn stake() -> Weight {
        Weight::from_parts(45_000_000, 3_600)
            .saturating_add(T::DbWeight::get().reads(21_u64))
            .saturating_add(T::DbWeight::get().writes(21_u64))
    }
    fn stake_handle() -> Weight {
        Weight::from_parts(40_000_000, 3_600)
            .saturating_add(T::DbWeight::get().reads(20_u64))
            .saturating_add(T::DbWeight::get().writes(20_u64))
    }
    fn unstake() -> Weight {
        Weight::from_parts(50_000_000, 3_600)
            .saturating_add(T::DbWeight::get().reads(23_u64))
            .saturating_add(T::DbWeight::get().writes(23_u64))
    }
    fn unstake_handle() -> Weight {
        Weight::from_parts(45_000_000, 3_600)
            .saturating_add(T::DbWeight::get().reads(22_u64))
            .saturating_add(T::DbWeight::get().writes(22_u64))
    }
}

impl WeightInfo for () {
    fn stake() -> Weight {
        Weight::from_parts(45_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads(21_u64))
            .saturating_add(RocksDbWeight::get().writes(21_u64))
    }
    fn stake_handle() -> Weight {
        Weight::from_parts(40_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads(20_u64))
            .saturating_add(RocksDbWeight::get().writes(20_u64))
    }
    fn unstake() -> Weight {
        Weight::from_parts(50_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads(23_u64))
            .saturating_add(RocksDbWeight::get().writes(23_u64))
    }
    fn unstake_handle() -> Weight {
        Weight::from_parts(45_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads(22_u64))
            .saturating_add(RocksDbWeight::get().writes(22_u64))
    }
}
