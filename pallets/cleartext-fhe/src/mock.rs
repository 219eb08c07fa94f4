use crate::pallet as pallet_cleartext_fhe;
use frame_support::{construct_runtime, derive_impl, traits::ConstU32};
use sp_runtime::BuildStorage;

pub type AccountId = u64;
pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Runtime {
    type Block = frame_system::mocking::MockBlock<Runtime>;
}

impl pallet_acl::Config for Runtime {
    type RuntimeEvent = RuntimeEvent;
    type MaxTransientSweep = ConstU32<64>;
    type WeightInfo = ();
}

impl pallet_cleartext_fhe::Config for Runtime {
    type Acl = Acl;
}

construct_runtime!(
    pub enum Runtime {
        System: frame_system,
        Acl: pallet_acl,
        Fhe: pallet_cleartext_fhe,
    }
);

// Build a fresh externalities for each test.
pub fn new_test_ext() -> sp_io::TestExternalities {
    let t = frame_system::GenesisConfig::<Runtime>::default()
        .build_storage()
        .unwrap();
    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}
