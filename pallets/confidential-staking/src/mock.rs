use crate::pallet as pallet_confidential_staking;
use confidential_staking_primitives::{
    safe_math, AccessControl, ConfidentialCustody, EncryptedAmount, FheOps,
};
use frame_support::{
    construct_runtime, derive_impl, ensure, parameter_types,
    pallet_prelude::{OptionQuery, ValueQuery},
    traits::ConstU32,
    Blake2_128Concat, PalletId,
};
use sp_runtime::{BuildStorage, DispatchError};

pub type AccountId = u64;
pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;
/// Principal of the mock custody token.
pub const TOKEN: AccountId = 99;
/// 1 unit = 1_000_000 micro-units.
pub const UNIT: u64 = 1_000_000;

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

parameter_types! {
    pub const StakingPalletId: PalletId = PalletId(*b"CfStake!");
    pub static CustodyAccount: AccountId = TOKEN;
}
impl pallet_confidential_staking::Config for Runtime {
    type RuntimeEvent = RuntimeEvent;
    type Fhe = Fhe;
    type Acl = Acl;
    type Custody = MockToken;
    type PalletId = StakingPalletId;
    type WeightInfo = ();
}

construct_runtime!(
    pub enum Runtime {
        System: frame_system,
        Acl: pallet_acl,
        Fhe: pallet_cleartext_fhe,
        ConfidentialStaking: pallet_confidential_staking,
    }
);

// --- Mock confidential token used as custody ---------------------------------
// Encrypted balances live behind the same coprocessor and ACL as the ledger.
// Transfers never fail on insufficient funds: they move an encrypted zero
// instead, like a real confidential token.

#[frame_support::storage_alias]
pub type TokenBalances =
    StorageMap<MockTokenLedger, Blake2_128Concat, AccountId, EncryptedAmount, ValueQuery>;

#[frame_support::storage_alias]
pub type TokenOperators = StorageDoubleMap<
    MockTokenLedger,
    Blake2_128Concat,
    AccountId,
    Blake2_128Concat,
    AccountId,
    (),
    OptionQuery,
>;

#[frame_support::storage_alias]
pub type TokenPaused = StorageValue<MockTokenLedger, bool, ValueQuery>;

pub struct MockToken;

impl MockToken {
    pub fn mint(to: AccountId, value: u64) {
        let minted = <Fhe as FheOps>::as_encrypted(value);
        let (_, balance) = safe_math::try_increase::<Fhe>(TokenBalances::get(to), minted);
        Self::set_balance(to, balance);
    }

    pub fn set_operator(holder: AccountId, operator: AccountId) {
        TokenOperators::insert(holder, operator, ());
    }

    pub fn pause(paused: bool) {
        TokenPaused::put(paused);
    }

    fn set_balance(who: AccountId, balance: EncryptedAmount) {
        <Acl as AccessControl<AccountId>>::authorize(&balance.handle(), &TOKEN);
        <Acl as AccessControl<AccountId>>::authorize(&balance.handle(), &who);
        TokenBalances::insert(who, balance);
    }

    fn grant(value: EncryptedAmount, whom: &[AccountId]) {
        for who in whom {
            <Acl as AccessControl<AccountId>>::authorize(&value.handle(), who);
        }
    }

    fn move_balance(from: AccountId, to: AccountId, amount: EncryptedAmount) -> EncryptedAmount {
        let (ok, from_balance) = safe_math::try_decrease::<Fhe>(TokenBalances::get(from), amount);
        let transferred =
            <Fhe as FheOps>::select(ok, amount, <Fhe as FheOps>::as_encrypted(0));
        Self::set_balance(from, from_balance);
        let (_, to_balance) = safe_math::try_increase::<Fhe>(TokenBalances::get(to), transferred);
        Self::set_balance(to, to_balance);
        transferred
    }

    fn ensure_usable(amount: &EncryptedAmount) -> Result<(), DispatchError> {
        ensure!(!TokenPaused::get(), DispatchError::Other("token paused"));
        ensure!(
            <Acl as AccessControl<AccountId>>::is_authorized(&amount.handle(), &TOKEN),
            DispatchError::Other("token not authorized on amount")
        );
        Ok(())
    }
}

impl ConfidentialCustody<AccountId> for MockToken {
    fn account() -> AccountId {
        CustodyAccount::get()
    }

    fn confidential_transfer_from(
        operator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: EncryptedAmount,
    ) -> Result<EncryptedAmount, DispatchError> {
        Self::ensure_usable(&amount)?;
        ensure!(
            TokenOperators::contains_key(from, operator),
            DispatchError::Other("not an operator")
        );
        let transferred = Self::move_balance(*from, *to, amount);
        Self::grant(transferred, &[TOKEN, *operator, *from, *to]);
        Ok(transferred)
    }

    fn confidential_transfer(
        from: &AccountId,
        to: &AccountId,
        amount: EncryptedAmount,
    ) -> Result<EncryptedAmount, DispatchError> {
        Self::ensure_usable(&amount)?;
        let transferred = Self::move_balance(*from, *to, amount);
        Self::grant(transferred, &[TOKEN, *from, *to]);
        Ok(transferred)
    }
}

// Build a fresh externalities for each test.
// ALICE, BOB and CHARLIE each hold one unit and have approved the ledger.
pub fn new_test_ext() -> sp_io::TestExternalities {
    let t = frame_system::GenesisConfig::<Runtime>::default()
        .build_storage()
        .unwrap();
    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| {
        System::set_block_number(1);
        let ledger = ConfidentialStaking::account_id();
        for who in [ALICE, BOB, CHARLIE] {
            MockToken::mint(who, UNIT);
            MockToken::set_operator(who, ledger);
        }
    });
    ext
}
