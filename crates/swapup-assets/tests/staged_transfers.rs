//! Integration tests: adapter moves inside a staged ledger transaction.
//!
//! A batch of legs moved inside one `transact` either lands completely or
//! leaves every balance and owner exactly as it was.

use rand::{Rng, SeedableRng, rngs::StdRng};
use swapup_assets::{AssetLedger, TransferAdapter};
use swapup_types::{Address, AssetRef, FeeSplit, SwapError};

const FUNGIBLE: u64 = 200;
const ITEMS: u64 = 100;
const ENGINE: u64 = 99;
const TREASURY: u64 = 5;

fn addr(n: u64) -> Address {
    Address::from_index(n)
}

/// Owner 1 holds items 0..n and 1_000 units per item, all authorized.
fn seeded(n: u128) -> AssetLedger {
    let mut l = AssetLedger::new();
    l.register_fungible(addr(FUNGIBLE)).unwrap();
    l.register_unique(addr(ITEMS)).unwrap();
    for item in 0..n {
        l.mint_item(addr(ITEMS), addr(1), item).unwrap();
    }
    l.mint_fungible(addr(FUNGIBLE), addr(1), 1_000 * n).unwrap();
    l.approve_fungible(addr(FUNGIBLE), addr(1), addr(ENGINE), 1_000 * n)
        .unwrap();
    l.approve_operator(addr(ITEMS), addr(1), addr(ENGINE), true)
        .unwrap();
    l
}

fn legs(n: u128) -> Vec<AssetRef> {
    (0..n)
        .flat_map(|i| {
            [
                AssetRef::unique(addr(ITEMS), i),
                AssetRef::fungible(addr(FUNGIBLE), 1_000),
            ]
        })
        .collect()
}

fn split_for(leg: &AssetRef) -> FeeSplit {
    match leg {
        AssetRef::Fungible { amount, .. } => FeeSplit {
            gross: *amount,
            to_recipient: amount - amount / 100,
            to_treasury: amount / 100,
        },
        AssetRef::Unique { .. } => FeeSplit::fee_free(leg.unit()),
    }
}

fn move_all(
    ledger: &mut AssetLedger,
    adapter: TransferAdapter,
    legs: &[AssetRef],
) -> Result<(), SwapError> {
    let touched: Vec<Address> = legs.iter().map(AssetRef::contract).collect();
    ledger.transact(touched, |tx| {
        for leg in legs {
            adapter.move_asset(tx, addr(1), addr(2), leg, split_for(leg), addr(TREASURY))?;
        }
        Ok(())
    })
}

#[test]
fn all_legs_land_together() {
    let n = 6;
    let mut ledger = seeded(n);
    let adapter = TransferAdapter::new(addr(ENGINE));
    move_all(&mut ledger, adapter, &legs(n)).unwrap();

    for item in 0..n {
        assert_eq!(ledger.owner_of(addr(ITEMS), item), Some(addr(2)));
    }
    assert_eq!(ledger.balance_of(addr(FUNGIBLE), addr(2)), 990 * n);
    assert_eq!(ledger.balance_of(addr(FUNGIBLE), addr(TREASURY)), 10 * n);
    assert_eq!(ledger.balance_of(addr(FUNGIBLE), addr(1)), 0);
}

#[test]
fn one_bad_leg_reverts_every_leg() {
    let mut rng = StdRng::seed_from_u64(0x5a_a9);
    for _ in 0..32 {
        let n = rng.gen_range(2..10u128);
        let mut ledger = seeded(n);
        let adapter = TransferAdapter::new(addr(ENGINE));
        let mut batch = legs(n);

        // Corrupt exactly one leg: an item nobody owns, or an oversized amount.
        let victim = rng.gen_range(0..batch.len());
        batch[victim] = match batch[victim] {
            AssetRef::Unique { contract, .. } => AssetRef::unique(contract, 10_000),
            AssetRef::Fungible { contract, .. } => AssetRef::fungible(contract, 1_000 * n + 1),
        };

        let before = ledger.clone();
        let err = move_all(&mut ledger, adapter, &batch).unwrap_err();
        assert!(err.is_asset_precondition(), "unexpected error: {err}");

        for item in 0..n {
            assert_eq!(
                ledger.owner_of(addr(ITEMS), item),
                before.owner_of(addr(ITEMS), item)
            );
        }
        for who in [1, 2, TREASURY] {
            assert_eq!(
                ledger.balance_of(addr(FUNGIBLE), addr(who)),
                before.balance_of(addr(FUNGIBLE), addr(who))
            );
        }
        assert_eq!(
            ledger.fungible(addr(FUNGIBLE)).unwrap().sum_of_balances(),
            1_000 * n
        );
    }
}
