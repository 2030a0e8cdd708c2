//! Store-level scenario tests. They need a Postgres instance (the same
//! contract the deployed service runs against), so they are ignored by
//! default and run in database-provisioned CI via `cargo test -- --ignored`.

use alloy::primitives::{address, Address, B256, U256};
use blockscout_service_launcher::test_database::TestDbGuard;
use multisig_indexer_entity::{
    daily_limit_states, recoveries, sea_orm_active_enums::TransactionStatus, transactions,
    wallet_owners, wallets,
};
use multisig_indexer_logic::repository::{
    checkpoint, confirmations, daily_limit, owners, recovery, transactions as tx_repo, wallets as wallet_repo,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

const WALLET: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
const OWNER_1: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
const OWNER_2: Address = address!("cccccccccccccccccccccccccccccccccccccccc");

fn tx(byte: u8) -> B256 {
    B256::repeat_byte(byte)
}

async fn init_db(name: &str) -> TestDbGuard {
    TestDbGuard::new::<migration::Migrator>(name).await
}

#[tokio::test]
#[ignore = "needs postgres"]
async fn wallet_creation_projects_wallet_and_owners() {
    let db = init_db("wallet_creation").await;

    wallet_repo::upsert(&db, WALLET, 2, 2, 100, tx(0x01)).await.unwrap();
    owners::insert_many(&db, WALLET, &[OWNER_1, OWNER_2], 100, tx(0x01))
        .await
        .unwrap();

    let wallet = wallets::Entity::find()
        .filter(wallets::Column::Address.eq(format!("{WALLET:#x}")))
        .one(db.client().as_ref())
        .await
        .unwrap()
        .expect("wallet row exists");
    assert_eq!(wallet.threshold, 2);
    assert_eq!(wallet.owner_count, 2);

    let active_owners = wallet_owners::Entity::find()
        .filter(wallet_owners::Column::WalletAddress.eq(format!("{WALLET:#x}")))
        .filter(wallet_owners::Column::IsActive.eq(true))
        .all(db.client().as_ref())
        .await
        .unwrap();
    assert_eq!(active_owners.len(), 2);

    // replay is a no-op
    let inserted = owners::insert_many(&db, WALLET, &[OWNER_1, OWNER_2], 100, tx(0x01))
        .await
        .unwrap();
    assert_eq!(inserted, 0);
}

#[tokio::test]
#[ignore = "needs postgres"]
async fn owner_count_follows_active_owner_rows() {
    let db = init_db("owner_count").await;

    wallet_repo::upsert(&db, WALLET, 1, 1, 100, tx(0x01)).await.unwrap();
    owners::insert_many(&db, WALLET, &[OWNER_1], 100, tx(0x01))
        .await
        .unwrap();

    let inserted = owners::insert(&db, WALLET, OWNER_2, 101, tx(0x02)).await.unwrap();
    assert_eq!(inserted, 1);
    wallet_repo::adjust_owner_count(&db, WALLET, 1).await.unwrap();

    // duplicate delivery must not bump the counter again
    let inserted = owners::insert(&db, WALLET, OWNER_2, 101, tx(0x02)).await.unwrap();
    assert_eq!(inserted, 0);

    let removed = owners::deactivate(&db, WALLET, OWNER_1, 102, tx(0x03)).await.unwrap();
    assert_eq!(removed, 1);
    wallet_repo::adjust_owner_count(&db, WALLET, -1).await.unwrap();
    let removed = owners::deactivate(&db, WALLET, OWNER_1, 102, tx(0x03)).await.unwrap();
    assert_eq!(removed, 0);

    let wallet = wallets::Entity::find()
        .filter(wallets::Column::Address.eq(format!("{WALLET:#x}")))
        .one(db.client().as_ref())
        .await
        .unwrap()
        .unwrap();
    let active = wallet_owners::Entity::find()
        .filter(wallet_owners::Column::WalletAddress.eq(format!("{WALLET:#x}")))
        .filter(wallet_owners::Column::IsActive.eq(true))
        .all(db.client().as_ref())
        .await
        .unwrap();
    assert_eq!(wallet.owner_count as usize, active.len());
}

#[tokio::test]
#[ignore = "needs postgres"]
async fn confirmation_trigger_maintains_the_counter() {
    let db = init_db("confirmation_trigger").await;
    let tx_hash = B256::repeat_byte(0xaa);

    tx_repo::upsert_proposed(
        &db,
        WALLET,
        tx_hash,
        address!("dddddddddddddddddddddddddddddddddddddddd"),
        U256::from(1),
        &Default::default(),
        multisig_indexer_entity::sea_orm_active_enums::TransactionType::Transfer,
        serde_json::json!({}),
        OWNER_1,
        101,
        tx(0x10),
    )
    .await
    .unwrap();

    confirmations::insert(&db, WALLET, tx_hash, OWNER_1, 102, tx(0x11)).await.unwrap();
    confirmations::insert(&db, WALLET, tx_hash, OWNER_2, 103, tx(0x12)).await.unwrap();
    // duplicate approval is swallowed and leaves the counter alone
    confirmations::insert(&db, WALLET, tx_hash, OWNER_2, 103, tx(0x12)).await.unwrap();

    let row = transactions::Entity::find()
        .filter(transactions::Column::WalletAddress.eq(format!("{WALLET:#x}")))
        .one(db.client().as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.confirmation_count, 2);
    assert_eq!(row.status, TransactionStatus::Pending);

    confirmations::revoke(&db, WALLET, tx_hash, OWNER_2, 104, tx(0x13)).await.unwrap();
    let row = transactions::Entity::find_by_id(row.id)
        .one(db.client().as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.confirmation_count, 1);

    tx_repo::mark_executed(&db, WALLET, tx_hash, 105, tx(0x14)).await.unwrap();
    let row = transactions::Entity::find_by_id(row.id)
        .one(db.client().as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, TransactionStatus::Executed);
    assert_eq!(row.executed_at_block, Some(105));
    // confirmations untouched by the terminal transition
    assert_eq!(row.confirmation_count, 1);
}

#[tokio::test]
#[ignore = "needs postgres"]
async fn approval_trigger_maintains_the_recovery_counter() {
    let db = init_db("approval_trigger").await;
    let recovery_hash = B256::repeat_byte(0xbb);

    recovery::upsert_config(&db, WALLET, 2, 3600, 200, tx(0x20)).await.unwrap();
    recovery::upsert_recovery(
        &db,
        WALLET,
        recovery_hash,
        &[OWNER_2],
        1,
        OWNER_1,
        2,
        1_700_003_600,
        200,
        tx(0x21),
    )
    .await
    .unwrap();

    // the initiator is not pre-approved
    let row = recoveries::Entity::find()
        .filter(recoveries::Column::WalletAddress.eq(format!("{WALLET:#x}")))
        .one(db.client().as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.approval_count, 0);
    assert_eq!(row.execution_time, 1_700_003_600);

    recovery::insert_approval(&db, WALLET, recovery_hash, OWNER_1, 201, tx(0x22))
        .await
        .unwrap();
    recovery::insert_approval(&db, WALLET, recovery_hash, OWNER_2, 202, tx(0x23))
        .await
        .unwrap();
    let row = recoveries::Entity::find_by_id(row.id)
        .one(db.client().as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.approval_count, 2);

    recovery::revoke_approval(&db, WALLET, recovery_hash, OWNER_1, 203, tx(0x24))
        .await
        .unwrap();
    let row = recoveries::Entity::find_by_id(row.id)
        .one(db.client().as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.approval_count, 1);
}

#[tokio::test]
#[ignore = "needs postgres"]
async fn spent_today_is_clamped_into_the_limit_range() {
    let db = init_db("daily_limit_clamp").await;

    daily_limit::set_limit(&db, WALLET, U256::from(100), 300, tx(0x30)).await.unwrap();
    daily_limit::record_spend(&db, WALLET, U256::from(40), 301, tx(0x31)).await.unwrap();

    let state = daily_limit_states::Entity::find()
        .filter(daily_limit_states::Column::WalletAddress.eq(format!("{WALLET:#x}")))
        .one(db.client().as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.spent_today, "60");

    // remaining above the stored limit means the limit was raised mid-day
    daily_limit::record_spend(&db, WALLET, U256::from(250), 302, tx(0x32)).await.unwrap();
    let state = daily_limit_states::Entity::find_by_id(state.id)
        .one(db.client().as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.spent_today, "0");
}

#[tokio::test]
#[ignore = "needs postgres"]
async fn checkpoint_never_moves_backwards() {
    let db = init_db("checkpoint_monotonic").await;

    let initial = checkpoint::get(db.client().as_ref()).await.unwrap();
    assert_eq!(initial.last_indexed_block, 0);

    checkpoint::advance(db.client().as_ref(), 500).await.unwrap();
    checkpoint::advance(db.client().as_ref(), 400).await.unwrap();

    let row = checkpoint::get(db.client().as_ref()).await.unwrap();
    assert_eq!(row.last_indexed_block, 500);

    checkpoint::set_syncing(db.client().as_ref(), true).await.unwrap();
    assert!(checkpoint::get(db.client().as_ref()).await.unwrap().is_syncing);
}
