use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            CREATE INDEX "wallet_owners_wallet_active_index"
              ON "wallet_owners" ("wallet_address") WHERE "is_active";

            CREATE INDEX "modules_wallet_active_index"
              ON "modules" ("wallet_address") WHERE "is_active";

            CREATE INDEX "transactions_wallet_status_index"
              ON "transactions" ("wallet_address", "status");

            CREATE INDEX "confirmations_wallet_hash_active_index"
              ON "confirmations" ("wallet_address", "tx_hash") WHERE "is_active";

            CREATE INDEX "deposits_wallet_index"
              ON "deposits" ("wallet_address");

            CREATE INDEX "recoveries_wallet_status_index"
              ON "recoveries" ("wallet_address", "status");

            CREATE INDEX "recovery_approvals_wallet_hash_active_index"
              ON "recovery_approvals" ("wallet_address", "recovery_hash") WHERE "is_active";

            CREATE INDEX "whitelist_entries_wallet_active_index"
              ON "whitelist_entries" ("wallet_address") WHERE "is_active";

            CREATE INDEX "module_transactions_wallet_index"
              ON "module_transactions" ("wallet_address", "executed_at_block")
        "#;
        crate::from_sql(manager, sql).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            DROP INDEX "module_transactions_wallet_index";
            DROP INDEX "whitelist_entries_wallet_active_index";
            DROP INDEX "recovery_approvals_wallet_hash_active_index";
            DROP INDEX "recoveries_wallet_status_index";
            DROP INDEX "deposits_wallet_index";
            DROP INDEX "confirmations_wallet_hash_active_index";
            DROP INDEX "transactions_wallet_status_index";
            DROP INDEX "modules_wallet_active_index";
            DROP INDEX "wallet_owners_wallet_active_index"
        "#;
        crate::from_sql(manager, sql).await
    }
}
