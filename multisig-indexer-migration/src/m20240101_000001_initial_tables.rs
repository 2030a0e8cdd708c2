use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            CREATE TYPE "transaction_type" AS ENUM (
              'transfer',
              'module_config',
              'wallet_admin',
              'recovery_setup',
              'external_call',
              'unknown'
            );

            CREATE TYPE "transaction_status" AS ENUM (
              'pending',
              'executed',
              'cancelled'
            );

            CREATE TYPE "recovery_status" AS ENUM (
              'pending',
              'executed',
              'cancelled'
            );

            CREATE TYPE "module_type" AS ENUM (
              'daily_limit',
              'whitelist',
              'social_recovery'
            );

            CREATE TABLE "wallets" (
              "id" bigserial PRIMARY KEY,
              "address" varchar(42) NOT NULL,
              "threshold" int NOT NULL,
              "owner_count" int NOT NULL,
              "created_at_block" bigint NOT NULL,
              "created_at_tx" varchar(66) NOT NULL,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              "updated_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "wallets_address_key" UNIQUE ("address"),
              CONSTRAINT "wallets_threshold_check" CHECK ("threshold" >= 1)
            );

            CREATE TABLE "wallet_owners" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "owner_address" varchar(42) NOT NULL,
              "added_at_block" bigint NOT NULL,
              "added_at_tx" varchar(66) NOT NULL,
              "removed_at_block" bigint DEFAULT NULL,
              "removed_at_tx" varchar(66) DEFAULT NULL,
              "is_active" bool NOT NULL DEFAULT true,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              "updated_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "wallet_owners_ledger_key"
                UNIQUE ("wallet_address", "owner_address", "added_at_block")
            );

            CREATE TABLE "modules" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "module_address" varchar(42) NOT NULL,
              "enabled_at_block" bigint NOT NULL,
              "enabled_at_tx" varchar(66) NOT NULL,
              "disabled_at_block" bigint DEFAULT NULL,
              "disabled_at_tx" varchar(66) DEFAULT NULL,
              "is_active" bool NOT NULL DEFAULT true,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              "updated_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "modules_wallet_module_key"
                UNIQUE ("wallet_address", "module_address")
            );

            CREATE TABLE "transactions" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "tx_hash" varchar(66) NOT NULL,
              "to_address" varchar(42) NOT NULL,
              "value" text NOT NULL,
              "data" text NOT NULL,
              "transaction_type" transaction_type NOT NULL,
              "decoded_params" jsonb DEFAULT NULL,
              "status" transaction_status NOT NULL DEFAULT 'pending',
              "confirmation_count" int NOT NULL DEFAULT 0,
              "submitted_by" varchar(42) NOT NULL,
              "submitted_at_block" bigint NOT NULL,
              "submitted_at_tx" varchar(66) NOT NULL,
              "executed_at_block" bigint DEFAULT NULL,
              "executed_at_tx" varchar(66) DEFAULT NULL,
              "cancelled_at_block" bigint DEFAULT NULL,
              "cancelled_at_tx" varchar(66) DEFAULT NULL,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              "updated_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "transactions_wallet_hash_key"
                UNIQUE ("wallet_address", "tx_hash")
            );

            CREATE TABLE "confirmations" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "tx_hash" varchar(66) NOT NULL,
              "owner_address" varchar(42) NOT NULL,
              "confirmed_at_block" bigint NOT NULL,
              "confirmed_at_tx" varchar(66) NOT NULL,
              "revoked_at_block" bigint DEFAULT NULL,
              "revoked_at_tx" varchar(66) DEFAULT NULL,
              "is_active" bool NOT NULL DEFAULT true,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              "updated_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "confirmations_ledger_key"
                UNIQUE ("wallet_address", "tx_hash", "owner_address", "confirmed_at_block")
            );

            CREATE TABLE "deposits" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "sender_address" varchar(42) NOT NULL,
              "amount" text NOT NULL,
              "deposited_at_block" bigint NOT NULL,
              "deposited_at_tx" varchar(66) NOT NULL,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "deposits_wallet_tx_key"
                UNIQUE ("wallet_address", "deposited_at_tx")
            );

            CREATE TABLE "recovery_configs" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "threshold" int NOT NULL,
              "recovery_period" bigint NOT NULL,
              "setup_at_block" bigint NOT NULL,
              "setup_at_tx" varchar(66) NOT NULL,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              "updated_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "recovery_configs_wallet_key" UNIQUE ("wallet_address")
            );

            CREATE TABLE "recovery_guardians" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "guardian_address" varchar(42) NOT NULL,
              "added_at_block" bigint NOT NULL,
              "added_at_tx" varchar(66) NOT NULL,
              "is_active" bool NOT NULL DEFAULT true,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              "updated_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "recovery_guardians_ledger_key"
                UNIQUE ("wallet_address", "guardian_address", "added_at_block")
            );

            CREATE TABLE "recoveries" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "recovery_hash" varchar(66) NOT NULL,
              "new_owners" jsonb NOT NULL,
              "new_threshold" int NOT NULL,
              "initiated_by" varchar(42) NOT NULL,
              "approval_count" int NOT NULL DEFAULT 0,
              "required_threshold" int NOT NULL,
              "execution_time" bigint NOT NULL,
              "status" recovery_status NOT NULL DEFAULT 'pending',
              "initiated_at_block" bigint NOT NULL,
              "initiated_at_tx" varchar(66) NOT NULL,
              "executed_at_block" bigint DEFAULT NULL,
              "executed_at_tx" varchar(66) DEFAULT NULL,
              "cancelled_at_block" bigint DEFAULT NULL,
              "cancelled_at_tx" varchar(66) DEFAULT NULL,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              "updated_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "recoveries_wallet_hash_key"
                UNIQUE ("wallet_address", "recovery_hash")
            );

            CREATE TABLE "recovery_approvals" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "recovery_hash" varchar(66) NOT NULL,
              "guardian_address" varchar(42) NOT NULL,
              "approved_at_block" bigint NOT NULL,
              "approved_at_tx" varchar(66) NOT NULL,
              "revoked_at_block" bigint DEFAULT NULL,
              "revoked_at_tx" varchar(66) DEFAULT NULL,
              "is_active" bool NOT NULL DEFAULT true,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              "updated_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "recovery_approvals_ledger_key"
                UNIQUE ("wallet_address", "recovery_hash", "guardian_address", "approved_at_block")
            );

            CREATE TABLE "daily_limit_states" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "daily_limit" text NOT NULL,
              "spent_today" text NOT NULL,
              "last_reset_day" date NOT NULL,
              "updated_at_block" bigint NOT NULL,
              "updated_at_tx" varchar(66) NOT NULL,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              "updated_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "daily_limit_states_wallet_key" UNIQUE ("wallet_address")
            );

            CREATE TABLE "whitelist_entries" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "whitelisted_address" varchar(42) NOT NULL,
              "limit" text NOT NULL,
              "added_at_block" bigint NOT NULL,
              "added_at_tx" varchar(66) NOT NULL,
              "removed_at_block" bigint DEFAULT NULL,
              "removed_at_tx" varchar(66) DEFAULT NULL,
              "is_active" bool NOT NULL DEFAULT true,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              "updated_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "whitelist_entries_ledger_key"
                UNIQUE ("wallet_address", "whitelisted_address", "added_at_block")
            );

            CREATE TABLE "module_transactions" (
              "id" bigserial PRIMARY KEY,
              "wallet_address" varchar(42) NOT NULL,
              "module_type" module_type NOT NULL,
              "module_address" varchar(42) NOT NULL,
              "to_address" varchar(42) NOT NULL,
              "value" text NOT NULL,
              "remaining_limit" text DEFAULT NULL,
              "executed_at_block" bigint NOT NULL,
              "executed_at_tx" varchar(66) NOT NULL,
              "inserted_at" timestamp NOT NULL DEFAULT (now()),
              CONSTRAINT "module_transactions_ledger_key"
                UNIQUE ("wallet_address", "module_type", "executed_at_tx")
            );

            CREATE TABLE "indexer_checkpoints" (
              "id" int PRIMARY KEY,
              "last_indexed_block" bigint NOT NULL DEFAULT 0,
              "last_indexed_at" timestamp NOT NULL DEFAULT (now()),
              "is_syncing" bool NOT NULL DEFAULT false
            );

            INSERT INTO "indexer_checkpoints" ("id", "last_indexed_block", "is_syncing")
            VALUES (1, 0, false)
        "#;
        crate::from_sql(manager, sql).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sql = r#"
            DROP TABLE "indexer_checkpoints";
            DROP TABLE "module_transactions";
            DROP TABLE "whitelist_entries";
            DROP TABLE "daily_limit_states";
            DROP TABLE "recovery_approvals";
            DROP TABLE "recoveries";
            DROP TABLE "recovery_guardians";
            DROP TABLE "recovery_configs";
            DROP TABLE "deposits";
            DROP TABLE "confirmations";
            DROP TABLE "transactions";
            DROP TABLE "modules";
            DROP TABLE "wallet_owners";
            DROP TABLE "wallets";

            DROP TYPE "module_type";
            DROP TYPE "recovery_status";
            DROP TYPE "transaction_status";
            DROP TYPE "transaction_type"
        "#;
        crate::from_sql(manager, sql).await
    }
}
