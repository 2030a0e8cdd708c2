use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// confirmation_count and approval_count are owned by the database; the
// service never writes them after row creation.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE OR REPLACE FUNCTION refresh_confirmation_count() RETURNS trigger AS $$
            BEGIN
                UPDATE transactions
                SET confirmation_count = (
                    SELECT count(*) FROM confirmations
                    WHERE wallet_address = NEW.wallet_address
                      AND tx_hash = NEW.tx_hash
                      AND is_active
                ),
                updated_at = now()
                WHERE wallet_address = NEW.wallet_address
                  AND tx_hash = NEW.tx_hash;
                RETURN NEW;
            END;
            $$ LANGUAGE plpgsql;

            CREATE TRIGGER confirmations_refresh_count
            AFTER INSERT OR UPDATE ON confirmations
            FOR EACH ROW EXECUTE FUNCTION refresh_confirmation_count();

            CREATE OR REPLACE FUNCTION refresh_approval_count() RETURNS trigger AS $$
            BEGIN
                UPDATE recoveries
                SET approval_count = (
                    SELECT count(*) FROM recovery_approvals
                    WHERE wallet_address = NEW.wallet_address
                      AND recovery_hash = NEW.recovery_hash
                      AND is_active
                ),
                updated_at = now()
                WHERE wallet_address = NEW.wallet_address
                  AND recovery_hash = NEW.recovery_hash;
                RETURN NEW;
            END;
            $$ LANGUAGE plpgsql;

            CREATE TRIGGER recovery_approvals_refresh_count
            AFTER INSERT OR UPDATE ON recovery_approvals
            FOR EACH ROW EXECUTE FUNCTION refresh_approval_count();
        "#,
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            DROP TRIGGER recovery_approvals_refresh_count ON recovery_approvals;
            DROP FUNCTION refresh_approval_count;
            DROP TRIGGER confirmations_refresh_count ON confirmations;
            DROP FUNCTION refresh_confirmation_count;
        "#,
            )
            .await?;
        Ok(())
    }
}
