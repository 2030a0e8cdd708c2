use multisig_indexer_entity::indexer_checkpoints::{ActiveModel, Entity, Model};
use sea_orm::{
    sea_query::OnConflict, ActiveValue::Set, ConnectionTrait, DatabaseConnection, EntityTrait,
    Statement,
};

const CHECKPOINT_ID: i32 = 1;

/// Reads the singleton checkpoint row, re-seeding it if the store was
/// reset underneath the service.
pub async fn get(db: &DatabaseConnection) -> Result<Model, anyhow::Error> {
    if let Some(checkpoint) = Entity::find_by_id(CHECKPOINT_ID).one(db).await? {
        return Ok(checkpoint);
    }
    tracing::warn!("checkpoint row missing, re-seeding from block 0");
    let model = ActiveModel {
        id: Set(CHECKPOINT_ID),
        last_indexed_block: Set(0),
        is_syncing: Set(false),
        ..Default::default()
    };
    Entity::insert(model)
        .on_conflict(
            OnConflict::column(multisig_indexer_entity::indexer_checkpoints::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Entity::find_by_id(CHECKPOINT_ID)
        .one(db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("checkpoint row missing after re-seed"))
}

/// Advances the checkpoint. The greatest-wins update keeps the watermark
/// monotonic even if a stale range commit lands late.
pub async fn advance(db: &DatabaseConnection, block: u64) -> Result<(), anyhow::Error> {
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        r#"
UPDATE indexer_checkpoints
SET last_indexed_block = GREATEST(last_indexed_block, $1),
    last_indexed_at = now()
WHERE id = $2"#,
        [(block as i64).into(), CHECKPOINT_ID.into()],
    ))
    .await?;
    Ok(())
}

pub async fn set_syncing(db: &DatabaseConnection, is_syncing: bool) -> Result<(), anyhow::Error> {
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        r#"UPDATE indexer_checkpoints SET is_syncing = $1 WHERE id = $2"#,
        [is_syncing.into(), CHECKPOINT_ID.into()],
    ))
    .await?;
    Ok(())
}
