use async_trait::async_trait;
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};

use super::repository::{PartyRepository, Versioned};
use crate::error::{StoreError, StoreResult};
use crate::models::WeddingParty;

/// Parties stored as one JSON document per row, with the code, date and
/// version pulled out into columns for lookups and optimistic locking.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct PartyRow {
    data: String,
    version: i64,
}

impl PartyRow {
    fn into_versioned(self) -> StoreResult<Versioned<WeddingParty>> {
        Ok(Versioned {
            record: serde_json::from_str(&self.data)?,
            version: self.version,
        })
    }
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Writes a new party row at version 1. Shared by the repository and the
/// legacy import, which runs it inside a transaction.
pub(crate) async fn insert_party_row<'e, E>(executor: E, party: &WeddingParty) -> StoreResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let data = serde_json::to_string(party)?;

    let result = sqlx::query(
        r#"
        INSERT INTO wedding_parties (id, wedding_code, wedding_date, version, data, created_at, updated_at)
        VALUES (?, ?, ?, 1, ?, ?, ?)
        "#,
    )
    .bind(&party.id)
    .bind(&party.wedding_code)
    .bind(party.wedding_date.to_string())
    .bind(&data)
    .bind(party.created_at.to_rfc3339())
    .bind(party.updated_at.to_rfc3339())
    .execute(executor)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => {
            Err(StoreError::DuplicateCode(party.wedding_code.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl PartyRepository for SqliteRepository {
    async fn insert(&self, party: &WeddingParty) -> StoreResult<()> {
        insert_party_row(&self.pool, party).await
    }

    async fn load(&self, id: &str) -> StoreResult<Option<Versioned<WeddingParty>>> {
        let row: Option<PartyRow> =
            sqlx::query_as("SELECT data, version FROM wedding_parties WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(PartyRow::into_versioned).transpose()
    }

    async fn load_by_code(&self, code: &str) -> StoreResult<Option<WeddingParty>> {
        let row: Option<PartyRow> =
            sqlx::query_as("SELECT data, version FROM wedding_parties WHERE wedding_code = ?")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(PartyRow::into_versioned).transpose()?.map(|v| v.record))
    }

    async fn load_all(&self) -> StoreResult<Vec<WeddingParty>> {
        let rows: Vec<PartyRow> =
            sqlx::query_as("SELECT data, version FROM wedding_parties ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|row| row.into_versioned().map(|v| v.record))
            .collect()
    }

    async fn save(&self, party: &WeddingParty, expected_version: i64) -> StoreResult<()> {
        let data = serde_json::to_string(party)?;

        let result = sqlx::query(
            r#"
            UPDATE wedding_parties
            SET data = ?, wedding_date = ?, version = version + 1, updated_at = ?
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(&data)
        .bind(party.wedding_date.to_string())
        .bind(party.updated_at.to_rfc3339())
        .bind(&party.id)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict(party.id.clone()));
        }
        Ok(())
    }
}
