//! Score aggregation. An idea's score is the all-time sum of its vote values,
//! recomputed in full after every ledger change and never patched incrementally.
//! This is the only writer of `ideas.score`.

use sqlx::PgConnection;
use uuid::Uuid;

/// Recomputes and stores the score for `idea_id`, returning the new value.
/// Call inside the same transaction as the ledger write.
pub async fn recompute_score(conn: &mut PgConnection, idea_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        UPDATE ideas
        SET score = (
            SELECT COALESCE(SUM(value), 0)::BIGINT FROM idea_votes WHERE idea_id = $1
        )
        WHERE id = $1
        RETURNING score
        "#,
    )
    .bind(idea_id)
    .fetch_one(conn)
    .await
}
