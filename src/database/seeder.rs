use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::TicketStatus;

/// Insert the fixed ticket statuses. Safe to run repeatedly.
pub async fn seed_ticket_statuses(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;

    for (id, name) in TicketStatus::SEED {
        sqlx::query("INSERT INTO ticket_statuses (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
            .bind(id)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }

    // Explicit ids bypass the sequence; move it past them.
    sqlx::query(
        "SELECT setval(pg_get_serial_sequence('ticket_statuses', 'id'), (SELECT MAX(id) FROM ticket_statuses))",
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("Seeded {} ticket statuses", TicketStatus::SEED.len());
    Ok(())
}
