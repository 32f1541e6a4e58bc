use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketStatus {
    pub id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl TicketStatus {
    pub const TABLE: &'static str = "ticket_statuses";

    pub const OPEN: i64 = 1;
    pub const CLOSED: i64 = 2;

    /// Fixed rows every installation starts with
    pub const SEED: [(i64, &'static str); 2] = [(Self::OPEN, "Abierto"), (Self::CLOSED, "Cerrado")];
}
