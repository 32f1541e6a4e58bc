use sqlx::PgPool;
use std::collections::{BTreeSet, HashMap};
use tracing::info;

use crate::api::{LengthAwarePaginator, PageRequest, Paginated, TicketRelations, TicketResource};
use crate::database::models::{Ticket, TicketStatus, User};
use crate::database::query_builder::{execute, insert_returning_id};
use crate::database::{ChangeSet, DatabaseError, Repository, Trashed};
use crate::filter::{FilterData, SqlParam};
use crate::validation::ticket::TicketDetails;
use crate::validation::{TicketStoreRequest, TicketUpdateRequest};

pub struct TicketService {
    pool: PgPool,
}

impl TicketService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn tickets(&self) -> Repository<Ticket> {
        Repository::new(Ticket::TABLE, self.pool.clone())
    }

    /// Filtered, paginated listing of live tickets ordered by id.
    /// `path` is the absolute listing URL used for page links.
    pub async fn list(
        &self,
        params: &HashMap<String, String>,
        path: &str,
    ) -> Result<Paginated<TicketResource>, DatabaseError> {
        let conditions = Ticket::scope_filter(params);
        let page = PageRequest::from_query(params);

        let repository = self.tickets();
        let total = repository
            .count(FilterData { where_clause: conditions.clone(), ..Default::default() })
            .await?;
        let tickets = repository
            .select_any(FilterData {
                where_clause: conditions,
                order: Some("id asc".to_string()),
                limit: Some(page.per_page),
                offset: Some(page.offset()),
            })
            .await?;

        let relations = self.relations(&tickets).await?;
        let data = TicketResource::collection(&tickets, &relations);
        Ok(LengthAwarePaginator::new(page, total, path).paginate(data))
    }

    pub async fn show(&self, id: i64) -> Result<TicketResource, DatabaseError> {
        let ticket = self.tickets().select_404(id).await?;
        self.present(&ticket).await
    }

    pub async fn create(&self, request: TicketStoreRequest) -> Result<TicketResource, DatabaseError> {
        let mut changes = ChangeSet::new();
        changes.set("user_id", SqlParam::Int(request.user_id));
        if let Some(status) = request.ticket_status_id {
            changes.set("ticket_status_id", SqlParam::Int(status));
        }
        apply_details(&mut changes, request.details);

        let mut tx = self.pool.begin().await?;
        let id = insert_returning_id(&mut *tx, &changes.to_insert_sql(Ticket::TABLE)?).await?;
        tx.commit().await?;

        info!("Created ticket {} for user {}", id, request.user_id);
        self.show(id).await
    }

    pub async fn update(&self, request: TicketUpdateRequest) -> Result<TicketResource, DatabaseError> {
        let mut changes = ChangeSet::new();
        changes
            .set("user_id", SqlParam::Int(request.user_id))
            .set("ticket_status_id", SqlParam::Int(request.ticket_status_id));
        apply_details(&mut changes, request.details);

        let mut tx = self.pool.begin().await?;
        let affected = execute(&mut *tx, &changes.to_update_sql(Ticket::TABLE, request.id)?).await?;
        if affected == 0 {
            return Err(not_found(request.id));
        }
        tx.commit().await?;

        info!("Updated ticket {}", request.id);
        self.show(request.id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let affected = execute(&mut *tx, &ChangeSet::soft_delete_sql(Ticket::TABLE, id)?).await?;
        if affected == 0 {
            return Err(not_found(id));
        }
        tx.commit().await?;

        info!("Soft-deleted ticket {}", id);
        Ok(())
    }

    async fn present(&self, ticket: &Ticket) -> Result<TicketResource, DatabaseError> {
        let relations = self.relations(std::slice::from_ref(ticket)).await?;
        Ok(TicketResource::make(ticket, &relations))
    }

    /// Owner names (deleted owners included) and status names for a batch of tickets
    async fn relations(&self, tickets: &[Ticket]) -> Result<TicketRelations, DatabaseError> {
        if tickets.is_empty() {
            return Ok(TicketRelations::default());
        }
        let user_ids: Vec<i64> = tickets.iter().map(|t| t.user_id).collect::<BTreeSet<_>>().into_iter().collect();
        let status_ids: Vec<i64> = tickets
            .iter()
            .map(|t| t.ticket_status_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let users = Repository::<User>::new(User::TABLE, self.pool.clone())
            .select_ids(&user_ids, Trashed::Include)
            .await?;
        let statuses = Repository::<TicketStatus>::new(TicketStatus::TABLE, self.pool.clone())
            .select_ids(&status_ids, Trashed::Include)
            .await?;

        Ok(TicketRelations::new(users, statuses))
    }
}

fn apply_details(changes: &mut ChangeSet, details: TicketDetails) {
    for (column, value) in details {
        changes.set(column, SqlParam::Text(value));
    }
}

fn not_found(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("No query results for {} {}", Ticket::TABLE, id))
}
