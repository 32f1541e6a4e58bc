use sqlx::{self, postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{FilterData, FilterOp, FilterWhereInfo, SqlParam};

/// Whether soft-deleted rows take part in a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trashed {
    Exclude,
    Include,
}

pub struct Repository<T> {
    table_name: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, pool: PgPool) -> Self {
        Self {
            table_name,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    fn query(&self, trashed: Trashed) -> Result<QueryBuilder<T>, DatabaseError> {
        let builder = QueryBuilder::<T>::new(self.table_name)?;
        Ok(match trashed {
            Trashed::Include => builder.with_deleted(),
            Trashed::Exclude => builder,
        })
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        self.query(Trashed::Exclude)?
            .filter(filter_data)?
            .select_all(&self.pool)
            .await
    }

    pub async fn select_any_with_deleted(&self, conditions: Vec<FilterWhereInfo>) -> Result<Vec<T>, DatabaseError> {
        let filter = FilterData { where_clause: conditions, ..Default::default() };
        self.query(Trashed::Include)?
            .filter(filter)?
            .select_all(&self.pool)
            .await
    }

    pub async fn count(&self, filter_data: FilterData) -> Result<i64, DatabaseError> {
        self.query(Trashed::Exclude)?
            .filter(filter_data)?
            .count(&self.pool)
            .await
    }

    pub async fn find(&self, id: i64, trashed: Trashed) -> Result<Option<T>, DatabaseError> {
        let filter = FilterData {
            where_clause: vec![FilterWhereInfo::new("id", FilterOp::Eq, SqlParam::Int(id))],
            ..Default::default()
        };
        self.query(trashed)?
            .filter(filter)?
            .select_optional(&self.pool)
            .await
    }

    pub async fn select_404(&self, id: i64) -> Result<T, DatabaseError> {
        self.find(id, Trashed::Exclude)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("No query results for {} {}", self.table_name, id)))
    }

    pub async fn select_ids(&self, ids: &[i64], trashed: Trashed) -> Result<Vec<T>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let filter = FilterData {
            where_clause: vec![FilterWhereInfo::any_of("id", ids.iter().map(|id| SqlParam::Int(*id)).collect())],
            ..Default::default()
        };
        self.query(trashed)?
            .filter(filter)?
            .select_all(&self.pool)
            .await
    }

    pub async fn exists(&self, conditions: Vec<FilterWhereInfo>, trashed: Trashed) -> Result<bool, DatabaseError> {
        let filter = FilterData { where_clause: conditions, ..Default::default() };
        let count = self.query(trashed)?.filter(filter)?.count(&self.pool).await?;
        Ok(count > 0)
    }
}
