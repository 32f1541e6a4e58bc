use sqlx::{self, postgres::PgArguments, FromRow, PgConnection, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, FilterData, SqlParam, SqlResult};

pub struct QueryBuilder<T> {
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        Ok(Self {
            filter: Filter::new(table_name)?,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, DatabaseError> {
        self.filter.assign(filter_data)?;
        Ok(self)
    }

    pub fn with_deleted(mut self) -> Self {
        self.filter.with_deleted();
        self
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.filter.to_sql()?;
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn select_optional(self, pool: &PgPool) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.filter.to_sql()?;
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let row = q.fetch_optional(pool).await?;
        Ok(row)
    }

    pub async fn count(self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = self.filter.to_count_sql()?;
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

/// Column assignments for an INSERT or UPDATE, in insertion order.
#[derive(Debug, Default)]
pub struct ChangeSet {
    columns: Vec<(String, SqlParam)>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: SqlParam) -> &mut Self {
        self.columns.push((column.into(), value));
        self
    }

    pub fn to_insert_sql(&self, table_name: &str) -> Result<SqlResult, DatabaseError> {
        let table = Self::quoted(table_name)?;
        if self.columns.is_empty() {
            return Ok(SqlResult {
                query: format!("INSERT INTO {} DEFAULT VALUES RETURNING \"id\"", table),
                params: vec![],
            });
        }

        let mut names = Vec::with_capacity(self.columns.len());
        let mut placeholders = Vec::with_capacity(self.columns.len());
        let mut params = Vec::with_capacity(self.columns.len());
        for (i, (column, value)) in self.columns.iter().enumerate() {
            names.push(Self::quoted(column)?);
            placeholders.push(format!("${}", i + 1));
            params.push(value.clone());
        }

        Ok(SqlResult {
            query: format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING \"id\"",
                table,
                names.join(", "),
                placeholders.join(", ")
            ),
            params,
        })
    }

    /// UPDATE of a live row; always touches `updated_at`.
    pub fn to_update_sql(&self, table_name: &str, id: i64) -> Result<SqlResult, DatabaseError> {
        let table = Self::quoted(table_name)?;
        let mut assignments = Vec::with_capacity(self.columns.len() + 1);
        let mut params = Vec::with_capacity(self.columns.len() + 1);
        for (i, (column, value)) in self.columns.iter().enumerate() {
            assignments.push(format!("{} = ${}", Self::quoted(column)?, i + 1));
            params.push(value.clone());
        }
        assignments.push("\"updated_at\" = LOCALTIMESTAMP(0)".to_string());
        params.push(SqlParam::Int(id));

        Ok(SqlResult {
            query: format!(
                "UPDATE {} SET {} WHERE \"id\" = ${} AND \"deleted_at\" IS NULL",
                table,
                assignments.join(", "),
                params.len()
            ),
            params,
        })
    }

    pub fn soft_delete_sql(table_name: &str, id: i64) -> Result<SqlResult, DatabaseError> {
        Ok(SqlResult {
            query: format!(
                "UPDATE {} SET \"deleted_at\" = LOCALTIMESTAMP(0), \"updated_at\" = LOCALTIMESTAMP(0) WHERE \"id\" = $1 AND \"deleted_at\" IS NULL",
                Self::quoted(table_name)?
            ),
            params: vec![SqlParam::Int(id)],
        })
    }

    fn quoted(name: &str) -> Result<String, DatabaseError> {
        Filter::validate_column_name(name)?;
        Ok(format!("\"{}\"", name))
    }
}

/// Run an INSERT ... RETURNING "id" on the given connection (usually a transaction).
pub async fn insert_returning_id(conn: &mut PgConnection, sql_result: &SqlResult) -> Result<i64, DatabaseError> {
    let mut q = sqlx::query(&sql_result.query);
    for p in sql_result.params.iter() {
        q = bind_param_query(q, p);
    }
    let row = q.fetch_one(&mut *conn).await?;
    let id: i64 = row.try_get("id")?;
    Ok(id)
}

/// Run a statement and return the number of affected rows.
pub async fn execute(conn: &mut PgConnection, sql_result: &SqlResult) -> Result<u64, DatabaseError> {
    let mut q = sqlx::query(&sql_result.query);
    for p in sql_result.params.iter() {
        q = bind_param_query(q, p);
    }
    let result = q.execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Text(s) => q.bind(s.as_deref()),
        SqlParam::Timestamp(t) => q.bind(*t),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Text(s) => q.bind(s.as_deref()),
        SqlParam::Timestamp(t) => q.bind(*t),
    }
}
