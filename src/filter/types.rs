use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
    ILike,
    In,
}

/// A typed bind parameter. Postgres will not coerce a text parameter into a
/// bigint or timestamp column, so every value carries its SQL type.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(Option<String>),
    Timestamp(NaiveDateTime),
}

impl SqlParam {
    pub fn text(value: impl Into<String>) -> Self {
        SqlParam::Text(Some(value.into()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: Vec<SqlParam>,
}

impl FilterWhereInfo {
    pub fn new(column: impl Into<String>, operator: FilterOp, data: SqlParam) -> Self {
        Self { column: column.into(), operator, data: vec![data] }
    }

    pub fn any_of(column: impl Into<String>, data: Vec<SqlParam>) -> Self {
        Self { column: column.into(), operator: FilterOp::In, data }
    }

    /// Condition that can never hold (an empty IN list renders as `1=0`)
    pub fn never(column: impl Into<String>) -> Self {
        Self::any_of(column, vec![])
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterData {
    pub where_clause: Vec<FilterWhereInfo>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct FilterWhereOptions {
    pub include_deleted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
