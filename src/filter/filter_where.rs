use super::error::FilterError;
use super::filter::Filter;
use super::types::{FilterOp, FilterWhereInfo, FilterWhereOptions, SqlParam};

pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Render the AND of `conditions` plus the soft-delete guard.
    pub fn generate(
        conditions: &[FilterWhereInfo],
        starting_param_index: usize,
        options: &FilterWhereOptions,
    ) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(conditions, options)
    }

    fn build(
        &mut self,
        conditions: &[FilterWhereInfo],
        options: &FilterWhereOptions,
    ) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut sql_conditions = vec![];
        if !options.include_deleted {
            sql_conditions.push("\"deleted_at\" IS NULL".to_string());
        }
        for condition in conditions {
            sql_conditions.push(self.build_sql_condition(condition)?);
        }
        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, std::mem::take(&mut self.param_values)))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        Filter::validate_column_name(&condition.column)?;
        let quoted_column = format!("\"{}\"", condition.column);

        if condition.operator == FilterOp::In {
            if condition.data.is_empty() {
                return Ok("1=0".to_string());
            }
            let params: Vec<String> = condition.data.iter().map(|v| self.param(v.clone())).collect();
            return Ok(format!("{} IN ({})", quoted_column, params.join(", ")));
        }

        let value = match condition.data.as_slice() {
            [value] => value.clone(),
            _ => {
                return Err(FilterError::InvalidOperatorData(format!(
                    "{:?} on {} requires exactly one value",
                    condition.operator, condition.column
                )))
            }
        };

        Ok(match condition.operator {
            FilterOp::Eq => match value {
                SqlParam::Text(None) => format!("{} IS NULL", quoted_column),
                value => format!("{} = {}", quoted_column, self.param(value)),
            },
            FilterOp::Gte => format!("{} >= {}", quoted_column, self.param(value)),
            FilterOp::Lte => format!("{} <= {}", quoted_column, self.param(value)),
            FilterOp::ILike => format!("{} ILIKE {}", quoted_column, self.param(value)),
            FilterOp::In => unreachable!("handled above"),
        })
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
