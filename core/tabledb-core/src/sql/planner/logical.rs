//! SQL 논리 플래너
//!
//! sqlparser AST → [`LogicalPlan`]. The planner borrows the catalog so that
//! literals can be typed for their destination columns before they reach the
//! engine.

use crate::catalog::{Catalog, Column, Row, Table};
use crate::error::{TdbError, TdbResult};
use crate::sql::planner::types::LogicalPlan;
use crate::sql::predicate::{
    Assignment, CompareOp, Connective, JoinPredicate, Predicate, Projection,
};
use crate::value::{DataType, Value};
use sqlparser::ast::{
    BinaryOperator as SqlBinaryOp, Expr as SqlExpr, FromTable, GroupByExpr, JoinConstraint,
    JoinOperator, Query, Select, SelectItem, SetExpr, Statement, TableFactor, TableWithJoins,
    UnaryOperator, Value as SqlValue,
};
use tracing::debug;

/// SQL 비교 연산자 → CompareOp 변환
pub fn convert_compare_op(op: &SqlBinaryOp) -> TdbResult<CompareOp> {
    match op {
        SqlBinaryOp::Eq => Ok(CompareOp::Eq),
        SqlBinaryOp::NotEq => Ok(CompareOp::NotEq),
        SqlBinaryOp::Gt => Ok(CompareOp::Gt),
        SqlBinaryOp::Lt => Ok(CompareOp::Lt),
        SqlBinaryOp::GtEq => Ok(CompareOp::GtEq),
        SqlBinaryOp::LtEq => Ok(CompareOp::LtEq),
        other => Err(not_supported(
            format!("operator {other}"),
            "use =, !=, <>, >, <, >= or <=",
        )),
    }
}

/// SQL 리터럴 → Value 변환 (`-` 단항 연산 포함)
pub fn convert_literal(expr: &SqlExpr) -> TdbResult<Value> {
    match expr {
        SqlExpr::Value(SqlValue::Number(n, _)) => {
            if let Ok(i) = n.parse::<i64>() {
                Ok(Value::Integer(i))
            } else if let Ok(f) = n.parse::<f64>() {
                Ok(Value::Float(f))
            } else {
                Err(TdbError::Schema(format!("invalid number: {n}")))
            }
        }
        SqlExpr::Value(SqlValue::SingleQuotedString(s))
        | SqlExpr::Value(SqlValue::DoubleQuotedString(s)) => Ok(Value::Text(s.clone())),
        SqlExpr::UnaryOp {
            op: UnaryOperator::Minus,
            expr,
        } => match convert_literal(expr)? {
            Value::Integer(i) => Ok(Value::Integer(-i)),
            Value::Float(f) => Ok(Value::Float(-f)),
            Value::Text(_) => Err(not_supported("negated string literal", "remove the '-'")),
        },
        SqlExpr::UnaryOp {
            op: UnaryOperator::Plus,
            expr,
        } => convert_literal(expr),
        SqlExpr::Nested(inner) => convert_literal(inner),
        other => Err(not_supported(
            format!("expression {other}"),
            "only integer, float and quoted string literals are supported",
        )),
    }
}

/// 논리 플랜 빌더 — AST → LogicalPlan 변환
pub struct LogicalPlanner<'a> {
    catalog: &'a Catalog,
}

impl<'a> LogicalPlanner<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// SQL Statement → LogicalPlan 변환
    pub fn plan(&self, statement: &Statement) -> TdbResult<LogicalPlan> {
        match statement {
            Statement::CreateTable(create_table) => {
                if !create_table.constraints.is_empty() {
                    return Err(not_supported(
                        "table-level constraints",
                        "declare PRIMARY KEY on the column itself",
                    ));
                }
                let columns = create_table
                    .columns
                    .iter()
                    .map(|col| {
                        let type_str = col.data_type.to_string();
                        let data_type = DataType::from_sql_name(&type_str).ok_or_else(|| {
                            TdbError::Schema(format!(
                                "unsupported type '{type_str}' for column '{}'",
                                col.name.value
                            ))
                        })?;
                        let indexed = col.options.iter().any(|opt| {
                            opt.option
                                .to_string()
                                .to_uppercase()
                                .contains("PRIMARY KEY")
                        });
                        Ok(Column {
                            name: col.name.value.clone(),
                            data_type,
                            indexed,
                        })
                    })
                    .collect::<TdbResult<Vec<_>>>()?;
                Ok(LogicalPlan::CreateTable {
                    table: create_table.name.to_string(),
                    columns,
                })
            }
            Statement::Insert(insert) => self.plan_insert(insert),
            Statement::Query(query) => self.plan_query(query),
            Statement::Update {
                table,
                assignments,
                selection,
                ..
            } => {
                let table_name = relation_name(&table.relation)?;
                let schema = self.catalog.table(&table_name)?;

                let mut planned = Vec::with_capacity(assignments.len());
                for assignment in assignments {
                    let column = assignment.target.to_string();
                    let raw = convert_literal(&assignment.value)?;
                    // unknown columns are reported by the engine
                    let value = match schema.column_index(&column) {
                        Some(idx) => coerce_for(&schema.columns()[idx], raw)?,
                        None => raw,
                    };
                    planned.push(Assignment { column, value });
                }

                let predicates = self.plan_where(selection.as_ref(), &[schema])?;
                Ok(LogicalPlan::Update {
                    table: table_name,
                    assignments: planned,
                    predicates,
                })
            }
            Statement::Delete(delete) => {
                let tables = match &delete.from {
                    FromTable::WithFromKeyword(t) | FromTable::WithoutKeyword(t) => t,
                };
                if tables.len() != 1 || !tables[0].joins.is_empty() {
                    return Err(not_supported(
                        "multi-table DELETE",
                        "delete from one table at a time",
                    ));
                }
                let table_name = relation_name(&tables[0].relation)?;
                let schema = self.catalog.table(&table_name)?;
                let predicates = self.plan_where(delete.selection.as_ref(), &[schema])?;
                Ok(LogicalPlan::Delete {
                    table: table_name,
                    predicates,
                })
            }
            other => {
                let text = other.to_string();
                let keyword: Vec<&str> = text.split_whitespace().take(2).collect();
                Err(not_supported(
                    format!("statement {}", keyword.join(" ")),
                    "supported: CREATE TABLE, INSERT, SELECT, UPDATE, DELETE",
                ))
            }
        }
    }

    /// INSERT INTO → LogicalPlan 변환
    fn plan_insert(&self, insert: &sqlparser::ast::Insert) -> TdbResult<LogicalPlan> {
        let table_name = insert.table_name.to_string();
        let table = self.catalog.table(&table_name)?;

        // schema position of each VALUES slot
        let slots: Vec<usize> = if insert.columns.is_empty() {
            (0..table.columns().len()).collect()
        } else {
            let mut slots = Vec::with_capacity(insert.columns.len());
            for ident in &insert.columns {
                let idx = table.require_column(&ident.value)?;
                if slots.contains(&idx) {
                    return Err(TdbError::Schema(format!(
                        "column '{}' listed twice",
                        ident.value
                    )));
                }
                slots.push(idx);
            }
            if let Some(missing) = table
                .columns()
                .iter()
                .enumerate()
                .find(|(i, _)| !slots.contains(i))
            {
                return Err(TdbError::Schema(format!(
                    "no value for column '{}'; every column must be supplied",
                    missing.1.name
                )));
            }
            slots
        };

        let source = insert.source.as_ref().ok_or_else(|| {
            not_supported("INSERT without VALUES", "INSERT INTO ... VALUES (...) is required")
        })?;
        let SetExpr::Values(values) = source.body.as_ref() else {
            return Err(not_supported(
                "INSERT with SELECT",
                "only INSERT INTO ... VALUES (...) is supported",
            ));
        };

        let mut rows: Vec<Row> = Vec::with_capacity(values.rows.len());
        for exprs in &values.rows {
            if exprs.len() != slots.len() {
                return Err(TdbError::ColumnCountMismatch {
                    table: table_name.clone(),
                    expected: slots.len(),
                    actual: exprs.len(),
                });
            }
            let mut row: Vec<Option<Value>> = vec![None; slots.len()];
            for (expr, &idx) in exprs.iter().zip(&slots) {
                let value = convert_literal(expr)?;
                row[idx] = Some(coerce_for(&table.columns()[idx], value)?);
            }
            rows.push(row.into_iter().flatten().collect());
        }

        Ok(LogicalPlan::Insert {
            table: table_name,
            rows,
        })
    }

    fn plan_query(&self, query: &Query) -> TdbResult<LogicalPlan> {
        if query.order_by.is_some() {
            return Err(not_supported("ORDER BY", "rows come back in storage order"));
        }
        if query.limit.is_some() || query.offset.is_some() {
            return Err(not_supported("LIMIT/OFFSET", "filter with WHERE instead"));
        }
        match query.body.as_ref() {
            SetExpr::Select(select) => self.plan_select(select),
            _ => Err(not_supported(
                "non-SELECT query body",
                "only plain SELECT queries are supported",
            )),
        }
    }

    /// SELECT → LogicalPlan 변환
    fn plan_select(&self, select: &Select) -> TdbResult<LogicalPlan> {
        if select.distinct.is_some() {
            return Err(not_supported("DISTINCT", "remove DISTINCT"));
        }
        if select.having.is_some()
            || !matches!(&select.group_by, GroupByExpr::Expressions(exprs, _) if exprs.is_empty())
        {
            return Err(not_supported("GROUP BY/HAVING", "aggregation is not available"));
        }

        let from = self.plan_from(&select.from)?;
        let projection = plan_projection(&select.projection)?;

        match from {
            (left, None) => {
                let table = self.catalog.table(&left)?;
                let predicates = self.plan_where(select.selection.as_ref(), &[table])?;
                Ok(LogicalPlan::Select {
                    table: left,
                    projection,
                    predicates,
                })
            }
            (left, Some((right, on))) => {
                let left_table = self.catalog.table(&left)?;
                let right_table = self.catalog.table(&right)?;
                let predicates =
                    self.plan_where(select.selection.as_ref(), &[left_table, right_table])?;
                Ok(LogicalPlan::Join {
                    left,
                    right,
                    on,
                    predicates,
                    projection,
                })
            }
        }
    }

    /// FROM 절 → (left table, optional (right table, join predicate))
    fn plan_from(
        &self,
        from: &[TableWithJoins],
    ) -> TdbResult<(String, Option<(String, JoinPredicate)>)> {
        let [table_with_joins] = from else {
            return Err(if from.is_empty() {
                TdbError::Schema("FROM clause is required".to_string())
            } else {
                not_supported("multiple tables in FROM clause", "use JOIN ... ON")
            });
        };

        let left = relation_name(&table_with_joins.relation)?;
        let join = match table_with_joins.joins.as_slice() {
            [] => return Ok((left, None)),
            [join] => join,
            _ => {
                return Err(not_supported(
                    "joins over more than two tables",
                    "join two tables per query",
                ));
            }
        };

        let right = relation_name(&join.relation)?;
        let on_expr = match &join.join_operator {
            JoinOperator::Inner(JoinConstraint::On(expr)) => expr,
            JoinOperator::Inner(_) => {
                return Err(not_supported(
                    "JOIN without ON",
                    "use JOIN ... ON a.x = b.y",
                ));
            }
            other => {
                return Err(not_supported(
                    format!("JOIN type {other:?}"),
                    "only INNER JOIN is supported",
                ));
            }
        };
        let on = join_predicate(on_expr, &left, &right)?;
        Ok((left, Some((right, on))))
    }

    /// WHERE → left-fold predicate list (source order, no precedence)
    fn plan_where(&self, selection: Option<&SqlExpr>, schemas: &[&Table]) -> TdbResult<Vec<Predicate>> {
        let mut predicates = Vec::new();
        if let Some(expr) = selection {
            flatten_where(expr, Connective::And, schemas, &mut predicates)?;
        }
        debug!(count = predicates.len(), "planned WHERE predicates");
        Ok(predicates)
    }
}

fn flatten_where(
    expr: &SqlExpr,
    connective: Connective,
    schemas: &[&Table],
    out: &mut Vec<Predicate>,
) -> TdbResult<()> {
    match expr {
        SqlExpr::BinaryOp { left, op, right } if logical_connective(op).is_some() => {
            flatten_where(left, connective, schemas, out)?;
            let joined_by = logical_connective(op).unwrap_or_default();
            flatten_where(right, joined_by, schemas, out)
        }
        SqlExpr::Nested(inner) => {
            if is_logical(inner) {
                return Err(not_supported(
                    "parenthesised AND/OR groups",
                    "conditions combine strictly left to right; remove the parentheses",
                ));
            }
            flatten_where(inner, connective, schemas, out)
        }
        SqlExpr::BinaryOp { left, op, right } => {
            let op = convert_compare_op(op)?;
            let (column, op, raw) = match (column_ref(left), column_ref(right)) {
                (Some(column), None) => (column, op, convert_literal(right)?),
                (None, Some(column)) => (column, op.mirrored(), convert_literal(left)?),
                _ => {
                    return Err(not_supported(
                        format!("comparison {expr}"),
                        "compare a column with a literal",
                    ));
                }
            };
            let value = match schemas.iter().find_map(|t| {
                t.column_index(&column).map(|i| t.columns()[i].data_type)
            }) {
                Some(data_type) => raw.coerce_to(data_type).unwrap_or(raw),
                None => raw,
            };
            out.push(Predicate {
                column,
                op,
                value,
                connective,
            });
            Ok(())
        }
        other => Err(not_supported(
            format!("WHERE expression {other}"),
            "use column <op> literal joined by AND/OR",
        )),
    }
}

fn logical_connective(op: &SqlBinaryOp) -> Option<Connective> {
    match op {
        SqlBinaryOp::And => Some(Connective::And),
        SqlBinaryOp::Or => Some(Connective::Or),
        _ => None,
    }
}

fn is_logical(expr: &SqlExpr) -> bool {
    match expr {
        SqlExpr::BinaryOp { op, .. } => logical_connective(op).is_some(),
        SqlExpr::Nested(inner) => is_logical(inner),
        _ => false,
    }
}

/// Column name of an identifier; the table qualifier is dropped.
fn column_ref(expr: &SqlExpr) -> Option<String> {
    match expr {
        SqlExpr::Identifier(ident) => Some(ident.value.clone()),
        SqlExpr::CompoundIdentifier(idents) => idents.last().map(|i| i.value.clone()),
        SqlExpr::Nested(inner) => column_ref(inner),
        _ => None,
    }
}

/// `(table, column)` of an identifier, `default_table` when unqualified.
fn qualified_ref(expr: &SqlExpr, default_table: &str) -> Option<(String, String)> {
    match expr {
        SqlExpr::Identifier(ident) => Some((default_table.to_string(), ident.value.clone())),
        SqlExpr::CompoundIdentifier(idents) => match idents.as_slice() {
            [table, column] => Some((table.value.clone(), column.value.clone())),
            [column] => Some((default_table.to_string(), column.value.clone())),
            _ => None,
        },
        SqlExpr::Nested(inner) => qualified_ref(inner, default_table),
        _ => None,
    }
}

/// ON 절 → JoinPredicate. Only the first equality of an AND chain is used.
fn join_predicate(expr: &SqlExpr, left: &str, right: &str) -> TdbResult<JoinPredicate> {
    match expr {
        SqlExpr::Nested(inner) => join_predicate(inner, left, right),
        SqlExpr::BinaryOp {
            left: first,
            op: SqlBinaryOp::And,
            ..
        } => {
            debug!("multi-condition ON clause; using the first equality only");
            join_predicate(first, left, right)
        }
        SqlExpr::BinaryOp {
            left: l,
            op: SqlBinaryOp::Eq,
            right: r,
        } => {
            let (Some((lt, lc)), Some((rt, rc))) = (qualified_ref(l, left), qualified_ref(r, right))
            else {
                return Err(not_supported(
                    format!("join condition {expr}"),
                    "join on a.column = b.column",
                ));
            };
            Ok(JoinPredicate::new(lt, lc, rt, rc))
        }
        other => Err(not_supported(
            format!("join condition {other}"),
            "only equi-joins (a.x = b.y) are supported",
        )),
    }
}

fn plan_projection(items: &[SelectItem]) -> TdbResult<Projection> {
    let mut columns = Vec::with_capacity(items.len());
    for item in items {
        match item {
            SelectItem::Wildcard(_) => return Ok(Projection::All),
            SelectItem::UnnamedExpr(SqlExpr::Identifier(ident)) => columns.push(ident.value.clone()),
            SelectItem::UnnamedExpr(SqlExpr::CompoundIdentifier(idents)) => columns.push(
                idents
                    .iter()
                    .map(|i| i.value.as_str())
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            other => {
                return Err(not_supported(
                    format!("SELECT item {other}"),
                    "select * or plain column names",
                ));
            }
        }
    }
    Ok(Projection::Columns(columns))
}

fn relation_name(relation: &TableFactor) -> TdbResult<String> {
    match relation {
        TableFactor::Table { name, .. } => Ok(name.to_string()),
        _ => Err(not_supported(
            "complex table expressions",
            "use simple table names only",
        )),
    }
}

fn coerce_for(column: &Column, value: Value) -> TdbResult<Value> {
    value
        .coerce_to(column.data_type)
        .map_err(|_| TdbError::TypeMismatch {
            column: column.name.clone(),
            expected: column.data_type.to_string(),
            actual: format!("{} '{value}'", value.data_type()),
        })
}

fn not_supported(feature: impl Into<String>, hint: impl Into<String>) -> TdbError {
    TdbError::SqlNotSupported {
        feature: feature.into(),
        hint: hint.into(),
    }
}
