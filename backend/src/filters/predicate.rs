//! Boolean predicate model produced by the filter compiler
//!
//! A [`Predicate`] is a small SQL expression tree. It is rendered to a
//! parameterised fragment (`?` placeholders plus bind values) and plugs into
//! [`EntityQuery`](crate::orm::EntityQuery) through [`DatabaseFilter`].

use std::fmt;

use crate::orm::{DatabaseFilter, SqlValue};

/// Field expression a comparison applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Plain column reference
    Column(String),
    /// `UPPER(expr)`
    Upper(Box<Expr>),
    /// `CAST(expr AS TEXT)`
    Text(Box<Expr>),
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    pub fn upper(self) -> Self {
        Expr::Upper(Box::new(self))
    }

    pub fn as_text(self) -> Self {
        Expr::Text(Box::new(self))
    }

    fn write_sql(&self, out: &mut String) {
        match self {
            Expr::Column(name) => out.push_str(name),
            Expr::Upper(inner) => {
                out.push_str("UPPER(");
                inner.write_sql(out);
                out.push(')');
            }
            Expr::Text(inner) => {
                out.push_str("CAST(");
                inner.write_sql(out);
                out.push_str(" AS TEXT)");
            }
        }
    }
}

/// Binary comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
}

impl CompareOp {
    fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
        }
    }
}

/// Compiled boolean filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Selects everything
    True,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    Compare {
        expr: Expr,
        op: CompareOp,
        value: SqlValue,
    },
    Like {
        expr: Expr,
        pattern: String,
        negated: bool,
    },
    IsNull {
        expr: Expr,
        negated: bool,
    },
    In {
        expr: Expr,
        values: Vec<SqlValue>,
        negated: bool,
    },
    /// Inclusive range
    Between {
        expr: Expr,
        low: SqlValue,
        high: SqlValue,
        negated: bool,
    },
}

impl Predicate {
    pub fn compare(expr: Expr, op: CompareOp, value: impl Into<SqlValue>) -> Self {
        Predicate::Compare {
            expr,
            op,
            value: value.into(),
        }
    }

    /// `expr = value`, or `expr <> value` when negated
    pub fn equal(expr: Expr, value: impl Into<SqlValue>, negated: bool) -> Self {
        let op = if negated { CompareOp::Ne } else { CompareOp::Eq };
        Self::compare(expr, op, value)
    }

    pub fn like(expr: Expr, pattern: impl Into<String>, negated: bool) -> Self {
        Predicate::Like {
            expr,
            pattern: pattern.into(),
            negated,
        }
    }

    pub fn is_null(expr: Expr, negated: bool) -> Self {
        Predicate::IsNull { expr, negated }
    }

    pub fn in_list(expr: Expr, values: Vec<SqlValue>, negated: bool) -> Self {
        Predicate::In {
            expr,
            values,
            negated,
        }
    }

    pub fn between(
        expr: Expr,
        low: impl Into<SqlValue>,
        high: impl Into<SqlValue>,
        negated: bool,
    ) -> Self {
        Predicate::Between {
            expr,
            low: low.into(),
            high: high.into(),
            negated,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// Conjunction; `True` operands are dropped and an empty conjunction is `True`
    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut flat = Vec::new();
        for predicate in predicates {
            match predicate {
                Predicate::True => {}
                Predicate::And(children) => flat.extend(children),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Predicate::True,
            1 => flat.remove(0),
            _ => Predicate::And(flat),
        }
    }

    /// Disjunction; a single operand is returned as is
    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut flat = Vec::new();
        for predicate in predicates {
            match predicate {
                Predicate::Or(children) => flat.extend(children),
                other => flat.push(other),
            }
        }
        if flat.iter().any(Predicate::is_true) {
            return Predicate::True;
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Predicate::Or(flat)
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }

    /// Render to a SQL fragment with `?` placeholders and its bind values
    pub fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::new();
        let mut values = Vec::new();
        self.write_sql(&mut sql, &mut values);
        (sql, values)
    }

    fn write_sql(&self, out: &mut String, values: &mut Vec<SqlValue>) {
        match self {
            Predicate::True => out.push_str("1 = 1"),
            Predicate::And(children) => write_joined(children, " AND ", "1 = 1", out, values),
            Predicate::Or(children) => write_joined(children, " OR ", "1 = 0", out, values),
            Predicate::Not(inner) => {
                out.push_str("NOT (");
                inner.write_sql(out, values);
                out.push(')');
            }
            Predicate::Compare { expr, op, value } => {
                expr.write_sql(out);
                out.push(' ');
                out.push_str(op.as_sql());
                out.push_str(" ?");
                values.push(value.clone());
            }
            Predicate::Like {
                expr,
                pattern,
                negated,
            } => {
                expr.write_sql(out);
                out.push_str(if *negated { " NOT LIKE ?" } else { " LIKE ?" });
                values.push(SqlValue::String(pattern.clone()));
            }
            Predicate::IsNull { expr, negated } => {
                expr.write_sql(out);
                out.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Predicate::In {
                expr,
                values: members,
                negated,
            } => {
                if members.is_empty() {
                    out.push_str(if *negated { "1 = 1" } else { "1 = 0" });
                    return;
                }
                expr.write_sql(out);
                out.push_str(if *negated { " NOT IN (" } else { " IN (" });
                let placeholders: Vec<&str> = members.iter().map(|_| "?").collect();
                out.push_str(&placeholders.join(", "));
                out.push(')');
                values.extend(members.iter().cloned());
            }
            Predicate::Between {
                expr,
                low,
                high,
                negated,
            } => {
                expr.write_sql(out);
                out.push_str(if *negated {
                    " NOT BETWEEN ? AND ?"
                } else {
                    " BETWEEN ? AND ?"
                });
                values.push(low.clone());
                values.push(high.clone());
            }
        }
    }
}

fn write_joined(
    children: &[Predicate],
    separator: &str,
    empty: &str,
    out: &mut String,
    values: &mut Vec<SqlValue>,
) {
    if children.is_empty() {
        out.push_str(empty);
        return;
    }
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            out.push_str(separator);
        }
        let grouped = matches!(child, Predicate::And(_) | Predicate::Or(_));
        if grouped {
            out.push('(');
        }
        child.write_sql(out, values);
        if grouped {
            out.push(')');
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sql, _) = self.to_sql();
        f.write_str(&sql)
    }
}

impl DatabaseFilter for Predicate {
    fn to_sql_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        if self.is_true() {
            return (Vec::new(), Vec::new());
        }
        let (sql, values) = self.to_sql();
        (vec![sql], values)
    }

    fn is_empty(&self) -> bool {
        self.is_true()
    }
}
