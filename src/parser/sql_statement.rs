use std::fmt;

use sqlparser::ast::{Expr, GroupByExpr, Query, Select, SetExpr, Statement};

use crate::parser::StructuralParseFailure;

/// What the parse boundary hands to the structural path.
#[derive(Clone, PartialEq)]
pub enum SqlStatement {
    /// A single query whose body is one SELECT.
    Select(Box<Query>),
    /// Anything else: several statements, a UNION, a non-SELECT statement.
    StatementList(Vec<Statement>),
}

impl SqlStatement {
    pub fn from_statements(mut statements: Vec<Statement>) -> Self {
        let single_select = statements.len() == 1 && matches!(
            &statements[0],
            Statement::Query(query) if matches!(query.body.as_ref(), SetExpr::Select(_))
        );

        if single_select {
            if let Some(Statement::Query(query)) = statements.pop() {
                return SqlStatement::Select(query);
            }
        }

        SqlStatement::StatementList(statements)
    }

    pub fn select(&self) -> Option<&Select> {
        match self {
            SqlStatement::Select(query) => match query.body.as_ref() {
                SetExpr::Select(select) => Some(select.as_ref()),
                _ => None,
            },
            SqlStatement::StatementList(_) => None,
        }
    }

    pub fn select_mut(&mut self) -> Option<&mut Select> {
        match self {
            SqlStatement::Select(query) => match query.body.as_mut() {
                SetExpr::Select(select) => Some(select.as_mut()),
                _ => None,
            },
            SqlStatement::StatementList(_) => None,
        }
    }

    /// Borrows the SELECT or explains why there is none.
    pub fn require_select_mut(&mut self) -> Result<&mut Select, StructuralParseFailure> {
        if let SqlStatement::StatementList(statements) = self {
            return StructuralParseFailure::for_statements(statements).err();
        }

        self.select_mut()
            .ok_or_else(|| StructuralParseFailure::UnsupportedStatement("query body".to_string()))
    }

    pub fn has_group_by(&self) -> bool {
        self.select().is_some_and(|select| match &select.group_by {
            GroupByExpr::All(_) => true,
            GroupByExpr::Expressions(exprs, _) => !exprs.is_empty(),
        })
    }

    pub fn having(&self) -> Option<&Expr> {
        self.select().and_then(|select| select.having.as_ref())
    }

    pub fn take_having(&mut self) -> Option<Expr> {
        self.select_mut().and_then(|select| select.having.take())
    }

    pub fn set_having(&mut self, having: Expr) -> Result<(), StructuralParseFailure> {
        self.require_select_mut()?.having = Some(having);
        Ok(())
    }

    pub fn statements(&self) -> Vec<Statement> {
        match self {
            SqlStatement::Select(query) => vec![Statement::Query(query.clone())],
            SqlStatement::StatementList(statements) => statements.clone(),
        }
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlStatement::Select(query) => write!(f, "{}", query),
            SqlStatement::StatementList(statements) => {
                let text = statements.iter().map(|s| s.to_string()).collect::<Vec<_>>().join("; ");
                write!(f, "{}", text)
            },
        }
    }
}

impl fmt::Debug for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlStatement::Select(_) => write!(f, "SqlStatement::Select({})", self),
            SqlStatement::StatementList(statements) => write!(f, "SqlStatement::StatementList({} statements)", statements.len()),
        }
    }
}
