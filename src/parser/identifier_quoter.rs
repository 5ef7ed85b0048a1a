use std::ops::ControlFlow;

use sqlparser::ast::{Expr, Ident, ObjectName, Query, SelectItem, SetExpr, TableFactor, VisitMut, VisitorMut};

/// Rewrites identifiers to a single quote style so regenerated SQL reads
/// the same no matter how the caller wrote it.
///
/// Touches column references, select and table aliases, CTE names and
/// table names. Function names are left alone.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierQuoter {
    quote: char,
}

impl IdentifierQuoter {
    pub fn new(quote: char) -> Self {
        Self { quote }
    }

    pub fn apply<T: VisitMut>(&mut self, node: &mut T) {
        let _ = node.visit(self);
    }

    fn quote(&self, ident: &mut Ident) {
        ident.quote_style = Some(self.quote);
    }

    fn quote_set_expr(&self, body: &mut SetExpr) {
        match body {
            SetExpr::Select(select) => {
                for item in select.projection.iter_mut() {
                    if let SelectItem::ExprWithAlias { alias, .. } = item {
                        self.quote(alias);
                    }
                }
            },
            SetExpr::SetOperation { left, right, .. } => {
                self.quote_set_expr(left);
                self.quote_set_expr(right);
            },
            _ => {},
        }
    }
}

impl VisitorMut for IdentifierQuoter {
    type Break = ();

    fn pre_visit_query(&mut self, query: &mut Query) -> ControlFlow<Self::Break> {
        if let Some(with) = query.with.as_mut() {
            for cte in with.cte_tables.iter_mut() {
                self.quote(&mut cte.alias.name);
            }
        }
        self.quote_set_expr(query.body.as_mut());
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &mut ObjectName) -> ControlFlow<Self::Break> {
        for ident in relation.0.iter_mut() {
            self.quote(ident);
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_table_factor(&mut self, table_factor: &mut TableFactor) -> ControlFlow<Self::Break> {
        match table_factor {
            TableFactor::Table { alias: Some(alias), .. } | TableFactor::Derived { alias: Some(alias), .. } => {
                self.quote(&mut alias.name);
            },
            _ => {},
        }
        ControlFlow::Continue(())
    }

    fn post_visit_expr(&mut self, expr: &mut Expr) -> ControlFlow<Self::Break> {
        match expr {
            Expr::Identifier(ident) => self.quote(ident),
            Expr::CompoundIdentifier(idents) => {
                for ident in idents.iter_mut() {
                    self.quote(ident);
                }
            },
            _ => {},
        }
        ControlFlow::Continue(())
    }
}
