use sqlparser::{
    ast::{Expr, Statement},
    dialect::{dialect_from_str, Dialect},
    parser::Parser,
    tokenizer::Token,
};

use crate::{
    config::InserterConfig,
    having::InsertError,
    parser::{IdentifierQuoter, SqlStatement, StructuralParseFailure},
};

/// Parse/generate collaborator used by the structural path.
///
/// Implementations must be stateless between calls; the inserter may share
/// one backend across threads.
pub trait SqlBackend {
    /// Parses a full query.
    fn parse(&self, sql: &str) -> Result<SqlStatement, StructuralParseFailure>;

    /// Parses a single expression, such as a column reference.
    fn parse_expr(&self, text: &str) -> Result<Expr, StructuralParseFailure>;

    /// Regenerates SQL text.
    fn generate(&self, statement: &SqlStatement) -> Result<String, StructuralParseFailure>;
}

/// [`SqlBackend`] over the `sqlparser` crate.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlParserBackend {
    dialect: String,
    identifier_quote: char,
}

impl SqlParserBackend {
    pub fn new(config: &InserterConfig) -> Result<Self, InsertError> {
        config.validate()?;

        Ok(Self {
            dialect: config.dialect.clone(),
            identifier_quote: config.identifier_quote,
        })
    }

    /// PostgreSQL parsing, double-quoted output.
    pub fn postgres() -> Self {
        Self {
            dialect: "postgresql".to_string(),
            identifier_quote: '"',
        }
    }

    pub fn dialect_name(&self) -> &str {
        &self.dialect
    }

    fn dialect(&self) -> Result<Box<dyn Dialect>, StructuralParseFailure> {
        dialect_from_str(&self.dialect)
            .ok_or_else(|| StructuralParseFailure::rejected("Unknown dialect", &self.dialect))
    }

    fn render(&self, mut statement: Statement) -> String {
        IdentifierQuoter::new(self.identifier_quote).apply(&mut statement);
        statement.to_string()
    }
}

impl SqlBackend for SqlParserBackend {
    fn parse(&self, sql: &str) -> Result<SqlStatement, StructuralParseFailure> {
        let dialect = self.dialect()?;

        let statements = Parser::parse_sql(dialect.as_ref(), sql)
            .map_err(|err| StructuralParseFailure::rejected(&err.to_string(), sql))?;

        if statements.is_empty() {
            return StructuralParseFailure::MultipleStatements(0).err();
        }

        Ok(SqlStatement::from_statements(statements))
    }

    fn parse_expr(&self, text: &str) -> Result<Expr, StructuralParseFailure> {
        let dialect = self.dialect()?;

        let mut parser = Parser::new(dialect.as_ref())
            .try_with_sql(text)
            .map_err(|err| StructuralParseFailure::rejected(&err.to_string(), text))?;

        let expr = parser.parse_expr()
            .map_err(|err| StructuralParseFailure::rejected(&err.to_string(), text))?;

        if parser.peek_token().token != Token::EOF {
            return StructuralParseFailure::rejected("Unexpected text after expression", text).err();
        }

        Ok(expr)
    }

    fn generate(&self, statement: &SqlStatement) -> Result<String, StructuralParseFailure> {
        let text = statement.statements()
            .into_iter()
            .map(|statement| self.render(statement))
            .collect::<Vec<_>>()
            .join("; ");

        Ok(text)
    }
}
