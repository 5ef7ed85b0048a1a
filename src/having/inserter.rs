use crate::{
    config::InserterConfig,
    having::{insert_structural, insert_textual, HavingCondition, HavingInsertion, InsertError},
    parser::{SqlBackend, SqlParserBackend},
};

/// Adds threshold conditions to the HAVING clause of SQL queries.
///
/// Inputs are validated up front; once they are accepted a query string is
/// always returned. The structural path (parse, mutate, regenerate) is tried
/// first and any failure there downgrades silently to textual splicing.
#[derive(Debug, Clone)]
pub struct HavingClauseInserter<B: SqlBackend = SqlParserBackend> {
    backend: B,
    config: InserterConfig,
}

impl HavingClauseInserter {
    pub fn new(config: InserterConfig) -> Result<Self, InsertError> {
        let backend = SqlParserBackend::new(&config)?;
        Ok(Self { backend, config })
    }

    /// PostgreSQL parsing with double-quoted output.
    pub fn postgres() -> Self {
        Self {
            backend: SqlParserBackend::postgres(),
            config: InserterConfig::postgres(),
        }
    }
}

impl Default for HavingClauseInserter {
    fn default() -> Self {
        Self::postgres()
    }
}

impl<B: SqlBackend> HavingClauseInserter<B> {
    pub fn with_backend(backend: B, config: InserterConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &InserterConfig {
        &self.config
    }

    /// Returns `query` with `column operator threshold` ANDed into its HAVING
    /// clause, creating the clause when there is none.
    pub fn add_having_condition(&self, query: &str, column: &str, operator: &str, threshold: f64) -> Result<String, InsertError> {
        validate_query(query)?;
        let condition = HavingCondition::new(column, operator, threshold)?;

        self.insert(query, &condition).map(|insertion| insertion.sql)
    }

    /// Same as [`add_having_condition`](Self::add_having_condition) with a
    /// prebuilt condition, reporting how the insertion went.
    pub fn insert(&self, query: &str, condition: &HavingCondition) -> Result<HavingInsertion, InsertError> {
        validate_query(query)?;

        let insertion = match insert_structural(&self.backend, query, condition, self.config.normalize_default_keyword) {
            Ok(insertion) => insertion,
            Err(failure) => {
                tracing::debug!(reason = %failure, condition = %condition, "structural HAVING insertion failed, splicing text");
                insert_textual(query, condition)
            },
        };

        for advisory in insertion.advisories.iter() {
            advisory.emit(condition);
        }

        if insertion.already_present {
            tracing::debug!(condition = %condition, path = ?insertion.path, "HAVING condition already present");
        }

        Ok(insertion)
    }

    /// Applies every condition in order, each one to the previous result.
    pub fn insert_all(&self, query: &str, conditions: &[HavingCondition]) -> Result<String, InsertError> {
        validate_query(query)?;

        conditions.iter().try_fold(query.to_string(), |sql, condition| {
            self.insert(&sql, condition).map(|insertion| insertion.sql)
        })
    }
}

fn validate_query(query: &str) -> Result<(), InsertError> {
    if query.trim().is_empty() {
        return InsertError::invalid("Query must not be empty").err();
    }
    Ok(())
}

/// [`HavingClauseInserter::add_having_condition`] with the default
/// PostgreSQL inserter.
pub fn add_having_condition(query: &str, column: &str, operator: &str, threshold: f64) -> Result<String, InsertError> {
    HavingClauseInserter::postgres().add_having_condition(query, column, operator, threshold)
}

#[cfg(test)]
mod tests {
    use sqlparser::ast::Expr;

    use crate::{
        config::InserterConfig,
        having::{add_having_condition, HavingClauseInserter, HavingCondition, InsertError, InsertionPath},
        parser::{SqlBackend, SqlParserBackend, SqlStatement, StructuralParseFailure},
    };

    /// Parses like the real backend but can never regenerate.
    struct BrokenGenerator(SqlParserBackend);

    impl SqlBackend for BrokenGenerator {
        fn parse(&self, sql: &str) -> Result<SqlStatement, StructuralParseFailure> {
            self.0.parse(sql)
        }

        fn parse_expr(&self, text: &str) -> Result<Expr, StructuralParseFailure> {
            self.0.parse_expr(text)
        }

        fn generate(&self, _statement: &SqlStatement) -> Result<String, StructuralParseFailure> {
            StructuralParseFailure::Generate("generator unavailable".to_string()).err()
        }
    }

    #[test]
    pub fn test_inserter_structural() {
        let inserter = HavingClauseInserter::postgres();

        let sql = inserter.add_having_condition("SELECT a, count(*) as c FROM t GROUP BY a", "c", ">", 10.0)
            .expect("Failed to add having");

        assert_eq!(sql, r#"SELECT "a", count(*) AS "c" FROM "t" GROUP BY "a" HAVING "c" > 10"#);
    }

    #[test]
    pub fn test_inserter_validation() {
        let inserter = HavingClauseInserter::postgres();

        match inserter.add_having_condition("   ", "c", ">", 5.0) {
            Ok(_) => panic!(),
            Err(InsertError::InvalidInput(message)) => assert_eq!(message, "Query must not be empty"),
        }
        assert!(inserter.add_having_condition("SELECT 1", "c", "BETWEEN", 5.0).is_err());
        assert!(inserter.add_having_condition("SELECT 1", "c", ">", f64::NAN).is_err());
        assert!(inserter.add_having_condition("SELECT 1", "", ">", 5.0).is_err());
    }

    #[test]
    pub fn test_inserter_falls_back_when_generator_fails() {
        let inserter = HavingClauseInserter::with_backend(BrokenGenerator(SqlParserBackend::postgres()), InserterConfig::new());
        let condition = HavingCondition::new("c", ">", 10.0).unwrap();

        let insertion = inserter.insert("SELECT a, count(*) as c FROM t GROUP BY a", &condition)
            .expect("Failed to add having");

        assert_eq!(insertion.path, InsertionPath::Fallback);
        assert_eq!(insertion.sql, "SELECT a, count(*) as c FROM t GROUP BY a HAVING c > 10");
    }

    #[test]
    pub fn test_inserter_falls_back_for_union() {
        let inserter = HavingClauseInserter::postgres();
        let condition = HavingCondition::new("c", "<=", 3.0).unwrap();

        let insertion = inserter.insert("SELECT a FROM t1 UNION ALL SELECT a FROM t2 LIMIT 100", &condition).unwrap();

        assert_eq!(insertion.path, InsertionPath::Fallback);
        assert_eq!(insertion.sql, "SELECT a FROM t1 UNION ALL SELECT a FROM t2 HAVING c <= 3 LIMIT 100");
    }

    #[test]
    pub fn test_inserter_insert_all() {
        let inserter = HavingClauseInserter::postgres();
        let conditions = vec![
            HavingCondition::new("c", ">", 1.0).unwrap(),
            HavingCondition::new("c", "<", 100.0).unwrap(),
            HavingCondition::new("c", ">", 1.0).unwrap(),
        ];

        let sql = inserter.insert_all("SELECT a, count(*) AS c FROM t GROUP BY a", &conditions).unwrap();

        assert_eq!(sql, r#"SELECT "a", count(*) AS "c" FROM "t" GROUP BY "a" HAVING ("c" > 1) AND "c" < 100"#);
    }

    #[test]
    pub fn test_inserter_insert_all_empty() {
        let inserter = HavingClauseInserter::postgres();

        assert_eq!(inserter.insert_all("SELECT a FROM t", &[]).unwrap(), "SELECT a FROM t");
        assert!(inserter.insert_all("", &[]).is_err());
    }

    #[test]
    pub fn test_inserter_from_config() {
        let config = InserterConfig::from("generic", '"').with_default_keyword_normalization(false);

        let inserter = HavingClauseInserter::new(config.clone()).expect("Failed to build inserter");

        assert_eq!(inserter.config(), &config);
        assert!(HavingClauseInserter::new(InserterConfig::from("nosql", '"')).is_err());
    }

    #[test]
    pub fn test_free_function() {
        let sql = add_having_condition("SELECT count(*) as c FROM t", "c", ">", 10.0).unwrap();

        assert_eq!(sql, r#"SELECT count(*) AS "c" FROM "t" HAVING "c" > 10"#);
    }

    #[test]
    pub fn test_inserter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HavingClauseInserter>();
    }
}
