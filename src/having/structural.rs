use std::borrow::Cow;

use crate::{
    having::{Advisory, ConditionPattern, HavingCondition, HavingInsertion, InsertionPath},
    parser::{contains_default_placeholder, needs_default_normalization, normalize_default_keyword, restore_default_keyword, Predicate, SqlBackend, StructuralParseFailure},
};

/// Parse, mutate the HAVING predicate, regenerate.
///
/// Multi-statement and UNION queries are refused rather than guessing which
/// SELECT the condition belongs to.
pub fn insert_structural<B: SqlBackend>(
    backend: &B,
    query: &str,
    condition: &HavingCondition,
    normalize_default: bool,
) -> Result<HavingInsertion, StructuralParseFailure> {
    let normalize = normalize_default
        && needs_default_normalization(query)
        && !contains_default_placeholder(condition.column());
    let (text, column) = if normalize {
        (normalize_default_keyword(query), normalize_default_keyword(condition.column()))
    } else {
        (Cow::Borrowed(query), Cow::Borrowed(condition.column()))
    };

    let finish = |sql: String| -> String {
        if normalize {
            restore_default_keyword(&sql).into_owned()
        } else {
            sql
        }
    };

    let mut statement = backend.parse(&text)?;
    statement.require_select_mut()?;

    let mut advisories = vec![];
    if !statement.has_group_by() {
        advisories.push(Advisory::MissingGroupBy);
    }

    let leaf = Predicate::comparison(Predicate::column(backend.parse_expr(&column)?), condition);

    if statement.having().is_some() {
        let regenerated = finish(backend.generate(&statement)?);
        if ConditionPattern::new(condition).is_match(&regenerated) {
            return Ok(HavingInsertion::new(regenerated, InsertionPath::Structural)
                .with_advisories(advisories)
                .with_already_present());
        }
    }

    let having = match statement.take_having() {
        Some(existing) => Predicate::conjunction(existing, leaf),
        None => leaf,
    };
    statement.set_having(having.into_expr())?;

    let sql = finish(backend.generate(&statement)?);

    Ok(HavingInsertion::new(sql, InsertionPath::Structural).with_advisories(advisories))
}

#[cfg(test)]
mod tests {
    use crate::{
        having::{insert_structural, Advisory, HavingCondition, InsertionPath},
        parser::{SqlParserBackend, StructuralParseFailure},
    };

    fn condition(column: &str, operator: &str, threshold: f64) -> HavingCondition {
        HavingCondition::new(column, operator, threshold).unwrap()
    }

    #[test]
    pub fn test_structural_fresh_having() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(&backend, "SELECT a, count(*) as c FROM t GROUP BY a", &condition("c", ">", 10.0), true)
            .expect("Failed to insert having");

        assert_eq!(result.sql, r#"SELECT "a", count(*) AS "c" FROM "t" GROUP BY "a" HAVING "c" > 10"#);
        assert_eq!(result.path, InsertionPath::Structural);
        assert!(!result.already_present);
        assert!(result.advisories.is_empty());
    }

    #[test]
    pub fn test_structural_merges_existing_having() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(
            &backend,
            "SELECT a, count(*) as c FROM t GROUP BY a HAVING (c > 1 OR c < 0)",
            &condition("c", "!=", 5.0),
            true,
        ).expect("Failed to insert having");

        assert_eq!(
            result.sql,
            r#"SELECT "a", count(*) AS "c" FROM "t" GROUP BY "a" HAVING ("c" > 1 OR "c" < 0) AND "c" <> 5"#
        );
    }

    #[test]
    pub fn test_structural_parenthesizes_plain_existing_having() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(
            &backend,
            "SELECT a, count(*) as c FROM t GROUP BY a HAVING c > 1",
            &condition("c", "<", 100.0),
            true,
        ).unwrap();

        assert!(result.sql.ends_with(r#"HAVING ("c" > 1) AND "c" < 100"#));
    }

    #[test]
    pub fn test_structural_detects_existing_condition() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(
            &backend,
            "SELECT a, count(*) as c FROM t GROUP BY a HAVING c > 10",
            &condition("c", ">", 10.0),
            true,
        ).unwrap();

        assert!(result.already_present);
        assert_eq!(result.sql, r#"SELECT "a", count(*) AS "c" FROM "t" GROUP BY "a" HAVING "c" > 10"#);
    }

    #[test]
    pub fn test_structural_before_order_by_and_limit() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(
            &backend,
            "SELECT a, count(*) as c FROM t GROUP BY a ORDER BY a LIMIT 10",
            &condition("c", ">=", 3.0),
            true,
        ).unwrap();

        assert_eq!(
            result.sql,
            r#"SELECT "a", count(*) AS "c" FROM "t" GROUP BY "a" HAVING "c" >= 3 ORDER BY "a" LIMIT 10"#
        );
    }

    #[test]
    pub fn test_structural_without_group_by() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(&backend, "SELECT count(*) as c FROM t", &condition("c", ">", 10.0), true).unwrap();

        assert_eq!(result.sql, r#"SELECT count(*) AS "c" FROM "t" HAVING "c" > 10"#);
        assert_eq!(result.advisories, vec![Advisory::MissingGroupBy]);
    }

    #[test]
    pub fn test_structural_qualified_column() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(
            &backend,
            "SELECT t.a, sum(t.b) AS total FROM t GROUP BY t.a",
            &condition("t.total", "<=", 2.5),
            true,
        ).unwrap();

        assert!(result.sql.ends_with(r#"HAVING "t"."total" <= 2.5"#));
    }

    #[test]
    pub fn test_structural_aggregate_column() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(
            &backend,
            "SELECT a FROM t GROUP BY a",
            &condition("count(*)", ">", 3.0),
            true,
        ).unwrap();

        assert!(result.sql.ends_with("HAVING count(*) > 3"));
    }

    #[test]
    pub fn test_structural_default_stream() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(
            &backend,
            "SELECT k8s_namespace_name, count(*) AS c FROM default GROUP BY k8s_namespace_name",
            &condition("c", ">", 1.0),
            true,
        ).unwrap();

        assert_eq!(
            result.sql,
            r#"SELECT "k8s_namespace_name", count(*) AS "c" FROM "default" GROUP BY "k8s_namespace_name" HAVING "c" > 1"#
        );
    }

    #[test]
    pub fn test_structural_refuses_union() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(
            &backend,
            "SELECT a FROM t1 UNION SELECT a FROM t2",
            &condition("c", ">", 1.0),
            true,
        );

        assert_eq!(result, Err(StructuralParseFailure::SetOperation));
    }

    #[test]
    pub fn test_structural_refuses_unparseable() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(&backend, "SELEKT a FROM", &condition("c", ">", 1.0), true);

        match result {
            Err(StructuralParseFailure::Rejected { .. }) => {},
            _ => panic!(),
        }
    }

    #[test]
    pub fn test_structural_refuses_unparseable_column() {
        let backend = SqlParserBackend::postgres();

        let result = insert_structural(&backend, "SELECT a FROM t GROUP BY a", &condition("c d", ">", 1.0), true);

        assert!(result.is_err());
    }

    #[test]
    pub fn test_structural_placeholder_column_is_not_renamed() {
        let backend = SqlParserBackend::postgres();
        let condition = condition("default1", ">", 1.0);

        let result = insert_structural(&backend, "SELECT count(*) c FROM default GROUP BY a", &condition, true);

        if let Ok(insertion) = result {
            assert!(insertion.sql.contains("default1"));
            assert!(!insertion.sql.contains(r#""default" > 1"#));
        }
    }
}
