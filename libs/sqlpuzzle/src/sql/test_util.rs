#![cfg(test)]

//! Test assertions to check rendered SQL.

/// Assert that the given fragment renders to the expected SQL with the default configuration.
///
/// # Usage:
/// ```no_run
/// assert_sql!(limit, "LIMIT 10");
/// ```
macro_rules! assert_sql {
    ($actual:expr, $expected:expr) => {
        assert_eq!(
            $crate::sql::ExpressionBuilder::to_sql(&$actual).expect("rendering failed"),
            $expected
        );
    };
}

/// Assert that rendering the given fragment fails with the expected error.
///
/// # Usage:
/// ```no_run
/// assert_sql_err!(table, QueryError::InvalidQuery(_));
/// ```
macro_rules! assert_sql_err {
    ($actual:expr, $pattern:pat) => {
        let result = $crate::sql::ExpressionBuilder::to_sql(&$actual);
        assert!(
            matches!(result, Err($pattern)),
            "Unexpected result: {:?}",
            result
        );
    };
}
