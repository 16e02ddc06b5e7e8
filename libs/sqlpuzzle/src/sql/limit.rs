// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::QueryError;

use super::{ArgValue, Clause, ExpressionBuilder, SQLBuilder, SqlValue};

/// `LIMIT <limit> [OFFSET <offset>]`. The clause is set only when a limit is; an offset alone is
/// kept but not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit {
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Limit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limit. `NULL` (or `None`) clears both the limit and the offset; anything other than
    /// a non-negative integer is rejected.
    pub fn limit(&mut self, limit: impl Into<ArgValue>) -> Result<&mut Self, QueryError> {
        match non_negative(limit.into(), "limit")? {
            Some(limit) => self.limit = Some(limit),
            None => *self = Self::default(),
        }
        Ok(self)
    }

    /// Set the limit and, unless it is `NULL`, the offset. A cleared limit ignores the offset.
    pub fn limit_offset(
        &mut self,
        limit: impl Into<ArgValue>,
        offset: impl Into<ArgValue>,
    ) -> Result<&mut Self, QueryError> {
        let limit = non_negative(limit.into(), "limit")?;
        let offset = non_negative(offset.into(), "offset")?;
        match limit {
            Some(limit) => {
                self.limit = Some(limit);
                if offset.is_some() {
                    self.offset = offset;
                }
            }
            None => *self = Self::default(),
        }
        Ok(self)
    }

    /// Set the offset. `NULL` (or `None`) clears just the offset.
    pub fn offset(&mut self, offset: impl Into<ArgValue>) -> Result<&mut Self, QueryError> {
        self.offset = non_negative(offset.into(), "offset")?;
        Ok(self)
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<u64> {
        self.offset
    }
}

fn non_negative(value: ArgValue, what: &str) -> Result<Option<u64>, QueryError> {
    match value {
        ArgValue::Value(SqlValue::Null) => Ok(None),
        ArgValue::Value(SqlValue::Integer(n)) => u64::try_from(n).map(Some).map_err(|_| {
            QueryError::invalid_argument(format!("The {what} must not be negative, got {n}."))
        }),
        other => Err(QueryError::invalid_argument(format!(
            "The {what} must be an integer, got {:?}.",
            other.kind()
        ))),
    }
}

impl ExpressionBuilder for Limit {
    /// Build expression of the form `LIMIT <limit> [OFFSET <offset>]`
    fn build(&self, builder: &mut SQLBuilder) -> Result<(), QueryError> {
        if let Some(limit) = self.limit {
            builder.push_str(format!("LIMIT {limit}"));
            if let Some(offset) = self.offset {
                builder.push_str(format!(" OFFSET {offset}"));
            }
        }
        Ok(())
    }
}

impl Clause for Limit {
    fn is_set(&self) -> bool {
        self.limit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit() {
        let mut limit = Limit::new();
        limit.limit(10).unwrap();
        assert_sql!(limit, "LIMIT 10");
    }

    #[test]
    fn offset() {
        let mut limit = Limit::new();
        limit.limit(10).unwrap();
        limit.offset(50).unwrap();
        assert_sql!(limit, "LIMIT 10 OFFSET 50");
    }

    #[test]
    fn limit_offset() {
        let mut limit = Limit::new();
        limit.limit_offset(5, 15).unwrap();
        assert_sql!(limit, "LIMIT 5 OFFSET 15");
    }

    #[test]
    fn inline() {
        let mut limit = Limit::new();
        limit.limit(3).unwrap().offset(12).unwrap();
        assert_sql!(limit, "LIMIT 3 OFFSET 12");

        let mut limit = Limit::new();
        limit.offset(16).unwrap().limit(4).unwrap();
        assert_sql!(limit, "LIMIT 4 OFFSET 16");
    }

    #[test]
    fn clear() {
        let mut limit = Limit::new();
        limit.limit_offset(10, 20).unwrap();
        limit.limit(None::<i64>).unwrap();
        assert!(!limit.is_set());
        assert_eq!(limit, Limit::default());
        assert_sql!(limit, "");

        limit.limit(10).unwrap().offset(20).unwrap();
        limit.offset(SqlValue::Null).unwrap();
        assert_sql!(limit, "LIMIT 10");
    }

    #[test]
    fn offset_without_limit() {
        let mut limit = Limit::new();
        limit.offset(20).unwrap();
        assert!(!limit.is_set());
        assert_eq!(limit.get_limit(), None);
        assert_eq!(limit.get_offset(), Some(20));

        // A cleared limit ignores the offset
        limit.limit_offset(None::<i64>, 30).unwrap();
        assert_eq!(limit.get_offset(), None);
    }

    #[test]
    fn invalid_values() {
        let mut limit = Limit::new();
        assert!(matches!(
            limit.limit(1.5),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(matches!(
            limit.limit("10"),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(matches!(
            limit.limit(true),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(matches!(
            limit.limit(-1),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(matches!(
            limit.offset(2.0),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(!limit.is_set());
    }

    #[test]
    fn invalid_offset_keeps_previous_state() {
        let mut limit = Limit::new();
        assert!(matches!(
            limit.limit_offset(10, "x"),
            Err(QueryError::InvalidArgument(_))
        ));
        assert_eq!(limit, Limit::default());

        limit.limit_offset(5, 15).unwrap();
        assert!(matches!(
            limit.limit_offset(10, -1),
            Err(QueryError::InvalidArgument(_))
        ));
        assert_sql!(limit, "LIMIT 5 OFFSET 15");
    }

    #[test]
    fn unsigned_values() {
        let mut limit = Limit::new();
        limit
            .limit_offset(
                SqlValue::try_from(25usize).unwrap(),
                SqlValue::try_from(i64::MAX as u64).unwrap(),
            )
            .unwrap();
        assert_eq!(limit.get_limit(), Some(25));
        assert_sql!(limit, format!("LIMIT 25 OFFSET {}", i64::MAX));

        assert!(matches!(
            SqlValue::try_from(u64::MAX).and_then(|value| limit.limit(value).map(|_| ())),
            Err(QueryError::InvalidArgument(_))
        ));
        assert_eq!(limit.get_limit(), Some(25));
    }

    #[test]
    fn many_values() {
        for (n, m) in [(0, 0), (1, 100), (25, 3), (1_000_000, 999)] {
            let mut limit = Limit::new();
            limit.limit_offset(n, m).unwrap();
            assert_sql!(limit, format!("LIMIT {n} OFFSET {m}"));

            limit.limit(n).unwrap();
            assert_sql!(limit, format!("LIMIT {n} OFFSET {m}"));

            limit.offset(None::<i64>).unwrap();
            assert_sql!(limit, format!("LIMIT {n}"));
        }
    }
}
