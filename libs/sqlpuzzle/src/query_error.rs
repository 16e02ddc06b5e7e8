// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use sqlpuzzle_env::EnvError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    /// A builder method received a value of a disallowed type or shape.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The fragments don't form a valid statement (such as a join without an ON clause).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A query-wide precondition failed, for example asking for the last table when none is set.
    #[error("{0}")]
    Builder(String),

    #[error("Update without a condition changes every row; call allow_update_all() to confirm")]
    ConfirmUpdateAll,

    #[error("Delete without a condition removes every row; call allow_delete_all() to confirm")]
    ConfirmDeleteAll,

    #[error("Configuration: {0}")]
    Config(#[from] EnvError),
}

impl QueryError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        QueryError::InvalidArgument(message.into())
    }

    pub(crate) fn invalid_query(message: impl Into<String>) -> Self {
        QueryError::InvalidQuery(message.into())
    }
}
