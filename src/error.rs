// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy.
//!
//! These errors stay inside the crate's fallible internals. The public
//! editing API turns them into `None`/`false` no-ops at the boundary and
//! logs them, since a missing result is already visible to the host.

use thiserror::Error;

/// Failures of geometry computations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("expected a {expected} geometry, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("geometry contains non-finite coordinates")]
    NonFinite,

    #[error("degenerate geometry: {0}")]
    Degenerate(&'static str),

    #[error("need at least {needed} features, got {got}")]
    TooFewInputs { needed: usize, got: usize },

    #[error("boolean operation failed: {0}")]
    BooleanOp(String),

    #[error("operation produced an empty geometry")]
    EmptyResult,
}

/// Failures reported by a rendering surface
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("rendering surface has been removed")]
    Detached,

    #[error("unknown data source: {0}")]
    UnknownSource(String),
}

/// Failures loading editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        let err = GeometryError::WrongType {
            expected: "LineString",
            found: "Point",
        };
        assert_eq!(err.to_string(), "expected a LineString geometry, found Point");
        assert_eq!(
            SurfaceError::Detached.to_string(),
            "rendering surface has been removed"
        );
    }
}
