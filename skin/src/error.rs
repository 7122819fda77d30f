//! Error types for the skin pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building glyphs or applying skin configuration
#[derive(Debug, Error)]
pub enum SkinError {
    #[error("glyph asset not found: {path}")]
    AssetMissing { path: PathBuf },

    #[error("failed to parse {what}: {reason}")]
    ParseError { what: String, reason: String },

    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("no font available to shape text in family {family}")]
    FontUnavailable { family: String },
}

impl SkinError {
    pub(crate) fn parse(what: impl Into<String>, reason: impl Into<String>) -> Self {
        SkinError::ParseError {
            what: what.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SkinError::ConfigurationInvalid(reason.into())
    }
}

pub type SkinResult<T> = Result<T, SkinError>;
