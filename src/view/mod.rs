//! Observable state containers for the presentation layer.
//!
//! Each container owns a `tokio::sync::watch` channel holding the current
//! snapshot. Presentation code subscribes to it and drives the container
//! through its operations; no operation ever returns an error to the caller.

pub mod catalog;
pub mod detail;

pub use catalog::{CatalogState, CatalogViewState};
pub use detail::{MovieDetailState, MovieDetailViewState};

use crate::constants::GENERIC_ERROR_MESSAGE;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// A view could not be constructed from the arguments it was given.
///
/// This is a programming error in the navigation layer, not a state the
/// view can display.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("Missing required route argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid value for route argument {name}: {value:?}")]
    InvalidArgument { name: &'static str, value: String },
}

/// Navigation arguments handed to a view on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteArgs(HashMap<String, String>);

impl RouteArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Monotonic reload counter. Only the completion holding the latest token
/// may publish its outcome.
#[derive(Debug, Default)]
pub(crate) struct ReloadSequence(AtomicU64);

impl ReloadSequence {
    pub(crate) fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_current(&self, token: u64) -> bool {
        self.0.load(Ordering::SeqCst) == token
    }
}

/// Text shown in an error panel for a failed load.
pub(crate) fn user_message(err: &impl fmt::Display) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
