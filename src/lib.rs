//! PromQL Language Tools
//!
//! This crate provides context-aware autocompletion for PromQL queries typed
//! into a code editor. Given the query text and the cursor position, it
//! classifies what the user is typing and produces an ordered list of
//! completions, fetching metric and label vocabulary from a pluggable
//! metadata provider.
//!
//! ## Features
//!
//! - **Situation Analysis**: Classify the cursor position (metric, function,
//!   label name, label value, duration, grouping label)
//! - **Completions**: Functions, metric names, label names/values and
//!   durations for the exact context
//! - **Editor Integration**: Replacement ranges, stable sort keys, re-trigger
//!   commands and last-request-wins sessions
//! - **Metadata Catalog**: In-memory provider for static metadata
//!
//! ## Usage
//!
//! ```
//! use promql_language_tools::{analyze, generate, Catalog, Metric, Situation};
//!
//! # futures::executor::block_on(async {
//! let catalog = Catalog::new().metric(
//!     Metric::new("up")
//!         .with_series([("job", "api"), ("instance", "a:9090")]),
//! );
//!
//! let query = r#"up{job="api", instance="#;
//! let situation = analyze(query, query.len());
//! assert!(matches!(situation, Situation::InLabelSelectorWithLabelName { .. }));
//!
//! for completion in generate(&situation, &catalog).await {
//!     println!("{} -> {}", completion.label, completion.insert_text);
//! }
//! # });
//! ```
//!
//! ## Metadata Providers
//!
//! Hosts backed by a live Prometheus-compatible API implement
//! [`MetadataProvider`]. Provider failures never reach the editor: the
//! generator logs them and returns an empty list.

mod analyzer;
mod catalog;
mod completion;
mod config;
mod editor;
mod error;
mod functions;
mod provider;
mod situation;

pub use analyzer::analyze;
pub use catalog::{Catalog, Metric, Series, METRIC_NAME_LABEL};
pub use completion::{
    escape_label_value, generate, generate_with, try_generate, Completion, CompletionKind,
};
pub use config::{CompletionOptions, DEFAULT_HISTORY_LIMIT, HISTORY_LIMIT_ENV};
pub use editor::{
    offset_at, sort_key, to_editor_completions, word_range, CompletionList, CompletionRequest,
    EditorCommand, EditorCompletion, EditorItemKind, EditorSession, TextRange, RETRIGGER_COMMAND,
    TRIGGER_CHARACTERS,
};
pub use error::Error;
pub use functions::{find_function, FunctionDef, DURATIONS, FUNCTIONS};
pub use provider::MetadataProvider;
pub use situation::{Label, Situation, SituationKind};

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
