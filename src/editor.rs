//! Editor integration
//!
//! Packages generated completions for a host code editor: replacement
//! range, presentation kind, stable sort keys and the re-trigger command.
//! [`EditorSession`] runs the whole pipeline for one editor instance and
//! drops responses that were superseded by a newer request.

use crate::analyzer::analyze;
use crate::completion::{generate_with, Completion, CompletionKind};
use crate::config::CompletionOptions;
use crate::provider::MetadataProvider;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Characters that open the completion list without explicit invocation
pub const TRIGGER_CHARACTERS: &[char] = &['{', '(', '[', ',', '=', '~', '"', ' '];

/// Editor command that re-opens the suggestion list
pub const RETRIGGER_COMMAND: &str = "editor.action.triggerSuggest";

/// Presentation category in the host editor (icon and grouping only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum EditorItemKind {
    Unit,
    Variable,
    Snippet,
    Enum,
    EnumMember,
    Constructor,
}

impl From<CompletionKind> for EditorItemKind {
    fn from(kind: CompletionKind) -> Self {
        match kind {
            CompletionKind::Duration => Self::Unit,
            CompletionKind::Function => Self::Variable,
            CompletionKind::History => Self::Snippet,
            CompletionKind::LabelName => Self::Enum,
            CompletionKind::LabelValue => Self::EnumMember,
            CompletionKind::MetricName => Self::Constructor,
        }
    }
}

/// Half-open byte range in the query text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextRange {
    /// Start offset (0-based, inclusive)
    pub start: usize,
    /// End offset (0-based, exclusive)
    pub end: usize,
}

impl TextRange {
    /// Create a range
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width range
    #[must_use]
    pub fn empty(at: usize) -> Self {
        Self::new(at, at)
    }

    /// Get the length of the range
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range is zero-width
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Editor command attached to a suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorCommand {
    pub id: String,
    pub title: String,
}

impl EditorCommand {
    /// The command re-opening the suggestion list
    #[must_use]
    pub fn retrigger() -> Self {
        Self {
            id: RETRIGGER_COMMAND.to_string(),
            title: "Re-trigger completions".to_string(),
        }
    }
}

/// One suggestion as presented to the host editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorCompletion {
    pub kind: EditorItemKind,
    pub label: String,
    pub insert_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Zero-padded position in the generated list
    pub sort_key: String,
    /// Text replaced when the suggestion is accepted
    pub range: TextRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<EditorCommand>,
}

/// Completion response for the host editor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionList {
    pub suggestions: Vec<EditorCompletion>,
}

/// A completion request from the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRequest<'a> {
    /// Full query text
    pub text: &'a str,
    /// Caret byte offset
    pub cursor: usize,
    /// Active selection, if any
    pub selection: Option<TextRange>,
}

impl<'a> CompletionRequest<'a> {
    /// Create a request without a selection
    #[must_use]
    pub fn new(text: &'a str, cursor: usize) -> Self {
        Self {
            text,
            cursor,
            selection: None,
        }
    }

    /// Builder method to set the active selection
    #[must_use]
    pub fn with_selection(mut self, selection: TextRange) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Offset to analyze: the caret moved back over a trailing selection
    #[must_use]
    pub fn effective_offset(&self) -> usize {
        match self.selection {
            Some(selection) if !selection.is_empty() && self.cursor >= selection.end => {
                self.cursor - selection.len()
            }
            _ => self.cursor,
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':' || c == '$'
}

/// Range of the word under the cursor, or an empty range at the cursor
#[must_use]
pub fn word_range(text: &str, offset: usize) -> TextRange {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map_or(offset, |(i, _)| i);
    let end = text[offset..]
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map_or(text.len(), |(i, _)| offset + i);

    TextRange::new(start, end)
}

/// Convert a 1-based line and character column into a byte offset
///
/// Positions past the end of a line clamp to the line end; lines past the
/// end of the text clamp to the text end.
#[must_use]
pub fn offset_at(text: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for _ in 1..line {
        match text[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return text.len(),
        }
    }
    let line_text = text[line_start..].split('\n').next().unwrap_or("");
    let within = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(line_text.len(), |(i, _)| i);
    line_start + within
}

/// Sort key for the item at `index` in a list of `total` items
#[must_use]
pub fn sort_key(index: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("{index:0width$}")
}

/// Package generated completions for the editor
#[must_use]
pub fn to_editor_completions(completions: Vec<Completion>, range: TextRange) -> CompletionList {
    let total = completions.len();
    let suggestions = completions
        .into_iter()
        .enumerate()
        .map(|(index, completion)| EditorCompletion {
            kind: completion.kind.into(),
            label: completion.label,
            insert_text: completion.insert_text,
            detail: completion.detail,
            documentation: completion.documentation,
            sort_key: sort_key(index, total),
            range,
            command: completion
                .trigger_on_insert
                .then(EditorCommand::retrigger),
        })
        .collect();
    CompletionList { suggestions }
}

/// Completion pipeline for one editor instance
///
/// # Example
///
/// ```
/// use promql_language_tools::{Catalog, CompletionRequest, EditorSession, Metric};
/// use std::sync::Arc;
///
/// # futures::executor::block_on(async {
/// let catalog = Catalog::new().metric(Metric::new("up").with_series([("job", "api")]));
/// let session = EditorSession::new(Arc::new(catalog));
///
/// let list = session.complete(CompletionRequest::new("up{", 3)).await.unwrap();
/// assert_eq!(list.suggestions[0].insert_text, "job=");
/// # });
/// ```
pub struct EditorSession {
    provider: Arc<dyn MetadataProvider>,
    options: CompletionOptions,
    latest: AtomicU64,
}

impl EditorSession {
    /// Create a session with default options
    #[must_use]
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self::with_options(provider, CompletionOptions::default())
    }

    /// Create a session with the given options
    #[must_use]
    pub fn with_options(provider: Arc<dyn MetadataProvider>, options: CompletionOptions) -> Self {
        Self {
            provider,
            options,
            latest: AtomicU64::new(0),
        }
    }

    /// Get the session options
    #[must_use]
    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }

    /// Run a completion request
    ///
    /// Returns `None` when a newer request was started on this session
    /// before this one resolved. Provider failures yield an empty list.
    pub async fn complete(&self, request: CompletionRequest<'_>) -> Option<CompletionList> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let situation = analyze(request.text, request.effective_offset());
        let completions = generate_with(&situation, self.provider.as_ref(), &self.options).await;

        if self.latest.load(Ordering::SeqCst) != ticket {
            log::debug!("Discarding stale completion response #{ticket}");
            return None;
        }

        let range = word_range(request.text, request.cursor);
        Some(to_editor_completions(completions, range))
    }
}
