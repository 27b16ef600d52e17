//! Completion types and generation for PromQL intellisense
//!
//! [`generate`] turns a [`Situation`] into an ordered list of completions,
//! asking a [`MetadataProvider`] for dynamic vocabulary only when the
//! situation needs it.

use crate::config::CompletionOptions;
use crate::functions::{DURATIONS, FUNCTIONS};
use crate::provider::MetadataProvider;
use crate::situation::{Label, Situation};
use crate::Result;
use serde::{Deserialize, Serialize};

/// A completion item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    /// Kind of completion
    #[serde(rename = "type")]
    pub kind: CompletionKind,
    /// Display label
    pub label: String,
    /// Text to insert
    pub insert_text: String,
    /// Optional detail text (e.g. a function signature)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Optional documentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Open the completion list again once this item is accepted
    #[serde(default)]
    pub trigger_on_insert: bool,
}

impl Completion {
    /// Create a completion whose insert text equals its label
    #[must_use]
    pub fn new(kind: CompletionKind, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            kind,
            insert_text: label.clone(),
            label,
            detail: None,
            documentation: None,
            trigger_on_insert: false,
        }
    }

    /// Builder method to set the insert text
    #[must_use]
    pub fn insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = text.into();
        self
    }

    /// Builder method to set the detail text
    #[must_use]
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Builder method to set the documentation
    #[must_use]
    pub fn documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Builder method to re-trigger completion after insertion
    #[must_use]
    pub fn trigger_on_insert(mut self) -> Self {
        self.trigger_on_insert = true;
        self
    }
}

/// Kind of completion item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionKind {
    /// A previously run query
    History,
    /// A built-in function or aggregation operator
    Function,
    /// A metric name
    MetricName,
    /// A duration literal or dashboard interval variable
    Duration,
    /// A label name
    LabelName,
    /// A label value
    LabelValue,
}

/// Generate completions for a situation with default options
///
/// Provider failures are logged and resolve to an empty list.
pub async fn generate(situation: &Situation, provider: &dyn MetadataProvider) -> Vec<Completion> {
    generate_with(situation, provider, &CompletionOptions::default()).await
}

/// Generate completions for a situation
///
/// Provider failures are logged and resolve to an empty list.
pub async fn generate_with(
    situation: &Situation,
    provider: &dyn MetadataProvider,
    options: &CompletionOptions,
) -> Vec<Completion> {
    match try_generate(situation, provider, options).await {
        Ok(completions) => completions,
        Err(e) => {
            log::warn!("Completion for {} failed: {e}", situation.kind());
            Vec::new()
        }
    }
}

/// Generate completions for a situation, propagating provider failures
pub async fn try_generate(
    situation: &Situation,
    provider: &dyn MetadataProvider,
    options: &CompletionOptions,
) -> Result<Vec<Completion>> {
    log::debug!("Generating completions for {}", situation.kind());

    let completions: Vec<Completion> = match situation {
        Situation::Empty => {
            let (history, metrics) =
                futures::try_join!(provider.history(), provider.metric_names())?;
            history_completions(history, options.history_limit)
                .chain(function_completions())
                .chain(metric_completions(metrics))
                .collect()
        }
        Situation::AtRoot | Situation::InFunction => {
            let metrics = provider.metric_names().await?;
            function_completions()
                .chain(metric_completions(metrics))
                .collect()
        }
        Situation::InDuration => duration_completions().collect(),
        Situation::InLabelSelectorNoLabelName {
            metric_name,
            other_labels,
        } => label_name_completions(provider, metric_name.as_deref(), other_labels)
            .await?
            .map(|c| {
                let text = format!("{}=", c.label);
                c.insert_text(text).trigger_on_insert()
            })
            .collect(),
        Situation::InGrouping {
            metric_name,
            other_labels,
        } => label_name_completions(provider, metric_name.as_deref(), other_labels)
            .await?
            .collect(),
        Situation::InLabelSelectorWithLabelName {
            metric_name,
            label_name,
            between_quotes,
            other_labels,
        } => provider
            .label_values_for(metric_name.as_deref(), label_name, other_labels)
            .await?
            .into_iter()
            .map(|value| {
                let escaped = if options.escape_label_values {
                    escape_label_value(&value)
                } else {
                    value.clone()
                };
                let text = if *between_quotes {
                    escaped
                } else {
                    format!("\"{escaped}\"")
                };
                Completion::new(CompletionKind::LabelValue, value).insert_text(text)
            })
            .collect(),
    };

    Ok(completions)
}

fn history_completions(
    history: Vec<String>,
    limit: usize,
) -> impl Iterator<Item = Completion> {
    history
        .into_iter()
        .take(limit)
        .map(|query| Completion::new(CompletionKind::History, query))
}

fn function_completions() -> impl Iterator<Item = Completion> {
    FUNCTIONS.iter().map(|f| {
        Completion::new(CompletionKind::Function, f.name)
            .detail(f.signature)
            .documentation(f.documentation)
    })
}

fn metric_completions(metrics: Vec<String>) -> impl Iterator<Item = Completion> {
    metrics
        .into_iter()
        .map(|name| Completion::new(CompletionKind::MetricName, name))
}

fn duration_completions() -> impl Iterator<Item = Completion> {
    DURATIONS
        .iter()
        .map(|d| Completion::new(CompletionKind::Duration, *d))
}

async fn label_name_completions(
    provider: &dyn MetadataProvider,
    metric_name: Option<&str>,
    other_labels: &[Label],
) -> Result<impl Iterator<Item = Completion>> {
    let names = provider
        .labels_for(metric_name, other_labels)
        .await?
        .unwrap_or_default();
    Ok(names
        .into_iter()
        .map(|name| Completion::new(CompletionKind::LabelName, name)))
}

/// Escape a label value for use inside a double-quoted PromQL string
#[must_use]
pub fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::situation::SituationKind;
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every narrowing call and answers from fixed lists
    #[derive(Default)]
    struct FakeProvider {
        metrics: Vec<String>,
        labels: Option<Vec<String>>,
        values: Vec<String>,
        history: Vec<String>,
        fail: bool,
        calls: AtomicUsize,
        seen_labels: Mutex<Vec<Vec<Label>>>,
    }

    impl FakeProvider {
        fn with_data() -> Self {
            Self {
                metrics: vec!["up".to_string(), "http_requests_total".to_string()],
                labels: Some(vec!["instance".to_string(), "job".to_string()]),
                values: vec!["api".to_string(), "we\"b".to_string()],
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::with_data()
            }
        }

        fn check(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::provider("connection refused"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MetadataProvider for FakeProvider {
        async fn metric_names(&self) -> Result<Vec<String>> {
            self.check()?;
            Ok(self.metrics.clone())
        }

        async fn labels_for(
            &self,
            _metric_name: Option<&str>,
            other_labels: &[Label],
        ) -> Result<Option<Vec<String>>> {
            self.check()?;
            self.seen_labels.lock().unwrap().push(other_labels.to_vec());
            Ok(self.labels.clone())
        }

        async fn label_values_for(
            &self,
            _metric_name: Option<&str>,
            _label_name: &str,
            other_labels: &[Label],
        ) -> Result<Vec<String>> {
            self.check()?;
            self.seen_labels.lock().unwrap().push(other_labels.to_vec());
            Ok(self.values.clone())
        }

        async fn history(&self) -> Result<Vec<String>> {
            self.check()?;
            Ok(self.history.clone())
        }
    }

    fn sample_situation(kind: SituationKind) -> Situation {
        let labels = vec![Label::exact("job", "api")];
        match kind {
            SituationKind::Empty => Situation::Empty,
            SituationKind::AtRoot => Situation::AtRoot,
            SituationKind::InFunction => Situation::InFunction,
            SituationKind::InDuration => Situation::InDuration,
            SituationKind::InLabelSelectorNoLabelName => Situation::InLabelSelectorNoLabelName {
                metric_name: Some("up".to_string()),
                other_labels: labels,
            },
            SituationKind::InLabelSelectorWithLabelName => {
                Situation::InLabelSelectorWithLabelName {
                    metric_name: Some("up".to_string()),
                    label_name: "instance".to_string(),
                    between_quotes: false,
                    other_labels: labels,
                }
            }
            SituationKind::InGrouping => Situation::InGrouping {
                metric_name: Some("up".to_string()),
                other_labels: labels,
            },
        }
    }

    fn allowed_kinds(kind: SituationKind) -> &'static [CompletionKind] {
        match kind {
            SituationKind::Empty => &[
                CompletionKind::History,
                CompletionKind::Function,
                CompletionKind::MetricName,
            ],
            SituationKind::AtRoot | SituationKind::InFunction => {
                &[CompletionKind::Function, CompletionKind::MetricName]
            }
            SituationKind::InDuration => &[CompletionKind::Duration],
            SituationKind::InLabelSelectorNoLabelName | SituationKind::InGrouping => {
                &[CompletionKind::LabelName]
            }
            SituationKind::InLabelSelectorWithLabelName => &[CompletionKind::LabelValue],
        }
    }

    #[tokio::test]
    async fn test_every_situation_yields_only_allowed_kinds() {
        let provider = FakeProvider {
            history: vec!["up".to_string()],
            ..FakeProvider::with_data()
        };
        for kind in SituationKind::ALL {
            let completions = generate(&sample_situation(kind), &provider).await;
            assert!(!completions.is_empty(), "no completions for {kind}");
            for completion in &completions {
                assert!(
                    allowed_kinds(kind).contains(&completion.kind),
                    "{:?} not allowed for {kind}",
                    completion.kind
                );
            }
        }
    }

    #[tokio::test]
    async fn test_empty_is_functions_then_metrics() {
        let provider = FakeProvider::with_data();
        let completions = generate(&Situation::Empty, &provider).await;

        assert_eq!(completions.len(), FUNCTIONS.len() + 2);
        for (completion, function) in completions.iter().zip(FUNCTIONS) {
            assert_eq!(completion.kind, CompletionKind::Function);
            assert_eq!(completion.label, function.name);
            assert_eq!(completion.detail.as_deref(), Some(function.signature));
        }
        let metrics: Vec<_> = completions[FUNCTIONS.len()..]
            .iter()
            .map(|c| (c.kind, c.insert_text.as_str()))
            .collect();
        assert_eq!(
            metrics,
            vec![
                (CompletionKind::MetricName, "up"),
                (CompletionKind::MetricName, "http_requests_total"),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_leads_with_limited_history() {
        let provider = FakeProvider {
            history: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            ..FakeProvider::with_data()
        };
        let options = CompletionOptions::new().history_limit(2);
        let completions = generate_with(&Situation::Empty, &provider, &options).await;

        assert_eq!(completions[0], Completion::new(CompletionKind::History, "a"));
        assert_eq!(completions[1], Completion::new(CompletionKind::History, "b"));
        assert_eq!(completions[2].kind, CompletionKind::Function);
    }

    #[tokio::test]
    async fn test_history_only_for_empty_query() {
        let provider = FakeProvider {
            history: vec!["up".to_string()],
            ..FakeProvider::with_data()
        };
        let completions = generate(&Situation::AtRoot, &provider).await;
        assert!(completions
            .iter()
            .all(|c| c.kind != CompletionKind::History));
    }

    #[tokio::test]
    async fn test_durations_never_query_provider() {
        let working = FakeProvider::with_data();
        let failing = FakeProvider::failing();

        let a = generate(&Situation::InDuration, &working).await;
        let b = generate(&Situation::InDuration, &failing).await;

        assert_eq!(a, b);
        let labels: Vec<_> = a.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, DURATIONS);
        assert_eq!(working.calls.load(Ordering::SeqCst), 0);
        assert_eq!(failing.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_label_names_in_selector_append_operator() {
        let provider = FakeProvider::with_data();
        let situation = sample_situation(SituationKind::InLabelSelectorNoLabelName);
        let completions = generate(&situation, &provider).await;

        let texts: Vec<_> = completions.iter().map(|c| c.insert_text.as_str()).collect();
        assert_eq!(texts, vec!["instance=", "job="]);
        assert!(completions.iter().all(|c| c.trigger_on_insert));
        assert_eq!(completions[1].label, "job");
    }

    #[tokio::test]
    async fn test_label_names_in_grouping_are_bare() {
        let provider = FakeProvider::with_data();
        let situation = sample_situation(SituationKind::InGrouping);
        let completions = generate(&situation, &provider).await;

        let texts: Vec<_> = completions.iter().map(|c| c.insert_text.as_str()).collect();
        assert_eq!(texts, vec!["instance", "job"]);
        assert!(completions.iter().all(|c| !c.trigger_on_insert));
    }

    #[tokio::test]
    async fn test_other_labels_are_passed_to_provider() {
        let provider = FakeProvider::with_data();
        for kind in [
            SituationKind::InLabelSelectorNoLabelName,
            SituationKind::InLabelSelectorWithLabelName,
            SituationKind::InGrouping,
        ] {
            generate(&sample_situation(kind), &provider).await;
        }
        let seen = provider.seen_labels.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|l| l == &[Label::exact("job", "api")]));
    }

    #[tokio::test]
    async fn test_unknown_metric_labels_yield_nothing() {
        let provider = FakeProvider {
            labels: None,
            ..FakeProvider::with_data()
        };
        let situation = sample_situation(SituationKind::InGrouping);
        assert!(generate(&situation, &provider).await.is_empty());
    }

    #[tokio::test]
    async fn test_label_values_quoted_outside_quotes() {
        let provider = FakeProvider::with_data();
        let situation = sample_situation(SituationKind::InLabelSelectorWithLabelName);
        let completions = generate(&situation, &provider).await;

        let texts: Vec<_> = completions.iter().map(|c| c.insert_text.as_str()).collect();
        assert_eq!(texts, vec![r#""api""#, r#""we\"b""#]);
        assert_eq!(completions[1].label, "we\"b");
    }

    #[tokio::test]
    async fn test_label_values_raw_between_quotes() {
        let provider = FakeProvider::with_data();
        let situation = Situation::InLabelSelectorWithLabelName {
            metric_name: None,
            label_name: "job".to_string(),
            between_quotes: true,
            other_labels: Vec::new(),
        };

        let escaped = generate(&situation, &provider).await;
        let texts: Vec<_> = escaped.iter().map(|c| c.insert_text.as_str()).collect();
        assert_eq!(texts, vec!["api", r#"we\"b"#]);

        let options = CompletionOptions::new().escape_label_values(false);
        let raw = generate_with(&situation, &provider, &options).await;
        let texts: Vec<_> = raw.iter().map(|c| c.insert_text.as_str()).collect();
        assert_eq!(texts, vec!["api", "we\"b"]);
    }

    #[tokio::test]
    async fn test_provider_failure_resolves_to_empty() {
        let provider = FakeProvider::failing();
        for kind in SituationKind::ALL {
            if kind == SituationKind::InDuration {
                continue;
            }
            let situation = sample_situation(kind);
            assert!(generate(&situation, &provider).await.is_empty());
            assert!(matches!(
                try_generate(&situation, &provider, &CompletionOptions::default()).await,
                Err(Error::Provider { .. })
            ));
        }
    }

    #[test]
    fn test_escape_label_value() {
        assert_eq!(escape_label_value("plain"), "plain");
        assert_eq!(escape_label_value(r#"C:\tmp "x""#), r#"C:\\tmp \"x\""#);
        assert_eq!(escape_label_value("a\nb"), "a\\nb");
    }

    #[test]
    fn test_completion_serializes_camel_case() {
        let completion = Completion::new(CompletionKind::LabelName, "job")
            .insert_text("job=")
            .trigger_on_insert();
        let json = serde_json::to_value(&completion).unwrap();
        assert_eq!(json["type"], "LABEL_NAME");
        assert_eq!(json["insertText"], "job=");
        assert_eq!(json["triggerOnInsert"], true);
        assert!(json.get("detail").is_none());
    }
}
