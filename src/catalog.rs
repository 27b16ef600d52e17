//! In-memory metric catalog
//!
//! A [`Catalog`] holds metric names and the label sets of their series.
//! It implements [`MetadataProvider`] so hosts with static or pre-fetched
//! metadata can drive completion without a live Prometheus API.

use crate::provider::MetadataProvider;
use crate::situation::Label;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Reserved label holding the metric name
pub const METRIC_NAME_LABEL: &str = "__name__";

/// Metric catalog for completion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Known metrics
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

impl Catalog {
    /// Create a new empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a metric to the catalog
    pub fn add_metric(&mut self, metric: Metric) -> &mut Self {
        self.metrics.push(metric);
        self
    }

    /// Builder method to add a metric
    #[must_use]
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Check if the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Get a metric by name
    #[must_use]
    pub fn get_metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Series in scope for a metric (all metrics when `None`) that satisfy
    /// every matcher
    ///
    /// Returns `None` for an unknown metric. Matchers whose regex does not
    /// compile are skipped; the user is usually still typing them.
    fn matching_series<'a>(
        &'a self,
        metric_name: Option<&str>,
        other_labels: &[Label],
    ) -> Option<Vec<(&'a str, &'a Series)>> {
        let metrics: Vec<&Metric> = match metric_name {
            Some(name) => vec![self.get_metric(name)?],
            None => self.metrics.iter().collect(),
        };

        let matchers: Vec<&Label> = other_labels
            .iter()
            .filter(|label| match label.is_regex().then(|| label.regex()) {
                Some(Err(e)) => {
                    log::debug!("Ignoring matcher {label}: {e}");
                    false
                }
                _ => true,
            })
            .collect();

        let series = metrics
            .into_iter()
            .flat_map(|metric| metric.series.iter().map(|s| (metric.name.as_str(), s)))
            .filter(|(name, series)| {
                matchers
                    .iter()
                    .all(|m| series.matches(name, m).unwrap_or(false))
            })
            .collect();
        Some(series)
    }
}

#[async_trait]
impl MetadataProvider for Catalog {
    async fn metric_names(&self) -> Result<Vec<String>> {
        Ok(self.metrics.iter().map(|m| m.name.clone()).collect())
    }

    async fn labels_for(
        &self,
        metric_name: Option<&str>,
        other_labels: &[Label],
    ) -> Result<Option<Vec<String>>> {
        let Some(series) = self.matching_series(metric_name, other_labels) else {
            return Ok(None);
        };
        let names: BTreeSet<&str> = series
            .iter()
            .flat_map(|&(_, s)| s.labels.keys().map(String::as_str))
            .filter(|name| *name != METRIC_NAME_LABEL)
            .collect();
        Ok(Some(names.into_iter().map(str::to_string).collect()))
    }

    async fn label_values_for(
        &self,
        metric_name: Option<&str>,
        label_name: &str,
        other_labels: &[Label],
    ) -> Result<Vec<String>> {
        let series = self
            .matching_series(metric_name, other_labels)
            .unwrap_or_default();
        let values: BTreeSet<&str> = series
            .iter()
            .filter_map(|&(name, s)| s.value(name, label_name))
            .collect();
        Ok(values.into_iter().map(str::to_string).collect())
    }
}

/// Metric definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    /// Metric name
    pub name: String,

    /// Optional help text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Known series of this metric
    #[serde(default)]
    pub series: Vec<Series>,
}

impl Metric {
    /// Create a new metric with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            series: Vec::new(),
        }
    }

    /// Add a series to the metric
    pub fn add_series(&mut self, series: Series) -> &mut Self {
        self.series.push(series);
        self
    }

    /// Builder method to add a series
    #[must_use]
    pub fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Builder method to add a series from label pairs
    #[must_use]
    pub fn with_series<'a>(
        mut self,
        labels: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.series.push(labels.into_iter().collect());
        self
    }

    /// Set the help text
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// The label set of one series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    /// Label name to value
    pub labels: BTreeMap<String, String>,
}

impl Series {
    /// Create a new series without labels
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a label
    #[must_use]
    pub fn label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(name.into(), value.into());
        self
    }

    /// Value of a label, with `__name__` answered by the owning metric
    fn value<'a>(&'a self, metric_name: &'a str, label_name: &str) -> Option<&'a str> {
        if label_name == METRIC_NAME_LABEL {
            return Some(metric_name);
        }
        self.labels.get(label_name).map(String::as_str)
    }

    fn matches(&self, metric_name: &str, matcher: &Label) -> Result<bool> {
        matcher.matches(self.value(metric_name, &matcher.name))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Series {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
