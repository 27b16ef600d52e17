//! Metadata provider interface
//!
//! The completion generator fetches dynamic vocabulary (metric names, label
//! names and label values) through this trait. Implementations typically
//! wrap an HTTP client for a Prometheus-compatible API; [`Catalog`] is an
//! in-memory implementation.
//!
//! [`Catalog`]: crate::Catalog

use crate::situation::Label;
use crate::Result;
use async_trait::async_trait;

/// Source of metric and label vocabulary
///
/// Every narrowing call receives the label matchers already written in the
/// query as an explicit argument. Narrowing is the provider's job; the
/// completion generator passes the matchers through unchanged.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Get all metric names
    async fn metric_names(&self) -> Result<Vec<String>>;

    /// Get label names for a metric, narrowed by the given matchers
    ///
    /// Returns `None` when the provider knows nothing about the metric.
    async fn labels_for(
        &self,
        metric_name: Option<&str>,
        other_labels: &[Label],
    ) -> Result<Option<Vec<String>>>;

    /// Get values of `label_name` for a metric, narrowed by the given matchers
    async fn label_values_for(
        &self,
        metric_name: Option<&str>,
        label_name: &str,
        other_labels: &[Label],
    ) -> Result<Vec<String>>;

    /// Get previously run queries, most recent first
    async fn history(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
