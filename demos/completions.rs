//! Completions at several cursor positions
//!
//! Demonstrates running an editor session against an in-memory catalog.
//!
//! Run: cargo run --example completions

use promql_language_tools::{Catalog, CompletionRequest, EditorSession, Metric};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), promql_language_tools::Error> {
    env_logger::init();

    let catalog = Catalog::from_json(
        r#"{
            "metrics": [
                {
                    "name": "http_requests_total",
                    "help": "Total HTTP requests",
                    "series": [
                        {"job": "api", "method": "GET", "code": "200"},
                        {"job": "api", "method": "POST", "code": "500"}
                    ]
                }
            ]
        }"#,
    )?
    .metric(
        Metric::new("up")
            .with_series([("job", "api"), ("instance", "api-1:9090")])
            .with_series([("job", "node"), ("instance", "node-1:9100")]),
    );
    let session = EditorSession::new(Arc::new(catalog));

    let queries = [
        "",
        "up{",
        r#"up{job="api", instance="#,
        "rate(http_requests_total[5",
        "sum(rate(http_requests_total[5m])) by (",
    ];

    for query in queries {
        println!("Query: \"{query}\" (cursor at {})", query.len());
        let Some(list) = session
            .complete(CompletionRequest::new(query, query.len()))
            .await
        else {
            continue;
        };
        for item in list.suggestions.iter().take(8) {
            println!(
                "  {} {:24} {:?} -> {:?}",
                item.sort_key, item.label, item.kind, item.insert_text
            );
        }
        if list.suggestions.len() > 8 {
            println!("  ... {} more", list.suggestions.len() - 8);
        }
        println!();
    }

    Ok(())
}
