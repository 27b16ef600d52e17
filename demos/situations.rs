//! Situation analysis
//!
//! Prints how the analyzer classifies the cursor at the end of each query.
//!
//! Run: `cargo run --example situations`

use promql_language_tools::analyze;

fn main() {
    let queries = [
        "",
        "rate(",
        "rate(up[5",
        "up{",
        r#"up{job="api", instance="#,
        r#"up{job=""#,
        r#"sum(up{env="prod"}) by ("#,
        "up offset ",
    ];

    for query in queries {
        let situation = analyze(query, query.len());
        println!("{:40} {}", format!("{query:?}"), situation.kind());
        for label in situation.other_labels() {
            println!("{:40}   with {label}", "");
        }
    }
}
