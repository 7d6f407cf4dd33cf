// ABOUTME: emits a json schema for the reply verdict report to stdout.
// ABOUTME: intended for scripts that consume `llmterm classify` output.

fn main() {
    let schema = schemars::schema_for!(llm_term_common::Verdict);
    let json = serde_json::to_string_pretty(&schema).expect("serialize schema");
    println!("{json}");
}
