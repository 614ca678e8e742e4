use crate::cli::render_dump;
use crate::conf::AnalyzerConfig;
use serde_json::Value;

#[test]
fn dump_defaults_to_json() {
    let out = render_dump(&AnalyzerConfig::default(), false).unwrap();

    let value: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["top_k"], AnalyzerConfig::default().top_k);
}

#[test]
fn dump_as_yaml() {
    let out = render_dump(&AnalyzerConfig::default(), true).unwrap();

    assert!(out.contains("top_k: "));
    assert!(serde_json::from_str::<Value>(&out).is_err());
}
