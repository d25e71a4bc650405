use std::fs;
use std::path::PathBuf;

use dashdeck::snapshot::{capture, html};
use dashdeck::{ExportConfig, Exporter, Presentation};
use serde_json::Value;

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn check_golden(name: &str, deck: &Presentation) {
    let fingerprint = deck.fingerprint().expect("fingerprint");
    let expected_path = golden_path(name);
    let model_path = expected_path.with_extension("json");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &fingerprint).expect("write golden");
        fs::write(&model_path, deck.to_json().expect("json")).expect("write golden json");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let exp = fs::read_to_string(&expected_path)
        .unwrap_or_else(|_| panic!("no golden at {:?}; run with UPDATE_GOLDENS=1 to create it", expected_path));
    if fingerprint == exp.trim() {
        return;
    }

    // point at the first differing field before failing on the digest
    let expected: Value =
        serde_json::from_str(&fs::read_to_string(&model_path).expect("read golden json")).expect("golden json");
    let actual: Value = serde_json::from_str(&deck.to_json().expect("json")).expect("model json");
    if let Some(path) = first_difference(&expected, &actual, String::from("$")) {
        panic!("slide model changed for {} at {}", name, path);
    }
    assert_eq!(fingerprint, exp.trim(), "slide model changed for {}", name);
}

fn first_difference(expected: &Value, actual: &Value, path: String) -> Option<String> {
    match (expected, actual) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, va) in a {
                match b.get(key) {
                    Some(vb) => {
                        if let Some(p) = first_difference(va, vb, format!("{}.{}", path, key)) {
                            return Some(p);
                        }
                    }
                    None => return Some(format!("{}.{} (missing)", path, key)),
                }
            }
            b.keys()
                .find(|k| !a.contains_key(*k))
                .map(|k| format!("{}.{} (unexpected)", path, k))
        }
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Some(format!("{} (length {} != {})", path, a.len(), b.len()));
            }
            a.iter()
                .zip(b)
                .enumerate()
                .find_map(|(i, (va, vb))| first_difference(va, vb, format!("{}[{}]", path, i)))
        }
        (a, b) if a == b => None,
        (a, b) => Some(format!("{} ({} != {})", path, a, b)),
    }
}

#[test]
fn golden_html_dashboard() {
    let page = fs::read_to_string("tests/fixtures/dashboard.html").expect("read fixture");
    let tree = html::from_html(&page, None, "no-print").expect("parse");
    let deck = Exporter::new(ExportConfig::default()).unwrap().reconstruct(&tree).unwrap();
    check_golden("dashboard_html.sha256", &deck);
}

#[test]
fn golden_json_capture() {
    let raw = fs::read_to_string("tests/fixtures/dashboard.json").expect("read fixture");
    let tree = capture::from_json(&raw, "no-print").expect("parse");
    let deck = Exporter::new(ExportConfig::default()).unwrap().reconstruct(&tree).unwrap();
    check_golden("dashboard_json.sha256", &deck);
}
