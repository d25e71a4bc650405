use std::fs;

use dashdeck::chart::ChartKind;
use dashdeck::snapshot::{capture, html};
use dashdeck::{Color, ExportConfig, Exporter, SlideItem, SnapshotTree};

fn html_fixture() -> SnapshotTree {
    let page = fs::read_to_string("tests/fixtures/dashboard.html").expect("read fixture");
    html::from_html(&page, None, "no-print").expect("parse fixture")
}

fn json_fixture() -> SnapshotTree {
    let raw = fs::read_to_string("tests/fixtures/dashboard.json").expect("read fixture");
    capture::from_json(&raw, "no-print").expect("parse fixture")
}

fn exporter() -> Exporter {
    Exporter::new(ExportConfig::default()).expect("default config")
}

#[test]
fn dashboard_reconstructs_groups_text_charts_and_accents() {
    let tree = html_fixture();
    let deck = exporter().reconstruct(&tree).unwrap();
    let slide = &deck.slide;

    let texts: Vec<&str> = slide.texts().collect();
    assert_eq!(
        texts,
        vec![
            "CX Dashboard Info",
            "Info Box",
            "Info1",
            "Info2",
            "Satisfaction",
            "All systems nominal",
            "Customer Experience",
        ]
    );
    assert!(!texts.iter().any(|t| t.contains("Export to PowerPoint")));

    // three card backgrounds plus the banner's left accent
    assert_eq!(slide.count("shape"), 4);
    // the chart without metadata has no snapshot here
    assert_eq!(slide.count("chart"), 1);
    assert_eq!(slide.count("image"), 0);
    assert_eq!(slide.items.len(), 12);

    let chart = slide
        .items
        .iter()
        .find_map(|i| match i {
            SlideItem::Chart { chart, .. } => Some(chart),
            _ => None,
        })
        .unwrap();
    assert_eq!(chart.kind, ChartKind::Pie);
    assert_eq!(chart.labels, vec!["Happy", "Unhappy"]);
    assert_eq!(chart.colors[1], Color::Rgb(0xef, 0x44, 0x44));
}

#[test]
fn paint_order_puts_backgrounds_first_and_accents_last() {
    let deck = exporter().reconstruct(&html_fixture()).unwrap();
    let kinds: Vec<&str> = deck.slide.items.iter().map(|i| i.kind()).collect();
    assert_eq!(kinds[0], "text"); // title
    assert_eq!(&kinds[1..4], &["shape", "shape", "shape"]);
    assert_eq!(kinds.last(), Some(&"shape"));

    match deck.slide.items.last().unwrap() {
        SlideItem::Shape { rect, fill, .. } => {
            assert_eq!(*fill, Some(Color::Rgb(0x22, 0xc5, 0x5e)));
            // banner starts at x=20px, 0.01in per px
            assert!((rect.x - 0.2).abs() < 1e-9);
            assert!((rect.width - 0.04).abs() < 1e-9);
        }
        other => panic!("expected accent, got {:?}", other),
    }
}

#[test]
fn text_boxes_carry_style() {
    let deck = exporter().reconstruct(&html_fixture()).unwrap();
    let find = |needle: &str| {
        deck.slide
            .items
            .iter()
            .find(|i| matches!(i, SlideItem::Text { text, .. } if text == needle))
            .cloned()
            .unwrap()
    };
    match find("Customer Experience") {
        SlideItem::Text { bold, font_size, .. } => {
            assert!(bold);
            assert!((font_size - 17.28).abs() < 1e-9);
        }
        _ => unreachable!(),
    }
    match find("All systems nominal") {
        SlideItem::Text { color, bold, .. } => {
            assert_eq!(color, Color::Rgb(0x16, 0x65, 0x34));
            assert!(!bold);
        }
        _ => unreachable!(),
    }
}

#[test]
fn json_capture_resolves_nested_text_once() {
    let tree = json_fixture();
    assert_eq!(tree.root().tag, "main");
    let deck = exporter().reconstruct(&tree).unwrap();

    let texts: Vec<&str> = deck.slide.texts().collect();
    assert_eq!(texts, vec!["CX Dashboard Info", "Open tickets", "1,204 open"]);
    assert_eq!(deck.slide.count("shape"), 1);
    match &deck.slide.items[1] {
        SlideItem::Shape { fill: Some(Color::Rgb(r, g, b)), .. } => {
            assert!(*r > 240 && *g > 240 && *b > 240);
        }
        other => panic!("expected light card, got {:?}", other),
    }
}

#[test]
fn reconstruction_is_deterministic() {
    let tree = html_fixture();
    let a = exporter().reconstruct(&tree).unwrap();
    let b = exporter().reconstruct(&tree).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
}

#[test]
fn zero_sized_root_is_an_error() {
    let tree = capture::from_json(r#"{"tag":"div","children":["x"]}"#, "no-print").unwrap();
    assert!(exporter().reconstruct(&tree).is_err());
}

#[test]
fn custom_title_names_the_file() {
    let config = ExportConfig { title: "Weekly CX".into(), ..Default::default() };
    let deck = Exporter::new(config).unwrap().reconstruct(&json_fixture()).unwrap();
    assert_eq!(deck.file_name(), "Weekly CX.pptx");
    assert_eq!(deck.slide.texts().next(), Some("Weekly CX"));
}

#[test]
fn pptx_round_trips_through_zip() {
    let deck = exporter().reconstruct(&html_fixture()).unwrap();
    let bytes = deck.to_pptx_bytes().unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    for part in [
        "[Content_Types].xml",
        "ppt/presentation.xml",
        "ppt/slides/slide1.xml",
        "ppt/charts/chart1.xml",
    ] {
        assert!(names.iter().any(|n| n == part), "missing {}", part);
    }
    let mut slide = String::new();
    std::io::Read::read_to_string(&mut archive.by_name("ppt/slides/slide1.xml").unwrap(), &mut slide)
        .unwrap();
    assert!(slide.contains("<a:t>Info1</a:t>"));
}

#[test]
fn pptx_is_written_to_disk() {
    let dir = std::env::temp_dir().join(format!("dashdeck-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let deck = exporter().reconstruct(&json_fixture()).unwrap();
    let path = deck.write_pptx(&dir).unwrap();
    assert!(path.ends_with("CX Dashboard Info.pptx"));
    assert!(fs::metadata(&path).unwrap().len() > 0);
    fs::remove_dir_all(&dir).ok();
}
