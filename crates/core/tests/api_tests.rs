//! Library API integration tests
use folio_core::engine::Document;
use folio_core::*;
use rstest::rstest;
use url::Url;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn transcode_fixture(name: &str, options: SerializationOptions) -> ExtractionResult {
    let html = std::fs::read_to_string(get_fixture_path(name)).unwrap();
    let url = Url::parse("https://coastal.example/lighthouses").unwrap();
    let input = TranscodingInput { html: &html, url: &url, options, anchor_rewriter: None };
    ReadabilityTranscoder::default().transcode(&input).expect("should transcode")
}

fn fragment_options() -> SerializationOptions {
    SerializationOptions::from(&ReadOptions::default())
}

#[test]
fn test_transcode_fixture() {
    let result = transcode_fixture("article.html", fragment_options());

    assert!(result.content_extracted);
    assert_eq!(result.title.as_deref(), Some("Why Lighthouses Still Matter"));
    assert_eq!(result.charset.as_deref(), Some("UTF-8"));
    assert_eq!(result.images.len(), 2);
    assert!(result.content.starts_with("<h1>Why Lighthouses Still Matter</h1>"));
    assert!(result.content.contains(r#"href="https://coastal.example/lights/list""#));
    assert!(!result.content.contains("<script"));
    assert!(!result.content.contains("Great article"));
    assert!(result.next_page_url.is_none());
}

#[test]
fn test_transcode_without_content() {
    let result = transcode_fixture("empty_content.html", fragment_options());

    assert!(!result.content_extracted);
    assert_eq!(result.title.as_deref(), Some("Gallery"));
    assert_eq!(result.images.len(), 2);
}

#[test]
fn test_placeholders_replace_every_image() {
    let options = SerializationOptions { image_placeholders: true, ..fragment_options() };
    let result = transcode_fixture("article.html", options);

    assert_eq!(result.content.matches("<!--IMG-->").count(), result.images.len());
    assert!(!result.content.contains("<img"));
}

#[test]
fn test_document_text_content() {
    let html = std::fs::read_to_string(get_fixture_path("article.html")).unwrap();
    let text = Document::parse(&html).text_content();

    assert!(text.contains("Why Lighthouses Still Matter"));
    assert!(!text.contains("window.analytics"));
    assert!(!text.contains("font-family"));
}

#[rstest]
#[case("UTF-8", "UTF-8")]
#[case("windows1250", "windows-1250")]
#[case("Win-1251", "windows-1251")]
#[case("x-cp1252", "windows-1252")]
#[case("iso8859_2", "ISO-8859-2")]
#[case("ISO_8859_15", "ISO-8859-15")]
#[case("latin-2", "ISO-8859-2")]
fn test_resolve_encoding(#[case] name: &str, #[case] expected: &str) {
    assert_eq!(resolve_encoding(Some(name)).map(|e| e.name()), Some(expected));
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("klingon"))]
fn test_unresolvable_encoding(#[case] name: Option<&str>) {
    assert!(resolve_encoding(name).is_none());
}
