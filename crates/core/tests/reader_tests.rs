//! End-to-end reads against a local HTTP server.

use std::time::Duration;

use folio_core::*;
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A page with a scoreable article body and an optional `rel=next` link.
fn story_page(title: &str, marker: &str, images: &[&str], next: Option<&str>) -> String {
    let next_link = next.map(|href| format!(r#"<link rel="next" href="{href}">"#)).unwrap_or_default();
    let images: String = images.iter().map(|src| format!(r#"<img src="{src}" alt="{src}">"#)).collect();
    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>{title}</title>{next_link}</head>
<body>
<nav class="menu"><a href="/">Home</a></nav>
<article class="post">
<p>{marker} opens with a long paragraph of prose, full of clauses, commas, and detail for scoring.</p>
<p>{marker} continues with a second paragraph, again with commas, so the container scores well.</p>
{images}
<p>{marker} closes with a third paragraph that is long enough to count towards the total score.</p>
</article>
</body></html>"#
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

fn multipage() -> ReadOptions {
    ReadOptions::builder().multipage_download(true).build()
}

#[tokio::test]
async fn test_single_page_keeps_next_pointer() {
    let server = MockServer::start().await;
    mount_html(&server, "/story", story_page("Story", "Alpha", &[], Some("/story/2"))).await;

    let reader = Reader::new().unwrap();
    let article = reader.read(&format!("{}/story", server.uri())).await.unwrap();

    assert_eq!(article.page_count, 1);
    assert!(article.content_extracted);
    assert_eq!(article.title.as_deref(), Some("Story"));
    assert_eq!(article.next_page.unwrap().as_str(), format!("{}/story/2", server.uri()));
    assert!(article.content.starts_with("<h1>Story</h1>"));
    assert!(!article.content.contains("Home"));
    assert_eq!(article.encoding.map(|e| e.name()), Some("UTF-8"));
}

#[tokio::test]
async fn test_multipage_merges_all_pages() {
    let server = MockServer::start().await;
    mount_html(&server, "/story", story_page("Story", "Alpha", &[], Some("/story/2"))).await;
    mount_html(&server, "/story/2", story_page("Story", "Bravo", &[], Some("/story/3"))).await;
    mount_html(&server, "/story/3", story_page("Story", "Charlie", &[], None)).await;

    let reader = Reader::new().unwrap();
    let article = reader.read_with_options(&format!("{}/story", server.uri()), &multipage()).await.unwrap();

    assert_eq!(article.page_count, 3);
    assert!(article.next_page.is_none());
    assert!(article.content.contains(r#"<div class="folio-page" id="folio-page-2"></div>"#));
    assert!(article.content.contains(r#"<div class="folio-page" id="folio-page-3"></div>"#));

    let alpha = article.content.find("Alpha").unwrap();
    let bravo = article.content.find("Bravo").unwrap();
    let charlie = article.content.find("Charlie").unwrap();
    assert!(alpha < bravo && bravo < charlie);
    assert!(article.raw.contains("Alpha"));
    assert!(!article.raw.contains("Bravo"));
}

#[tokio::test]
async fn test_page_limit_stops_crawl_and_keeps_next_pointer() {
    let server = MockServer::start().await;
    mount_html(&server, "/story", story_page("Story", "Alpha", &[], Some("/story/2"))).await;
    mount_html(&server, "/story/2", story_page("Story", "Bravo", &[], Some("/story/3"))).await;
    Mock::given(method("GET"))
        .and(path("/story/3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(story_page("Story", "Charlie", &[], None), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let reader = Reader::builder().multipage_limit(2).build().unwrap();
    let article = reader.read_with_options(&format!("{}/story", server.uri()), &multipage()).await.unwrap();

    assert_eq!(article.page_count, 2);
    assert_eq!(article.next_page.unwrap().as_str(), format!("{}/story/3", server.uri()));
}

#[tokio::test]
async fn test_cycle_is_not_refetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cycle/one"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(story_page("Loop", "Alpha", &[], Some("/cycle/two")), "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cycle/two"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(story_page("Loop", "Bravo", &[], Some("/cycle/one")), "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reader = Reader::new().unwrap();
    let article = reader.read_with_options(&format!("{}/cycle/one", server.uri()), &multipage()).await.unwrap();

    assert_eq!(article.page_count, 2);
    assert!(article.next_page.is_none());
}

#[tokio::test]
async fn test_duplicate_page_is_not_merged() {
    let server = MockServer::start().await;
    mount_html(&server, "/story", story_page("Story", "Alpha", &[], Some("/story/2"))).await;
    mount_html(&server, "/story/2", story_page("Story", "Alpha", &[], Some("/story/3"))).await;

    let reader = Reader::new().unwrap();
    let article = reader.read_with_options(&format!("{}/story", server.uri()), &multipage()).await.unwrap();

    assert_eq!(article.page_count, 1);
    assert!(article.next_page.is_none());
    assert_eq!(article.content.matches("Alpha opens").count(), 1);
}

#[tokio::test]
async fn test_missing_page_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).and(path("/missing")).respond_with(ResponseTemplate::new(404)).mount(&server).await;

    let reader = Reader::new().unwrap();
    let err = reader.read(&format!("{}/missing", server.uri())).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Request error: Not Found (404)");
}

#[tokio::test]
async fn test_failed_later_page_truncates_crawl() {
    let server = MockServer::start().await;
    mount_html(&server, "/story", story_page("Story", "Alpha", &[], Some("/story/2"))).await;
    Mock::given(method("GET")).and(path("/story/2")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

    let reader = Reader::new().unwrap();
    let article = reader.read_with_options(&format!("{}/story", server.uri()), &multipage()).await.unwrap();

    assert_eq!(article.page_count, 1);
    assert!(article.next_page.is_none());
    assert!(article.content.contains("Alpha"));
}

#[tokio::test]
async fn test_images_numbered_over_merged_pages() {
    let server = MockServer::start().await;
    mount_html(&server, "/gallery", story_page("Gallery", "Alpha", &["/a.jpg", "/b.jpg"], Some("/gallery/2"))).await;
    mount_html(&server, "/gallery/2", story_page("Gallery", "Bravo", &["/c.jpg", "/d.jpg", "/e.jpg"], None)).await;

    let reader = Reader::new().unwrap();
    let options = ReadOptions::builder().multipage_download(true).replace_images_with_placeholders(true).build();
    let article = reader.read_with_options(&format!("{}/gallery", server.uri()), &options).await.unwrap();

    let ids: Vec<&str> = article.images.iter().map(|image| image.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(article.images[2].uri.as_ref().unwrap().as_str(), format!("{}/c.jpg", server.uri()));
    assert!(article.images.iter().all(ArticleImage::is_valid_uri));
    for id in 1..=5 {
        assert!(article.content.contains(&format!("<!--IMG_{id}-->")));
    }
    assert!(!article.content.contains("<img"));
}

#[tokio::test]
async fn test_document_charset_overrides_header() {
    let server = MockServer::start().await;
    let body = story_page("Vánoce", "Kouzelné české Vánoce", &[], None);
    Mock::given(method("GET"))
        .and(path("/vanoce"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html; charset=ISO-8859-1"))
        .mount(&server)
        .await;

    let reader = Reader::new().unwrap();
    let article = reader.read(&format!("{}/vanoce", server.uri())).await.unwrap();

    assert!(article.content.contains("Kouzelné české Vánoce"));
    assert_eq!(article.title.as_deref(), Some("Vánoce"));
    assert!(article.raw.contains("Kouzelné"));
}

#[tokio::test]
async fn test_header_charset_kept_when_requested() {
    let server = MockServer::start().await;
    let body = story_page("Vánoce", "Kouzelné české Vánoce", &[], None);
    Mock::given(method("GET"))
        .and(path("/vanoce"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html; charset=ISO-8859-1"))
        .mount(&server)
        .await;

    let reader = Reader::new().unwrap();
    let options = ReadOptions::builder().prefer_html_encoding(false).build();
    let article = reader.read_with_options(&format!("{}/vanoce", server.uri()), &options).await.unwrap();

    assert!(!article.content.contains("Kouzelné"));
    assert_eq!(article.encoding.map(|e| e.name()), Some("windows-1252"));
}

#[tokio::test]
async fn test_cancellation_during_crawl() {
    let server = MockServer::start().await;
    mount_html(&server, "/story", story_page("Story", "Alpha", &[], Some("/story/2"))).await;
    Mock::given(method("GET"))
        .and(path("/story/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(10))
                .set_body_raw(story_page("Story", "Bravo", &[], None), "text/html"),
        )
        .mount(&server)
        .await;

    let reader = Reader::new().unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let result = reader.read_with_cancellation(&format!("{}/story", server.uri()), &multipage(), &cancel).await;
    assert!(matches!(result, Err(FolioError::Cancelled)));
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let reader = Reader::new().unwrap();
    let result = reader.read_with_cancellation("https://example.invalid/story", &ReadOptions::default(), &cancel).await;
    assert!(matches!(result, Err(FolioError::Cancelled)));
}

#[tokio::test]
async fn test_deep_links_kept_relative() {
    let server = MockServer::start().await;
    let body = story_page("Docs", "Alpha", &[], None).replace(
        "</article>",
        r##"<p>See <a href="#usage">usage</a> and <a href="/other#usage">elsewhere</a>, both linked from here.</p></article>"##,
    );
    mount_html(&server, "/docs", body.clone()).await;

    let reader = Reader::new().unwrap();
    let url = format!("{}/docs", server.uri());

    let options = ReadOptions::builder().use_deep_links(true).build();
    let article = reader.read_with_options(&url, &options).await.unwrap();
    assert!(article.content.contains(r##"href="#usage""##));
    assert!(article.content.contains(&format!(r#"href="{}/other#usage""#, server.uri())));

    let article = reader.read(&url).await.unwrap();
    assert!(article.content.contains(&format!(r#"href="{url}#usage""#)));
}

#[tokio::test]
async fn test_full_document_output() {
    let server = MockServer::start().await;
    mount_html(&server, "/story", story_page("Story", "Alpha", &[], None)).await;

    let reader = Reader::new().unwrap();
    let options = ReadOptions::builder().include_headers(true).include_headline(false).build();
    let article = reader.read_with_options(&format!("{}/story", server.uri()), &options).await.unwrap();

    assert!(article.content.starts_with("<!DOCTYPE html>"));
    assert!(article.content.contains("<title>Story</title>"));
    assert!(!article.content.contains("<h1>"));
    assert!(article.content_extracted);
}

#[tokio::test]
async fn test_multipage_full_document_wrapped_once() {
    let server = MockServer::start().await;
    mount_html(&server, "/story", story_page("Story", "Alpha", &[], Some("/story/2"))).await;
    mount_html(&server, "/story/2", story_page("Story", "Bravo", &[], None)).await;

    let reader = Reader::new().unwrap();
    let options = ReadOptions::builder().multipage_download(true).include_headers(true).build();
    let article = reader.read_with_options(&format!("{}/story", server.uri()), &options).await.unwrap();

    assert_eq!(article.page_count, 2);
    assert!(article.content.starts_with("<!DOCTYPE html>"));
    assert!(article.content.ends_with("</body></html>"));
    assert_eq!(article.content.matches("<!DOCTYPE html>").count(), 1);
    assert_eq!(article.content.matches("<html>").count(), 1);
    assert_eq!(article.content.matches("<title>Story</title>").count(), 1);
    assert_eq!(article.content.matches("<h1>Story</h1>").count(), 1);

    let bravo = article.content.find("Bravo").unwrap();
    assert!(bravo < article.content.find("</body>").unwrap());
}

#[tokio::test]
async fn test_multipage_headline_only_on_first_page() {
    let server = MockServer::start().await;
    mount_html(&server, "/story", story_page("Story", "Alpha", &[], Some("/story/2"))).await;
    mount_html(&server, "/story/2", story_page("Story", "Bravo", &[], None)).await;

    let reader = Reader::new().unwrap();
    let url = format!("{}/story", server.uri());
    let merged = reader.read_with_options(&url, &multipage()).await.unwrap();
    let single = reader.read(&url).await.unwrap();

    assert_eq!(merged.page_count, 2);
    assert!(merged.content.starts_with("<h1>Story</h1>"));
    assert_eq!(merged.content.matches("<h1>").count(), 1);
    assert_eq!(merged.plain_content.unwrap().matches("Story").count(), 1);
    assert!(merged.word_count < single.word_count * 2);
}

#[tokio::test]
async fn test_fixture_article() {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let server = MockServer::start().await;
    mount_html(&server, "/lighthouses", html).await;

    let reader = Reader::new().unwrap();
    let article = reader.read(&format!("{}/lighthouses", server.uri())).await.unwrap();

    assert_eq!(article.title.as_deref(), Some("Why Lighthouses Still Matter"));
    assert_eq!(article.description.as_deref(), Some("Satellite navigation did not make the old towers obsolete."));
    assert_eq!(article.front_image.unwrap().as_str(), format!("{}/media/lighthouse-large.jpg", server.uri()));
    assert_eq!(article.favicon.unwrap().as_str(), format!("{}/favicon.ico", server.uri()));
    assert!(article.content_extracted);
    assert!(article.word_count > 100);
    assert_eq!(article.images.len(), 2);
    assert_eq!(article.images[0].title.as_deref(), Some("First-order lens"));
    assert!(!article.content.contains("Reading tide tables"));
    assert!(!article.content.contains("All rights reserved"));
}
