/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::parser::{ArticleLinker, article_id_from_element_id, article_id_from_path};

// Helper function to test article urls
fn test_article_url(origin: &str, article_id: &str, expected: &str) {
    assert_eq!(
        ArticleLinker::new(origin)
            .unwrap()
            .article_url(article_id)
            .as_str(),
        expected
    );
}

#[test]
fn test_article_url_from_origin() {
    test_article_url("https://blog.example.com", "a1", "https://blog.example.com/article/a1");
    test_article_url("https://blog.example.com/", "a1", "https://blog.example.com/article/a1");
    test_article_url("http://localhost:5000", "rec42", "http://localhost:5000/article/rec42");
    // Only the origin part of the configured url is kept.
    test_article_url(
        "https://blog.example.com/posts/?page=2#top",
        "a1",
        "https://blog.example.com/article/a1",
    );
}

#[test]
fn test_article_url_escapes_id() {
    test_article_url("https://blog.example.com", "a/b", "https://blog.example.com/article/a%2Fb");
    test_article_url("https://blog.example.com", "a b", "https://blog.example.com/article/a%20b");
}

#[test]
fn test_invalid_origins() {
    assert!(ArticleLinker::new("not a url").is_err());
    assert!(ArticleLinker::new("mailto:me@example.com").is_err());
}

#[test]
fn test_resolve_health_path() {
    let linker = ArticleLinker::new("https://blog.example.com/posts/").unwrap();
    assert_eq!(
        linker.resolve("/api/health").unwrap().as_str(),
        "https://blog.example.com/api/health"
    );
    assert_eq!(linker.host(), Some("blog.example.com"));
}

#[test]
fn test_article_id_from_element_id() {
    assert_eq!(article_id_from_element_id("article-42"), Some("42"));
    assert_eq!(article_id_from_element_id("article-rec-xyz"), Some("rec-xyz"));
    assert_eq!(article_id_from_element_id("article-"), None);
    assert_eq!(article_id_from_element_id("feature-1"), None);
}

#[test]
fn test_article_id_from_path() {
    assert_eq!(article_id_from_path("/article/42"), Some("42"));
    assert_eq!(article_id_from_path("/article/42?ref=home#c1"), Some("42"));
    assert_eq!(article_id_from_path("/article/42/"), None);
    assert_eq!(article_id_from_path("/"), None);
    assert_eq!(article_id_from_path(""), None);
}
