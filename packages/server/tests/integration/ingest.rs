use serde_json::json;

use crate::common::{TestApp, png_bytes, routes};

const DOCUMENT: &str = "---\n\
title: Frontmatter Title\n\
description: \"From the frontmatter\"\n\
tags: rust, cms\n\
publishedAt: 2024-03-01\n\
---\n\
# Write-up\n\
\n\
![diagram](./images/diagram.png)\n\
![external](https://elsewhere.example.com/pic.png)\n\
![missing](./images/never-uploaded.png)\n";

#[tokio::test]
async fn rewrites_local_refs_and_merges_frontmatter() {
    let app = TestApp::spawn().await;

    let record = json!({"slug": "write-up", "title": "Operator Title"});
    let res = app
        .ingest(
            routes::PROJECT_INGEST,
            DOCUMENT,
            vec![("diagram.png", png_bytes(50))],
            Some(&record),
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let content = res.body["record"]["content"].as_str().unwrap();

    // The uploaded file's reference is rewritten to its hosted URL.
    let uploaded = res.body["uploaded"].as_array().unwrap();
    assert_eq!(uploaded.len(), 1);
    let url = uploaded[0]["url"].as_str().unwrap();
    assert!(content.contains(&format!("![diagram]({url})")));
    assert!(!content.contains("./images/diagram.png"));

    // Remote and dangling references are untouched.
    assert!(content.contains("![external](https://elsewhere.example.com/pic.png)"));
    assert!(content.contains("![missing](./images/never-uploaded.png)"));

    // Frontmatter fills empty fields but never operator-entered ones.
    assert_eq!(res.body["record"]["title"], "Operator Title");
    assert_eq!(res.body["record"]["description"], "From the frontmatter");
    assert_eq!(res.body["record"]["tags"], json!(["rust", "cms"]));
    assert!(
        res.body["record"]["published_at"]
            .as_str()
            .unwrap()
            .starts_with("2024-03-01")
    );

    // Uploads land in a folder namespaced by variant and slug.
    assert!(
        uploaded[0]["public_id"]
            .as_str()
            .unwrap()
            .starts_with("vitrine/projects/write-up/")
    );
}

#[tokio::test]
async fn slug_can_come_from_frontmatter_alone() {
    let app = TestApp::spawn().await;

    let doc = "---\nslug: from-frontmatter\ntitle: T\n---\nBody.\n";
    let res = app.ingest(routes::POST_INGEST, doc, vec![], None).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["record"]["slug"], "from-frontmatter");
}

#[tokio::test]
async fn missing_slug_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let res = app
        .ingest(routes::PROJECT_INGEST, "no frontmatter here", vec![], None)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_document_is_a_validation_error() {
    let app = TestApp::spawn().await;

    // Build a form with no document field at all.
    let form = reqwest::multipart::Form::new().text("record", json!({"slug": "x"}).to_string());
    let res = app
        .client
        .post(app.url(routes::PROJECT_INGEST))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send ingest request");
    let res = crate::common::TestResponse::from_response(res).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn duplicate_filenames_resolve_to_the_last_upload() {
    let app = TestApp::spawn().await;

    let doc = "---\nslug: dupes\n---\n![a](shot.png)\n";
    let res = app
        .ingest(
            routes::PROJECT_INGEST,
            doc,
            vec![("shot.png", png_bytes(1)), ("shot.png", png_bytes(2))],
            None,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let uploaded = res.body["uploaded"].as_array().unwrap();
    assert_eq!(uploaded.len(), 2);
    let last_url = uploaded[1]["url"].as_str().unwrap();
    let content = res.body["record"]["content"].as_str().unwrap();
    assert!(content.contains(&format!("![a]({last_url})")));
}

#[tokio::test]
async fn spaced_filenames_match_percent_encoded_refs() {
    let app = TestApp::spawn().await;

    let doc = "---\nslug: spaced\n---\n![shot](images/site%20map.png)\n";
    let res = app
        .ingest(
            routes::POST_INGEST,
            doc,
            vec![("site map.png", png_bytes(77))],
            None,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let url = res.body["uploaded"][0]["url"].as_str().unwrap();
    let content = res.body["record"]["content"].as_str().unwrap();
    assert!(content.contains(&format!("![shot]({url})")));
}

#[tokio::test]
async fn notion_style_markdown_is_normalized() {
    let app = TestApp::spawn().await;

    let doc = "---\nslug: notion\n---\n==key point==\n\n```js\nconsole.log(1)\n```\n";
    let res = app.ingest(routes::POST_INGEST, doc, vec![], None).await;
    assert_eq!(res.status, 200, "{}", res.text);

    let content = res.body["record"]["content"].as_str().unwrap();
    assert!(content.contains("**key point**"));
    assert!(content.contains("```javascript\n"));
}

#[tokio::test]
async fn reused_document_images_dedup_against_prior_ingests() {
    let app = TestApp::spawn().await;

    let doc = "---\nslug: reingested\n---\n![a](pic.png)\n";
    let bytes = png_bytes(9);

    let first = app
        .ingest(routes::PROJECT_INGEST, doc, vec![("pic.png", bytes.clone())], None)
        .await;
    let second = app
        .ingest(routes::PROJECT_INGEST, doc, vec![("pic.png", bytes)], None)
        .await;

    assert_eq!(first.status, 200);
    assert_eq!(second.status, 200);
    assert_eq!(
        first.body["uploaded"][0]["public_id"],
        second.body["uploaded"][0]["public_id"]
    );
}
