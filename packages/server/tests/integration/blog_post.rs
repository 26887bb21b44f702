use serde_json::json;

use crate::common::{TestApp, png_bytes, routes};

#[tokio::test]
async fn creates_and_reads_a_post() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            routes::POSTS,
            &json!({
                "slug": "hello-world",
                "title": "Hello World",
                "description": "The first post",
                "content": "Welcome to the blog.",
                "author": "Ada",
                "tag": "announcements",
            }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["author"], "Ada");
    assert_eq!(res.body["metadata"]["tag"], "announcements");
    assert_eq!(res.body["metadata"]["views"], 0);
    // Blog posts carry no like counter.
    assert!(res.body["metadata"].get("likes").is_none());

    let fetched = app.get(&routes::post("hello-world")).await;
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.body["slug"], "hello-world");
}

#[tokio::test]
async fn duplicate_slug_is_rejected_per_variant() {
    let app = TestApp::spawn().await;
    assert_eq!(app.create_post("twice").await.status, 201);

    let res = app.create_post("twice").await;
    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "DUPLICATE_SLUG");

    // The project namespace is independent of the post namespace.
    assert_eq!(app.create_project("twice", 0).await.status, 201);
}

#[tokio::test]
async fn updates_resolve_ids_before_slugs() {
    let app = TestApp::spawn().await;
    let created = app.create_post("resolvable").await;
    let id = created.body["id"].as_str().unwrap();

    let res = app
        .patch_json(&routes::post(id), &json!({"title": "Via id"}))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["title"], "Via id");

    let res = app
        .patch_json(&routes::post("resolvable"), &json!({"title": "Via slug"}))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["title"], "Via slug");
}

#[tokio::test]
async fn author_and_tag_clear_with_null() {
    let app = TestApp::spawn().await;
    app.post_json(
        routes::POSTS,
        &json!({
            "slug": "clearable",
            "title": "T",
            "description": "D",
            "content": "C",
            "author": "Ada",
            "tag": "drafts",
        }),
    )
    .await;

    let res = app
        .patch_json(
            &routes::post("clearable"),
            &json!({"author": null, "tag": null}),
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert!(res.body["author"].is_null());
    assert!(res.body["metadata"]["tag"].is_null());
}

#[tokio::test]
async fn slug_change_conflicts_with_existing_post() {
    let app = TestApp::spawn().await;
    app.create_post("one").await;
    app.create_post("two").await;

    let res = app
        .patch_json(&routes::post("two"), &json!({"slug": "one"}))
        .await;
    assert_eq!(res.status, 409);
}

#[tokio::test]
async fn list_orders_and_filters_posts() {
    let app = TestApp::spawn().await;
    for (slug, order) in [("late", 5), ("early", 0)] {
        let res = app
            .post_json(
                routes::POSTS,
                &json!({
                    "slug": slug,
                    "title": slug,
                    "description": "d",
                    "content": "c",
                    "order": order,
                }),
            )
            .await;
        assert_eq!(res.status, 201);
    }

    let res = app.get(routes::POSTS).await;
    let slugs: Vec<&str> = res.body.as_array().unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["early", "late"]);
}

#[tokio::test]
async fn views_accumulate_across_concurrent_reads() {
    let app = TestApp::spawn().await;
    app.create_post("busy").await;

    let n = 10;
    let mut handles = Vec::new();
    for _ in 0..n {
        let client = app.client.clone();
        let url = app.url(&routes::post("busy"));
        handles.push(tokio::spawn(async move {
            client.get(url).send().await.expect("GET failed").status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 200);
    }

    app.wait_for_views(&routes::post("busy"), n).await;
}

#[tokio::test]
async fn featured_toggle_flips_the_flag() {
    let app = TestApp::spawn().await;
    app.create_post("promotable").await;

    let on = app.post_empty(&routes::post_featured("promotable")).await;
    assert_eq!(on.body["featured"], true);
    let off = app.post_empty(&routes::post_featured("promotable")).await;
    assert_eq!(off.body["featured"], false);
}

#[tokio::test]
async fn delete_cleans_up_the_post_image() {
    let app = TestApp::spawn().await;

    let upload = app
        .upload_image(png_bytes(200), "image/png", "hero.png", Some("posts/doomed"))
        .await;
    assert_eq!(upload.status, 201, "{}", upload.text);
    let url = upload.body["url"].as_str().unwrap().to_string();
    let public_id = upload.body["public_id"].as_str().unwrap();
    let format = upload.body["format"].as_str().unwrap();
    let object = app.media_root.join(format!("{public_id}.{format}"));

    let res = app
        .post_json(
            routes::POSTS,
            &json!({
                "slug": "doomed-post",
                "title": "T",
                "description": "D",
                "content": "C",
                "image": url,
            }),
        )
        .await;
    assert_eq!(res.status, 201);

    assert_eq!(app.delete(&routes::post("doomed-post")).await.status, 200);
    assert_eq!(app.get(&routes::post("doomed-post")).await.status, 404);

    for _ in 0..100 {
        if !object.exists() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
    panic!("post image survived record deletion");
}
