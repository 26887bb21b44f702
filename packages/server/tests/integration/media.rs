use crate::common::{TestApp, png_bytes, routes};

#[tokio::test]
async fn upload_stores_an_image_and_reports_its_shape() {
    let app = TestApp::spawn().await;

    let res = app
        .upload_image(png_bytes(1), "image/png", "original-name.png", None)
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["width"], 4);
    assert_eq!(res.body["height"], 4);
    assert_eq!(res.body["format"], "png");

    let public_id = res.body["public_id"].as_str().unwrap();
    // Stored names are random, never the client filename.
    assert!(!public_id.contains("original-name"));
    assert!(public_id.starts_with("vitrine/"));

    let object = app.media_root.join(format!("{public_id}.png"));
    assert!(object.exists());
}

#[tokio::test]
async fn identical_bytes_dedup_to_one_asset() {
    let app = TestApp::spawn().await;
    let bytes = png_bytes(42);

    let first = app
        .upload_image(bytes.clone(), "image/png", "a.png", Some("gallery"))
        .await;
    let second = app
        .upload_image(bytes, "image/png", "b.png", Some("gallery"))
        .await;

    assert_eq!(first.status, 201);
    assert_eq!(second.status, 201);
    assert_eq!(first.body["public_id"], second.body["public_id"]);
    assert_eq!(first.body["url"], second.body["url"]);

    // One object on disk, not two.
    let folder = app.media_root.join("vitrine/gallery");
    let entries: Vec<_> = std::fs::read_dir(folder).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn same_bytes_in_different_folders_are_distinct_assets() {
    let app = TestApp::spawn().await;
    let bytes = png_bytes(7);

    let one = app
        .upload_image(bytes.clone(), "image/png", "a.png", Some("gallery"))
        .await;
    let two = app
        .upload_image(bytes, "image/png", "a.png", Some("projects/alpha"))
        .await;

    assert_ne!(one.body["public_id"], two.body["public_id"]);
}

#[tokio::test]
async fn non_image_uploads_are_rejected() {
    let app = TestApp::spawn().await;

    let declared_text = app
        .upload_image(b"plain text".to_vec(), "text/plain", "notes.txt", None)
        .await;
    assert_eq!(declared_text.status, 400);
    assert_eq!(declared_text.body["code"], "INVALID_TYPE");

    // Declared as an image but not decodable as one.
    let fake = app
        .upload_image(b"not actually a png".to_vec(), "image/png", "fake.png", None)
        .await;
    assert_eq!(fake.status, 400);
    assert_eq!(fake.body["code"], "INVALID_TYPE");
}

#[tokio::test]
async fn oversized_uploads_are_rejected() {
    let app = TestApp::spawn().await;

    // The test server caps uploads at 64 KiB.
    let res = app
        .upload_image(vec![0u8; 100 * 1024], "image/png", "big.png", None)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "TOO_LARGE");
}

#[tokio::test]
async fn delete_reports_the_missing_or_deleted_distinction() {
    let app = TestApp::spawn().await;

    let upload = app
        .upload_image(png_bytes(99), "image/png", "x.png", Some("gallery"))
        .await;
    let public_id = upload.body["public_id"].as_str().unwrap().to_string();

    let first = app.delete(&routes::media_asset(&public_id)).await;
    assert_eq!(first.status, 200);
    assert_eq!(first.body["deleted"], true);

    let second = app.delete(&routes::media_asset(&public_id)).await;
    assert_eq!(second.status, 200);
    assert_eq!(second.body["deleted"], false);
}

#[tokio::test]
async fn deleted_assets_can_be_uploaded_again() {
    let app = TestApp::spawn().await;
    let bytes = png_bytes(123);

    let first = app
        .upload_image(bytes.clone(), "image/png", "a.png", Some("gallery"))
        .await;
    let public_id = first.body["public_id"].as_str().unwrap().to_string();
    app.delete(&routes::media_asset(&public_id)).await;

    let again = app
        .upload_image(bytes, "image/png", "a.png", Some("gallery"))
        .await;
    assert_eq!(again.status, 201);
    // A fresh asset, not the tombstoned one.
    assert_ne!(again.body["public_id"], first.body["public_id"]);
}

#[tokio::test]
async fn gallery_lists_newest_first_with_variants() {
    let app = TestApp::spawn().await;

    for shade in [1u8, 2, 3] {
        let res = app
            .upload_image(png_bytes(shade), "image/png", "g.png", Some("gallery"))
            .await;
        assert_eq!(res.status, 201);
        // Distinct created_at values for a deterministic order.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    let res = app.get(routes::GALLERY).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["total"], 3);

    let data = res.body["data"].as_array().unwrap();
    let created: Vec<chrono::DateTime<chrono::FixedOffset>> = data
        .iter()
        .map(|a| chrono::DateTime::parse_from_rfc3339(a["created_at"].as_str().unwrap()).unwrap())
        .collect();
    let mut sorted = created.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(created, sorted, "gallery must be newest-first");

    let first = &data[0];
    let url = first["url"].as_str().unwrap();
    assert_eq!(
        first["thumbnail"].as_str().unwrap(),
        format!("{url}?width=300&height=300&fit=cover")
    );
    assert!(first["medium"].as_str().unwrap().contains("width=800"));
    assert!(first["large"].as_str().unwrap().contains("width=1920"));
}

#[tokio::test]
async fn gallery_folder_and_max_parameters_apply() {
    let app = TestApp::spawn().await;

    app.upload_image(png_bytes(10), "image/png", "a.png", Some("gallery"))
        .await;
    app.upload_image(png_bytes(20), "image/png", "b.png", Some("projects/alpha"))
        .await;

    let scoped = app.get(&format!("{}?folder=projects/alpha", routes::GALLERY)).await;
    assert_eq!(scoped.body["total"], 1);

    app.upload_image(png_bytes(30), "image/png", "c.png", Some("gallery"))
        .await;
    let limited = app.get(&format!("{}?max=1", routes::GALLERY)).await;
    assert_eq!(limited.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn media_endpoints_fail_closed_without_a_backend() {
    let app = TestApp::spawn_without_media().await;

    let upload = app
        .upload_image(png_bytes(1), "image/png", "a.png", None)
        .await;
    assert_eq!(upload.status, 500);
    assert_eq!(upload.body["code"], "NOT_CONFIGURED");

    let gallery = app.get(routes::GALLERY).await;
    assert_eq!(gallery.status, 500);
    assert_eq!(gallery.body["code"], "NOT_CONFIGURED");
}
