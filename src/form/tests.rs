use crate::http::tests::test_server;

#[tokio::test]
async fn test_index_serves_upload_form() {
    let server = test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    assert!(response
        .header("content-type")
        .to_str()
        .expect("Content type should be ASCII.")
        .starts_with("text/html"));
    let page = response.text();
    assert!(page.contains(r#"action="/process""#));
    assert!(page.contains(r#"enctype="multipart/form-data""#));
    for field in ["image", "width", "height", "policy", "format"] {
        assert!(page.contains(&format!(r#"name="{field}""#)));
    }
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let server = test_server();

    let response = server.get("/health/check").expect_failure().await;

    response.assert_status_not_found();
}
