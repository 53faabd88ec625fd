//! Full lifecycle tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises the client
//! operations over real HTTP using ureq as the host HTTP client. The host
//! executes the requests the core builds — including multipart encoding of
//! upload bodies — and hands the raw responses back to the core for
//! interpretation.

use filestore_core::{
    ApiError, DerivedImageOptions, FilePart, FilesClient, FindOptions, GetOptions, HttpMethod,
    HttpRequest, HttpResponse, MediaVaultClient, RequestBody,
};

const BOUNDARY: &str = "filestore-integration-boundary";

fn encode_multipart(file: &FilePart) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"file\"; \
             filename=\"{}\"\r\ncontent-type: application/octet-stream\r\n\r\n",
            file.file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(&file.content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, None) => agent.delete(&req.path).call(),
        (HttpMethod::Delete, Some(RequestBody::Json(body))) => agent
            .delete(&req.path)
            .force_send_body()
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, Some(RequestBody::Json(body))) => agent
            .post(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Put, Some(RequestBody::Json(body))) => agent
            .put(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, Some(RequestBody::Multipart(file))) => agent
            .post(&req.path)
            .content_type(format!("multipart/form-data; boundary={BOUNDARY}"))
            .send(&encode_multipart(&file)[..]),
        (method, body) => panic!("unsupported request shape: {method:?} with {body:?}"),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_vec().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn files_lifecycle() {
    let base_url = start_server();
    let client = FilesClient::new(&base_url);

    // Step 1: find — should be empty.
    let req = client.build_find(&FindOptions::default());
    let page = client.parse_find(execute(req)).unwrap();
    assert_eq!(page.total_records, 0);

    // Step 2: upload a file stream; the response is the created descriptor.
    let file = FilePart::new("report.pdf", b"original content".to_vec());
    let req = client.build_stream_create("docs/report.pdf", file);
    let created = client.parse_stream_create(execute(req)).unwrap();
    assert_eq!(created.file_name, "report.pdf");
    assert_eq!(created.path.as_deref(), Some("docs/report.pdf"));
    assert_eq!(created.file_size, Some(16));
    let id = created.id;

    // Step 3: find with a search phrase.
    let options = FindOptions {
        search: Some("report".to_string()),
        ..Default::default()
    };
    let req = client.build_find(&options);
    let page = client.parse_find(execute(req)).unwrap();
    assert_eq!(page.total_records, 1);
    assert_eq!(page.item[0].id, id);

    // Step 4: get the descriptor.
    let req = client.build_get(id, &GetOptions::default());
    let fetched = client.parse_get(execute(req)).unwrap();
    assert_eq!(fetched.id, id);
    assert!(fetched.links.href("put").is_ok());

    // Step 5: update the descriptor through its HAL put link.
    let mut entry = fetched.clone();
    entry.description = Some("yearly report".to_string());
    let req = client.build_update(&entry).unwrap();
    let updated = client.parse_update(execute(req)).unwrap();
    assert_eq!(updated.description.as_deref(), Some("yearly report"));

    // Step 6: download the stream.
    let req = client.build_stream_get("docs/report.pdf", None);
    let bytes = client.parse_stream_get(execute(req)).unwrap();
    assert_eq!(bytes, b"original content");

    // Step 7: replace the stream and download again.
    let file = FilePart::new("report.pdf", b"replaced".to_vec());
    let req = client.build_stream_update("docs/report.pdf", None, file);
    let replaced = client.parse_stream_update(execute(req)).unwrap();
    assert_eq!(replaced.file_size, Some(8));

    let req = client.build_stream_get("docs/report.pdf", None);
    let bytes = client.parse_stream_get(execute(req)).unwrap();
    assert_eq!(bytes, b"replaced");

    // Step 8: ACL round-trip.
    let policies = vec![
        filestore_core::AclPolicy {
            action_id: "read".to_string(),
            user_id: Some("ana".to_string()),
            role_id: None,
        },
        filestore_core::AclPolicy {
            action_id: "write".to_string(),
            user_id: None,
            role_id: Some("editors".to_string()),
        },
    ];
    let req = client.build_acl_update(id, &policies).unwrap();
    let stored = client.parse_acl_update(execute(req)).unwrap();
    assert_eq!(stored.len(), 2);

    let req = client.build_acl_remove_by_user(id, "read", "ana");
    client.parse_acl_remove_by_user(execute(req)).unwrap();

    let req = client.build_acl_get(id);
    let remaining = client.parse_acl_get(execute(req)).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].role_id.as_deref(), Some("editors"));

    // Step 9: batch update.
    let mut entry = updated.clone();
    entry.description = Some("archived".to_string());
    let req = client.build_batch_update(std::slice::from_ref(&entry)).unwrap();
    let updated = client.parse_batch_update(execute(req)).unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].description.as_deref(), Some("archived"));

    // Step 10: removing a derived variant keeps the original.
    let req = client
        .build_remove(&updated[0], Some(DerivedImageOptions::new(64, 64)))
        .unwrap();
    client.parse_remove(execute(req)).unwrap();

    let req = client.build_get(id, &GetOptions::default());
    assert!(client.parse_get(execute(req)).is_ok());

    // Step 11: remove the original through its HAL delete link.
    let req = client.build_remove(&updated[0], None).unwrap();
    client.parse_remove(execute(req)).unwrap();

    let req = client.build_get(id, &GetOptions::default());
    let err = client.parse_get(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 12: batch remove what's left.
    let file = FilePart::new("logo.png", b"png".to_vec());
    let req = client.build_stream_create("img/logo.png", file);
    let extra = client.parse_stream_create(execute(req)).unwrap();

    let req = client.build_batch_remove(&[extra.id], None).unwrap();
    client.parse_batch_remove(execute(req)).unwrap();

    let req = client.build_find(&FindOptions::default());
    let page = client.parse_find(execute(req)).unwrap();
    assert_eq!(page.total_records, 0);
}

#[test]
fn media_vault_lifecycle() {
    let base_url = start_server();
    let client = MediaVaultClient::new(&base_url);

    // Step 1: upload a media stream.
    let file = FilePart::new("clip.mp4", b"mp4 data".to_vec());
    let req = client.build_stream_create("videos/clip.mp4", file);
    let created = client.parse_stream_create(execute(req)).unwrap();
    assert_eq!(created.file_name, "clip.mp4");
    let id = created.id;

    // Step 2: find and get.
    let req = client.build_find(&FindOptions::default());
    let page = client.parse_find(execute(req)).unwrap();
    assert_eq!(page.total_records, 1);

    let req = client.build_get(id, &GetOptions::default());
    let fetched = client.parse_get(execute(req)).unwrap();
    assert_eq!(fetched.id, id);

    // Step 3: download, then replace a derived variant.
    let req = client.build_stream_get("videos/clip.mp4", None);
    let bytes = client.parse_stream_get(execute(req)).unwrap();
    assert_eq!(bytes, b"mp4 data");

    let file = FilePart::new("clip.mp4", b"thumb".to_vec());
    let req = client.build_stream_update(
        "videos/clip.mp4",
        Some(DerivedImageOptions::new(320, 180)),
        file,
    );
    client.parse_stream_update(execute(req)).unwrap();

    // Step 4: module settings round-trip.
    let req = client.build_settings_get();
    let mut settings = client.parse_settings_get(execute(req)).unwrap();
    assert_eq!(settings.upload_allowed_extensions.as_deref(), Some("*"));

    settings.upload_allowed_extensions = Some("mp4,mov".to_string());
    let req = client.build_settings_update(&settings).unwrap();
    let updated = client.parse_settings_update(execute(req)).unwrap();
    assert_eq!(updated.upload_allowed_extensions.as_deref(), Some("mp4,mov"));

    // Step 5: preprocessing provider settings.
    let req = client.build_preprocessing_find(&FindOptions::default());
    let providers = client.parse_preprocessing_find(execute(req)).unwrap();
    assert_eq!(providers.total_records, 1);
    let mut provider = providers.item[0].clone();
    assert_eq!(provider.name, "imageResizer");

    let req = client.build_preprocessing_get(provider.id, &GetOptions::default());
    client.parse_preprocessing_get(execute(req)).unwrap();

    provider.settings["faceDetection"] = serde_json::Value::Bool(true);
    let req = client.build_preprocessing_update(&provider).unwrap();
    let stored = client.parse_preprocessing_update(execute(req)).unwrap();
    assert_eq!(stored.settings["faceDetection"], true);

    // Step 6: link the media entry into the Files module.
    let files = FilesClient::new(&base_url);
    let req = files.build_batch_link(std::slice::from_ref(&fetched)).unwrap();
    let linked = files.parse_batch_link(execute(req)).unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].file_name, "clip.mp4");

    let req = files.build_find(&FindOptions::default());
    let page = files.parse_find(execute(req)).unwrap();
    assert_eq!(page.total_records, 1);

    // Step 7: remove the media entry through its HAL delete link.
    let req = client.build_remove(&fetched, None).unwrap();
    client.parse_remove(execute(req)).unwrap();

    let req = client.build_get(id, &GetOptions::default());
    let err = client.parse_get(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}
