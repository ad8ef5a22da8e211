//! HTTP endpoint tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot` and
//! hand-built multipart bodies.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use lab_peek::web::server::{router, MAX_MULTIPART_FIELDS};

const BOUNDARY: &str = "lab-peek-test-boundary";

const GSGT_SAMPLE: &str = "[Header]\n\
GSGT Version\t2.0.4\n\
Processing Date\t7/31/2025 12:56 PM\n\
Gender    Female\n\
Num SNPs\t671521\n\
[Data]\n\
Sample ID\tSNP Name\tChr\tPosition\tAllele1 - Forward\tAllele2 - Forward\n\
DSC042739\t1:103380393\t1\t103380393\tG\tG\n";

/// A multipart part: field name, optional filename, content
type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: text/plain\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/lab-file")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_recognized_upload() {
    let request = upload_request(&[("file", Some("DSC042739.txt"), GSGT_SAMPLE.as_bytes())]);
    let (status, json) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["sampleId"], "DSC042739");
    assert_eq!(json["processingDate"], "7/31/2025 12:56 PM");
    assert_eq!(json["gender"], "Female");
    assert_eq!(json["numSnps"], "671521");
    assert_eq!(json["header"]["GSGT Version"], "2.0.4");
    assert_eq!(json["dataColumns"].as_array().unwrap().len(), 6);
    assert_eq!(json["dataColumns"][0], "Sample ID");
    assert_eq!(
        json["summary"],
        "Sample: DSC042739 · Processed: 7/31/2025 12:56 PM · Gender: Female · SNPs: 671521"
    );
}

#[tokio::test]
async fn test_absent_fields_are_omitted() {
    let content = b"[Header]\n[Data]\n";
    let request = upload_request(&[("file", Some("empty.txt"), &content[..])]);
    let (status, json) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"], "Lab file recognized (no header metadata).");
    assert!(json.get("sampleId").is_none());
    assert!(json.get("numSnps").is_none());
    assert_eq!(json["header"], serde_json::json!({}));
    assert_eq!(json["dataColumns"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unrecognized_upload() {
    let content = b"rsid\tchromosome\tposition\tgenotype\nrs1\t1\t100\tAA\n";
    let request = upload_request(&[("file", Some("23andme.txt"), &content[..])]);
    let (status, json) = send(router(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["ok"], false);
    assert_eq!(json["errorType"], "not_recognized");
    assert_eq!(json["error"], "File does not look like a recognized lab report.");
}

#[tokio::test]
async fn test_empty_upload_is_not_recognized() {
    let request = upload_request(&[("file", Some("empty.txt"), &b""[..])]);
    let (status, json) = send(router(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["errorType"], "not_recognized");
}

#[tokio::test]
async fn test_large_upload_only_prefix_read() {
    let mut content = GSGT_SAMPLE.as_bytes().to_vec();
    content.extend(std::iter::repeat(b'Z').take(150 * 1024));
    let request = upload_request(&[("file", Some("big.txt"), &content[..])]);
    let (status, json) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sampleId"], "DSC042739");
}

#[tokio::test]
async fn test_missing_file_field() {
    let request = upload_request(&[("note", None, &b"hello"[..])]);
    let (status, json) = send(router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorType"], "missing_input");
}

#[tokio::test]
async fn test_no_fields() {
    let request = upload_request(&[]);
    let (status, json) = send(router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["ok"], false);
}

#[tokio::test]
async fn test_file_field_after_other_fields() {
    let request = upload_request(&[
        ("client", None, &b"42"[..]),
        ("file", Some("DSC042739.txt"), GSGT_SAMPLE.as_bytes()),
    ]);
    let (status, json) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sampleId"], "DSC042739");
}

#[tokio::test]
async fn test_invalid_filename_rejected() {
    let request = upload_request(&[("file", Some("../../etc/passwd"), GSGT_SAMPLE.as_bytes())]);
    let (status, json) = send(router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["ok"], false);
    assert_eq!(json["errorType"], "invalid_filename");
}

#[tokio::test]
async fn test_too_many_fields() {
    let filler: Vec<Part<'_>> = (0..=MAX_MULTIPART_FIELDS)
        .map(|_| ("note", None, &b"x"[..]))
        .collect();
    let request = upload_request(&filler);
    let (status, json) = send(router(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorType"], "field_limit_exceeded");
}

#[tokio::test]
async fn test_security_headers_present() {
    let request = upload_request(&[("file", Some("a.txt"), GSGT_SAMPLE.as_bytes())]);
    let response = router().oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_index_page() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("/api/lab-file"));
}
