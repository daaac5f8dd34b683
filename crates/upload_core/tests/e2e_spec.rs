//! End-to-end scenarios: widget + HTTP client against a local stub service.

use std::io::Read;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tiny_http::{Header, Method, Response, Server};
use upload_core::{
    ClientConfig, HttpPredictClient, RecordingView, SelectedFile, SubmissionDispatcher,
    UploadWidget, ViewModel,
};

struct Captured {
    method: Method,
    url: String,
    content_type: Option<String>,
    body: Vec<u8>,
}

/// Serves the given `(status, body)` replies in order, one per request, and
/// returns what it received once all replies are used up.
fn stub_service(replies: Vec<(u16, &'static str)>) -> (ClientConfig, JoinHandle<Vec<Captured>>) {
    let server = Server::http("127.0.0.1:0").expect("bind stub service");
    let port = server.server_addr().to_ip().expect("tcp listener").port();
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in replies {
            let mut req = match server.recv_timeout(Duration::from_secs(10)) {
                Ok(Some(req)) => req,
                _ => break,
            };
            let mut buf = Vec::new();
            req.as_reader().read_to_end(&mut buf).unwrap();
            let content_type = req
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_string());
            seen.push(Captured {
                method: req.method().clone(),
                url: req.url().to_string(),
                content_type,
                body: buf,
            });
            let json = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
            req.respond(
                Response::from_string(body)
                    .with_status_code(status)
                    .with_header(json),
            )
            .unwrap();
        }
        seen
    });
    let cfg = ClientConfig {
        base_url: format!("http://127.0.0.1:{port}/"),
        ..ClientConfig::default()
    };
    (cfg, handle)
}

fn cat_image() -> SelectedFile {
    SelectedFile::new("cat.png", "image/png", b"\x89PNG\r\n\x1a\nCATPIXELS".to_vec())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn last(widget: &UploadWidget<RecordingView>) -> &ViewModel {
    widget.view().last().unwrap()
}

#[test]
fn e2e_scenario_success_renders_prediction() {
    let (cfg, server) = stub_service(vec![(200, r#"{"prediction":"cat","confidence":0.873}"#)]);
    let client = HttpPredictClient::new(&cfg).unwrap();
    let mut widget = UploadWidget::new(RecordingView::default());

    widget.on_file_selected(Some(cat_image()));
    widget.submit(&client);

    let vm = last(&widget);
    let result = vm.result.as_ref().expect("result visible");
    assert_eq!(result.prediction_line(), "Prediction: cat");
    assert_eq!(result.confidence_line(), "Confidence: 87%");
    assert!(vm.error_message.is_empty());
    assert!(vm.submit_enabled);

    let seen = server.join().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::Post);
    assert_eq!(seen[0].url, "/api/predict");
}

#[test]
fn e2e_request_is_multipart_with_image_field() {
    let (cfg, server) = stub_service(vec![(200, r#"{"prediction":"cat"}"#)]);
    let client = HttpPredictClient::new(&cfg).unwrap();
    let mut widget = UploadWidget::new(RecordingView::default());

    widget.on_file_selected(Some(cat_image()));
    widget.submit(&client);

    let seen = server.join().unwrap();
    let req = &seen[0];
    assert!(
        req.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("multipart/form-data; boundary="))
    );
    assert!(contains(&req.body, br#"name="image""#));
    assert!(contains(&req.body, br#"filename="cat.png""#));
    assert!(contains(&req.body, b"Content-Type: image/png"));
    assert!(contains(&req.body, b"CATPIXELS"));
    assert_eq!(last(&widget).result.as_ref().unwrap().confidence_line(), "Confidence: 0%");
}

#[test]
fn e2e_scenario_server_error_shows_message() {
    let (cfg, server) = stub_service(vec![(500, r#"{"message":"model unavailable"}"#)]);
    let client = HttpPredictClient::new(&cfg).unwrap();
    let mut widget = UploadWidget::new(RecordingView::default());

    widget.on_file_selected(Some(cat_image()));
    widget.submit(&client);

    let vm = last(&widget);
    assert_eq!(vm.error_message, "model unavailable");
    assert!(vm.result.is_none());
    assert!(vm.submit_enabled);
    server.join().unwrap();
}

#[test]
fn e2e_server_error_without_message_is_generic() {
    let (cfg, server) = stub_service(vec![(500, r#"{"success":false,"error":"boom"}"#)]);
    let client = HttpPredictClient::new(&cfg).unwrap();
    let mut widget = UploadWidget::new(RecordingView::default());

    widget.on_file_selected(Some(cat_image()));
    widget.submit(&client);

    assert_eq!(last(&widget).error_message, "Server error");
    server.join().unwrap();
}

#[test]
fn e2e_html_gateway_error_is_request_failed() {
    let (cfg, server) = stub_service(vec![(502, "<html><body>Bad Gateway</body></html>")]);
    let client = HttpPredictClient::new(&cfg).unwrap();
    let mut widget = UploadWidget::new(RecordingView::default());

    widget.on_file_selected(Some(cat_image()));
    widget.submit(&client);

    let vm = last(&widget);
    assert_eq!(vm.error_message, "Request failed");
    assert!(vm.result.is_none());
    assert!(vm.submit_enabled);
    server.join().unwrap();
}

#[test]
fn e2e_non_json_success_body_is_request_failed() {
    let (cfg, server) = stub_service(vec![(200, "<html>oops</html>")]);
    let client = HttpPredictClient::new(&cfg).unwrap();
    let mut widget = UploadWidget::new(RecordingView::default());

    widget.on_file_selected(Some(cat_image()));
    widget.submit(&client);

    let vm = last(&widget);
    assert_eq!(vm.error_message, "Request failed");
    assert!(vm.submit_enabled);
    server.join().unwrap();
}

#[test]
fn e2e_scenario_connection_refused() {
    let port = {
        let server = Server::http("127.0.0.1:0").unwrap();
        server.server_addr().to_ip().unwrap().port()
    };
    let cfg = ClientConfig {
        base_url: format!("http://127.0.0.1:{port}/"),
        ..ClientConfig::default()
    };
    let client = HttpPredictClient::new(&cfg).unwrap();
    let mut widget = UploadWidget::new(RecordingView::default());

    widget.on_file_selected(Some(cat_image()));
    widget.submit(&client);

    let vm = last(&widget);
    assert!(!vm.error_message.is_empty());
    assert_ne!(vm.error_message, "Server error");
    assert!(vm.result.is_none());
    assert!(vm.submit_enabled);
}

#[test]
fn e2e_submit_without_file_sends_nothing() {
    let (cfg, server) = stub_service(vec![(200, r#"{"prediction":"cat","confidence":1}"#)]);
    let client = HttpPredictClient::new(&cfg).unwrap();
    let mut widget = UploadWidget::new(RecordingView::default());

    widget.submit(&client);
    assert_eq!(last(&widget).error_message, "Select an image first");

    // the stub is still waiting for its only request
    widget.on_file_selected(Some(cat_image()));
    widget.submit(&client);
    assert_eq!(server.join().unwrap().len(), 1);
}

#[test]
fn e2e_scenario_repeat_is_idempotent() {
    let body = r#"{"prediction":"cat","confidence":0.873}"#;
    let (cfg, server) = stub_service(vec![(200, body), (200, body)]);
    let client = HttpPredictClient::new(&cfg).unwrap();
    let mut widget = UploadWidget::new(RecordingView::default());

    let mut outcomes = Vec::new();
    for _ in 0..2 {
        widget.on_file_selected(Some(cat_image()));
        let reset = last(&widget);
        assert!(reset.result.is_none());
        assert!(reset.error_message.is_empty());
        widget.submit(&client);
        outcomes.push(last(&widget).clone());
    }
    assert_eq!(outcomes[0], outcomes[1]);
    assert_eq!(server.join().unwrap().len(), 2);
}

#[test]
fn e2e_background_dispatch_against_http() {
    let (cfg, server) =
        stub_service(vec![(200, r#"{"prediction":"Ischemic","confidence":0.61}"#)]);
    let dispatcher = SubmissionDispatcher::new(Arc::new(HttpPredictClient::new(&cfg).unwrap()));
    let mut widget = UploadWidget::new(RecordingView::default());

    widget.on_file_selected(Some(cat_image()));
    widget.request_preview();
    assert!(dispatcher.submit(&mut widget));
    assert_eq!(last(&widget).submit_label, "Processing...");

    let deadline = Instant::now() + Duration::from_secs(10);
    while widget.state().is_submitting() {
        assert!(Instant::now() < deadline, "request never completed");
        dispatcher.poll(&mut widget);
        thread::sleep(Duration::from_millis(10));
    }

    let vm = last(&widget);
    assert_eq!(vm.result.as_ref().unwrap().confidence_line(), "Confidence: 61%");
    assert_eq!(vm.preview.as_ref().unwrap().file_name, "cat.png");
    assert_eq!(vm.submit_label, "Upload & Get Result");
    server.join().unwrap();
}
