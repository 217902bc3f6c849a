//! `PidmanClient` requests against a local server answering canned responses

use fa_pid::{ArkHit, PidClient, PidError, PidmanClient, PidmanSettings};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const DOMAIN: &str = "http://pid.test/domains/1/";
const TARGET: &str = "http://fa.test/documents/abc/";

/// `Authorization` value for `fa:secret`
const BASIC_AUTH: &str = "basic zme6c2vjcmv0";

/// Serve one canned `(status, body)` per connection; the handle yields the
/// raw requests received
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);
            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        }
        requests
    });
    (url, handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = socket.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..read]);
        let text = String::from_utf8_lossy(&data);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8(data).unwrap()
}

fn client(url: &str) -> PidmanClient {
    PidmanClient::new(&PidmanSettings {
        host: format!("{url}/"),
        user: "fa".into(),
        password: "secret".into(),
        timeout: Some(Duration::from_secs(5)),
    })
    .unwrap()
}

#[tokio::test]
async fn search_sends_authenticated_query() {
    let (url, server) = serve(vec![(
        200,
        r#"{"results_count": 1, "results": [{"pid": "16x3n", "targets": [{"access_uri": "http://pid.test/ark:/25593/16x3n"}]}]}"#,
    )])
    .await;

    let search = client(&url).search_arks(DOMAIN, TARGET).await.unwrap();
    assert_eq!(search.count, 1);
    assert_eq!(
        search.hits,
        vec![ArkHit {
            pid: "16x3n".into(),
            access_uri: "http://pid.test/ark:/25593/16x3n".into(),
        }]
    );

    let requests = server.await.unwrap();
    let request = &requests[0];
    assert!(
        request.starts_with(
            "GET /pids/?domain_uri=http%3A%2F%2Fpid.test%2Fdomains%2F1%2F\
             &target=http%3A%2F%2Ffa.test%2Fdocuments%2Fabc%2F&type=ark HTTP/1.1\r\n"
        ),
        "{request}"
    );
    let lower = request.to_lowercase();
    assert!(lower.contains(&format!("authorization: {BASIC_AUTH}\r\n")), "{request}");
    assert!(lower.contains("accept: application/json\r\n"), "{request}");
}

#[tokio::test]
async fn create_posts_form_and_returns_trimmed_uri() {
    let (url, server) = serve(vec![(201, "http://pid.test/ark:/25593/new1\n")]).await;

    let uri = client(&url)
        .create_ark(DOMAIN, TARGET, "Hartsfield papers")
        .await
        .unwrap();
    assert_eq!(uri, "http://pid.test/ark:/25593/new1");

    let requests = server.await.unwrap();
    let request = &requests[0];
    assert!(request.starts_with("POST /ark/ HTTP/1.1\r\n"), "{request}");
    let lower = request.to_lowercase();
    assert!(lower.contains(&format!("authorization: {BASIC_AUTH}\r\n")), "{request}");
    assert!(
        lower.contains("content-type: application/x-www-form-urlencoded\r\n"),
        "{request}"
    );
    assert!(
        request.ends_with(
            "\r\n\r\ndomain=http%3A%2F%2Fpid.test%2Fdomains%2F1%2F\
             &target_uri=http%3A%2F%2Ffa.test%2Fdocuments%2Fabc%2F&name=Hartsfield+papers"
        ),
        "{request}"
    );
}

#[tokio::test]
async fn error_status_is_service_error_with_body() {
    let (url, _server) = serve(vec![(401, "Authorization Required")]).await;

    let err = client(&url)
        .create_ark(DOMAIN, TARGET, "name")
        .await
        .unwrap_err();
    assert!(
        matches!(&err, PidError::Service { status: 401, message } if message == "Authorization Required"),
        "{err:?}"
    );
    assert_eq!(err.to_string(), "401: Authorization Required");
    assert!(!err.is_config());
}

#[tokio::test]
async fn error_status_without_body_uses_reason() {
    let (url, _server) = serve(vec![(500, "")]).await;

    let err = client(&url).search_arks(DOMAIN, TARGET).await.unwrap_err();
    assert_eq!(err.to_string(), "500: Internal Server Error");
}

#[tokio::test]
async fn unreadable_search_body_is_invalid_response() {
    let (url, _server) = serve(vec![(200, "<html>maintenance</html>")]).await;

    let err = client(&url).search_arks(DOMAIN, TARGET).await.unwrap_err();
    assert!(matches!(err, PidError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn empty_creation_body_is_invalid_response() {
    let (url, _server) = serve(vec![(200, "  \n")]).await;

    let err = client(&url).create_ark(DOMAIN, TARGET, "name").await.unwrap_err();
    assert!(matches!(err, PidError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&url).search_arks(DOMAIN, TARGET).await.unwrap_err();
    assert!(matches!(err, PidError::Transport(_)), "{err:?}");
    assert!(err.to_string().starts_with("could not reach PID manager"));
}
