//! Tests for `ReqwestClient` and request construction.

use super::*;

mod http_request {
    use super::*;

    fn url() -> url::Url {
        url::Url::parse("http://alertmanager.local:9093/api/v1/alerts").unwrap()
    }

    #[test]
    fn post_json_sets_method_header_and_body() {
        let req = HttpRequest::post_json(url(), b"[]".to_vec());

        assert_eq!(req.method, http::Method::POST);
        assert_eq!(
            req.headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(req.body.as_deref(), Some(&b"[]"[..]));
    }

    #[test]
    fn post_starts_without_body() {
        let req = HttpRequest::post(url());

        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }
}

mod http_response {
    use super::*;

    #[test]
    fn body_text_decodes_utf8() {
        let resp = HttpResponse::new(http::StatusCode::BAD_REQUEST, b"bad alert".to_vec());
        assert_eq!(resp.body_text(), Some("bad alert"));
    }

    #[test]
    fn body_text_rejects_invalid_utf8() {
        let resp = HttpResponse::new(http::StatusCode::OK, vec![0xff, 0xfe]);
        assert_eq!(resp.body_text(), None);
    }
}

mod reqwest_client {
    use super::*;

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestClient>();
    }

    #[test]
    fn from_client_accepts_custom_client() {
        let custom = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let client = ReqwestClient::from_client(custom);

        assert!(format!("{client:?}").contains("ReqwestClient"));
    }

    #[tokio::test]
    async fn closed_port_is_a_connection_error() {
        // Bind to get a free port, then release it so nothing listens there.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = ReqwestClient::from_client(
            reqwest::Client::builder().no_proxy().build().unwrap(),
        );
        let url = url::Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();

        let result = client.request(HttpRequest::post_json(url, b"[]".to_vec())).await;

        assert!(matches!(result, Err(HttpError::Connection(_))));
    }

    #[tokio::test]
    async fn shared_client_sends_through_arc() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = std::sync::Arc::new(ReqwestClient::from_client(
            reqwest::Client::builder().no_proxy().build().unwrap(),
        ));
        let url = url::Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();

        let result = HttpClient::request(&client, HttpRequest::post_json(url, b"[]".to_vec())).await;

        assert!(matches!(result, Err(HttpError::Connection(_))));
    }
}
