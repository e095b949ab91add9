use crate::errors::DeliveryError;
use crate::net::Response;
use futures::future::BoxFuture;
use std::time::Duration;
use url::Url;

/// Outbound HTTP seam used by the reporter.
///
/// Object-safe so a tracker can hold an `Arc<dyn Transport>` and tests can swap
/// in a transport that records or fails instead of touching the network.
pub trait Transport: Send + Sync {
    /// POSTs `form` as `application/x-www-form-urlencoded` to `url` and returns
    /// the buffered response. Non-2xx statuses are returned as `Ok`; it is up to
    /// the caller to judge them.
    fn post_form(&self, url: Url, form: Vec<(String, String)>) -> BoxFuture<'static, Result<Response, DeliveryError>>;
}

/// reqwest-backed transport. One client is shared by every report.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, url: Url, form: Vec<(String, String)>) -> BoxFuture<'static, Result<Response, DeliveryError>> {
        let client = self.client.clone();

        Box::pin(async move {
            let res = client.post(url).form(&form).send().await?;

            let final_url = res.url().clone();
            let status = res.status().as_u16();
            let status_text = res.status().canonical_reason().unwrap_or("Unknown").to_string();
            let headers = res.headers().clone();

            // Listener replies are tiny, no streaming
            let body = res.bytes().await?.to_vec();

            Ok(Response {
                url: final_url,
                status,
                status_text,
                headers,
                body,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::testing::{closed_port, spawn_listener};
    use axum::http::StatusCode;

    fn local(port: u16) -> Url {
        Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap()
    }

    #[tokio::test]
    async fn posts_form_encoded_ring() {
        let (port, mut received) = spawn_listener(StatusCode::OK).await;
        let transport = HttpTransport::new("RingTracker/test", Duration::from_secs(5)).unwrap();

        let resp = transport
            .post_form(local(port), vec![("ring".into(), "3".into())])
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        assert!(resp.is_success());
        assert_eq!(resp.text(), "Done!");

        let report = received.recv().await.unwrap();
        assert_eq!(report.form.get("ring").map(String::as_str), Some("3"));
        assert_eq!(report.form.len(), 1);
        assert_eq!(report.content_type.as_deref(), Some("application/x-www-form-urlencoded"));
        assert_eq!(report.user_agent.as_deref(), Some("RingTracker/test"));
    }

    #[tokio::test]
    async fn error_status_is_returned_as_response() {
        let (port, _received) = spawn_listener(StatusCode::INTERNAL_SERVER_ERROR).await;
        let transport = HttpTransport::new("RingTracker/test", Duration::from_secs(5)).unwrap();

        let resp = transport
            .post_form(local(port), vec![("ring".into(), "1".into())])
            .await
            .unwrap();
        assert_eq!(resp.status, 500);
        assert!(!resp.is_success());
    }

    #[tokio::test]
    async fn refused_connection_is_a_net_error() {
        let port = closed_port().await;
        let transport = HttpTransport::new("RingTracker/test", Duration::from_secs(2)).unwrap();

        let res = transport.post_form(local(port), vec![("ring".into(), "1".into())]).await;
        assert!(matches!(res, Err(DeliveryError::Net(_))), "got {res:?}");
    }
}
