//! Transports and a listener for exercising the reporter in tests.

use crate::errors::DeliveryError;
use crate::net::{Response, Transport};
use axum::extract::Form;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use url::Url;

/// Records every request and answers with a fixed status.
pub(crate) struct RecordingTransport {
    status: u16,
    sent: Mutex<Vec<(Url, Vec<(String, String)>)>>,
}

impl RecordingTransport {
    pub(crate) fn new(status: u16) -> Arc<Self> {
        Arc::new(Self {
            status,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn sent(&self) -> Vec<(Url, Vec<(String, String)>)> {
        self.sent.lock().unwrap().clone()
    }

    /// Values of the `ring` field, in send order.
    pub(crate) fn rings(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|(_, form)| form.into_iter().find(|(k, _)| k == "ring").map(|(_, v)| v))
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn post_form(&self, url: Url, form: Vec<(String, String)>) -> BoxFuture<'static, Result<Response, DeliveryError>> {
        self.sent.lock().unwrap().push((url.clone(), form));
        let status = self.status;
        Box::pin(async move {
            Ok(Response {
                url,
                status,
                status_text: "test".into(),
                headers: http::HeaderMap::new(),
                body: b"Done!".to_vec(),
            })
        })
    }
}

/// Every request fails as if the listener were unreachable.
#[derive(Default)]
pub(crate) struct FailingTransport {
    pub(crate) calls: AtomicUsize,
}

impl Transport for FailingTransport {
    fn post_form(&self, _url: Url, _form: Vec<(String, String)>) -> BoxFuture<'static, Result<Response, DeliveryError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Err(DeliveryError::Status(503)) })
    }
}

/// Never answers, like a listener that accepted the connection and went silent.
pub(crate) struct StalledTransport;

impl Transport for StalledTransport {
    fn post_form(&self, _url: Url, _form: Vec<(String, String)>) -> BoxFuture<'static, Result<Response, DeliveryError>> {
        Box::pin(futures::future::pending())
    }
}

/// Panics inside the report task.
pub(crate) struct PanickingTransport;

impl Transport for PanickingTransport {
    fn post_form(&self, _url: Url, _form: Vec<(String, String)>) -> BoxFuture<'static, Result<Response, DeliveryError>> {
        panic!("transport exploded");
    }
}

/// A form POST as seen by the listener.
#[derive(Debug)]
pub(crate) struct ReceivedReport {
    pub(crate) content_type: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) form: HashMap<String, String>,
}

/// Serves `POST /` on a free local port and answers every report with `status`.
///
/// Returns the port and a channel yielding each decoded request.
pub(crate) async fn spawn_listener(status: StatusCode) -> (u16, mpsc::UnboundedReceiver<ReceivedReport>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let app = Router::new().route(
        "/",
        post(move |headers: HeaderMap, Form(form): Form<HashMap<String, String>>| {
            let tx = tx.clone();
            async move {
                let text = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
                let _ = tx.send(ReceivedReport {
                    content_type: text(header::CONTENT_TYPE),
                    user_agent: text(header::USER_AGENT),
                    form,
                });
                (status, "Done!")
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (port, rx)
}

/// A local port with nothing listening on it.
pub(crate) async fn closed_port() -> u16 {
    let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
    l.local_addr().unwrap().port()
}
