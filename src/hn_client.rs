use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use thiserror::Error;

use crate::config::Settings;
use crate::models::{FetchState, SearchResponse, Story};

/// Everything that can go wrong fetching the front page. The `Display` text is
/// what ends up on screen.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("Network request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Network response was not ok (HTTP {0})")]
    Status(StatusCode),

    #[error("Unexpected response from the search API: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct HackerNewsClient {
    client: Client,
    endpoint: String,
    hits_per_page: u32,
}

impl HackerNewsClient {
    pub fn new(settings: &Settings) -> Result<Self, FetchFailure> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            hits_per_page: settings.hits_per_page,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One request for the current front page. No retries.
    pub fn fetch_top_stories(&self) -> Result<Vec<Story>, FetchFailure> {
        let hits_per_page = self.hits_per_page.to_string();
        tracing::debug!(endpoint = %self.endpoint, hits_per_page = self.hits_per_page, "requesting front page");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("tags", "front_page"), ("hitsPerPage", hits_per_page.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status));
        }

        // Body is read as text so a bad payload surfaces as Malformed,
        // not Transport
        let body = response.text()?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.hits)
    }

    /// Runs the request and folds the outcome into a terminal `FetchState`.
    pub fn load_top_stories(&self) -> FetchState {
        match self.fetch_top_stories() {
            Ok(stories) => {
                tracing::info!(count = stories.len(), "loaded front-page stories");
                FetchState::Success(stories)
            }
            Err(err) => {
                tracing::warn!(endpoint = %self.endpoint, error = %err, "front-page fetch failed");
                FetchState::Error(err.to_string())
            }
        }
    }
}

/// A single in-flight (or finished) front-page request.
///
/// The request runs on its own thread; the UI thread calls [`StoryFetcher::poll`]
/// every frame and never blocks. Dropping the fetcher before the worker is done
/// discards the result.
pub struct StoryFetcher {
    receiver: Option<Receiver<FetchState>>,
    state: FetchState,
}

impl StoryFetcher {
    /// Starts the request. `on_complete` runs on the worker after the result
    /// has been handed over, which lets the UI schedule a repaint.
    pub fn spawn<F>(client: HackerNewsClient, on_complete: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let state = client.load_top_stories();
            if tx.send(state).is_err() {
                tracing::debug!("story fetch finished after its view went away");
                return;
            }
            on_complete();
        });

        Self {
            receiver: Some(rx),
            state: FetchState::Loading,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn in_flight(&self) -> bool {
        self.receiver.is_some()
    }

    /// Picks up the worker's result if it has arrived.
    pub fn poll(&mut self) -> &FetchState {
        let Some(rx) = &self.receiver else {
            return &self.state;
        };

        let received = rx.try_recv();
        match received {
            Ok(state) => {
                self.state = state;
                self.receiver = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                tracing::error!("story fetch worker exited without a result");
                self.state = FetchState::Error("story fetch worker stopped unexpectedly".to_string());
                self.receiver = None;
            }
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Duration;

    const TWO_STORIES: &str = r#"{"hits":[
        {"objectID":"1","title":"Rust rewrite","points":120,"url":"https://a"},
        {"objectID":"2","title":"Go service","points":80,"url":"https://b"}
    ],"nbHits":2,"page":0}"#;

    /// Serves one canned HTTP response and hands back the request line it saw.
    fn serve_once(status_line: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).expect("read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).expect("write response");
            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (format!("http://{addr}/api/v1/search"), handle)
    }

    fn client_for(endpoint: &str) -> HackerNewsClient {
        let settings = Settings {
            endpoint: endpoint.to_string(),
            timeout: Duration::from_secs(5),
            ..Settings::default()
        };
        HackerNewsClient::new(&settings).expect("client")
    }

    fn unreachable_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        format!("http://{addr}/api/v1/search")
    }

    #[test]
    fn requests_front_page_tag_with_100_hits() {
        let (endpoint, server) = serve_once("HTTP/1.1 200 OK", TWO_STORIES);
        client_for(&endpoint).fetch_top_stories().expect("fetch");

        let request_line = server.join().expect("server thread");
        assert!(request_line.starts_with("GET /api/v1/search?"), "{request_line}");
        assert!(request_line.contains("tags=front_page"), "{request_line}");
        assert!(request_line.contains("hitsPerPage=100"), "{request_line}");
    }

    #[test]
    fn success_keeps_api_order() {
        let (endpoint, server) = serve_once("HTTP/1.1 200 OK", TWO_STORIES);
        let state = client_for(&endpoint).load_top_stories();
        server.join().expect("server thread");

        let FetchState::Success(stories) = state else {
            panic!("expected success, got {state:?}");
        };
        let titles: Vec<&str> = stories.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Rust rewrite", "Go service"]);
    }

    #[test]
    fn empty_hits_is_success_not_error() {
        let (endpoint, server) = serve_once("HTTP/1.1 200 OK", r#"{"hits":[]}"#);
        let state = client_for(&endpoint).load_top_stories();
        server.join().expect("server thread");
        assert_eq!(state, FetchState::Success(Vec::new()));
    }

    #[test]
    fn non_success_status_is_an_error() {
        let (endpoint, server) = serve_once("HTTP/1.1 503 Service Unavailable", "{}");
        let err = client_for(&endpoint).fetch_top_stories().unwrap_err();
        server.join().expect("server thread");

        assert!(matches!(err, FetchFailure::Status(status) if status == StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(
            err.to_string(),
            "Network response was not ok (HTTP 503 Service Unavailable)"
        );
    }

    #[test]
    fn malformed_body_is_an_error() {
        let (endpoint, server) = serve_once("HTTP/1.1 200 OK", r#"{"results":[]}"#);
        let err = client_for(&endpoint).fetch_top_stories().unwrap_err();
        server.join().expect("server thread");
        assert!(matches!(err, FetchFailure::Malformed(_)), "{err:?}");
    }

    #[test]
    fn connection_refused_becomes_error_state() {
        let client = client_for(&unreachable_endpoint());
        assert!(matches!(
            client.fetch_top_stories(),
            Err(FetchFailure::Transport(_))
        ));

        match client.load_top_stories() {
            FetchState::Error(message) => assert!(message.starts_with("Network request failed")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn fetcher_starts_loading_then_resolves() {
        let (endpoint, server) = serve_once("HTTP/1.1 200 OK", TWO_STORIES);
        let (done_tx, done_rx) = mpsc::channel();

        let mut fetcher = StoryFetcher::spawn(client_for(&endpoint), move || {
            let _ = done_tx.send(());
        });
        assert!(fetcher.in_flight());

        done_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("fetch completes");
        server.join().expect("server thread");

        match fetcher.poll() {
            FetchState::Success(stories) => assert_eq!(stories.len(), 2),
            other => panic!("expected success, got {other:?}"),
        }
        assert!(!fetcher.in_flight());
    }

    #[test]
    fn fetcher_reports_transport_failure() {
        let (done_tx, done_rx) = mpsc::channel();
        let mut fetcher = StoryFetcher::spawn(client_for(&unreachable_endpoint()), move || {
            let _ = done_tx.send(());
        });

        done_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("fetch completes");
        assert!(matches!(fetcher.poll(), FetchState::Error(_)));
    }

    #[test]
    fn vanished_worker_is_reported_as_error() {
        let (tx, rx) = mpsc::channel::<FetchState>();
        drop(tx);
        let mut fetcher = StoryFetcher {
            receiver: Some(rx),
            state: FetchState::Loading,
        };

        assert_eq!(
            fetcher.poll(),
            &FetchState::Error("story fetch worker stopped unexpectedly".to_string())
        );
        assert!(!fetcher.in_flight());
    }

    #[test]
    fn poll_before_completion_stays_loading() {
        let (_tx, rx) = mpsc::channel::<FetchState>();
        let mut fetcher = StoryFetcher {
            receiver: Some(rx),
            state: FetchState::Loading,
        };
        assert!(fetcher.poll().is_loading());
        assert!(fetcher.in_flight());
    }
}
