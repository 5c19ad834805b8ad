//! Scripted port implementations for tool tests.

use async_trait::async_trait;
use sleuth_application::{
    CompletionClient, CompletionRequest, CompletionResponse, GatewayError, HttpFetcher,
    HttpResponse, ProviderResult, SearchProvider, SearchQuery, TokenUsage,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<String, GatewayError> + Send + Sync>;

/// Completion client answering through a closure over the request.
pub struct FakeCompletion {
    responder: Responder,
    usage: TokenUsage,
    delay: Duration,
    in_flight: AtomicUsize,
    /// Most calls observed in flight at once
    pub peak_in_flight: AtomicUsize,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn new(
        responder: impl Fn(&CompletionRequest) -> Result<String, GatewayError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Hold every call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Always answers `text`.
    pub fn fixed(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Concatenated message contents of every request so far.
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| {
                r.messages
                    .iter()
                    .map(|m| m.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, GatewayError> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let answer = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        answer.map(|text| CompletionResponse {
            content: vec![text],
            usage: self.usage,
            model: None,
        })
    }
}

/// Search provider with a fixed result list and scripted failures.
pub struct FakeSearch {
    results: Vec<ProviderResult>,
    failures: AtomicUsize,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<SearchQuery>>,
}

impl FakeSearch {
    pub fn new(results: Vec<ProviderResult>) -> Self {
        Self {
            results,
            failures: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Fail the first `n` calls with a connection error.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures.store(n, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    fn name(&self) -> &str {
        "fake-search"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProviderResult>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(GatewayError::Connection("connection reset".into()));
        }
        Ok(self.results.clone())
    }
}

pub fn provider_result(title: &str, url: &str, published: Option<&str>) -> ProviderResult {
    ProviderResult {
        title: title.to_string(),
        url: url.to_string(),
        content: format!("About {title}"),
        published_date: published.map(str::to_string),
        score: Some(0.5),
    }
}

/// HTTP fetcher serving canned pages by URL.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, HttpResponse>,
    failures: AtomicUsize,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, content_type: &str, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            HttpResponse {
                final_url: url.to_string(),
                status: 200,
                content_type: content_type.to_string(),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn failing_first(self, n: usize) -> Self {
        self.failures.store(n, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpFetcher for FakeFetcher {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(GatewayError::Timeout);
        }
        self.pages.get(url).cloned().ok_or(GatewayError::Http {
            status: 404,
            body: "not found".into(),
        })
    }
}
