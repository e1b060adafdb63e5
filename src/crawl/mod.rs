// crawl/mod.rs — bounded breadth-first site traversal.
//
// The crawler owns no shared state: one invocation walks one site,
// fetching pages sequentially through a `PageFetcher` and returning an
// immutable corpus. Per-page fetch failures are recovered locally as
// skip diagnostics; only the caller's overall request can fail.

pub mod domain;
pub mod extract;
pub mod link;

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use domain::same_domain;
use extract::PageDocument;
use link::normalize_link;

/// Default page budget for one crawl.
pub const DEFAULT_MAX_PAGES: usize = 25;
/// Default hop limit from the start URL.
pub const DEFAULT_MAX_DEPTH: u32 = 1;

/// One crawled page. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub title: String,
    pub meta: HashMap<String, String>,
    pub text: String,
    /// Normalized, same-domain links in document order.
    pub links: Vec<String>,
}

/// The corpus produced by one crawl invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub start_url: String,
    pub pages: Vec<Page>,
    pub count: usize,
}

/// A URL the traversal gave up on, with the reason it was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPage {
    pub url: String,
    pub reason: String,
}

/// Corpus plus per-page skip diagnostics.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub result: CrawlResult,
    pub skipped: Vec<SkippedPage>,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("status {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
}

/// Seam between the traversal and the network; tests swap in an
/// in-memory site graph.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Reqwest-backed fetcher with a bounded per-request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: std::time::Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("scoutd/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        resp.text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

pub struct Crawler<F> {
    fetcher: F,
    max_pages: usize,
    max_depth: u32,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_limits(mut self, max_pages: usize, max_depth: u32) -> Self {
        self.max_pages = max_pages;
        self.max_depth = max_depth;
        self
    }

    /// Breadth-first traversal from `start_url`.
    ///
    /// Children are enqueued at `depth + 1` unconditionally and filtered
    /// at dequeue time; pages at exactly `max_depth` are still fetched,
    /// their children are not. A start URL that fails to fetch yields an
    /// empty corpus, not an error.
    pub async fn crawl(&self, start_url: &str) -> CrawlOutcome {
        info!(
            url = %start_url,
            max_pages = self.max_pages,
            max_depth = self.max_depth,
            "crawl started"
        );

        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(String, u32)> = VecDeque::new();
        queue.push_back((start_url.to_string(), 0));

        let mut pages: Vec<Page> = Vec::new();
        let mut skipped: Vec<SkippedPage> = Vec::new();

        while let Some((url, depth)) = queue.pop_front() {
            if pages.len() >= self.max_pages {
                break;
            }
            if visited.contains(&url) || depth > self.max_depth {
                continue;
            }
            // Marked before fetching so a URL reachable over two paths is
            // never fetched twice.
            visited.insert(url.clone());

            info!(url = %url, depth, fetched = pages.len(), "fetching page");

            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(url = %url, error = %e, "page skipped");
                    skipped.push(SkippedPage {
                        url,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let base = match Url::parse(&url) {
                Ok(base) => base,
                Err(e) => {
                    warn!(url = %url, error = %e, "unparseable page url");
                    skipped.push(SkippedPage {
                        url,
                        reason: format!("invalid url: {e}"),
                    });
                    continue;
                }
            };

            let doc = PageDocument::parse(&body);
            let links: Vec<String> = doc
                .hrefs
                .iter()
                .filter_map(|href| normalize_link(&base, Some(href)))
                .filter(|l| same_domain(start_url, l))
                .collect();

            for l in &links {
                if !visited.contains(l) {
                    queue.push_back((l.clone(), depth + 1));
                }
            }

            pages.push(Page {
                url: base.to_string(),
                title: doc.title,
                meta: doc.meta,
                text: doc.text,
                links,
            });
        }

        info!(pages = pages.len(), skipped = skipped.len(), "crawl finished");

        let count = pages.len();
        CrawlOutcome {
            result: CrawlResult {
                start_url: start_url.to_string(),
                pages,
                count,
            },
            skipped,
        }
    }
}
