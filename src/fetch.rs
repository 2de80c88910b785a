//! Rate-limited page fetching against the Liquipedia wiki.
//!
//! One request is ever in flight at a time, and a politeness delay is
//! slept before every call, including the first of a run. This is the
//! dominant wall-clock cost of a full scrape and is deliberately not
//! parallelized.

use std::collections::HashMap;
use std::time::Duration;

use scraper::Html;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{Result, ScrapeError};
use crate::extract::Page;

const BASE_URL: &str = "https://liquipedia.net/marvelrivals";
const API_URL: &str = "https://liquipedia.net/marvelrivals/api.php";
const USER_AGENT: &str = "rivals-scraper/0.1 (esports data research)";

/// Minimum delay slept before every request.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

/// Hard upper bound on category listing size; the API caps here anyway
/// and the pipeline does not paginate past a single call.
pub const CATEGORY_LIMIT_MAX: u32 = 500;

/// The fetch boundary the driver runs against. Implemented by [`Fetcher`]
/// for the live wiki and by in-memory fixtures in tests.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Direct page request, parsed as a DOM tree.
    async fn page_html(&self, title: &str) -> Result<Html>;
    /// Latest-revision wikitext via the query API.
    async fn page_markup(&self, title: &str) -> Result<String>;
    /// Member titles of a category, single call, capped at
    /// [`CATEGORY_LIMIT_MAX`].
    async fn category_members(&self, category: &str, limit: u32) -> Result<Vec<String>>;

    /// Fetch a page in whichever form works: the revision API first, the
    /// rendered page as a fallback. Downstream parsers accept either.
    async fn page(&self, title: &str) -> Result<Page> {
        match self.page_markup(title).await {
            Ok(markup) => Ok(Page::Markup(markup)),
            Err(error) => {
                debug!(%title, %error, "markup fetch failed, trying rendered page");
                Ok(Page::Dom(self.page_html(title).await?))
            }
        }
    }
}

impl<S: PageSource> PageSource for &S {
    async fn page_html(&self, title: &str) -> Result<Html> {
        (**self).page_html(title).await
    }

    async fn page_markup(&self, title: &str) -> Result<String> {
        (**self).page_markup(title).await
    }

    async fn category_members(&self, category: &str, limit: u32) -> Result<Vec<String>> {
        (**self).category_members(category, limit).await
    }
}

/// Serial, rate-limited HTTP fetcher over one shared [`reqwest::Client`].
pub struct Fetcher {
    http: reqwest::Client,
    base_url: String,
    api_url: String,
    delay: Duration,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: BASE_URL.to_string(),
            api_url: API_URL.to_string(),
            delay,
        }
    }

    /// Point the fetcher at a different wiki root (tests, mirrors).
    pub fn with_endpoints(mut self, base_url: &str, api_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self.api_url = api_url.to_string();
        self
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        // Unconditional politeness delay, also before the first request.
        tokio::time::sleep(self.delay).await;
        debug!(url, "fetching page");

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ScrapeError::Http {
                url: url.to_owned(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                url: url.to_owned(),
                status,
            });
        }

        response.text().await.map_err(|e| ScrapeError::ResponseBody {
            url: url.to_owned(),
            source: e,
        })
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for Fetcher {
    #[instrument(skip(self))]
    async fn page_html(&self, title: &str) -> Result<Html> {
        let url = format!("{}/{}", self.base_url, title.replace(' ', "_"));
        let body = self.get_text(&url, &[]).await?;
        Ok(Html::parse_document(&body))
    }

    #[instrument(skip(self))]
    async fn page_markup(&self, title: &str) -> Result<String> {
        let title = title.replace(' ', "_");
        let body = self
            .get_text(
                &self.api_url,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("prop", "revisions"),
                    ("titles", &title),
                    ("rvprop", "content"),
                    ("rvslots", "main"),
                ],
            )
            .await?;
        parse_markup_response(&body, &title)
    }

    #[instrument(skip(self))]
    async fn category_members(&self, category: &str, limit: u32) -> Result<Vec<String>> {
        let limit = limit.min(CATEGORY_LIMIT_MAX).to_string();
        let body = self
            .get_text(
                &self.api_url,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("list", "categorymembers"),
                    ("cmtitle", category),
                    ("cmlimit", &limit),
                ],
            )
            .await?;
        let members = parse_category_response(&body)?;
        debug!(category, count = members.len(), "listed category members");
        Ok(members)
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: HashMap<String, ApiPage>,
    #[serde(default)]
    categorymembers: Vec<CategoryMember>,
}

#[derive(Debug, Deserialize)]
struct ApiPage {
    #[serde(default)]
    revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
struct Revision {
    slots: Option<Slots>,
}

#[derive(Debug, Deserialize)]
struct Slots {
    main: Option<MainSlot>,
}

#[derive(Debug, Deserialize)]
struct MainSlot {
    #[serde(rename = "*")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryMember {
    title: String,
}

/// Pull the latest revision's main-slot wikitext out of a query response.
/// A missing page (the `-1` pseudo page id) surfaces as [`ScrapeError::Api`].
fn parse_markup_response(body: &str, title: &str) -> Result<String> {
    let response: QueryResponse = serde_json::from_str(body)?;
    response
        .query
        .and_then(|q| {
            q.pages.into_values().find_map(|page| {
                page.revisions
                    .into_iter()
                    .next()
                    .and_then(|rev| rev.slots)
                    .and_then(|slots| slots.main)
                    .and_then(|main| main.content)
            })
        })
        .ok_or(ScrapeError::Api {
            title: title.to_owned(),
            context: "revision content",
        })
}

/// Member titles of a category listing. Titles containing a namespace
/// separator (subcategories, templates) are dropped.
fn parse_category_response(body: &str) -> Result<Vec<String>> {
    let response: QueryResponse = serde_json::from_str(body)?;
    Ok(response
        .query
        .map(|q| q.categorymembers)
        .unwrap_or_default()
        .into_iter()
        .map(|member| member.title)
        .filter(|title| !title.contains(':'))
        .collect())
}
