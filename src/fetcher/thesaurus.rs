/// Fetcher for thesaurus.com `browse/<word>` pages.
///
/// The page carries its data in a script tag assigning a JSON object to
/// `window.INITIAL_STATE`. The meanings live under
/// `searchData.tunaApiData.posTabs`.
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::{StatusCode, Url};
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::{DocumentFetcher, FetchError};
use crate::config::FetchConfig;
use crate::document::MeaningDocument;

const POS_TABS_POINTER: &str = "/searchData/tunaApiData/posTabs";

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").unwrap());
static STATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)INITIAL_STATE = (\{.*\});").unwrap());
// The state is a JS literal, not JSON; see `undefined_to_null`
static UNDEFINED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bundefined\b").unwrap());

pub struct ThesaurusFetcher {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl ThesaurusFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("HTTP client build failed")?;

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid base URL: {}", config.base_url))?;

        Ok(Self { client, base_url })
    }

    /// Page address for `word`, with the word encoded as a single path segment.
    pub fn page_url(&self, word: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                FetchError::Request(format!("{} cannot be a base URL", self.base_url))
            })?;
            segments.pop_if_empty().push(word);
        }
        Ok(url)
    }
}

impl DocumentFetcher for ThesaurusFetcher {
    fn fetch(&self, word: &str) -> Result<MeaningDocument, FetchError> {
        let url = self.page_url(word)?;
        debug!("GET {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .map_err(|e| FetchError::Request(format!("failed to read body: {e}")))?;

        extract_document(&body)
    }
}

/// Pull the meaning document out of a thesaurus page.
pub fn extract_document(html: &str) -> Result<MeaningDocument, FetchError> {
    let page = Html::parse_document(html);

    let state = page
        .select(&SCRIPT_SELECTOR)
        .find_map(|script| {
            let text: String = script.text().collect();
            STATE_RE.captures(&text).map(|caps| caps[1].to_string())
        })
        .ok_or_else(|| FetchError::MissingContent("initial state script tag".to_string()))?;

    let state = undefined_to_null(&state);
    let mut parsed: Value =
        serde_json::from_str(&state).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let tabs = parsed
        .pointer_mut(POS_TABS_POINTER)
        .map(Value::take)
        .filter(|v| !v.is_null())
        .ok_or_else(|| {
            FetchError::MissingContent("searchData.tunaApiData.posTabs".to_string())
        })?;

    serde_json::from_value(tabs).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// Rewrite bare `undefined` tokens as `null`, leaving string contents alone.
fn undefined_to_null(state: &str) -> String {
    let mut out = String::with_capacity(state.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut last = 0;

    for m in UNDEFINED_RE.find_iter(state) {
        for c in state[last..m.start()].chars() {
            if escaped {
                escaped = false;
            } else if in_string && c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = !in_string;
            }
        }
        // A pending escape is consumed by the token's first character
        escaped = false;

        out.push_str(&state[last..m.start()]);
        out.push_str(if in_string { m.as_str() } else { "null" });
        last = m.end();
    }

    out.push_str(&state[last..]);
    out
}
