// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use medorders_app::{ListPage, ListQuery};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const LIST_PATH: &str = "api/medications";

/// Blocking client for the medication list endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("server.base_url must not be empty");
        }
        // Trailing slash so `join` appends instead of replacing the last segment.
        let base_url = Url::parse(&format!("{trimmed}/"))
            .with_context(|| format!("server.base_url {trimmed:?} is not a valid URL"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "server.base_url must use http or https, got {:?}",
                base_url.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn list_url(&self, query: &ListQuery) -> Result<Url> {
        let mut url = self
            .base_url
            .join(LIST_PATH)
            .context("build medication list URL")?;
        url.query_pairs_mut()
            .append_pair("page", &query.page.to_string())
            .append_pair("pageSize", &query.page_size.to_string())
            .append_pair("search", &query.search);
        Ok(url)
    }

    pub fn fetch_page(&self, query: &ListQuery) -> Result<ListPage> {
        let url = self.list_url(query)?;
        log::debug!("GET {url}");

        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| connection_error(self.base_url(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().context("decode medication list")
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check [server].base_url or run with --demo ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
}
