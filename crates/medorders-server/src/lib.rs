// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use medorders_app::{DEFAULT_PAGE_SIZE, ListPage, MedicationRecord, total_pages};
use serde::Serialize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Method, Request, Response, Server};
use url::form_urlencoded;

pub const LIST_ROUTE: &str = "/api/medications";

/// Paging and filter parameters of one list request, after fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
        }
    }
}

impl ListParams {
    /// Non-numeric or non-positive `page`/`pageSize` fall back to 1 and the
    /// default page size. The search term is trimmed and lowercased.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => params.page = positive_or(&value, 1),
                "pageSize" => params.page_size = positive_or(&value, DEFAULT_PAGE_SIZE),
                "search" => params.search = value.trim().to_lowercase(),
                _ => {}
            }
        }
        params
    }
}

fn positive_or(raw: &str, fallback: u32) -> u32 {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|value| *value >= 1)
        .unwrap_or(fallback)
}

/// Filters `records` by the search term, then slices out the requested page.
pub fn list_page(records: &[MedicationRecord], params: &ListParams) -> ListPage {
    let needle = params.search.trim().to_lowercase();
    let filtered: Vec<&MedicationRecord> = if needle.is_empty() {
        records.iter().collect()
    } else {
        records
            .iter()
            .filter(|record| record.searchable_text().to_lowercase().contains(&needle))
            .collect()
    };

    let page_size = params.page_size.max(1);
    let page = params.page.max(1);
    let start = usize::try_from(u64::from(page - 1) * u64::from(page_size)).unwrap_or(usize::MAX);
    let data = filtered
        .iter()
        .skip(start)
        .take(page_size as usize)
        .map(|record| (*record).clone())
        .collect();
    let total = filtered.len() as u64;

    ListPage {
        data,
        total,
        page,
        page_size,
        total_pages: total_pages(total, page_size),
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// In-process list endpoint backed by a fixed record set.
pub struct DemoServer {
    server: Arc<Server>,
    base_url: String,
    handle: Option<JoinHandle<()>>,
}

impl DemoServer {
    pub fn start(addr: &str, records: Vec<MedicationRecord>) -> Result<Self> {
        let server = Server::http(addr)
            .map_err(|error| anyhow!("start demo server on {addr}: {error}"))?;
        let server = Arc::new(server);
        let base_url = format!("http://{}", server.server_addr());
        log::info!(
            "demo server listening on {base_url} with {} records",
            records.len()
        );

        let worker = Arc::clone(&server);
        let handle = thread::Builder::new()
            .name("medorders-demo-server".to_owned())
            .spawn(move || {
                for request in worker.incoming_requests() {
                    if let Err(error) = handle_request(request, &records) {
                        log::warn!("demo server: {error:#}");
                    }
                }
            })
            .context("spawn demo server thread")?;

        Ok(Self {
            server,
            base_url,
            handle: Some(handle),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for DemoServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn handle_request(request: Request, records: &[MedicationRecord]) -> Result<()> {
    let url = request.url().to_owned();
    let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));
    log::debug!("demo server: {} {url}", request.method());

    if request.method() != &Method::Get {
        return respond_json(
            request,
            405,
            &ErrorBody {
                error: "method not allowed",
            },
        );
    }
    if path.trim_end_matches('/') != LIST_ROUTE {
        return respond_json(request, 404, &ErrorBody { error: "not found" });
    }

    let params = ListParams::from_query(query);
    respond_json(request, 200, &list_page(records, &params))
}

fn respond_json<T: Serialize>(request: Request, status: u16, body: &T) -> Result<()> {
    let body = serde_json::to_string(body).context("encode response body")?;
    let header = Header::from_bytes("Content-Type", "application/json")
        .map_err(|()| anyhow!("invalid content type header"))?;
    let response = Response::from_string(body)
        .with_status_code(status)
        .with_header(header);
    request.respond(response).context("write response")
}
