// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;
use url::form_urlencoded;

/// Shareable view state: the committed page and search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub page: u32,
    pub search: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
        }
    }
}

impl Location {
    pub fn new(page: u32, search: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            search: search.into(),
        }
    }

    /// Reads `page` and `search` from a query string or a full URL. Unknown
    /// keys are ignored and a bad `page` falls back to 1.
    pub fn parse(raw: &str) -> Self {
        let query = match raw.split_once('?') {
            Some((_, query)) => query,
            None => raw,
        };
        let query = query.split('#').next().unwrap_or_default();

        let mut location = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    location.page = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|page| *page >= 1)
                        .unwrap_or(1);
                }
                "search" => location.search = value.into_owned(),
                _ => {}
            }
        }
        location
    }

    /// Query string without the leading `?`; page 1 and blank searches are
    /// omitted.
    pub fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if self.page > 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        let search = self.search.trim();
        if !search.is_empty() {
            serializer.append_pair("search", search);
        }
        serializer.finish()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self.query_string();
        if query.is_empty() {
            write!(f, "/")
        } else {
            write!(f, "/?{query}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavHistory {
    entries: Vec<Location>,
    index: usize,
}

impl NavHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    pub fn push(&mut self, location: Location) {
        if self.current().query_string() == location.query_string() {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> Option<Location> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.current().clone())
    }

    pub fn forward(&mut self) -> Option<Location> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current().clone())
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}
