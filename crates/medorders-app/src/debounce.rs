// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Single pending timer keyed by a token. Each `trigger` supersedes the
/// previous one; only the latest token fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    quiet: Duration,
    token: u64,
    armed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket {
    pub token: u64,
    pub delay: Duration,
}

impl Debouncer {
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            token: 0,
            armed: false,
        }
    }

    pub fn trigger(&mut self) -> DebounceTicket {
        self.token = self.token.wrapping_add(1);
        self.armed = true;
        DebounceTicket {
            token: self.token,
            delay: self.quiet,
        }
    }

    /// Returns true exactly once for the most recent ticket.
    pub fn fire(&mut self, token: u64) -> bool {
        if !self.armed || token != self.token {
            return false;
        }
        self.armed = false;
        true
    }

    pub fn cancel(&mut self) {
        self.armed = false;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}
