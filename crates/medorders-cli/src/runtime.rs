// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use medorders_app::{LoadOutcome, LoadRequest, LoadTicket, MedicationId};
use medorders_client::Client;
use medorders_tui::{InternalEvent, TableRuntime};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread;

/// Runs each list fetch on its own thread against the HTTP endpoint.
pub struct HttpRuntime {
    client: Client,
    in_flight: BTreeMap<LoadTicket, Arc<AtomicBool>>,
}

impl HttpRuntime {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            in_flight: BTreeMap::new(),
        }
    }

    fn prune_finished(&mut self) {
        self.in_flight
            .retain(|_, cancelled| Arc::strong_count(cancelled) > 1);
    }
}

impl TableRuntime for HttpRuntime {
    fn spawn_fetch(&mut self, request: LoadRequest, tx: Sender<InternalEvent>) -> Result<()> {
        self.prune_finished();

        let cancelled = Arc::new(AtomicBool::new(false));
        self.in_flight.insert(request.ticket, Arc::clone(&cancelled));

        let client = self.client.clone();
        let ticket = request.ticket;
        log::debug!(
            "fetch {} page={} size={} search={:?}",
            ticket.get(),
            request.query.page,
            request.query.page_size,
            request.query.search
        );

        thread::Builder::new()
            .name(format!("medorders-fetch-{}", ticket.get()))
            .spawn(move || {
                let outcome = match client.fetch_page(&request.query) {
                    _ if cancelled.load(Ordering::SeqCst) => LoadOutcome::Cancelled,
                    Ok(page) => LoadOutcome::Loaded(page),
                    Err(error) => {
                        log::warn!("fetch {} failed: {error:#}", ticket.get());
                        LoadOutcome::Failed(format!("{error:#}"))
                    }
                };
                let _ = tx.send(InternalEvent::FetchFinished { ticket, outcome });
            })
            .context("spawn fetch thread")?;
        Ok(())
    }

    fn cancel_fetch(&mut self, ticket: LoadTicket) -> Result<()> {
        if let Some(cancelled) = self.in_flight.remove(&ticket) {
            cancelled.store(true, Ordering::SeqCst);
            log::debug!("fetch {} cancelled", ticket.get());
        }
        Ok(())
    }

    fn notify_saved(&mut self, rows: &[MedicationId]) -> Result<()> {
        let ids: Vec<String> = rows.iter().map(|id| id.get().to_string()).collect();
        log::info!("saved {} row(s): {}", rows.len(), ids.join(", "));
        Ok(())
    }
}
