// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent trains entering through the async gate

use anyhow::Result;
use serde::Serialize;
use station_core::{
    AdmissionConfig, AdmissionCoordinator, AdmissionGate, RequesterId, SequentialIdGen, Ticket,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;

/// A train that got the platform
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdmissionRecord {
    pub train: RequesterId,
    pub ticket: Ticket,
}

impl std::fmt::Display for AdmissionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} admitted (ticket {})", self.train, self.ticket)
    }
}

/// Spawn `trains` tasks that each hold the platform for `dwell`.
///
/// Returns admissions in the order they happened.
pub async fn simulate(
    config: AdmissionConfig,
    trains: usize,
    dwell: Duration,
) -> Result<Vec<AdmissionRecord>> {
    let gate = AdmissionGate::new(Arc::new(AdmissionCoordinator::new(config)));
    let ids = SequentialIdGen::new("train");
    let order = Arc::new(Mutex::new(Vec::with_capacity(trains)));

    let mut tasks = JoinSet::new();
    for _ in 0..trains {
        let gate = gate.clone();
        let order = order.clone();
        let id = ids.next_id();
        tasks.spawn(async move {
            let permit = gate.enter(id).await?;
            order
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(AdmissionRecord {
                    train: permit.holder().clone(),
                    ticket: permit.ticket(),
                });
            tokio::time::sleep(dwell).await;
            permit.release()?;
            Ok::<_, anyhow::Error>(())
        });
    }

    while let Some(joined) = tasks.join_next().await {
        joined??;
    }

    tracing::info!(
        trains,
        idle = gate.coordinator().is_idle(),
        "simulation finished"
    );
    let records = order.lock().unwrap_or_else(|e| e.into_inner()).clone();
    Ok(records)
}
