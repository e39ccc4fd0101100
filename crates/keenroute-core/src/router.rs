// ── Route synchronization ──
//
// High-level route operations over one router session: fetch, batched add,
// delete-all. Every call runs to completion before the next one starts.

use tracing::{debug, info, warn};

use keenroute_api::{RciBatch, RciClient, RouteRecord};

use crate::config::RouterConfig;
use crate::convert::to_domain_routes;
use crate::error::CoreError;
use crate::model::Route;

/// Routes per `POST rci/` request, not counting the save directive.
pub const ROUTE_BATCH_SIZE: usize = 50;

/// Outcome of a successful upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub routes: usize,
    pub batches: usize,
}

/// Routes fetched leniently, plus how many records were dropped.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub routes: Vec<Route>,
    pub skipped: usize,
}

/// One router session and the route operations it supports.
pub struct Router {
    client: RciClient,
}

impl Router {
    /// Build the HTTP client for `config`. No request is sent yet.
    pub fn new(config: &RouterConfig) -> Result<Self, CoreError> {
        let client = RciClient::new(
            config.url.clone(),
            config.username.clone(),
            config.password.clone(),
            &config.transport(),
        )?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: RciClient) -> Self {
        Self { client }
    }

    /// Raw route records as the router reports them.
    pub async fn fetch_records(&mut self) -> Result<Vec<RouteRecord>, CoreError> {
        Ok(self.client.list_routes().await?)
    }

    /// Fetch every route. Fails if any record lacks an IPv4 destination.
    pub async fn fetch_routes(&mut self) -> Result<Vec<Route>, CoreError> {
        let records = self.fetch_records().await?;
        to_domain_routes(&records)
    }

    /// Fetch every route, skipping records without an IPv4 destination.
    pub async fn fetch_routes_lenient(&mut self) -> Result<FetchReport, CoreError> {
        let records = self.fetch_records().await?;
        let mut report = FetchReport {
            routes: Vec::with_capacity(records.len()),
            skipped: 0,
        };
        for record in &records {
            match Route::try_from(record) {
                Ok(route) => report.routes.push(route),
                Err(e) => {
                    warn!("skipping route: {e}");
                    report.skipped += 1;
                }
            }
        }
        Ok(report)
    }

    /// Add routes in batches of [`ROUTE_BATCH_SIZE`], each followed by a save.
    ///
    /// Batches go out in order and stop at the first failure. Batches sent
    /// before the failure stay saved on the router; that case is reported as
    /// [`CoreError::PartialUpload`]. An empty list sends nothing.
    pub async fn add_routes(&mut self, routes: &[Route]) -> Result<UploadReport, CoreError> {
        if routes.is_empty() {
            debug!("no routes to add");
            return Ok(UploadReport::default());
        }

        let total_batches = routes.len().div_ceil(ROUTE_BATCH_SIZE);
        let mut submitted = 0;

        for (batch_index, chunk) in routes.chunks(ROUTE_BATCH_SIZE).enumerate() {
            let batch: RciBatch = chunk.iter().map(RouteRecord::from).collect();
            if let Err(source) = self.client.execute_batch(&batch).await {
                return Err(if submitted == 0 {
                    CoreError::UploadFailed {
                        batch_index,
                        total_batches,
                        source,
                    }
                } else {
                    CoreError::PartialUpload {
                        batch_index,
                        total_batches,
                        routes_submitted: submitted,
                        source,
                    }
                });
            }
            submitted += chunk.len();
            info!(
                batch = batch_index + 1,
                total_batches,
                routes = chunk.len(),
                "route batch saved"
            );
        }

        Ok(UploadReport {
            routes: submitted,
            batches: total_batches,
        })
    }

    /// Delete every route on the router. Returns how many were deleted.
    pub async fn delete_all_routes(&mut self) -> Result<usize, CoreError> {
        let deleted = self.client.delete_all_routes().await?;
        info!(deleted, "route table cleared");
        Ok(deleted)
    }
}
