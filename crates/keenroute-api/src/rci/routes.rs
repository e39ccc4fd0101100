// Static route endpoints
//
// `GET rci/ip/route` lists the running routes; `POST rci/` executes a batch
// of route mutations followed by the save directive.

use tracing::debug;

use crate::error::Error;
use crate::rci::client::RciClient;
use crate::rci::models::{RciBatch, RouteRecord};

const ROUTES_PATH: &str = "rci/ip/route";
const BATCH_PATH: &str = "rci/";

impl RciClient {
    /// List all static routes currently configured on the router.
    pub async fn list_routes(&mut self) -> Result<Vec<RouteRecord>, Error> {
        let body = self.get(ROUTES_PATH).await?;
        let routes: Vec<RouteRecord> = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;
        debug!(count = routes.len(), "fetched routes");
        Ok(routes)
    }

    /// Submit one batch of route mutations plus the trailing save directive.
    pub async fn execute_batch(&mut self, batch: &RciBatch) -> Result<(), Error> {
        debug!(routes = batch.len(), "submitting RCI batch");
        self.post(BATCH_PATH, batch).await?;
        Ok(())
    }

    /// Delete every route on the router, then save.
    ///
    /// An empty route table still produces one request carrying only the
    /// save directive. Returns how many routes were deleted.
    pub async fn delete_all_routes(&mut self) -> Result<usize, Error> {
        let batch: RciBatch = self
            .list_routes()
            .await?
            .into_iter()
            .map(RouteRecord::into_delete)
            .collect();
        let count = batch.len();
        self.execute_batch(&batch).await?;
        Ok(count)
    }
}
