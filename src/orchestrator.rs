use std::future::Future;

use futures::{future::join3, task::LocalSpawn};
use tracing::Instrument;

use crate::{
    AuthToken, Budget, Domain, FetchError, Fetcher, Record, Resource, ResourceStatus, Settlement,
    Tag,
};

/// One resource per domain, as returned by [`fetch_user_data`].
///
/// The resources settle independently of each other.
#[derive(Debug, Clone)]
pub struct ResourceMap {
    pub tags: Resource<Vec<Tag>, FetchError>,
    pub records: Resource<Vec<Record>, FetchError>,
    pub budgets: Resource<Vec<Budget>, FetchError>,
}

impl ResourceMap {
    pub fn status(&self, domain: Domain) -> ResourceStatus {
        match domain {
            Domain::Tags => self.tags.status(),
            Domain::Records => self.records.status(),
            Domain::Budgets => self.budgets.status(),
        }
    }
    pub fn settlement(&self, domain: Domain) -> &Settlement {
        match domain {
            Domain::Tags => self.tags.settlement(),
            Domain::Records => self.records.settlement(),
            Domain::Budgets => self.budgets.settlement(),
        }
    }
    pub fn statuses(&self) -> [(Domain, ResourceStatus); 3] {
        Domain::ALL.map(|domain| (domain, self.status(domain)))
    }

    /// Waits until every domain has settled.
    pub async fn settle_all(&self) {
        join3(
            self.tags.settlement().wait(),
            self.records.settlement().wait(),
            self.budgets.settlement().wait(),
        )
        .await;
    }
}

/// Starts the fetch of every domain and returns their resources without waiting for any of them.
///
/// The fetches run concurrently on `sp`. A rejected fetch settles its own resource to an error and is not retried;
/// call this function again for a fresh map.
pub fn fetch_user_data(
    fetcher: &impl Fetcher,
    credential: Option<AuthToken>,
    sp: &impl LocalSpawn,
) -> ResourceMap {
    let span = tracing::debug_span!("fetch_user_data", authenticated = credential.is_some());
    let _enter = span.enter();
    ResourceMap {
        tags: launch(Domain::Tags, fetcher.fetch_tags(credential.clone()), sp),
        records: launch(Domain::Records, fetcher.fetch_records(credential.clone()), sp),
        budgets: launch(Domain::Budgets, fetcher.fetch_budgets(credential), sp),
    }
}

fn launch<T: 'static>(
    domain: Domain,
    op: impl Future<Output = Result<T, FetchError>> + 'static,
    sp: &impl LocalSpawn,
) -> Resource<T, FetchError> {
    tracing::debug!(%domain, "launching fetch");
    let op = op.instrument(tracing::debug_span!("fetch", %domain));
    Resource::wrap(op, sp).unwrap_or_else(|e| {
        tracing::warn!(%domain, "failed to spawn fetch: {e}");
        Resource::failed(FetchError::Spawn)
    })
}
