use std::time::Duration;

use futures::{FutureExt, future::LocalBoxFuture};

use crate::{
    Amount, AuthToken, Budget, Config, Domain, FetchError, Fetcher, Record, Tag, TransactionType,
    timer::sleep,
};

const SAMPLE_COMMENTS: [&str; 3] = [
    "I get by with a little help from my friends",
    "I'd like to be under the sea in an octupus's garden",
    "You got that sand all over your feet",
];

/// In-memory [`Fetcher`] serving fixed data.
///
/// Tags and budgets resolve immediately. Records resolve after a delay, 2 seconds by default.
#[derive(Debug, Clone)]
pub struct StubFetcher {
    records_delay: Duration,
    require_credential: bool,
    tags: Vec<Tag>,
    records: Vec<Record>,
    budgets: Vec<Budget>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }
    pub fn from_config(config: &Config) -> Self {
        Self {
            records_delay: config.records_delay(),
            require_credential: config.require_credential,
            tags: config.tags.clone(),
            records: sample_records(),
            budgets: config.budgets.clone(),
        }
    }
    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }
    pub fn with_records_delay(mut self, delay: Duration) -> Self {
        self.records_delay = delay;
        self
    }

    fn authorize(
        &self,
        domain: Domain,
        credential: &Option<AuthToken>,
    ) -> Result<(), FetchError> {
        if self.require_credential && credential.is_none() {
            tracing::debug!(%domain, "rejecting fetch without credential");
            return Err(FetchError::Unauthorized);
        }
        Ok(())
    }
}
impl Default for StubFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for StubFetcher {
    fn fetch_tags(
        &self,
        credential: Option<AuthToken>,
    ) -> LocalBoxFuture<'static, Result<Vec<Tag>, FetchError>> {
        let ret = self
            .authorize(Domain::Tags, &credential)
            .map(|()| self.tags.clone());
        async move { ret }.boxed_local()
    }

    fn fetch_records(
        &self,
        credential: Option<AuthToken>,
    ) -> LocalBoxFuture<'static, Result<Vec<Record>, FetchError>> {
        let auth = self.authorize(Domain::Records, &credential);
        let records = self.records.clone();
        let delay = self.records_delay;
        async move {
            auth?;
            sleep(delay).await;
            tracing::debug!(count = records.len(), "fetched records");
            Ok::<_, FetchError>(records)
        }
        .boxed_local()
    }

    fn fetch_budgets(
        &self,
        credential: Option<AuthToken>,
    ) -> LocalBoxFuture<'static, Result<Vec<Budget>, FetchError>> {
        let ret = self
            .authorize(Domain::Budgets, &credential)
            .map(|()| self.budgets.clone());
        async move { ret }.boxed_local()
    }
}

fn sample_records() -> Vec<Record> {
    SAMPLE_COMMENTS
        .iter()
        .zip(0..)
        .map(|(comment, id)| Record {
            id,
            amount: Amount::cad(10.0 * f64::from(id + 1)),
            created_at: 1_577_836_800 + i64::from(id) * 86_400,
            tags: Vec::new(),
            transaction_type: TransactionType::Expense,
            user_id: 0,
            comment: Some(comment.to_string()),
        })
        .collect()
}
