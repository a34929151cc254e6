use std::rc::Rc;

use futures::future::LocalBoxFuture;
use parse_display::Display;
use serde::de::DeserializeOwned;

use crate::{AuthToken, Budget, Domain, Page, Record, Tag};

mod stub;

pub use stub::StubFetcher;


/// Reason a domain fetch rejected.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[display("unauthorized")]
    Unauthorized,
    #[display("unexpected status {0}")]
    Status(u16),
    #[display("failed to decode {domain}: {message}")]
    Decode { domain: Domain, message: String },
    #[display("network error: {0}")]
    Network(String),
    #[display("failed to spawn fetch")]
    Spawn,
}

impl std::error::Error for FetchError {}

/// Per-domain fetch functions.
///
/// Each method starts nothing by itself; the returned future performs the fetch when polled and must settle exactly once.
/// Whether an absent credential fails fast is up to the implementation.
pub trait Fetcher: 'static {
    fn fetch_tags(
        &self,
        credential: Option<AuthToken>,
    ) -> LocalBoxFuture<'static, Result<Vec<Tag>, FetchError>>;
    fn fetch_records(
        &self,
        credential: Option<AuthToken>,
    ) -> LocalBoxFuture<'static, Result<Vec<Record>, FetchError>>;
    fn fetch_budgets(
        &self,
        credential: Option<AuthToken>,
    ) -> LocalBoxFuture<'static, Result<Vec<Budget>, FetchError>>;
}

impl<F: Fetcher + ?Sized> Fetcher for Rc<F> {
    fn fetch_tags(
        &self,
        credential: Option<AuthToken>,
    ) -> LocalBoxFuture<'static, Result<Vec<Tag>, FetchError>> {
        (**self).fetch_tags(credential)
    }
    fn fetch_records(
        &self,
        credential: Option<AuthToken>,
    ) -> LocalBoxFuture<'static, Result<Vec<Record>, FetchError>> {
        (**self).fetch_records(credential)
    }
    fn fetch_budgets(
        &self,
        credential: Option<AuthToken>,
    ) -> LocalBoxFuture<'static, Result<Vec<Budget>, FetchError>> {
        (**self).fetch_budgets(credential)
    }
}

/// Decodes a JSON list payload for `domain`.
///
/// Accepts both a bare array and a paginated [`Page`] object.
pub fn decode_list<M: DeserializeOwned>(
    domain: Domain,
    body: &str,
) -> Result<Vec<M>, FetchError> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Payload<I> {
        List(Vec<I>),
        Page(Page<I>),
    }
    match serde_json::from_str::<Payload<M>>(body) {
        Ok(Payload::List(items)) => Ok(items),
        Ok(Payload::Page(page)) => Ok(page.results),
        Err(e) => Err(FetchError::Decode {
            domain,
            message: e.to_string(),
        }),
    }
}

/// Maps an HTTP status to the rejection it stands for, `None` on success.
pub fn status_error(status: u16) -> Option<FetchError> {
    match status {
        200..=299 => None,
        401 | 403 => Some(FetchError::Unauthorized),
        _ => Some(FetchError::Status(status)),
    }
}
