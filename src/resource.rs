use std::{cell::OnceCell, fmt, future::Future, rc::Rc, task::Poll};

use derive_ex::Ex;
use futures::task::{LocalSpawn, LocalSpawnExt, SpawnError};
use parse_display::{Display, FromStr};

use crate::Settlement;


/// Lifecycle state of a [`Resource`].
#[derive(Debug, Display, FromStr, Clone, Copy, PartialEq, Eq, Hash)]
#[display(style = "snake_case")]
pub enum ResourceStatus {
    Pending,
    Success,
    Error,
}

/// Outcome of reading a [`Resource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Read<T, E> {
    /// The operation has not settled. Retry the read after the settlement completes.
    Suspended(Settlement),
    /// The operation fulfilled.
    Ready(T),
    /// The operation rejected.
    Failed(E),
}

impl<T, E> Read<T, E> {
    pub fn status(&self) -> ResourceStatus {
        match self {
            Read::Suspended(_) => ResourceStatus::Pending,
            Read::Ready(_) => ResourceStatus::Success,
            Read::Failed(_) => ResourceStatus::Error,
        }
    }
    pub fn is_suspended(&self) -> bool {
        matches!(self, Read::Suspended(_))
    }
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Read<U, E> {
        match self {
            Read::Suspended(s) => Read::Suspended(s),
            Read::Ready(value) => Read::Ready(f(value)),
            Read::Failed(e) => Read::Failed(e),
        }
    }

    /// Combines two reads, in order.
    ///
    /// The first read that is not `Ready` decides the result, like two reads performed one after the other
    /// by the same render pass.
    pub fn zip<U>(self, other: Read<U, E>) -> Read<(T, U), E> {
        match self {
            Read::Suspended(s) => Read::Suspended(s),
            Read::Failed(e) => Read::Failed(e),
            Read::Ready(value) => other.map(|other| (value, other)),
        }
    }

    pub fn into_poll(self) -> Poll<Result<T, E>> {
        match self {
            Read::Suspended(_) => Poll::Pending,
            Read::Ready(value) => Poll::Ready(Ok(value)),
            Read::Failed(e) => Poll::Ready(Err(e)),
        }
    }

    /// Converts into a `Result` so that reads can be chained with `?`.
    pub fn into_result(self) -> Result<T, Suspend<E>> {
        match self {
            Read::Suspended(s) => Err(Suspend::Pending(s)),
            Read::Ready(value) => Ok(value),
            Read::Failed(e) => Err(Suspend::Failed(e)),
        }
    }
}

/// Non-value outcome of a read, for use with `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suspend<E> {
    Pending(Settlement),
    Failed(E),
}
impl<T, E> From<Suspend<E>> for Read<T, E> {
    fn from(value: Suspend<E>) -> Self {
        match value {
            Suspend::Pending(s) => Read::Suspended(s),
            Suspend::Failed(e) => Read::Failed(e),
        }
    }
}

struct ResourceNode<T, E> {
    outcome: OnceCell<Result<T, E>>,
    settlement: Settlement,
}

/// The eventual outcome of one asynchronous operation.
///
/// A `Resource` starts pending and settles exactly once, to either a value or an error.
/// After that it never changes: every read returns the same outcome, and the operation is never run again.
///
/// Cloning a `Resource` clones the handle, not the state.
#[derive(Ex)]
#[derive_ex(Clone(bound()))]
pub struct Resource<T: 'static, E: 'static>(Rc<ResourceNode<T, E>>);

impl<T: 'static, E: 'static> Resource<T, E> {
    /// Creates a pending resource and the one-shot [`Settler`] that settles it.
    pub fn pending() -> (Self, Settler<T, E>) {
        let node = Rc::new(ResourceNode {
            outcome: OnceCell::new(),
            settlement: Settlement::new(),
        });
        (Self(node.clone()), Settler(Some(node)))
    }

    /// Creates a resource that has already fulfilled with `value`.
    pub fn ready(value: T) -> Self {
        Self::from_outcome(Ok(value))
    }

    /// Creates a resource that has already rejected with `e`.
    pub fn failed(e: E) -> Self {
        Self::from_outcome(Err(e))
    }

    fn from_outcome(outcome: Result<T, E>) -> Self {
        Self(Rc::new(ResourceNode {
            outcome: OnceCell::from(outcome),
            settlement: Settlement::settled(),
        }))
    }

    /// Wraps `op` into a resource.
    ///
    /// `op` is handed to `sp` and driven to completion there; this function neither polls nor awaits it.
    /// The operation is never cancelled, even if every handle to the resource is dropped.
    pub fn wrap<Fut>(op: Fut, sp: &impl LocalSpawn) -> Result<Self, SpawnError>
    where
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        let (resource, settler) = Self::pending();
        sp.spawn_local(async move { settler.settle(op.await) })?;
        Ok(resource)
    }

    pub fn status(&self) -> ResourceStatus {
        match self.0.outcome.get() {
            None => ResourceStatus::Pending,
            Some(Ok(_)) => ResourceStatus::Success,
            Some(Err(_)) => ResourceStatus::Error,
        }
    }

    /// Returns the settlement of the underlying operation.
    pub fn settlement(&self) -> &Settlement {
        &self.0.settlement
    }

    /// Reads the outcome by reference.
    ///
    /// While pending, returns `Suspended` with the same settlement on every call.
    pub fn borrow(&self) -> Read<&T, &E> {
        match self.0.outcome.get() {
            None => Read::Suspended(self.0.settlement.clone()),
            Some(Ok(value)) => Read::Ready(value),
            Some(Err(e)) => Read::Failed(e),
        }
    }

    /// Reads the outcome.
    ///
    /// - `Suspended(settlement)` while the operation has not settled.
    /// - `Ready(value)` once it has fulfilled.
    /// - `Failed(reason)` once it has rejected, with the reason exactly as rejected.
    pub fn read(&self) -> Read<T, E>
    where
        T: Clone,
        E: Clone,
    {
        match self.borrow() {
            Read::Suspended(s) => Read::Suspended(s),
            Read::Ready(value) => Read::Ready(value.clone()),
            Read::Failed(e) => Read::Failed(e.clone()),
        }
    }

    /// Waits for the operation to settle and returns its outcome.
    ///
    /// Never completes if the [`Settler`] was dropped without settling.
    pub async fn settled(&self) -> Result<T, E>
    where
        T: Clone,
        E: Clone,
    {
        self.0.settlement.wait().await;
        match self.read() {
            Read::Ready(value) => Ok(value),
            Read::Failed(e) => Err(e),
            Read::Suspended(_) => unreachable!("settlement completed without an outcome"),
        }
    }
}
impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Resource<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.outcome.get() {
            None => write!(f, "Resource(<pending>)"),
            Some(Ok(value)) => f.debug_tuple("Resource").field(&Ok::<_, ()>(value)).finish(),
            Some(Err(e)) => f.debug_tuple("Resource").field(&Err::<(), _>(e)).finish(),
        }
    }
}

/// Write side of a pending [`Resource`].
///
/// Settling consumes the `Settler`, so a resource can settle at most once.
/// Dropping it without settling leaves the resource pending forever.
pub struct Settler<T: 'static, E: 'static>(Option<Rc<ResourceNode<T, E>>>);

impl<T: 'static, E: 'static> Settler<T, E> {
    pub fn settle(mut self, outcome: Result<T, E>) {
        let Some(node) = self.0.take() else {
            return;
        };
        let status = if outcome.is_ok() {
            ResourceStatus::Success
        } else {
            ResourceStatus::Error
        };
        if node.outcome.set(outcome).is_err() {
            unreachable!("resource settled twice");
        }
        if Rc::strong_count(&node) == 1 {
            tracing::debug!(%status, "resource settled with no remaining readers");
        } else {
            tracing::debug!(%status, "resource settled");
        }
        node.settlement.notify();
    }
}
impl<T: 'static, E: 'static> Drop for Settler<T, E> {
    fn drop(&mut self) {
        if self.0.is_some() {
            tracing::warn!("resource dropped before its operation settled");
        }
    }
}
