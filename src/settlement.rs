use std::{
    cell::{Cell, RefCell},
    fmt,
    future::{Future, IntoFuture},
    mem::take,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll, Waker},
};

use slabmap::SlabMap;

#[cfg(test)]
mod tests;

struct SettlementNode {
    is_settled: Cell<bool>,
    wakers: RefCell<SlabMap<Waker>>,
}

/// Completion signal of one asynchronous operation.
///
/// A pending [`Resource`](crate::Resource) hands out clones of the same `Settlement` on every read,
/// so all suspended readers wait on one signal. Clones share identity; use [`Settlement::ptr_eq`] to compare.
///
/// Awaiting a `Settlement` (or the future returned by [`wait`](Self::wait)) completes once the operation has
/// fulfilled or rejected. It does not yield the outcome; read the resource again for that.
#[derive(Clone)]
pub struct Settlement(Rc<SettlementNode>);

impl Settlement {
    pub(crate) fn new() -> Self {
        Self(Rc::new(SettlementNode {
            is_settled: Cell::new(false),
            wakers: RefCell::new(SlabMap::new()),
        }))
    }
    pub(crate) fn settled() -> Self {
        let s = Self::new();
        s.0.is_settled.set(true);
        s
    }

    /// Returns `true` if the operation has fulfilled or rejected.
    pub fn is_settled(&self) -> bool {
        self.0.is_settled.get()
    }

    /// Returns `true` if both handles refer to the same operation.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }

    /// Creates a future that completes when the operation settles.
    pub fn wait(&self) -> Wait {
        Wait {
            settlement: self.clone(),
            key: None,
        }
    }

    pub(crate) fn notify(&self) {
        self.0.is_settled.set(true);
        let wakers = take(&mut *self.0.wakers.borrow_mut());
        for (_, waker) in wakers {
            waker.wake();
        }
    }
}
impl PartialEq for Settlement {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}
impl Eq for Settlement {}

impl fmt::Debug for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settlement")
            .field("ptr", &Rc::as_ptr(&self.0))
            .field("is_settled", &self.is_settled())
            .finish()
    }
}

impl IntoFuture for Settlement {
    type Output = ();
    type IntoFuture = Wait;

    fn into_future(self) -> Self::IntoFuture {
        Wait {
            settlement: self,
            key: None,
        }
    }
}

/// Future returned by [`Settlement::wait`].
///
/// Dropping it before completion removes its waker from the settlement.
#[must_use = "futures do nothing unless polled"]
pub struct Wait {
    settlement: Settlement,
    key: Option<usize>,
}

impl Future for Wait {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let node = &this.settlement.0;
        if node.is_settled.get() {
            this.key = None;
            return Poll::Ready(());
        }
        let mut wakers = node.wakers.borrow_mut();
        if let Some(key) = this.key {
            wakers[key].clone_from(cx.waker());
        } else {
            this.key = Some(wakers.insert(cx.waker().clone()));
        }
        Poll::Pending
    }
}
impl Drop for Wait {
    fn drop(&mut self) {
        if let Some(key) = self.key {
            if !self.settlement.is_settled() {
                self.settlement.0.wakers.borrow_mut().remove(key);
            }
        }
    }
}
