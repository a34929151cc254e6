use std::{
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    sync::{Condvar, LazyLock, Mutex, MutexGuard},
    task::{Context, Poll, Waker},
    time::{Duration, Instant},
};

use futures::{
    future::{Either, select},
    pin_mut,
};
use parse_display::Display;


static TIMER: LazyLock<Timer> = LazyLock::new(|| Timer {
    queue: Mutex::new(DeadlineQueue::new()),
    condvar: Condvar::new(),
});

struct Timer {
    queue: Mutex<DeadlineQueue>,
    condvar: Condvar,
}
impl Timer {
    fn lock(&self) -> MutexGuard<'_, DeadlineQueue> {
        self.queue.lock().unwrap()
    }

    fn run_worker(&self) {
        let mut expired = Vec::new();
        let mut queue = self.lock();
        loop {
            let now = Instant::now();
            while let Some(entry) = queue.wakers.first_entry() {
                if entry.key().at > now {
                    break;
                }
                expired.push(entry.remove());
            }
            if !expired.is_empty() {
                drop(queue);
                for waker in expired.drain(..) {
                    waker.wake();
                }
                queue = self.lock();
                continue;
            }
            queue = match queue.wakers.first_key_value() {
                Some((deadline, _)) => {
                    let timeout = deadline.at.saturating_duration_since(now);
                    self.condvar.wait_timeout(queue, timeout).unwrap().0
                }
                None => self.condvar.wait(queue).unwrap(),
            };
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Deadline {
    at: Instant,
    seq: u64,
}

struct DeadlineQueue {
    wakers: BTreeMap<Deadline, Waker>,
    next_seq: u64,
    worker_started: bool,
}

impl DeadlineQueue {
    fn new() -> Self {
        Self {
            wakers: BTreeMap::new(),
            next_seq: 0,
            worker_started: false,
        }
    }

    fn insert(&mut self, at: Instant, waker: Waker) -> Deadline {
        if !self.worker_started {
            self.worker_started = true;
            std::thread::spawn(|| TIMER.run_worker());
        }
        let deadline = Deadline {
            at,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        let is_first = self
            .wakers
            .first_key_value()
            .is_none_or(|(first, _)| deadline < *first);
        self.wakers.insert(deadline, waker);
        if is_first {
            TIMER.condvar.notify_one();
        }
        deadline
    }
}

/// Future returned by [`sleep`] and [`sleep_until`].
#[must_use = "futures do nothing unless polled"]
pub struct Sleep {
    at: Instant,
    deadline: Option<Deadline>,
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if Instant::now() >= this.at {
            if let Some(deadline) = this.deadline.take() {
                TIMER.lock().wakers.remove(&deadline);
            }
            return Poll::Ready(());
        }
        let mut queue = TIMER.lock();
        match this.deadline {
            Some(deadline) => match queue.wakers.get_mut(&deadline) {
                Some(waker) => {
                    if !waker.will_wake(cx.waker()) {
                        waker.clone_from(cx.waker());
                    }
                }
                None => {
                    this.deadline = None;
                    return Poll::Ready(());
                }
            },
            None => this.deadline = Some(queue.insert(this.at, cx.waker().clone())),
        }
        Poll::Pending
    }
}
impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some(deadline) = self.deadline {
            TIMER.lock().wakers.remove(&deadline);
        }
    }
}

/// Completes after `duration` has elapsed. Works on any executor.
pub fn sleep(duration: Duration) -> Sleep {
    sleep_until(Instant::now() + duration)
}

/// Completes once `instant` has been reached. Works on any executor.
pub fn sleep_until(instant: Instant) -> Sleep {
    Sleep {
        at: instant,
        deadline: None,
    }
}

#[derive(Debug, Display, PartialEq, Eq)]
#[display("timeout")]
pub struct TimeoutError {
    _private: (),
}

impl std::error::Error for TimeoutError {}

/// Runs `fut`, giving up after `duration`.
pub async fn with_timeout<T>(
    fut: impl Future<Output = T>,
    duration: Duration,
) -> Result<T, TimeoutError> {
    let timeout = sleep(duration);
    pin_mut!(fut);
    match select(fut, timeout).await {
        Either::Left((value, _)) => Ok(value),
        Either::Right(((), _)) => Err(TimeoutError { _private: () }),
    }
}
