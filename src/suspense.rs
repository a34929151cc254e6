use crate::Read;

/// Runs a render function the way a suspense-aware renderer does.
///
/// `render` is called until it stops suspending. On `Suspended`, the attempt is discarded, the settlement is
/// awaited and `render` is called again from scratch. `Failed` is returned as `Err` without retrying.
pub async fn suspend<T, E>(mut render: impl FnMut() -> Read<T, E>) -> Result<T, E> {
    let mut attempts = 1;
    loop {
        match render() {
            Read::Ready(value) => {
                tracing::trace!(attempts, "render completed");
                return Ok(value);
            }
            Read::Failed(e) => {
                tracing::debug!(attempts, "render failed");
                return Err(e);
            }
            Read::Suspended(settlement) => {
                settlement.await;
                attempts += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_call::{CallRecorder, call};
    use futures::executor::LocalPool;

    use super::suspend;
    use crate::{Read, Resource};

    #[test]
    fn retries_until_ready() {
        let mut pool = LocalPool::new();
        let mut cr = CallRecorder::new();
        let (a, settle_a) = Resource::<i32, String>::pending();
        let (b, settle_b) = Resource::<i32, String>::pending();

        let render = suspend(|| {
            call!("render");
            a.read().zip(b.read()).map(|(a, b)| a + b)
        });
        settle_a.settle(Ok(1));
        settle_b.settle(Ok(2));
        assert_eq!(pool.run_until(render), Ok(3));
        cr.verify("render");
    }

    #[test]
    fn resumes_after_each_settlement() {
        let mut pool = LocalPool::new();
        let mut cr = CallRecorder::new();
        let (a, settle_a) = Resource::<i32, String>::pending();
        let (b, settle_b) = Resource::<i32, String>::pending();

        let ret = pool.run_until(async {
            let render = suspend(|| -> Read<i32, String> {
                call!("render");
                let a = match a.read().into_result() {
                    Ok(a) => a,
                    Err(s) => return s.into(),
                };
                b.read().map(|b| a * b)
            });
            let settle = async {
                settle_a.settle(Ok(3));
                futures::pending!();
                settle_b.settle(Ok(4));
            };
            futures::join!(render, settle).0
        });
        assert_eq!(ret, Ok(12));
        cr.verify(["render", "render", "render"]);
    }

    #[test]
    fn failure_is_not_retried() {
        let mut pool = LocalPool::new();
        let mut cr = CallRecorder::new();
        let r = Resource::<i32, String>::failed("unauthorized".to_string());
        let ret = pool.run_until(suspend(|| {
            call!("render");
            r.read()
        }));
        assert_eq!(ret, Err("unauthorized".to_string()));
        cr.verify("render");
    }

    #[test]
    fn ready_without_suspending() {
        let ret = futures::executor::block_on(suspend(|| Read::<_, ()>::Ready(5)));
        assert_eq!(ret, Ok(5));
    }
}
