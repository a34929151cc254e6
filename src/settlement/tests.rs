use assert_call::{CallRecorder, call};
use futures::{
    executor::{LocalPool, block_on},
    poll,
    task::LocalSpawnExt,
};

use super::Settlement;

#[test]
fn new_is_pending() {
    let s = Settlement::new();
    assert!(!s.is_settled());
}

#[test]
fn clones_share_identity() {
    let s0 = Settlement::new();
    let s1 = s0.clone();
    assert!(Settlement::ptr_eq(&s0, &s1));
    assert_eq!(s0, s1);
    assert_ne!(s0, Settlement::new());

    s0.notify();
    assert!(s1.is_settled());
}

#[test]
fn wait_after_settle_is_ready() {
    let s = Settlement::settled();
    block_on(s.wait());
    block_on(async { s.await });
}

#[test]
fn notify_wakes_all_waiters() {
    let mut pool = LocalPool::new();
    let sp = pool.spawner();
    let mut cr = CallRecorder::new();

    let s = Settlement::new();
    for i in 0..3 {
        let s = s.clone();
        sp.spawn_local(async move {
            s.await;
            call!("woken {i}");
        })
        .unwrap();
    }
    pool.run_until_stalled();
    cr.verify(());

    s.notify();
    pool.run_until_stalled();
    cr.verify(["woken 0", "woken 1", "woken 2"]);
}

#[test]
fn dropped_wait_removes_waker() {
    let s = Settlement::new();
    block_on(async {
        let mut w = s.wait();
        assert!(poll!(&mut w).is_pending());
        assert!(poll!(&mut w).is_pending());
        assert_eq!(s.0.wakers.borrow().len(), 1);
        drop(w);
    });
    assert_eq!(s.0.wakers.borrow().len(), 0);
}
