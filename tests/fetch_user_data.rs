
use assert_call::CallRecorder;
use budget_resource::*;
use futures::executor::LocalPool;
use rstest::rstest;

use self::test_utils::*;

#[test]
fn returns_every_domain_before_any_settles() {
    let mut pool = LocalPool::new();
    let mut cr = CallRecorder::new();
    let (_gates, fetcher) = gated();

    let map = fetch_user_data(&fetcher, Some(AuthToken::new("tok")), &pool.spawner());
    cr.verify(fetch_calls(Some("tok")));
    pool.run_until_stalled();
    assert_eq!(
        map.statuses(),
        [
            (Domain::Tags, ResourceStatus::Pending),
            (Domain::Records, ResourceStatus::Pending),
            (Domain::Budgets, ResourceStatus::Pending),
        ]
    );
    for domain in Domain::ALL {
        assert!(!map.settlement(domain).is_settled());
    }
}

#[test]
fn absent_credential_is_passed_through() {
    let pool = LocalPool::new();
    let mut cr = CallRecorder::new();
    let (_gates, fetcher) = gated();

    fetch_user_data(&fetcher, None, &pool.spawner());
    cr.verify(["fetch tags None", "fetch records None", "fetch budgets None"]);
}

#[test]
fn domains_settle_independently() {
    let mut pool = LocalPool::new();
    let mut cr = CallRecorder::new();
    let (gates, fetcher) = gated();
    let map = fetch_user_data(&fetcher, Some(AuthToken::new("tok")), &pool.spawner());
    cr.verify(fetch_calls(Some("tok")));

    let gates = gates.settle(Domain::Records, None);
    pool.run_until_stalled();
    assert_eq!(map.records.read(), Read::Ready(sample_records()));
    assert!(map.tags.read().is_suspended());
    assert!(map.budgets.read().is_suspended());

    let gates = gates.settle(Domain::Tags, None);
    pool.run_until_stalled();
    assert_eq!(map.tags.read(), Read::Ready(sample_tags()));
    assert!(map.budgets.read().is_suspended());

    drop(gates.settle(Domain::Budgets, None));
    pool.run_until_stalled();
    assert_eq!(map.budgets.read(), Read::Ready(sample_budgets()));
    cr.verify(());
}

#[rstest]
#[case(Domain::Tags)]
#[case(Domain::Records)]
#[case(Domain::Budgets)]
fn rejection_does_not_affect_other_domains(#[case] failing: Domain) {
    let mut pool = LocalPool::new();
    let mut cr = CallRecorder::new();
    let (gates, fetcher) = gated();
    let map = fetch_user_data(&fetcher, Some(AuthToken::new("tok")), &pool.spawner());
    cr.verify(fetch_calls(Some("tok")));

    let mut gates = gates.settle(failing, Some(FetchError::Status(500)));
    pool.run_until_stalled();
    for domain in Domain::ALL {
        let expected = if domain == failing {
            ResourceStatus::Error
        } else {
            ResourceStatus::Pending
        };
        assert_eq!(map.status(domain), expected, "{domain}");
    }

    for domain in Domain::ALL {
        if domain != failing {
            gates = gates.settle(domain, None);
        }
    }
    pool.run_until(map.settle_all());
    for domain in Domain::ALL {
        let expected = if domain == failing {
            ResourceStatus::Error
        } else {
            ResourceStatus::Success
        };
        assert_eq!(map.status(domain), expected, "{domain}");
    }
    cr.verify(());
}

#[test]
fn budgets_rejection_leaves_other_values_intact() {
    let mut pool = LocalPool::new();
    let mut cr = CallRecorder::new();
    let (gates, fetcher) = gated();
    let map = fetch_user_data(&fetcher, Some(AuthToken::new("tok")), &pool.spawner());
    cr.verify(fetch_calls(Some("tok")));

    let gates = gates
        .settle(Domain::Tags, None)
        .settle(Domain::Records, None);
    pool.run_until_stalled();
    let tags = map.tags.read();
    let records = map.records.read();
    assert_eq!(tags, Read::Ready(sample_tags()));

    drop(gates.settle(Domain::Budgets, Some(FetchError::Unauthorized)));
    pool.run_until_stalled();
    assert_eq!(map.budgets.read(), Read::Failed(FetchError::Unauthorized));
    assert_eq!(map.tags.read(), tags);
    assert_eq!(map.records.read(), records);
}

#[test]
fn rejected_fetch_is_not_retried() {
    let mut pool = LocalPool::new();
    let mut cr = CallRecorder::new();
    let (gates, fetcher) = gated();
    let map = fetch_user_data(&fetcher, Some(AuthToken::new("tok")), &pool.spawner());
    cr.verify(fetch_calls(Some("tok")));

    drop(gates.settle(Domain::Tags, Some(FetchError::Network("reset".to_string()))));
    pool.run_until_stalled();
    for _ in 0..3 {
        assert_eq!(
            map.tags.read(),
            Read::Failed(FetchError::Network("reset".to_string()))
        );
    }
    pool.run_until_stalled();
    cr.verify(());
}

#[test]
fn spawn_failure_settles_to_error() {
    let pool = LocalPool::new();
    let sp = pool.spawner();
    drop(pool);

    let mut cr = CallRecorder::new();
    let (_gates, fetcher) = gated();
    let map = fetch_user_data(&fetcher, Some(AuthToken::new("tok")), &sp);
    cr.verify(fetch_calls(Some("tok")));
    for domain in Domain::ALL {
        assert_eq!(map.status(domain), ResourceStatus::Error);
    }
    assert_eq!(map.records.read(), Read::Failed(FetchError::Spawn));
}
