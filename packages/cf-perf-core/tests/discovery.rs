//! GUID discovery and deletion polling against a stub `cf` script.

#![cfg(unix)]

mod common;

use std::time::Duration;

use cf_perf_core::guids::{get_guids, random_guid, wait_to_fail};
use cf_perf_core::{PerfError, Role, UserContext};
use common::{listing, StubCf};
use ntest::timeout;

fn user() -> UserContext {
    UserContext::new(Role::Regular, "bob", "pw").unwrap()
}

#[timeout(5000)]
#[test]
fn test_get_guids_from_listing() {
    common::block_on(async {
        let stub = StubCf::new(&format!("echo '{}'", listing(&["d1", "d2", "d3"])));
        let config = stub.config();

        let guids = get_guids(&stub.cli(), &user(), &config, "/v3/domains")
            .await
            .unwrap();

        assert_eq!(guids, vec!["d1", "d2", "d3"]);
        assert_eq!(stub.args(), vec!["curl --fail /v3/domains"]);
    });
}

#[timeout(5000)]
#[test]
fn test_random_guid_comes_from_listing() {
    common::block_on(async {
        let stub = StubCf::new(&format!("echo '{}'", listing(&["o1", "o2"])));
        let config = stub.config();

        let guid = random_guid(&stub.cli(), &user(), &config, "/v3/organizations")
            .await
            .unwrap();

        assert!(guid == "o1" || guid == "o2", "got {}", guid);
    });
}

#[timeout(5000)]
#[test]
fn test_empty_listing_is_an_error() {
    common::block_on(async {
        let stub = StubCf::new(&format!("echo '{}'", listing(&[])));
        let config = stub.config();

        let err = get_guids(&stub.cli(), &user(), &config, "/v3/domains")
            .await
            .unwrap_err();

        assert!(matches!(err, PerfError::EmptyListing { .. }));
    });
}

#[timeout(5000)]
#[test]
fn test_failed_listing_is_an_error() {
    common::block_on(async {
        let stub = StubCf::new("exit 1");
        let config = stub.config();

        let err = get_guids(&stub.cli(), &user(), &config, "/v3/domains")
            .await
            .unwrap_err();

        assert!(matches!(err, PerfError::CommandFailed { .. }));
    });
}

#[timeout(5000)]
#[test]
fn test_wait_to_fail_polls_until_gone() {
    common::block_on(async {
        // Succeeds twice, then 404s.
        let stub = StubCf::new(
            r#"count_file="$(dirname "$0")/count"
    n=$(cat "$count_file" 2>/dev/null || echo 0)
    n=$((n + 1))
    echo "$n" > "$count_file"
    if [ "$n" -ge 3 ]; then exit 22; fi
    exit 0"#,
        );
        let config = stub.config();

        wait_to_fail(&stub.cli(), &user(), &config, "/v3/domains/d1")
            .await
            .unwrap();

        assert_eq!(stub.args().len(), 3);
        assert!(stub
            .args()
            .iter()
            .all(|args| args == "curl --fail /v3/domains/d1"));
    });
}

#[timeout(5000)]
#[test]
fn test_wait_to_fail_gives_up_after_long_timeout() {
    common::block_on(async {
        let stub = StubCf::ok();
        let mut config = stub.config();
        config.long_timeout = Duration::from_millis(150);
        config.poll_interval = Duration::from_millis(20);

        let err = wait_to_fail(&stub.cli(), &user(), &config, "/v3/domains/d1")
            .await
            .unwrap_err();

        assert!(matches!(err, PerfError::StillPresent { .. }));
        assert!(stub.args().len() >= 2);
    });
}
