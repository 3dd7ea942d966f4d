//! History pop handling and back-guard compensation.

mod common;

use common::*;
use docat_navigator::*;
use std::sync::Arc;

/// Mount on the latest version, switch to 1.0.0 and let the embedded
/// content add its hidden entry.
fn switched_fixture(fx: Fixture) -> Fixture {
    let mut fx = fx;
    mount_and_resolve(&mut fx, "/awesome");
    fx.page.switch_version("1.0.0");
    fx.history.hidden_push("/awesome/1.0.0/index.html");
    fx
}

#[test]
fn test_back_gesture_skips_hidden_entry() {
    let mut fx = switched_fixture(fixture("/"));
    assert_eq!(fx.history.entries().len(), 3);

    let route = fx.history.user_back();
    assert_eq!(route, "/awesome/1.0.0/index.html");

    assert!(fx.page.on_history_pop(&route));
    assert_eq!(fx.page.location().version, "2.0.0");
    assert_eq!(fx.history.current(), "/awesome/2.0.0/index.html");
    // reconciled without touching history
    assert_eq!(fx.history.entries().len(), 3);
    assert!(fx.page.state().is_ready());
}

#[test]
fn test_no_compensation_policy() {
    let mut fx = switched_fixture(fixture("/").with_back_guard(NoCompensation));

    let route = fx.history.user_back();
    assert!(!fx.page.on_history_pop(&route));
    assert_eq!(fx.page.location().version, "1.0.0");
    assert_eq!(fx.history.current(), "/awesome/1.0.0/index.html");
}

#[test]
fn test_custom_policy_sees_current_location() {
    let policy = policy_fn(|location: &Location| usize::from(!location.is_latest()));
    let mut fx = switched_fixture(fixture("/").with_back_guard(policy));

    let route = fx.history.user_back();
    assert!(fx.page.on_history_pop(&route));
    assert_eq!(fx.page.location().version, "2.0.0");
}

#[test]
fn test_back_at_oldest_entry_stays() {
    let mut fx = fixture("/");
    mount_and_resolve(&mut fx, "/awesome");

    let route = fx.history.user_back();
    assert!(!fx.page.on_history_pop(&route));
    assert_eq!(fx.history.entries().len(), 1);
    assert_eq!(fx.page.location().version, "2.0.0");
}

#[test]
fn test_async_back_is_compensated_once() {
    init_logging();
    let history = AsyncHistory::default();
    let mut page = DocsPage::new(
        SyncConfig::default(),
        Arc::new(awesome_repository()),
        Box::new(history.clone()),
        Box::new(NoBanner),
    );
    page.mount("/awesome");
    pollster::block_on(page.resolve());
    page.switch_version("1.0.0");

    // the browser popped onto the hidden entry
    assert!(!page.on_history_pop("/awesome/1.0.0/index.html"));
    let backs = || history.log.borrow().iter().filter(|e| *e == "back").count();
    assert_eq!(backs(), 1);

    // the programmatic step lands later
    assert!(page.on_history_pop("/awesome/2.0.0/index.html"));
    assert_eq!(page.location().version, "2.0.0");
    assert_eq!(backs(), 1);
}
