//! Label resolution and in-flight slot accounting.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::http::StatusCode;
use vigil_core::metrics::Registry;
use vigil_server::obs::middleware::{resolve_labels, InFlight};
use vigil_server::router::{endpoint_name, ROUTES};

#[test]
fn endpoint_prefers_route_name() {
    let l = resolve_labels("GET", Some("/api/users/:user_id"), "/api/users/7", StatusCode::OK);
    assert_eq!(l.method, "GET");
    assert_eq!(l.endpoint, "get_user");
    assert_eq!(l.status, 200);
}

#[test]
fn head_resolves_to_get_route_name() {
    let l = resolve_labels("HEAD", Some("/api/users/:user_id"), "/api/users/5", StatusCode::OK);
    assert_eq!(l.method, "HEAD");
    assert_eq!(l.endpoint, "get_user");
    assert_eq!(endpoint_name("HEAD", "/api/users"), Some("get_users"));
    assert_eq!(endpoint_name("HEAD", "/nope"), None);
}

#[test]
fn endpoint_falls_back_to_pattern_then_path_then_unknown() {
    // routed pattern, but not for this method
    let l = resolve_labels(
        "DELETE",
        Some("/api/users/:user_id"),
        "/api/users/7",
        StatusCode::METHOD_NOT_ALLOWED,
    );
    assert_eq!(l.endpoint, "/api/users/:user_id");
    assert_eq!(l.status, 405);

    let l = resolve_labels("GET", None, "/nope/here", StatusCode::NOT_FOUND);
    assert_eq!(l.endpoint, "/nope/here");

    let l = resolve_labels("GET", None, "", StatusCode::NOT_FOUND);
    assert_eq!(l.endpoint, "unknown");

    let l = resolve_labels("", None, "/x", StatusCode::BAD_REQUEST);
    assert_eq!(l.method, "unknown");
}

#[test]
fn route_names_are_unique() {
    for (m, p, name) in ROUTES {
        assert_eq!(endpoint_name(m, p), Some(*name));
        assert_eq!(ROUTES.iter().filter(|(_, _, n)| n == name).count(), 1);
    }
}

#[test]
fn in_flight_slot_released_on_drop() {
    let reg = Registry::new();
    let g = reg.gauge("active", "Active", &[]).unwrap();

    let a = InFlight::enter(&g).unwrap();
    let b = InFlight::enter(&g).unwrap();
    assert_eq!(g.value(&[]).unwrap(), Some(2.0));
    drop(a);
    assert_eq!(g.value(&[]).unwrap(), Some(1.0));

    // a panic while the slot is held still releases it
    let g2 = g.clone();
    let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let _slot = InFlight::enter(&g2).unwrap();
        panic!("handler fault");
    }));
    assert!(res.is_err());
    assert_eq!(g.value(&[]).unwrap(), Some(1.0));

    drop(b);
    assert_eq!(g.value(&[]).unwrap(), Some(0.0));
}

#[test]
fn unwritable_gauge_checks_out_nothing() {
    let reg = Registry::new();
    // labeled gauge: the unlabeled slot cannot be resolved
    let g = reg.gauge("active_by_pool", "Active", &["pool"]).unwrap();
    assert!(InFlight::enter(&g).is_none());
    assert!(reg.family("active_by_pool").unwrap().unwrap().series.is_empty());
}
