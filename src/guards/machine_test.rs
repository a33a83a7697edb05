use std::cell::RefCell;

use super::*;
use crate::auth::claims::Claims;

fn signed_in(role: &str) -> SessionState {
    SessionState::signed_in(Claims {
        subject_id: "u1".to_owned(),
        email: "u1@example.com".to_owned(),
        role: role.to_owned(),
        issued_at: None,
        expires_at: i64::MAX,
    })
}

#[derive(Default)]
struct RecordingNavigator {
    paths: RefCell<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.borrow_mut().push(path.to_owned());
    }
}

// =============================================================
// GuardPolicy construction
// =============================================================

#[test]
fn default_policies_use_default_paths() {
    assert_eq!(GuardPolicy::authenticated(), GuardPolicy::Authenticated { redirect_to: "/login".to_owned() });
    assert_eq!(
        GuardPolicy::admin(),
        GuardPolicy::Admin {
            login_path: "/login".to_owned(),
            access_denied_path: "/access-denied".to_owned(),
            admin_role: "admin".to_owned(),
        }
    );
}

#[test]
fn admin_from_config_copies_paths_and_role() {
    let config = SessionConfig {
        login_path: "/signin".to_owned(),
        access_denied_path: "/nope".to_owned(),
        admin_role: "root".to_owned(),
        ..SessionConfig::default()
    };
    assert_eq!(
        GuardPolicy::admin_from(&config),
        GuardPolicy::Admin {
            login_path: "/signin".to_owned(),
            access_denied_path: "/nope".to_owned(),
            admin_role: "root".to_owned(),
        }
    );
}

// =============================================================
// AuthGuard behavior
// =============================================================

#[test]
fn new_guard_is_loading_with_placeholder() {
    let guard = RouteGuard::new(GuardPolicy::authenticated());
    assert_eq!(guard.phase(), GuardPhase::Loading);
    assert_eq!(guard.view(), GuardView::Placeholder);
}

#[test]
fn loading_state_never_redirects() {
    let mut guard = RouteGuard::new(GuardPolicy::authenticated());
    assert_eq!(guard.observe(&SessionState::loading()), None);
    assert_eq!(guard.observe(&SessionState::loading()), None);
    assert_eq!(guard.view(), GuardView::Placeholder);
}

#[test]
fn auth_guard_signed_out_redirects_once() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(GuardPolicy::authenticated());

    assert_eq!(guard.drive(&SessionState::signed_out(), &nav), GuardView::Nothing);
    assert_eq!(guard.drive(&SessionState::signed_out(), &nav), GuardView::Nothing);

    assert_eq!(*nav.paths.borrow(), vec!["/login".to_owned()]);
    assert_eq!(guard.phase(), GuardPhase::Redirecting);
}

#[test]
fn auth_guard_custom_redirect_target() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(GuardPolicy::authenticated_to("/welcome"));
    guard.drive(&SessionState::signed_out(), &nav);
    assert_eq!(*nav.paths.borrow(), vec!["/welcome".to_owned()]);
}

#[test]
fn auth_guard_any_role_is_authorized() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(GuardPolicy::authenticated());
    assert_eq!(guard.drive(&signed_in("user"), &nav), GuardView::Children);
    assert!(nav.paths.borrow().is_empty());
}

#[test]
fn authorized_guard_redirects_when_session_lapses() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(GuardPolicy::authenticated());
    guard.drive(&signed_in("user"), &nav);
    guard.drive(&signed_in("user"), &nav);
    assert_eq!(guard.drive(&SessionState::signed_out(), &nav), GuardView::Nothing);
    assert_eq!(*nav.paths.borrow(), vec!["/login".to_owned()]);
}

#[test]
fn redirecting_is_absorbing() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(GuardPolicy::authenticated());
    guard.drive(&SessionState::signed_out(), &nav);
    assert_eq!(guard.drive(&signed_in("user"), &nav), GuardView::Nothing);
    assert_eq!(guard.phase(), GuardPhase::Redirecting);
    assert_eq!(nav.paths.borrow().len(), 1);
}

#[test]
fn loading_after_resolution_keeps_phase() {
    let mut guard = RouteGuard::new(GuardPolicy::authenticated());
    guard.observe(&signed_in("user"));
    assert_eq!(guard.observe(&SessionState::loading()), None);
    assert_eq!(guard.phase(), GuardPhase::Authorized);
}

// =============================================================
// AdminGuard behavior
// =============================================================

#[test]
fn admin_guard_signed_out_goes_to_login() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(GuardPolicy::admin());
    guard.drive(&SessionState::signed_out(), &nav);
    assert_eq!(*nav.paths.borrow(), vec!["/login".to_owned()]);
}

#[test]
fn admin_guard_non_admin_goes_to_access_denied() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(GuardPolicy::admin());
    assert_eq!(guard.drive(&signed_in("user"), &nav), GuardView::Nothing);
    assert_eq!(*nav.paths.borrow(), vec!["/access-denied".to_owned()]);
}

#[test]
fn admin_guard_admin_is_authorized() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(GuardPolicy::admin());
    assert_eq!(guard.drive(&signed_in("admin"), &nav), GuardView::Children);
    assert!(nav.paths.borrow().is_empty());
}

#[test]
fn admin_guard_demotion_while_viewing_denies() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(GuardPolicy::admin());
    guard.drive(&signed_in("admin"), &nav);
    guard.drive(&signed_in("user"), &nav);
    assert_eq!(*nav.paths.borrow(), vec!["/access-denied".to_owned()]);
}

#[test]
fn admin_guard_role_check_is_exact() {
    let mut guard = RouteGuard::new(GuardPolicy::admin());
    assert_eq!(guard.observe(&signed_in("administrator")), Some("/access-denied".to_owned()));
}

#[test]
fn closures_are_navigators() {
    let seen = RefCell::new(Vec::new());
    let nav = |path: &str| seen.borrow_mut().push(path.to_owned());
    let mut guard = RouteGuard::new(GuardPolicy::admin());
    guard.drive(&signed_in("user"), &nav);
    assert_eq!(seen.into_inner(), vec!["/access-denied".to_owned()]);
}
