//! End-to-end tests for login, registration, logout and the page guard

mod common;

use chrono::Utc;
use common::{OTHER_EMAIL, TEST_EMAIL, TEST_PASS, TEST_USER, TestApp};
use config_hub::app::navigation::Page;
use config_hub::constants::{AUTH_REDIRECT_DELAY, STORAGE_AUTH_TOKEN, STORAGE_USER_DATA};
use config_hub::eventing::AppEvent;
use config_hub::features::auth::AuthController;
use config_hub::features::detail::DetailController;
use config_hub::features::upload::{UploadController, UploadEntry};
use config_hub::services::Method;
use config_hub::state::{GuardDecision, NavMenu};
use config_hub::utils::config_store::LocalStore;

#[tokio::test]
async fn test_login_caches_profile_for_next_run() {
    let mut test = TestApp::spawn();
    let user = AuthController::new(test.ctx())
        .login(TEST_EMAIL, TEST_PASS)
        .await
        .expect("login");
    assert_eq!(user.username, TEST_USER);
    assert_eq!(test.messages(), vec!["Login successful"]);

    let cached = test.store.get(STORAGE_USER_DATA).expect("cached profile");
    assert!(cached.contains(TEST_USER));
    let stored_token = test.store.get(STORAGE_AUTH_TOKEN).expect("stored token");
    assert!(!stored_token.is_empty());

    let restarted = test.restart();
    assert!(restarted.app.ctx.session.is_authenticated());
    assert_eq!(
        restarted.app.ctx.session.current_user().map(|u| u.id),
        Some(test.user_id.clone())
    );
}

#[tokio::test]
async fn test_wrong_password_keeps_anonymous() {
    let mut test = TestApp::spawn();
    let user = AuthController::new(test.ctx())
        .login(TEST_EMAIL, "not-the-password")
        .await;

    assert!(user.is_none());
    assert_eq!(
        test.messages(),
        vec!["Login failed: Incorrect email or password"]
    );
    assert!(test.store.get(STORAGE_AUTH_TOKEN).is_none());
    assert!(!test.app.ctx.session.is_authenticated());
}

#[tokio::test]
async fn test_register_then_login() {
    let mut test = TestApp::spawn();
    let auth = AuthController::new(test.ctx());

    assert!(auth.register("peach", "peach@example.com", "castle99").await);
    assert!(auth.login("peach@example.com", "castle99").await.is_some());
    assert_eq!(
        test.messages(),
        vec![
            "Registration completed, you can now log in",
            "Login successful"
        ]
    );
}

#[tokio::test]
async fn test_register_rejections() {
    let mut test = TestApp::spawn();
    let auth = AuthController::new(test.ctx());

    assert!(!auth.register("luigi2", OTHER_EMAIL, "password456").await);
    // Short passwords never reach the backend
    let before = test.backend.request_count();
    assert!(!auth.register("toad", "toad@example.com", "abc").await);
    assert_eq!(test.backend.request_count(), before);

    assert_eq!(
        test.messages(),
        vec![
            "Registration failed: Email already registered",
            "Password must be at least 6 characters"
        ]
    );
}

#[tokio::test]
async fn test_rejected_token_clears_session() {
    let mut test = TestApp::signed_in().await;
    let config_id = test.backend.seed_config(&test.user_id, "Blitz", "Chess", &[], 0);

    let mut detail = DetailController::new(test.ctx(), config_id);
    detail.load().await;
    test.backend.expire_tokens();

    assert!(!detail.add_comment("still there?").await);
    assert!(!test.app.ctx.session.is_authenticated());
    assert!(test.store.get(STORAGE_AUTH_TOKEN).is_none());
    assert!(test.store.get(STORAGE_USER_DATA).is_none());

    let events = test.events();
    assert!(events.contains(&AppEvent::SessionChanged {
        authenticated: false
    }));
    assert!(
        test.app
            .notifications
            .entries()
            .any(|n| n.message == "Session expired. Please log in again.")
    );
}

#[tokio::test]
async fn test_logout_redirects_home() {
    let mut test = TestApp::signed_in().await;
    let auth = AuthController::new(test.ctx());
    assert!(matches!(auth.nav_menu(), NavMenu::Authenticated { .. }));

    assert!(auth.logout());
    assert!(matches!(auth.nav_menu(), NavMenu::Anonymous { .. }));

    let events = test.events();
    assert!(events.iter().any(|e| matches!(
        e,
        AppEvent::Redirect { to, .. } if to.page == Page::Home
    )));
    assert!(!test.restart().app.ctx.session.is_authenticated());

    // A second logout has nothing to drop
    assert!(!auth.logout());
}

#[tokio::test]
async fn test_anonymous_upload_is_redirected() {
    let mut test = TestApp::spawn();

    let decision = AuthController::new(test.ctx()).enforce(Page::Upload);
    assert!(matches!(decision, GuardDecision::Redirect { to: Page::Home, .. }));

    let mut upload = UploadController::new(test.ctx());
    assert_eq!(upload.open(Utc::now()), UploadEntry::Redirected);

    let events = test.events();
    let delays: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Redirect { after, .. } => Some(*after),
            _ => None,
        })
        .collect();
    assert_eq!(delays, vec![AUTH_REDIRECT_DELAY, AUTH_REDIRECT_DELAY]);
    assert!(
        test.app
            .notifications
            .entries()
            .all(|n| n.message == "You must be logged in to access this page")
    );
    assert_eq!(test.backend.count(Method::Post, "/configs/"), 0);
}
