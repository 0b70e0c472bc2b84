//! End-to-end session workflow tests against a mock FundOps API.
//!
//! These tests wire the real REST client, the session context, and a
//! shared store together and drive full user workflows:
//!
//! 1. Sign-in lifecycle: login, default organization, scoped fetch,
//!    explicit sign-out
//! 2. Session restore across a simulated process restart
//! 3. Expired-token restore settling to signed-out
//! 4. Organization switch invalidating in-flight fetches
//! 5. Membership changes reconciling the selection on refresh
//! 6. Token rejection mid-session signing out but keeping the
//!    organization choice
//! 7. Password change over the live session

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fundops_api::{ApiConfig, RestClient};
use fundops_session::{
    MemoryStore, SessionContext, SessionEvent, SessionEvents, SessionStore, ACCESS_TOKEN_KEY,
    SELECTED_ORG_KEY,
};

// ==================== Test Fixtures ====================

struct TestFixture {
    server: MockServer,
    store: Arc<MemoryStore>,
}

impl TestFixture {
    async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            store: Arc::new(MemoryStore::new()),
        }
    }

    fn config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.server.uri(),
            timeout_secs: 10,
            max_retries: 3,
        }
    }

    /// A context over the fixture's store. Calling this twice models a
    /// process restart with the same persisted state.
    fn context(&self) -> SessionContext {
        SessionContext::new(Arc::new(RestClient::new(self.config())), self.store.clone())
    }

    fn client(&self) -> RestClient {
        RestClient::new(self.config())
    }
}

fn jdoe() -> serde_json::Value {
    json!({
        "id": "u-100",
        "email": "jdoe@meridian.example",
        "username": "jdoe",
        "first_name": "Jane",
        "last_name": "Doe",
        "is_active": true,
        "is_superuser": false
    })
}

fn two_orgs() -> serde_json::Value {
    json!({
        "organizations": [
            {
                "id": "org-a",
                "name": "Alpha Partners",
                "code": "ALP",
                "role": "viewer",
                "is_primary": false
            },
            {
                "id": "org-b",
                "name": "Beta Capital",
                "code": "BET",
                "role": "admin",
                "is_primary": true
            }
        ]
    })
}

async fn next_event(events: &mut SessionEvents) -> SessionEvent {
    tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("Should receive an event within a second")
        .expect("Event channel should be open")
}

// ==================== Sign-In Lifecycle ====================

#[tokio::test]
async fn test_sign_in_lifecycle() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_string_contains("username=jdoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-e2e-1",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .and(header("Authorization", "Bearer tok-e2e-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jdoe()))
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/u-100/organizations"))
        .and(header("Authorization", "Bearer tok-e2e-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_orgs()))
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/funds/organization/org-b"))
        .and(header("Authorization", "Bearer tok-e2e-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "fund-1", "name": "Beta Growth Fund I", "organization_id": "org-b"}
        ])))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let ctx = fixture.context();
    let mut events = ctx.subscribe();

    ctx.login("jdoe", "s3cret").await.expect("Login should succeed");

    assert!(ctx.is_authenticated());
    let identity = ctx.identity().expect("Should have an identity");
    assert_eq!(identity.username, "jdoe");

    // The primary organization is selected and persisted.
    let org = ctx.current_organization().expect("Should have a selection");
    assert_eq!(org.organization_id, "org-b");
    assert_eq!(
        fixture.store.get(SELECTED_ORG_KEY).as_deref(),
        Some("org-b")
    );
    assert_eq!(
        fixture.store.get(ACCESS_TOKEN_KEY).as_deref(),
        Some("tok-e2e-1")
    );

    assert_eq!(next_event(&mut events).await, SessionEvent::SignedIn);
    assert_eq!(
        next_event(&mut events).await,
        SessionEvent::OrganizationChanged {
            organization_id: Some("org-b".to_string())
        }
    );

    // A page fetches data scoped to the selection.
    let scope = ctx.scope();
    let token = ctx.access_token().expect("Should expose the token");
    let funds = fixture
        .client()
        .list_funds(&token, &org.organization_id)
        .await
        .expect("Fund fetch should succeed");
    let funds = ctx
        .accept(&scope, funds)
        .expect("Result should land in the scope it was fetched for");
    assert_eq!(funds.len(), 1);
    assert_eq!(funds[0].name, "Beta Growth Fund I");

    ctx.logout();

    assert!(!ctx.is_authenticated());
    assert!(ctx.access_token().is_none());
    assert!(fixture.store.get(ACCESS_TOKEN_KEY).is_none());
    assert!(fixture.store.get(SELECTED_ORG_KEY).is_none());
    assert_eq!(next_event(&mut events).await, SessionEvent::SignedOut);
}

// ==================== Restore Across Restart ====================

#[tokio::test]
async fn test_restore_across_restart() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-e2e-2"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    // Identity and memberships are fetched once at login and once at
    // restore.
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jdoe()))
        .expect(2)
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/u-100/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_orgs()))
        .expect(2)
        .mount(&fixture.server)
        .await;

    // First process: sign in and move off the primary organization.
    {
        let ctx = fixture.context();
        ctx.login("jdoe", "s3cret").await.expect("Login should succeed");
        ctx.select_organization("org-a")
            .expect("Selection should succeed");
    }

    // Second process over the same store.
    let ctx = fixture.context();
    assert!(ctx.is_loading(), "A persisted token means restoring");

    assert!(ctx.restore().await, "Restore should succeed");

    assert!(ctx.is_authenticated());
    assert!(!ctx.is_loading());
    assert_eq!(
        ctx.identity().expect("Should have an identity").username,
        "jdoe"
    );
    // The persisted choice beats the primary flag.
    assert_eq!(
        ctx.current_organization()
            .expect("Should have a selection")
            .organization_id,
        "org-a"
    );
}

// ==================== Expired Token ====================

#[tokio::test]
async fn test_expired_token_restore_settles_signed_out() {
    let fixture = TestFixture::new().await;
    fixture
        .store
        .set(ACCESS_TOKEN_KEY, "tok-stale")
        .expect("Seeding the store should succeed");

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .and(header("Authorization", "Bearer tok-stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Could not validate credentials"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let ctx = fixture.context();
    assert!(ctx.is_loading());

    assert!(!ctx.restore().await, "Restore should fail");

    assert!(!ctx.is_authenticated());
    assert!(!ctx.is_loading());
    assert!(ctx.identity().is_none());
    assert!(
        fixture.store.get(ACCESS_TOKEN_KEY).is_none(),
        "The rejected token should be discarded"
    );
}

// ==================== Organization Switch ====================

#[tokio::test]
async fn test_switch_drops_in_flight_results() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-e2e-4"
        })))
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jdoe()))
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/u-100/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_orgs()))
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/funds/organization/org-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "fund-1", "name": "Beta Growth Fund I", "organization_id": "org-b"}
        ])))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let ctx = fixture.context();
    ctx.login("jdoe", "s3cret").await.expect("Login should succeed");
    let mut events = ctx.subscribe();

    // A fetch for org-b starts; the user switches before it lands.
    let scope = ctx.scope();
    let token = ctx.access_token().expect("Should expose the token");
    let funds = fixture
        .client()
        .list_funds(&token, "org-b")
        .await
        .expect("Fund fetch should succeed");

    ctx.select_organization("org-a")
        .expect("Selection should succeed");
    assert_eq!(
        next_event(&mut events).await,
        SessionEvent::OrganizationChanged {
            organization_id: Some("org-a".to_string())
        }
    );

    assert!(
        ctx.accept(&scope, funds).is_none(),
        "A result from the previous organization should be dropped"
    );
    assert!(ctx.is_current(&ctx.scope()));
}

// ==================== Membership Reconciliation ====================

#[tokio::test]
async fn test_refresh_follows_membership_changes() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-e2e-5"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jdoe()))
        .expect(2)
        .mount(&fixture.server)
        .await;

    // First membership fetch: only org-a. Second: moved to org-b.
    Mock::given(method("GET"))
        .and(path("/api/v1/users/u-100/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organizations": [
                {"id": "org-a", "name": "Alpha Partners", "role": "admin", "is_primary": true}
            ]
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/u-100/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organizations": [
                {"id": "org-b", "name": "Beta Capital", "role": "viewer", "is_primary": true}
            ]
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let ctx = fixture.context();
    ctx.login("jdoe", "s3cret").await.expect("Login should succeed");
    assert_eq!(
        ctx.current_organization()
            .expect("Should have a selection")
            .organization_id,
        "org-a"
    );

    let mut events = ctx.subscribe();
    assert!(ctx.refresh().await, "Refresh should succeed");

    // The revoked organization is gone and the selection moved.
    assert_eq!(
        ctx.current_organization()
            .expect("Should have a selection")
            .organization_id,
        "org-b"
    );
    assert_eq!(
        fixture.store.get(SELECTED_ORG_KEY).as_deref(),
        Some("org-b")
    );
    assert_eq!(
        next_event(&mut events).await,
        SessionEvent::MembershipsRefreshed
    );
    assert_eq!(
        next_event(&mut events).await,
        SessionEvent::OrganizationChanged {
            organization_id: Some("org-b".to_string())
        }
    );
}

// ==================== Mid-Session Token Rejection ====================

#[tokio::test]
async fn test_rejected_token_signs_out_but_keeps_org_choice() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-e2e-6"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    // The token works at login, then the server starts rejecting it.
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jdoe()))
        .up_to_n_times(1)
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Could not validate credentials"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/u-100/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_orgs()))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let ctx = fixture.context();
    ctx.login("jdoe", "s3cret").await.expect("Login should succeed");
    let mut events = ctx.subscribe();

    assert!(!ctx.refresh().await, "Refresh should fail");

    assert!(!ctx.is_authenticated());
    assert!(ctx.current_organization().is_none());
    assert!(fixture.store.get(ACCESS_TOKEN_KEY).is_none());
    // The choice survives so the next sign-in lands in the same place.
    assert_eq!(
        fixture.store.get(SELECTED_ORG_KEY).as_deref(),
        Some("org-b")
    );
    assert_eq!(next_event(&mut events).await, SessionEvent::SignedOut);
}

// ==================== Password Change ====================

#[tokio::test]
async fn test_change_password_over_session() {
    let fixture = TestFixture::new().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-e2e-7"
        })))
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jdoe()))
        .mount(&fixture.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/u-100/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_orgs()))
        .mount(&fixture.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/change-password"))
        .and(header("Authorization", "Bearer tok-e2e-7"))
        .and(body_string_contains("current_password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Password updated successfully"
        })))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let ctx = fixture.context();
    ctx.login("jdoe", "s3cret").await.expect("Login should succeed");

    ctx.change_password("s3cret", "n3w-s3cret")
        .await
        .expect("Password change should succeed");

    // The session is untouched.
    assert!(ctx.is_authenticated());
    assert_eq!(
        ctx.current_organization()
            .expect("Should have a selection")
            .organization_id,
        "org-b"
    );
}
