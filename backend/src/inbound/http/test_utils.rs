//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use chrono::Utc;
use serde_json::json;
use tempfile::TempDir;

use crate::domain::ports::{ListingRepository, PasswordHashError, PasswordHasher, UserRepository};
use crate::domain::{
    AccountService, AdminService, DisplayName, Email, FavoritesService, Listing, ListingService,
    Role, User, UserDraft, UserId,
};
use crate::outbound::images::FsImageStore;
use crate::outbound::memory::MemoryStore;

use super::state::{HttpState, HttpStatePorts};

/// Password given to every seeded account.
pub const SEED_PASSWORD: &str = "password123";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Reversible stand-in for Argon2 so handler tests stay fast.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        hash.strip_prefix("plain:")
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordHashError::malformed_hash(hash))
    }
}

/// Real services over the in-memory store, plus handles for seeding.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: web::Data<HttpState>,
    pub images_root: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let images_root = tempfile::tempdir().expect("temporary image root");
        let images = Arc::new(FsImageStore::new(
            images_root.path(),
            "http://localhost/uploads",
        ));
        let accounts = Arc::new(AccountService::new(store.clone(), Arc::new(PlainHasher)));
        let listings = Arc::new(ListingService::new(store.clone(), images.clone()));
        let favorites = Arc::new(FavoritesService::new(store.clone(), store.clone()));
        let admin = Arc::new(AdminService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            images,
        ));
        let state = web::Data::new(HttpState::new(HttpStatePorts {
            login: accounts.clone(),
            profile: accounts.clone(),
            accounts,
            listings: listings.clone(),
            listings_command: listings,
            favorites: favorites.clone(),
            favorites_query: favorites,
            admin: admin.clone(),
            admin_command: admin,
        }));
        Self {
            store,
            state,
            images_root,
        }
    }

    /// Insert an account whose password is [`SEED_PASSWORD`].
    pub async fn seed_user(&self, email: &str, role: Role) -> User {
        let user = User::from(UserDraft {
            id: UserId::random(),
            email: Email::new(email).expect("seed email"),
            name: DisplayName::new("Seeded User").expect("seed name"),
            role,
            password_hash: format!("plain:{SEED_PASSWORD}"),
            email_verified: false,
            last_login: None,
            created_at: Utc::now(),
        });
        UserRepository::insert(self.store.as_ref(), &user)
            .await
            .expect("seed user");
        user
    }

    pub async fn seed_listing(&self, listing: Listing) -> Listing {
        ListingRepository::insert(self.store.as_ref(), &listing)
            .await
            .expect("seed listing");
        listing
    }

    /// An app serving the whole API under `/api/v1`.
    ///
    /// The app owns clones of the state, so it may outlive `self`.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new().app_data(self.state.clone()).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(super::api_routes),
        )
    }
}

/// Log in through the API and return the session cookie.
pub async fn login_cookie<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": SEED_PASSWORD }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed for {email}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
