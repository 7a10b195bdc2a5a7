//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use portal_auth::identity::{DomainPolicy, IdentityVerifier, JwtIdentityVerifier};
use portal_auth::role::{PatternRoleClassifier, RoleClassifier};
use portal_auth::session::{SessionManager, SessionStore};
use portal_core::config::AppConfig;
use portal_core::result::AppResult;
use portal_core::traits::StorageProvider;
use portal_database::Store;
use portal_service::{
    AuthService, CatalogService, NotificationService, ProgressService, UploadService,
};
use portal_storage::{LocalStorageProvider, UploadReceiver};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Repositories
    pub store: Store,
    /// Where uploaded videos live
    pub storage: Arc<dyn StorageProvider>,
    /// Live portal sessions
    pub sessions: Arc<SessionStore>,

    // ── Services ─────────────────────────────────────────────
    /// Sign-in, sign-out, profile
    pub auth_service: Arc<AuthService>,
    /// Video uploads
    pub upload_service: Arc<UploadService>,
    /// Browse, search, publish
    pub catalog_service: Arc<CatalogService>,
    /// Playback progress
    pub progress_service: Arc<ProgressService>,
    /// Announcements
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    /// Wire every service from configuration and an opened store.
    pub fn new(config: AppConfig, store: Store) -> AppResult<Self> {
        let verifier: Arc<dyn IdentityVerifier> =
            Arc::new(JwtIdentityVerifier::new(&config.auth.identity)?);
        Self::with_verifier(config, store, verifier)
    }

    /// Like [`AppState::new`] but with a caller-supplied identity verifier.
    pub fn with_verifier(
        config: AppConfig,
        store: Store,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> AppResult<Self> {
        let classifier: Arc<dyn RoleClassifier> =
            Arc::new(PatternRoleClassifier::new(&config.auth.roles)?);
        let sessions = Arc::new(SessionStore::new());
        let session_manager = Arc::new(SessionManager::new(&config.auth, Arc::clone(&sessions)));

        let auth_service = Arc::new(AuthService::new(
            verifier,
            classifier,
            DomainPolicy::new(&config.auth.allowed_domain),
            Arc::clone(&store.users),
            session_manager,
        ));

        let storage: Arc<dyn StorageProvider> =
            Arc::new(LocalStorageProvider::new(&config.storage.video_dir));
        let receiver = Arc::new(UploadReceiver::new(
            Arc::clone(&storage),
            config.storage.max_upload_size_bytes,
            &config.storage.public_prefix,
        ));
        let upload_service = Arc::new(UploadService::new(receiver));

        let catalog_service = Arc::new(CatalogService::new(Arc::clone(&store.videos)));
        let progress_service = Arc::new(ProgressService::new(
            Arc::clone(&store.progress),
            Arc::clone(&store.videos),
        ));
        let notification_service =
            Arc::new(NotificationService::new(Arc::clone(&store.notifications)));

        Ok(Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            store,
            storage,
            sessions,
            auth_service,
            upload_service,
            catalog_service,
            progress_service,
            notification_service,
        })
    }
}
