use crate::auth::{AuthProvider, SessionSync};
use crate::config::DashboardConfig;
use crate::dashboard::DashboardStats;
use crate::framework::memory::MemoryService;
use crate::framework::rest::RestService;
use crate::framework::{DataService, RemoteError};
use crate::preferences::{ColorScheme, ThemePreference};
use crate::stores::{LocationStore, ProductStore, SessionStore, SupplierStore, UserStore};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Failed to start data service: {0}")]
    Service(#[from] RemoteError),
    #[error("Data service still in use at shutdown")]
    ServiceInUse,
}

/// The runtime orchestrator for the admin dashboard.
///
/// `AdminSystem` is responsible for:
/// - **Backend Selection**: the hosted REST service when configured, in-memory table actors otherwise
/// - **Dependency Wiring**: every store shares one data service; the session follows the auth provider
/// - **Lifecycle Management**: stopping the session sync and table actors on shutdown
///
/// # Example
///
/// ```ignore
/// let system = AdminSystem::start(&config, auth, ColorScheme::Light).await?;
///
/// system.refresh_all().await;
/// let created = system.products.create(draft).await;
///
/// system.shutdown().await?;
/// ```
pub struct AdminSystem {
    pub products: ProductStore,
    pub suppliers: SupplierStore,
    pub locations: LocationStore,
    pub users: UserStore,
    pub session: SessionStore,
    pub theme: ThemePreference,

    service: Arc<dyn DataService>,
    /// Present when running on the in-memory backend, so its actors can be joined.
    memory: Option<Arc<MemoryService>>,
    sync: SessionSync,
    low_stock_threshold: u32,
}

impl AdminSystem {
    /// Builds the backend described by `config` and wires every store to it.
    pub async fn start(
        config: &DashboardConfig,
        auth: Arc<dyn AuthProvider>,
        os: ColorScheme,
    ) -> Result<Self, SystemError> {
        let (service, memory) = match &config.api {
            Some(api) => {
                info!(url = %api.url, "Using hosted data service");
                let rest: Arc<dyn DataService> =
                    Arc::new(RestService::new(api.url.clone(), api.api_key.clone())?);
                (rest, None)
            }
            None => {
                info!("Using in-memory data service");
                let memory = Arc::new(MemoryService::inventory(config.channel_buffer));
                let shared: Arc<dyn DataService> = memory.clone();
                (shared, Some(memory))
            }
        };

        let theme = ThemePreference::load(&config.prefs_path, os);
        let mut system = Self::wire(service, auth, config.low_stock_threshold, theme).await;
        system.memory = memory;
        Ok(system)
    }

    /// Wires the stores to an already running `service`.
    pub async fn with_service(
        service: Arc<dyn DataService>,
        auth: Arc<dyn AuthProvider>,
        config: &DashboardConfig,
        os: ColorScheme,
    ) -> Self {
        let theme = ThemePreference::load(&config.prefs_path, os);
        Self::wire(service, auth, config.low_stock_threshold, theme).await
    }

    async fn wire(
        service: Arc<dyn DataService>,
        auth: Arc<dyn AuthProvider>,
        low_stock_threshold: u32,
        theme: ThemePreference,
    ) -> Self {
        let session = SessionStore::new();
        let sync = SessionSync::start(session.clone(), auth).await;
        Self {
            products: ProductStore::new(service.clone()),
            suppliers: SupplierStore::new(service.clone()),
            locations: LocationStore::new(service.clone()),
            users: UserStore::new(service.clone()),
            session,
            theme,
            service,
            memory: None,
            sync,
            low_stock_threshold,
        }
    }

    pub fn service(&self) -> Arc<dyn DataService> {
        self.service.clone()
    }

    /// Fetches every table concurrently. Failures land in each store's `error`.
    pub async fn refresh_all(&self) {
        tokio::join!(
            self.products.fetch_all(),
            self.suppliers.fetch_all(),
            self.locations.fetch_all(),
            self.users.fetch_all(),
        );
    }

    pub async fn stats(&self) -> Result<DashboardStats, RemoteError> {
        DashboardStats::load(self.service.clone(), self.low_stock_threshold).await
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Stops the session sync, drops the stores, then waits for the in-memory table actors
    /// (if any) to drain. Fails with [`SystemError::ServiceInUse`] while store clones are
    /// still alive elsewhere.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        let Self {
            products,
            suppliers,
            locations,
            users,
            service,
            memory,
            sync,
            ..
        } = self;

        sync.shutdown().await;

        drop((products, suppliers, locations, users, service));

        if let Some(memory) = memory {
            match Arc::try_unwrap(memory) {
                Ok(memory) => memory.shutdown().await,
                Err(_) => {
                    error!("Data service still referenced, actors left running");
                    return Err(SystemError::ServiceInUse);
                }
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
