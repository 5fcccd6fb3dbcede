//! Application bootstrap: storage selection, module registration, and the
//! init → migrate → start → serve → stop lifecycle.

use std::sync::Arc;

use anyhow::Context;
use booktracker_db::Database;
use booktracker_kernel::settings::{Settings, StorageBackend};
use booktracker_kernel::{InitCtx, ModuleRegistry};

use crate::modules::{
    self,
    books::{BookRepository, BookService, InMemoryBookRepository, SqliteBookRepository},
};

/// Wired application ready to migrate and serve.
pub struct App {
    pub settings: Settings,
    pub registry: ModuleRegistry,
    books: Arc<dyn BookRepository>,
    database: Option<Database>,
}

impl App {
    /// Open storage for the configured backend and register every module.
    pub fn build(settings: Settings) -> anyhow::Result<Self> {
        let (repository, database) = open_book_repository(&settings)?;

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, Arc::clone(&repository));

        Ok(Self {
            settings,
            registry,
            books: repository,
            database,
        })
    }

    /// Service over the same storage the HTTP routes use.
    pub fn book_service(&self) -> BookService {
        BookService::new(Arc::clone(&self.books))
    }

    /// Apply pending module migrations; a no-op for the memory backend.
    pub fn migrate(&self) -> anyhow::Result<usize> {
        let Some(database) = &self.database else {
            tracing::info!("memory backend selected, skipping migrations");
            return Ok(0);
        };

        let migrations = self.registry.collect_migrations();
        let applied = database
            .apply_migrations(&migrations)
            .context("failed to apply migrations")?;
        tracing::info!(applied, total = migrations.len(), "migrations complete");
        Ok(applied)
    }

    /// Run the full lifecycle until the HTTP server shuts down.
    pub async fn run(self) -> anyhow::Result<()> {
        self.migrate()?;

        let ctx = InitCtx {
            settings: &self.settings,
        };
        self.registry.init_all(&ctx).await?;
        self.registry.start_all(&ctx).await?;

        let served = booktracker_http::start_server(&self.registry, &self.settings).await;

        self.registry.stop_all().await?;
        served
    }
}

/// Build the book repository for the configured backend.
///
/// For SQLite the returned [`Database`] handle is shared with the repository
/// so migrations run on the same connection.
fn open_book_repository(
    settings: &Settings,
) -> anyhow::Result<(Arc<dyn BookRepository>, Option<Database>)> {
    match settings.database.backend {
        StorageBackend::Sqlite => {
            let database = Database::open(&settings.database)?;
            let repository = SqliteBookRepository::new(database.clone());
            Ok((Arc::new(repository), Some(database)))
        }
        StorageBackend::Memory => Ok((Arc::new(InMemoryBookRepository::new()), None)),
    }
}
