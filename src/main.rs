use std::process;
use std::sync::Arc;

use filato::{
    application::{
        catalogue::CatalogueReadService,
        content::ContentService,
        enquiries::{DesignEnquiryService, EnquiryService},
        error::AppError,
        media::MediaPurge,
        notify::{LogNotifier, Notifier},
        repos::{
            CatalogueRepo, ClothingTypesRepo, DesignEnquiriesRepo, DesignTemplatesRepo,
            EnquiriesRepo, FabricsRepo, FactoryPhotosRepo, ReviewsRepo, SettingsRepo,
        },
        reviews::ReviewService,
    },
    cache::{CacheConfig, CacheTrigger, ContentCache},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        media::MediaStorage,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    init_repositories(&settings).await?;
    info!(target = "filato::migrate", "migrations applied");
    Ok(())
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    let cache = Arc::new(ContentCache::new(&CacheConfig::from(&settings.cache)));
    let trigger = Arc::new(CacheTrigger::new(cache.clone()));

    let media = Arc::new(
        MediaStorage::new(&settings.media).map_err(|err| AppError::from(InfraError::Io(err)))?,
    );
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    let clothing_types: Arc<dyn ClothingTypesRepo> = repositories.clone();
    let fabrics: Arc<dyn FabricsRepo> = repositories.clone();
    let catalogue: Arc<dyn CatalogueRepo> = repositories.clone();
    let factory_photos: Arc<dyn FactoryPhotosRepo> = repositories.clone();
    let design_templates: Arc<dyn DesignTemplatesRepo> = repositories.clone();
    let reviews_repo: Arc<dyn ReviewsRepo> = repositories.clone();
    let settings_repo: Arc<dyn SettingsRepo> = repositories.clone();
    let enquiries_repo: Arc<dyn EnquiriesRepo> = repositories.clone();
    let design_enquiries_repo: Arc<dyn DesignEnquiriesRepo> = repositories.clone();
    let media_purge: Arc<dyn MediaPurge> = media.clone();

    let reads = Arc::new(CatalogueReadService::new(
        clothing_types.clone(),
        catalogue.clone(),
        fabrics.clone(),
        factory_photos.clone(),
        cache.clone(),
    ));
    let content = Arc::new(ContentService::new(settings_repo.clone(), cache.clone()));
    let reviews = Arc::new(ReviewService::new(reviews_repo.clone(), cache.clone()));
    let enquiries = Arc::new(EnquiryService::new(
        enquiries_repo,
        clothing_types.clone(),
        fabrics.clone(),
        notifier.clone(),
    ));
    let design_enquiries = Arc::new(DesignEnquiryService::new(
        design_enquiries_repo,
        fabrics.clone(),
        media_purge,
        notifier,
    ));

    let state = ApiState {
        clothing_types,
        fabrics,
        catalogue,
        factory_photos,
        design_templates,
        reviews_repo,
        settings_repo,
        reads,
        content,
        reviews,
        enquiries,
        design_enquiries,
        media,
        trigger,
        health: repositories.clone(),
    };

    let router = http::build_api_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "filato::serve",
        addr = %settings.server.addr,
        "listening"
    );

    let drain_window = settings.server.graceful_shutdown;
    let shutdown_started = Arc::new(tokio::sync::Notify::new());
    let notify = shutdown_started.clone();
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_signal().await;
            notify.notify_one();
        },
    );
    let hard_stop = async {
        shutdown_started.notified().await;
        tokio::time::sleep(drain_window).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = hard_stop => {
            info!(target = "filato::serve", "graceful shutdown window elapsed; closing remaining connections");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!(target = "filato::serve", "shutdown signal received");
}
