use std::{process, sync::Arc};

use foglio::{
    application::{
        admin::posts::AdminPostService, error::AppError, feed::FeedService,
        repos::PostsRepo, session::SessionService, uploads::ImageUploadService,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState},
        telemetry,
        uploads::UploadStorage,
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
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let database_url = settings.database.url.as_deref().ok_or_else(|| {
        AppError::from(InfraError::configuration(
            "database.url is required (set FOGLIO_DATABASE__URL or --database-url)",
        ))
    })?;

    let pool =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;
    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    let posts_repo: Arc<dyn PostsRepo> = Arc::new(PostgresRepositories::new(pool));

    let upload_storage = Arc::new(
        UploadStorage::new(settings.uploads.directory.clone()).map_err(InfraError::from)?,
    );

    let feed = Arc::new(FeedService::new(posts_repo.clone(), settings.site.clone()));
    let sessions = Arc::new(SessionService::new(
        settings.admin.username.clone(),
        &settings.admin.password,
        settings.admin.session_ttl,
    ));
    let uploads = Arc::new(ImageUploadService::new(
        upload_storage.clone(),
        &settings.site.public_url,
    ));
    let admin_posts = Arc::new(AdminPostService::new(posts_repo.clone()));

    let http_state = HttpState {
        feed,
        posts: posts_repo,
        upload_storage,
        site: settings.site.clone(),
    };
    let admin_state = AdminState {
        posts: admin_posts,
        sessions,
        uploads,
        site: settings.site.clone(),
    };

    let upload_body_limit = settings.uploads.max_request_bytes.get() as usize;
    let router = http::build_router(http_state, admin_state, upload_body_limit);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "foglio::startup",
        addr = %settings.server.addr,
        "listening"
    );

    http::serve_until_shutdown(
        listener,
        router,
        shutdown_signal(),
        settings.server.graceful_shutdown,
    )
    .await
    .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}
