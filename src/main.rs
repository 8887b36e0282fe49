use actix_web::{App, HttpServer, middleware, web};

use deckgen::config::AppConfig;
use deckgen::pipeline::DeckPipeline;
use deckgen::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    // Initialize database
    db::ensure_database_dir(&config.database_url)?;
    let pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to apply database schema");

    if config.gemini_api_key.is_none() {
        log::warn!("GEMINI_API_KEY is not set, outlines will use the fallback content");
    }
    let pipeline = web::Data::new(
        DeckPipeline::from_config(&config).expect("Failed to build HTTP client"),
    );

    let bind_addr = config.bind_addr.clone();
    let static_dir = config.static_dir.clone();
    log::info!("Starting server at http://{bind_addr} (model {})", pipeline.model());

    HttpServer::new(move || {
        let app = App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(pipeline.clone())
            .configure(handlers::configure);

        // UI assets when a build is present, otherwise the service banner
        match &static_dir {
            Some(dir) => app.service(actix_files::Files::new("/", dir).index_file("index.html")),
            None => app.route("/", web::get().to(handlers::meta_handlers::root)),
        }
    })
    .bind(bind_addr)?
    .run()
    .await
}
