use actix_web::{App, HttpServer, web};
use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_jetan::prelude::*;
use lib_jetan::rest_server;

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize program options and environment.
    dotenvy::dotenv().ok();
    let options = RestServerOptions::parse();
    let _logger = Logger::try_with_env_or_str(options.log_level.clone().unwrap_or("info".into()).as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(
            match cfg!(debug_assertions) {
                true => AdaptiveFormat::WithThread,
                _    => AdaptiveFormat::Default
            })
        .set_palette("b196;208;195;111;67".to_owned())
        .start()?;

    // Serve the versioned Jetan API.
    let service = web::Data::new(GameService::new());
    log::info!("serving jetan on {}:{}", options.bind, options.port);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(rest_server::json_config())
            .app_data(rest_server::query_config())
            .configure(rest_server::configure)
            .default_service(web::route().to(rest_server::not_found))
    })
    .bind((options.bind.as_str(), options.port))?
    .run()
    .await?;

    Ok(())
}
