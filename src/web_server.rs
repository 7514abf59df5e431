use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, dev::Server, middleware, web};

use crate::config::ServerConfig;
use crate::engine::Executor;
use crate::routes::{get_health_handler, json_error_handler, post_execute_handler};

pub fn build_server(config: ServerConfig, executor: Arc<Executor>) -> std::io::Result<Server> {
    let allowed_origins = config.allowed_origins();
    let executor = web::Data::from(executor);

    let bind_address = config.bind_address.unwrap_or("127.0.0.1".to_string());
    let bind_port = config.bind_port.unwrap_or(8080);

    let server = HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allow_any_header();
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .app_data(executor.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .service(
                web::scope("/api")
                    .service(post_execute_handler)
                    .service(get_health_handler),
            )
    })
    .bind((bind_address.clone(), bind_port))?
    .run();

    log::info!("server listening on {bind_address}:{bind_port}");

    Ok(server)
}
