use std::sync::Arc;

use clap::Parser;

use compilex::config::CliArgs;
use compilex::engine::Executor;
use compilex::web_server::build_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = CliArgs::parse();
    let config = cli.to_config().expect("Failed to load configuration");
    let workspace_root = config.workspace_root();

    let executor =
        Arc::new(Executor::new(&workspace_root).expect("Failed to initialize execution engine"));

    log::info!("supported languages: {}", executor.languages().join(", "));
    log::info!("staging workspaces under {}", workspace_root.display());

    // ======= PREPARATION END, EXECUTION START =======

    let server = build_server(config.server, executor).expect("Failed to build server");
    let server_handle = server.handle();
    let server_task = actix_web::rt::spawn(server);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("Ctrl-c received, shutting down...");
        }
        res_server = server_task => {
            log::error!("Server terminated unexpectedly: {:?}", res_server);
        }
    }

    server_handle.stop(true).await;
    log::info!("Shutdown complete");
    Ok(())
}
