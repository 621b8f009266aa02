use agri_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Ambiente (dotenv, logging)
    setup_environment()?;

    print_banner();

    tracing::info!("AgriConecta server starting...");

    // 2. Configuração
    let config = Config::from_env();

    // 3. Estado (base de dados, migrações, serviços)
    let state = ServerState::initialize(&config).await;

    // 4. Servidor HTTP
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
