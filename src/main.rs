use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use school_erp::api::create_app;
use school_erp::config::EnvironmentConfig;
use school_erp::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("school_erp=debug,tower_http=info")),
        )
        .init();

    info!("🏫 School ERP - Backend de referencia");
    info!("====================================");

    let config = EnvironmentConfig::from_env();
    if config.is_production() {
        info!("🔒 Modo producción: emisión de tokens deshabilitada");
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::new(config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /api/health - Health check");
    info!("   POST /api/auth/token - Token de desarrollo");
    info!("🚌 Transporte:");
    info!("   CRUD /api/transport/drivers|buses|routes|trips|maintenance|student-transport");
    info!("   PATCH /api/transport/trips/:id/status - Cambiar estado de viaje");
    info!("   GET  /api/transport/student-transport/route/:routeId - Alumnos por ruta");
    info!("👩‍🏫 Profesores:");
    info!("   CRUD /api/teachers");
    info!("🎒 Matrículas:");
    info!("   CRUD /api/register/student (clave formNo, ?search=)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
