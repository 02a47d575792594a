use std::net::TcpListener;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use duel_backend::middleware::request_trace::RequestTrace;
use duel_backend::middleware::structured_logger::StructuredLogger;
use duel_backend::middleware::trace_span::TraceSpan;
use duel_backend::routes;
use duel_backend::state::AppState;
use duel_backend::ws::hub::WsRegistry;

pub type TestServer = (
    actix_web::dev::ServerHandle,
    std::net::SocketAddr,
    tokio::task::JoinHandle<Result<(), std::io::Error>>,
);

/// Start a real HTTP server with the full route table on a random port so
/// tests can connect with tokio-tungstenite.
pub async fn start_test_server(state: AppState) -> Result<TestServer, Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let state_data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state_data.clone())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .configure(routes::configure)
    })
    .workers(1)
    .disable_signals()
    .listen(listener)?
    .run();

    let server_handle = server.handle();
    let join = tokio::spawn(server);

    Ok((server_handle, addr, join))
}

pub fn ws_url(addr: std::net::SocketAddr, player_id: &str) -> String {
    format!("ws://{addr}/ws?player_id={player_id}")
}

pub async fn wait_for_connections(
    registry: &WsRegistry,
    expected: usize,
    timeout: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = tokio::time::Instant::now();
    loop {
        if registry.connection_count() == expected {
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(format!(
                "timeout waiting for connection_count == {expected} (got {})",
                registry.connection_count()
            )
            .into());
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
