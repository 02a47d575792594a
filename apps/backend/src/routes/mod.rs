use actix_web::web;

pub mod cards;
pub mod games;
pub mod health;
pub mod realtime;

/// Register every application route.
///
/// `main.rs` wraps these with the CORS and tracing middleware; tests mount
/// them directly so endpoint behavior can be exercised without the wrappers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root));

    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Card catalog: /api/cards/**
    cfg.service(web::scope("/api/cards").configure(cards::configure_routes));

    // Game sessions: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));

    // Realtime: /ws
    cfg.service(web::scope("/ws").configure(realtime::configure_routes));
}
