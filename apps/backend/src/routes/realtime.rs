use actix_web::web;

use crate::ws::session::upgrade;

/// GET /ws?player_id=... upgrades to the game websocket.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(upgrade));
}
