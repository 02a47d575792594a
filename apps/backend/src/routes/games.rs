//! Game session HTTP routes.
//!
//! Every mutating route answers with the caller's own snapshot; the other
//! member receives theirs over the websocket push.

use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::{require_non_blank, Validate, ValidatedJson};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SeatRequest {
    pub player_id: String,
    pub name: String,
}

impl Validate for SeatRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("player_id", &self.player_id)?;
        require_non_blank("name", &self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayerRequest {
    pub player_id: String,
}

impl Validate for PlayerRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("player_id", &self.player_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct AttackRequest {
    pub player_id: String,
    pub attacker_id: String,
    pub target_id: String,
}

impl Validate for AttackRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("player_id", &self.player_id)?;
        require_non_blank("attacker_id", &self.attacker_id)?;
        require_non_blank("target_id", &self.target_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct BonusRequest {
    pub player_id: String,
    pub bonus_card_id: String,
    pub target_id: String,
}

impl Validate for BonusRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("player_id", &self.player_id)?;
        require_non_blank("bonus_card_id", &self.bonus_card_id)?;
        require_non_blank("target_id", &self.target_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub player_id: String,
    pub character_id: String,
}

impl Validate for SelectRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("player_id", &self.player_id)?;
        require_non_blank("character_id", &self.character_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayerQuery {
    pub player_id: String,
}

/// POST /api/games
async fn create_game(
    body: ValidatedJson<SeatRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let created = app_state.flow.create_session(&req.player_id, &req.name)?;
    Ok(HttpResponse::Created().json(created))
}

/// POST /api/games/{session_id}/join
///
/// Joining a session the caller already sits in returns the current view.
async fn join_game(
    path: web::Path<String>,
    body: ValidatedJson<SeatRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let req = body.into_inner();
    let snapshot = app_state
        .flow
        .join_session(&session_id, &req.player_id, &req.name)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// GET /api/games/{session_id}?player_id=...
async fn get_snapshot(
    path: web::Path<String>,
    query: web::Query<PlayerQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = app_state
        .flow
        .get_snapshot(&path.into_inner(), &query.player_id)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

async fn attack(
    path: web::Path<String>,
    body: ValidatedJson<AttackRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let snapshot = app_state.flow.attack(
        &path.into_inner(),
        &req.player_id,
        &req.attacker_id,
        &req.target_id,
    )?;
    Ok(HttpResponse::Ok().json(snapshot))
}

async fn apply_bonus(
    path: web::Path<String>,
    body: ValidatedJson<BonusRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let snapshot = app_state.flow.apply_bonus(
        &path.into_inner(),
        &req.player_id,
        &req.bonus_card_id,
        &req.target_id,
    )?;
    Ok(HttpResponse::Ok().json(snapshot))
}

async fn end_turn(
    path: web::Path<String>,
    body: ValidatedJson<PlayerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = app_state
        .flow
        .end_turn(&path.into_inner(), &body.player_id)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

async fn select_character(
    path: web::Path<String>,
    body: ValidatedJson<SelectRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let snapshot =
        app_state
            .flow
            .select_character(&path.into_inner(), &req.player_id, &req.character_id)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

async fn forfeit(
    path: web::Path<String>,
    body: ValidatedJson<PlayerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = app_state
        .flow
        .forfeit(&path.into_inner(), &body.player_id)?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// DELETE /api/games/{session_id}?player_id=...
///
/// Members only. A game still in play is conceded by the caller first.
async fn delete_game(
    path: web::Path<String>,
    query: web::Query<PlayerQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    app_state
        .flow
        .delete_session(&path.into_inner(), &query.player_id)?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_game)));
    cfg.service(
        web::resource("/{session_id}")
            .route(web::get().to(get_snapshot))
            .route(web::delete().to(delete_game)),
    );
    cfg.service(web::resource("/{session_id}/join").route(web::post().to(join_game)));
    cfg.service(web::resource("/{session_id}/attack").route(web::post().to(attack)));
    cfg.service(web::resource("/{session_id}/bonus").route(web::post().to(apply_bonus)));
    cfg.service(web::resource("/{session_id}/end-turn").route(web::post().to(end_turn)));
    cfg.service(web::resource("/{session_id}/select").route(web::post().to(select_character)));
    cfg.service(web::resource("/{session_id}/forfeit").route(web::post().to(forfeit)));
}
