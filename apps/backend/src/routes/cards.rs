//! Read-only card catalog routes.

use std::sync::Arc;

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{CardDefinition, CardKind};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

const DEFAULT_RANDOM_COUNT: usize = 5;

#[derive(Debug, Serialize)]
struct CardList<'a> {
    count: usize,
    cards: &'a [Arc<CardDefinition>],
}

#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    pub kind: String,
    pub count: Option<usize>,
}

fn parse_kind(raw: &str) -> Result<CardKind, AppError> {
    raw.parse()
        .map_err(|detail| AppError::bad_request(ErrorCode::BadRequest, detail))
}

/// GET /api/cards/{kind}
async fn list_cards(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let kind = parse_kind(&path)?;
    let cards = app_state.catalog.get_all(kind);
    Ok(HttpResponse::Ok().json(CardList {
        count: cards.len(),
        cards,
    }))
}

/// GET /api/cards/{kind}/{card_id}
async fn get_card(
    path: web::Path<(String, String)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (kind, card_id) = path.into_inner();
    let kind = parse_kind(&kind)?;
    let card = app_state
        .catalog
        .get_by_id(kind, &card_id)
        .ok_or_else(|| DomainError::card_not_found(format!("{kind:?} card {card_id}")))?;
    Ok(HttpResponse::Ok().json(card))
}

/// GET /api/cards/random?kind=...&count=...
///
/// Distinct cards, at most the whole collection.
async fn random_cards(
    query: web::Query<RandomQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let kind = parse_kind(&query.kind)?;
    let available = app_state.catalog.get_all(kind).len();
    let count = query.count.unwrap_or(DEFAULT_RANDOM_COUNT).min(available);

    let cards = app_state.catalog.sample(
        kind,
        count,
        &Default::default(),
        &mut rand::rng(),
    )?;
    Ok(HttpResponse::Ok().json(CardList {
        count: cards.len(),
        cards: &cards,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/random").route(web::get().to(random_cards)));
    cfg.service(web::resource("/{kind}").route(web::get().to(list_cards)));
    cfg.service(web::resource("/{kind}/{card_id}").route(web::get().to(get_card)));
}
