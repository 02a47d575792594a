use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{ConnectionStatus, Snapshot};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;
use crate::services::game_flow::GameFlowService;
use crate::state::app_state::AppState;
use crate::ws::hub::WsRegistry;
use crate::ws::protocol::{ClientMsg, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub enum HubEvent {
    GameState { snapshot: Snapshot },
}

#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub player_id: String,
}

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<ConnectQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let player_id = query.into_inner().player_id.trim().to_string();
    if player_id.is_empty() {
        return Err(AppError::bad_request(
            ErrorCode::BadRequest,
            "player_id must not be empty".to_string(),
        )
        .into());
    }

    let session = WsSession::new(
        Uuid::new_v4(),
        player_id,
        app_state.flow.clone(),
        app_state.registry.clone(),
    );
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    player_id: String,
    flow: Arc<GameFlowService>,
    registry: Arc<WsRegistry>,

    /// Sessions this connection has acted on; marked disconnected on close.
    sessions: HashSet<String>,

    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,

    hello_done: bool,
}

impl WsSession {
    fn new(
        conn_id: Uuid,
        player_id: String,
        flow: Arc<GameFlowService>,
        registry: Arc<WsRegistry>,
    ) -> Self {
        Self {
            conn_id,
            player_id,
            flow,
            registry,
            sessions: HashSet::new(),
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
            hello_done: false,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, code: ErrorCode, message: impl Into<String>) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code,
                message: message.into(),
            },
        );
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_error(ctx, code, message);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    player_id = %actor.player_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    /// Remember `session_id` and flag the player as connected there.
    fn track(&mut self, session_id: &str) {
        if self.sessions.insert(session_id.to_string()) {
            self.report_presence(session_id, ConnectionStatus::Connected);
        }
    }

    fn report_presence(&self, session_id: &str, status: ConnectionStatus) {
        if let Err(err) = self.flow.set_connection(session_id, &self.player_id, status) {
            debug!(
                conn_id = %self.conn_id,
                player_id = %self.player_id,
                session_id,
                ?status,
                error = %err,
                "[WS SESSION] presence not recorded"
            );
        }
    }

    /// Run one game operation for this player.
    ///
    /// Mutations reach the caller through the hub push like every other
    /// member; only reads and creation are answered directly. Every session
    /// the player acts on successfully is tracked for presence.
    fn dispatch(&mut self, cmd: ClientMsg) -> Result<Option<ServerMsg>, DomainError> {
        let flow = Arc::clone(&self.flow);
        let me = self.player_id.as_str();
        match cmd {
            ClientMsg::Hello { .. } => Ok(None),
            ClientMsg::CreateGame { name } => {
                let created = flow.create_session(me, &name)?;
                self.track(&created.session_id);
                Ok(Some(ServerMsg::GameCreated {
                    session_id: created.session_id,
                    snapshot: created.snapshot,
                }))
            }
            ClientMsg::JoinGame { session_id, name } => {
                flow.join_session(&session_id, me, &name)?;
                Ok(None)
            }
            ClientMsg::GetSnapshot { session_id } => {
                let snapshot = flow.get_snapshot(&session_id, me)?;
                Ok(Some(ServerMsg::GameState { snapshot }))
            }
            ClientMsg::Attack {
                session_id,
                attacker_id,
                target_id,
            } => flow
                .attack(&session_id, me, &attacker_id, &target_id)
                .map(|_| None),
            ClientMsg::ApplyBonus {
                session_id,
                bonus_card_id,
                target_id,
            } => flow
                .apply_bonus(&session_id, me, &bonus_card_id, &target_id)
                .map(|_| None),
            ClientMsg::EndTurn { session_id } => flow.end_turn(&session_id, me).map(|_| None),
            ClientMsg::SelectCharacter {
                session_id,
                character_id,
            } => flow
                .select_character(&session_id, me, &character_id)
                .map(|_| None),
            ClientMsg::Forfeit { session_id } => flow.forfeit(&session_id, me).map(|_| None),
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            player_id = %self.player_id,
            "[WS SESSION] started"
        );

        let addr = ctx.address();
        self.registry.register_connection(
            &self.player_id,
            self.conn_id,
            addr.clone().recipient::<HubEvent>(),
            addr.recipient::<Shutdown>(),
        );

        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.registry.unregister_connection(self.conn_id);
        if !self.registry.is_connected(&self.player_id) {
            for session_id in &self.sessions {
                self.report_presence(session_id, ConnectionStatus::Disconnected);
            }
        }
        info!(
            conn_id = %self.conn_id,
            player_id = %self.player_id,
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(cmd) = parsed else {
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Malformed JSON");
                    return;
                };

                if let ClientMsg::Hello { protocol } = cmd {
                    if protocol != PROTOCOL_VERSION {
                        self.send_error_and_close(
                            ctx,
                            ErrorCode::BadRequest,
                            "Unsupported protocol version",
                        );
                        return;
                    }
                    self.hello_done = true;
                    Self::send_json(
                        ctx,
                        &ServerMsg::HelloAck {
                            protocol: PROTOCOL_VERSION,
                            player_id: self.player_id.clone(),
                        },
                    );
                    return;
                }

                if !self.hello_done {
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Must send hello first");
                    return;
                }

                let session_id = cmd.session_id().map(str::to_string);
                match self.dispatch(cmd) {
                    Ok(reply) => {
                        if let Some(session_id) = &session_id {
                            self.track(session_id);
                        }
                        if let Some(reply) = reply {
                            Self::send_json(ctx, &reply);
                        }
                    }
                    Err(err) => {
                        debug!(
                            conn_id = %self.conn_id,
                            player_id = %self.player_id,
                            session_id = session_id.as_deref().unwrap_or(""),
                            error = %err,
                            "[WS SESSION] operation rejected"
                        );
                        let app_err = AppError::from(err);
                        Self::send_error(ctx, app_err.code(), app_err.to_string());
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    player_id = %self.player_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<HubEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: HubEvent, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            HubEvent::GameState { snapshot } => {
                Self::send_json(ctx, &ServerMsg::GameState { snapshot });
            }
        }
    }
}

impl Handler<Shutdown> for WsSession {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        self.registry.unregister_connection(self.conn_id);

        if let Some(handle) = self.heartbeat_handle.take() {
            ctx.cancel_future(handle);
        }

        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Away)));
        ctx.stop();
    }
}
