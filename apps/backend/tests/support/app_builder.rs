use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use duel_backend::middleware::request_trace::RequestTrace;
use duel_backend::middleware::structured_logger::StructuredLogger;
use duel_backend::middleware::trace_span::TraceSpan;
use duel_backend::routes;
use duel_backend::state::{build_state, AppState};

use crate::common::uniform_catalog;

/// State over the uniform catalog with a fixed seed.
pub fn build_test_state() -> AppState {
    build_state()
        .with_catalog(uniform_catalog())
        .with_seed(7)
        .build()
        .expect("test state builds")
}

/// The production route table behind the tracing middleware (no CORS).
pub async fn create_test_app(
    state: AppState,
) -> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}
