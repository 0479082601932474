//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

#[cfg(feature = "metrics")]
pub(crate) use metrics::build_prometheus;
#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use gameswap::Trace;
#[cfg(debug_assertions)]
use gameswap::doc::ApiDoc;
use gameswap::inbound::http::health::{HealthState, live, ready};
use gameswap::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(gameswap::inbound::http::configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        bind_addr,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Full application wiring tests.

    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use rstest::rstest;
    use std::net::SocketAddr;

    async fn app(
        is_ready: bool,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    > {
        let health = web::Data::new(HealthState::new());
        if is_ready {
            health.mark_ready();
        }
        let config = ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)));
        test::init_service(build_app(health, build_http_state(&config))).await
    }

    #[rstest]
    #[case::ready("/health/ready", true, StatusCode::OK)]
    #[case::not_ready("/health/ready", false, StatusCode::SERVICE_UNAVAILABLE)]
    #[case::live("/health/live", false, StatusCode::OK)]
    #[actix_web::test]
    async fn health_probes_are_mounted(
        #[case] uri: &str,
        #[case] is_ready: bool,
        #[case] expected: StatusCode,
    ) {
        let app = app(is_ready).await;

        let res = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(res.status(), expected);
    }

    #[actix_web::test]
    async fn api_routes_carry_trace_ids() {
        let app = app(true).await;

        let res =
            test::call_service(&app, TestRequest::get().uri("/offers/42").to_request()).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(res.headers().contains_key("trace-id"));
    }
}
