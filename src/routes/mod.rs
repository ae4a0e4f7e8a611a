mod health;
mod ico;
mod mail;
mod ranking;
mod swagger;
use health::health_checker_handler;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    database,
    external::{External, HttpMailer},
    resolver::{IcoResolver, PriceStore, Sources, SpotPriceSource},
    scheduler::Scheduler,
    seed, AppState, Config,
};

use anyhow::Context;
use axum::{http::HeaderValue, http::Method, routing::get, Router};
use std::sync::Arc;

/// Wires the database, upstream clients, resolver and background recorder into the router
pub async fn make_app(config: Config) -> anyhow::Result<Router> {
    info!("Connecting to PostgreSQL...");
    let sqlx_db_connection = database::connect_sqlx(&config.db_url)
        .await
        .context("Could not connect to the database")?;
    info!("Connected to PostgreSQL!");

    let db = Arc::new(database::PostgreDatabase::new(sqlx_db_connection));
    db.migrate().await.context("Could not run migrations")?;

    let external = Arc::new(External::new(&config)?);
    let mailer = Arc::new(HttpMailer::new(
        crate::external::http_client(config.http_timeout)?,
        config.mail.clone(),
    ));
    let seeds = seed::load(config.seed_path.as_deref()).await?;

    let sources = Sources {
        tickers: external.clone(),
        history: external.clone(),
        spot: external.clone(),
        store: db.clone(),
        mailer,
    };
    let resolver = IcoResolver::new(seeds, sources, config.spot_cache_ttl);

    let store: Arc<dyn PriceStore> = db.clone();
    let spot: Arc<dyn SpotPriceSource> = external;
    let scheduler = Scheduler::new(store, spot, config.spot_record_interval);
    tokio::spawn(async move {
        scheduler.spawn_tasks().await;
    });

    let state = Arc::new(AppState {
        db,
        config,
        resolver,
    });
    build_router(state)
}

pub fn build_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let cors = match &state.config.cors_origin {
        Some(origin) => CorsLayer::new().allow_origin(
            HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS origin {origin}"))?,
        ),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods([Method::GET, Method::POST])
    .allow_headers(Any);

    let ret = Router::new()
        .route("/api", get(health_checker_handler))
        .route("/api/health", get(health_checker_handler))
        .nest("/api/icos", ico::ico_routes())
        .route("/api/search", get(ico::search_icos_handler))
        .route("/api/compare", get(ico::compare_icos_handler))
        .nest("/api/rankings", ranking::ranking_routes())
        .nest("/api/mail", mail::mail_routes())
        .merge(swagger::build_documentation())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        external::tests::test_config,
        models::{dto::RankingResponse, Asset, NormalizedIco},
        resolver::testing::{seed, ticker, Fakes},
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use crate::models::IcoSeed;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(fakes: &Fakes) -> Router {
        app_with(
            fakes,
            vec![
                seed("status", "status", "06/20/2017", true),
                seed("neo", "neo", "09/01/2016", false),
                seed("augur", "augur", "08/17/2015", true),
            ],
        )
    }

    /// Nothing listens on port 1, so every database call fails fast
    fn app_with(fakes: &Fakes, seeds: Vec<IcoSeed>) -> Router {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://localhost:1/icostats_test")
            .unwrap();
        let state = Arc::new(AppState {
            db: Arc::new(database::PostgreDatabase::new(pool)),
            config: test_config("http://127.0.0.1:9"),
            resolver: fakes.resolver(seeds),
        });
        build_router(state).unwrap()
    }

    fn market() -> Fakes {
        Fakes::default()
            .with_ticker("status", ticker(0.5))
            .with_ticker("neo", ticker(40.0))
            .with_ticker("augur", ticker(0.9))
            .with_history(350.0)
            .with_spot(Asset::Eth, 300.0)
            .with_spot(Asset::Btc, 6000.0)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_list_icos() {
        let (status, body) = get(app(&market()), "/api/icos").await;
        assert_eq!(status, StatusCode::OK);

        let icos: Vec<NormalizedIco> = serde_json::from_slice(&body).unwrap();
        assert_eq!(icos.len(), 3);
        assert_eq!(icos[0].id, "status");
        assert_eq!(icos[0].eth_price_at_launch, Some(350.0));
        assert_eq!(icos[1].eth_price, Some(300.0));
    }

    #[tokio::test]
    async fn test_list_icos_fails_when_a_ticker_fails() {
        let fakes = Fakes::default()
            .with_ticker("status", ticker(0.5))
            .with_spot(Asset::Eth, 300.0)
            .with_spot(Asset::Btc, 6000.0);
        let (status, _) = get(app(&fakes), "/api/icos").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_list_icos_fails_when_launch_price_lookup_fails() {
        let fakes = Fakes::default()
            .with_ticker("status", ticker(0.5))
            .with_ticker("neo", ticker(40.0))
            .with_ticker("augur", ticker(0.9))
            .with_spot(Asset::Eth, 300.0)
            .with_spot(Asset::Btc, 6000.0);
        let (status, body) = get(app(&fakes), "/api/icos").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["message"].as_str().unwrap().contains("ETH price at launch"));
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_database() {
        let (status, body) = get(app(&market()), "/api/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Database unreachable");
    }

    #[tokio::test]
    async fn test_single_ico() {
        let (status, body) = get(app(&market()), "/api/icos/neo").await;
        assert_eq!(status, StatusCode::OK);

        let ico: NormalizedIco = serde_json::from_slice(&body).unwrap();
        assert_eq!(ico.price_usd, Some(40.0));
        assert_eq!(ico.eth_price, None);
    }

    #[tokio::test]
    async fn test_unknown_ico_is_not_found() {
        let (status, _) = get(app(&market()), "/api/icos/nothing-here").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ranking_applies_default_filter_and_sort() {
        let (status, body) = get(app(&market()), "/api/rankings/roi-since-ico").await;
        assert_eq!(status, StatusCode::OK);

        let ranking: RankingResponse = serde_json::from_slice(&body).unwrap();
        let ids: Vec<&str> = ranking.icos.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ranking.title, "ROI Since ICO");
        assert_eq!(ranking.sort_by, "roi_since_ico");
        assert_eq!(ids, vec!["augur", "status"]);
    }

    #[tokio::test]
    async fn test_ranking_with_overrides() {
        let (status, body) = get(
            app(&market()),
            "/api/rankings/roi-since-ico?erc20=false&ascending=true&sort_by=roi_since_ico",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let ranking: RankingResponse = serde_json::from_slice(&body).unwrap();
        let ids: Vec<&str> = ranking.icos.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["status", "augur", "neo"]);
    }

    #[tokio::test]
    async fn test_ranking_rejects_unknown_currency() {
        let (status, _) = get(app(&market()), "/api/rankings/vs-eth?currency=EUR").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search() {
        let (status, body) = get(app(&market()), "/api/search?q=AU").await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["result"], "augur");
        assert_eq!(json["id"], "augur");
    }

    #[tokio::test]
    async fn test_search_result_feeds_compare() {
        let fakes = market().with_ticker("basic-attention-token", ticker(0.25));
        let mut bat = seed("basic-attention-token", "basic-attention-token", "05/31/2017", true);
        bat.name = "Basic Attention Token".to_string();
        let seeds = vec![seed("status", "status", "06/20/2017", true), bat];

        let (status, body) = get(app_with(&fakes, seeds.clone()), "/api/search?q=basic").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["result"], "basic attention token");
        let id = json["id"].as_str().unwrap().to_string();

        let (status, body) = get(app_with(&fakes, seeds), &format!("/api/compare?ids={id}")).await;
        assert_eq!(status, StatusCode::OK);
        let icos: Vec<NormalizedIco> = serde_json::from_slice(&body).unwrap();
        assert_eq!(icos.len(), 1);
        assert_eq!(icos[0].name, "Basic Attention Token");
        assert_eq!(icos[0].price_usd, Some(0.25));
    }

    #[tokio::test]
    async fn test_ticker_named_search_is_an_ico_lookup() {
        let fakes = market().with_ticker("search", ticker(1.5));
        let (status, body) = get(app(&fakes), "/api/icos/search").await;
        assert_eq!(status, StatusCode::OK);

        let ico: NormalizedIco = serde_json::from_slice(&body).unwrap();
        assert_eq!(ico.id, "search");
        assert_eq!(ico.price_usd, Some(1.5));
    }

    #[tokio::test]
    async fn test_compare_keeps_requested_order() {
        let (status, body) = get(app(&market()), "/api/compare?ids=neo,,status,unknown").await;
        assert_eq!(status, StatusCode::OK);

        let icos: Vec<NormalizedIco> = serde_json::from_slice(&body).unwrap();
        let ids: Vec<&str> = icos.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["neo", "status"]);
    }

    #[tokio::test]
    async fn test_send_mail() {
        let fakes = market();
        let request = Request::builder()
            .method("POST")
            .uri("/api/mail")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"name": "Ada", "email": "ada@example.com", "message": "hello"}"#,
            ))
            .unwrap();

        let response = app(&fakes).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "success");
        assert_eq!(fakes.mailer.sent.lock().unwrap().len(), 1);
    }
}
