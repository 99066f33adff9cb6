//! # Docs 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정된 저장소 백엔드(SQLite 또는 MongoDB) 연결
//! 4. 빈 저장소에 시작 문서 넣기
//! 5. API 라우터 + 미들웨어 설정
//! 6. HTTP 서버 시작, 종료 시그널을 받으면 저장소 연결 정리

// ── 모듈 선언 ──
// `mod config;`는 같은 디렉토리의 `config.rs`(또는 `config/mod.rs`)를 모듈로 가져옵니다.
mod config;
mod db;
mod error;
mod models;
mod routes;

use std::path::Path;

// anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
// Context: 에러에 "어느 단계에서 실패했는지" 설명을 덧붙이는 확장 트레이트
use anyhow::{Context, Result};
use axum::Router;
use config::Config;
use routes::AppState;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// #[tokio::main]: 비동기 런타임을 만들고 그 안에서 main을 실행하는 어트리뷰트 매크로
#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .ok()는 Result를 Option으로 바꿔, .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 docsapp, tower_http, axum을 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docsapp=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    // `?`: Err이면 즉시 main에서 반환합니다. .context()로 붙인 설명이 에러 메시지 앞에 붙습니다.
    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!("Starting docs server on {}:{}", config.host, config.port);

    // ── 4단계: 저장소 연결 ──
    // 프로세스 전체에서 하나의 저장소 핸들(Arc<dyn DocumentStore>)을 공유하고, 종료할 때 닫습니다.
    let store = db::connect(&config.storage)
        .await
        .context("failed to open document store")?;

    // ── 5단계: 시드 문서 ──
    // 저장소가 비어 있을 때만 넣으므로 재시작해도 중복되지 않습니다.
    // .as_ref(): Arc<dyn DocumentStore> → &dyn DocumentStore
    if config.seed {
        db::seed_if_empty(store.as_ref())
            .await
            .context("failed to seed document store")?;
    }

    // ── 6단계: 앱 상태와 라우터 ──
    // store.clone()은 Arc의 참조 카운트만 늘립니다. 종료 시 close()를 부르기 위해 원본을 남겨 둡니다.
    let state = AppState::new(store.clone());

    // 개발 환경 기준으로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = routes::router(state);

    // 빌드된 프론트엔드가 있으면 같은 서버에서 서빙합니다.
    // SPA이므로 찾을 수 없는 경로는 index.html로 돌려보냅니다.
    let app = match config.static_dir.as_deref() {
        Some(dir) if Path::new(dir).exists() => {
            tracing::info!("Serving frontend static files from {}", dir);
            let serve_dir =
                ServeDir::new(dir).not_found_service(ServeFile::new(Path::new(dir).join("index.html")));
            Router::new().merge(api).fallback_service(serve_dir)
        }
        Some(dir) => {
            tracing::warn!("Static directory {} not found, serving API only", dir);
            api
        }
        None => api,
    }
    .layer(cors)
    .layer(TraceLayer::new_for_http());

    // ── 7단계: 서버 시작 ──
    // with_graceful_shutdown(): 시그널을 받으면 새 연결을 받지 않고 진행 중인 요청을 마친 뒤 반환합니다.
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // ── 8단계: 저장소 정리 ──
    tracing::info!("Closing {} document store", store.backend_name());
    store.close().await;

    Ok(())
}

/// Ctrl+C 또는 SIGTERM을 기다립니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    // tokio::select!: 두 Future 중 먼저 끝나는 쪽을 기다립니다.
    tokio::select! {
        _ = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::warn!("Received SIGTERM, shutting down..."),
    }
}
