use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use dotenvy::dotenv;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// 声明子模块
mod config;
mod error;
mod models;
mod handlers;
mod services;


use config::Config;
use models::field_set::RecordFields;
use models::invoice::invoice_fields;

// 定义全局状态：数据库连接池、配置、发票字段配置（启动时构建一次，只读）
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub fields: RecordFields,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // 配置跨域 (CORS) - 开发阶段允许所有，生产环境需收紧
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // 发票列表 / 表单提交
        .route("/facturas", get(handlers::list_handler::list_invoices)
            .post(handlers::submit_handler::submit_invoice))
        // 发票编辑表单
        .route("/facturas/form", get(handlers::form_handler::invoice_form))
        // 字段清单生成
        .route("/facturas/campos", get(handlers::form_handler::field_list))

        // 中间件：日志记录和跨域
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // 1. 初始化日志系统
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. 加载 .env 环境变量
    dotenv().ok();
    let config = Config::load().expect("Invalid configuration in environment / .env file");

    // 3. 构建发票字段配置，字段名与分隔符冲突在这里直接报错
    let fields = invoice_fields(config.separator).expect("Invalid invoice field configuration");
    tracing::info!(
        "发票字段: {} 个, 忽略 {} 个, 可编辑 {} 个",
        fields.master().len(),
        fields.ignored().len(),
        fields.data_fields().len()
    );

    // 4. 初始化数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to create database connection pool");

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let shared_state = Arc::new(AppState { db: pool, config, fields });

    // 5. 构建路由
    let app = build_router(shared_state);

    // 6. 启动服务
    tracing::info!("🚀 Server started at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    tracing::info!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        tracing::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
