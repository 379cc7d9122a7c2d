//! HTTP Layer - RESTful API
//!
//! 路由、请求解析与错误映射；合成逻辑全部在应用层

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{build_router, HttpServer, ServerConfig};
pub use state::{AppState, ServiceInfo};
