use axum::Router;

use crate::state::AppState;

pub mod client;
pub mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::router()
}
