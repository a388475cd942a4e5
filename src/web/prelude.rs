pub(crate) use super::AppState;
pub(crate) use super::middleware::AuthUser;
pub(crate) use crate::db::entities::{favorites, recipes};
pub(crate) use crate::error::AppError;
pub(crate) use axum::Json;
pub(crate) use axum::extract::{Path, State};
pub(crate) use axum::http::StatusCode;
pub(crate) use axum::response::IntoResponse;
pub(crate) use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use tracing::{debug, info};
