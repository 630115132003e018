use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::{AppError, ValidationErrors};
use crate::handlers::extract::AppJson;
use crate::handlers::session::Session;
use crate::models::Stylist;
use crate::state::AppState;

// GET /api/dashboard/stylists
pub async fn list_stylists(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<Vec<Stylist>>, AppError> {
    let stylists = {
        let db = state.conn()?;
        queries::list_stylists(&db, &session.salon_id)?
    };
    Ok(Json(stylists))
}

// POST /api/dashboard/stylists
#[derive(Deserialize)]
pub struct CreateStylistRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub specialties: Vec<String>,
}

pub async fn create_stylist(
    State(state): State<Arc<AppState>>,
    session: Session,
    AppJson(body): AppJson<CreateStylistRequest>,
) -> Result<Json<Stylist>, AppError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ValidationErrors::single("name", "name is required").into());
    }

    let stylist = Stylist {
        id: uuid::Uuid::new_v4().to_string(),
        salon_id: session.salon_id,
        name: name.to_string(),
        specialties: body.specialties,
        is_active: true,
        created_at: chrono::Utc::now().naive_utc(),
    };

    {
        let db = state.conn()?;
        queries::create_stylist(&db, &stylist)?;
    }

    tracing::info!(stylist_id = %stylist.id, salon_id = %stylist.salon_id, "stylist created");
    Ok(Json(stylist))
}
