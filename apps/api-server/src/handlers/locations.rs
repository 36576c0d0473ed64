//! Location handlers.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::Location;
use blogicum_shared::dto::LocationResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn location_response(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
    }
}

/// GET /api/locations
pub async fn list_locations(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let locations = state.locations.list_published().await?;

    Ok(HttpResponse::Ok().json(
        locations
            .into_iter()
            .map(location_response)
            .collect::<Vec<_>>(),
    ))
}
