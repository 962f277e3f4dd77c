//! Fitment catalog upsert handler.
//!
//! One endpoint covers the four fitment tables. The request body is
//! discriminated by `kind`, and an `id` in the body switches the
//! operation from insert to update. The match below is exhaustive, so
//! adding a kind without handling it fails the build.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use piyesa_core::{BrandId, ModelYearId, VariantId, VehicleModelId};

use crate::db::catalog::{self, Brand, ModelYear, Variant, VehicleModel};
use crate::error::{AppError, Result};
use crate::params;
use crate::state::AppState;

use super::DataBody;

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/catalog", post(upsert))
}

/// Catalog upsert request, discriminated by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CatalogRequest {
    Brand {
        id: Option<i32>,
        name: String,
    },
    Year {
        id: Option<i32>,
        value: i32,
    },
    #[serde(rename_all = "camelCase")]
    Model {
        id: Option<i32>,
        brand_id: i32,
        name: String,
    },
    #[serde(rename_all = "camelCase")]
    Variant {
        id: Option<i32>,
        model_id: i32,
        name: String,
    },
}

/// The created or updated row, serialized in its natural shape.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CatalogEntity {
    Brand(Brand),
    Year(ModelYear),
    Model(VehicleModel),
    Variant(Variant),
}

/// Insert or update one fitment row.
///
/// # Errors
///
/// Returns `AppError::Validation` for bad input, `AppError::NotFound`
/// for an update against an unknown id, `AppError::Conflict` for a
/// duplicate natural key or unknown parent.
pub async fn upsert(
    State(state): State<AppState>,
    Json(body): Json<CatalogRequest>,
) -> Result<Json<DataBody<CatalogEntity>>> {
    let pool = state.pool();

    let entity = match body {
        CatalogRequest::Brand { id, name } => {
            let name = params::non_empty(&name, "name")?;
            let brand = match id {
                Some(raw) => {
                    let id: BrandId = params::body_id(raw, "id")?;
                    catalog::update_brand(pool, id, &name).await?
                }
                None => catalog::create_brand(pool, &name).await?,
            };
            CatalogEntity::Brand(brand)
        }
        CatalogRequest::Year { id, value } => {
            // Mirrors the CHECK on model_years, so bad years are a 400
            // instead of a surfaced database error.
            if value < 1900 {
                return Err(AppError::Validation("Invalid value".to_owned()));
            }
            let year = match id {
                Some(raw) => {
                    let id: ModelYearId = params::body_id(raw, "id")?;
                    catalog::update_model_year(pool, id, value).await?
                }
                None => catalog::create_model_year(pool, value).await?,
            };
            CatalogEntity::Year(year)
        }
        CatalogRequest::Model { id, brand_id, name } => {
            let brand_id: BrandId = params::body_id(brand_id, "brandId")?;
            let name = params::non_empty(&name, "name")?;
            let model = match id {
                Some(raw) => {
                    let id: VehicleModelId = params::body_id(raw, "id")?;
                    catalog::update_vehicle_model(pool, id, brand_id, &name).await?
                }
                None => catalog::create_vehicle_model(pool, brand_id, &name).await?,
            };
            CatalogEntity::Model(model)
        }
        CatalogRequest::Variant { id, model_id, name } => {
            let model_id: VehicleModelId = params::body_id(model_id, "modelId")?;
            let name = params::non_empty(&name, "name")?;
            let variant = match id {
                Some(raw) => {
                    let id: VariantId = params::body_id(raw, "id")?;
                    catalog::update_variant(pool, id, model_id, &name).await?
                }
                None => catalog::create_variant(pool, model_id, &name).await?,
            };
            CatalogEntity::Variant(variant)
        }
    };

    Ok(Json(DataBody::new(entity)))
}
