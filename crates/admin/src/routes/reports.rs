//! Stock report handler.

use axum::{Json, Router, extract::State, routing::get};

use crate::db::catalog::{self, StockReportRow};
use crate::error::Result;
use crate::state::AppState;

use super::DataBody;

/// Build the reports router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/reports/stock", get(stock))
}

/// Per-product stock with lifetime supplied and sold totals.
///
/// A product whose `stockOnHand` disagrees with
/// `totalSupplied - totalSold` has movements that predate the ledgers
/// or a reversed supply that had already been sold on.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn stock(State(state): State<AppState>) -> Result<Json<DataBody<Vec<StockReportRow>>>> {
    let rows = catalog::stock_report(state.pool()).await?;
    Ok(Json(DataBody::new(rows)))
}
