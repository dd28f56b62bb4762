use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use quotegate_market_data::TickerInfo;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{info_or_na, or_na, CompanyProfile, Envelope, Officer},
};

/// Get detailed company information.
#[utoipa::path(
    get,
    path = "/api/company_info/{symbol}",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses(
        (status = 200, description = "Company profile"),
        (status = 400, description = "Provider failure")
    )
)]
pub(crate) async fn get_company_info(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<CompanyProfile>>> {
    let info = state.provider.get_info(&symbol).await?;
    Ok(Json(Envelope::success(build_company_profile(symbol, &info))))
}

pub(crate) fn build_company_profile(symbol: String, info: &TickerInfo) -> CompanyProfile {
    CompanyProfile {
        symbol,
        name: info_or_na(info, "longName"),
        industry: info_or_na(info, "industry"),
        sector: info_or_na(info, "sector"),
        business_summary: info_or_na(info, "longBusinessSummary"),
        website: info_or_na(info, "website"),
        market_cap: info_or_na(info, "marketCap"),
        employees: info_or_na(info, "fullTimeEmployees"),
        country: info_or_na(info, "country"),
        city: info_or_na(info, "city"),
        officers: officers(info),
    }
}

/// Present only when the provider lists at least one officer.
fn officers(info: &TickerInfo) -> Option<Vec<Officer>> {
    let listed = info.get("companyOfficers")?.as_array()?;
    if listed.is_empty() {
        return None;
    }
    Some(
        listed
            .iter()
            .map(|officer| Officer {
                name: or_na(officer.get("name")),
                title: or_na(officer.get("title")),
                year_born: or_na(officer.get("yearBorn")),
            })
            .collect(),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/company_info/{symbol}", get(get_company_info))
}
