use super::models::{
    BreedingFilter, BreedingSearch, CageOccupancy, ColonySummary, ShowAll, StrainCount,
    StrainOverview, TodoList, TodoLists, YearCount,
};
use super::services;
use crate::animals::models::Animal;
use crate::breedings::models::{Breeding, CrossType};
use crate::common::auth::require_user;
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::state::AppState;
use crate::timed_matings::models::{PlugEvent, for_strain};
use crate::veterinary::services::{VeterinaryOverview, overview};
use crate::{not_found, validation_error};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    let reports = OpenApiRouter::new()
        .routes(routes!(get_summary))
        .routes(routes!(get_todo_lists))
        .routes(routes!(get_todo_list))
        .routes(routes!(get_archive))
        .routes(routes!(get_archive_year))
        .routes(routes!(get_archive_month))
        .routes(routes!(get_strains))
        .routes(routes!(get_strain))
        .routes(routes!(get_strain_crosses))
        .routes(routes!(get_strain_plug_events))
        .routes(routes!(get_cages))
        .routes(routes!(get_cage))
        .routes(routes!(search_breedings))
        .routes(routes!(get_breedings))
        .routes(routes!(get_veterinary))
        .with_state(state.clone());

    require_user(reports, state, "reports")
}

#[utoipa::path(
    get,
    path = "/summary",
    responses((status = 200, description = "Colony totals", body = ColonySummary)),
    tag = "reports"
)]
pub async fn get_summary(State(state): State<AppState>) -> BusinessResult<Json<ColonySummary>> {
    let summary = services::summary(&state.db)
        .await
        .map_err(|err| err.to_business_error("summary"))?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/todo",
    responses((status = 200, description = "Every husbandry list", body = TodoLists)),
    tag = "reports"
)]
pub async fn get_todo_lists(State(state): State<AppState>) -> BusinessResult<Json<TodoLists>> {
    let lists = services::todo_lists(&state.db, &state.config)
        .await
        .map_err(|err| err.to_business_error("todo"))?;
    Ok(Json(lists))
}

/// One husbandry list: `eartag`, `genotype`, `wean`, `no_cage` or `no_rack`
#[utoipa::path(
    get,
    path = "/todo/{list}",
    params(("list" = String, Path, description = "List name")),
    responses(
        (status = 200, description = "Animals on the list", body = Vec<Animal>),
        (status = 404, description = "Unknown list"),
    ),
    tag = "reports"
)]
pub async fn get_todo_list(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Vec<Animal>>> {
    let list = TodoList::from_name(&name).ok_or_else(|| not_found!("todo list", name))?;
    let animals = services::todo(&state.db, &state.config, list)
        .await
        .map_err(|err| err.to_business_error("todo"))?;
    Ok(Json(animals))
}

#[utoipa::path(
    get,
    path = "/archive",
    responses((status = 200, description = "Births per year", body = Vec<YearCount>)),
    tag = "reports"
)]
pub async fn get_archive(State(state): State<AppState>) -> BusinessResult<Json<Vec<YearCount>>> {
    let years = services::birth_archive(&state.db)
        .await
        .map_err(|err| err.to_business_error("archive"))?;
    Ok(Json(years))
}

#[utoipa::path(
    get,
    path = "/archive/{year}",
    params(("year" = i32, Path, description = "Birth year")),
    responses(
        (status = 200, description = "Animals born that year", body = Vec<Animal>),
        (status = 400, description = "Invalid year"),
    ),
    tag = "reports"
)]
pub async fn get_archive_year(
    Path(year): Path<i32>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Vec<Animal>>> {
    let range = services::year_range(year).ok_or_else(|| validation_error!("year", "out of range"))?;
    let animals = services::born_between(&state.db, range)
        .await
        .map_err(|err| err.to_business_error("archive"))?;
    Ok(Json(animals))
}

#[utoipa::path(
    get,
    path = "/archive/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Birth year"),
        ("month" = u32, Path, description = "Birth month, 1 to 12"),
    ),
    responses(
        (status = 200, description = "Animals born that month", body = Vec<Animal>),
        (status = 400, description = "Invalid month"),
    ),
    tag = "reports"
)]
pub async fn get_archive_month(
    Path((year, month)): Path<(i32, u32)>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Vec<Animal>>> {
    let range = services::month_range(year, month)
        .ok_or_else(|| validation_error!("month", "must be between 1 and 12"))?;
    let animals = services::born_between(&state.db, range)
        .await
        .map_err(|err| err.to_business_error("archive"))?;
    Ok(Json(animals))
}

#[utoipa::path(
    get,
    path = "/strains",
    responses((status = 200, description = "Alive animals per strain", body = Vec<StrainCount>)),
    tag = "reports"
)]
pub async fn get_strains(State(state): State<AppState>) -> BusinessResult<Json<Vec<StrainCount>>> {
    let counts = services::strain_counts(&state.db)
        .await
        .map_err(|err| err.to_business_error("strain"))?;
    Ok(Json(counts))
}

#[utoipa::path(
    get,
    path = "/strains/{slug}",
    params(("slug" = String, Path, description = "Strain slug"), ShowAll),
    responses(
        (status = 200, description = "Strain with its breedings, animals and cages", body = StrainOverview),
        (status = 404, description = "Strain not found"),
    ),
    tag = "reports"
)]
pub async fn get_strain(
    Path(slug): Path<String>,
    Query(filter): Query<ShowAll>,
    State(state): State<AppState>,
) -> BusinessResult<Json<StrainOverview>> {
    let overview = services::strain_overview(&state.db, &slug, filter.all)
        .await
        .map_err(|err| err.to_business_error("strain"))?;
    Ok(Json(overview))
}

/// Animals of a strain bred in cages of one cross type
#[utoipa::path(
    get,
    path = "/strains/{slug}/crosses/{cross_type}",
    params(
        ("slug" = String, Path, description = "Strain slug"),
        ("cross_type" = String, Path, description = "Cross name such as Intercross, or its code such as HET vs HET"),
    ),
    responses(
        (status = 200, description = "Progeny of the cross", body = Vec<Animal>),
        (status = 400, description = "Unknown cross type"),
        (status = 404, description = "Strain not found"),
    ),
    tag = "reports"
)]
pub async fn get_strain_crosses(
    Path((slug, cross_type)): Path<(String, String)>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Vec<Animal>>> {
    let cross = CrossType::from_name(&cross_type)
        .ok_or_else(|| validation_error!("cross_type", format!("unknown cross '{cross_type}'")))?;
    let animals = services::cross_progeny(&state.db, &slug, cross)
        .await
        .map_err(|err| err.to_business_error("strain"))?;
    Ok(Json(animals))
}

#[utoipa::path(
    get,
    path = "/strains/{slug}/plug_events",
    params(("slug" = String, Path, description = "Strain slug")),
    responses(
        (status = 200, description = "Plug events of the strain's females", body = Vec<PlugEvent>),
        (status = 404, description = "Strain not found"),
    ),
    tag = "reports"
)]
pub async fn get_strain_plug_events(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Vec<PlugEvent>>> {
    let strain = crate::strains::models::find_by_slug(&state.db, &slug)
        .await
        .map_err(|err| err.to_business_error("strain"))?;
    let events = for_strain(&state.db, strain.id)
        .await
        .map_err(|err| err.to_business_error("plug_event"))?;
    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/cages",
    params(ShowAll),
    responses((status = 200, description = "Occupied cages", body = Vec<CageOccupancy>)),
    tag = "reports"
)]
pub async fn get_cages(
    Query(filter): Query<ShowAll>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Vec<CageOccupancy>>> {
    let cages = services::cages(&state.db, filter.all)
        .await
        .map_err(|err| err.to_business_error("cage"))?;
    Ok(Json(cages))
}

#[utoipa::path(
    get,
    path = "/cages/{cage}",
    params(("cage" = i32, Path, description = "Cage number")),
    responses((status = 200, description = "Animals housed in the cage", body = Vec<Animal>)),
    tag = "reports"
)]
pub async fn get_cage(
    Path(cage): Path<i32>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Vec<Animal>>> {
    let animals = services::cage_animals(&state.db, cage)
        .await
        .map_err(|err| err.to_business_error("cage"))?;
    Ok(Json(animals))
}

#[utoipa::path(
    get,
    path = "/breedings/search",
    params(BreedingSearch),
    responses((status = 200, description = "Breeding cages matching the cage number", body = Vec<Breeding>)),
    tag = "reports"
)]
pub async fn search_breedings(
    Query(search): Query<BreedingSearch>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Vec<Breeding>>> {
    let found = services::search_breedings(&state.db, &search.q)
        .await
        .map_err(|err| err.to_business_error("breeding"))?;
    Ok(Json(found))
}

#[utoipa::path(
    get,
    path = "/breedings",
    params(BreedingFilter),
    responses((status = 200, description = "Breeding cages of one kind", body = Vec<Breeding>)),
    tag = "reports"
)]
pub async fn get_breedings(
    Query(filter): Query<BreedingFilter>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Vec<Breeding>>> {
    let found = services::breedings_of_kind(&state.db, filter.kind)
        .await
        .map_err(|err| err.to_business_error("breeding"))?;
    Ok(Json(found))
}

#[utoipa::path(
    get,
    path = "/veterinary",
    responses((status = 200, description = "Medical issues, conditions and treatments", body = VeterinaryOverview)),
    tag = "reports"
)]
pub async fn get_veterinary(State(state): State<AppState>) -> BusinessResult<Json<VeterinaryOverview>> {
    let report = overview(&state.db)
        .await
        .map_err(|err| err.to_business_error("veterinary"))?;
    Ok(Json(report))
}
