//! Catalog browsing endpoints

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{Category, Product, ProductVariant, Tag, Vendor};

use crate::db::repository::{RepoError, lookup, product, variant};
use crate::state::AppState;

/// Product as served by the API, with images decoded from their stored JSON
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub vendor_id: Option<i64>,
    pub category_id: Option<i64>,
    pub external_id: i64,
    pub is_published: bool,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        let images = serde_json::from_str(&p.images).unwrap_or_default();
        Self {
            id: p.id,
            title: p.title,
            slug: p.slug,
            description: p.description,
            images,
            vendor_id: p.vendor_id,
            category_id: p.category_id,
            external_id: p.external_id,
            is_published: p.is_published,
            updated_at: p.updated_at,
        }
    }
}

fn repo_err(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
        other => AppError::database(other.to_string()),
    }
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ProductResponse>>>> {
    let products = product::find_all(state.pool()).await.map_err(repo_err)?;
    let body = products.into_iter().map(ProductResponse::from).collect();
    Ok(Json(ApiResponse::success(body)))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductResponse>>> {
    let found = product::find_by_id(state.pool(), id)
        .await
        .map_err(repo_err)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(ApiResponse::success(found.into())))
}

/// GET /api/products/{id}/variants
pub async fn list_variants(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<ProductVariant>>>> {
    if product::find_by_id(state.pool(), id)
        .await
        .map_err(repo_err)?
        .is_none()
    {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }
    let variants = variant::find_by_product(state.pool(), id)
        .await
        .map_err(repo_err)?;
    Ok(Json(ApiResponse::success(variants)))
}

/// GET /api/vendors
pub async fn list_vendors(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Vendor>>>> {
    let vendors = lookup::find_all_vendors(state.pool())
        .await
        .map_err(repo_err)?;
    Ok(Json(ApiResponse::success(vendors)))
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = lookup::find_all_categories(state.pool())
        .await
        .map_err(repo_err)?;
    Ok(Json(ApiResponse::success(categories)))
}

/// GET /api/tags
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Tag>>>> {
    let tags = lookup::find_all_tags(state.pool()).await.map_err(repo_err)?;
    Ok(Json(ApiResponse::success(tags)))
}
