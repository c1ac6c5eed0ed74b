//! Catalog page routes

use axum::{
    Form, Router,
    extract::{Query, State},
    response::{Html, Redirect},
    routing::get,
};
use serde::Deserialize;
use storefront_core::{Catalog, FilterState, ProductDraft};
use tracing::debug;

use crate::error::ApiError;
use crate::pages;
use crate::state::AppState;

use super::extract::{PageRole, SessionCredentials};

const LOAD_FAILED_NOTICE: &str = "Products could not be loaded.";

/// Query string of the catalog page
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: String,
    /// Open the editor for this product
    pub edit: Option<String>,
    /// Open the editor with an empty template
    pub add: Option<String>,
}

impl CatalogQuery {
    fn filters(&self) -> FilterState {
        FilterState {
            name: self.name.clone(),
            category: self.category.clone(),
            price: self.price.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Add,
    Edit,
    Delete,
}

/// Form posted by the editor and the delete buttons
#[derive(Debug, Deserialize)]
pub struct CatalogForm {
    pub intent: Intent,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub detail: String,
}

impl CatalogForm {
    fn draft(self) -> ProductDraft {
        ProductDraft {
            id: Some(self.id).filter(|id| !id.is_empty()),
            product_name: self.product_name,
            price: self.price,
            category: self.category,
            detail: self.detail,
        }
    }
}

/// GET /
async fn catalog_page(
    State(state): State<AppState>,
    PageRole(role): PageRole,
    Query(query): Query<CatalogQuery>,
) -> Result<Html<String>, ApiError> {
    let mut catalog = Catalog::new(state.products.clone(), role);

    // Failures are logged by the catalog; the page still renders
    let notice = catalog.load().await.err().map(|_| LOAD_FAILED_NOTICE);
    catalog.apply_filters(query.filters());

    let draft = match (&query.add, &query.edit) {
        (Some(_), _) => Some(catalog.draft_for_add()?),
        (None, Some(id)) => Some(catalog.draft_for_edit(id)?),
        (None, None) => None,
    };

    Ok(Html(pages::catalog_page(&catalog, draft.as_ref(), notice)))
}

/// POST / (admin only)
async fn catalog_action(
    State(state): State<AppState>,
    PageRole(role): PageRole,
    SessionCredentials(credentials): SessionCredentials,
    Form(form): Form<CatalogForm>,
) -> Result<Redirect, ApiError> {
    let mut catalog = Catalog::new(state.products.clone(), role);

    debug!("Catalog action {:?} as {}", form.intent, role);

    match form.intent {
        Intent::Delete => {
            if form.id.is_empty() {
                return Err(ApiError::BadRequest("Missing product id".to_string()));
            }
            catalog.delete(&form.id, &credentials).await?;
        }
        Intent::Add => {
            let draft = ProductDraft {
                id: None,
                ..form.draft()
            };
            catalog.save(&draft, &credentials).await?;
        }
        Intent::Edit => {
            if form.id.is_empty() {
                return Err(ApiError::BadRequest("Missing product id".to_string()));
            }
            catalog.save(&form.draft(), &credentials).await?;
        }
    }

    Ok(Redirect::to("/"))
}

/// Create catalog routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(catalog_page).post(catalog_action))
}
