//! Product catalog
//!
//! Holds the product list fetched from the product API and the filtered
//! view of it. Mutations are reserved to the admin role and always end with
//! a full refetch; nothing is updated optimistically.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storefront_auth::Role;
use storefront_client::{Credentials, Product, ProductApi, ProductPayload};
use tracing::{debug, error, info};

use crate::error::CoreError;

/// Filter inputs of the catalog page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Name substring, case-insensitive
    #[serde(default)]
    pub name: String,
    /// Category substring, case-insensitive
    #[serde(default)]
    pub category: String,
    /// Maximum price as typed; empty means no limit
    #[serde(default)]
    pub price: String,
}

/// A single filter input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Name,
    Category,
    Price,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.category.is_empty() && self.price.trim().is_empty()
    }

    pub fn set(&mut self, field: FilterField, value: &str) {
        let slot = match field {
            FilterField::Name => &mut self.name,
            FilterField::Category => &mut self.category,
            FilterField::Price => &mut self.price,
        };
        *slot = value.to_string();
    }

    /// Whether a product passes every active filter.
    ///
    /// A maximum price that is not a number matches nothing.
    pub fn matches(&self, product: &Product) -> bool {
        let name = self.name.to_lowercase();
        let category = self.category.to_lowercase();

        let price_ok = match self.price.trim() {
            "" => true,
            max => max
                .parse::<f64>()
                .map(|max| product.price <= max)
                .unwrap_or(false),
        };

        product.product_name.to_lowercase().contains(&name)
            && product.category.to_lowercase().contains(&category)
            && price_ok
    }
}

/// Products passing `filters`, in list order
pub fn filter_products(products: &[Product], filters: &FilterState) -> Vec<Product> {
    products
        .iter()
        .filter(|p| filters.matches(p))
        .cloned()
        .collect()
}

/// Coerce a typed price to a number; anything non-numeric becomes 0
pub fn coerce_price(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
}

/// Editor contents for adding or editing a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// `None` when adding a new product
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub product_name: String,
    /// Price as typed
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub detail: String,
}

impl ProductDraft {
    /// Empty template for a new product
    pub fn empty() -> Self {
        Self {
            price: "0".to_string(),
            ..Default::default()
        }
    }

    pub fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            product_name: product.product_name.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
            detail: product.detail.clone(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.as_deref().is_none_or(str::is_empty)
    }

    /// Request body for the product API
    pub fn to_payload(&self) -> ProductPayload {
        ProductPayload {
            id: self.id.clone().unwrap_or_default(),
            product_name: self.product_name.clone(),
            name: self.product_name.clone(),
            price: coerce_price(&self.price),
            category: self.category.clone(),
            detail: self.detail.clone(),
        }
    }
}

/// Catalog view for one role
pub struct Catalog {
    api: Arc<dyn ProductApi>,
    role: Role,
    products: Vec<Product>,
    filters: FilterState,
    filtered: Vec<Product>,
}

impl Catalog {
    pub fn new(api: Arc<dyn ProductApi>, role: Role) -> Self {
        Self {
            api,
            role,
            products: Vec::new(),
            filters: FilterState::default(),
            filtered: Vec::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the create/edit/delete affordances are available
    pub fn can_edit(&self) -> bool {
        self.role.is_admin()
    }

    /// Full product list
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products passing the current filters
    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Fetch the full product list. On failure the current list is kept.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        match self.api.list_products().await {
            Ok(products) => {
                debug!("Loaded {} products", products.len());
                self.products = products;
                self.recompute();
                Ok(())
            }
            Err(e) => {
                error!("Error fetching products: {}", e);
                Err(e.into())
            }
        }
    }

    /// Replace all filters and recompute the view
    pub fn apply_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.recompute();
    }

    /// Change one filter input and recompute the view
    pub fn set_filter(&mut self, field: FilterField, value: &str) {
        self.filters.set(field, value);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered = filter_products(&self.products, &self.filters);
    }

    fn require_admin(&self) -> Result<(), CoreError> {
        if self.can_edit() { Ok(()) } else { Err(CoreError::Forbidden) }
    }

    /// Editor template for a new product
    pub fn draft_for_add(&self) -> Result<ProductDraft, CoreError> {
        self.require_admin()?;
        Ok(ProductDraft::empty())
    }

    /// Editor populated from an existing product
    pub fn draft_for_edit(&self, id: &str) -> Result<ProductDraft, CoreError> {
        self.require_admin()?;
        self.products
            .iter()
            .find(|p| p.id == id)
            .map(ProductDraft::from_product)
            .ok_or_else(|| CoreError::NotFound(format!("Product {}", id)))
    }

    /// Delete a product, then refetch
    pub async fn delete(&mut self, id: &str, credentials: &Credentials) -> Result<(), CoreError> {
        self.require_admin()?;

        if let Err(e) = self.api.delete_product(id, credentials).await {
            error!("Error deleting product: {}", e);
            return Err(e.into());
        }

        info!("Deleted product {}", id);
        self.refetch().await;
        Ok(())
    }

    /// Create or update a product from the editor, then refetch
    pub async fn save(&mut self, draft: &ProductDraft, credentials: &Credentials) -> Result<(), CoreError> {
        self.require_admin()?;

        let payload = draft.to_payload();
        let result = match draft.id.as_deref().filter(|id| !id.is_empty()) {
            None => self.api.create_product(&payload, credentials).await,
            Some(id) => self.api.update_product(id, &payload, credentials).await,
        };

        if let Err(e) = result {
            error!("Error saving product: {}", e);
            return Err(e.into());
        }

        info!("Saved product {}", payload.name);
        self.refetch().await;
        Ok(())
    }

    /// Reload after a mutation that already went through. A failed reload
    /// leaves the previous list in place and does not fail the mutation.
    async fn refetch(&mut self) {
        if let Err(e) = self.load().await {
            error!("Product list is stale after a successful change: {}", e);
        }
    }
}
