//! Product table, form and detail route handlers.
//!
//! Mutations follow post/redirect/get: on success the browser is sent back to
//! `/products`, which re-fetches the whole list. On failure the page is
//! rendered from the list fetched before the mutation, with an error banner.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use duka_core::{Price, Product, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{AdminCatalogClient, CatalogError, ProductApi};
use crate::error::{AppError, Result};
use crate::models::{editing_target, set_editing_target};
use crate::services::ProductsManager;
use crate::state::AppState;

/// Product row view for templates.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: String,
}

/// Add/edit modal contents.
#[derive(Debug, Clone, Default)]
pub struct ProductFormView {
    /// Set when the form edits an existing product.
    pub editing_id: Option<String>,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub image_url: String,
    pub description: String,
    pub price: String,
}

impl ProductFormView {
    fn heading(&self) -> &'static str {
        if self.editing_id.is_some() {
            "Edit product"
        } else {
            "Add product"
        }
    }
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            name: product.name.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            price: product.price.to_string(),
        }
    }
}

impl From<&Product> for ProductFormView {
    fn from(product: &Product) -> Self {
        Self {
            editing_id: product.id.as_ref().map(ToString::to_string),
            name: product.name.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            image_url: product.image_url.clone(),
            description: product.description.clone(),
            price: product.price.amount().normalize().to_string(),
        }
    }
}

/// Submitted add/edit form.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
}

impl ProductForm {
    /// Trim every field and parse the price.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the price is not a non-negative number.
    pub fn to_product(&self) -> Result<Product> {
        let price = self
            .price
            .trim()
            .parse::<Price>()
            .map_err(|e| AppError::BadRequest(format!("price: {e}")))?;

        Ok(Product {
            id: None,
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            brand: self.brand.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
        })
    }

    fn to_view(&self, editing_id: Option<&ProductId>) -> ProductFormView {
        ProductFormView {
            editing_id: editing_id.map(ToString::to_string),
            name: self.name.clone(),
            category: self.category.clone(),
            brand: self.brand.clone(),
            image_url: self.image_url.clone(),
            description: self.description.clone(),
            price: self.price.clone(),
        }
    }
}

/// Detail view query.
#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub id: Option<String>,
}

/// Products table page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductRowView>,
    /// `Some` when the add/edit modal is open.
    pub form: Option<ProductFormView>,
    pub error: Option<String>,
}

/// Product detail page template.
#[derive(Template)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Option<ProductDetailView>,
    pub error: Option<String>,
}

/// Product detail display data.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub image_url: String,
    pub description: String,
    pub price: String,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            image_url: product.image_url.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
        }
    }
}

fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    let body = template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    });
    (status, Html(body)).into_response()
}

fn render_index(
    status: StatusCode,
    manager: &ProductsManager<'_, AdminCatalogClient>,
    form: Option<ProductFormView>,
    error: Option<String>,
) -> Response {
    let template = ProductsIndexTemplate {
        products: manager.products().iter().map(ProductRowView::from).collect(),
        form,
        error,
    };
    render(status, &template)
}

fn failure_status(error: &CatalogError) -> StatusCode {
    if matches!(error, CatalogError::NotFound(_)) {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_GATEWAY
    }
}

/// Load the list for the page, logging instead of failing.
async fn load_for_page(manager: &mut ProductsManager<'_, AdminCatalogClient>) -> Option<String> {
    match manager.load_products().await {
        Ok(()) => None,
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            Some("Failed to fetch products".to_string())
        }
    }
}

/// Products table, with the modal open when an edit is in progress.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Response {
    let mut manager =
        ProductsManager::new(state.catalog()).with_editing(editing_target(&session).await);
    let error = load_for_page(&mut manager).await;

    let form = manager.editing_product().map(ProductFormView::from);
    if manager.editing().is_some() && form.is_none() && error.is_none() {
        // The target vanished from the backend; drop it.
        manager.close_edit();
        if let Err(e) = set_editing_target(&session, None).await {
            tracing::warn!(error = %e, "Failed to clear stale edit target");
        }
    }

    render_index(StatusCode::OK, &manager, form, error)
}

/// Open a blank add form.
#[instrument(skip(state, session))]
pub async fn new(State(state): State<AppState>, session: Session) -> Result<Response> {
    set_editing_target(&session, None).await?;

    let mut manager = ProductsManager::new(state.catalog());
    let error = load_for_page(&mut manager).await;

    Ok(render_index(
        StatusCode::OK,
        &manager,
        Some(ProductFormView::default()),
        error,
    ))
}

/// Open the edit form for product `id`.
#[instrument(skip(state, session))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let mut manager = ProductsManager::new(state.catalog());
    manager.load_products().await?;
    manager.open_edit(ProductId::new(id.clone()));

    let Some(product) = manager.editing_product() else {
        return Err(AppError::NotFound(format!("product {id}")));
    };
    let form = ProductFormView::from(product);
    set_editing_target(&session, manager.editing()).await?;

    Ok(render_index(StatusCode::OK, &manager, Some(form), None))
}

/// Save the add/edit form.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let mut manager =
        ProductsManager::new(state.catalog()).with_editing(editing_target(&session).await);

    let product = match form.to_product() {
        Ok(product) => product,
        Err(e) => {
            load_for_page(&mut manager).await;
            let view = form.to_view(manager.editing());
            return Ok(render_index(
                StatusCode::BAD_REQUEST,
                &manager,
                Some(view),
                Some(e.to_string()),
            ));
        }
    };

    // The list as the user last saw it, shown again if the save fails.
    load_for_page(&mut manager).await;

    match manager.submit(&product).await {
        Ok(()) => {
            set_editing_target(&session, None).await?;
            Ok(Redirect::to("/products").into_response())
        }
        Err(e) => {
            tracing::error!("Failed to save product: {e}");
            let view = form.to_view(manager.editing());
            Ok(render_index(
                failure_status(&e),
                &manager,
                Some(view),
                Some("Failed to save product".to_string()),
            ))
        }
    }
}

/// Close the modal without saving.
#[instrument(skip(session))]
pub async fn close(session: Session) -> Result<Redirect> {
    set_editing_target(&session, None).await?;
    Ok(Redirect::to("/products"))
}

/// Delete product `id`.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut manager = ProductsManager::new(state.catalog());
    load_for_page(&mut manager).await;

    match manager.delete_product(&ProductId::new(id)).await {
        Ok(()) => Redirect::to("/products").into_response(),
        Err(e) => {
            tracing::error!("Failed to delete product: {e}");
            render_index(
                failure_status(&e),
                &manager,
                None,
                Some("Failed to delete product".to_string()),
            )
        }
    }
}

/// Check the product exists, then navigate to its detail view.
#[instrument(skip(state))]
pub async fn open(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let manager = ProductsManager::new(state.catalog());
    let location = manager.view_product(&ProductId::new(id)).await?;
    Ok(Redirect::to(&location))
}

/// Product detail view.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Query(query): Query<ViewQuery>) -> Response {
    let Some(id) = query.id.filter(|id| !id.is_empty()) else {
        return Redirect::to("/products").into_response();
    };

    match state.catalog().get_product(&ProductId::new(id)).await {
        Ok(product) => render(
            StatusCode::OK,
            &ProductShowTemplate {
                product: Some(ProductDetailView::from(&product)),
                error: None,
            },
        ),
        Err(e) => {
            tracing::error!("Error fetching product details: {e}");
            render(
                failure_status(&e),
                &ProductShowTemplate {
                    product: None,
                    error: Some("Failed to load product details.".to_string()),
                },
            )
        }
    }
}
