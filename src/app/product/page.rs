//! 产品页面路由

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, Redirect},
    Form,
};
use tera::Context;

use super::model::ProductForm;
use crate::core::{
    error::{CoreError, PageError},
    extract::PageId,
    session::{FlashLevel, Session},
    state::AppState,
};

/// GET / 与 GET /products
pub async fn show(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, PageError> {
    let products = state.product_service.all().await?;

    let mut context = Context::new();
    context.insert("products", &products);
    Ok(state.views.page(&session, "products/index.html", context).await?)
}

/// GET /products/add
pub async fn show_add(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, PageError> {
    let categories = state.category_service.all().await?;

    let mut context = Context::new();
    context.insert("categories", &categories);
    Ok(state.views.page(&session, "products/add.html", context).await?)
}

/// GET /products/edit/:id
pub async fn get(
    State(state): State<AppState>,
    session: Session,
    PageId(id): PageId,
) -> Result<Html<String>, PageError> {
    let product = state.product_service.get(id).await?;
    let categories = state.category_service.all().await?;

    let mut context = Context::new();
    context.insert("product", &product);
    context.insert("categories", &categories);
    Ok(state.views.page(&session, "products/edit.html", context).await?)
}

/// POST /products/add
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<ProductForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let result = match form {
        Ok(Form(form)) => state.product_service.add(form).await,
        Err(rejection) => Err(rejection.into()),
    };
    match result {
        Ok(product) => {
            session
                .flash(FlashLevel::Info, format!("Product \"{}\" added", product.name))
                .await?;
            Ok(Redirect::to("/products"))
        }
        Err(CoreError::BadRequest(msg)) => {
            session.flash(FlashLevel::Error, msg).await?;
            Ok(Redirect::to("/products/add"))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /products/update/:id
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    PageId(id): PageId,
    form: Result<Form<ProductForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let result = match form {
        Ok(Form(form)) => state.product_service.update(id, form).await,
        Err(rejection) => Err(rejection.into()),
    };
    match result {
        Ok(true) => session.flash(FlashLevel::Info, "Product updated").await?,
        Ok(false) => {
            session
                .flash(FlashLevel::Error, format!("Product {} no longer exists", id))
                .await?
        }
        Err(CoreError::BadRequest(msg)) => {
            session.flash(FlashLevel::Error, msg).await?;
            return Ok(Redirect::to(&format!("/products/edit/{}", id)));
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to("/products"))
}

/// POST /products/delete/:id
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    PageId(id): PageId,
) -> Result<Redirect, PageError> {
    let message = if state.product_service.delete(id).await? {
        "Product deleted".to_string()
    } else {
        format!("Product {} was already deleted", id)
    };
    session.flash(FlashLevel::Info, message).await?;
    Ok(Redirect::to("/products"))
}
