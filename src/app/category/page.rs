//! 分类页面路由

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, Redirect},
    Form,
};
use tera::Context;

use super::model::CategoryForm;
use crate::core::{
    error::{CoreError, PageError},
    extract::PageId,
    session::{FlashLevel, Session},
    state::AppState,
};

/// GET /categories
pub async fn show(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, PageError> {
    let categories = state.category_service.all().await?;

    let mut context = Context::new();
    context.insert("categories", &categories);
    Ok(state.views.page(&session, "categories/index.html", context).await?)
}

/// GET /categories/add
pub async fn show_add(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, PageError> {
    Ok(state
        .views
        .page(&session, "categories/add.html", Context::new())
        .await?)
}

/// GET /categories/edit/:id
pub async fn get(
    State(state): State<AppState>,
    session: Session,
    PageId(id): PageId,
) -> Result<Html<String>, PageError> {
    let category = state.category_service.get(id).await?;

    let mut context = Context::new();
    context.insert("category", &category);
    Ok(state.views.page(&session, "categories/edit.html", context).await?)
}

/// POST /categories/add
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<CategoryForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let result = match form {
        Ok(Form(form)) => state.category_service.add(form).await,
        Err(rejection) => Err(rejection.into()),
    };
    match result {
        Ok(category) => {
            session
                .flash(FlashLevel::Info, format!("Category \"{}\" added", category.name))
                .await?;
            Ok(Redirect::to("/categories"))
        }
        Err(CoreError::BadRequest(msg)) => {
            session.flash(FlashLevel::Error, msg).await?;
            Ok(Redirect::to("/categories/add"))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /categories/update/:id
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    PageId(id): PageId,
    form: Result<Form<CategoryForm>, FormRejection>,
) -> Result<Redirect, PageError> {
    let result = match form {
        Ok(Form(form)) => state.category_service.update(id, form).await,
        Err(rejection) => Err(rejection.into()),
    };
    match result {
        Ok(true) => session.flash(FlashLevel::Info, "Category updated").await?,
        Ok(false) => {
            session
                .flash(FlashLevel::Error, format!("Category {} no longer exists", id))
                .await?
        }
        Err(CoreError::BadRequest(msg)) => {
            session.flash(FlashLevel::Error, msg).await?;
            return Ok(Redirect::to(&format!("/categories/edit/{}", id)));
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to("/categories"))
}

/// POST /categories/delete/:id
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    PageId(id): PageId,
) -> Result<Redirect, PageError> {
    match state.category_service.delete(id).await {
        Ok(true) => session.flash(FlashLevel::Info, "Category deleted").await?,
        Ok(false) => {
            session
                .flash(FlashLevel::Info, format!("Category {} was already deleted", id))
                .await?
        }
        // 仍被产品引用
        Err(CoreError::BadRequest(msg)) => session.flash(FlashLevel::Error, msg).await?,
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to("/categories"))
}
