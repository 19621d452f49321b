//! 模板渲染
//!
//! 模板在编译期嵌入二进制，运行时不依赖工作目录。

use axum::response::Html;
use std::sync::Arc;
use tera::{Context, Tera};

use super::{error::CoreError, session::Session};

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("error.html", include_str!("../../templates/error.html")),
    (
        "categories/index.html",
        include_str!("../../templates/categories/index.html"),
    ),
    (
        "categories/add.html",
        include_str!("../../templates/categories/add.html"),
    ),
    (
        "categories/edit.html",
        include_str!("../../templates/categories/edit.html"),
    ),
    (
        "products/index.html",
        include_str!("../../templates/products/index.html"),
    ),
    (
        "products/add.html",
        include_str!("../../templates/products/add.html"),
    ),
    (
        "products/edit.html",
        include_str!("../../templates/products/edit.html"),
    ),
];

#[derive(Clone)]
pub struct Views {
    tera: Arc<Tera>,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<Html<String>, CoreError> {
        Ok(Html(self.tera.render(name, context)?))
    }

    /// 渲染页面并带上会话里积压的闪存消息（读取即清除）
    pub async fn page(
        &self,
        session: &Session,
        name: &str,
        mut context: Context,
    ) -> Result<Html<String>, CoreError> {
        let messages = session.take_flashes().await?;
        context.insert("messages", &messages);
        self.render(name, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_compile() {
        let views = Views::new().unwrap();
        let mut context = Context::new();
        context.insert("status", &404u16);
        context.insert("message", &"<b>missing</b>");
        let html = views.render("error.html", &context).unwrap().0;
        assert!(html.contains("404"));
        assert!(html.contains("&lt;b&gt;missing&lt;&#x2F;b&gt;"));
    }
}
