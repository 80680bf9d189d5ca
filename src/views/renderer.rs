//! HTML rendering with tera.

use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

/// Templates compiled into the binary, parents before children.
const TEMPLATES: &[(&str, &str)] = &[
    (
        "layouts/main.html",
        include_str!("../../templates/layouts/main.html"),
    ),
    (
        "layouts/test.html",
        include_str!("../../templates/layouts/test.html"),
    ),
    (
        "pages/home.html",
        include_str!("../../templates/pages/home.html"),
    ),
    (
        "pages/dashboard.html",
        include_str!("../../templates/pages/dashboard.html"),
    ),
    (
        "pages/test.html",
        include_str!("../../templates/pages/test.html"),
    ),
    (
        "pages/status.html",
        include_str!("../../templates/pages/status.html"),
    ),
    (
        "pages/admin.html",
        include_str!("../../templates/pages/admin.html"),
    ),
    (
        "pages/login.html",
        include_str!("../../templates/pages/login.html"),
    ),
    ("error.html", include_str!("../../templates/error.html")),
];

/// Renders page templates into HTML.
#[derive(Debug)]
pub struct ViewRenderer {
    tera: Tera,
}

impl ViewRenderer {
    /// Compile the built-in templates.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        debug!(templates = TEMPLATES.len(), "Templates compiled");
        Ok(Self { tera })
    }

    /// Render `template` with `data` as the context.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, tera::Error> {
        let context = Context::from_serialize(data)?;
        self.tera.render(template, &context)
    }

    /// Whether a template with this name is loaded.
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|loaded| loaded == name)
    }
}
