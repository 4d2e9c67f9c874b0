//! Embedded handlebars pages.
//!
//! Templates compile into the binary and register once at startup, so a
//! broken page is a startup error rather than a request-time surprise.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::WebError;

const PAGES: &[(&str, &str)] = &[
    ("landing", include_str!("../templates/landing.hbs")),
    ("survey", include_str!("../templates/survey.hbs")),
    ("choice", include_str!("../templates/choice.hbs")),
    ("lifting", include_str!("../templates/lifting.hbs")),
    ("meals", include_str!("../templates/meals.hbs")),
    ("generate", include_str!("../templates/generate.hbs")),
];

/// Registry of the server-rendered pages.
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, WebError> {
        let mut registry = Handlebars::new();
        for (name, source) in PAGES {
            registry
                .register_template_string(name, *source)
                .map_err(|e| WebError::Server(format!("template {}: {}", name, e)))?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, WebError> {
        Ok(self.registry.render(name, data)?)
    }
}
