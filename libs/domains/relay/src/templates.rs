//! Handlebars templates for contact form notifications.

use crate::error::{RelayError, RelayResult};
use crate::models::ContactForm;
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

const CONTACT_HTML: &str = "contact_html";

/// Registered email templates, compiled once at startup.
#[derive(Clone)]
pub struct TemplateEngine {
    handlebars: Arc<Handlebars<'static>>,
}

impl TemplateEngine {
    pub fn new() -> RelayResult<Self> {
        let mut handlebars = Handlebars::new();
        // Unknown placeholders are errors instead of empty strings
        handlebars.set_strict_mode(true);

        handlebars
            .register_template_string(CONTACT_HTML, CONTACT_HTML_TEMPLATE)
            .map_err(|e| {
                RelayError::Template(format!("Failed to register {}: {}", CONTACT_HTML, e))
            })?;

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> RelayResult<String> {
        self.handlebars
            .render(name, data)
            .map_err(|e| RelayError::Template(e.to_string()))
    }

    /// HTML summary of a submission. Every submitted value is HTML-escaped.
    pub fn render_contact(&self, form: &ContactForm) -> RelayResult<String> {
        debug!(email = %form.email, "Rendering contact form email");
        self.render(CONTACT_HTML, form)
    }
}

const CONTACT_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body { font-family: Arial, sans-serif; line-height: 1.6; }
        .container { max-width: 600px; margin: 0 auto; padding: 20px; }
        .header { background-color: #f5f5f5; padding: 10px; border-radius: 5px; }
        .field { margin-bottom: 10px; }
        .label { font-weight: bold; }
        .message { white-space: pre-line; margin-top: 15px; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h2>New Contact Form Submission</h2>
        </div>
        <div class="field"><span class="label">Name:</span> {{name}}</div>
        <div class="field"><span class="label">Email:</span> {{email}}</div>
        <div class="field"><span class="label">Subject:</span> {{subject}}</div>
        <div class="field">
            <span class="label">Message:</span>
            <div class="message">{{message}}</div>
        </div>
    </div>
</body>
</html>"#;
