//! Checkout page served at `GET /checkout`.

use tera::{Context, Tera};

const TEMPLATE: &str = include_str!("checkout.html");
/// The `.html` suffix turns on tera's autoescaping.
const TEMPLATE_NAME: &str = "checkout.html";

/// Checkout page with the client identifier substituted, rendered once.
#[derive(Debug, Clone)]
pub struct CheckoutPage {
    html: String,
}

impl CheckoutPage {
    /// # Errors
    /// Returns [`tera::Error`] if the embedded template fails to parse or render.
    pub fn render(client_id: &str) -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

        let mut context = Context::new();
        context.insert("client_id", client_id);

        Ok(Self {
            html: tera.render(TEMPLATE_NAME, &context)?,
        })
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }
}
