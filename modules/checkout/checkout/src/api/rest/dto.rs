//! Request and response bodies of the proxy endpoints.

use checkout_sdk::CartItem;
use serde::{Deserialize, Deserializer, Serialize};

/// `POST /api/orders` body. A missing `cart` is an empty cart.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateOrderRequest {
    pub cart: Vec<CartItemDto>,
}

#[derive(Debug, Deserialize)]
pub struct CartItemDto {
    pub id: String,
    #[serde(default = "default_quantity", deserialize_with = "quantity")]
    pub quantity: u32,
}

impl From<CartItemDto> for CartItem {
    fn from(dto: CartItemDto) -> Self {
        Self {
            id: dto.id,
            quantity: dto.quantity,
        }
    }
}

/// `POST /api/payments/refund` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub captured_payment_id: String,
}

/// Body of every failed proxy call.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok" }
    }
}

fn default_quantity() -> u32 {
    1
}

/// Browsers send quantities as numbers or numeric strings.
fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
