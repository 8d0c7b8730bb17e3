use serde::Deserialize;

use super::model::PaymentMethod;

fn one() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub id: String,
    #[serde(default = "one")]
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
}
