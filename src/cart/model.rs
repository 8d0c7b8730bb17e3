use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog::ItemKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    /// Catalog id of the product or membership.
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
    pub kind: ItemKind,
    pub category: String,
}

impl CartItem {
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub total: i64,
    pub item_count: u32,
}

impl From<Vec<CartItem>> for CartSummary {
    fn from(items: Vec<CartItem>) -> Self {
        let total = items.iter().map(CartItem::line_total).sum();
        let item_count = items.iter().map(|i| i.quantity).sum();
        Self {
            items,
            total,
            item_count,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    BankTransfer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartItem>,
    pub subtotal: i64,
    pub shipping: i64,
    pub total: i64,
    pub payment_method: PaymentMethod,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
