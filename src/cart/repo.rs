use time::OffsetDateTime;
use tracing::{error, info};
use uuid::Uuid;

use super::model::{CartItem, CartSummary, Order, PaymentMethod};
use crate::{
    catalog::{self, ItemKind},
    config::ShopConfig,
    error::{AppError, AppResult},
    store::{keys, Blobs, Collection},
    users::User,
};

/// Shipping is charged only for carts holding something physical whose
/// subtotal is below the free-shipping threshold.
pub fn shipping_for(items: &[CartItem], subtotal: i64, shop: &ShopConfig) -> i64 {
    let has_physical = items.iter().any(|i| i.kind == ItemKind::Product);
    if has_physical && subtotal > 0 && subtotal < shop.free_shipping_threshold {
        shop.shipping_fee
    } else {
        0
    }
}

#[derive(Clone)]
pub struct CartStore {
    blobs: Blobs,
    shop: ShopConfig,
}

impl CartStore {
    pub fn new(blobs: Blobs, shop: ShopConfig) -> Self {
        Self { blobs, shop }
    }

    fn cart(&self, user_id: Uuid) -> Collection<CartItem> {
        self.blobs.collection(keys::cart(user_id))
    }

    fn orders(&self, user_id: Uuid) -> Collection<Order> {
        self.blobs.collection(keys::orders(user_id))
    }

    pub async fn summary(&self, user_id: Uuid) -> anyhow::Result<CartSummary> {
        Ok(self.cart(user_id).load().await?.into())
    }

    /// Adds `quantity` units of a catalog item, merging with an existing line.
    pub async fn add_item(&self, user: &User, item_id: &str, quantity: i64) -> AppResult<CartSummary> {
        if quantity < 1 {
            return Err(AppError::bad_request("Quantity must be at least 1"));
        }
        let quantity =
            u32::try_from(quantity).map_err(|_| AppError::bad_request("Quantity too large"))?;
        let line = catalog::lookup(item_id)?;
        if line.requires_student && !user.is_student() {
            let msg = if user.verification.is_pending() {
                "Student plans require an approved student verification; yours is still under review"
            } else {
                "Student plans require student verification; submit your documents first"
            };
            return Err(AppError::Forbidden(msg.into()));
        }

        let items = self
            .cart(user.id)
            .modify(|items| {
                match items.iter_mut().find(|i| i.id == line.id) {
                    Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
                    None => items.push(CartItem {
                        id: line.id,
                        name: line.name,
                        price: line.price,
                        quantity,
                        kind: line.kind,
                        category: line.category,
                    }),
                }
                Ok(items.clone())
            })
            .await?;
        info!(user_id = %user.id, item_id, quantity, "cart item added");
        Ok(items.into())
    }

    pub async fn remove_item(&self, user_id: Uuid, item_id: &str) -> AppResult<CartSummary> {
        let items = self
            .cart(user_id)
            .modify(|items| {
                let idx = items
                    .iter()
                    .position(|i| i.id == item_id)
                    .ok_or_else(|| AppError::not_found("Item not in cart"))?;
                items.remove(idx);
                Ok(items.clone())
            })
            .await?;
        Ok(items.into())
    }

    /// A quantity of zero or less removes the line.
    pub async fn update_quantity(
        &self,
        user_id: Uuid,
        item_id: &str,
        quantity: i64,
    ) -> AppResult<CartSummary> {
        let items = self
            .cart(user_id)
            .modify(|items| {
                let idx = items
                    .iter()
                    .position(|i| i.id == item_id)
                    .ok_or_else(|| AppError::not_found("Item not in cart"))?;
                if quantity <= 0 {
                    items.remove(idx);
                } else {
                    items[idx].quantity = u32::try_from(quantity)
                        .map_err(|_| AppError::bad_request("Quantity too large"))?;
                }
                Ok(items.clone())
            })
            .await?;
        Ok(items.into())
    }

    pub async fn clear(&self, user_id: Uuid) -> anyhow::Result<()> {
        self.cart(user_id).clear().await
    }

    /// Turns the cart into an order and empties it.
    pub async fn checkout(&self, user_id: Uuid, payment_method: PaymentMethod) -> AppResult<Order> {
        let items = self
            .cart(user_id)
            .modify(|items| {
                if items.is_empty() {
                    return Err(AppError::bad_request("Cart is empty"));
                }
                Ok(std::mem::take(items))
            })
            .await?;

        let subtotal: i64 = items.iter().map(CartItem::line_total).sum();
        let shipping = shipping_for(&items, subtotal, &self.shop);
        let order = Order {
            id: Uuid::new_v4(),
            user_id,
            items,
            subtotal,
            shipping,
            total: subtotal + shipping,
            payment_method,
            created_at: OffsetDateTime::now_utc(),
        };

        let stored = order.clone();
        if let Err(e) = self
            .orders(user_id)
            .modify(move |orders| {
                orders.push(stored);
                Ok(())
            })
            .await
        {
            error!(%user_id, error = %e, "saving order failed, restoring cart");
            let restore = order.items.clone();
            self.cart(user_id)
                .modify(move |items| {
                    items.extend(restore);
                    Ok(())
                })
                .await?;
            return Err(e);
        }

        info!(%user_id, order_id = %order.id, total = order.total, "order placed");
        Ok(order)
    }

    /// Newest first.
    pub async fn list_orders(&self, user_id: Uuid) -> anyhow::Result<Vec<Order>> {
        let mut orders = self.orders(user_id).load().await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}
