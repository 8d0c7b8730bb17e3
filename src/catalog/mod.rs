//! Static product and membership catalog.

mod data;
pub mod handlers;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const ALL_CATEGORIES: &str = "Todos";
pub const MEMBERSHIP_CATEGORY: &str = "Membresía";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Product,
    Membership,
}

#[derive(Debug, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub price: i64,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub bestseller: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTier {
    Regular,
    Student,
    Special,
}

#[derive(Debug, Serialize)]
pub struct Membership {
    pub id: &'static str,
    pub name: &'static str,
    pub tier: MembershipTier,
    pub price: i64,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub popular: bool,
    pub purchasable: bool,
}

/// What a cart line needs to know about a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLine {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub kind: ItemKind,
    pub category: String,
    pub requires_student: bool,
}

pub fn products() -> &'static [Product] {
    data::PRODUCTS
}

pub fn memberships() -> &'static [Membership] {
    data::MEMBERSHIPS
}

/// `None` or `"Todos"` lists everything.
pub fn products_in(category: Option<&str>) -> impl Iterator<Item = &'static Product> + '_ {
    let category = category.filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);
    products()
        .iter()
        .filter(move |p| category.map_or(true, |c| p.category.eq_ignore_ascii_case(c)))
}

pub fn memberships_in(tier: Option<MembershipTier>) -> impl Iterator<Item = &'static Membership> {
    memberships()
        .iter()
        .filter(move |m| tier.map_or(true, |t| m.tier == t))
}

pub fn find_product(id: &str) -> Option<&'static Product> {
    products().iter().find(|p| p.id == id)
}

pub fn find_membership(id: &str) -> Option<&'static Membership> {
    memberships().iter().find(|m| m.id == id)
}

/// Anything that can carry reviews or sit in a cart.
pub fn exists(id: &str) -> bool {
    find_product(id).is_some() || find_membership(id).is_some()
}

/// Resolves a purchasable catalog id into a cart line.
pub fn lookup(id: &str) -> AppResult<CatalogLine> {
    if let Some(p) = find_product(id) {
        return Ok(CatalogLine {
            id: p.id.to_string(),
            name: p.name.to_string(),
            price: p.price,
            kind: ItemKind::Product,
            category: p.category.to_string(),
            requires_student: false,
        });
    }
    let m = find_membership(id)
        .ok_or_else(|| AppError::not_found(format!("Unknown catalog item '{id}'")))?;
    if !m.purchasable {
        return Err(AppError::bad_request(format!(
            "Membership '{}' is booked by contacting the gym",
            m.name
        )));
    }
    Ok(CatalogLine {
        id: m.id.to_string(),
        name: format!("Membresía {}", m.name),
        price: m.price,
        kind: ItemKind::Membership,
        category: MEMBERSHIP_CATEGORY.to_string(),
        requires_student: m.tier == MembershipTier::Student,
    })
}
