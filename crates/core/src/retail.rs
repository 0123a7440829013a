//! Live retail data contracts: nearby stores, coupons, orders, profiles.
//!
//! These are black boxes to the assistant. Their results are rendered to
//! plain text before they reach the prompt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub description: String,
    pub store_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub status: String,
    /// Estimated time to arrival, in minutes.
    pub eta: u32,
}

#[async_trait]
pub trait StoreLocator: Send + Sync {
    async fn nearby_stores(&self, lat: f64, lon: f64) -> Result<Vec<Store>, ToolError>;
}

#[async_trait]
pub trait CouponService: Send + Sync {
    async fn active_coupons(&self, user_id: &str) -> Result<Vec<Coupon>, ToolError>;
}

#[async_trait]
pub trait OrderService: Send + Sync {
    async fn latest_order(&self, user_id: &str) -> Result<Order, ToolError>;
}

/// Produces the short free-text profile summary placed at the top of the context.
#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn summarize(&self, user_id: &str) -> Result<String, ToolError>;
}
