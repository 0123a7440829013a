//! Built-in retail data services for cxbot.
//!
//! These give the assistant real-time context: nearby stores, active
//! coupons, the latest order, and a short customer profile. The built-ins
//! are deterministic stand-ins for the real store systems, so the whole
//! pipeline can run end-to-end without network access.

pub mod coupons;
pub mod orders;
pub mod profiles;
pub mod stores;

use std::sync::Arc;

use cxbot_core::{CouponService, OrderService, ProfileService, StoreLocator};

pub use coupons::StaticCouponService;
pub use orders::StaticOrderService;
pub use profiles::StaticProfileService;
pub use stores::{StaticStoreLocator, StoreLocation};

/// The set of live-data services one assistant instance talks to.
#[derive(Clone)]
pub struct RetailServices {
    pub stores: Arc<dyn StoreLocator>,
    pub coupons: Arc<dyn CouponService>,
    pub orders: Arc<dyn OrderService>,
    pub profiles: Arc<dyn ProfileService>,
}

/// Create the default set of built-in services.
pub fn default_services() -> RetailServices {
    RetailServices {
        stores: Arc::new(StaticStoreLocator::default()),
        coupons: Arc::new(StaticCouponService::default()),
        orders: Arc::new(StaticOrderService),
        profiles: Arc::new(StaticProfileService),
    }
}

/// Simple hash for deterministic but varied results per user.
pub(crate) fn stable_hash(key: &str) -> u32 {
    key.bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32))
}

/// Reject blank user ids before any lookup.
pub(crate) fn require_user_id(user_id: &str) -> Result<&str, cxbot_core::ToolError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(cxbot_core::ToolError::InvalidArguments(
            "user_id must not be empty".into(),
        ));
    }
    Ok(trimmed)
}
