//! Gathers real-time retail data and renders it as plain text for the prompt.

use cxbot_core::{Coupon, Order, Result, Store};
use cxbot_tools::RetailServices;
use tracing::debug;

/// Live data for one request, gathered before context assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveData {
    pub profile: String,
    pub stores: Vec<Store>,
    pub coupons: Vec<Coupon>,
    pub order: Order,
}

impl LiveData {
    /// Query every service in turn: profile, stores, coupons, latest order.
    pub async fn gather(
        services: &RetailServices,
        user_id: &str,
        lat: f64,
        lon: f64,
    ) -> Result<Self> {
        let profile = services.profiles.summarize(user_id).await?;
        let stores = services.stores.nearby_stores(lat, lon).await?;
        let coupons = services.coupons.active_coupons(user_id).await?;
        let order = services.orders.latest_order(user_id).await?;

        debug!(
            stores = stores.len(),
            coupons = coupons.len(),
            "Live data gathered"
        );
        Ok(Self {
            profile,
            stores,
            coupons,
            order,
        })
    }

    /// The `Tools (real-time)` section body.
    pub fn render(&self) -> String {
        render_tool_context(&self.stores, &self.coupons, &self.order)
    }
}

/// Render stores, coupons and the latest order as bullet lists.
pub fn render_tool_context(stores: &[Store], coupons: &[Coupon], order: &Order) -> String {
    let mut out = String::from("Nearby stores:\n");
    for s in stores {
        out.push_str(&format!("- {} ({})\n", s.name, s.id));
    }

    out.push_str("\nCoupons:\n");
    for c in coupons {
        out.push_str(&format!("- {} (store {})\n", c.description, c.store_id));
    }

    out.push_str("\nLatest order:\n");
    out.push_str(&format!(
        "- {}: {} (ETA {} mins)\n",
        order.order_id, order.status, order.eta
    ));
    out
}
