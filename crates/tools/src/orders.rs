//! Order service returning a stable, plausible latest order per user.

use async_trait::async_trait;
use cxbot_core::error::ToolError;
use cxbot_core::retail::{Order, OrderService};

use crate::{require_user_id, stable_hash};

const STATUSES: [&str; 4] = ["preparing", "ready for pickup", "out for delivery", "delivered"];

pub struct StaticOrderService;

#[async_trait]
impl OrderService for StaticOrderService {
    async fn latest_order(&self, user_id: &str) -> Result<Order, ToolError> {
        let user_id = require_user_id(user_id)?;
        let hash = stable_hash(user_id);

        let status = STATUSES[(hash as usize / 7) % STATUSES.len()];
        let eta = match status {
            "delivered" | "ready for pickup" => 0,
            _ => 5 + hash % 40,
        };

        Ok(Order {
            order_id: format!("ORD-{:05}", hash % 100_000),
            status: status.into(),
            eta,
        })
    }
}
