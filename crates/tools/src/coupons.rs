//! Coupon service that hands each user a stable slice of a fixed catalog.

use async_trait::async_trait;
use cxbot_core::error::ToolError;
use cxbot_core::retail::{Coupon, CouponService};

use crate::{require_user_id, stable_hash};

#[derive(Debug, Clone)]
pub struct StaticCouponService {
    catalog: Vec<Coupon>,
    per_user: usize,
}

impl StaticCouponService {
    pub fn new(catalog: Vec<Coupon>, per_user: usize) -> Self {
        Self { catalog, per_user }
    }
}

fn coupon(description: &str, store_id: &str) -> Coupon {
    Coupon {
        description: description.into(),
        store_id: store_id.into(),
    }
}

impl Default for StaticCouponService {
    fn default() -> Self {
        Self::new(
            vec![
                coupon("20% off any hot drink before 10am", "S001"),
                coupon("Buy one pastry, get one free", "S002"),
                coupon("Free oat milk upgrade", "S003"),
                coupon("$2 off cold brew growlers", "S004"),
                coupon("Double loyalty stars on weekends", "S005"),
            ],
            2,
        )
    }
}

#[async_trait]
impl CouponService for StaticCouponService {
    async fn active_coupons(&self, user_id: &str) -> Result<Vec<Coupon>, ToolError> {
        let user_id = require_user_id(user_id)?;
        if self.catalog.is_empty() {
            return Ok(Vec::new());
        }

        let start = stable_hash(user_id) as usize % self.catalog.len();
        Ok(self
            .catalog
            .iter()
            .cycle()
            .skip(start)
            .take(self.per_user.min(self.catalog.len()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_user_gets_same_coupons() {
        let service = StaticCouponService::default();
        let a = service.active_coupons("u-7").await.unwrap();
        let b = service.active_coupons("u-7").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[tokio::test]
    async fn per_user_never_exceeds_catalog() {
        let service = StaticCouponService::new(vec![coupon("only one", "S9")], 4);
        let coupons = service.active_coupons("anyone").await.unwrap();
        assert_eq!(coupons, vec![coupon("only one", "S9")]);
    }

    #[tokio::test]
    async fn empty_catalog_yields_no_coupons() {
        let service = StaticCouponService::new(Vec::new(), 2);
        assert!(service.active_coupons("u-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_user_is_rejected() {
        let service = StaticCouponService::default();
        assert!(matches!(
            service.active_coupons("  ").await,
            Err(ToolError::InvalidArguments(_))
        ));
    }
}
