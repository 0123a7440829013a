//! Profile service producing the one-line customer summary.

use async_trait::async_trait;
use cxbot_core::error::ToolError;
use cxbot_core::retail::ProfileService;

use crate::require_user_id;

pub struct StaticProfileService;

#[async_trait]
impl ProfileService for StaticProfileService {
    async fn summarize(&self, user_id: &str) -> Result<String, ToolError> {
        let user_id = require_user_id(user_id)?;
        Ok(format!(
            "User {user_id} is a frequent customer who enjoys hot drinks."
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn summary_names_the_user() {
        let summary = StaticProfileService.summarize("u-42").await.unwrap();
        assert_eq!(
            summary,
            "User u-42 is a frequent customer who enjoys hot drinks."
        );
    }

    #[tokio::test]
    async fn blank_user_is_rejected() {
        assert!(StaticProfileService.summarize(" ").await.is_err());
    }
}
