//! Headline numbers for the dashboard landing page, computed with count-only queries.

use crate::framework::{DataService, Query, RemoteError, TableClient};
use crate::model::Product;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total_products: u64,
    /// Products whose stock is at or below the threshold.
    pub low_stock_items: u64,
}

impl DashboardStats {
    #[instrument(skip(service))]
    pub async fn load(service: Arc<dyn DataService>, threshold: u32) -> Result<Self, RemoteError> {
        let products = TableClient::<Product>::new(service);
        let all = Query::new();
        let low_stock = Query::new().lte("stock", threshold);

        let (total_products, low_stock_items) =
            tokio::try_join!(products.count(&all), products.count(&low_stock))?;

        info!(total_products, low_stock_items, "Dashboard stats loaded");
        Ok(Self {
            total_products,
            low_stock_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::memory::MemoryService;
    use crate::framework::mock::{MockService, RecordedCall};
    use crate::model::ProductDraft;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_counts_against_memory_backend() {
        let service = Arc::new(MemoryService::inventory(8));
        let products = TableClient::<Product>::new(service.clone());
        for (sku, stock) in [("W-1", 3), ("W-2", 10), ("W-3", 11), ("W-4", 0)] {
            products
                .insert(&ProductDraft::new("Widget", sku, dec!(2.50), stock))
                .await
                .unwrap();
        }

        let stats = DashboardStats::load(service, 10).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_products: 4,
                low_stock_items: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_sends_total_and_threshold_counts() {
        let mock = MockService::new();
        mock.expect_count("products").return_ok(12);
        mock.expect_count("products").return_ok(4);

        let stats = DashboardStats::load(mock.service(), 7).await.unwrap();
        assert_eq!(stats.total_products, 12);
        assert_eq!(stats.low_stock_items, 4);

        assert_eq!(
            mock.calls(),
            vec![
                RecordedCall::Count {
                    table: "products".into(),
                    query: Query::new(),
                },
                RecordedCall::Count {
                    table: "products".into(),
                    query: Query::new().lte("stock", 7),
                },
            ]
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_count_failure_is_returned() {
        let mock = MockService::new();
        mock.expect_count("products").return_ok(5);
        mock.expect_count("products")
            .return_err(RemoteError::Transport("timeout".into()));

        let result = DashboardStats::load(mock.service(), 10).await;
        assert_eq!(result, Err(RemoteError::Transport("timeout".into())));
    }
}
