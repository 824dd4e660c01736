use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{OrderPage, OrderView};
use crate::domain::ports::OrderRepository;

pub const MAX_PAGE_SIZE: i64 = 100;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn get_order_by_number(&self, order_number: &str) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_number(order_number.trim())
    }

    /// Newest orders first. `page` is 1-based; out-of-range values are clamped.
    pub fn list_orders(&self, page: i64, limit: i64) -> Result<OrderPage, DomainError> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let result = self.repo.list(page, limit)?;
        Ok(OrderPage {
            items: result.items,
            total: result.total,
            page,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::checkout_service::CheckoutService;
    use crate::domain::checkout::fixtures::{line, submission};
    use crate::domain::ports::{OrderRepository, PriceCatalog};
    use crate::test_support::{FixedCatalog, InMemoryOrderRepository};

    fn seeded(count: usize) -> OrderService<Arc<dyn OrderRepository>> {
        let repo: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::default());
        let catalog: Arc<dyn PriceCatalog> =
            Arc::new(FixedCatalog::default().with("p1", None, "100"));
        let checkout = CheckoutService::new(repo.clone(), catalog);
        for _ in 0..count {
            checkout
                .place_order(submission(vec![line("p1", "100", 1)]))
                .expect("checkout failed");
        }
        OrderService::new(repo)
    }

    #[test]
    fn list_orders_clamps_out_of_range_paging() {
        let service = seeded(3);

        let page = service.list_orders(0, 500).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, MAX_PAGE_SIZE);
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 3);

        let page = service.list_orders(-4, 0).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 1);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn order_number_lookup_ignores_surrounding_whitespace() {
        let service = seeded(1);
        let number = service.list_orders(1, 1).unwrap().items[0].order_number.clone();

        let found = service.get_order_by_number(&format!("  {number} ")).unwrap();
        assert_eq!(found.map(|o| o.order_number), Some(number));
    }
}
