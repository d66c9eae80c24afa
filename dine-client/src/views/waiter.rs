//! Waiter display
//!
//! Splits live orders into unclaimed and mine, and sends claims and item
//! actions on behalf of one waiter.

use shared::message::RelayEvent;
use shared::order::{
    ItemAction, ItemStatus, Order, OrderAction, OrderFilter, OrderStatus, Role,
    allowed_item_actions, allowed_order_actions,
};

use super::ViewCore;
use crate::book::BookUpdate;
use crate::http::Gateway;
use crate::{ClientError, ClientResult};

pub struct WaiterView<G> {
    core: ViewCore<G>,
    waiter_id: String,
}

impl<G: Gateway> WaiterView<G> {
    pub fn new(gateway: G, tenant_id: impl Into<String>, waiter_id: impl Into<String>) -> Self {
        Self {
            core: ViewCore::new(gateway, tenant_id, Role::Waiter),
            waiter_id: waiter_id.into(),
        }
    }

    pub fn waiter_id(&self) -> &str {
        &self.waiter_id
    }

    pub fn core(&self) -> &ViewCore<G> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut ViewCore<G> {
        &mut self.core
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.core.refresh(&OrderFilter::default()).await
    }

    pub async fn handle_event(&mut self, event: &RelayEvent) -> ClientResult<BookUpdate> {
        self.core.handle_event(event).await
    }

    /// Live orders nobody has claimed, oldest first
    pub fn unclaimed(&self) -> Vec<&Order> {
        self.core
            .book()
            .orders()
            .into_iter()
            .filter(|o| !o.is_terminal() && !o.is_claimed())
            .collect()
    }

    /// Orders claimed by this waiter, oldest first
    pub fn mine(&self) -> Vec<&Order> {
        self.core
            .book()
            .orders()
            .into_iter()
            .filter(|o| o.waiter_id.as_deref() == Some(self.waiter_id.as_str()))
            .collect()
    }

    /// Order buttons to render
    pub fn order_actions(&self, order_id: &str) -> Vec<OrderAction> {
        self.core
            .book()
            .get(order_id)
            .map(|o| allowed_order_actions(o, Role::Waiter))
            .unwrap_or_default()
    }

    /// Item buttons to render
    pub fn item_actions(&self, order_id: &str, item_id: &str) -> Vec<ItemAction> {
        self.core
            .book()
            .get(order_id)
            .and_then(|o| {
                o.item(item_id)
                    .map(|i| allowed_item_actions(o.status, i.status, Role::Waiter))
            })
            .unwrap_or_default()
    }

    /// Claim an order for this waiter
    ///
    /// An order already claimed in the book fails without a request; a lost
    /// race fails with the gateway's `AlreadyClaimed`. Either way the book is
    /// left alone and the caller may refresh to see who holds it.
    pub async fn claim(&mut self, order_id: &str) -> ClientResult<Order> {
        self.core.ensure_online()?;
        let order = self.core.order(order_id)?;
        if let Some(current) = &order.waiter_id {
            return Err(ClientError::AlreadyClaimed {
                message: "Order already claimed by another waiter".into(),
                waiter_id: Some(current.clone()),
            });
        }
        if order.is_terminal() {
            return Err(ClientError::InvalidTransition(format!(
                "Order is {} and can no longer be claimed",
                order.status
            )));
        }

        let result = self.core.gateway().claim_order(order_id, &self.waiter_id).await;
        let claimed = self.core.track(result)?;
        tracing::info!(order_id = %order_id, waiter_id = %self.waiter_id, "Order claimed");
        Ok(self.core.commit(claimed))
    }

    /// Approved → Pending on the kitchen's behalf
    pub async fn acknowledge(&mut self, order_id: &str) -> ClientResult<Order> {
        self.core.set_order_status(order_id, OrderStatus::Pending).await
    }

    /// Item Unconfirmed → Pending
    pub async fn confirm_item(&mut self, order_id: &str, item_id: &str) -> ClientResult<Order> {
        self.core
            .set_item_status(order_id, item_id, ItemStatus::Pending)
            .await
    }

    /// Item Ready → Served
    pub async fn serve_item(&mut self, order_id: &str, item_id: &str) -> ClientResult<Order> {
        self.core
            .set_item_status(order_id, item_id, ItemStatus::Served)
            .await
    }

    /// Item Unconfirmed/Pending → Cancelled; the order itself stays as it is
    pub async fn cancel_item(&mut self, order_id: &str, item_id: &str) -> ClientResult<Order> {
        self.core
            .set_item_status(order_id, item_id, ItemStatus::Cancelled)
            .await
    }

    /// Completed → Served
    pub async fn serve_order(&mut self, order_id: &str) -> ClientResult<Order> {
        self.core.set_order_status(order_id, OrderStatus::Served).await
    }

    /// Served → Paid
    pub async fn mark_paid(&mut self, order_id: &str) -> ClientResult<Order> {
        self.core.set_order_status(order_id, OrderStatus::Paid).await
    }

    pub async fn cancel_order(&mut self, order_id: &str) -> ClientResult<Order> {
        self.core
            .set_order_status(order_id, OrderStatus::Cancelled)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::ConnectionState;
    use crate::views::testing::{MemoryGateway, item};

    fn seeded() -> MemoryGateway {
        let gateway = MemoryGateway::new(Role::Waiter);
        let mut open = Order::new("O1", "t1", 1, vec![item("i1", "pho", 2, 30.0), item("i2", "tea", 1, 40.0)], 0);
        open.status = OrderStatus::Approved;
        let mut taken = Order::new("O2", "t2", 2, vec![], 10);
        taken.waiter_id = Some("w2".into());
        let mut mine = Order::new("O3", "t3", 3, vec![], 20);
        mine.waiter_id = Some("w1".into());
        let mut paid = Order::new("O4", "t4", 4, vec![], 30);
        paid.status = OrderStatus::Paid;
        for order in [open, taken, mine, paid] {
            gateway.insert(order);
        }
        gateway
    }

    async fn view(gateway: &MemoryGateway) -> WaiterView<MemoryGateway> {
        let mut view = WaiterView::new(gateway.clone(), "T1", "w1");
        view.refresh().await.unwrap();
        view
    }

    #[tokio::test]
    async fn partitions_orders() {
        let view = view(&seeded()).await;
        let unclaimed: Vec<&str> = view.unclaimed().iter().map(|o| o.id.as_str()).collect();
        let mine: Vec<&str> = view.mine().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(unclaimed, vec!["O1"]);
        assert_eq!(mine, vec!["O3"]);
        assert!(view.order_actions("O1").contains(&OrderAction::Claim));
        assert!(!view.order_actions("O2").contains(&OrderAction::Claim));
        assert!(view.order_actions("O4").is_empty());
    }

    #[tokio::test]
    async fn claim_then_second_claim_fails() {
        let gateway = seeded();
        let mut view = view(&gateway).await;

        let order = view.claim("O1").await.unwrap();
        assert_eq!(order.waiter_id.as_deref(), Some("w1"));
        assert_eq!(view.mine().len(), 2);

        let before = gateway.request_count();
        let err = view.claim("O1").await.unwrap_err();
        assert!(matches!(err, ClientError::AlreadyClaimed { .. }));
        assert_eq!(gateway.request_count(), before);
    }

    #[tokio::test]
    async fn lost_claim_race_leaves_book_untouched() {
        let gateway = seeded();
        let mut view = view(&gateway).await;

        // Another waiter claims behind this view's back
        gateway.claim_order("O1", "w9").await.unwrap();

        let err = view.claim("O1").await.unwrap_err();
        assert_eq!(
            err,
            ClientError::AlreadyClaimed {
                message: "Order already claimed by another waiter".into(),
                waiter_id: Some("w9".into()),
            }
        );
        assert!(view.core().book().get("O1").unwrap().waiter_id.is_none());
        assert_eq!(gateway.stored("O1").waiter_id.as_deref(), Some("w9"));
    }

    #[tokio::test]
    async fn item_actions_follow_the_table() {
        let gateway = seeded();
        let mut view = view(&gateway).await;

        assert_eq!(
            view.item_actions("O1", "i1"),
            vec![ItemAction::Confirm, ItemAction::Cancel]
        );
        let order = view.confirm_item("O1", "i1").await.unwrap();
        assert_eq!(order.item("i1").unwrap().status, ItemStatus::Pending);

        // Pending items are the kitchen's to mark ready, not serve
        let err = view.serve_item("O1", "i1").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidTransition(_)));

        let order = view.cancel_item("O1", "i2").await.unwrap();
        assert_eq!(order.item_count, 1);
        assert_eq!(order.total_amount, 60.0);
        assert_eq!(order.status, OrderStatus::Approved);
    }

    #[tokio::test]
    async fn gateway_rejection_leaves_book_unchanged() {
        let gateway = seeded();
        let mut view = view(&gateway).await;

        // The gateway moved on; the book still says Approved
        gateway
            .as_role(Role::Admin)
            .update_order_status("O1", OrderStatus::Cancelled)
            .await
            .unwrap();

        let err = view.acknowledge("O1").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidTransition(_)));
        assert_eq!(view.core().book().get("O1").unwrap().status, OrderStatus::Approved);
        assert!(!err.user_message().is_empty());
    }

    #[tokio::test]
    async fn offline_blocks_actions() {
        let gateway = seeded();
        let mut view = view(&gateway).await;

        gateway.offline.store(true, std::sync::atomic::Ordering::SeqCst);
        let err = view.cancel_order("O1").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(view.core().connection(), ConnectionState::Offline);

        let before = gateway.request_count();
        assert_eq!(view.claim("O1").await.unwrap_err(), ClientError::Offline);
        assert_eq!(gateway.request_count(), before);
        assert!(view.core().book().get("O1").unwrap().waiter_id.is_none());

        gateway.offline.store(false, std::sync::atomic::Ordering::SeqCst);
        view.refresh().await.unwrap();
        assert_eq!(view.core().connection(), ConnectionState::Online);
    }

    #[tokio::test]
    async fn full_service_flow() {
        let gateway = seeded();
        let kitchen = gateway.as_role(Role::Kitchen);
        let mut view = view(&gateway).await;

        view.claim("O1").await.unwrap();
        view.acknowledge("O1").await.unwrap();
        view.confirm_item("O1", "i1").await.unwrap();
        view.cancel_item("O1", "i2").await.unwrap();
        kitchen.update_item_status("O1", "i1", ItemStatus::Ready).await.unwrap();
        kitchen.update_order_status("O1", OrderStatus::Completed).await.unwrap();
        view.refresh().await.unwrap();

        view.serve_item("O1", "i1").await.unwrap();
        view.serve_order("O1").await.unwrap();
        let paid = view.mark_paid("O1").await.unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);
        assert!(view.order_actions("O1").is_empty());
        assert!(matches!(
            view.cancel_order("O1").await.unwrap_err(),
            ClientError::InvalidTransition(_)
        ));
    }
}
