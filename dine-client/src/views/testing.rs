//! In-memory gateway for view tests

use async_trait::async_trait;
use shared::message::CallStaffNotification;
use shared::order::{
    CreateOrderRequest, ItemStatus, Order, OrderFilter, OrderItem, OrderStatus, Role,
    item_transition, order_transition,
};
use shared::AppError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::http::Gateway;
use crate::{ClientError, ClientResult};

/// Shared store; clone with [`MemoryGateway::as_role`] to act as other roles
#[derive(Clone)]
pub struct MemoryGateway {
    pub orders: Arc<Mutex<HashMap<String, Order>>>,
    pub calls: Arc<Mutex<Vec<CallStaffNotification>>>,
    pub offline: Arc<AtomicBool>,
    pub requests: Arc<AtomicUsize>,
    role: Role,
}

impl MemoryGateway {
    pub fn new(role: Role) -> Self {
        Self {
            orders: Arc::default(),
            calls: Arc::default(),
            offline: Arc::default(),
            requests: Arc::default(),
            role,
        }
    }

    pub fn as_role(&self, role: Role) -> Self {
        Self {
            role,
            ..self.clone()
        }
    }

    pub fn insert(&self, order: Order) {
        self.orders.lock().unwrap().insert(order.id.clone(), order);
    }

    pub fn stored(&self, order_id: &str) -> Order {
        self.orders.lock().unwrap()[order_id].clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn begin(&self) -> ClientResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("connection refused".into()));
        }
        Ok(())
    }

    fn update<F>(&self, order_id: &str, mutate: F) -> ClientResult<Order>
    where
        F: FnOnce(&mut Order) -> Result<(), AppError>,
    {
        self.begin()?;
        let mut orders = self.orders.lock().unwrap();
        let stored = orders
            .get_mut(order_id)
            .ok_or_else(|| ClientError::from(AppError::order_not_found(order_id)))?;
        let mut draft = stored.clone();
        mutate(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }
}

/// Test item priced per unit
pub fn item(id: &str, dish_id: &str, quantity: u32, unit_price: f64) -> OrderItem {
    OrderItem {
        id: id.into(),
        dish_id: dish_id.into(),
        name: dish_id.to_uppercase(),
        quantity,
        unit_price,
        note: None,
        modifiers: vec![],
        station: None,
        status: ItemStatus::Unconfirmed,
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn list_orders(&self, filter: &OrderFilter) -> ClientResult<Vec<Order>> {
        self.begin()?;
        let orders = self.orders.lock().unwrap();
        Ok(orders.values().filter(|o| filter.matches(o)).cloned().collect())
    }

    async fn get_order(&self, order_id: &str) -> ClientResult<Order> {
        self.begin()?;
        self.orders
            .lock()
            .unwrap()
            .get(order_id)
            .cloned()
            .ok_or_else(|| AppError::order_not_found(order_id).into())
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        self.begin()?;
        let id = format!("O{}", self.orders.lock().unwrap().len() + 1);
        let items = request
            .items
            .iter()
            .enumerate()
            .map(|(i, it)| item(&format!("{id}-{i}"), &it.dish_id, it.quantity, it.unit_price))
            .collect();
        let order = Order::new(id, request.table_id.clone(), request.table_number, items, 0);
        self.insert(order.clone());
        Ok(order)
    }

    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<Order> {
        let role = self.role;
        self.update(order_id, |order| {
            order_transition(order.status, status, role)?;
            order.status = status;
            Ok(())
        })
    }

    async fn update_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> ClientResult<Order> {
        let role = self.role;
        self.update(order_id, |order| {
            let order_status = order.status;
            let item = order
                .item_mut(item_id)
                .ok_or_else(|| AppError::item_not_found(order_id, item_id))?;
            item_transition(order_status, item.status, status, role)?;
            item.status = status;
            order.recompute_totals();
            Ok(())
        })
    }

    async fn claim_order(&self, order_id: &str, waiter_id: &str) -> ClientResult<Order> {
        self.update(order_id, |order| {
            if let Some(current) = &order.waiter_id {
                return Err(AppError::already_claimed(current));
            }
            order.waiter_id = Some(waiter_id.to_string());
            Ok(())
        })
    }

    async fn call_staff(&self, request: &CallStaffNotification) -> ClientResult<()> {
        self.begin()?;
        self.calls.lock().unwrap().push(request.clone());
        Ok(())
    }
}
