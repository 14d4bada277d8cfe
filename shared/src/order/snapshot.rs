//! Order aggregate state
//!
//! `Order.status` is a projection of its items: it is recomputed by
//! [`derive_status`] after every item change, except once the order has been
//! forced into a terminal status (SERVED / CANCELLED), which also forces every
//! item into that status.

use super::types::{
    DiscountKind, ItemStatus, OrderStatus, PaymentMethod, PaymentStatus,
};
use crate::models::StaffRef;
use serde::{Deserialize, Serialize};

/// Line item with name/price snapshot taken at order time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: String,
    pub menu_item_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: ItemStatus,
}

/// Order aggregate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order ID (UUID v4, assigned by server)
    pub id: String,
    /// Human-readable order code (`ORD...`)
    pub order_code: String,
    pub table_id: String,
    pub table_number: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_kind: Option<DiscountKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<f64>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub waiter: StaffRef,
    pub is_paid: bool,
    /// Minutes between entering PREPARING and reaching READY
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    /// When the order last entered PREPARING (Unix millis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparing_since: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Sequence of the last event that touched this order
    #[serde(default)]
    pub last_sequence: u64,
}

/// Derive the order status from its items
///
/// All items READY ⇒ READY; any item PREPARING or READY ⇒ PREPARING;
/// otherwise PENDING. An empty item list is PENDING.
pub fn derive_status(items: &[OrderItem]) -> OrderStatus {
    if !items.is_empty() && items.iter().all(|i| i.status == ItemStatus::Ready) {
        return OrderStatus::Ready;
    }
    if items
        .iter()
        .any(|i| matches!(i.status, ItemStatus::Preparing | ItemStatus::Ready))
    {
        return OrderStatus::Preparing;
    }
    OrderStatus::Pending
}

impl Order {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn find_item_mut(&mut self, item_id: &str) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    /// Recompute status from items and track the prep-time metric
    pub fn refresh_status(&mut self, now: i64) {
        if self.is_terminal() {
            return;
        }
        let previous = self.status;
        self.status = derive_status(&self.items);
        self.track_prep_time(previous, now);
    }

    /// Force a terminal status onto the order and every item
    pub fn force_terminal(&mut self, status: OrderStatus) {
        let item_status = match status {
            OrderStatus::Served => ItemStatus::Served,
            OrderStatus::Cancelled => ItemStatus::Cancelled,
            _ => return,
        };
        self.status = status;
        for item in &mut self.items {
            item.status = item_status;
        }
    }

    /// Record `preparing_since` on entering PREPARING and the elapsed
    /// minutes on PREPARING → READY
    pub fn track_prep_time(&mut self, previous: OrderStatus, now: i64) {
        match (previous, self.status) {
            (OrderStatus::Preparing, OrderStatus::Ready) => {
                let since = self.preparing_since.unwrap_or(self.updated_at);
                let minutes = (now - since).max(0) / 60_000;
                self.prep_time_minutes = Some(minutes as u32);
            }
            (p, OrderStatus::Preparing) if p != OrderStatus::Preparing => {
                self.preparing_since = Some(now);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StaffRole;

    fn item(id: &str, status: ItemStatus) -> OrderItem {
        OrderItem {
            id: id.to_string(),
            menu_item_id: "1".to_string(),
            name: "Margherita Pizza".to_string(),
            price: 299.0,
            quantity: 1,
            note: None,
            status,
        }
    }

    fn order(items: Vec<OrderItem>) -> Order {
        Order {
            id: "order-1".to_string(),
            order_code: "ORD2601010000010001".to_string(),
            table_id: "t1".to_string(),
            table_number: "01".to_string(),
            items,
            subtotal: 0.0,
            tax: 0.0,
            discount: 0.0,
            total: 0.0,
            discount_kind: None,
            discount_value: None,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            waiter: StaffRef::new("w1", "Asha", StaffRole::Waiter),
            is_paid: false,
            prep_time_minutes: None,
            preparing_since: None,
            created_at: 0,
            updated_at: 0,
            last_sequence: 0,
        }
    }

    #[test]
    fn test_derive_status_table() {
        use ItemStatus::*;
        let cases = [
            (vec![], OrderStatus::Pending),
            (vec![Pending, Pending], OrderStatus::Pending),
            (vec![Preparing, Pending], OrderStatus::Preparing),
            (vec![Ready, Pending], OrderStatus::Preparing),
            (vec![Ready, Preparing], OrderStatus::Preparing),
            (vec![Ready, Ready], OrderStatus::Ready),
            (vec![Ready], OrderStatus::Ready),
        ];
        for (statuses, expected) in cases {
            let items: Vec<_> = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| item(&format!("i{i}"), *s))
                .collect();
            assert_eq!(derive_status(&items), expected, "{statuses:?}");
        }
    }

    #[test]
    fn test_refresh_skips_terminal() {
        let mut o = order(vec![item("a", ItemStatus::Ready)]);
        o.force_terminal(OrderStatus::Cancelled);
        o.refresh_status(1000);
        assert_eq!(o.status, OrderStatus::Cancelled);
        assert_eq!(o.items[0].status, ItemStatus::Cancelled);
    }

    #[test]
    fn test_force_terminal_ignores_non_terminal() {
        let mut o = order(vec![item("a", ItemStatus::Pending)]);
        o.force_terminal(OrderStatus::Ready);
        assert_eq!(o.status, OrderStatus::Pending);
        assert_eq!(o.items[0].status, ItemStatus::Pending);
    }

    #[test]
    fn test_prep_time_recorded() {
        let mut o = order(vec![item("a", ItemStatus::Preparing)]);
        o.refresh_status(60_000);
        assert_eq!(o.status, OrderStatus::Preparing);
        assert_eq!(o.preparing_since, Some(60_000));

        o.items[0].status = ItemStatus::Ready;
        o.refresh_status(60_000 + 12 * 60_000 + 5_000);
        assert_eq!(o.status, OrderStatus::Ready);
        assert_eq!(o.prep_time_minutes, Some(12));
    }
}
