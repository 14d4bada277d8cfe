//! Order listing and statistics DTOs

use super::snapshot::Order;
use super::types::{OrderStatus, PaymentStatus};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u32 = 50;
pub const MAX_PAGE_LIMIT: u32 = 200;

/// Order list filter (all fields optional, combined with AND)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub table_id: Option<String>,
    /// Waiter staff id
    #[serde(default)]
    pub waiter: Option<String>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// Inclusive lower bound on `created_at` (Unix millis)
    #[serde(default)]
    pub start: Option<i64>,
    /// Inclusive upper bound on `created_at` (Unix millis)
    #[serde(default)]
    pub end: Option<i64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.status.is_none_or(|s| order.status == s)
            && self
                .table_id
                .as_deref()
                .is_none_or(|t| order.table_id == t)
            && self.waiter.as_deref().is_none_or(|w| order.waiter.id == w)
            && self.payment_status.is_none_or(|p| order.payment_status == p)
            && self.in_range(order.created_at)
    }

    pub fn in_range(&self, created_at: i64) -> bool {
        self.start.is_none_or(|s| created_at >= s) && self.end.is_none_or(|e| created_at <= e)
    }

    /// 1-based page, clamped
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_orders: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RevenueStats {
    pub total_revenue: f64,
    pub avg_order_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaiterStats {
    pub waiter_id: String,
    pub waiter_name: String,
    pub order_count: usize,
    pub total_revenue: f64,
}

/// Order statistics summary (营业概览)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderSummary {
    pub total_orders: usize,
    pub active_orders: usize,
    pub completed_orders: usize,
    pub cancelled_orders: usize,
    pub revenue: RevenueStats,
    pub status_breakdown: Vec<StatusCount>,
    pub top_waiters: Vec<WaiterStats>,
}
