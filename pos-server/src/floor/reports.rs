//! Order listing and statistics (营业统计)
//!
//! Pure functions over order snapshots; the manager loads the orders and
//! hands them in.

use crate::order_money::{to_decimal, to_f64};
use rust_decimal::Decimal;
use shared::order::{
    Order, OrderFilter, OrderPage, OrderStatus, OrderSummary, Pagination, RevenueStats,
    StatusCount, WaiterStats,
};
use std::collections::HashMap;

const TOP_WAITER_LIMIT: usize = 5;

const STATUS_ORDER: [OrderStatus; 6] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::Served,
    OrderStatus::Cancelled,
];

/// Filter, sort newest first and cut one page
pub fn paginate(orders: Vec<Order>, filter: &OrderFilter) -> OrderPage {
    let mut matched: Vec<Order> = orders.into_iter().filter(|o| filter.matches(o)).collect();
    matched.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.order_code.cmp(&a.order_code))
    });

    let page = filter.page();
    let limit = filter.limit();
    let total_orders = matched.len();
    let total_pages = total_orders.div_ceil(limit as usize) as u32;
    let skip = (page as usize - 1) * limit as usize;
    let orders = matched.into_iter().skip(skip).take(limit as usize).collect();

    OrderPage {
        orders,
        pagination: Pagination {
            current_page: page,
            total_pages,
            total_orders,
            has_next: page < total_pages,
            has_prev: page > 1,
        },
    }
}

/// Summary over the given orders
pub fn summarize(orders: &[Order]) -> OrderSummary {
    let count = |pred: &dyn Fn(&Order) -> bool| orders.iter().filter(|o| pred(o)).count();

    let paid: Vec<Decimal> = orders
        .iter()
        .filter(|o| o.is_paid)
        .map(|o| to_decimal(o.total))
        .collect();
    let total_revenue: Decimal = paid.iter().sum();
    let avg_order_value = if paid.is_empty() {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(paid.len())
    };

    let status_breakdown = STATUS_ORDER
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: count(&|o: &Order| o.status == *status),
        })
        .filter(|s| s.count > 0)
        .collect();

    OrderSummary {
        total_orders: orders.len(),
        active_orders: count(&|o: &Order| {
            matches!(
                o.status,
                OrderStatus::Pending
                    | OrderStatus::Confirmed
                    | OrderStatus::Preparing
                    | OrderStatus::Ready
            )
        }),
        completed_orders: count(&|o: &Order| o.status == OrderStatus::Served),
        cancelled_orders: count(&|o: &Order| o.status == OrderStatus::Cancelled),
        revenue: RevenueStats {
            total_revenue: to_f64(total_revenue),
            avg_order_value: to_f64(avg_order_value),
        },
        status_breakdown,
        top_waiters: top_waiters(orders),
    }
}

/// Waiters ranked by served orders, then by revenue
fn top_waiters(orders: &[Order]) -> Vec<WaiterStats> {
    let mut by_waiter: HashMap<&str, (&str, usize, Decimal)> = HashMap::new();
    for order in orders.iter().filter(|o| o.status == OrderStatus::Served) {
        let entry = by_waiter
            .entry(order.waiter.id.as_str())
            .or_insert((order.waiter.name.as_str(), 0, Decimal::ZERO));
        entry.1 += 1;
        entry.2 += to_decimal(order.total);
    }

    let mut ranked: Vec<_> = by_waiter.into_iter().collect();
    ranked.sort_by(|(a_id, a), (b_id, b)| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a_id.cmp(b_id))
    });

    ranked
        .into_iter()
        .take(TOP_WAITER_LIMIT)
        .map(|(id, (name, order_count, revenue))| WaiterStats {
            waiter_id: id.to_string(),
            waiter_name: name.to_string(),
            order_count,
            total_revenue: to_f64(revenue),
        })
        .collect()
}
