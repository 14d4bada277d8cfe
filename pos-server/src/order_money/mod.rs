//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.
//!
//! Totals rule:
//! - subtotal = Σ price × quantity over every line
//! - tax      = round(subtotal × TAX_RATE) (computed before the discount)
//! - total    = subtotal + tax − discount

use crate::floor::traits::FloorError;
use rust_decimal::prelude::*;
use shared::order::{DiscountKind, Order, OrderItem};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Sales tax rate (5%)
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Maximum allowed payment amount
const MAX_PAYMENT_AMOUNT: f64 = 1_000_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), FloorError> {
    if !value.is_finite() {
        return Err(FloorError::InvalidAmount(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Non-finite input is logged and treated as zero; callers validate input
/// with [`require_finite`] before it reaches here.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = %value, "Failed to convert f64 to Decimal, using ZERO");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_else(|| {
            tracing::error!(value = %value, "Failed to convert Decimal to f64, using 0.0");
            0.0
        })
}

/// Line total: price × quantity
pub fn line_total(item: &OrderItem) -> Decimal {
    to_decimal(item.price) * Decimal::from(item.quantity)
}

/// Sum of every line
pub fn calculate_subtotal(items: &[OrderItem]) -> Decimal {
    items.iter().map(line_total).sum()
}

/// Discount amount for a subtotal
///
/// Percentage must be within 0..=100, a fixed amount within 0..=subtotal.
pub fn calculate_discount(
    subtotal: Decimal,
    kind: DiscountKind,
    value: f64,
) -> Result<Decimal, FloorError> {
    require_finite(value, "discount value")?;
    let value = to_decimal(value);
    match kind {
        DiscountKind::Percentage => {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(FloorError::DiscountOutOfRange(format!(
                    "percentage must be between 0 and 100, got {}",
                    value
                )));
            }
            Ok(subtotal * value / Decimal::ONE_HUNDRED)
        }
        DiscountKind::Amount => {
            if value < Decimal::ZERO || value > subtotal {
                return Err(FloorError::DiscountOutOfRange(format!(
                    "amount must be between 0 and {}, got {}",
                    to_f64(subtotal),
                    value
                )));
            }
            Ok(value)
        }
    }
}

/// Recalculate subtotal, tax, discount and total of an order in place
///
/// A stored percentage discount is re-applied to the current subtotal; a
/// fixed amount is capped at the subtotal.
///
/// Tax and discount are rounded before the total is summed, so the stored
/// `subtotal + tax - discount` always equals the stored `total`.
pub fn recalculate_totals(order: &mut Order) {
    let subtotal = round_money(calculate_subtotal(&order.items));
    let tax = round_money(subtotal * TAX_RATE);
    let discount = round_money(match (order.discount_kind, order.discount_value) {
        (Some(DiscountKind::Percentage), Some(pct)) => {
            subtotal * to_decimal(pct) / Decimal::ONE_HUNDRED
        }
        (Some(DiscountKind::Amount), Some(amount)) => to_decimal(amount).min(subtotal),
        _ => Decimal::ZERO,
    });
    let total = (subtotal + tax - discount).max(Decimal::ZERO);

    order.subtotal = to_f64(subtotal);
    order.tax = to_f64(tax);
    order.discount = to_f64(discount);
    order.total = to_f64(total);
}

/// Validate a tendered payment amount
pub fn validate_tendered(amount: f64) -> Result<(), FloorError> {
    require_finite(amount, "amount_tendered")?;
    if amount < 0.0 {
        return Err(FloorError::InvalidAmount(format!(
            "amount_tendered must be non-negative, got {}",
            amount
        )));
    }
    if amount > MAX_PAYMENT_AMOUNT {
        return Err(FloorError::InvalidAmount(format!(
            "amount_tendered exceeds maximum allowed ({}), got {}",
            MAX_PAYMENT_AMOUNT, amount
        )));
    }
    Ok(())
}

/// Check if a tendered amount covers the total (compared at 2 places)
pub fn is_payment_sufficient(tendered: f64, total: f64) -> bool {
    round_money(to_decimal(tendered)) >= round_money(to_decimal(total))
}

#[inline]
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Change returned to the guest, never negative
pub fn calculate_change(tendered: f64, total: f64) -> f64 {
    to_f64((to_decimal(tendered) - to_decimal(total)).max(Decimal::ZERO))
}

/// Compare two monetary values for equality (within tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() < MONEY_TOLERANCE
}
