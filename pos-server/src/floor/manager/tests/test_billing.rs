use super::*;

// ========================================================================
// 支付
// ========================================================================

#[test]
fn test_pay_returns_change() {
    let manager = create_test_manager();
    // 299 + 5% = 313.95
    let order_id = place(&manager, "t1", &[("1", 1)]);

    let resp = run_ok(&manager, pay(&order_id, 500.0));
    assert_eq!(resp.order_id.as_deref(), Some(order_id.as_str()));
    assert_money(resp.change.expect("pay reports change"), 186.05);

    let paid = order(&manager, &order_id);
    assert!(paid.is_paid);
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.payment_method, Some(PaymentMethod::Cash));
    assert_eq!(paid.status, OrderStatus::Served);
    assert!(paid.items.iter().all(|i| i.status == ItemStatus::Served));
}

#[test]
fn test_pay_exact_amount() {
    let manager = create_test_manager();
    let order_id = place(&manager, "t1", &[("1", 1)]);
    let resp = run_ok(&manager, pay(&order_id, 313.95));
    assert_money(resp.change.unwrap_or(-1.0), 0.0);
}

#[test]
fn test_pay_guard_leaves_order_unpaid() {
    let manager = create_test_manager();
    let order_id = place(&manager, "t1", &[("1", 1)]);

    let code = run_err(&manager, pay(&order_id, 313.94));
    assert_eq!(code, ErrorCode::PaymentInsufficientAmount);
    assert_eq!(code.kind(), ErrorKind::Validation);

    let unpaid = order(&manager, &order_id);
    assert!(!unpaid.is_paid);
    assert_eq!(unpaid.payment_status, PaymentStatus::Unpaid);
    assert_eq!(unpaid.status, OrderStatus::Pending);
}

#[test]
fn test_pay_rejections() {
    let manager = create_test_manager();
    let order_id = place(&manager, "t1", &[("1", 1)]);

    assert_eq!(run_err(&manager, pay(&order_id, -5.0)), ErrorCode::ValueOutOfRange);
    assert_eq!(run_err(&manager, pay(&order_id, f64::NAN)), ErrorCode::ValueOutOfRange);
    assert_eq!(run_err(&manager, pay("ghost", 10.0)), ErrorCode::OrderNotFound);

    run_ok(&manager, pay(&order_id, 400.0));
    assert_eq!(run_err(&manager, pay(&order_id, 400.0)), ErrorCode::OrderAlreadyPaid);

    let other = place(&manager, "t2", &[("1", 1)]);
    run_ok(
        &manager,
        FloorCommandPayload::CancelOrder {
            order_id: other.clone(),
        },
    );
    assert_eq!(run_err(&manager, pay(&other, 400.0)), ErrorCode::OrderAlreadyCancelled);
}

#[test]
fn test_discount_after_payment_rejected() {
    let manager = create_test_manager();
    let order_id = place(&manager, "t1", &[("1", 1)]);
    run_ok(&manager, pay(&order_id, 400.0));

    let code = run_err(
        &manager,
        FloorCommandPayload::ApplyDiscount {
            order_id,
            kind: DiscountKind::Percentage,
            value: 10.0,
        },
    );
    assert_eq!(code, ErrorCode::OrderAlreadyPaid);
}

// ========================================================================
// 结账
// ========================================================================

#[test]
fn test_finalize_empty_table_is_explicit_noop() {
    let manager = create_test_manager();
    let before = manager.get_current_sequence().unwrap();

    let resp = run_ok(&manager, finalize("t1"));
    assert!(resp.is_noop());
    assert!(resp.noop.as_deref().unwrap_or_default().contains("t1"));
    assert_eq!(manager.get_current_sequence().unwrap(), before);
}

#[test]
fn test_finalize_marks_paid_and_releases() {
    let manager = create_test_manager();
    let order_id = place(&manager, "t2", &[("2", 2)]);

    let resp = run_ok(&manager, finalize("t2"));
    assert_eq!(resp.order_id.as_deref(), Some(order_id.as_str()));
    assert_eq!(resp.table_ids, vec!["t2"]);

    let closed = order(&manager, &order_id);
    assert!(closed.is_paid);
    assert_eq!(closed.payment_status, PaymentStatus::Paid);
    assert_eq!(closed.status, OrderStatus::Served);

    let released = table(&manager, "t2");
    assert_eq!(released.status, TableStatus::Available);
    assert!(released.current_order_id.is_none());

    // Finalizing again has nothing left to do
    assert!(run_ok(&manager, finalize("t2")).is_noop());
}

#[test]
fn test_finalize_after_payment_keeps_payment_method() {
    let manager = create_test_manager();
    let order_id = place(&manager, "t2", &[("2", 1)]);
    run_ok(
        &manager,
        FloorCommandPayload::PayOrder {
            order_id: order_id.clone(),
            method: PaymentMethod::Upi,
            amount_tendered: 300.0,
        },
    );
    run_ok(&manager, finalize("t2"));

    let closed = order(&manager, &order_id);
    assert_eq!(closed.payment_method, Some(PaymentMethod::Upi));
    assert_eq!(table(&manager, "t2").status, TableStatus::Available);
}

#[test]
fn test_finalize_cancelled_order_frees_table() {
    let manager = create_test_manager();
    let order_id = place(&manager, "t3", &[("7", 3)]);
    run_ok(
        &manager,
        FloorCommandPayload::CancelOrder {
            order_id: order_id.clone(),
        },
    );

    run_ok(&manager, finalize("t3"));
    let closed = order(&manager, &order_id);
    assert_eq!(closed.status, OrderStatus::Cancelled);
    assert!(!closed.is_paid);
    assert_eq!(table(&manager, "t3").status, TableStatus::Available);
}

#[test]
fn test_finalize_split_child_waits_for_siblings() {
    let manager = create_test_manager();
    run_ok(&manager, split("t11", 2));
    place(&manager, "split-t11-0", &[("1", 1)]);
    place(&manager, "split-t11-1", &[("2", 1)]);

    let resp = run_ok(&manager, finalize("split-t11-0"));
    assert_eq!(resp.table_ids, vec!["split-t11-0"]);
    assert!(table(&manager, "t11").is_split());
    let child = table(&manager, "split-t11-0");
    assert_eq!(child.status, TableStatus::Available);
    assert_eq!(child.parent_id(), Some("t11"));

    // Last child billed: the parent comes back
    let resp = run_ok(&manager, finalize("split-t11-1"));
    assert_eq!(resp.table_ids, vec!["split-t11-1", "t11"]);
    let parent = table(&manager, "t11");
    assert!(parent.is_primitive());
    assert_eq!(parent.capacity, 8);
    assert!(manager.get_table("split-t11-0").unwrap().is_none());
    assert!(manager.get_table("split-t11-1").unwrap().is_none());
}

// ========================================================================
// 作废
// ========================================================================

#[test]
fn test_void_paid_order_refunds() {
    let manager = create_test_manager();
    let order_id = place(&manager, "t5", &[("3", 1)]);
    run_ok(&manager, finalize("t5"));

    run_ok(
        &manager,
        FloorCommandPayload::VoidOrder {
            order_id: order_id.clone(),
        },
    );
    let voided = order(&manager, &order_id);
    assert_eq!(voided.status, OrderStatus::Cancelled);
    assert_eq!(voided.payment_status, PaymentStatus::Refunded);
    assert!(!voided.is_paid);
    // Tables are not touched by a void
    assert_eq!(table(&manager, "t5").status, TableStatus::Available);

    let events = manager.get_events_since(0).unwrap();
    let last = events.last().expect("void recorded an event");
    assert_eq!(
        last.payload,
        EventPayload::OrderVoided {
            order_id,
            refunded: true
        }
    );
}

#[test]
fn test_void_requires_settled_order() {
    let manager = create_test_manager();
    let order_id = place(&manager, "t5", &[("3", 1)]);
    let code = run_err(&manager, FloorCommandPayload::VoidOrder { order_id });
    assert_eq!(code, ErrorCode::OrderNotSettled);
    assert_eq!(code.kind(), ErrorKind::Conflict);
}
