use crate::errors::CheckoutError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seller-side order lifecycle. `Completed` and `Cancelled` are terminal;
/// cancellation is only reachable before the vendor starts preparing the
/// order (`Pending` or `Confirmed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipping,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "processing" => Some(OrderStatus::Processing),
            "shipping" => Some(OrderStatus::Shipping),
            "delivered" => Some(OrderStatus::Delivered),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn allowed_next(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Confirmed, OrderStatus::Cancelled],
            OrderStatus::Confirmed => &[OrderStatus::Processing, OrderStatus::Cancelled],
            OrderStatus::Processing => &[OrderStatus::Shipping],
            OrderStatus::Shipping => &[OrderStatus::Delivered],
            OrderStatus::Delivered => &[OrderStatus::Completed],
            OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.allowed_next().contains(&target)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure transition check. Authorization (who may drive which edge) and
/// persistence of the resulting status are the caller's concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderStatusMachine;

impl OrderStatusMachine {
    pub fn transition(
        current: OrderStatus,
        target: OrderStatus,
    ) -> Result<OrderStatus, CheckoutError> {
        if current.can_transition_to(target) {
            Ok(target)
        } else {
            Err(CheckoutError::IllegalTransition {
                from: current,
                to: target,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_happy_path_reaches_completed() {
        let mut status = OrderStatus::Pending;
        for next in [
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipping,
            OrderStatus::Delivered,
            OrderStatus::Completed,
        ] {
            status = OrderStatusMachine::transition(status, next).unwrap();
        }
        assert_eq!(status, OrderStatus::Completed);
        assert!(status.is_terminal());
    }

    #[test]
    fn pending_cannot_skip_to_shipping() {
        let result = OrderStatusMachine::transition(OrderStatus::Pending, OrderStatus::Shipping);
        assert_eq!(
            result,
            Err(CheckoutError::IllegalTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Shipping,
            })
        );
    }

    #[test]
    fn cancellation_only_before_processing() {
        assert!(OrderStatusMachine::transition(OrderStatus::Pending, OrderStatus::Cancelled).is_ok());
        assert!(
            OrderStatusMachine::transition(OrderStatus::Confirmed, OrderStatus::Cancelled).is_ok()
        );
        for from in [
            OrderStatus::Processing,
            OrderStatus::Shipping,
            OrderStatus::Delivered,
            OrderStatus::Completed,
        ] {
            assert!(
                OrderStatusMachine::transition(from, OrderStatus::Cancelled).is_err(),
                "cancel from {from} should be rejected"
            );
        }
    }

    #[test]
    fn terminal_states_allow_nothing() {
        for from in [OrderStatus::Completed, OrderStatus::Cancelled] {
            for to in [
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Processing,
                OrderStatus::Shipping,
                OrderStatus::Delivered,
                OrderStatus::Completed,
                OrderStatus::Cancelled,
            ] {
                assert!(OrderStatusMachine::transition(from, to).is_err());
            }
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipping,
            OrderStatus::Delivered,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("refunded"), None);
    }
}
