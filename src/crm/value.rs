use crate::shared::models::{CrmDeal, CrmDealProduct};

/// Deal value: line items override the flat value. Per line the discount is
/// an absolute amount applied once, not a fraction. Same-currency
/// arithmetic, no rounding beyond f64.
pub fn calculate_deal_value(deal: &CrmDeal, products: &[CrmDealProduct]) -> f64 {
    if products.is_empty() {
        return deal.value;
    }
    products
        .iter()
        .map(|p| f64::from(p.quantity) * p.unit_price - p.discount)
        .sum()
}

/// One additional proportional discount (0-100) on a computed total. A 100%
/// discount yields exactly zero.
pub fn apply_discount(total: f64, percent: f64) -> f64 {
    if percent >= 100.0 {
        return 0.0;
    }
    if percent <= 0.0 {
        return total;
    }
    total * (1.0 - percent / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::test_fixtures;
    use uuid::Uuid;

    #[test]
    fn flat_value_without_line_items() {
        let mut deal = test_fixtures::deal(Uuid::new_v4());
        deal.value = 1500.0;
        assert_eq!(calculate_deal_value(&deal, &[]), 1500.0);
    }

    #[test]
    fn line_items_override_flat_value() {
        let mut deal = test_fixtures::deal(Uuid::new_v4());
        deal.value = 99.0;
        let products = vec![
            test_fixtures::product(deal.id, 2, 100.0, 0.0),
            test_fixtures::product(deal.id, 1, 500.0, 0.0),
        ];
        assert_eq!(calculate_deal_value(&deal, &products), 700.0);
    }

    #[test]
    fn line_discount_is_absolute_and_per_line() {
        let deal = test_fixtures::deal(Uuid::new_v4());
        let products = vec![
            test_fixtures::product(deal.id, 3, 200.0, 50.0),
            test_fixtures::product(deal.id, 1, 100.0, 25.0),
        ];
        assert_eq!(calculate_deal_value(&deal, &products), 550.0 + 75.0);
    }

    #[test]
    fn proportional_discount() {
        assert_eq!(apply_discount(1000.0, 20.0), 800.0);
        assert_eq!(apply_discount(1000.0, 0.0), 1000.0);
    }

    #[test]
    fn full_discount_is_exactly_zero() {
        assert_eq!(apply_discount(1000.0, 100.0), 0.0);
        assert_eq!(apply_discount(333.33, 150.0), 0.0);
    }
}
