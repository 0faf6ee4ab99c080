//! SARIMA configurations and the grid they are drawn from.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{ForecastError, Result};

/// Model order (p, d, q)(P, D, Q)\[s\].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SarimaOrder {
    /// Non-seasonal AR order.
    pub p: usize,
    /// Non-seasonal differencing order.
    pub d: usize,
    /// Non-seasonal MA order.
    pub q: usize,
    /// Seasonal AR order.
    pub cap_p: usize,
    /// Seasonal differencing order.
    pub cap_d: usize,
    /// Seasonal MA order.
    pub cap_q: usize,
    /// Seasonal period.
    pub s: usize,
}

impl SarimaOrder {
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        cap_p: usize,
        cap_d: usize,
        cap_q: usize,
        s: usize,
    ) -> Self {
        Self {
            p,
            d,
            q,
            cap_p,
            cap_d,
            cap_q,
            s,
        }
    }

    /// Whether any seasonal AR, differencing or MA term is present.
    pub fn has_seasonal_terms(&self) -> bool {
        self.cap_p > 0 || self.cap_d > 0 || self.cap_q > 0
    }

    /// Number of AR and MA coefficients to estimate.
    pub fn num_coefficients(&self) -> usize {
        self.p + self.q + self.cap_p + self.cap_q
    }

    /// Observations consumed by differencing.
    pub fn differencing_lag(&self) -> usize {
        self.d + self.cap_d * self.s
    }
}

impl fmt::Display for SarimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SARIMA({},{},{})({},{},{})[{}]",
            self.p, self.d, self.q, self.cap_p, self.cap_d, self.cap_q, self.s
        )
    }
}

/// Orders held constant across the whole search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOrders {
    /// Non-seasonal differencing order.
    pub d: usize,
    /// Seasonal differencing order.
    pub cap_d: usize,
    /// Seasonal period.
    pub s: usize,
}

impl Default for FixedOrders {
    fn default() -> Self {
        Self {
            d: 1,
            cap_d: 1,
            s: 12,
        }
    }
}

impl FixedOrders {
    pub fn new(d: usize, cap_d: usize, s: usize) -> Self {
        Self { d, cap_d, s }
    }
}

/// Inclusive ranges searched for p, q, P and Q.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpace {
    /// Non-seasonal AR orders.
    pub p: RangeInclusive<usize>,
    /// Non-seasonal MA orders.
    pub q: RangeInclusive<usize>,
    /// Seasonal AR orders.
    pub cap_p: RangeInclusive<usize>,
    /// Seasonal MA orders.
    pub cap_q: RangeInclusive<usize>,
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            p: 1..=4,
            q: 1..=4,
            cap_p: 1..=2,
            cap_q: 1..=2,
        }
    }
}

impl SearchSpace {
    /// Set non-seasonal ranges.
    pub fn with_non_seasonal(
        mut self,
        p: RangeInclusive<usize>,
        q: RangeInclusive<usize>,
    ) -> Self {
        self.p = p;
        self.q = q;
        self
    }

    /// Set seasonal ranges.
    pub fn with_seasonal(
        mut self,
        cap_p: RangeInclusive<usize>,
        cap_q: RangeInclusive<usize>,
    ) -> Self {
        self.cap_p = cap_p;
        self.cap_q = cap_q;
        self
    }

    /// A space containing exactly one configuration.
    pub fn single(p: usize, q: usize, cap_p: usize, cap_q: usize) -> Self {
        Self {
            p: p..=p,
            q: q..=q,
            cap_p: cap_p..=cap_p,
            cap_q: cap_q..=cap_q,
        }
    }

    /// Number of configurations in the grid.
    pub fn size(&self) -> usize {
        [&self.p, &self.q, &self.cap_p, &self.cap_q]
            .into_iter()
            .map(|r| r.clone().count())
            .product()
    }

    /// Reject empty ranges.
    pub fn validate(&self) -> Result<()> {
        for (name, range) in [
            ("p", &self.p),
            ("q", &self.q),
            ("P", &self.cap_p),
            ("Q", &self.cap_q),
        ] {
            if range.is_empty() {
                return Err(ForecastError::InvalidParameter(format!(
                    "search range for {name} is empty ({}..={})",
                    range.start(),
                    range.end()
                )));
            }
        }
        Ok(())
    }

    /// Every configuration of the grid: p outermost, then q, then P, then Q.
    pub fn orders(&self, fixed: FixedOrders) -> Vec<SarimaOrder> {
        let mut orders = Vec::with_capacity(self.size());
        for p in self.p.clone() {
            for q in self.q.clone() {
                for cap_p in self.cap_p.clone() {
                    for cap_q in self.cap_q.clone() {
                        orders.push(SarimaOrder::new(
                            p,
                            fixed.d,
                            q,
                            cap_p,
                            fixed.cap_d,
                            cap_q,
                            fixed.s,
                        ));
                    }
                }
            }
        }
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_grid_has_64_distinct_orders() {
        let space = SearchSpace::default();
        let orders = space.orders(FixedOrders::default());

        assert_eq!(space.size(), 64);
        assert_eq!(orders.len(), 64);

        let unique: HashSet<_> = orders.iter().collect();
        assert_eq!(unique.len(), 64);

        for order in &orders {
            assert!((1..=4).contains(&order.p));
            assert!((1..=4).contains(&order.q));
            assert!((1..=2).contains(&order.cap_p));
            assert!((1..=2).contains(&order.cap_q));
            assert_eq!((order.d, order.cap_d, order.s), (1, 1, 12));
        }
    }

    #[test]
    fn enumeration_order_is_p_q_cap_p_cap_q() {
        let orders = SearchSpace::default().orders(FixedOrders::default());
        let tuples: Vec<_> = orders
            .iter()
            .take(5)
            .map(|o| (o.p, o.q, o.cap_p, o.cap_q))
            .collect();
        assert_eq!(
            tuples,
            vec![(1, 1, 1, 1), (1, 1, 1, 2), (1, 1, 2, 1), (1, 1, 2, 2), (1, 2, 1, 1)]
        );

        let last = orders.last().unwrap();
        assert_eq!((last.p, last.q, last.cap_p, last.cap_q), (4, 4, 2, 2));
    }

    #[test]
    fn smaller_spaces() {
        let space = SearchSpace::default()
            .with_non_seasonal(0..=1, 1..=1)
            .with_seasonal(0..=0, 0..=1);
        assert_eq!(space.size(), 4);
        assert_eq!(space.orders(FixedOrders::new(0, 0, 4)).len(), 4);

        assert_eq!(SearchSpace::single(2, 1, 1, 0).size(), 1);
    }

    #[test]
    fn empty_range_is_rejected() {
        #[allow(clippy::reversed_empty_ranges)]
        let space = SearchSpace::default().with_non_seasonal(3..=1, 1..=2);
        assert_eq!(space.size(), 0);
        assert!(matches!(
            space.validate(),
            Err(ForecastError::InvalidParameter(msg)) if msg.contains("for p")
        ));
        assert!(SearchSpace::default().validate().is_ok());
    }

    #[test]
    fn order_accessors() {
        let order = SarimaOrder::new(2, 1, 3, 1, 1, 2, 12);
        assert_eq!(order.num_coefficients(), 8);
        assert_eq!(order.differencing_lag(), 13);
        assert!(order.has_seasonal_terms());
        assert!(!SarimaOrder::new(1, 1, 1, 0, 0, 0, 12).has_seasonal_terms());
        assert_eq!(order.to_string(), "SARIMA(2,1,3)(1,1,2)[12]");
    }
}
