//! Price chart sampling.
//!
//! A [`PriceCurve`] is a small `Copy` descriptor; iterating it evaluates the
//! curve lazily, and it can be iterated any number of times.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::curve::config::CurveConfig;
use crate::curve::engine::current_price;
use crate::errors::CoreResult;
use crate::math::{mul_div, Rounding};

/// One chart sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PricePoint {
    /// Real supply minted at this point
    pub supply: u128,
    /// Marginal price (scaled by PRICE_SCALE)
    pub price: u128,
}

/// Evenly spaced samples of a collection's price curve.
///
/// Sample `i` sits at supply `i * span / divisor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCurve {
    config: CurveConfig,
    span: u128,
    divisor: u128,
    len: usize,
}

impl PriceCurve {
    /// `steps + 1` samples from zero up to and including `max_supply`.
    ///
    /// Points at or beyond the virtual supply yield `InsufficientLiquidity`.
    pub fn over(config: &CurveConfig, max_supply: u128, steps: usize) -> Self {
        Self {
            config: *config,
            span: max_supply,
            divisor: steps as u128,
            len: steps.saturating_add(1),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Supply of sample `index`
    pub fn supply_at(&self, index: usize) -> CoreResult<u128> {
        if self.divisor == 0 {
            return Ok(0);
        }
        mul_div(index as u128, self.span, self.divisor, Rounding::Down)
    }

    /// Evaluate sample `index`
    pub fn point(&self, index: usize) -> CoreResult<PricePoint> {
        let supply = self.supply_at(index)?;
        Ok(PricePoint {
            supply,
            price: current_price(&self.config, supply)?,
        })
    }

    pub fn iter(&self) -> PriceCurveIter {
        PriceCurveIter {
            curve: *self,
            next: 0,
        }
    }
}

impl IntoIterator for PriceCurve {
    type Item = CoreResult<PricePoint>;
    type IntoIter = PriceCurveIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &PriceCurve {
    type Item = CoreResult<PricePoint>;
    type IntoIter = PriceCurveIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`PriceCurve`]
#[derive(Debug, Clone)]
pub struct PriceCurveIter {
    curve: PriceCurve,
    next: usize,
}

impl Iterator for PriceCurveIter {
    type Item = CoreResult<PricePoint>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.curve.len {
            return None;
        }
        let point = self.curve.point(self.next);
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.curve.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PriceCurveIter {}

/// `sample_count` samples across the whole virtual supply, starting at zero
/// and stopping short of the supply ceiling where the price is undefined.
pub fn preview_price_curve(config: &CurveConfig, sample_count: usize) -> PriceCurve {
    PriceCurve {
        config: *config,
        span: config.virtual_supply,
        divisor: sample_count as u128,
        len: sample_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_samples_whole_supply() {
        let config = CurveConfig::default();
        let curve = preview_price_curve(&config, 4);
        assert_eq!(curve.len(), 4);

        let points: Vec<PricePoint> = curve.iter().collect::<CoreResult<_>>().unwrap();
        let supplies: Vec<u128> = points.iter().map(|p| p.supply).collect();
        assert_eq!(supplies, vec![0, 250_000_000, 500_000_000, 750_000_000]);

        assert_eq!(points[0].price, 30_000_000);
        assert_eq!(points[1].price, 53_333_333);
        assert_eq!(points[2].price, 120_000_000);
        assert_eq!(points[3].price, 480_000_000);
    }

    #[test]
    fn test_curve_is_restartable() {
        let config = CurveConfig::default();
        let curve = preview_price_curve(&config, 10);

        let first: Vec<_> = curve.iter().collect();
        let second: Vec<_> = (&curve).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(curve.iter().len(), 10);
    }

    #[test]
    fn test_empty_and_window() {
        let config = CurveConfig::default();
        assert_eq!(preview_price_curve(&config, 0).iter().count(), 0);

        let window = PriceCurve::over(&config, 1_000, 100);
        assert_eq!(window.len(), 101);
        let last = window.iter().last().unwrap().unwrap();
        assert_eq!(last.supply, 1_000);

        let single = PriceCurve::over(&config, 1_000, 0);
        let points: Vec<_> = single.iter().collect();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].as_ref().unwrap().supply, 0);
    }

    #[test]
    fn test_window_past_supply_reports_error() {
        let config = CurveConfig::default();
        let curve = PriceCurve::over(&config, config.virtual_supply, 2);
        let points: Vec<_> = curve.iter().collect();
        assert!(points[1].is_ok());
        assert!(points[2].is_err());
    }
}
