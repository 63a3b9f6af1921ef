//! Domain Value Objects
//!
//! Immutable value types for the purchase domain.

use kernel::id::ChapterId;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Tolerance used when comparing a client-claimed amount to the server total
pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// Amount in major currency units (e.g. rupees), as stored on chapters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Money(f64);

impl Money {
    pub const ZERO: Money = Money(0.0);

    /// Rejects NaN, infinities and negative values
    pub fn new(amount: f64) -> Option<Self> {
        if amount.is_finite() && amount >= 0.0 {
            Some(Self(amount))
        } else {
            None
        }
    }

    pub fn amount(&self) -> f64 {
        self.0
    }

    /// Integer minor units (paise/cents) as the gateway expects
    pub fn to_minor_units(&self) -> i64 {
        (self.0 * 100.0).round() as i64
    }

    /// True when the two amounts differ by no more than `tolerance`
    pub fn approx_eq(&self, other: Money, tolerance: f64) -> bool {
        (self.0 - other.0).abs() <= tolerance
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Why a chapter selection was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    Empty,
    TooMany { max: usize, actual: usize },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::Empty => f.write_str("At least one chapter is required"),
            SelectionError::TooMany { max, actual } => {
                write!(f, "At most {max} chapters per order (got {actual})")
            }
        }
    }
}

/// Non-empty, de-duplicated set of chapters in request order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSelection(Vec<ChapterId>);

impl ChapterSelection {
    pub fn new(ids: Vec<ChapterId>, max: usize) -> Result<Self, SelectionError> {
        let mut unique: Vec<ChapterId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        if unique.is_empty() {
            return Err(SelectionError::Empty);
        }
        if unique.len() > max {
            return Err(SelectionError::TooMany {
                max,
                actual: unique.len(),
            });
        }

        Ok(Self(unique))
    }

    pub fn ids(&self) -> &[ChapterId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ChapterId> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_rejects_invalid() {
        assert!(Money::new(f64::NAN).is_none());
        assert!(Money::new(f64::INFINITY).is_none());
        assert!(Money::new(-1.0).is_none());
        assert!(Money::new(0.0).is_some());
    }

    #[test]
    fn test_minor_units_rounding() {
        assert_eq!(Money(99.0).to_minor_units(), 9900);
        assert_eq!(Money(19.99).to_minor_units(), 1999);
        assert_eq!(Money(0.1 + 0.2).to_minor_units(), 30);
    }

    #[test]
    fn test_sum_and_display() {
        let total: Money = [Money(10.5), Money(20.25), Money(0.0)].into_iter().sum();
        assert_eq!(total.to_string(), "30.75");
    }

    #[test]
    fn test_approx_eq() {
        assert!(Money(99.0).approx_eq(Money(99.005), AMOUNT_TOLERANCE));
        assert!(!Money(99.0).approx_eq(Money(99.05), AMOUNT_TOLERANCE));
    }

    #[test]
    fn test_selection_dedupes_in_order() {
        let a = ChapterId::new();
        let b = ChapterId::new();
        let selection = ChapterSelection::new(vec![a, b, a], 10).unwrap();
        assert_eq!(selection.ids(), &[a, b]);
    }

    #[test]
    fn test_selection_limits() {
        assert_eq!(
            ChapterSelection::new(vec![], 10),
            Err(SelectionError::Empty)
        );

        let ids: Vec<ChapterId> = (0..3).map(|_| ChapterId::new()).collect();
        assert_eq!(
            ChapterSelection::new(ids, 2),
            Err(SelectionError::TooMany { max: 2, actual: 3 })
        );
    }
}
