//! DPP and PPN calculation keyed on the invoice-code prefix.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ExtractionError;
use crate::models::invoice::TaxOutcome;

/// PPN rate (12%).
pub const PPN_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// Tax formula selected by the first two characters of the serial code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxFormula {
    /// Kode 01: DPP is the price, PPN is 12% of it.
    FullPrice,
    /// Kode 05: DPP is the price, PPN is 12% of 11/12 of it.
    FullPriceOtherValue,
    /// Any other code: DPP is 11/12 of the price, PPN is 12% of DPP.
    OtherValue,
}

impl TaxFormula {
    /// Formula for an invoice-code prefix; unknown prefixes use [`TaxFormula::OtherValue`].
    pub fn for_prefix(prefix: &str) -> Self {
        match prefix {
            "01" => TaxFormula::FullPrice,
            "05" => TaxFormula::FullPriceOtherValue,
            _ => TaxFormula::OtherValue,
        }
    }
}

fn round_units(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn overflow(price: Decimal) -> ExtractionError {
    ExtractionError::InvalidTaxBase(format!("{} is out of range", price))
}

/// Compute (DPP, PPN) in whole currency units.
///
/// The price must be a non-negative whole amount.
pub fn try_compute_tax(price: Decimal, prefix: &str) -> Result<(Decimal, Decimal), ExtractionError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ExtractionError::InvalidTaxBase(format!("{} is negative", price)));
    }
    if !price.fract().is_zero() {
        return Err(ExtractionError::InvalidTaxBase(format!("{} is not a whole amount", price)));
    }

    let eleven = Decimal::from(11);
    let twelve = Decimal::from(12);
    let hundred = Decimal::ONE_HUNDRED;

    let (dpp, ppn) = match TaxFormula::for_prefix(prefix) {
        TaxFormula::FullPrice => {
            let ppn = price.checked_mul(PPN_RATE).ok_or_else(|| overflow(price))?;
            (price, round_units(ppn))
        }
        TaxFormula::FullPriceOtherValue => {
            // 11/12 x 12% is exactly 11%.
            let ppn = price
                .checked_mul(eleven)
                .and_then(|v| v.checked_div(hundred))
                .ok_or_else(|| overflow(price))?;
            (price, round_units(ppn))
        }
        TaxFormula::OtherValue => {
            let dpp = price
                .checked_mul(eleven)
                .and_then(|v| v.checked_div(twelve))
                .map(round_units)
                .ok_or_else(|| overflow(price))?;
            let ppn = dpp.checked_mul(PPN_RATE).ok_or_else(|| overflow(price))?;
            (dpp, round_units(ppn))
        }
    };

    Ok((dpp.normalize(), ppn.normalize()))
}

/// Compute DPP and PPN, recovering any failure as [`TaxOutcome::NotComputed`].
pub fn compute_tax(price: Decimal, prefix: &str) -> TaxOutcome {
    match try_compute_tax(price, prefix) {
        Ok((dpp, ppn)) => TaxOutcome::Computed { dpp, ppn },
        Err(e) => {
            tracing::debug!("Tax not computed: {}", e);
            TaxOutcome::NotComputed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn computed(dpp: i64, ppn: i64) -> TaxOutcome {
        TaxOutcome::Computed {
            dpp: Decimal::from(dpp),
            ppn: Decimal::from(ppn),
        }
    }

    #[test]
    fn test_prefix_01() {
        assert_eq!(compute_tax(Decimal::from(1_000_000), "01"), computed(1_000_000, 120_000));
    }

    #[test]
    fn test_prefix_05() {
        assert_eq!(compute_tax(Decimal::from(1_100_000), "05"), computed(1_100_000, 121_000));
    }

    #[test]
    fn test_other_prefix() {
        assert_eq!(compute_tax(Decimal::from(1_100_000), "03"), computed(1_008_333, 121_000));
        assert_eq!(compute_tax(Decimal::from(1_100_000), "04"), computed(1_008_333, 121_000));
    }

    #[test]
    fn test_missing_prefix_uses_other_value() {
        assert_eq!(compute_tax(Decimal::from(1_200_000), "-"), computed(1_100_000, 132_000));
        assert_eq!(TaxFormula::for_prefix(""), TaxFormula::OtherValue);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 12% of 1_000_004 = 120_000.48 -> 120_000; 12% of 1_000_005 = 120_000.6 -> 120_001
        assert_eq!(compute_tax(Decimal::from(1_000_004), "01"), computed(1_000_004, 120_000));
        assert_eq!(compute_tax(Decimal::from(1_000_005), "01"), computed(1_000_005, 120_001));
        // 11% of 50 = 5.5 -> 6
        assert_eq!(compute_tax(Decimal::from(50), "05"), computed(50, 6));
        // 11/12 of 6 = 5.5 -> 6, 12% of 6 = 0.72 -> 1
        assert_eq!(compute_tax(Decimal::from(6), "07"), computed(6, 1));
    }

    #[test]
    fn test_zero_price() {
        assert_eq!(compute_tax(Decimal::ZERO, "01"), computed(0, 0));
        assert_eq!(compute_tax(Decimal::ZERO, "03"), computed(0, 0));
    }

    #[test]
    fn test_invalid_tax_base() {
        assert_eq!(compute_tax(Decimal::from(-1), "01"), TaxOutcome::NotComputed);
        assert_eq!(
            compute_tax(Decimal::from_str("1234.56").unwrap(), "01"),
            TaxOutcome::NotComputed
        );
        assert!(matches!(
            try_compute_tax(Decimal::from(-1), "01"),
            Err(ExtractionError::InvalidTaxBase(_))
        ));
    }
}
