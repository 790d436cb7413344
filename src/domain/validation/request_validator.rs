//! Schema and range checks on the five raw request fields.
//!
//! Pure guard: nothing here logs or touches the filesystem. Checks run in field
//! order and the first failing field is reported.

use crate::domain::errors::ValidationError;
use crate::domain::request::{MarketType, SizeBracket};

pub const MIN_YEAR: i32 = 2010;
pub const MAX_YEAR: i32 = 2025;

/// Typed values extracted from a request that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedFields {
    pub size_bracket: SizeBracket,
    pub year: i32,
    pub quarter: u8,
    pub market_type: MarketType,
}

pub fn validate(
    region: &str,
    size_bracket: &str,
    year: &str,
    quarter: &str,
    market_type: &str,
) -> Result<ValidatedFields, ValidationError> {
    check_region(region)?;
    let size_bracket = size_bracket.parse::<SizeBracket>()?;

    let year = parse_integer(year)
        .ok_or_else(|| ValidationError::InvalidYear {
            value: year.to_string(),
        })
        .and_then(check_year)?;

    let quarter = parse_integer(quarter)
        .ok_or_else(|| ValidationError::InvalidQuarter {
            value: quarter.to_string(),
        })
        .and_then(check_quarter)?;

    let market_type = market_type.parse::<MarketType>()?;

    Ok(ValidatedFields {
        size_bracket,
        year,
        quarter,
        market_type,
    })
}

pub fn check_region(region: &str) -> Result<(), ValidationError> {
    if region.is_empty() {
        return Err(ValidationError::EmptyRegion);
    }
    Ok(())
}

pub fn check_year(year: i64) -> Result<i32, ValidationError> {
    if year < i64::from(MIN_YEAR) || year > i64::from(MAX_YEAR) {
        return Err(ValidationError::YearOutOfRange {
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        });
    }
    Ok(year as i32)
}

pub fn check_quarter(quarter: i64) -> Result<u8, ValidationError> {
    if !(1..=4).contains(&quarter) {
        return Err(ValidationError::QuarterOutOfRange { quarter });
    }
    Ok(quarter as u8)
}

// Surrounding whitespace is tolerated, like the integer parsing of the
// upstream form handler.
fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> [&'static str; 5] {
        ["Warsaw", "do 40 m²", "2022", "1", "primary market"]
    }

    fn run(fields: [&str; 5]) -> Result<ValidatedFields, ValidationError> {
        validate(fields[0], fields[1], fields[2], fields[3], fields[4])
    }

    #[test]
    fn test_accepts_valid_request() {
        let fields = run(valid()).unwrap();
        assert_eq!(fields.size_bracket, SizeBracket::UpTo40);
        assert_eq!(fields.year, 2022);
        assert_eq!(fields.quarter, 1);
        assert_eq!(fields.market_type, MarketType::Primary);
    }

    #[test]
    fn test_rejects_empty_region() {
        let mut fields = valid();
        fields[0] = "";
        assert_eq!(run(fields), Err(ValidationError::EmptyRegion));
    }

    #[test]
    fn test_rejects_every_unrecognized_size_bracket() {
        for size in ["", "do 40 m2", "DO 40 M²", "od 40 do 60 m²", "80", "small"] {
            let mut fields = valid();
            fields[1] = size;
            assert!(
                matches!(run(fields), Err(ValidationError::UnknownSizeBracket { .. })),
                "size {:?} should be rejected",
                size
            );
        }
    }

    #[test]
    fn test_year_bounds_are_inclusive() {
        for (year, ok) in [("2009", false), ("2010", true), ("2025", true), ("2026", false)] {
            let mut fields = valid();
            fields[2] = year;
            assert_eq!(run(fields).is_ok(), ok, "year {}", year);
        }
    }

    #[test]
    fn test_unparseable_year_is_distinct_from_out_of_range() {
        let mut fields = valid();
        fields[2] = "twenty";
        assert_eq!(
            run(fields),
            Err(ValidationError::InvalidYear {
                value: "twenty".to_string()
            })
        );

        fields[2] = "2030";
        assert!(matches!(
            run(fields),
            Err(ValidationError::YearOutOfRange { year: 2030, .. })
        ));
    }

    #[test]
    fn test_year_tolerates_whitespace() {
        let mut fields = valid();
        fields[2] = " 2021 ";
        assert_eq!(run(fields).unwrap().year, 2021);
    }

    #[test]
    fn test_quarter_bounds() {
        for (quarter, ok) in [("0", false), ("1", true), ("4", true), ("5", false), ("-1", false)] {
            let mut fields = valid();
            fields[3] = quarter;
            assert_eq!(run(fields).is_ok(), ok, "quarter {}", quarter);
        }

        let mut fields = valid();
        fields[3] = "Q1";
        assert!(matches!(run(fields), Err(ValidationError::InvalidQuarter { .. })));
    }

    #[test]
    fn test_market_type_must_match_exactly() {
        let mut fields = valid();
        fields[4] = "secondary market";
        assert_eq!(run(fields).unwrap().market_type, MarketType::Secondary);

        fields[4] = "Primary Market";
        let err = run(fields).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownMarketType { .. }));
        assert!(err.to_string().contains("primary market, secondary market"));
    }
}
