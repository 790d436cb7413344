use crate::domain::errors::ValidationError;
use crate::domain::validation::request_validator;
use std::fmt;
use std::str::FromStr;

/// Unit size bracket, as labelled in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeBracket {
    UpTo40,
    From40To60,
    From60To80,
    Above80,
}

impl SizeBracket {
    pub const ALL: [SizeBracket; 4] = [
        SizeBracket::UpTo40,
        SizeBracket::From40To60,
        SizeBracket::From60To80,
        SizeBracket::Above80,
    ];

    /// Label accepted on input
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeBracket::UpTo40 => "do 40 m²",
            SizeBracket::From40To60 => "od 40.1 do 60 m²",
            SizeBracket::From60To80 => "od 60.1 do 80 m²",
            SizeBracket::Above80 => "od 80.1 m²",
        }
    }

    pub fn expected_labels() -> String {
        Self::ALL
            .iter()
            .map(|b| b.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SizeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeBracket {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSizeBracket {
                value: s.to_string(),
                expected: Self::expected_labels(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarketType {
    #[default]
    Primary,
    Secondary,
}

impl MarketType {
    pub const ALL: [MarketType; 2] = [MarketType::Primary, MarketType::Secondary];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketType::Primary => "primary market",
            MarketType::Secondary => "secondary market",
        }
    }

    pub fn expected_labels() -> String {
        Self::ALL
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownMarketType {
                value: s.to_string(),
                expected: Self::expected_labels(),
            })
    }
}

/// A validated prediction request.
///
/// Fields are private so that every instance has passed
/// [`request_validator::validate`]; build one with [`PredictionRequest::parse`]
/// or [`PredictionRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    region: String,
    size_bracket: SizeBracket,
    year: i32,
    quarter: u8,
    market_type: MarketType,
}

impl PredictionRequest {
    /// Validates raw fields (as received on the command line) and builds the request.
    pub fn parse(
        region: &str,
        size_bracket: &str,
        year: &str,
        quarter: &str,
        market_type: &str,
    ) -> Result<Self, ValidationError> {
        let validated =
            request_validator::validate(region, size_bracket, year, quarter, market_type)?;
        Ok(Self {
            region: region.to_string(),
            size_bracket: validated.size_bracket,
            year: validated.year,
            quarter: validated.quarter,
            market_type: validated.market_type,
        })
    }

    /// Builds a request from already typed fields, still enforcing the ranges.
    pub fn new(
        region: impl Into<String>,
        size_bracket: SizeBracket,
        year: i32,
        quarter: u8,
        market_type: MarketType,
    ) -> Result<Self, ValidationError> {
        let region = region.into();
        request_validator::check_region(&region)?;
        request_validator::check_year(i64::from(year))?;
        request_validator::check_quarter(i64::from(quarter))?;
        Ok(Self {
            region,
            size_bracket,
            year,
            quarter,
            market_type,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn size_bracket(&self) -> SizeBracket {
        self.size_bracket
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    pub fn market_type(&self) -> MarketType {
        self.market_type
    }
}

/// Quarter (1-4) containing a calendar month (1-12).
pub fn quarter_of_month(month: u32) -> Option<u8> {
    match month {
        1..=12 => Some(month.div_ceil(3) as u8),
        _ => None,
    }
}
