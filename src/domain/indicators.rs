//! Macroeconomic indicators keyed by quarter.
//!
//! Lookup never fails: an exact period match wins, otherwise the nearest stored
//! period by quarter-distance, otherwise a fixed default record.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A (year, quarter) pair identifying one quarter of indicator data.
///
/// Ordering is by year then quarter, which is also the scan order used when
/// looking for the nearest period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndicatorPeriod {
    pub year: i32,
    pub quarter: u8,
}

impl IndicatorPeriod {
    pub fn new(year: i32, quarter: u8) -> Self {
        Self { year, quarter }
    }

    /// `|year_a - year_b| * 4 + |quarter_a - quarter_b|`
    pub fn quarter_distance(&self, other: &IndicatorPeriod) -> u64 {
        let years = (i64::from(self.year) - i64::from(other.year)).unsigned_abs();
        let quarters = (i64::from(self.quarter) - i64::from(other.quarter)).unsigned_abs();
        years * 4 + quarters
    }

    /// Key used in the indicator table file, e.g. `2022_1`
    pub fn key(&self) -> String {
        format!("{}_{}", self.year, self.quarter)
    }
}

impl fmt::Display for IndicatorPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

impl FromStr for IndicatorPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, quarter) = s
            .split_once('_')
            .ok_or_else(|| format!("Invalid indicator key '{}': expected YEAR_QUARTER", s))?;
        let year = year
            .parse::<i32>()
            .map_err(|e| format!("Invalid year in indicator key '{}': {}", s, e))?;
        let quarter = quarter
            .parse::<u8>()
            .map_err(|e| format!("Invalid quarter in indicator key '{}': {}", s, e))?;
        Ok(Self { year, quarter })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EconomicIndicators {
    pub interest_rate: f64,
    pub inflation: f64,
    pub gdp_growth: f64,
    pub unemployment: f64,
    pub apartments_sold: f64,
}

impl EconomicIndicators {
    /// Used when no indicator data is available at all.
    pub const DEFAULT: EconomicIndicators = EconomicIndicators {
        interest_rate: 0.9,
        inflation: 103.0,
        gdp_growth: 97.7,
        unemployment: 6.1,
        apartments_sold: 630.0,
    };
}

impl Default for EconomicIndicators {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Diagnostic line consumed by downstream display.
/// Values keep a decimal point even when whole (`inflation=103.0`).
impl fmt::Display for EconomicIndicators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ECONOMIC_INDICATORS: interest={:?}, inflation={:?}, gdp={:?}, unemployment={:?}, apartments_sold={:?}",
            self.interest_rate, self.inflation, self.gdp_growth, self.unemployment, self.apartments_sold
        )
    }
}

/// Where a looked-up record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorSource {
    Exact(IndicatorPeriod),
    Nearest {
        requested: IndicatorPeriod,
        used: IndicatorPeriod,
        distance: u64,
    },
    Default,
}

impl IndicatorSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, IndicatorSource::Exact(_))
    }
}

impl fmt::Display for IndicatorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorSource::Exact(period) => write!(f, "exact {}", period),
            IndicatorSource::Nearest {
                requested,
                used,
                distance,
            } => write!(
                f,
                "nearest {} for {} ({} quarters away)",
                used, requested, distance
            ),
            IndicatorSource::Default => f.write_str("defaults"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorLookup {
    pub indicators: EconomicIndicators,
    pub source: IndicatorSource,
}

/// Read-only indicator table.
#[derive(Debug, Clone, Default)]
pub struct IndicatorStore {
    // None when the backing table could not be loaded at all
    table: Option<BTreeMap<IndicatorPeriod, EconomicIndicators>>,
}

impl IndicatorStore {
    pub fn new(table: BTreeMap<IndicatorPeriod, EconomicIndicators>) -> Self {
        Self { table: Some(table) }
    }

    /// A store whose backing table is absent; every lookup yields the defaults.
    pub fn unavailable() -> Self {
        Self { table: None }
    }

    pub fn is_available(&self) -> bool {
        self.table.is_some()
    }

    pub fn len(&self) -> usize {
        self.table.as_ref().map_or(0, |t| t.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lookup(&self, year: i32, quarter: u8) -> IndicatorLookup {
        let requested = IndicatorPeriod::new(year, quarter);

        let Some(table) = &self.table else {
            return Self::defaults();
        };

        if let Some(indicators) = table.get(&requested) {
            return IndicatorLookup {
                indicators: *indicators,
                source: IndicatorSource::Exact(requested),
            };
        }

        // Ascending (year, quarter) scan; strict `<` keeps the first minimum.
        let mut nearest: Option<(IndicatorPeriod, u64)> = None;
        for period in table.keys() {
            let distance = requested.quarter_distance(period);
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((*period, distance));
            }
        }

        match nearest.and_then(|(used, distance)| table.get(&used).map(|i| (used, distance, *i))) {
            Some((used, distance, indicators)) => IndicatorLookup {
                indicators,
                source: IndicatorSource::Nearest {
                    requested,
                    used,
                    distance,
                },
            },
            None => Self::defaults(),
        }
    }

    fn defaults() -> IndicatorLookup {
        IndicatorLookup {
            indicators: EconomicIndicators::DEFAULT,
            source: IndicatorSource::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seed: f64) -> EconomicIndicators {
        EconomicIndicators {
            interest_rate: seed,
            inflation: 100.0 + seed,
            gdp_growth: 99.0 + seed,
            unemployment: 5.0 + seed,
            apartments_sold: 1000.0 + seed,
        }
    }

    fn store_of(entries: &[(i32, u8, f64)]) -> IndicatorStore {
        IndicatorStore::new(
            entries
                .iter()
                .map(|(y, q, seed)| (IndicatorPeriod::new(*y, *q), record(*seed)))
                .collect(),
        )
    }

    #[test]
    fn test_quarter_distance() {
        let a = IndicatorPeriod::new(2030, 2);
        assert_eq!(a.quarter_distance(&IndicatorPeriod::new(2024, 4)), 26);
        assert_eq!(a.quarter_distance(&IndicatorPeriod::new(2025, 1)), 21);
        assert_eq!(a.quarter_distance(&a), 0);
        assert_eq!(
            IndicatorPeriod::new(2020, 1).quarter_distance(&IndicatorPeriod::new(2019, 4)),
            7
        );
    }

    #[test]
    fn test_period_key_parsing() {
        assert_eq!("2022_1".parse::<IndicatorPeriod>(), Ok(IndicatorPeriod::new(2022, 1)));
        assert_eq!(IndicatorPeriod::new(2022, 1).key(), "2022_1");
        assert!("2022-1".parse::<IndicatorPeriod>().is_err());
        assert!("2022_x".parse::<IndicatorPeriod>().is_err());
        assert!("_1".parse::<IndicatorPeriod>().is_err());
    }

    #[test]
    fn test_exact_match_returns_stored_record() {
        let store = store_of(&[(2021, 4, 1.0), (2022, 1, 2.0), (2022, 2, 3.0)]);
        for (year, quarter, seed) in [(2021, 4, 1.0), (2022, 1, 2.0), (2022, 2, 3.0)] {
            let lookup = store.lookup(year, quarter);
            assert_eq!(lookup.indicators, record(seed));
            assert_eq!(
                lookup.source,
                IndicatorSource::Exact(IndicatorPeriod::new(year, quarter))
            );
        }
    }

    #[test]
    fn test_nearest_period_by_quarter_distance() {
        let store = store_of(&[(2024, 4, 1.0), (2025, 1, 2.0)]);
        let lookup = store.lookup(2030, 2);
        assert_eq!(lookup.indicators, record(2.0));
        assert_eq!(
            lookup.source,
            IndicatorSource::Nearest {
                requested: IndicatorPeriod::new(2030, 2),
                used: IndicatorPeriod::new(2025, 1),
                distance: 21,
            }
        );
    }

    #[test]
    fn test_nearest_tie_resolves_to_earliest_period() {
        // 2020 Q2 is one quarter from both 2020 Q1 and 2020 Q3.
        let store = store_of(&[(2020, 3, 3.0), (2020, 1, 1.0)]);
        let lookup = store.lookup(2020, 2);
        assert_eq!(lookup.indicators, record(1.0));

        // 2019 Q2 and 2021 Q2 are both four quarters from 2020 Q2.
        let store = store_of(&[(2021, 2, 5.0), (2019, 2, 4.0)]);
        let lookup = store.lookup(2020, 2);
        assert!(matches!(
            lookup.source,
            IndicatorSource::Nearest { used, distance: 4, .. } if used == IndicatorPeriod::new(2019, 2)
        ));
        assert_eq!(lookup.indicators, record(4.0));
    }

    #[test]
    fn test_empty_table_returns_defaults() {
        let lookup = IndicatorStore::new(BTreeMap::new()).lookup(2022, 1);
        assert_eq!(lookup.indicators, EconomicIndicators::DEFAULT);
        assert_eq!(lookup.source, IndicatorSource::Default);
    }

    #[test]
    fn test_unavailable_table_returns_defaults() {
        let store = IndicatorStore::unavailable();
        assert!(!store.is_available());
        for (year, quarter) in [(2010, 1), (2022, 3), (2030, 4)] {
            let lookup = store.lookup(year, quarter);
            assert_eq!(lookup.indicators, EconomicIndicators::DEFAULT);
            assert!(lookup.source.is_fallback());
        }
    }

    #[test]
    fn test_default_record_values() {
        let d = EconomicIndicators::default();
        assert_eq!(d.interest_rate, 0.9);
        assert_eq!(d.inflation, 103.0);
        assert_eq!(d.gdp_growth, 97.7);
        assert_eq!(d.unemployment, 6.1);
        assert_eq!(d.apartments_sold, 630.0);
    }

    #[test]
    fn test_diagnostic_line_format() {
        assert_eq!(
            EconomicIndicators::DEFAULT.to_string(),
            "ECONOMIC_INDICATORS: interest=0.9, inflation=103.0, gdp=97.7, unemployment=6.1, apartments_sold=630.0"
        );

        let line = EconomicIndicators {
            interest_rate: 3.1,
            inflation: 109.4,
            gdp_growth: 108.5,
            unemployment: 5.0,
            apartments_sold: 1204.0,
        }
        .to_string();
        assert!(line.ends_with("unemployment=5.0, apartments_sold=1204.0"));
    }
}
