use crate::domain::indicators::EconomicIndicators;
use crate::domain::request::PredictionRequest;

/// Ordered list of feature column names.
/// This order and these names MUST match the columns the preprocessing
/// artifact was fitted on. Any change here is a breaking change for models.
pub const FEATURE_COLUMNS: [&str; 11] = [
    "Location",
    "Attribute",
    "Type of market",
    "Type of property",
    "year",
    "number of apartments sold",
    "usable floor space",
    "average value of 1 square meter",
    "weighted average interest rate on new housing loans to households",
    "inflation same period of previous year",
    "Dynamics of gross domestic product per capita, previous year = 100",
];

/// Input size label -> property type label used in the training data.
/// The narrow no-break space (U+202F) is part of the fitted categories.
pub const SIZE_LABELS: [(&str, &str); 4] = [
    ("do 40 m²", "up to 40 square meters"),
    ("od 40.1 do 60 m²", "from 40.1 to 60\u{202f}m²"),
    ("od 60.1 do 80 m²", "from 60.1 to 80\u{202f}m²"),
    ("od 80.1 m²", "from 80.1\u{202f}m²"),
];

/// Ordinal suffixes that differ from the default "th".
pub const QUARTER_SUFFIXES: [(u32, &str); 3] = [(1, "st"), (2, "nd"), (3, "rd")];

/// Maps an input size label to the property type label; unknown labels pass through.
pub fn size_label(raw: &str) -> &str {
    SIZE_LABELS
        .iter()
        .find(|(input, _)| *input == raw)
        .map_or(raw, |(_, label)| *label)
}

/// `1 -> "1st quarter"`, `2 -> "2nd quarter"`, `3 -> "3rd quarter"`, otherwise `"{n}th quarter"`.
pub fn quarter_label(quarter: u32) -> String {
    let suffix = QUARTER_SUFFIXES
        .iter()
        .find(|(n, _)| *n == quarter)
        .map_or("th", |(_, s)| *s);
    format!("{}{} quarter", quarter, suffix)
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Text(String),
    Number(f64),
}

impl FeatureValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            FeatureValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Text(_) => None,
        }
    }
}

/// One row handed to the preprocessing step, in `FEATURE_COLUMNS` order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub location: String,
    pub quarter_label: String,
    pub market_type: String,
    pub property_type: String,
    pub year: i32,
    pub apartments_sold: f64,
    /// Never collected from callers; always 0.
    pub usable_floor_space: f64,
    /// Never collected from callers; always 0.
    pub value_per_square_meter: f64,
    pub interest_rate: f64,
    pub inflation: f64,
    pub gdp_growth: f64,
}

impl FeatureRow {
    pub fn values(&self) -> [FeatureValue; 11] {
        [
            FeatureValue::Text(self.location.clone()),
            FeatureValue::Text(self.quarter_label.clone()),
            FeatureValue::Text(self.market_type.clone()),
            FeatureValue::Text(self.property_type.clone()),
            FeatureValue::Number(f64::from(self.year)),
            FeatureValue::Number(self.apartments_sold),
            FeatureValue::Number(self.usable_floor_space),
            FeatureValue::Number(self.value_per_square_meter),
            FeatureValue::Number(self.interest_rate),
            FeatureValue::Number(self.inflation),
            FeatureValue::Number(self.gdp_growth),
        ]
    }

    /// Value of a named column, if the name is one of `FEATURE_COLUMNS`.
    pub fn get(&self, column: &str) -> Option<FeatureValue> {
        let idx = column_index(column)?;
        self.values().into_iter().nth(idx)
    }
}

pub fn column_index(column: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|c| *c == column)
}

/// Builds the single feature row for a validated request.
pub fn assemble(request: &PredictionRequest, indicators: &EconomicIndicators) -> FeatureRow {
    FeatureRow {
        location: request.region().to_string(),
        quarter_label: quarter_label(u32::from(request.quarter())),
        market_type: request.market_type().as_str().to_string(),
        property_type: size_label(request.size_bracket().as_str()).to_string(),
        year: request.year(),
        apartments_sold: indicators.apartments_sold,
        usable_floor_space: 0.0,
        value_per_square_meter: 0.0,
        interest_rate: indicators.interest_rate,
        inflation: indicators.inflation,
        gdp_growth: indicators.gdp_growth,
    }
}
