//! Column-wise preprocessing described by a JSON artifact.
//!
//! The artifact lists transformers in output order. Each transformer reads one
//! or more named feature columns; columns that no transformer names are dropped.
//!
//! ```json
//! {
//!   "transformers": [
//!     { "kind": "one_hot", "columns": ["Attribute"],
//!       "categories": [["1st quarter", "2nd quarter", "3rd quarter", "4th quarter"]],
//!       "handle_unknown": "ignore" },
//!     { "kind": "passthrough", "columns": ["year", "number of apartments sold"] }
//!   ]
//! }
//! ```

use super::predictor::FeatureEncoder;
use crate::domain::errors::ArtifactError;
use crate::domain::ml::feature_registry::{FeatureRow, column_index};
use anyhow::{Result, anyhow, bail};
use ndarray::Array2;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

const ARTIFACT: &str = "preprocessor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Unknown categories encode as all zeros
    #[default]
    Ignore,
    Error,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTransformer {
    OneHot {
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    Passthrough {
        columns: Vec<String>,
    },
}

impl ColumnTransformer {
    fn width(&self) -> usize {
        match self {
            ColumnTransformer::OneHot { categories, .. } => categories.iter().map(Vec::len).sum(),
            ColumnTransformer::Passthrough { columns } => columns.len(),
        }
    }

    fn columns(&self) -> &[String] {
        match self {
            ColumnTransformer::OneHot { columns, .. } => columns.as_slice(),
            ColumnTransformer::Passthrough { columns } => columns.as_slice(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncoderSpec {
    pub transformers: Vec<ColumnTransformer>,
}

#[derive(Debug, Clone)]
pub struct ColumnEncoder {
    spec: EncoderSpec,
    width: usize,
}

impl ColumnEncoder {
    /// Loads and checks an encoder artifact.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::Missing {
                artifact: ARTIFACT,
                path: path.to_path_buf(),
            });
        }

        let corrupt = |reason: String| ArtifactError::Corrupt {
            artifact: ARTIFACT,
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| corrupt(e.to_string()))?;
        let spec: EncoderSpec =
            serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;
        let encoder = Self::from_spec(spec).map_err(|e| corrupt(e.to_string()))?;

        info!(
            "Loaded column encoder from {:?} ({} transformers, {} output columns)",
            path,
            encoder.spec.transformers.len(),
            encoder.width
        );
        Ok(encoder)
    }

    pub fn from_spec(spec: EncoderSpec) -> Result<Self> {
        for transformer in &spec.transformers {
            for column in transformer.columns() {
                if column_index(column).is_none() {
                    bail!("Unknown feature column '{}'", column);
                }
            }
            if let ColumnTransformer::OneHot {
                columns,
                categories,
                ..
            } = transformer
            {
                if columns.len() != categories.len() {
                    bail!(
                        "One-hot transformer has {} columns but {} category lists",
                        columns.len(),
                        categories.len()
                    );
                }
            }
        }

        let width = spec.transformers.iter().map(ColumnTransformer::width).sum();
        Ok(Self { spec, width })
    }

    fn encode_row(&self, row: &FeatureRow, out: &mut Vec<f64>) -> Result<()> {
        for transformer in &self.spec.transformers {
            match transformer {
                ColumnTransformer::OneHot {
                    columns,
                    categories,
                    handle_unknown,
                } => {
                    for (column, known) in columns.iter().zip(categories) {
                        let value = row
                            .get(column)
                            .ok_or_else(|| anyhow!("Missing column '{}'", column))?;
                        let text = value.as_text().ok_or_else(|| {
                            anyhow!("Cannot one-hot encode numeric column '{}'", column)
                        })?;

                        let hit = known.iter().position(|c| c == text);
                        if hit.is_none() && *handle_unknown == HandleUnknown::Error {
                            bail!("Found unknown category '{}' in column '{}'", text, column);
                        }
                        out.extend((0..known.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
                    }
                }
                ColumnTransformer::Passthrough { columns } => {
                    for column in columns {
                        let value = row
                            .get(column)
                            .ok_or_else(|| anyhow!("Missing column '{}'", column))?;
                        let number = value.as_number().ok_or_else(|| {
                            anyhow!("Cannot pass through text column '{}' as numeric", column)
                        })?;
                        out.push(number);
                    }
                }
            }
        }
        Ok(())
    }
}

impl FeatureEncoder for ColumnEncoder {
    fn transform(&self, rows: &[FeatureRow]) -> Result<Array2<f64>> {
        let mut data = Vec::with_capacity(rows.len() * self.width);
        for row in rows {
            self.encode_row(row, &mut data)?;
        }
        Array2::from_shape_vec((rows.len(), self.width), data)
            .map_err(|e| anyhow!("Encoded matrix shape mismatch: {}", e))
    }

    fn name(&self) -> &str {
        "Column Encoder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicators::EconomicIndicators;
    use crate::domain::ml::feature_registry::assemble;
    use crate::domain::request::{MarketType, PredictionRequest, SizeBracket};

    fn row(quarter: u8) -> FeatureRow {
        let request =
            PredictionRequest::new("Warsaw", SizeBracket::UpTo40, 2022, quarter, MarketType::Primary)
                .unwrap();
        assemble(&request, &EconomicIndicators::DEFAULT)
    }

    fn spec(json: &str) -> EncoderSpec {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_one_hot_and_passthrough() {
        let encoder = ColumnEncoder::from_spec(spec(
            r#"{"transformers": [
                {"kind": "one_hot", "columns": ["Attribute", "Type of market"],
                 "categories": [["1st quarter", "2nd quarter"], ["primary market", "secondary market"]]},
                {"kind": "passthrough", "columns": ["year", "number of apartments sold"]}
            ]}"#,
        ))
        .unwrap();
        let matrix = encoder.transform(&[row(2)]).unwrap();
        assert_eq!(matrix.shape(), &[1, 6]);
        assert_eq!(
            matrix.row(0).to_vec(),
            vec![0.0, 1.0, 1.0, 0.0, 2022.0, 630.0]
        );
    }

    #[test]
    fn test_unknown_category_ignored_by_default() {
        let encoder = ColumnEncoder::from_spec(spec(
            r#"{"transformers": [
                {"kind": "one_hot", "columns": ["Attribute"], "categories": [["1st quarter"]]}
            ]}"#,
        ))
        .unwrap();
        let matrix = encoder.transform(&[row(3)]).unwrap();
        assert_eq!(matrix.row(0).to_vec(), vec![0.0]);
    }

    #[test]
    fn test_unknown_category_error() {
        let encoder = ColumnEncoder::from_spec(spec(
            r#"{"transformers": [
                {"kind": "one_hot", "columns": ["Location"], "categories": [["Krakow"]],
                 "handle_unknown": "error"}
            ]}"#,
        ))
        .unwrap();
        let err = encoder.transform(&[row(1)]).unwrap_err();
        assert!(err.to_string().contains("unknown category 'Warsaw'"));
    }

    #[test]
    fn test_type_mismatch_fails_transform() {
        let encoder = ColumnEncoder::from_spec(spec(
            r#"{"transformers": [{"kind": "passthrough", "columns": ["Location"]}]}"#,
        ))
        .unwrap();
        assert!(encoder.transform(&[row(1)]).is_err());

        let encoder = ColumnEncoder::from_spec(spec(
            r#"{"transformers": [{"kind": "one_hot", "columns": ["year"], "categories": [["2022"]]}]}"#,
        ))
        .unwrap();
        assert!(encoder.transform(&[row(1)]).is_err());
    }

    #[test]
    fn test_rejects_unknown_column_at_load() {
        let result = ColumnEncoder::from_spec(spec(
            r#"{"transformers": [{"kind": "passthrough", "columns": ["unemployment"]}]}"#,
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_mismatched_category_lists() {
        let result = ColumnEncoder::from_spec(spec(
            r#"{"transformers": [{"kind": "one_hot", "columns": ["Attribute", "Location"], "categories": [["1st quarter"]]}]}"#,
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ColumnEncoder::load(Path::new("definitely/not/here/preprocessor.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { .. }));
    }
}
