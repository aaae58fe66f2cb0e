//! In-process multinomial linear model

use serde::{Deserialize, Serialize};

use super::{Classifier, ClassifierError};
use crate::record::FeatureTable;
use crate::schema::FEATURE_COUNT;

/// Linear model artifact
///
/// Each class scores `intercept + weights · x`, where `x` is the feature
/// vector optionally standardised as `(x - mean) / scale`. The class with
/// the highest score wins; ties go to the earlier class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    /// Output code per class
    pub classes: Vec<i64>,
    /// One weight vector per class, in feature schema order
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

/// Validated [`LinearModel`] ready for scoring
#[derive(Debug)]
pub struct LinearClassifier {
    model: LinearModel,
    name: String,
}

impl LinearClassifier {
    pub fn new(model: LinearModel) -> Result<Self, ClassifierError> {
        let classes = model.classes.len();
        if classes == 0 {
            return Err(ClassifierError::MalformedModel("no classes".to_string()));
        }
        if model.weights.len() != classes || model.intercepts.len() != classes {
            return Err(ClassifierError::MalformedModel(format!(
                "{} classes but {} weight rows and {} intercepts",
                classes,
                model.weights.len(),
                model.intercepts.len()
            )));
        }
        if let Some(row) = model.weights.iter().find(|w| w.len() != FEATURE_COUNT) {
            return Err(ClassifierError::MalformedModel(format!(
                "weight row has {} entries, expected {}",
                row.len(),
                FEATURE_COUNT
            )));
        }
        for (label, vector) in [("mean", &model.mean), ("scale", &model.scale)] {
            if let Some(v) = vector {
                if v.len() != FEATURE_COUNT {
                    return Err(ClassifierError::MalformedModel(format!(
                        "{} has {} entries, expected {}",
                        label,
                        v.len(),
                        FEATURE_COUNT
                    )));
                }
            }
        }
        if let Some(scale) = &model.scale {
            if scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(ClassifierError::MalformedModel(
                    "scale entries must be finite and non-zero".to_string(),
                ));
            }
        }

        let name = format!("linear ({} classes)", classes);
        Ok(Self { model, name })
    }

    fn standardise(&self, row: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut x = *row;
        if let Some(mean) = &self.model.mean {
            x.iter_mut().zip(mean).for_each(|(v, m)| *v -= m);
        }
        if let Some(scale) = &self.model.scale {
            x.iter_mut().zip(scale).for_each(|(v, s)| *v /= s);
        }
        x
    }

    fn score_row(&self, row: &[f64; FEATURE_COUNT]) -> i64 {
        let x = self.standardise(row);
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (class, (weights, intercept)) in self
            .model
            .weights
            .iter()
            .zip(&self.model.intercepts)
            .enumerate()
        {
            let score = intercept + weights.iter().zip(&x).map(|(w, v)| w * v).sum::<f64>();
            if score > best_score {
                best = class;
                best_score = score;
            }
        }
        self.model.classes[best]
    }
}

impl Classifier for LinearClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, table: &FeatureTable) -> Result<Vec<i64>, ClassifierError> {
        table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                if let Some(col) = row.iter().position(|v| !v.is_finite()) {
                    return Err(ClassifierError::InvalidInput(format!(
                        "non-finite value in column '{}' at row {}",
                        table.columns[col], i
                    )));
                }
                Ok(self.score_row(row))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FEATURE_COLUMNS;

    const RPM: usize = 2;
    const VIBRATION: usize = 7;

    /// Class 0 by default, class 1 on high rpm, class 2 on high vibration
    fn model() -> LinearModel {
        let mut weights = vec![vec![0.0; FEATURE_COUNT]; 3];
        weights[1][RPM] = 1.0;
        weights[2][VIBRATION] = 1.0;
        LinearModel {
            classes: vec![0, 1, 2],
            weights,
            intercepts: vec![0.0, -3000.0, -1.0],
            mean: None,
            scale: None,
        }
    }

    fn table(rows: Vec<[f64; FEATURE_COUNT]>) -> FeatureTable {
        FeatureTable {
            columns: FEATURE_COLUMNS,
            rows,
        }
    }

    fn row(rpm: f64, vibration: f64) -> [f64; FEATURE_COUNT] {
        let mut r = [0.0; FEATURE_COUNT];
        r[RPM] = rpm;
        r[VIBRATION] = vibration;
        r
    }

    #[test]
    fn test_predicts_highest_scoring_class() {
        let classifier = LinearClassifier::new(model()).unwrap();
        let labels = classifier
            .predict(&table(vec![row(1500.0, 0.2), row(4000.0, 0.2), row(1500.0, 5000.0)]))
            .unwrap();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn test_standardisation_applied() {
        let mut m = model();
        let mut mean = vec![0.0; FEATURE_COUNT];
        mean[RPM] = 2000.0;
        m.mean = Some(mean);
        m.scale = Some(vec![1.0; FEATURE_COUNT]);
        let classifier = LinearClassifier::new(m).unwrap();

        // 4000 - 2000 = 2000, below the 3000 threshold
        assert_eq!(classifier.predict(&table(vec![row(4000.0, 0.0)])).unwrap(), vec![0]);
        assert_eq!(classifier.predict(&table(vec![row(5500.0, 0.0)])).unwrap(), vec![1]);
    }

    #[test]
    fn test_custom_class_codes() {
        let mut m = model();
        m.classes = vec![10, 11, 12];
        let classifier = LinearClassifier::new(m).unwrap();
        assert_eq!(classifier.predict(&table(vec![row(4000.0, 0.0)])).unwrap(), vec![11]);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let classifier = LinearClassifier::new(model()).unwrap();
        let err = classifier.predict(&table(vec![row(f64::NAN, 0.0)])).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidInput(ref msg) if msg.contains("rpm")));
    }

    #[test]
    fn test_mismatched_dimensions_rejected() {
        let mut m = model();
        m.intercepts.pop();
        assert!(matches!(
            LinearClassifier::new(m),
            Err(ClassifierError::MalformedModel(_))
        ));

        let mut m = model();
        m.weights[0].truncate(3);
        assert!(LinearClassifier::new(m).is_err());

        let mut m = model();
        m.scale = Some(vec![0.0; FEATURE_COUNT]);
        assert!(LinearClassifier::new(m).is_err());
    }

    #[test]
    fn test_empty_model_rejected() {
        let m = LinearModel {
            classes: vec![],
            weights: vec![],
            intercepts: vec![],
            mean: None,
            scale: None,
        };
        assert!(LinearClassifier::new(m).is_err());
    }
}
