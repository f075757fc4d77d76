//! Whitespace-delimited numeric datasets
//!
//! One sample per line: feature columns followed by a `0`/`1` class label.
//! No header. Blank lines and lines starting with `#` are skipped. Labels
//! are shifted to `{-1, +1}` on load.

use crate::encoding::{encode, EncodingAngles, FeatureVector};
use crate::error::{Result, SimError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// A single sample: raw features and a ±1 label
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: f64,
}

/// A loaded dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path)?;
        let dataset: Self = contents.parse()?;
        debug!(
            path = %path.as_ref().display(),
            samples = dataset.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of feature columns, 0 for an empty dataset
    pub fn num_features(&self) -> usize {
        self.samples.first().map_or(0, |s| s.features.len())
    }

    pub fn labels(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.label).collect()
    }

    /// Amplitude-encode every sample; requires exactly four features
    pub fn encoded(&self) -> Result<Vec<EncodingAngles>> {
        self.samples
            .iter()
            .map(|sample| {
                let features: FeatureVector =
                    sample
                        .features
                        .as_slice()
                        .try_into()
                        .map_err(|_| SimError::ShapeMismatch {
                            context: "feature vector",
                            expected: 4,
                            actual: sample.features.len(),
                        })?;
                encode(&features)
            })
            .collect()
    }

    /// Shuffle with `rng` and cut at `floor(train_fraction · len)`
    ///
    /// # Errors
    /// `InvalidConfig` for a fraction outside (0, 1); `EmptySplit` when
    /// either side would be empty.
    pub fn split<R: Rng + ?Sized>(
        &self,
        train_fraction: f64,
        rng: &mut R,
    ) -> Result<(Dataset, Dataset)> {
        if !(train_fraction > 0.0 && train_fraction < 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "train_fraction must be in (0, 1), got {}",
                train_fraction
            )));
        }

        let num_train = (self.len() as f64 * train_fraction) as usize;
        if num_train == 0 {
            return Err(SimError::EmptySplit("train"));
        }
        if num_train == self.len() {
            return Err(SimError::EmptySplit("validation"));
        }

        let mut index: Vec<usize> = (0..self.len()).collect();
        index.shuffle(rng);

        let pick = |idx: &[usize]| Dataset {
            samples: idx.iter().map(|&i| self.samples[i].clone()).collect(),
        };
        Ok((pick(&index[..num_train]), pick(&index[num_train..])))
    }
}

impl FromStr for Dataset {
    type Err = SimError;

    fn from_str(text: &str) -> Result<Self> {
        let mut samples = Vec::new();
        let mut width = None;

        for (line_idx, line) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let values = trimmed
                .split_whitespace()
                .enumerate()
                .map(|(col, token)| {
                    token.parse::<f64>().map_err(|_| SimError::DatasetParse {
                        line: line_no,
                        column: col + 1,
                        message: format!("'{}' is not a number", token),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            if values.len() < 2 {
                return Err(SimError::DatasetParse {
                    line: line_no,
                    column: values.len() + 1,
                    message: "expected at least one feature and a label".to_string(),
                });
            }
            match width {
                None => width = Some(values.len()),
                Some(w) if w != values.len() => {
                    return Err(SimError::DatasetParse {
                        line: line_no,
                        column: values.len().min(w) + 1,
                        message: format!("expected {} columns, found {}", w, values.len()),
                    });
                },
                Some(_) => {},
            }

            let (features, label) = values.split_at(values.len() - 1);
            let label = match label[0] {
                l if l == 0.0 => -1.0,
                l if l == 1.0 => 1.0,
                other => {
                    return Err(SimError::DatasetParse {
                        line: line_no,
                        column: values.len(),
                        message: format!("label must be 0 or 1, found {}", other),
                    })
                },
            };

            samples.push(Sample {
                features: features.to_vec(),
                label,
            });
        }

        Ok(Self { samples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const IRIS_LIKE: &str = "\
# scaled iris subset
0.4  0.75 0.2  0.05 0
0.3  0.6  0.25 0.1  0

0.6  0.3  0.65 0.5  1
0.7  0.35 0.6  0.45 1
";

    #[test]
    fn test_parse_shifts_labels() {
        let data: Dataset = IRIS_LIKE.parse().unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data.num_features(), 4);
        assert_eq!(data.labels(), vec![-1.0, -1.0, 1.0, 1.0]);
        assert_eq!(data.samples()[2].features, vec![0.6, 0.3, 0.65, 0.5]);
    }

    #[test]
    fn test_parse_reports_bad_token() {
        let err = "0.1 0.2 0.3 0.4 1\n0.1 x 0.3 0.4 0\n".parse::<Dataset>().unwrap_err();
        match err {
            SimError::DatasetParse { line, column, .. } => {
                assert_eq!((line, column), (2, 2));
            },
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_parse_reports_ragged_row() {
        let err = "0.1 0.2 0.3 0.4 1\n0.1 0.2 1\n".parse::<Dataset>().unwrap_err();
        assert!(matches!(err, SimError::DatasetParse { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_bad_label() {
        let err = "0.1 0.2 0.3 0.4 2\n".parse::<Dataset>().unwrap_err();
        assert!(matches!(err, SimError::DatasetParse { line: 1, column: 5, .. }));
    }

    #[test]
    fn test_encoded_requires_four_features() {
        let data: Dataset = "0.1 0.2 0.3 1\n".parse().unwrap();
        assert!(matches!(
            data.encoded(),
            Err(SimError::ShapeMismatch { expected: 4, actual: 3, .. })
        ));

        let data: Dataset = IRIS_LIKE.parse().unwrap();
        assert_eq!(data.encoded().unwrap().len(), 4);
    }

    #[test]
    fn test_split_sizes_and_determinism() {
        let text: String = (0..20)
            .map(|i| format!("{} 0.5 0.5 0.5 {}\n", i as f64 + 1.0, i % 2))
            .collect();
        let data: Dataset = text.parse().unwrap();

        let (train, val) = data.split(0.75, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(train.len(), 15);
        assert_eq!(val.len(), 5);

        let (train2, _) = data.split(0.75, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(train, train2);
    }

    #[test]
    fn test_split_errors() {
        let data: Dataset = IRIS_LIKE.parse().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(data.split(1.0, &mut rng), Err(SimError::InvalidConfig(_))));
        assert!(matches!(data.split(0.1, &mut rng), Err(SimError::EmptySplit("train"))));
        assert!(matches!(data.split(f64::NAN, &mut rng), Err(SimError::InvalidConfig(_))));
    }
}
