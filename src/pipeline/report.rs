use std::fmt;

use crate::estimators::error::EstimatorError;
use crate::metrics::Score;

/// Feature preparation an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// One predictor against the target, linear model only.
    Simple,
    /// Every feature, and the columns kept by feature elimination.
    Full,
    /// Principal components of every feature.
    Reduced,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Regime::Simple => "simple",
            Regime::Full => "full",
            Regime::Reduced => "reduced",
        };
        f.write_str(name)
    }
}

/// An error together with the entry it was raised for.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFailure {
    pub regime: Regime,
    /// Feature-set tag of the entry key, `simple`, `full`, `selected` or `pca`.
    pub feature_set: &'static str,
    pub variant: &'static str,
    pub fold: Option<usize>,
    pub error: EstimatorError,
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}/{}", self.regime, self.feature_set, self.variant)?;
        if let Some(fold) = self.fold {
            write!(f, " fold {}", fold)?;
        }
        write!(f, ": {}", self.error)
    }
}

impl std::error::Error for EntryFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Held-out score of one entry, or why it could not be produced.
pub type EntryOutcome = Result<Score<f64>, EntryFailure>;

/// Per-fold outcomes of one entry, or why cross-validation could not start.
pub type CvOutcome = Result<Vec<EntryOutcome>, EntryFailure>;

/// Single-split scores keyed by `"<feature set>/<variant>"`, in insertion
/// order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreReport {
    entries: Vec<(String, EntryOutcome)>,
}

impl ScoreReport {
    pub(crate) fn push(&mut self, key: String, outcome: EntryOutcome) {
        self.entries.push((key, outcome));
    }

    pub fn get(&self, key: &str) -> Option<&EntryOutcome> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, o)| o)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntryOutcome)> {
        self.entries.iter().map(|(k, o)| (k.as_str(), o))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cross-validation outcomes keyed like [`ScoreReport`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CvReport {
    entries: Vec<(String, CvOutcome)>,
}

impl CvReport {
    pub(crate) fn push(&mut self, key: String, outcome: CvOutcome) {
        self.entries.push((key, outcome));
    }

    pub fn get(&self, key: &str) -> Option<&CvOutcome> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, o)| o)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CvOutcome)> {
        self.entries.iter().map(|(k, o)| (k.as_str(), o))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegimeReport {
    pub regime: Regime,
    pub scores: ScoreReport,
    pub cross_validation: CvReport,
}

impl RegimeReport {
    pub(crate) fn new(regime: Regime) -> Self {
        RegimeReport {
            regime,
            scores: ScoreReport::default(),
            cross_validation: CvReport::default(),
        }
    }

    /// Number of failed entries and failed folds.
    pub fn n_failures(&self) -> usize {
        let scores = self.scores.iter().filter(|(_, o)| o.is_err()).count();
        let folds: usize = self
            .cross_validation
            .iter()
            .map(|(_, o)| match o {
                Ok(folds) => folds.iter().filter(|f| f.is_err()).count(),
                Err(_) => 1,
            })
            .sum();
        scores + folds
    }
}

/// Everything a comparison run produces, one report per regime.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    regimes: Vec<RegimeReport>,
}

impl ComparisonReport {
    pub(crate) fn new(regimes: Vec<RegimeReport>) -> Self {
        ComparisonReport { regimes }
    }

    pub fn regimes(&self) -> &[RegimeReport] {
        &self.regimes
    }

    pub fn regime(&self, regime: Regime) -> Option<&RegimeReport> {
        self.regimes.iter().find(|r| r.regime == regime)
    }

    /// Looks a single-split score up by key across every regime.
    pub fn score(&self, key: &str) -> Option<&EntryOutcome> {
        self.regimes.iter().find_map(|r| r.scores.get(key))
    }

    pub fn cross_validation(&self, key: &str) -> Option<&CvOutcome> {
        self.regimes.iter().find_map(|r| r.cross_validation.get(key))
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in self.regimes.iter() {
            writeln!(f, "== {} ==", report.regime)?;
            for (key, outcome) in report.scores.iter() {
                match outcome {
                    Ok(score) => {
                        write!(f, "  {:<32} mse = {:.6}", key, score.mse)?;
                        if !score.converged {
                            write!(f, " (not converged)")?;
                        }
                        writeln!(f)?;
                    }
                    Err(failure) => writeln!(f, "  {:<32} failed: {}", key, failure.error)?,
                }
            }
            for (key, outcome) in report.cross_validation.iter() {
                match outcome {
                    Ok(folds) => {
                        let scores: Vec<String> = folds
                            .iter()
                            .map(|fold| match fold {
                                Ok(score) => format!("{:.4}", score.mse),
                                Err(_) => "failed".to_string(),
                            })
                            .collect();
                        writeln!(f, "  {:<32} cv = [{}]", key, scores.join(", "))?;
                    }
                    Err(failure) => writeln!(f, "  {:<32} cv failed: {}", key, failure.error)?,
                }
            }
        }
        Ok(())
    }
}
