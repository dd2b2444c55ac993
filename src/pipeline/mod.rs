//! The comparison orchestrator: prepares every regime, fits every variant on
//! one train/test split and cross-validates it on all rows.

use ndarray::{Array2, ArrayView1};

use crate::datasets::{FeatureSet, Table};
use crate::decomposition::reduce;
use crate::estimators::error::{EstimatorError, Result};
use crate::metrics::evaluate;
use crate::model_selection::{cross_validate, split, Split};
use crate::selection::select;
use crate::variants::Variant;

mod params;
mod report;

#[cfg(test)]
mod tests;

pub use params::{ComparisonParams, ComparisonValidParams};
pub use report::{
    ComparisonReport, CvOutcome, CvReport, EntryFailure, EntryOutcome, Regime, RegimeReport,
    ScoreReport,
};

/// Records of one feature set together with the split they are scored on.
struct Prepared {
    records: Array2<f64>,
    split: Split,
}

fn run_checked(params: &ComparisonValidParams, table: &Table) -> ComparisonReport {
    log::info!(
        "comparing regression variants on {} rows, {} features, target {}",
        table.n_rows(),
        table.n_features(),
        table.target_name()
    );
    let variants = params.variants();

    let regimes = vec![
        simple_regime(params, table),
        full_regime(params, table, &variants),
        reduced_regime(params, table, &variants),
    ];
    let report = ComparisonReport::new(regimes);

    let n_failures: usize = report.regimes().iter().map(|r| r.n_failures()).sum();
    log::info!("comparison done, {} failed entries or folds", n_failures);
    report
}

fn simple_regime(params: &ComparisonValidParams, table: &Table) -> RegimeReport {
    let mut report = RegimeReport::new(Regime::Simple);
    let name = params
        .simple_feature()
        .map(str::to_string)
        .unwrap_or_else(|| table.feature_names()[0].clone());
    log::info!("simple regime on feature {}", name);

    let prepared = FeatureSet::new([name]).and_then(|features| prepare(params, table, &features));
    let linear = [Variant::Linear(Default::default())];
    score_variants(
        &mut report,
        "simple",
        prepared,
        table.target(),
        &linear,
        params.cv_folds(),
    );
    report
}

fn full_regime(
    params: &ComparisonValidParams,
    table: &Table,
    variants: &[Variant<f64>],
) -> RegimeReport {
    let mut report = RegimeReport::new(Regime::Full);
    log::info!("full regime on {} features", table.n_features());

    let full = prepare(params, table, &table.all_features());

    // Elimination only ever sees the training rows.
    let selected = match &full {
        Ok(prepared) => prepared
            .split
            .apply(prepared.records.view(), table.target())
            .and_then(|(x_train, _, y_train, _)| {
                select(
                    x_train.view(),
                    y_train.view(),
                    table.feature_names(),
                    params.n_selected_features(),
                )
            })
            .and_then(|features| {
                log::info!("selected features: {:?}", features.names());
                Ok(Prepared {
                    records: table.select(&features)?,
                    split: prepared.split.clone(),
                })
            }),
        Err(err) => Err(err.clone()),
    };
    if let Err(err) = &selected {
        log::warn!("feature selection failed: {}", err);
    }

    score_variants(
        &mut report,
        "full",
        full,
        table.target(),
        variants,
        params.cv_folds(),
    );
    score_variants(
        &mut report,
        "selected",
        selected,
        table.target(),
        variants,
        params.cv_folds(),
    );
    report
}

fn reduced_regime(
    params: &ComparisonValidParams,
    table: &Table,
    variants: &[Variant<f64>],
) -> RegimeReport {
    let mut report = RegimeReport::new(Regime::Reduced);

    // The projection is fitted once on every row, then split like the raw
    // features.
    let prepared = reduce(table.records(), params.variance_fraction()).and_then(|reduced| {
        log::info!(
            "reduced regime on {} components ({} of the variance)",
            reduced.n_components(),
            reduced.retained_variance()
        );
        let split = Split::new(table.n_rows(), params.test_fraction(), params.seed())?;
        Ok(Prepared {
            records: reduced.into_records(),
            split,
        })
    });
    if let Err(err) = &prepared {
        log::warn!("dimensionality reduction failed: {}", err);
    }

    score_variants(
        &mut report,
        "pca",
        prepared,
        table.target(),
        variants,
        params.cv_folds(),
    );
    report
}

fn prepare(params: &ComparisonValidParams, table: &Table, features: &FeatureSet) -> Result<Prepared> {
    let split = split(table, features, params.test_fraction(), params.seed())?;
    Ok(Prepared {
        records: table.select(features)?,
        split,
    })
}

/// Scores and cross-validates every variant on one feature set. A failed
/// preparation is recorded against every entry of the set.
fn score_variants(
    report: &mut RegimeReport,
    feature_set: &'static str,
    prepared: Result<Prepared>,
    y: ArrayView1<f64>,
    variants: &[Variant<f64>],
    cv_folds: usize,
) {
    let regime = report.regime;
    for variant in variants {
        let key = format!("{}/{}", feature_set, variant.name());
        let failure = |fold: Option<usize>, error: EstimatorError| EntryFailure {
            regime,
            feature_set,
            variant: variant.name(),
            fold,
            error,
        };

        let (score, cv) = match &prepared {
            Ok(prepared) => {
                let x = prepared.records.view();
                let score = prepared
                    .split
                    .apply(x, y)
                    .and_then(|(x_train, x_test, y_train, y_test)| {
                        let model = variant.fit(x_train.view(), y_train.view())?;
                        evaluate(&model, x_test.view(), y_test.view())
                    })
                    .map_err(|err| failure(None, err));
                let cv = cross_validate(variant, x, y, cv_folds)
                    .map(|folds| {
                        folds
                            .into_iter()
                            .enumerate()
                            .map(|(i, fold)| fold.map_err(|err| failure(Some(i), err)))
                            .collect()
                    })
                    .map_err(|err| failure(None, err));
                (score, cv)
            }
            Err(err) => (Err(failure(None, err.clone())), Err(failure(None, err.clone()))),
        };

        match &score {
            Ok(score) => log::debug!("{}: mse {}", key, score.mse),
            Err(failure) => log::warn!("{}", failure),
        }
        report.scores.push(key.clone(), score);
        report.cross_validation.push(key, cv);
    }
}
