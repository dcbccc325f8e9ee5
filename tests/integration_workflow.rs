//! Integration tests for full scan workflows
//!
//! These tests run the ScanAnalyzer end to end on synthetic scans with known
//! fractal properties and check that box counting, lacunarity, the spectrum
//! and the report layer agree with each other.

use assert_approx_eq::assert_approx_eq;
use fractal_scan::{
    labels::NoHeadings,
    report::{render_description, to_tab_rows, COLUMNS},
    AnalysisConfig, CurveShape, DimensionalOrdering, FractalAnalysisError, ScalingVerdict,
    ScanAnalyzer, ScanInput, ScanVariant,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeMap;

/// Box masses of a binary image at every size: only occupied boxes are kept.
fn scan_image(side: usize, pixel: impl Fn(usize, usize) -> bool, sizes: &[usize]) -> Vec<Vec<f64>> {
    sizes
        .iter()
        .map(|&s| {
            let mut masses = Vec::new();
            for bx in (0..side).step_by(s) {
                for by in (0..side).step_by(s) {
                    let mass = (bx..bx + s)
                        .flat_map(|x| (by..by + s).map(move |y| (x, y)))
                        .filter(|&(x, y)| pixel(x, y))
                        .count();
                    if mass > 0 {
                        masses.push(mass as f64);
                    }
                }
            }
            masses
        })
        .collect()
}

fn binomial_cascade(levels: i32, split: f64) -> (Vec<f64>, Vec<Vec<f64>>) {
    let mut sizes = Vec::new();
    let mut masses = Vec::new();
    let mut level = vec![1.0];
    for k in 0..=levels {
        sizes.push(0.5f64.powi(k));
        masses.push(level.clone());
        level = level.iter().flat_map(|m| [split * m, (1.0 - split) * m]).collect();
    }
    (sizes, masses)
}

/// Scenario: a Sierpinski triangle is scanned on a single grid.
///
/// Occupied boxes at size 2^j number 3^(6-j), each holding 3^j pixels, so the
/// dimension is log2(3) and the mass is perfectly even.
#[test]
fn test_sierpinski_triangle_scan() {
    let sizes = [1usize, 2, 4, 8, 16];
    let masses = scan_image(64, |x, y| x & y == 0, &sizes);
    let sizes: Vec<f64> = sizes.iter().map(|&s| s as f64).collect();
    let input = ScanInput::single(sizes, masses, ScanVariant::OneGrid);

    let results = ScanAnalyzer::new(AnalysisConfig::deep())
        .unwrap()
        .analyze(&input)
        .unwrap();

    let placement = &results.placements[0];
    assert_eq!(placement.box_count.counts(), &[729.0, 243.0, 81.0, 27.0, 9.0]);

    let fit = placement.dimension.unwrap();
    assert_approx_eq!(fit.slope, 3f64.log2(), 1e-9);
    assert_approx_eq!(fit.r_squared, 1.0, 1e-12);

    let lacunarity = results.lacunarity.as_ref().unwrap();
    assert_approx_eq!(lacunarity.mean.unwrap(), 1.0, 1e-12);

    let description = placement.multifractal.as_ref().unwrap();
    assert_eq!(description.scaling, ScalingVerdict::ProbablyMonofractal);
    assert_approx_eq!(description.dimension_amplitude_narrow.unwrap(), 0.0, 1e-9);
    assert_approx_eq!(description.f_at_q0.unwrap(), 3f64.log2(), 1e-9);
}

/// Scenario: a gray-level cascade is analysed and reported.
#[test]
fn test_cascade_workflow_with_report() {
    let (sizes, masses) = binomial_cascade(9, 0.75);
    let input = ScanInput::single(sizes, masses, ScanVariant::GrayOneGrid);

    let results = ScanAnalyzer::new(AnalysisConfig::deep())
        .unwrap()
        .analyze(&input)
        .unwrap();

    // every box of the cascade is occupied, so the support is a full line
    assert_approx_eq!(results.mean_dimension.unwrap(), 1.0, 1e-9);

    let description = results.multifractal_descriptions().next().unwrap();
    assert_eq!(description.scaling, ScalingVerdict::ProbablyMultifractal);
    assert_eq!(description.ordering, DimensionalOrdering::Expected);
    assert_eq!(description.dimension_curve.shape, CurveShape::NotCurved);
    assert!(description.dimension_never_increases);
    assert!(!description.flipped);

    let spectrum = results.placements[0].spectrum.as_ref().unwrap();
    let d0 = spectrum.dimension_at(0.0).unwrap();
    let d1 = spectrum.dimension_at(1.0).unwrap();
    let d2 = spectrum.dimension_at(2.0).unwrap();
    assert!(d0 > d1 && d1 > d2);
    let entropy = -(0.75 * 0.75f64.log2() + 0.25 * 0.25f64.log2());
    assert_approx_eq!(d1, entropy, 1e-9);

    let mut table = BTreeMap::new();
    table.insert(ScanVariant::GrayOneGrid, "G1 ".to_string());
    let rows = render_description(description, &table, input.variant);
    let [headings, values] = to_tab_rows(&rows);

    assert_eq!(headings.split('\t').count(), COLUMNS.len());
    assert!(headings.starts_with("G1 suggested scaling\tG1 D amplitude q[0,2]"));
    assert!(values.starts_with("probably multifractal\t"));
    assert!(!values.contains("not calculated"));
}

/// Scenario: several jittered grid placements of the same object.
#[test]
fn test_multiple_placements_agree() {
    let mut rng = StdRng::seed_from_u64(42);
    let sizes = vec![2.0, 4.0, 8.0, 16.0, 32.0];

    let placements: Vec<Vec<Vec<f64>>> = (0..6)
        .map(|_| {
            sizes
                .iter()
                .map(|&s: &f64| {
                    let boxes = (128.0 / s) as usize;
                    (0..boxes).map(|_| s * rng.gen_range(0.8..1.2)).collect()
                })
                .collect()
        })
        .collect();

    let input = ScanInput::new(sizes.clone(), placements, ScanVariant::GrayAllGrid);
    let results = ScanAnalyzer::new(AnalysisConfig::standard())
        .unwrap()
        .analyze(&input)
        .unwrap();

    assert_eq!(results.placements.len(), 6);
    assert_approx_eq!(results.mean_dimension.unwrap(), 1.0, 1e-9);
    assert_approx_eq!(results.dimension_std_dev.unwrap(), 0.0, 1e-12);

    let lacunarity = results.lacunarity.as_ref().unwrap();
    assert_eq!(lacunarity.placements.len(), 6);
    assert_eq!(lacunarity.lambda_by_size.len(), sizes.len());
    for lambda in lacunarity.lambda_by_size.iter().flatten() {
        // masses within ±20% of each other bound CV² near 0.04
        assert!(*lambda >= 1.0 && *lambda < 1.05, "lambda = {lambda}");
    }
    assert!(results.multifractal_descriptions().next().is_none());
}

/// Scenario: broken scans are rejected before any analysis runs.
#[test]
fn test_broken_scans_are_rejected() {
    let analyzer = ScanAnalyzer::new(AnalysisConfig::deep()).unwrap();

    let mismatched = ScanInput::new(
        vec![1.0, 2.0, 4.0],
        vec![vec![vec![1.0], vec![1.0], vec![1.0]], vec![vec![1.0]]],
        ScanVariant::AllGrid,
    );
    match analyzer.analyze(&mismatched) {
        Err(FractalAnalysisError::LengthMismatch { expected, actual, .. }) => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 1);
        }
        other => panic!("expected a length mismatch, got {other:?}"),
    }

    let negative = ScanInput::single(vec![1.0, -2.0], vec![vec![1.0], vec![1.0]], ScanVariant::AllGrid);
    assert!(matches!(
        analyzer.analyze(&negative),
        Err(FractalAnalysisError::InvalidSize { index: 1, .. })
    ));
}

/// Scenario: sizes too few for a fit leave results "not computed".
#[test]
fn test_underdetermined_scan_reports_not_calculated() {
    let input = ScanInput::single(vec![4.0], vec![vec![2.0, 3.0]], ScanVariant::OneGrid);
    let results = ScanAnalyzer::new(AnalysisConfig::deep())
        .unwrap()
        .analyze(&input)
        .unwrap();

    assert!(results.mean_dimension.is_none());
    let description = results.multifractal_descriptions().next().unwrap();
    assert_eq!(description.scaling, ScalingVerdict::NotDetermined);

    let [_, values] = render_description(description, &NoHeadings, ScanVariant::OneGrid);
    assert_eq!(values[0], "not determined");
    assert_eq!(values[1], "not calculated");
    assert_eq!(values[5], "unknown");
}
