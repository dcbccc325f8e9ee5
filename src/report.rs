//! Two-row (headings, values) rendering of a [`MultifractalDescription`].
//!
//! Column order is fixed. Headings are prefixed through a
//! [`HeadingLookup`] so the caller decides how scan variants are named.

use crate::curve_shape::CurveShape;
use crate::labels::{HeadingLookup, ScanVariant};
use crate::multifractal::MultifractalDescription;

/// Rendered for values that were not computed.
pub const NOT_CALCULATED: &str = "not calculated";

/// Rendered for a curve whose shape could not be classified.
pub const UNKNOWN: &str = "unknown";

/// Column headings in report order.
pub const COLUMNS: [&str; 13] = [
    "suggested scaling",
    "D amplitude q[0,2]",
    "D amplitude q[-1,2]",
    "summed f for q>0",
    "max f at q=0",
    "humped",
    "D never increases",
    "alpha never increases",
    "dimensional ordering",
    "flip error",
    "divergence",
    "anomaly rises",
    "cross-over",
];

fn number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.6}"),
        _ => NOT_CALCULATED.to_string(),
    }
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "yes" } else { "no" };
    label.to_string()
}

fn shape_label(shape: CurveShape) -> String {
    let label = match shape {
        CurveShape::Unknown => UNKNOWN,
        CurveShape::NotCurved => "not curved",
        CurveShape::Humped => "humped",
    };
    label.to_string()
}

/// Headings row and values row for one description.
///
/// # Example
/// ```rust
/// use fractal_scan::labels::{NoHeadings, ScanVariant};
/// use fractal_scan::multifractal::MultifractalDescriptor;
/// use fractal_scan::report::{render_description, COLUMNS};
/// use fractal_scan::spectrum::MultifractalSpectrum;
/// use fractal_scan::config::DescriptorConfig;
///
/// let descriptor = MultifractalDescriptor::new(DescriptorConfig::default()).unwrap();
/// let description = descriptor.describe(&MultifractalSpectrum::from_points(Vec::new()));
/// let [headings, values] = render_description(&description, &NoHeadings, ScanVariant::OneGrid);
/// assert_eq!(headings.len(), COLUMNS.len());
/// assert_eq!(values[0], "not determined");
/// assert_eq!(values[1], "not calculated");
/// ```
pub fn render_description(
    description: &MultifractalDescription,
    lookup: &dyn HeadingLookup,
    variant: ScanVariant,
) -> [Vec<String>; 2] {
    let prefix = lookup.heading_prefix(variant);
    let headings = COLUMNS.iter().map(|c| format!("{prefix}{c}")).collect();

    let d = description;
    let values = vec![
        d.scaling.to_string(),
        number(d.dimension_amplitude_narrow),
        number(d.dimension_amplitude_wide),
        number(d.summed_f_positive_q),
        number(d.f_at_q0),
        shape_label(d.dimension_curve.shape),
        yes_no(d.dimension_never_increases),
        yes_no(d.alpha_never_increases),
        d.ordering.to_string(),
        number(d.flip_error),
        number(d.divergence),
        d.anomaly_count.to_string(),
        number(d.cross_over),
    ];

    [headings, values]
}

/// The two rows joined with tabs, ready for a tab-separated report.
pub fn to_tab_rows(rows: &[Vec<String>; 2]) -> [String; 2] {
    [rows[0].join("\t"), rows[1].join("\t")]
}
