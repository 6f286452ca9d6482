//! # Validation campaign
//!
//! Repeats the estimate-versus-reference comparison from several base epochs
//! and aggregates the error per elapsed offset, which shows how the fast
//! estimate degrades with distance from its anchor independently of where the
//! anchor sits.
//!
//! ## Layout of a campaign
//!
//! ```text
//! sample k   (k = 0 .. sample_points)      base epoch  t_k = start_epoch + k · step
//! test  i    (i = 0 .. tests_per_sample)   query epoch t_k + i · test_step
//! ```
//!
//! For every offset `i · test_step` the deviations of all samples are folded
//! into one [`ErrorStatistics`].
//!
//! ## Example
//!
//! ```rust
//! use fastecef::campaign::{run_campaign, CampaignParams};
//! use fastecef::reference::UniformSpinReference;
//!
//! let params = CampaignParams::builder()
//!     .sample_points(3)
//!     .tests_per_sample(4)
//!     .test_step(30.0)
//!     .build()
//!     .unwrap();
//!
//! let reference = UniformSpinReference::new(0.0, 7.292115e-5);
//! let report = run_campaign(&params, &reference).unwrap();
//! assert_eq!(report.offsets().len(), 4);
//! println!("{report}");
//! ```
use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
    constants::Seconds,
    estimator::{AngularRate, BaseState},
    evaluator::{
        evaluate, evaluate_with_probe, ErrorSample, ErrorStatistics, InertialStateSource,
        DEFAULT_VELOCITY_STEP,
    },
    fastecef_errors::FastEcefError,
    reference::ReferenceTransform,
};

/// Configuration of a validation campaign.
///
/// Defaults
/// -----------------
/// * `sample_points`: 6
/// * `step`: 900 s (15 min between base epochs)
/// * `tests_per_sample`: 10
/// * `test_step`: 10 s
/// * `start_epoch`: 0 s
/// * `rate`: [`AngularRate::EARTH_WGS84`]
/// * `velocity_step`: [`DEFAULT_VELOCITY_STEP`]
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignParams {
    /// Number of base epochs.
    pub sample_points: usize,
    /// Spacing between base epochs (s).
    pub step: Seconds,
    /// Number of query epochs per base epoch, the base epoch itself included.
    pub tests_per_sample: usize,
    /// Spacing between query epochs (s).
    pub test_step: Seconds,
    /// First base epoch on the run time axis (s).
    pub start_epoch: Seconds,
    pub rate: AngularRate,
    /// Finite-difference step for the reference velocity when a probe is used (s).
    pub velocity_step: Seconds,
}

impl CampaignParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CampaignParamsBuilder {
        CampaignParamsBuilder::new()
    }

    /// Base epoch of every sample, in order.
    pub fn base_epochs(&self) -> Vec<Seconds> {
        (0..self.sample_points)
            .map(|k| self.start_epoch + k as f64 * self.step)
            .collect()
    }

    /// Offsets of the query epochs from their base epoch, in order.
    pub fn query_offsets(&self) -> Vec<Seconds> {
        (0..self.tests_per_sample)
            .map(|i| i as f64 * self.test_step)
            .collect()
    }

    /// Check the parameters. Run by the builder and again by every campaign
    /// runner, since the fields are public.
    ///
    /// Validation rules
    /// -----------------
    /// * `sample_points ≥ 1`, `tests_per_sample ≥ 1`.
    /// * `step ≥ 0` (zero repeats the same base epoch).
    /// * `test_step > 0`, `velocity_step > 0`.
    /// * `start_epoch` finite.
    pub fn validate(&self) -> Result<(), FastEcefError> {
        let invalid = |msg: &str| Err(FastEcefError::InvalidCampaignParameter(msg.into()));

        if self.sample_points == 0 {
            return invalid("sample_points must be >= 1");
        }
        if self.tests_per_sample == 0 {
            return invalid("tests_per_sample must be >= 1");
        }
        if !ge0(self.step) {
            return invalid("step must be finite and non-negative");
        }
        if !gt0(self.test_step) {
            return invalid("test_step must be finite and > 0");
        }
        if !gt0(self.velocity_step) {
            return invalid("velocity_step must be finite and > 0");
        }
        if !self.start_epoch.is_finite() {
            return invalid("start_epoch must be finite");
        }
        Ok(())
    }
}

/// Return true iff x > 0.0 and finite.
#[inline]
fn gt0(x: f64) -> bool {
    x.is_finite() && x.partial_cmp(&0.0) == Some(Greater)
}

/// Return true iff x >= 0.0 and finite.
#[inline]
fn ge0(x: f64) -> bool {
    x.is_finite() && matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
}

impl Default for CampaignParams {
    fn default() -> Self {
        CampaignParams {
            sample_points: 6,
            step: 15.0 * 60.0,
            tests_per_sample: 10,
            test_step: 10.0,
            start_epoch: 0.0,
            rate: AngularRate::EARTH_WGS84,
            velocity_step: DEFAULT_VELOCITY_STEP,
        }
    }
}

/// Builder for [`CampaignParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct CampaignParamsBuilder {
    params: CampaignParams,
}

impl CampaignParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: CampaignParams::default(),
        }
    }

    pub fn sample_points(mut self, v: usize) -> Self {
        self.params.sample_points = v;
        self
    }
    pub fn step(mut self, v: Seconds) -> Self {
        self.params.step = v;
        self
    }
    pub fn tests_per_sample(mut self, v: usize) -> Self {
        self.params.tests_per_sample = v;
        self
    }
    pub fn test_step(mut self, v: Seconds) -> Self {
        self.params.test_step = v;
        self
    }
    pub fn start_epoch(mut self, v: Seconds) -> Self {
        self.params.start_epoch = v;
        self
    }
    pub fn rate(mut self, v: AngularRate) -> Self {
        self.params.rate = v;
        self
    }
    pub fn velocity_step(mut self, v: Seconds) -> Self {
        self.params.velocity_step = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Errors
    /// ------
    /// * [`FastEcefError::InvalidCampaignParameter`], see [`CampaignParams::validate`].
    pub fn build(self) -> Result<CampaignParams, FastEcefError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

/// Probe state error statistics at one offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbeStatistics {
    /// km
    pub position: ErrorStatistics,
    /// km/s
    pub velocity: ErrorStatistics,
    /// rad
    pub velocity_angle: ErrorStatistics,
}

/// Aggregated errors at one elapsed offset across all samples.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetStatistics {
    pub offset: Seconds,
    pub deviation: ErrorStatistics,
    pub probe: Option<ProbeStatistics>,
}

/// Result of [`run_campaign`] / [`run_campaign_with_probe`].
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignReport {
    offsets: Vec<OffsetStatistics>,
    overall: ErrorStatistics,
    sample_points: usize,
}

impl CampaignReport {
    /// Per-offset statistics, by increasing offset.
    pub fn offsets(&self) -> &[OffsetStatistics] {
        &self.offsets
    }

    /// Deviation statistics over every evaluated epoch.
    pub fn overall(&self) -> &ErrorStatistics {
        &self.overall
    }

    pub fn sample_points(&self) -> usize {
        self.sample_points
    }

    fn empty(params: &CampaignParams) -> Self {
        CampaignReport {
            offsets: params
                .query_offsets()
                .into_iter()
                .map(|offset| OffsetStatistics {
                    offset,
                    deviation: ErrorStatistics::new(),
                    probe: None,
                })
                .collect(),
            overall: ErrorStatistics::new(),
            sample_points: 0,
        }
    }

    /// Fold one sample's results; `samples[i]` belongs to offset `i`.
    fn absorb(&mut self, samples: &[ErrorSample]) {
        for (stats, sample) in self.offsets.iter_mut().zip(samples) {
            stats.deviation.push(sample.deviation);
            self.overall.push(sample.deviation);

            if let Some(err) = sample.probe {
                let probe = stats.probe.get_or_insert_with(ProbeStatistics::default);
                probe.position.push(err.position_error);
                probe.velocity.push(err.velocity_error);
                probe.velocity_angle.push(err.velocity_angle_error);
            }
        }
        self.sample_points += 1;
    }
}

/// Run a campaign against `provider`.
///
/// Errors
/// ------
/// * [`FastEcefError::InvalidCampaignParameter`] if `params` fails
///   [`CampaignParams::validate`].
/// * The first [`FastEcefError`] raised by a base state or a query epoch; the
///   campaign is aborted without a report.
pub fn run_campaign(
    params: &CampaignParams,
    provider: &impl ReferenceTransform,
) -> Result<CampaignReport, FastEcefError> {
    run_with(params, provider, |base, epochs| {
        evaluate(base, params.rate, epochs, provider)
    })
}

/// Run a campaign, also comparing the fixed-frame state of a probe object.
pub fn run_campaign_with_probe(
    params: &CampaignParams,
    provider: &impl ReferenceTransform,
    probe: &impl InertialStateSource,
) -> Result<CampaignReport, FastEcefError> {
    run_with(params, provider, |base, epochs| {
        evaluate_with_probe(
            base,
            params.rate,
            epochs,
            provider,
            probe,
            params.velocity_step,
        )
    })
}

fn run_with<F>(
    params: &CampaignParams,
    provider: &impl ReferenceTransform,
    evaluate_sample: F,
) -> Result<CampaignReport, FastEcefError>
where
    F: Fn(&BaseState, &[Seconds]) -> Result<Vec<ErrorSample>, FastEcefError>,
{
    params.validate()?;

    log::info!(
        "running {} samples x {} tests (step {} s, test step {} s, rate {:e} rad/s)",
        params.sample_points,
        params.tests_per_sample,
        params.step,
        params.test_step,
        params.rate.value()
    );

    let offsets = params.query_offsets();
    let mut report = CampaignReport::empty(params);

    for base_epoch in params.base_epochs() {
        let base = BaseState::from_reference(provider, base_epoch)?;
        let epochs: Vec<Seconds> = offsets.iter().map(|dt| base_epoch + dt).collect();

        let samples = evaluate_sample(&base, &epochs)?;
        log::debug!(
            "sample at {base_epoch} s: max deviation {:.3e} rad",
            samples.iter().map(|s| s.deviation).fold(0.0, f64::max)
        );
        report.absorb(&samples);
    }

    log::info!(
        "campaign done: {} epochs, max deviation {:.3e} rad",
        report.overall.count(),
        report.overall.max()
    );

    Ok(report)
}

impl fmt::Display for CampaignReport {
    /// Render the per-offset statistics as a table.
    ///
    /// Deviations are shown in radians; probe errors, when present, in meters,
    /// meters per second and degrees.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Fast rotation estimate vs reference ({} samples)",
            self.sample_points
        )?;

        let with_probe = self.offsets.iter().any(|o| o.probe.is_some());

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let mut header = vec![
            Cell::new("Δt [s]"),
            Cell::new("deviation [rad]"),
            Cell::new("σ [rad]"),
            Cell::new("max [rad]"),
        ];
        if with_probe {
            header.extend([
                Cell::new("pos err [m] ±σ"),
                Cell::new("vel err [m/s] ±σ"),
                Cell::new("vel angle [deg] ±σ"),
            ]);
        }
        table.set_header(header);

        let right = |s: String| Cell::new(s).set_alignment(CellAlignment::Right);
        let mean_sd = |stats: &ErrorStatistics, scale: f64| {
            format!("{:.6e} ±{:.2e}", stats.mean() * scale, stats.std_dev() * scale)
        };

        for o in &self.offsets {
            let mut row = vec![
                right(format!("{:.3}", o.offset)),
                right(format!("{:.6e}", o.deviation.mean())),
                right(format!("{:.2e}", o.deviation.std_dev())),
                right(format!("{:.6e}", o.deviation.max())),
            ];
            if with_probe {
                match &o.probe {
                    Some(p) => row.extend([
                        right(mean_sd(&p.position, 1e3)),
                        right(mean_sd(&p.velocity, 1e3)),
                        right(mean_sd(&p.velocity_angle, 1.0_f64.to_degrees())),
                    ]),
                    None => row.extend([right("-".into()), right("-".into()), right("-".into())]),
                }
            }
            table.add_row(Row::from(row));
        }

        writeln!(f, "{table}")
    }
}
