//! # Constants and type definitions for fastecef
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **type
//! aliases** shared by the estimator, the evaluator and the reference Earth rotation model.
//!
//! ## Overview
//!
//! - Earth rotation rates
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians, days ↔ seconds)
//! - Time anchors (J2000 in MJD) and the validity range of the reference model
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth angular velocity used by WGS84 (rad/s)
pub const WGS84_EARTH_ANGULAR_VELOCITY: RadPerSec = 7.292115e-5;

/// Nominal mean angular velocity of the Earth, IERS (rad/s)
pub const NOMINAL_EARTH_ANGULAR_VELOCITY: RadPerSec = 7.2921159e-5;

/// First MJD (UTC) accepted by the reference Earth rotation model (1900-01-01)
pub const MODEL_MJD_MIN: MJD = 15_020.0;

/// Last MJD (UTC) accepted by the reference Earth rotation model (2100-01-01)
pub const MODEL_MJD_MAX: MJD = 88_069.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Angular rate in radians per second
pub type RadPerSec = f64;
/// Time offset or epoch on the run time axis, in seconds
pub type Seconds = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
