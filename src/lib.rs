pub mod campaign;
pub mod constants;
pub mod earth_orientation;
pub mod estimator;
pub mod evaluator;
pub mod fastecef_errors;
pub mod reference;
pub mod rotation;
pub mod time;

pub mod prelude {
    pub use crate::campaign::{run_campaign, run_campaign_with_probe, CampaignParams};
    pub use crate::estimator::{AngularRate, BaseState, FastRotationEstimator, InertialState};
    pub use crate::evaluator::{evaluate, evaluate_with_probe, ErrorSample, ErrorStatistics};
    pub use crate::fastecef_errors::FastEcefError;
    pub use crate::reference::{
        IauEarthRotation, InertialFrame, ReferenceTransform, UniformSpinReference,
    };
}
