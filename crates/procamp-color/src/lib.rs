//! ProcAmp Color — white-balance coefficients and YCgCo chroma math.
//!
//! Pure numeric building blocks for the render pipeline: the chromatic
//! adaptation model behind the temperature/tint controls, the YCgCo
//! decomposition used to build key-color targets, and change-keyed caches
//! for both.

pub mod cache;
pub mod error;
pub mod white_balance;
pub mod ycgco;

pub use cache::{CachedColorBalance, CachedKeyChroma};
pub use error::ColorError;
pub use white_balance::{cie_xy_to_lms, color_balance, standard_illuminant_y};
pub use ycgco::{key_chroma, rgb_to_ycgco, ycgco_to_rgb};
