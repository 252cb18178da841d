//! Travel-time contour generator.
//!
//! Samples a routing service over a grid around an origin, fits a
//! travel-time surface to the samples and writes its iso-duration
//! contours as a KML document.
//!
//! - [`credentials`]: API key providers
//! - [`distance_matrix`]: the Distance Matrix backed duration source
//! - [`pipeline`]: the end-to-end run with crash-safe artifact writing

pub mod credentials;
pub mod distance_matrix;
pub mod pipeline;

pub use credentials::{CredentialError, CredentialProvider, EnvKeyProvider, KeyFileProvider};
pub use distance_matrix::{parse_response, DistanceMatrixClient, DistanceMatrixConfig};
pub use pipeline::{Pipeline, RunSummary};
