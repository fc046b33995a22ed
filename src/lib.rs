//! Reaction-rate evaluation and the nuclide / reaction / zone data model for
//! webnucleo nuclear astrophysics data.
//!
//! Records decoded from webnucleo files (as JSON or built in memory) become
//! [`Reaction`]s, [`Nuclide`]s and [`Zone`]s. A reaction's rate is evaluated at
//! a temperature `t9` (billions of K) with [`Reaction::compute_rate`], which
//! dispatches on the reaction's [`RateExpression`]: a constant, a tabulated
//! rate, NON-SMOKER fits, or a caller-supplied function registered in
//! [`UserFuncs`].
mod data;
pub mod error;
pub mod interpolate;
pub mod naming;
pub mod nuclide;
mod nuclide_catalog;
pub mod property;
pub mod rate;
pub mod reaction;
mod reaction_catalog;
mod user_funcs;
pub mod zone;

pub use error::{Result, WnError};
pub use interpolate::{interpolate_linear, CubicSpline, Interpolant};
pub use nuclide::{Nuclide, NuclideRecord, PartitionFunction};
pub use nuclide_catalog::{NetworkLimits, NuclideCatalog};
pub use property::PropertyKey;
pub use rate::{Fit, RateExpression, RateRecord, RateTable};
pub use reaction::{Reaction, ReactionMatcher, ReactionRecord};
pub use reaction_catalog::ReactionCatalog;
pub use user_funcs::{IntoUserFuncs, UserFuncs, UserRateFn};
pub use zone::{Nucleon, Zone, ZoneRecord};
