//! Invoice model, line-item accounting and precision rules.
//!
//! Everything needed to compute a Facturae invoice lives here; rendering
//! the XML document is the job of [`crate::export`].

pub(crate) mod accountant;
mod builder;
mod error;
mod item;
mod precision;
pub mod taxes;
mod totals;
mod types;
pub mod units;
mod validation;

pub use accountant::*;
pub use builder::*;
pub use error::*;
pub use item::*;
pub use precision::*;
pub use taxes::*;
pub use totals::*;
pub use types::*;
pub use units::*;
pub use validation::*;
