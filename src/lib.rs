//! Geometry-free control-volume network modeling.
//!
//! A physical domain is modeled as a network of discrete blocks, each holding
//! a named set of state variables (temperature, pressure, and so on). Blocks
//! are coupled by directional [`Flux`] terms and perturbed by independent
//! [`Source`] terms. For any block, the residual is the per-variable sum of
//! every flux and source contribution:
//!
//! ```text
//! R(state) = Σ fluxes(state) + Σ sources(state)
//! ```
//!
//! A steady-state solution satisfies `R = 0` for every variable; an unsteady
//! integrator treats `R` as the time derivative of the state, scaled by the
//! block's [time coefficients](Block::time_coefficients).
//!
//! Blocks carry no geometric information. All geometry lives in the fluxes,
//! which act as boundary conditions on the blocks; concrete flux physics,
//! material property models, and the outer solver are supplied by the caller
//! through the [`Flux`] and [`MaterialLibrary`] contracts.
//!
//! Contributors are never globally ordered or merged ahead of time. Each flux
//! and source is queried independently and the results are summed, so the
//! residual is invariant under any permutation of attachment order.
//!
//! # Example
//!
//! ```
//! use blocknet::{Block, Material, MaterialSet, Source};
//!
//! let materials = MaterialSet::new().with(Material::new("water"));
//!
//! let mut block = Block::new("tank", "water", &materials, [("T", 20.0)])?;
//! block.attach_source(Source::constant([("T", 0.5)]));
//! block.attach_source(Source::constant([("T", 0.3)]));
//!
//! let residual = block.residual()?;
//! assert!((residual["T"] - 0.8).abs() < 1e-12);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod block;
mod error;
mod flux;
mod material;
mod source;
mod state;

pub use block::{Block, Residual};
pub use error::{ResidualError, UnknownKindError, UnknownMaterialError};
pub use flux::Flux;
pub use material::{Material, MaterialLibrary, MaterialSet};
pub use source::{Source, SourceKind, TimeFunction};
pub use state::{Contribution, State};
