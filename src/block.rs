use std::cell::RefCell;
use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use indexmap::IndexMap;
#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};
use uom::si::f64::Time;
use uom::ConstZero;

use crate::{
    Contribution, Flux, Material, MaterialLibrary, ResidualError, Source, State,
    UnknownMaterialError,
};

/// A state-holding node in the physical network.
///
/// A block owns its state variables and the full set of flux and source
/// contributors to its governing equation:
///
/// ```text
/// R(state) = Σ fluxes(state) + Σ sources(state) = 0
/// ```
///
/// Blocks carry no geometric information; geometry belongs to the fluxes.
/// The outer solver mutates [`state`](Block::state_mut) and
/// [`time`](Block::set_time) between calls to [`residual`](Block::residual)
/// and is responsible for convergence or time-stepping.
///
/// Attached fluxes are shared handles (`Rc<RefCell<dyn Flux>>`) because one
/// coupling flux legitimately connects two blocks. The handles make `Block`
/// single-threaded by construction, matching the synchronous solver loop this
/// core is built for.
pub struct Block {
    name: String,
    material: Material,
    state: State,
    time: Time,
    fluxes: Vec<Rc<RefCell<dyn Flux>>>,
    sources: Vec<Source>,
}

/// The per-variable residual of a block, keyed in state order.
///
/// Zero for every variable at steady state. An unsteady integrator divides
/// each entry by the matching [time coefficient](Block::time_coefficients) to
/// form the state's time derivative.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Residual {
    terms: IndexMap<String, f64>,
}

impl Block {
    /// Creates a block with the given name, material, and initial state.
    ///
    /// The material is resolved once, here; simulation time starts at zero.
    /// The initial pairs fix the block's variable set and its canonical
    /// iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownMaterialError`] if `material` is not registered in
    /// `materials`.
    pub fn new<L, S, I>(
        name: impl Into<String>,
        material: &str,
        materials: &L,
        initial_state: I,
    ) -> Result<Self, UnknownMaterialError>
    where
        L: MaterialLibrary + ?Sized,
        S: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
    {
        Ok(Self {
            name: name.into(),
            material: materials.resolve(material)?.clone(),
            state: initial_state.into_iter().collect(),
            time: Time::ZERO,
            fluxes: Vec::new(),
            sources: Vec::new(),
        })
    }

    /// Returns the block's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the material resolved at construction.
    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Returns the block's current state.
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns the block's state for mutation by the outer solver.
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> Time {
        self.time
    }

    /// Sets the simulation time, normally from the outer integrator.
    pub fn set_time(&mut self, time: Time) {
        self.time = time;
    }

    /// Attaches a flux and records this block on it via [`Flux::bind`].
    ///
    /// Fluxes accumulate in attachment order, but the order never affects the
    /// residual: contributions commute under addition.
    pub fn attach_flux(&mut self, flux: Rc<RefCell<dyn Flux>>) {
        flux.borrow_mut().bind(&self.name);
        self.fluxes.push(flux);
    }

    /// Attaches a source.
    pub fn attach_source(&mut self, source: Source) {
        self.sources.push(source);
    }

    /// Assembles the block's residual.
    ///
    /// Every variable currently in the state starts at zero; each attached
    /// flux and source is evaluated independently and its contribution folded
    /// in additively. With no contributors attached, the residual is zero for
    /// every variable.
    ///
    /// Assembly is a pure read: no block state is mutated, and calling this
    /// twice without intervening mutation yields identical results.
    ///
    /// # Errors
    ///
    /// - [`ResidualError::UnknownVariable`] if a contributor reports a
    ///   variable absent from the state.
    /// - [`ResidualError::MissingParameter`] if an attached source holds no
    ///   parameter for some state variable.
    ///
    /// No partial residual is returned on error.
    pub fn residual(&self) -> Result<Residual, ResidualError> {
        let mut terms: IndexMap<String, f64> = self
            .state
            .variables()
            .map(|variable| (variable.to_string(), 0.0))
            .collect();

        for flux in &self.fluxes {
            self.accumulate(&mut terms, &flux.borrow().evaluate())?;
        }
        for source in &self.sources {
            self.accumulate(&mut terms, &source.evaluate(self)?)?;
        }

        Ok(Residual { terms })
    }

    /// Returns the per-variable multiplier on the time term, used by an
    /// unsteady integrator to scale `d(state)/dt`.
    ///
    /// Every variable currently in the state maps to 1. The mapping is
    /// recomputed from the live state on every call, so variables added after
    /// construction are included.
    #[must_use]
    pub fn time_coefficients(&self) -> Contribution {
        self.state
            .variables()
            .map(|variable| (variable.to_string(), 1.0))
            .collect()
    }

    fn accumulate(
        &self,
        terms: &mut IndexMap<String, f64>,
        contribution: &Contribution,
    ) -> Result<(), ResidualError> {
        for (variable, value) in contribution {
            match terms.get_mut(variable) {
                Some(total) => *total += value,
                None => {
                    return Err(ResidualError::UnknownVariable {
                        variable: variable.clone(),
                        block: self.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Diagnostic dump: block name, state pairs in order, and material name.
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.name)?;
        for (i, (variable, value)) in self.state.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{variable}={value}")?;
        }
        write!(f, "] {}", self.material.name())
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("name", &self.name)
            .field("material", &self.material.name())
            .field("state", &self.state)
            .field("time", &self.time)
            .field("fluxes", &self.fluxes.len())
            .field("sources", &self.sources)
            .finish()
    }
}

impl Residual {
    /// Returns the residual for `variable`, if present.
    #[must_use]
    pub fn get(&self, variable: &str) -> Option<f64> {
        self.terms.get(variable).copied()
    }

    /// Iterates over `(variable, residual)` pairs in state order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns the number of variables in the residual.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the residual holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Index<&str> for Residual {
    type Output = f64;

    /// # Panics
    ///
    /// Panics if `variable` is not present; use [`Residual::get`] for a
    /// fallible lookup.
    fn index(&self, variable: &str) -> &Self::Output {
        &self.terms[variable]
    }
}
