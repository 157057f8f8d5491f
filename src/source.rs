use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use indexmap::IndexMap;
use uom::si::f64::Time;

use crate::{Block, Contribution, ResidualError, UnknownKindError};

/// A parameter function of simulation time, used by [`Source::time_varying`].
///
/// Shared so that cloning a [`Source`] shares the functions rather than
/// duplicating them.
pub type TimeFunction = Rc<dyn Fn(Time) -> f64>;

/// Discriminates the supported source behaviors.
///
/// Parsing an unrecognized name fails with [`UnknownKindError`], so a
/// name-driven configuration layer cannot construct a silently-inert source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Fixed per-variable values, independent of block state and time.
    Const,
    /// Per-variable functions of the block's simulation time.
    Time,
}

impl FromStr for SourceKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "const" => Ok(Self::Const),
            "time" => Ok(Self::Time),
            other => Err(UnknownKindError(other.to_string())),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const => write!(f, "const"),
            Self::Time => write!(f, "time"),
        }
    }
}

/// A block-local, topology-independent contributor to a block's residual.
///
/// A source holds fixed parameters, keyed by state variable, and produces a
/// per-variable contribution on demand. The behavior is chosen once at
/// construction and is immutable thereafter; evaluation is a pure function of
/// the block's state and time and never mutates the block.
///
/// Sources hold no mutable state, so one source may be cloned onto several
/// blocks (clones share the underlying time functions), though typical
/// models construct one per block.
#[derive(Clone)]
pub enum Source {
    /// Fixed values: every evaluation returns the registered parameter for
    /// each state variable, regardless of the block's current values.
    Const(IndexMap<String, f64>),
    /// Time-varying forcing: each state variable's parameter function is
    /// invoked with the block's current simulation time.
    Time(IndexMap<String, TimeFunction>),
}

impl Source {
    /// Creates a constant source from per-variable values.
    #[must_use]
    pub fn constant<S, I>(parameters: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
    {
        Self::Const(
            parameters
                .into_iter()
                .map(|(variable, value)| (variable.into(), value))
                .collect(),
        )
    }

    /// Creates a time-varying source from per-variable functions of time.
    #[must_use]
    pub fn time_varying<S, F, I>(parameters: I) -> Self
    where
        S: Into<String>,
        F: Fn(Time) -> f64 + 'static,
        I: IntoIterator<Item = (S, F)>,
    {
        Self::Time(
            parameters
                .into_iter()
                .map(|(variable, f)| (variable.into(), Rc::new(f) as TimeFunction))
                .collect(),
        )
    }

    /// Returns this source's behavior discriminator.
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Const(_) => SourceKind::Const,
            Self::Time(_) => SourceKind::Time,
        }
    }

    /// Evaluates the source against `block`, producing a contribution for
    /// every variable currently in the block's state.
    ///
    /// The result is keyed in the block's state order. Evaluation reads the
    /// block's state and time only; it never writes to either.
    ///
    /// # Errors
    ///
    /// Returns [`ResidualError::MissingParameter`] if any state variable has
    /// no registered parameter, since an unproducible variable would leave
    /// the residual silently incomplete.
    pub fn evaluate(&self, block: &Block) -> Result<Contribution, ResidualError> {
        match self {
            Self::Const(parameters) => block
                .state()
                .variables()
                .map(|variable| {
                    parameters
                        .get(variable)
                        .map(|value| (variable.to_string(), *value))
                        .ok_or_else(|| missing(variable))
                })
                .collect(),
            Self::Time(parameters) => block
                .state()
                .variables()
                .map(|variable| {
                    parameters
                        .get(variable)
                        .map(|f| (variable.to_string(), f(block.time())))
                        .ok_or_else(|| missing(variable))
                })
                .collect(),
        }
    }
}

fn missing(variable: &str) -> ResidualError {
    ResidualError::MissingParameter {
        variable: variable.to_string(),
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(parameters) => f.debug_tuple("Const").field(parameters).finish(),
            Self::Time(parameters) => f
                .debug_struct("Time")
                .field("variables", &parameters.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::time::second;

    use crate::{Material, MaterialSet};

    fn test_block(initial: impl IntoIterator<Item = (&'static str, f64)>) -> Block {
        let materials = MaterialSet::new().with(Material::new("water"));
        Block::new("test", "water", &materials, initial).unwrap()
    }

    #[test]
    fn const_output_is_independent_of_state() {
        let mut block = test_block([("T", 20.0)]);
        let source = Source::constant([("T", 0.5)]);

        assert_relative_eq!(source.evaluate(&block).unwrap()["T"], 0.5);

        block.state_mut().set("T", 10.0);
        assert_relative_eq!(source.evaluate(&block).unwrap()["T"], 0.5);
    }

    #[test]
    fn time_source_invokes_parameter_with_block_time() {
        let mut block = test_block([("T", 0.0)]);
        block.set_time(Time::new::<second>(3.0));

        let source = Source::time_varying([("T", |t: Time| 2.0 * t.get::<second>())]);

        assert_relative_eq!(source.evaluate(&block).unwrap()["T"], 6.0);
    }

    #[test]
    fn missing_parameter_is_fatal() {
        let block = test_block([("T", 20.0), ("P", 101.3)]);
        let source = Source::constant([("T", 0.5)]);

        assert_eq!(
            source.evaluate(&block),
            Err(ResidualError::MissingParameter {
                variable: "P".to_string(),
            })
        );
    }

    #[test]
    fn cloned_source_serves_multiple_blocks() {
        let mut warm = test_block([("T", 20.0)]);
        let mut cold = test_block([("T", 5.0)]);
        warm.set_time(Time::new::<second>(2.0));
        cold.set_time(Time::new::<second>(4.0));

        let source = Source::time_varying([("T", |t: Time| 2.0 * t.get::<second>())]);
        let shared = source.clone();

        assert_relative_eq!(source.evaluate(&warm).unwrap()["T"], 4.0);
        assert_relative_eq!(shared.evaluate(&cold).unwrap()["T"], 8.0);
    }

    #[test]
    fn kind_parses_known_names_only() {
        assert_eq!("const".parse::<SourceKind>(), Ok(SourceKind::Const));
        assert_eq!("time".parse::<SourceKind>(), Ok(SourceKind::Time));
        assert_eq!(
            "ramp".parse::<SourceKind>(),
            Err(UnknownKindError("ramp".to_string()))
        );
    }

    #[test]
    fn kind_reports_the_constructed_behavior() {
        assert_eq!(Source::constant([("T", 1.0)]).kind(), SourceKind::Const);
        assert_eq!(
            Source::time_varying([("T", |_: Time| 0.0)]).kind(),
            SourceKind::Time
        );
    }
}
