use thiserror::Error;

/// Errors that may occur while assembling a block's residual.
///
/// Every variant is a configuration defect surfaced immediately to the
/// caller. Residual assembly is all-or-nothing: no partial residual is ever
/// returned alongside one of these errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResidualError {
    /// A flux or source reported a contribution for a variable the block's
    /// state does not contain.
    ///
    /// Silently dropping the value or silently creating the variable would
    /// both hide a topology bug, so the contribution is rejected instead.
    #[error("contribution for `{variable}` matches no state variable on block `{block}`")]
    UnknownVariable { variable: String, block: String },

    /// A source was asked to evaluate a state variable for which it holds no
    /// parameter.
    ///
    /// Every state variable must be producible by every attached source, or
    /// the residual would silently pass as complete while missing a term.
    #[error("source has no parameter for state variable `{variable}`")]
    MissingParameter { variable: String },
}

/// A material name did not resolve against the [`MaterialLibrary`].
///
/// Raised at [`Block`] construction so a misspelled material is caught before
/// any residual is computed.
///
/// [`Block`]: crate::Block
/// [`MaterialLibrary`]: crate::MaterialLibrary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown material `{0}`")]
pub struct UnknownMaterialError(pub String);

/// A source kind name did not match any supported behavior.
///
/// Returned by [`SourceKind::from_str`](crate::SourceKind); a silently-inert
/// source would corrupt every residual that depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized source kind `{0}`")]
pub struct UnknownKindError(pub String);
