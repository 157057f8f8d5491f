use crate::Contribution;

/// A coupling term between blocks.
///
/// Concrete fluxes own all geometry and transport physics; the core only
/// depends on this contract. A flux is evaluated with no arguments because it
/// is already bound to the state it couples — whatever block references and
/// coefficients it needs are captured when the flux subsystem constructs it.
///
/// Fluxes attached to a block are queried independently and their
/// contributions summed, so an implementation must not depend on evaluation
/// order relative to other contributors.
pub trait Flux {
    /// Returns the per-variable contribution to the owning block's residual.
    fn evaluate(&self) -> Contribution;

    /// Records the block this flux now belongs to.
    ///
    /// Called by [`Block::attach_flux`](crate::Block::attach_flux) with the
    /// attaching block's name. The association is non-owning: the flux stores
    /// an identifier, never the block itself, since the flux's lifetime is
    /// managed by whoever constructed it. Attaching the same flux to another
    /// block overwrites the previous association.
    fn bind(&mut self, block: &str);
}
