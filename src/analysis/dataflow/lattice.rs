//! Lattice traits for data flow analysis.
//!
//! A lattice defines how abstract values combine where control flow merges. Both
//! analyses in this crate are "may" problems over finite sets of variables, so their
//! meet is set union and the lattice height is bounded by the number of variables.
//! That bound is what makes the worklist solver terminate.

use std::fmt::Debug;

use crate::utils::BitSet;

/// A meet semi-lattice.
///
/// The meet operation combines information from multiple control flow paths.
/// It must satisfy:
///
/// - **Idempotent**: `x.meet(x) = x`
/// - **Commutative**: `x.meet(y) = y.meet(x)`
/// - **Associative**: `x.meet(y.meet(z)) = (x.meet(y)).meet(z)`
///
/// # Examples
///
/// ```rust
/// use irflow::analysis::MeetSemiLattice;
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Sign {
///     Unknown,
///     Positive,
///     Negative,
///     Any,
/// }
///
/// impl MeetSemiLattice for Sign {
///     fn meet(&self, other: &Self) -> Self {
///         match (self, other) {
///             (Self::Unknown, x) | (x, Self::Unknown) => x.clone(),
///             (a, b) if a == b => a.clone(),
///             _ => Self::Any,
///         }
///     }
///
///     fn is_bottom(&self) -> bool {
///         matches!(self, Self::Any)
///     }
/// }
///
/// assert_eq!(Sign::Positive.meet(&Sign::Negative), Sign::Any);
/// ```
pub trait MeetSemiLattice: Clone + Debug + PartialEq {
    /// Computes the meet of two lattice elements.
    #[must_use]
    fn meet(&self, other: &Self) -> Self;

    /// Returns `true` if this is the bottom element.
    ///
    /// Once bottom is reached, further meets cannot change the value.
    fn is_bottom(&self) -> bool;
}

impl MeetSemiLattice for BitSet {
    /// Union: a fact holds if it holds along any incoming path.
    fn meet(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.union_with(other);
        result
    }

    fn is_bottom(&self) -> bool {
        self.count() == self.len()
    }
}
