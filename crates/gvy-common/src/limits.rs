//! Centralized limits for the verifier.
//!
//! Class hierarchies arrive from earlier phases unchecked for cycles, and
//! statement trees can be arbitrarily deep. These bounds keep the walks in the
//! verifier finite on malformed input.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum number of superclass links followed when walking a hierarchy.
///
/// A cyclic `extends` chain is reported by the resolver, but the verifier may
/// still be handed one when compilation continues past resolution errors.
pub const MAX_HIERARCHY_DEPTH: usize = 256;

/// Maximum nesting of interfaces followed through `extends` clauses.
pub const MAX_INTERFACE_DEPTH: usize = 64;

/// Maximum statement/expression nesting visited by the code walkers.
pub const MAX_AST_WALK_DEPTH: usize = 2_000;

// =============================================================================
// Synthesized Name Limits
// =============================================================================

/// Maximum `$` suffixes appended while searching for a free synthetic field name.
pub const MAX_SYNTHETIC_NAME_ATTEMPTS: usize = 1_000;
