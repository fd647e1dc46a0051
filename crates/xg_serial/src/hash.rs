//! Hash containers with a fixed seed, so iteration-independent state
//! behaves identically across runs.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6B87_A14C_55D1_930E);

/// A fixed hasher provided hash results that only depend on the input.
pub type FixedHasher = FoldHasher<'static>;

/// Hash state based upon a random but fixed seed.
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// Containers

/// A [`hashbrown::HashMap`] with the fixed hash state.
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] with the fixed hash state.
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;
