//! The block grid that vehicles move through, as seen by the physics.

use hashbrown::HashMap;

use crate::math::Cube;

/// Read-only block queries which the physics makes against the host's world.
///
/// Implementations must be cheap and must not change their answers during a tick;
/// the physics never mutates the world.
pub trait World {
    /// Returns whether the block at `cube` blocks movement.
    fn is_block_collidable(&self, cube: Cube) -> bool;

    /// Returns whether the block at `cube` contains water.
    fn is_block_waterlogged(&self, cube: Cube) -> bool;
}

impl<W: World + ?Sized> World for &W {
    fn is_block_collidable(&self, cube: Cube) -> bool {
        (**self).is_block_collidable(cube)
    }
    fn is_block_waterlogged(&self, cube: Cube) -> bool {
        (**self).is_block_waterlogged(cube)
    }
}

/// The kind of a block stored in a [`SparseWorld`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum BlockKind {
    /// A solid block, such as stone.
    Solid,
    /// A block of water; not collidable.
    Water,
    /// A solid block which also holds water, such as a submerged fence.
    SolidWaterlogged,
}

impl BlockKind {
    /// Returns whether this kind of block blocks movement.
    pub fn is_collidable(self) -> bool {
        matches!(self, Self::Solid | Self::SolidWaterlogged)
    }

    /// Returns whether this kind of block contains water.
    pub fn is_waterlogged(self) -> bool {
        matches!(self, Self::Water | Self::SolidWaterlogged)
    }
}

/// An in-memory [`World`] which stores only the cubes that are not air.
///
/// ```
/// use torque::math::Cube;
/// use torque::world::{BlockKind, SparseWorld, World as _};
///
/// let mut world = SparseWorld::new();
/// world.set(Cube::new(0, 0, 0), BlockKind::Solid);
/// assert!(world.is_block_collidable(Cube::new(0, 0, 0)));
/// assert!(!world.is_block_collidable(Cube::new(0, 1, 0)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseWorld {
    blocks: HashMap<Cube, BlockKind>,
}

impl SparseWorld {
    /// Constructs a world containing only air.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the kind of the block at `cube`, or [`None`] for air.
    pub fn get(&self, cube: Cube) -> Option<BlockKind> {
        self.blocks.get(&cube).copied()
    }

    /// Replaces the block at `cube`, returning the previous one.
    pub fn set(&mut self, cube: Cube, kind: BlockKind) -> Option<BlockKind> {
        self.blocks.insert(cube, kind)
    }

    /// Replaces the block at `cube` with air, returning the previous one.
    pub fn clear(&mut self, cube: Cube) -> Option<BlockKind> {
        self.blocks.remove(&cube)
    }

    /// Fills the horizontal square layer at height `y` from `-radius` to `radius` inclusive
    /// on both horizontal axes.
    pub fn fill_layer(&mut self, y: i32, radius: i32, kind: BlockKind) {
        for x in -radius..=radius {
            for z in -radius..=radius {
                self.blocks.insert(Cube::new(x, y, z), kind);
            }
        }
    }

    /// Returns the number of non-air blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns whether the world is entirely air.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl World for SparseWorld {
    fn is_block_collidable(&self, cube: Cube) -> bool {
        self.get(cube).is_some_and(BlockKind::is_collidable)
    }

    fn is_block_waterlogged(&self, cube: Cube) -> bool {
        self.get(cube).is_some_and(BlockKind::is_waterlogged)
    }
}
