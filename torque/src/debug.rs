//! Optional visualization of what the physics is doing.
//!
//! Components record [`Marker`]s into a [`DebugMarkers`] collector when the host supplies one
//! for the tick; when it does not, nothing is recorded and nothing is computed for display.
//! Hosts that draw markers with their own entities can use [`MarkerPool`] to keep a
//! set of those entities in step with the markers of each tick.

use core::fmt;

use crate::math::{Cube, FreePoint, FreeVector, Obb};

/// One thing to draw for debugging.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Marker {
    /// Outline of an oriented bounding box.
    Obb(Obb),
    /// A voxel that was considered for collision.
    BlockHighlight {
        #[allow(missing_docs)]
        cube: Cube,
        #[allow(missing_docs)]
        style: HighlightStyle,
    },
    /// An arrow, such as a contact normal or an impulse.
    Vector {
        #[allow(missing_docs)]
        origin: FreePoint,
        #[allow(missing_docs)]
        vector: FreeVector,
    },
}

/// How prominently to draw a [`Marker::BlockHighlight`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum HighlightStyle {
    /// Fills the whole cube. Used for cubes that produced contacts.
    Full,
    /// A small mark at the cube's center. Used for cubes that were sampled but empty.
    Small,
}

/// Collects the [`Marker`]s and text notes produced during one tick.
#[derive(Clone, Default, PartialEq)]
pub struct DebugMarkers {
    markers: Vec<Marker>,
    notes: Vec<String>,
}

impl fmt::Debug for DebugMarkers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugMarkers")
            .field("markers", &self.markers.len())
            .field("notes", &self.notes)
            .finish()
    }
}

impl DebugMarkers {
    /// Constructs an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a marker.
    pub fn push(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// Records a line of text to be reported when the collector is flushed.
    pub fn note(&mut self, text: impl Into<String>) {
        self.notes.push(text.into());
    }

    /// Returns the markers recorded since the last flush.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Returns the notes recorded since the last flush.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Logs and discards the notes, and returns the markers, leaving the collector empty
    /// for the next tick.
    pub fn flush(&mut self) -> Vec<Marker> {
        for note in self.notes.drain(..) {
            log::debug!("{note}");
        }
        core::mem::take(&mut self.markers)
    }
}

/// Something that can display [`Marker`]s, such as a game world with marker entities.
pub trait MarkerHost {
    /// The host's reference to one displayed marker.
    type Handle;

    /// Creates a new displayed marker.
    fn spawn(&mut self, marker: &Marker) -> Self::Handle;

    /// Changes an existing displayed marker to show `marker` instead.
    fn update(&mut self, handle: &mut Self::Handle, marker: &Marker);

    /// Removes a displayed marker.
    fn remove(&mut self, handle: Self::Handle);
}

/// Keeps a list of host marker handles matching the most recent list of [`Marker`]s,
/// reusing handles by position instead of respawning them every tick.
pub struct MarkerPool<H: MarkerHost> {
    handles: Vec<H::Handle>,
}

impl<H: MarkerHost> fmt::Debug for MarkerPool<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerPool")
            .field("len", &self.handles.len())
            .finish_non_exhaustive()
    }
}

impl<H: MarkerHost> Default for MarkerPool<H> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
        }
    }
}

impl<H: MarkerHost> MarkerPool<H> {
    /// Constructs an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of handles currently displayed.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns whether no markers are currently displayed.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Makes the displayed markers match `markers`: existing handles are updated in order,
    /// handles are spawned for any extra markers, and leftover handles are removed.
    pub fn sync(&mut self, host: &mut H, markers: &[Marker]) {
        for (handle, marker) in self.handles.iter_mut().zip(markers) {
            host.update(handle, marker);
        }
        if markers.len() > self.handles.len() {
            for marker in &markers[self.handles.len()..] {
                self.handles.push(host.spawn(marker));
            }
        } else {
            for handle in self.handles.drain(markers.len()..) {
                host.remove(handle);
            }
        }
    }

    /// Removes every displayed marker.
    pub fn clear(&mut self, host: &mut H) {
        self.sync(host, &[]);
    }
}
