//! Placement helpers layered on top of the core projections.

pub mod markers;

pub use markers::{
    MarkerLabel, MarkerLayout, MarkerPosition, MarkerShape, PlacedMarker, SeriesMarker,
    place_markers,
};
