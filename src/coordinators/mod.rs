//! Event plumbing between the surface, its container and the host.

pub mod crosshair;
pub mod listeners;
pub mod resize;

pub use crosshair::{CrosshairCoordinator, CrosshairPhase, CrosshairSnapshot, CrosshairUpdate};
pub use listeners::{Listener, ListenerChannel, ListenerId, ListenerRegistry};
pub use resize::{
    ContainerSize, ManualResizeObserver, ResizeCallback, ResizeCoordinator, ResizeObserver,
};
