//! Four articulated robots racing along curved multi-lane tracks.
//!
//! The crate computes everything a frame needs and hands geometry to a host supplied
//! [`DrawSurface`]. Windowing, input and texture loading stay with the host.

#![allow(missing_docs, reason = "TODO document the remaining public items")]
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::indexing_slicing,
        clippy::panic,
        reason = "tests fail loudly"
    )
)]

pub mod camera;
pub mod config;
pub mod curve;
pub mod draw;
mod error;
mod global_state;
pub mod material;
pub mod robot;
mod scene;
pub mod track;

pub use camera::CameraMode;
pub use config::RaceConfig;
pub use draw::{DrawSurface, RecordingSurface};
pub use error::{RaceError, RaceResult};
pub use global_state::GlobalState;
pub use lib_geometry::{Camera, Projection};
pub use scene::{draw_axis_frame, RaceScene, Terrain};
pub use track::{Lane, Track, TrackId};
