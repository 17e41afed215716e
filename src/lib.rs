// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive 3D scene viewer built on wgpu.
//!
//! Nightdrive loads a small city scene from glTF assets (a car, the city
//! itself, a decorative sphere), lights it with spot lights (a street lamp
//! and the car's headlights), and lets the user fly a free camera through
//! the scene while a scripted car drives a fixed route.
//!
//! # Key entry points
//!
//! - [`engine::DriveEngine`] - the rendering engine tying GPU and scene
//!   together
//! - [`scene::Scene`] - the scene state: models, lights, cameras, the car
//! - [`scene::model::Model`] - the glTF import pipeline
//! - [`camera::controller::FlightCamera`] - the free-flight camera
//! - [`options::Options`] - runtime configuration (camera, lighting,
//!   keybindings)
//!
//! # Architecture
//!
//! Everything is single-threaded and synchronous: assets are imported and
//! uploaded before the render loop starts, then each frame samples input,
//! updates scene state, and issues one forward render pass. The library
//! core (camera math, mesh building, scene import) has no window-system
//! dependency; the winit event loop lives behind the `viewer` feature.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod lighting;
pub mod options;
pub mod renderer;
pub mod scene;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::NightdriveError;
pub use input::{InputEvent, InputProcessor};
pub use scene::command::SceneCommand;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
