//! Reflection, refraction and critical angles of elastic waves at a planar
//! interface, together with the 2D geometry needed to draw and drag them.
//!
//! `solver` is the physics kernel; `ray` and `scene` turn its angles into
//! drawable rays; `session` owns the state of an interactive diagram.

pub mod media;
pub mod output;
pub mod ray;
pub mod scene;
pub mod session;
pub mod settings;
pub mod solver;
pub mod sweep;

#[cfg(feature = "visualization")]
pub mod helpers;
