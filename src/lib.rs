#![allow(missing_docs)]

pub mod backend;
pub mod error;
pub mod render;
pub mod scene;
pub mod spherical_harmonics;
