//! The ordered pair of clouds to composite.

pub use crate::scene::gaussian_3d::{Backend, Gaussian3dCloud, Tensor};

use std::fmt;

/// The role of a cloud in a composited render.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CloudRole {
    /// The cloud being optimized.
    Dynamic,
    /// The frozen cloud rendered along with the dynamic one.
    Secondary,
}

/// A dynamic cloud and a secondary cloud.
///
/// Every merged tensor is built by [`Gaussian3dClouds::concat`],
/// so the points of the dynamic cloud always come first,
/// i.e., `[0, P_d)` is dynamic and `[P_d, P_d + P_s)` is secondary.
pub struct Gaussian3dClouds<'a, B: Backend> {
    pub dynamic: &'a Gaussian3dCloud<B>,
    pub secondary: &'a Gaussian3dCloud<B>,
}

impl<'a, B: Backend> Gaussian3dClouds<'a, B> {
    #[inline]
    pub fn new(
        dynamic: &'a Gaussian3dCloud<B>,
        secondary: &'a Gaussian3dCloud<B>,
    ) -> Self {
        Self { dynamic, secondary }
    }

    /// The clouds in merging order.
    #[inline]
    pub fn ordered(&self) -> [(CloudRole, &'a Gaussian3dCloud<B>); 2] {
        [
            (CloudRole::Dynamic, self.dynamic),
            (CloudRole::Secondary, self.secondary),
        ]
    }

    /// Concatenating the per-point tensors of both clouds along the first dimension.
    pub fn concat<const D: usize>(
        &self,
        mut f: impl FnMut(CloudRole, &Gaussian3dCloud<B>) -> Tensor<B, D>,
    ) -> Tensor<B, D> {
        Tensor::cat(
            self.ordered()
                .into_iter()
                .map(|(role, cloud)| {
                    let tensor = f(role, cloud);
                    debug_assert_eq!(
                        tensor.dims()[0],
                        cloud.point_count(),
                        "The tensor of the {role:?} cloud should have one row per point",
                    );
                    tensor
                })
                .collect(),
            0,
        )
    }

    /// `P_d`
    #[inline]
    pub fn dynamic_point_count(&self) -> usize {
        self.dynamic.point_count()
    }

    /// `P_d + P_s`
    #[inline]
    pub fn point_count(&self) -> usize {
        self.dynamic.point_count() + self.secondary.point_count()
    }
}

impl<B: Backend> Clone for Gaussian3dClouds<'_, B> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Backend> Copy for Gaussian3dClouds<'_, B> {}

impl<B: Backend> fmt::Debug for Gaussian3dClouds<'_, B> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Gaussian3dClouds")
            .field("dynamic", self.dynamic)
            .field("secondary", self.secondary)
            .finish()
    }
}
