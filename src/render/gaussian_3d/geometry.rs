//! Merging the positions, opacities and shapes of two clouds.

pub use super::clouds::*;

use std::fmt;

/// The shapes of the merged points.
///
/// The rasterizer receives either the covariances or the scalings and rotations, never both.
#[derive(Clone)]
pub enum Geometry<B: Backend> {
    /// Precomputed 3D covariances.
    Covariances {
        /// `[P, 6]`
        covariances_3d: Tensor<B, 2>,
    },
    /// Scalings and rotations for the rasterizer to derive the covariances from.
    ScalingsRotations {
        /// `[P, 4]`
        rotations: Tensor<B, 2>,
        /// `[P, 3]`
        scalings: Tensor<B, 2>,
    },
}

impl<B: Backend> Geometry<B> {
    /// Merging the shapes of both clouds.
    ///
    /// If `covariances_precomputed` is `true`, the covariances are derived from
    /// each cloud with `scale_modifier` and then merged.
    /// Otherwise, the scalings and rotations are merged as they are.
    pub fn compose(
        clouds: &Gaussian3dClouds<B>,
        scale_modifier: f64,
        covariances_precomputed: bool,
    ) -> Self {
        if covariances_precomputed {
            Self::Covariances {
                covariances_3d: clouds
                    .concat(|_, cloud| cloud.get_covariances(scale_modifier)),
            }
        } else {
            Self::ScalingsRotations {
                rotations: clouds.concat(|_, cloud| cloud.get_rotations()),
                scalings: clouds.concat(|_, cloud| cloud.get_scalings()),
            }
        }
    }

    /// `[P, 6]`
    #[inline]
    pub fn covariances_3d(&self) -> Option<&Tensor<B, 2>> {
        match self {
            Self::Covariances { covariances_3d } => Some(covariances_3d),
            Self::ScalingsRotations { .. } => None,
        }
    }

    /// `[P, 4]`
    #[inline]
    pub fn rotations(&self) -> Option<&Tensor<B, 2>> {
        match self {
            Self::Covariances { .. } => None,
            Self::ScalingsRotations { rotations, .. } => Some(rotations),
        }
    }

    /// `[P, 3]`
    #[inline]
    pub fn scalings(&self) -> Option<&Tensor<B, 2>> {
        match self {
            Self::Covariances { .. } => None,
            Self::ScalingsRotations { scalings, .. } => Some(scalings),
        }
    }

    /// `P`
    #[inline]
    pub fn point_count(&self) -> usize {
        match self {
            Self::Covariances { covariances_3d } => covariances_3d.dims()[0],
            Self::ScalingsRotations { scalings, .. } => scalings.dims()[0],
        }
    }
}

/// The merged geometry of both clouds.
#[derive(Clone)]
pub struct MergedGeometry<B: Backend> {
    pub geometry: Geometry<B>,
    /// `[P, 1]`
    pub opacities_3d: Tensor<B, 2>,
    /// `[P, 3]`
    ///
    /// Zeros for receiving the gradients of 2D positions.
    pub positions_2d: Tensor<B, 2>,
    /// `[P_d, 3]`
    ///
    /// The leading part of [`MergedGeometry::positions_2d`] owned by the dynamic cloud.
    /// It requires gradients if the backend supports automatic differentiation.
    pub positions_2d_dynamic: Tensor<B, 2>,
    /// `[P, 3]`
    pub positions_3d: Tensor<B, 2>,
}

impl<B: Backend> MergedGeometry<B> {
    pub fn compose(
        clouds: &Gaussian3dClouds<B>,
        scale_modifier: f64,
        covariances_precomputed: bool,
    ) -> Self {
        let positions_3d = clouds.concat(|_, cloud| cloud.get_positions());
        let opacities_3d = clouds.concat(|_, cloud| cloud.get_opacities());
        let (positions_2d_dynamic, positions_2d) = Self::placeholders(clouds);
        let geometry =
            Geometry::compose(clouds, scale_modifier, covariances_precomputed);

        Self {
            geometry,
            opacities_3d,
            positions_2d,
            positions_2d_dynamic,
            positions_3d,
        }
    }

    /// Zeros standing in for the 2D positions, `([P_d, 3], [P, 3])`.
    ///
    /// The first one is the leading part of the second one.
    /// It requires gradients if the backend supports automatic differentiation,
    /// while the part of the secondary cloud never does.
    pub fn placeholders(
        clouds: &Gaussian3dClouds<B>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        // [P_d, 3]
        let positions_2d_dynamic = {
            let zeros = Tensor::zeros(
                [clouds.dynamic_point_count(), 3],
                &clouds.dynamic.device(),
            );
            if B::ad_enabled() {
                zeros.require_grad()
            } else {
                zeros
            }
        };

        // [P, 3]
        let positions_2d = clouds.concat(|role, cloud| match role {
            CloudRole::Dynamic => positions_2d_dynamic.to_owned(),
            CloudRole::Secondary => {
                Tensor::zeros([cloud.point_count(), 3], &cloud.device())
            },
        });

        (positions_2d_dynamic, positions_2d)
    }

    /// `P`
    #[inline]
    pub fn point_count(&self) -> usize {
        self.positions_3d.dims()[0]
    }
}

impl<B: Backend> fmt::Debug for Geometry<B> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Covariances { covariances_3d } => f
                .debug_struct("Covariances")
                .field("covariances_3d.dims()", &covariances_3d.dims())
                .finish(),
            Self::ScalingsRotations {
                rotations,
                scalings,
            } => f
                .debug_struct("ScalingsRotations")
                .field("rotations.dims()", &rotations.dims())
                .field("scalings.dims()", &scalings.dims())
                .finish(),
        }
    }
}

impl<B: Backend> fmt::Debug for MergedGeometry<B> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("MergedGeometry")
            .field("geometry", &self.geometry)
            .field("opacities_3d.dims()", &self.opacities_3d.dims())
            .field("positions_2d.dims()", &self.positions_2d.dims())
            .field(
                "positions_2d_dynamic.dims()",
                &self.positions_2d_dynamic.dims(),
            )
            .field("positions_3d.dims()", &self.positions_3d.dims())
            .finish()
    }
}
