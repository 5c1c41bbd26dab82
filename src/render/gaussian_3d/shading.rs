//! Resolving the colors of the merged points.

pub use super::{clouds::*, View};
pub use crate::{error::Error, spherical_harmonics::ShEvaluator};

use burn::tensor::TensorData;
use std::fmt;

/// The colors handed to the rasterizer.
///
/// Exactly one representation is chosen for each render.
#[derive(Clone)]
pub enum Colors<B: Backend> {
    /// RGB colors supplied by the caller, passed through unchanged.
    ///
    /// `[P, 3]`
    Override(Tensor<B, 2>),
    /// RGB colors evaluated from spherical harmonics before rasterizing.
    ///
    /// `[P, 3]`, non-negative.
    Evaluated(Tensor<B, 2>),
    /// Spherical harmonics for the rasterizer to evaluate.
    ///
    /// `[P, 3, M]`
    Sh(Tensor<B, 3>),
}

impl<B: Backend> Colors<B> {
    /// Choosing and producing the colors of the merged points.
    ///
    /// - If `colors_override` is given, it is used as it is.
    /// - Otherwise, if `colors_precomputed` is `true`, the colors are evaluated
    ///   by `evaluator` at the active SH degree of the dynamic cloud.
    /// - Otherwise, the merged spherical harmonics are passed on.
    ///
    /// `positions_3d` is `[P, 3]`, the merged positions of `clouds`.
    pub fn resolve<E: ShEvaluator<B> + ?Sized>(
        clouds: &Gaussian3dClouds<B>,
        positions_3d: Tensor<B, 2>,
        view: &View,
        colors_override: Option<Tensor<B, 2>>,
        colors_precomputed: bool,
        evaluator: &E,
    ) -> Result<Self, Error> {
        if let Some(colors_rgb_3d) = colors_override {
            return Ok(Self::Override(colors_rgb_3d));
        }

        // [P, 3, M]
        let colors_sh = Self::compose_colors_sh(clouds)?;

        if !colors_precomputed {
            return Ok(Self::Sh(colors_sh));
        }

        // The secondary cloud is evaluated at the degree of the dynamic cloud as well.
        let colors_sh_degree = clouds.dynamic.colors_sh_degree_active;

        // [1, 3]
        let view_position = Tensor::<B, 1>::from_data(
            TensorData::from(view.view_position),
            &positions_3d.device(),
        )
        .unsqueeze::<2>();

        // [P, 3]
        let view_directions = {
            let view_offsets = positions_3d - view_position;
            view_offsets
                .to_owned()
                .div(view_offsets.powf_scalar(2.0).sum_dim(1).sqrt())
        };

        // [P, 3]
        let colors_rgb_3d = evaluator
            .evaluate(colors_sh_degree, colors_sh, view_directions)
            .add_scalar(0.5)
            .clamp_min(0.0);

        Ok(Self::Evaluated(colors_rgb_3d))
    }

    /// Merging the spherical harmonics of both clouds into `[P, 3, M]`.
    ///
    /// Both clouds should have the same `M`.
    pub fn compose_colors_sh(
        clouds: &Gaussian3dClouds<B>,
    ) -> Result<Tensor<B, 3>, Error> {
        let colors_sh_count = clouds.dynamic.colors_sh_count();
        let colors_sh_count_secondary = clouds.secondary.colors_sh_count();
        if colors_sh_count_secondary != colors_sh_count {
            return Err(Error::Validation(
                format!(
                    "SH coefficient count of the secondary cloud ({colors_sh_count_secondary})"
                ),
                format!(
                    "the same as the one of the dynamic cloud ({colors_sh_count})"
                ),
            ));
        }

        // [P, M, 3] -> [P, 3, M]
        Ok(clouds.concat(|_, cloud| cloud.get_colors_sh().swap_dims(1, 2)))
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Override(_) => "Override",
            Self::Evaluated(_) => "Evaluated",
            Self::Sh(_) => "Sh",
        }
    }

    /// `P`
    #[inline]
    pub fn point_count(&self) -> usize {
        match self {
            Self::Override(colors) | Self::Evaluated(colors) => colors.dims()[0],
            Self::Sh(colors_sh) => colors_sh.dims()[0],
        }
    }

    /// The RGB colors if they are ready for rasterizing.
    ///
    /// `[P, 3]`
    #[inline]
    pub fn colors_rgb_3d(&self) -> Option<&Tensor<B, 2>> {
        match self {
            Self::Override(colors) | Self::Evaluated(colors) => Some(colors),
            Self::Sh(_) => None,
        }
    }

    /// `[P, 3, M]`
    #[inline]
    pub fn colors_sh(&self) -> Option<&Tensor<B, 3>> {
        match self {
            Self::Override(_) | Self::Evaluated(_) => None,
            Self::Sh(colors_sh) => Some(colors_sh),
        }
    }
}

impl<B: Backend> fmt::Debug for Colors<B> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Override(colors) | Self::Evaluated(colors) => f
                .debug_tuple(self.name())
                .field(&colors.dims())
                .finish(),
            Self::Sh(colors_sh) => f
                .debug_tuple(self.name())
                .field(&colors_sh.dims())
                .finish(),
        }
    }
}
