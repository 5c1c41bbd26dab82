pub mod batch;
pub mod clouds;
pub mod forward;
pub mod geometry;
pub mod shading;

#[cfg(test)]
mod doubles;

pub use crate::{
    backend::{self, Autodiff},
    error::Error,
    render::view::View,
    scene::gaussian_3d::Gaussian3dCloud,
    spherical_harmonics::{ShEvaluator, SH_DEGREE_MAX},
};
pub use batch::MergedBatch;
pub use burn::{
    config::Config,
    tensor::{backend::Backend, Bool, Int, Tensor},
};
pub use clouds::{CloudRole, Gaussian3dClouds};
pub use geometry::{Geometry, MergedGeometry};
pub use shading::Colors;

use burn::tensor::ElementConversion;
use std::fmt;

/// A rasterizer of 3D Gaussians.
///
/// It should return the radii in the same order as the input points.
pub trait Gaussian3dRasterizer<B: Backend> {
    fn rasterize(
        &self,
        input: forward::RenderInput<B>,
        settings: &forward::RasterizeSettings<B>,
    ) -> Result<forward::RenderOutput<B>, Error>;
}

impl<B: Backend, R: Gaussian3dRasterizer<B> + ?Sized> Gaussian3dRasterizer<B>
    for &R
{
    #[inline]
    fn rasterize(
        &self,
        input: forward::RenderInput<B>,
        settings: &forward::RasterizeSettings<B>,
    ) -> Result<forward::RenderOutput<B>, Error> {
        (**self).rasterize(input, settings)
    }
}

#[derive(Config, Debug)]
pub struct Gaussian3dRenderOptions {
    #[config(default = "false")]
    /// Merging the covariances derived from the clouds
    /// instead of the scalings and rotations.
    pub covariances_precomputed: bool,

    #[config(default = "false")]
    /// Evaluating the colors from spherical harmonics before rasterizing.
    pub colors_precomputed: bool,

    #[config(default = "false")]
    pub debug: bool,

    #[config(default = "1.0")]
    /// It scales the scalings of all points.
    pub scale_modifier: f64,
}

/// A compositor of two clouds.
///
/// The dynamic cloud is rendered along with the secondary cloud,
/// and only the 2D positions of the dynamic cloud receive gradients.
#[derive(Clone, Debug, Default)]
pub struct Gaussian3dCompositor<R, E> {
    pub rasterizer: R,
    pub sh_evaluator: E,
}

#[derive(Clone)]
pub struct Gaussian3dRenderOutput<B: Backend> {
    /// `[I_y, I_x, 3]`
    pub colors_rgb_2d: Tensor<B, 3>,

    /// `[P_d, 3]`
    ///
    /// ## Usage
    ///
    /// ```ignore
    /// let grads = loss.backward();
    /// let positions_2d_grad = output.positions_2d.grad(&grads);
    /// ```
    pub positions_2d: Tensor<B, 2>,

    /// `[P]`
    pub radii: Tensor<B, 1, Int>,

    /// `[P]`
    ///
    /// Whether the radius of each point is positive.
    pub visibility_filter: Tensor<B, 1, Bool>,
}

impl<R, E> Gaussian3dCompositor<R, E> {
    #[inline]
    pub fn new(
        rasterizer: R,
        sh_evaluator: E,
    ) -> Self {
        Self {
            rasterizer,
            sh_evaluator,
        }
    }

    /// Rendering the dynamic cloud and the secondary cloud together.
    ///
    /// - `colors_rgb_background` is `[3]`.
    /// - `colors_override` is `[P, 3]`, where `P` counts the points of both clouds.
    pub fn render<B: Backend>(
        &self,
        clouds: &Gaussian3dClouds<B>,
        view: &View,
        colors_rgb_background: Tensor<B, 1>,
        colors_override: Option<Tensor<B, 2>>,
        options: &Gaussian3dRenderOptions,
    ) -> Result<Gaussian3dRenderOutput<B>, Error>
    where
        R: Gaussian3dRasterizer<B>,
        E: ShEvaluator<B>,
    {
        #[cfg(debug_assertions)]
        log::debug!(
            target: "gausplat_composite::render",
            "Gaussian3dCompositor::render > point_count ({}, {})",
            clouds.dynamic_point_count(),
            clouds.secondary.point_count(),
        );

        view.validate()?;
        // The secondary cloud is rendered with the degree of the dynamic cloud.
        let colors_sh_degree = clouds.dynamic.colors_sh_degree_active;
        let colors_sh_degree_max =
            clouds.dynamic.colors_sh_degree_max.min(SH_DEGREE_MAX);
        if colors_sh_degree > colors_sh_degree_max {
            return Err(Error::Validation(
                format!("colors_sh_degree ({colors_sh_degree})"),
                format!("no more than {colors_sh_degree_max}"),
            ));
        }

        let batch = MergedBatch::compose(
            clouds,
            view,
            options,
            colors_override,
            &self.sh_evaluator,
        )?;

        if options.debug {
            log::info!(
                target: "gausplat_composite::render",
                "Gaussian3dCompositor::render > batch ({batch:?})",
            );
        }

        let settings = forward::RasterizeSettings::new(
            view,
            colors_rgb_background,
            options,
            colors_sh_degree,
        );
        let (input, positions_2d) = batch.into_input();
        let point_count = input.point_count;

        let output = self.rasterizer.rasterize(input, &settings)?;

        let radii_count = output.radii.dims()[0];
        if radii_count != point_count {
            return Err(Error::Rasterization(format!(
                "The rasterizer returned {radii_count} radii for {point_count} points"
            )));
        }

        let visibility_filter = output.radii.to_owned().greater_elem(0);

        let output = Gaussian3dRenderOutput {
            colors_rgb_2d: output.colors_rgb_2d,
            positions_2d,
            radii: output.radii,
            visibility_filter,
        };

        #[cfg(debug_assertions)]
        log::debug!(
            target: "gausplat_composite::render",
            "Gaussian3dCompositor::render > visible_count ({})",
            output.visible_count(),
        );

        Ok(output)
    }
}

impl<B: Backend> Gaussian3dRenderOutput<B> {
    /// Number of the visible points.
    #[inline]
    pub fn visible_count(&self) -> usize {
        self.visibility_filter
            .to_owned()
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>() as usize
    }
}

impl Default for Gaussian3dRenderOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> fmt::Debug for Gaussian3dRenderOutput<B> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct(&format!("Gaussian3dRenderOutput<{}>", B::name()))
            .field("colors_rgb_2d.dims()", &self.colors_rgb_2d.dims())
            .field("positions_2d.dims()", &self.positions_2d.dims())
            .field("radii.dims()", &self.radii.dims())
            .field("visibility_filter.dims()", &self.visibility_filter.dims())
            .finish()
    }
}
