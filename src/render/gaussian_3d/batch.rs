//! The merged points of a single render.

pub use super::{
    forward,
    geometry::*,
    shading::{Colors, Error, ShEvaluator},
    Gaussian3dRenderOptions, View,
};

/// All per-point tensors merged from the same [`Gaussian3dClouds`].
#[derive(Clone, Debug)]
pub struct MergedBatch<B: Backend> {
    pub colors: Colors<B>,
    pub geometry: MergedGeometry<B>,
}

impl<B: Backend> MergedBatch<B> {
    pub fn compose<E: ShEvaluator<B> + ?Sized>(
        clouds: &Gaussian3dClouds<B>,
        view: &View,
        options: &Gaussian3dRenderOptions,
        colors_override: Option<Tensor<B, 2>>,
        evaluator: &E,
    ) -> Result<Self, Error> {
        let geometry = MergedGeometry::compose(
            clouds,
            options.scale_modifier,
            options.covariances_precomputed,
        );
        let colors = Colors::resolve(
            clouds,
            geometry.positions_3d.to_owned(),
            view,
            colors_override,
            options.colors_precomputed,
            evaluator,
        )?;

        debug_assert_eq!(colors.point_count(), geometry.point_count());

        Ok(Self { colors, geometry })
    }

    /// Splitting into the rasterizer input and the 2D positions of the dynamic cloud.
    pub fn into_input(self) -> (forward::RenderInput<B>, Tensor<B, 2>) {
        let point_count = self.geometry.point_count();
        let MergedGeometry {
            geometry,
            opacities_3d,
            positions_2d,
            positions_2d_dynamic,
            positions_3d,
        } = self.geometry;

        let input = forward::RenderInput {
            colors: self.colors,
            geometry,
            opacities_3d,
            point_count,
            positions_2d,
            positions_3d,
        };

        (input, positions_2d_dynamic)
    }

    /// `P`
    #[inline]
    pub fn point_count(&self) -> usize {
        self.geometry.point_count()
    }
}
