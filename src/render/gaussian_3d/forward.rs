pub use super::*;

/// The merged points for the rasterizer.
///
/// Every tensor has the same points in the same order.
#[derive(Clone, Debug)]
pub struct RenderInput<B: Backend> {
    pub colors: Colors<B>,
    pub geometry: Geometry<B>,
    /// `[P, 1]`
    pub opacities_3d: Tensor<B, 2>,
    /// `P`
    pub point_count: usize,
    /// `[P, 3]`
    pub positions_2d: Tensor<B, 2>,
    /// `[P, 3]`
    pub positions_3d: Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct RenderOutput<B: Backend> {
    /// `[I_y, I_x, 3]`
    pub colors_rgb_2d: Tensor<B, 3>,
    /// `[P]`
    ///
    /// Radii of the points on the image, in the order of [`RenderInput`].
    pub radii: Tensor<B, 1, Int>,
}

/// The settings of a single rasterization.
#[derive(Clone, Debug)]
pub struct RasterizeSettings<B: Backend> {
    /// `[3]`
    pub colors_rgb_background: Tensor<B, 1>,
    /// `(0 ~ 3)`, the active SH degree of the dynamic cloud
    pub colors_sh_degree: u32,
    /// `tan(Fov_x / 2)`
    pub field_of_view_x_half_tan: f64,
    /// `tan(Fov_y / 2)`
    pub field_of_view_y_half_tan: f64,
    /// `I_y`
    pub image_size_y: u32,
    /// `I_x`
    pub image_size_x: u32,
    pub is_debug: bool,
    /// Whether the points outside of the view frustum are already removed.
    pub is_prefiltered: bool,
    /// Column-major
    pub projection_transform: [[f64; 4]; 4],
    pub scale_modifier: f64,
    pub view_position: [f64; 3],
    /// Column-major
    pub view_transform: [[f64; 4]; 4],
}

impl<B: Backend> RasterizeSettings<B> {
    pub fn new(
        view: &View,
        colors_rgb_background: Tensor<B, 1>,
        options: &Gaussian3dRenderOptions,
        colors_sh_degree: u32,
    ) -> Self {
        Self {
            colors_rgb_background,
            colors_sh_degree,
            field_of_view_x_half_tan: view.field_of_view_x_half_tan(),
            field_of_view_y_half_tan: view.field_of_view_y_half_tan(),
            image_size_y: view.image_height,
            image_size_x: view.image_width,
            is_debug: options.debug,
            is_prefiltered: false,
            projection_transform: view.projection_transform,
            scale_modifier: options.scale_modifier,
            view_position: view.view_position,
            view_transform: view.view_transform,
        }
    }
}
