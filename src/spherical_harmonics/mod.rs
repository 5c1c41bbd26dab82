pub use burn::tensor::{backend::Backend, Tensor};

/// The count of spherical harmonics coefficients at [`SH_DEGREE_MAX`]
pub const SH_COUNT_MAX: usize = sh_count(SH_DEGREE_MAX);

/// The maximum degree of spherical harmonics
pub const SH_DEGREE_MAX: u32 = 3;

/// The count of spherical harmonics coefficients up to `degree`
///
/// ## Examples
///
/// ```rust
/// use gausplat_composite::spherical_harmonics::{sh_count, SH_COUNT_MAX};
///
/// assert_eq!(sh_count(0), 1);
/// assert_eq!(sh_count(1), 4);
/// assert_eq!(sh_count(3), SH_COUNT_MAX);
/// assert_eq!(SH_COUNT_MAX, 16);
/// ```
#[inline]
pub const fn sh_count(degree: u32) -> usize {
    (degree as usize + 1).pow(2)
}

/// An evaluator of view-dependent colors from spherical harmonics.
///
/// The basis functions live outside of this crate.
pub trait ShEvaluator<B: Backend> {
    /// Evaluating the RGB colors of `P` points.
    ///
    /// - `degree` is the highest degree to evaluate, no more than [`SH_DEGREE_MAX`].
    /// - `colors_sh` is `[P, 3, M]`, where `M` is at least [`sh_count(degree)`](sh_count).
    /// - `directions` is `[P, 3]`, normalized directions from the viewer to the points.
    ///
    /// The output is `[P, 3]` and is not yet shifted nor clamped.
    fn evaluate(
        &self,
        degree: u32,
        colors_sh: Tensor<B, 3>,
        directions: Tensor<B, 2>,
    ) -> Tensor<B, 2>;
}

impl<B: Backend, E: ShEvaluator<B> + ?Sized> ShEvaluator<B> for &E {
    #[inline]
    fn evaluate(
        &self,
        degree: u32,
        colors_sh: Tensor<B, 3>,
        directions: Tensor<B, 2>,
    ) -> Tensor<B, 2> {
        (**self).evaluate(degree, colors_sh, directions)
    }
}
