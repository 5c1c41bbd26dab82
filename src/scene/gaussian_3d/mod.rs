pub mod property;

pub use crate::{
    error::Error,
    spherical_harmonics::{sh_count, SH_DEGREE_MAX},
};
pub use burn::{
    module::{Module, Param},
    tensor::{backend::Backend, Tensor, TensorData},
};

use std::fmt;

/// A cloud of 3D Gaussians.
///
/// The fields hold the inner (trainable) values.
/// Use the `get_*` methods for the outer (activated) values.
#[derive(Module)]
pub struct Gaussian3dCloud<B: Backend> {
    /// `[P, M, 3]`, where `M` is `(D_max + 1) ^ 2`
    pub colors_sh: Param<Tensor<B, 3>>,
    /// `D_active (0 ~ D_max)`
    pub colors_sh_degree_active: u32,
    /// `D_max (0 ~ 3)`
    pub colors_sh_degree_max: u32,
    /// `[P, 1]`
    pub opacities: Param<Tensor<B, 2>>,
    /// `[P, 3]`
    pub positions: Param<Tensor<B, 2>>,
    /// `[P, 4]`
    pub rotations: Param<Tensor<B, 2>>,
    /// `[P, 3]`
    pub scalings: Param<Tensor<B, 2>>,
}

impl<B: Backend> Gaussian3dCloud<B> {
    /// Initializing a cloud of `point_count` Gaussians.
    ///
    /// The points are placed at the origin with no colors, low opacities,
    /// identity rotations and unit scalings. The active SH degree is `0`.
    pub fn init(
        point_count: usize,
        colors_sh_degree_max: u32,
        device: &B::Device,
    ) -> Result<Self, Error> {
        if colors_sh_degree_max > SH_DEGREE_MAX {
            return Err(Error::Validation(
                format!("colors_sh_degree_max ({colors_sh_degree_max})"),
                format!("no more than {SH_DEGREE_MAX}"),
            ));
        }

        // M
        let colors_sh_count = sh_count(colors_sh_degree_max);

        // [P, M, 3]
        let colors_sh = Param::from_tensor(Self::make_inner_colors_sh(
            Tensor::zeros([point_count, colors_sh_count, 3], device),
        ));

        // [P, 1]
        let opacities = Param::from_tensor(Self::make_inner_opacities(
            Tensor::full([point_count, 1], 0.1, device),
        ));

        // [P, 3]
        let positions = Param::from_tensor(Self::make_inner_positions(
            Tensor::zeros([point_count, 3], device),
        ));

        // [P, 4] (x, y, z, w)
        let rotations = Param::from_tensor(Self::make_inner_rotations(
            Tensor::from_data(
                TensorData::new(
                    [0.0f32, 0.0, 0.0, 1.0].repeat(point_count),
                    [point_count, 4],
                ),
                device,
            ),
        ));

        // [P, 3]
        let scalings = Param::from_tensor(Self::make_inner_scalings(
            Tensor::ones([point_count, 3], device),
        ));

        #[cfg(debug_assertions)]
        log::debug!(
            target: "gausplat_composite::scene",
            "Gaussian3dCloud::init > point_count ({point_count})",
        );

        Ok(Self {
            colors_sh,
            colors_sh_degree_active: 0,
            colors_sh_degree_max,
            opacities,
            positions,
            rotations,
            scalings,
        })
    }
}

impl<B: Backend> fmt::Debug for Gaussian3dCloud<B> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("Gaussian3dCloud")
            .field("devices", &self.devices())
            .field("colors_sh.dims()", &self.colors_sh.dims())
            .field("colors_sh_degree_active", &self.colors_sh_degree_active)
            .field("colors_sh_degree_max", &self.colors_sh_degree_max)
            .field("opacities.dims()", &self.opacities.dims())
            .field("positions.dims()", &self.positions.dims())
            .field("rotations.dims()", &self.rotations.dims())
            .field("scalings.dims()", &self.scalings.dims())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_shapes() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let cloud = Gaussian3dCloud::<NdArray<f32>>::init(7, 2, &device).unwrap();

        assert_eq!(cloud.point_count(), 7);
        assert_eq!(cloud.colors_sh_degree_active, 0);
        assert_eq!(cloud.colors_sh_degree_max, 2);
        assert_eq!(cloud.get_colors_sh().dims(), [7, 9, 3]);
        assert_eq!(cloud.get_opacities().dims(), [7, 1]);
        assert_eq!(cloud.get_positions().dims(), [7, 3]);
        assert_eq!(cloud.get_rotations().dims(), [7, 4]);
        assert_eq!(cloud.get_scalings().dims(), [7, 3]);

        cloud
            .get_opacities()
            .into_data()
            .assert_approx_eq(&TensorData::from([[0.1f32]; 7]), 5);
        cloud
            .get_rotations()
            .into_data()
            .assert_approx_eq(&TensorData::from([[0.0f32, 0.0, 0.0, 1.0]; 7]), 6);
        cloud
            .get_scalings()
            .into_data()
            .assert_approx_eq(&TensorData::from([[1.0f32; 3]; 7]), 6);
    }

    #[test]
    fn init_with_degree_too_high() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let result = Gaussian3dCloud::<NdArray<f32>>::init(1, 4, &device);

        assert!(matches!(result, Err(Error::Validation(..))), "{result:?}");
    }
}
