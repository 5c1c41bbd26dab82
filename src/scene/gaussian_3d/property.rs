//! 3DGS cloud property implementation.

pub use super::*;

use burn::tensor::activation;
use humansize::{format_size, BINARY};

/// Outer property value getters
impl<B: Backend> Gaussian3dCloud<B> {
    /// Colors in SH space. (Outer value)
    ///
    /// The shape is `[P, M, 3]`.
    /// - `P` is [`Self::point_count`].
    /// - `M` is [`Self::colors_sh_count`].
    ///
    /// It is represented as orthonormalized spherical harmonic with RGB channels.
    #[inline]
    pub fn get_colors_sh(&self) -> Tensor<B, 3> {
        Self::make_colors_sh(self.colors_sh.val())
    }

    /// Opacities. (Outer value)
    ///
    /// The shape is `[P, 1]`.
    ///
    /// They range from `0.0` to `1.0`.
    #[inline]
    pub fn get_opacities(&self) -> Tensor<B, 2> {
        Self::make_opacities(self.opacities.val())
    }

    /// 3D Positions. (Outer value)
    ///
    /// The shape is `[P, 3]`.
    #[inline]
    pub fn get_positions(&self) -> Tensor<B, 2> {
        Self::make_positions(self.positions.val())
    }

    /// Rotations. (Outer value)
    ///
    /// The shape is `[P, 4]`.
    ///
    /// They are represented as normalized Hamilton quaternions in scalar-last order,
    /// i.e., `[x, y, z, w]`.
    #[inline]
    pub fn get_rotations(&self) -> Tensor<B, 2> {
        Self::make_rotations(self.rotations.val())
    }

    /// 3D scalings. (Outer value)
    ///
    /// The shape is `[P, 3]`.
    #[inline]
    pub fn get_scalings(&self) -> Tensor<B, 2> {
        Self::make_scalings(self.scalings.val())
    }

    /// 3D covariances derived from the scalings and rotations.
    ///
    /// The shape is `[P, 6]`, the upper triangle of each symmetric matrix,
    /// i.e., `[Σ_xx, Σ_xy, Σ_xz, Σ_yy, Σ_yz, Σ_zz]`.
    ///
    /// Every scaling is multiplied by `scale_modifier` beforehand.
    pub fn get_covariances(
        &self,
        scale_modifier: f64,
    ) -> Tensor<B, 2> {
        Self::make_covariances(
            self.get_scalings().mul_scalar(scale_modifier),
            self.get_rotations(),
        )
    }
}

/// Outer property value makers
impl<B: Backend> Gaussian3dCloud<B> {
    /// Making values for [`Gaussian3dCloud::get_colors_sh`]
    #[inline]
    pub fn make_colors_sh(colors_sh: Tensor<B, 3>) -> Tensor<B, 3> {
        colors_sh
    }

    /// Making values for [`Gaussian3dCloud::get_opacities`]
    #[inline]
    pub fn make_opacities(opacities: Tensor<B, 2>) -> Tensor<B, 2> {
        activation::sigmoid(opacities)
    }

    /// Making values for [`Gaussian3dCloud::get_positions`]
    #[inline]
    pub fn make_positions(positions: Tensor<B, 2>) -> Tensor<B, 2> {
        positions
    }

    /// Making values for [`Gaussian3dCloud::get_rotations`]
    #[inline]
    pub fn make_rotations(rotations: Tensor<B, 2>) -> Tensor<B, 2> {
        rotations
            .to_owned()
            .div(rotations.powf_scalar(2.0).sum_dim(1).sqrt())
    }

    /// Making values for [`Gaussian3dCloud::get_scalings`]
    #[inline]
    pub fn make_scalings(scalings: Tensor<B, 2>) -> Tensor<B, 2> {
        scalings.exp()
    }

    /// Making values for [`Gaussian3dCloud::get_covariances`]
    ///
    /// - `scalings` is `[P, 3]`.
    /// - `rotations` is `[P, 4]`, normalized and scalar-last.
    pub fn make_covariances(
        scalings: Tensor<B, 2>,
        rotations: Tensor<B, 2>,
    ) -> Tensor<B, 2> {
        let point_count = rotations.dims()[0];
        if point_count == 0 {
            return Tensor::zeros([0, 6], &rotations.device());
        }

        // [P, 1] * 4
        let [x, y, z, w] = {
            let mut r = rotations.iter_dim(1);
            [(); 4].map(|_| r.next().expect("rotations.dims()[1] == 4"))
        };

        // [P, 1] * 9
        let xx = x.to_owned() * x.to_owned() * 2.0;
        let xy = x.to_owned() * y.to_owned() * 2.0;
        let xz = x.to_owned() * z.to_owned() * 2.0;
        let yy = y.to_owned() * y.to_owned() * 2.0;
        let yz = y.to_owned() * z.to_owned() * 2.0;
        let zz = z.to_owned() * z.to_owned() * 2.0;
        let wx = w.to_owned() * x * 2.0;
        let wy = w.to_owned() * y * 2.0;
        let wz = w * z * 2.0;

        // [P, 3] * 3, the rows of R * S
        let m_0 = Tensor::cat(
            vec![
                -yy.to_owned() - zz.to_owned() + 1.0,
                xy.to_owned() - wz.to_owned(),
                xz.to_owned() + wy.to_owned(),
            ],
            1,
        ) * scalings.to_owned();
        let m_1 = Tensor::cat(
            vec![
                xy + wz,
                -xx.to_owned() - zz + 1.0,
                yz.to_owned() - wx.to_owned(),
            ],
            1,
        ) * scalings.to_owned();
        let m_2 = Tensor::cat(vec![xz - wy, yz + wx, -xx - yy + 1.0], 1) * scalings;

        // [P, 1]
        let dot = |a: &Tensor<B, 2>, b: &Tensor<B, 2>| (a.to_owned() * b.to_owned()).sum_dim(1);

        // [P, 6] <- (R * S) * (R * S)^T
        Tensor::cat(
            vec![
                dot(&m_0, &m_0),
                dot(&m_0, &m_1),
                dot(&m_0, &m_2),
                dot(&m_1, &m_1),
                dot(&m_1, &m_2),
                dot(&m_2, &m_2),
            ],
            1,
        )
    }
}

/// Outer property value setters
impl<B: Backend> Gaussian3dCloud<B> {
    /// Setting values for [`Gaussian3dCloud::get_colors_sh`]
    pub fn set_colors_sh(
        &mut self,
        colors_sh: Tensor<B, 3>,
    ) -> &mut Self {
        self.set_inner_colors_sh(Self::make_inner_colors_sh(colors_sh))
    }

    /// Setting values for [`Gaussian3dCloud::get_opacities`]
    pub fn set_opacities(
        &mut self,
        opacities: Tensor<B, 2>,
    ) -> &mut Self {
        self.set_inner_opacities(Self::make_inner_opacities(opacities))
    }

    /// Setting values for [`Gaussian3dCloud::get_positions`]
    pub fn set_positions(
        &mut self,
        positions: Tensor<B, 2>,
    ) -> &mut Self {
        self.set_inner_positions(Self::make_inner_positions(positions))
    }

    /// Setting values for [`Gaussian3dCloud::get_rotations`]
    pub fn set_rotations(
        &mut self,
        rotations: Tensor<B, 2>,
    ) -> &mut Self {
        self.set_inner_rotations(Self::make_inner_rotations(rotations))
    }

    /// Setting values for [`Gaussian3dCloud::get_scalings`]
    pub fn set_scalings(
        &mut self,
        scalings: Tensor<B, 2>,
    ) -> &mut Self {
        self.set_inner_scalings(Self::make_inner_scalings(scalings))
    }

    /// Setting [`Gaussian3dCloud::colors_sh_degree_active`]
    ///
    /// It should be no more than [`Gaussian3dCloud::colors_sh_degree_max`].
    pub fn set_colors_sh_degree_active(
        &mut self,
        degree: u32,
    ) -> Result<&mut Self, Error> {
        if degree > self.colors_sh_degree_max {
            return Err(Error::Validation(
                format!("colors_sh_degree_active ({degree})"),
                format!("no more than {}", self.colors_sh_degree_max),
            ));
        }
        self.colors_sh_degree_active = degree;
        Ok(self)
    }
}

/// Inner property value makers
impl<B: Backend> Gaussian3dCloud<B> {
    /// Making values for [`Gaussian3dCloud::colors_sh`]
    #[inline]
    pub fn make_inner_colors_sh(colors_sh: Tensor<B, 3>) -> Tensor<B, 3> {
        colors_sh
    }

    /// Making values for [`Gaussian3dCloud::opacities`]
    #[inline]
    pub fn make_inner_opacities(opacities: Tensor<B, 2>) -> Tensor<B, 2> {
        opacities.to_owned().div(-opacities + 1.0).log()
    }

    /// Making values for [`Gaussian3dCloud::positions`]
    #[inline]
    pub fn make_inner_positions(positions: Tensor<B, 2>) -> Tensor<B, 2> {
        positions
    }

    /// Making values for [`Gaussian3dCloud::rotations`]
    #[inline]
    pub fn make_inner_rotations(rotations: Tensor<B, 2>) -> Tensor<B, 2> {
        rotations
    }

    /// Making values for [`Gaussian3dCloud::scalings`]
    #[inline]
    pub fn make_inner_scalings(scalings: Tensor<B, 2>) -> Tensor<B, 2> {
        scalings.log()
    }
}

/// Inner property value setters
impl<B: Backend> Gaussian3dCloud<B> {
    /// Setting inner values for [`Gaussian3dCloud::colors_sh`]
    #[inline]
    pub fn set_inner_colors_sh(
        &mut self,
        colors_sh: Tensor<B, 3>,
    ) -> &mut Self {
        self.colors_sh = Param::initialized(self.colors_sh.id.to_owned(), colors_sh);
        self
    }

    /// Setting inner values for [`Gaussian3dCloud::opacities`]
    #[inline]
    pub fn set_inner_opacities(
        &mut self,
        opacities: Tensor<B, 2>,
    ) -> &mut Self {
        self.opacities = Param::initialized(self.opacities.id.to_owned(), opacities);
        self
    }

    /// Setting inner values for [`Gaussian3dCloud::positions`]
    #[inline]
    pub fn set_inner_positions(
        &mut self,
        positions: Tensor<B, 2>,
    ) -> &mut Self {
        self.positions = Param::initialized(self.positions.id.to_owned(), positions);
        self
    }

    /// Setting inner values for [`Gaussian3dCloud::rotations`]
    #[inline]
    pub fn set_inner_rotations(
        &mut self,
        rotations: Tensor<B, 2>,
    ) -> &mut Self {
        self.rotations = Param::initialized(self.rotations.id.to_owned(), rotations);
        self
    }

    /// Setting inner values for [`Gaussian3dCloud::scalings`]
    #[inline]
    pub fn set_inner_scalings(
        &mut self,
        scalings: Tensor<B, 2>,
    ) -> &mut Self {
        self.scalings = Param::initialized(self.scalings.id.to_owned(), scalings);
        self
    }
}

/// Attribute getters
impl<B: Backend> Gaussian3dCloud<B> {
    /// Number of SH coefficients per channel, i.e., `M`.
    #[inline]
    pub fn colors_sh_count(&self) -> usize {
        self.colors_sh.dims()[1]
    }

    /// The device.
    #[inline]
    pub fn device(&self) -> B::Device {
        self.positions.device()
    }

    /// Number of points.
    #[inline]
    pub fn point_count(&self) -> usize {
        let point_count_target = self.positions.dims()[0];
        let point_count_other = self.colors_sh.dims()[0];
        debug_assert_eq!(point_count_other, point_count_target);
        let point_count_other = self.opacities.dims()[0];
        debug_assert_eq!(point_count_other, point_count_target);
        let point_count_other = self.rotations.dims()[0];
        debug_assert_eq!(point_count_other, point_count_target);
        let point_count_other = self.scalings.dims()[0];
        debug_assert_eq!(point_count_other, point_count_target);

        point_count_target
    }

    /// Size of the parameters in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.num_params() * size_of::<B::FloatElem>()
    }

    /// Readable size of the parameters.
    #[inline]
    pub fn size_readable(&self) -> String {
        format_size(self.size(), BINARY.decimal_places(1))
    }
}
