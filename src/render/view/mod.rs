pub use crate::error::Error;

/// A view in 3D space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct View {
    /// The horizontal field of view in radians.
    pub field_of_view_x: f64,
    /// The vertical field of view in radians.
    pub field_of_view_y: f64,
    /// Image height.
    pub image_height: u32,
    /// Image width.
    pub image_width: u32,
    /// Projective transformation from world space to clip space.
    ///
    /// It is in **column-major order**, i.e., `M[col][row]`.
    pub projection_transform: [[f64; 4]; 4],
    /// Position in world space.
    pub view_position: [f64; 3],
    /// Affine transformation from world space to view space.
    ///
    /// It is in **column-major order**, i.e., `M[col][row]`.
    ///
    /// # Format
    ///
    /// ```plaintext
    /// [R_v   | T_v]
    /// [...   | ...]
    /// [0 0 0 | 1  ]
    /// ```
    pub view_transform: [[f64; 4]; 4],
}

impl View {
    /// `tan(Fov_x / 2)`
    #[inline]
    pub fn field_of_view_x_half_tan(&self) -> f64 {
        (self.field_of_view_x / 2.0).tan()
    }

    /// `tan(Fov_y / 2)`
    #[inline]
    pub fn field_of_view_y_half_tan(&self) -> f64 {
        (self.field_of_view_y / 2.0).tan()
    }

    /// Checking that the view can be rendered.
    pub fn validate(&self) -> Result<(), Error> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(Error::Validation(
                format!(
                    "image size ({}x{})",
                    self.image_width, self.image_height
                ),
                "non-zero".into(),
            ));
        }

        for (name, angle) in [
            ("field_of_view_x", self.field_of_view_x),
            ("field_of_view_y", self.field_of_view_y),
        ] {
            if !(angle > 0.0 && angle < std::f64::consts::PI) {
                return Err(Error::Validation(
                    format!("{name} ({angle})"),
                    "in the range (0, π)".into(),
                ));
            }
        }

        Ok(())
    }
}
