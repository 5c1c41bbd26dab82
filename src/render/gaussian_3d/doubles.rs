//! Recording stand-ins for the rasterizer and the SH evaluator.

use super::*;
use burn::tensor::TensorData;
use std::cell::RefCell;

/// It returns the degree-0 coefficients as the colors.
pub struct ShRecorder<B: Backend> {
    record: RefCell<Option<(u32, Tensor<B, 3>, Tensor<B, 2>)>>,
}

impl<B: Backend> Default for ShRecorder<B> {
    fn default() -> Self {
        Self {
            record: RefCell::new(None),
        }
    }
}

impl<B: Backend> ShRecorder<B> {
    pub fn degree(&self) -> Option<u32> {
        self.record.borrow().as_ref().map(|record| record.0)
    }

    pub fn colors_sh(&self) -> Option<Tensor<B, 3>> {
        self.record.borrow().as_ref().map(|record| record.1.to_owned())
    }

    pub fn directions(&self) -> Option<Tensor<B, 2>> {
        self.record.borrow().as_ref().map(|record| record.2.to_owned())
    }
}

impl<B: Backend> ShEvaluator<B> for ShRecorder<B> {
    fn evaluate(
        &self,
        degree: u32,
        colors_sh: Tensor<B, 3>,
        directions: Tensor<B, 2>,
    ) -> Tensor<B, 2> {
        let [point_count, channel_count, _] = colors_sh.dims();
        *self.record.borrow_mut() =
            Some((degree, colors_sh.to_owned(), directions));
        colors_sh
            .slice([0..point_count, 0..channel_count, 0..1])
            .reshape([point_count, channel_count])
    }
}

/// It renders a single pixel of `C_bg + 2 * sum(positions_2d)`
/// and returns the given radii.
pub struct RasterizerRecorder<B: Backend> {
    pub is_failing: bool,
    pub radii: Option<Vec<i64>>,
    record: RefCell<Option<(forward::RenderInput<B>, forward::RasterizeSettings<B>)>>,
}

impl<B: Backend> Default for RasterizerRecorder<B> {
    fn default() -> Self {
        Self {
            is_failing: false,
            radii: None,
            record: RefCell::new(None),
        }
    }
}

impl<B: Backend> RasterizerRecorder<B> {
    pub fn failing() -> Self {
        Self {
            is_failing: true,
            ..Default::default()
        }
    }

    pub fn with_radii(radii: Vec<i64>) -> Self {
        Self {
            radii: Some(radii),
            ..Default::default()
        }
    }

    pub fn input(&self) -> forward::RenderInput<B> {
        self.record
            .borrow()
            .as_ref()
            .expect("The rasterizer should be called")
            .0
            .to_owned()
    }

    pub fn settings(&self) -> forward::RasterizeSettings<B> {
        self.record
            .borrow()
            .as_ref()
            .expect("The rasterizer should be called")
            .1
            .to_owned()
    }
}

impl<B: Backend> Gaussian3dRasterizer<B> for RasterizerRecorder<B> {
    fn rasterize(
        &self,
        input: forward::RenderInput<B>,
        settings: &forward::RasterizeSettings<B>,
    ) -> Result<forward::RenderOutput<B>, Error> {
        *self.record.borrow_mut() = Some((input.to_owned(), settings.to_owned()));

        if self.is_failing {
            return Err(Error::Rasterization("Out of memory".into()));
        }

        let device = input.positions_3d.device();
        let point_count = input.point_count;

        // [1, 1, 3]
        let colors_rgb_2d = (settings.colors_rgb_background.to_owned()
            + input.positions_2d.mul_scalar(2.0).sum())
        .reshape([1, 1, 3]);

        // [P]
        let radii = self.radii.to_owned().unwrap_or_else(|| {
            (0..point_count).map(|index| (index % 3) as i64).collect()
        });
        let radii = Tensor::from_data(
            TensorData::new(radii.to_owned(), [radii.len()]),
            &device,
        );

        Ok(forward::RenderOutput {
            colors_rgb_2d,
            radii,
        })
    }
}
