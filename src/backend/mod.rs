pub use burn::{
    backend::wgpu::WgpuDevice,
    tensor::backend::{AutodiffBackend, Backend},
};

use burn::backend::autodiff;

pub type Autodiff<B> = autodiff::Autodiff<B>;
pub type Wgpu = burn::backend::Wgpu;
