//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue with the batch limits
//! - creating & configuring the Surface (swapchain)
//! - acquiring and presenting frames

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
