use serde::{Deserialize, Serialize};

/// Device the external model resources run on.
///
/// The crate itself performs no tensor computation. The device is recorded in the
/// [`ModelBundle`](crate::pipelines::aspect_sentiment::ModelBundle) so that callers can report
/// where the classifier provided at startup was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Model runs on CPU
    Cpu,
    /// Model runs on the CUDA device with the given ordinal
    Cuda(usize),
}

impl Default for Device {
    fn default() -> Device {
        Device::Cpu
    }
}

impl Device {
    pub fn is_cuda(&self) -> bool {
        matches!(self, Device::Cuda(_))
    }
}
