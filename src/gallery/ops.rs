use super::filters;
use image::RgbImage;
use std::fmt;
use std::str::FromStr;

/// A local transform: working image in, working image out.
pub type Transform = fn(&RgbImage) -> RgbImage;

/// The fixed set of edit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FlipVertical,
    FlipHorizontal,
    Sharpen,
    Blur,
    Bnw,
    /// Remote: the original file is sent to the background-removal service.
    RemoveBackground,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::FlipVertical,
        Operation::FlipHorizontal,
        Operation::Sharpen,
        Operation::Blur,
        Operation::Bnw,
        Operation::RemoveBackground,
    ];

    /// Form value and derived-filename label.
    pub fn name(self) -> &'static str {
        match self {
            Self::FlipVertical => "flip_vertical",
            Self::FlipHorizontal => "flip_horizontal",
            Self::Sharpen => "sharpen",
            Self::Blur => "blur",
            Self::Bnw => "bnw",
            Self::RemoveBackground => "removeBackground",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FlipVertical => "Flip vertically",
            Self::FlipHorizontal => "Flip horizontally",
            Self::Sharpen => "Sharpen",
            Self::Blur => "Blur",
            Self::Bnw => "Black & white",
            Self::RemoveBackground => "Remove background",
        }
    }

    /// The in-process transform, or `None` for the remote operation.
    pub fn local_transform(self) -> Option<Transform> {
        match self {
            Self::FlipVertical => Some(filters::flip_vertical),
            Self::FlipHorizontal => Some(filters::flip_horizontal),
            Self::Sharpen => Some(filters::sharpen),
            Self::Blur => Some(filters::blur),
            Self::Bnw => Some(filters::grayscale),
            Self::RemoveBackground => None,
        }
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
