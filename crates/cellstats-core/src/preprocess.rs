//! Reduction of a source frame to the single gray plane that gets thresholded.
//!
//! Every reduction is pixel-local.

use ndarray::Zip;

use crate::channel::{ChannelRole, Reduction};
use crate::frame::{GrayFrame, RgbFrame};

/// 8-bit gray conversion with equal channel weights, rounded to nearest.
pub fn to_gray8(frame: &RgbFrame) -> GrayFrame {
    let mut out = frame.red.data.clone();
    Zip::from(&mut out)
        .and(&frame.red.data)
        .and(&frame.green.data)
        .and(&frame.blue.data)
        .for_each(|o, &r, &g, &b| {
            *o = ((r as f32 + g as f32 + b as f32) / 3.0 + 0.5) as u8;
        });
    GrayFrame::new(out)
}

/// Per-pixel `floor((red + green) / 2)`.
pub fn mean_red_green(frame: &RgbFrame) -> GrayFrame {
    let mut out = frame.red.data.clone();
    Zip::from(&mut out)
        .and(&frame.red.data)
        .and(&frame.green.data)
        .for_each(|o, &r, &g| {
            *o = ((r as u16 + g as u16) / 2) as u8;
        });
    GrayFrame::new(out)
}

/// Apply a reduction to a frame.
pub fn reduce(frame: &RgbFrame, reduction: Reduction) -> GrayFrame {
    match reduction {
        Reduction::Gray8 => to_gray8(frame),
        Reduction::Plane(i) => frame.planes()[i.min(2)].clone(),
        Reduction::MeanRedGreen => mean_red_green(frame),
    }
}

/// Detection surface for a channel role, `None` for skipped channels.
pub fn detection_surface(frame: &RgbFrame, role: ChannelRole) -> Option<GrayFrame> {
    role.policy().map(|policy| reduce(frame, policy.reduction))
}
