//! The built-in templates. Coordinates are canvas pixels with the origin at the canvas
//! center and +y up, except `media_showcase`, which builds a world-space scene with a camera.

pub mod bar_chart;
pub mod counter;
pub mod fade;
pub mod kinetic_text;
pub mod list_reveal;
pub mod media_showcase;
pub mod mind_map;
pub mod slide;
pub mod timeline_reveal;

use crate::easing::Easing;
use crate::math::clamp01;

/// Opacity for an element that fades in over `enter` frames and, when `exit > 0`, fades out
/// over the last `exit` frames of the track.
pub(crate) fn envelope(frame: u32, duration: u32, enter: u32, exit: u32, easing: Easing) -> f32 {
    let fade_in = if enter == 0 {
        1.0
    } else {
        easing.apply(frame as f32 / enter as f32)
    };
    let fade_out = if exit == 0 {
        1.0
    } else {
        let remaining = duration.saturating_sub(frame + 1);
        clamp01(remaining as f32 / exit as f32)
    };
    clamp01(fade_in.min(fade_out))
}

/// Frames elapsed since `start`, or `None` before it.
#[inline]
pub(crate) fn since(frame: u32, start: u32) -> Option<u32> {
    frame.checked_sub(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_ramps_in_and_out() {
        assert_eq!(envelope(0, 100, 10, 10, Easing::Linear), 0.0);
        assert_eq!(envelope(50, 100, 10, 10, Easing::Linear), 1.0);
        assert_eq!(envelope(99, 100, 10, 10, Easing::Linear), 0.0);
        assert_eq!(envelope(0, 100, 0, 0, Easing::Linear), 1.0);
    }
}
