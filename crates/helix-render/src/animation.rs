// ─────────────────────────────────────────────────────────────────────
// SCPN Helix Tracker — GIF Animation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Looping GIF of the beams growing through time.
//!
//! Frames are rendered and handed to the encoder one at a time.

use crate::figure::{frame_scene, render_frame};
use helix_core::scenario::ScenarioResult;
use helix_types::config::RenderConfig;
use helix_types::error::{HelixError, HelixResult};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Quantiser speed for the GIF palette (1 = best, 30 = fastest).
const GIF_SPEED: i32 = 10;

/// Prefix length shown in each frame: `(f+1)·⌊steps/num_frames⌋`.
pub fn frame_prefix_lengths(steps: usize, num_frames: usize) -> Vec<usize> {
    if num_frames == 0 {
        return Vec::new();
    }
    let stride = steps / num_frames;
    (1..=num_frames).map(|f| f * stride).collect()
}

fn render_err(path: &Path, e: impl std::fmt::Display) -> HelixError {
    HelixError::Render(format!("failed to write {}: {e}", path.display()))
}

/// Render every frame of `result` into an infinitely looping GIF at `path`.
/// Returns the number of frames written.
pub fn write_animation_gif(
    result: &ScenarioResult,
    render: &RenderConfig,
    path: &Path,
) -> HelixResult<usize> {
    let prefixes = frame_prefix_lengths(result.scattered.len(), render.num_frames);
    if prefixes.is_empty() || prefixes[0] == 0 {
        return Err(HelixError::ConfigError(format!(
            "cannot animate {} samples with {} frames",
            result.scattered.len(),
            render.num_frames
        )));
    }

    let scene = frame_scene(result, render)?;
    let delay = Delay::from_numer_denom_ms(render.frame_delay_ms, 1);
    let mut writer = BufWriter::new(File::create(path)?);
    {
        let mut encoder = GifEncoder::new_with_speed(&mut writer, GIF_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| render_err(path, e))?;
        for (f, &k) in prefixes.iter().enumerate() {
            let image = render_frame(&scene, result, k);
            encoder
                .encode_frame(Frame::from_parts(image, 0, 0, delay))
                .map_err(|e| render_err(path, e))?;
            if (f + 1) % 25 == 0 {
                debug!(frame = f + 1, total = prefixes.len(), "encoded animation frames");
            }
        }
    }
    writer.flush()?;

    info!(
        path = %path.display(),
        frames = prefixes.len(),
        delay_ms = render.frame_delay_ms,
        "animation written"
    );
    Ok(prefixes.len())
}
