//! Heads-up display drawn over the bottom-left corner of the frame.

use super::FrameStats;
use crate::buffer::FrameBuffer;
use crate::input::MouseEvent;

const HUD_EDGE: &str = "+--------------+";

/// Draw elapsed time, average FPS and the last mouse event.
///
/// Rows that would fall above the top of the frame are skipped.
pub fn draw_hud(buffer: &mut FrameBuffer, stats: &FrameStats, last_mouse: Option<&MouseEvent>) {
    let height = buffer.height();
    let secs = stats.elapsed().as_secs_f64();
    let fps = stats.average_fps();

    let lines = [
        (5, last_mouse.map(ToString::to_string).unwrap_or_default()),
        (4, HUD_EDGE.to_string()),
        (3, format!("|{secs:9.2} Secs|")),
        (2, format!("|{fps:9.2} FPS |")),
        (1, HUD_EDGE.to_string()),
    ];

    for (rows_up, text) in lines {
        if let Some(y) = height.checked_sub(rows_up) {
            buffer.write_text(0, y, &text);
        }
    }
}
