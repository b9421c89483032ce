use tracing::{debug, error, info};

use crate::cli::OutputFormat;
use crate::render::{Overlay, OverlayBody, Timeline};

/// Presentation binding that receives every render model the viewer produces.
pub trait Surface {
    fn show_timeline(&mut self, timeline: &Timeline);
    fn show_overlay(&mut self, overlay: &Overlay);
}

/// Renders settled states to HTML or JSON and buffers them until the caller flushes.
///
/// Loading placeholders and a closed overlay are reported through `tracing` only, since a
/// terminal cannot replace text that was already printed.
#[derive(Debug)]
pub struct RenderedSurface {
    format: OutputFormat,
    frames: Vec<String>,
}

impl RenderedSurface {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            frames: Vec::new(),
        }
    }

    /// Drain everything rendered since the last call.
    pub fn take_frames(&mut self) -> Vec<String> {
        std::mem::take(&mut self.frames)
    }

    fn push<T: serde::Serialize>(&mut self, model: &T, html: impl FnOnce(&T) -> String) {
        let frame = match self.format {
            OutputFormat::Html => html(model),
            OutputFormat::Json => match serde_json::to_string(model) {
                Ok(s) => s,
                Err(e) => {
                    error!("Failed to serialize render model: {}", e);
                    return;
                }
            },
        };
        self.frames.push(frame);
    }
}

impl Surface for RenderedSurface {
    fn show_timeline(&mut self, timeline: &Timeline) {
        if let Timeline::Loading = timeline {
            info!("{}", crate::render::timeline::LOADING_HISTORY);
            return;
        }
        self.push(timeline, Timeline::to_html);
    }

    fn show_overlay(&mut self, overlay: &Overlay) {
        match overlay {
            Overlay::Closed => debug!("Overlay closed"),
            Overlay::Open {
                title,
                body: OverlayBody::Loading { message },
            } => info!(title = %title, "{}", message),
            Overlay::Open { .. } => self.push(overlay, Overlay::to_html),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::overlay::{FAILED_DIFF, LOADING_DIFF};

    #[test]
    fn skips_placeholders_and_keeps_settled_frames() {
        let mut surface = RenderedSurface::new(OutputFormat::Html);
        surface.show_timeline(&Timeline::Loading);
        surface.show_timeline(&Timeline::Empty);
        surface.show_overlay(&Overlay::loading("t".to_string(), LOADING_DIFF));
        surface.show_overlay(&Overlay::error("t".to_string(), FAILED_DIFF));
        surface.show_overlay(&Overlay::Closed);

        let frames = surface.take_frames();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].contains("No version history available."));
        assert!(frames[1].contains("Failed to load diff."));
        assert!(surface.take_frames().is_empty());
    }

    #[test]
    fn json_frames_carry_the_render_model() {
        let mut surface = RenderedSurface::new(OutputFormat::Json);
        surface.show_timeline(&Timeline::Empty);
        let frames = surface.take_frames();
        let value: serde_json::Value = serde_json::from_str(&frames[0]).unwrap();
        assert_eq!(value["state"], "empty");
    }

    #[test]
    fn json_frames_fit_on_one_line() {
        let mut surface = RenderedSurface::new(OutputFormat::Json);
        surface.show_overlay(&Overlay::error("t".to_string(), FAILED_DIFF));
        let frames = surface.take_frames();
        assert_eq!(frames.len(), 1);
        assert!(!frames[0].contains('\n'));
    }
}
