//! Single-image editing session.
//!
//! A session keeps four named slots in its store: the image as loaded, the
//! working copy that edits accumulate on, a preview for split comparisons,
//! and the histogram plot of the working copy. Every edit goes through the
//! dispatcher, so a session behaves exactly like the equivalent script.

use crate::config::EngineConfig;
use crate::core::error::DispatchResult;
use crate::core::types::{Image, Percentage};
use crate::dispatch::dispatcher::Dispatcher;
use crate::engine::{Effect, Levels};
use std::path::Path;

/// Slot holding the image as loaded.
pub const ORIGINAL: &str = "original";
/// Slot that edits accumulate on.
pub const WORKING: &str = "working";
/// Slot for split previews.
pub const PREVIEW: &str = "preview";
/// Slot holding the histogram plot of the working image.
pub const HISTOGRAM: &str = "histogram";

/// An editing session over one image.
pub struct Session {
    dispatcher: Dispatcher,
}

impl Session {
    /// Create an empty session.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            dispatcher: Dispatcher::with_config(config),
        }
    }

    /// Load `path` into every slot and plot its histogram.
    pub fn open(&mut self, path: &Path) -> DispatchResult<()> {
        let path = path.to_string_lossy();
        self.run("load", &[&*path, ORIGINAL])?;
        self.run("reset", &[WORKING, ORIGINAL])?;
        self.commit()
    }

    /// Apply an effect to the working image.
    pub fn apply(&mut self, effect: Effect) -> DispatchResult<()> {
        self.run(effect.name(), &[WORKING, WORKING])?;
        self.commit()
    }

    /// Render an effect into the preview slot, up to `split` of the width.
    pub fn preview(&mut self, effect: Effect, split: Percentage) -> DispatchResult<()> {
        let split = split.value().to_string();
        self.run(effect.name(), &[WORKING, PREVIEW, "split", split.as_str()])
    }

    /// Add `delta` to every channel of the working image.
    pub fn brighten(&mut self, delta: i64) -> DispatchResult<()> {
        let delta = delta.to_string();
        self.run("brighten", &[delta.as_str(), WORKING, WORKING])?;
        self.commit()
    }

    pub fn color_correct(&mut self) -> DispatchResult<()> {
        self.run("color-correct", &[WORKING, WORKING])?;
        self.commit()
    }

    pub fn preview_color_correct(&mut self, split: Percentage) -> DispatchResult<()> {
        let split = split.value().to_string();
        self.run("color-correct", &[WORKING, PREVIEW, "split", split.as_str()])
    }

    pub fn adjust_levels(&mut self, levels: Levels) -> DispatchResult<()> {
        let [s, m, w] = level_tokens(levels);
        self.run("levels-adjust", &[s.as_str(), &m, &w, WORKING, WORKING])?;
        self.commit()
    }

    pub fn preview_levels(&mut self, levels: Levels, split: Percentage) -> DispatchResult<()> {
        let [s, m, w] = level_tokens(levels);
        let split = split.value().to_string();
        self.run("levels-adjust", &[s.as_str(), &m, &w, WORKING, PREVIEW, "split", &split])
    }

    pub fn compress(&mut self, percentage: Percentage) -> DispatchResult<()> {
        let percentage = percentage.value().to_string();
        self.run("compress", &[percentage.as_str(), WORKING, WORKING])?;
        self.commit()
    }

    pub fn downscale(&mut self, width: u32, height: u32) -> DispatchResult<()> {
        let (width, height) = (width.to_string(), height.to_string());
        self.run("downscale", &[width.as_str(), &height, WORKING, WORKING])?;
        self.commit()
    }

    /// Discard every edit since `open`.
    pub fn reset(&mut self) -> DispatchResult<()> {
        self.run("reset", &[WORKING, ORIGINAL])?;
        self.commit()
    }

    /// Write the working image.
    pub fn save(&mut self, path: &Path) -> DispatchResult<()> {
        let path = path.to_string_lossy();
        self.run("save", &[&*path, WORKING])
    }

    pub fn original(&self) -> Option<&Image> {
        self.dispatcher.store().get(ORIGINAL)
    }

    pub fn working(&self) -> Option<&Image> {
        self.dispatcher.store().get(WORKING)
    }

    pub fn preview_image(&self) -> Option<&Image> {
        self.dispatcher.store().get(PREVIEW)
    }

    pub fn histogram(&self) -> Option<&Image> {
        self.dispatcher.store().get(HISTOGRAM)
    }

    /// The dispatcher backing this session.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn run(&mut self, operation: &str, tokens: &[&str]) -> DispatchResult<()> {
        self.dispatcher.execute(operation, tokens).map(|_| ())
    }

    /// Sync the preview and the histogram with the working image.
    fn commit(&mut self) -> DispatchResult<()> {
        self.run("reset", &[PREVIEW, WORKING])?;
        self.run("histogram", &[WORKING, HISTOGRAM])
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn level_tokens(levels: Levels) -> [String; 3] {
    [levels.shadow(), levels.mid(), levels.white()].map(|level| level.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::save_image;
    use crate::core::error::DispatchError;
    use crate::engine::{brighten, render_histogram};

    fn opened() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("koala.ppm");
        let image = Image::from_fn(4, 3, |i, j| [(i * 60) as u8, (j * 50) as u8, 128]).unwrap();
        save_image(&path, &image).unwrap();

        let mut session = Session::default();
        session.open(&path).unwrap();
        (dir, session)
    }

    #[test]
    fn test_open_fills_slots() {
        let (_dir, session) = opened();
        let original = session.original().unwrap();

        assert_eq!(session.working().unwrap(), original);
        assert_eq!(session.preview_image().unwrap(), original);
        assert_eq!(session.histogram().unwrap(), &render_histogram(original));
    }

    #[test]
    fn test_edits_accumulate_and_reset() {
        let (_dir, mut session) = opened();
        let original = session.original().unwrap().clone();

        session.brighten(20).unwrap();
        session.brighten(20).unwrap();
        assert_eq!(session.working().unwrap(), &brighten(&original, 40));
        assert_eq!(session.preview_image().unwrap(), session.working().unwrap());
        assert_eq!(session.histogram().unwrap(), &render_histogram(session.working().unwrap()));

        session.reset().unwrap();
        assert_eq!(session.working().unwrap(), &original);
    }

    #[test]
    fn test_preview_leaves_working_alone() {
        let (_dir, mut session) = opened();
        let before = session.working().unwrap().clone();

        session.preview(Effect::Sepia, Percentage::new(50).unwrap()).unwrap();
        assert_eq!(session.working().unwrap(), &before);
        assert_eq!(
            session.preview_image().unwrap(),
            &Effect::Sepia.apply_split(&before, Percentage::new(50).unwrap()).unwrap()
        );

        session
            .preview_levels(Levels::new(10, 100, 200).unwrap(), Percentage::FULL)
            .unwrap();
        assert_eq!(session.working().unwrap(), &before);
    }

    #[test]
    fn test_downscale_and_save() {
        let (dir, mut session) = opened();
        session.downscale(2, 2).unwrap();
        assert_eq!(session.working().unwrap().dimensions(), (2, 2));
        assert_eq!(session.original().unwrap().dimensions(), (4, 3));

        let out = dir.path().join("small.png");
        session.save(&out).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_edit_before_open_fails() {
        let mut session = Session::default();
        assert!(matches!(
            session.apply(Effect::Blur),
            Err(DispatchError::ImageNotFound { .. })
        ));
    }
}
