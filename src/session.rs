// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Upload and result state behind the window.
//!
//! The session owns the preview, the result text and the in-flight job. It
//! is driven by the egui app once per frame but has no egui dependency of
//! its own, so the whole upload flow can be exercised without a window.

use crate::classifier::Classifier;
use crate::models::image::{has_image_extension, PreviewBitmap, SelectedImage, UploadSource};
use crate::ui::dialogs::Dialogs;
use crate::ui::results::ResultView;
use crate::worker::{self, ClassificationJob, JobEvent, JobPoll, Notify};
use std::path::PathBuf;

pub const NO_FILE_TITLE: &str = "No File Selected";
pub const NO_FILE_MESSAGE: &str = "You did not select any file.";

/// State of the classifier window.
pub struct Session {
    classifier: Classifier,
    notify: Notify,

    /// Preview of the most recent upload
    preview: Option<PreviewBitmap>,

    /// Bumped whenever `preview` changes so the shell can refresh its texture
    preview_revision: u64,

    /// Result label contents, absent until the first result
    result: Option<ResultView>,

    /// Job for the most recent upload, if still running
    job: Option<ClassificationJob>,

    /// Generation handed to the next job
    next_generation: u64,
}

impl Session {
    pub fn new(classifier: Classifier, notify: Notify) -> Self {
        Self {
            classifier,
            notify,
            preview: None,
            preview_revision: 0,
            result: None,
            job: None,
            next_generation: 1,
        }
    }

    pub fn preview(&self) -> Option<&PreviewBitmap> {
        self.preview.as_ref()
    }

    pub fn preview_revision(&self) -> u64 {
        self.preview_revision
    }

    pub fn result(&self) -> Option<&ResultView> {
        self.result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    /// Ask for a file and classify it.
    ///
    /// Returns false when the dialog was cancelled. A cancelled dialog shows
    /// one warning and leaves the preview and result untouched.
    pub fn upload_image(&mut self, dialogs: &dyn Dialogs, source: UploadSource) -> bool {
        match dialogs.pick_image() {
            Some(path) => {
                self.start(SelectedImage::new(path, source));
                true
            }
            None => {
                log::warn!("Upload cancelled, no file selected");
                dialogs.warn(NO_FILE_TITLE, NO_FILE_MESSAGE);
                false
            }
        }
    }

    /// Classify the first dropped file with an accepted extension.
    pub fn handle_dropped(&mut self, paths: &[PathBuf]) -> bool {
        match paths.iter().find(|path| has_image_extension(path)) {
            Some(path) => {
                self.start(SelectedImage::new(path.clone(), UploadSource::Drop));
                true
            }
            None => {
                log::warn!("Ignoring drop of {} file(s) with no png/jpg/jpeg image", paths.len());
                false
            }
        }
    }

    /// Start classifying `image`, superseding any job still running.
    pub fn start(&mut self, image: SelectedImage) {
        if let Some(previous) = self.job.take() {
            log::info!(
                "Superseding job {} for {}",
                previous.generation(),
                previous.image().display_name()
            );
            previous.cancel();
        }
        // Placeholder until this upload's preview arrives
        self.set_preview(None);

        let generation = self.next_generation;
        self.next_generation += 1;
        log::info!(
            "Job {}: classifying {} (from {:?})",
            generation,
            image.path.display(),
            image.source
        );

        self.job = Some(worker::spawn_job(
            generation,
            image,
            self.classifier.clone(),
            self.notify.clone(),
        ));
    }

    /// Apply whatever the current job has reported. Returns true when
    /// anything visible changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        while let Some(job) = self.job.as_ref() {
            let generation = job.generation();
            match job.poll() {
                JobPoll::Pending => break,
                JobPoll::Event(JobEvent::Preview(preview)) => {
                    self.set_preview(Some(preview));
                    changed = true;
                }
                JobPoll::Event(JobEvent::Finished(Ok(result))) => {
                    let top = result.top();
                    log::info!("Job {}: {} [{} #{}]", generation, result, top.wnid, top.class_id);
                    self.display_result(ResultView::from_result(&result));
                    self.job = None;
                    changed = true;
                }
                JobPoll::Event(JobEvent::Finished(Err(error))) => {
                    log::error!("Job {}: {}", generation, error);
                    self.set_preview(None);
                    self.display_result(ResultView::from_error(&error));
                    self.job = None;
                    changed = true;
                }
                JobPoll::Lost => {
                    log::error!("Job {}: worker stopped without a result", generation);
                    self.set_preview(None);
                    self.display_result(ResultView::error("classification stopped unexpectedly"));
                    self.job = None;
                    changed = true;
                }
            }
        }

        changed
    }

    /// Create the result label on first use, otherwise replace its text.
    pub fn display_result(&mut self, view: ResultView) {
        match self.result.as_mut() {
            Some(current) => *current = view,
            None => self.result = Some(view),
        }
    }

    fn set_preview(&mut self, preview: Option<PreviewBitmap>) {
        if self.preview.is_none() && preview.is_none() {
            return;
        }
        self.preview = preview;
        self.preview_revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::preprocess::IMAGENET_MEAN_BGR;
    use crate::classifier::{ImageModel, InputLayout, InputTensor};
    use crate::test_support::{labels_with_classes, temp_path, write_solid_image};
    use std::cell::{Cell, RefCell};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    /// Scores each BGR channel by its mean intensity, so a pure red image is
    /// class 2 and a pure blue one class 0.
    struct ChannelModel {
        delay: Duration,
    }

    impl ImageModel for ChannelModel {
        fn input_layout(&self) -> InputLayout {
            InputLayout::Nhwc
        }

        fn predict(&self, input: &InputTensor) -> anyhow::Result<Vec<f32>> {
            std::thread::sleep(self.delay);
            Ok((0..3)
                .map(|c| (input.value(c, 0, 0) + IMAGENET_MEAN_BGR[c]) / 255.0)
                .collect())
        }
    }

    struct ScriptedDialogs {
        picks: RefCell<Vec<Option<PathBuf>>>,
        warnings: RefCell<Vec<(String, String)>>,
        picks_made: Cell<usize>,
    }

    impl ScriptedDialogs {
        fn new(picks: Vec<Option<PathBuf>>) -> Self {
            Self {
                picks: RefCell::new(picks),
                warnings: RefCell::new(Vec::new()),
                picks_made: Cell::new(0),
            }
        }
    }

    impl Dialogs for ScriptedDialogs {
        fn pick_image(&self) -> Option<PathBuf> {
            self.picks_made.set(self.picks_made.get() + 1);
            let mut picks = self.picks.borrow_mut();
            if picks.is_empty() {
                None
            } else {
                picks.remove(0)
            }
        }

        fn warn(&self, title: &str, message: &str) {
            self.warnings
                .borrow_mut()
                .push((title.to_string(), message.to_string()));
        }
    }

    fn session(delay: Duration) -> Session {
        let classifier = Classifier::new(Arc::new(ChannelModel { delay }), labels_with_classes(3));
        Session::new(classifier, Arc::new(|| {}))
    }

    fn wait_idle(session: &mut Session, mut check: impl FnMut(&Session)) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while session.is_busy() {
            session.poll();
            check(session);
            assert!(Instant::now() < deadline, "job did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn solid_image(name: &str, rgb: [u8; 3]) -> PathBuf {
        let path = temp_path(name);
        write_solid_image(&path, 48, 48, rgb);
        path
    }

    fn is_formatted_result(text: &str) -> bool {
        let Some(open) = text.rfind(" (") else {
            return false;
        };
        let Some(number) = text[open + 2..].strip_suffix("%)") else {
            return false;
        };
        let Some((whole, decimals)) = number.split_once('.') else {
            return false;
        };
        open > 0
            && decimals.len() == 2
            && decimals.chars().all(|c| c.is_ascii_digit())
            && !whole.is_empty()
            && whole.chars().all(|c| c.is_ascii_digit())
            && number.parse::<f32>().map(|v| (0.0..=100.0).contains(&v)).unwrap_or(false)
    }

    #[test]
    fn test_upload_shows_preview_and_result() {
        let red = solid_image("session_red.png", [255, 0, 0]);
        let dialogs = ScriptedDialogs::new(vec![Some(red.clone())]);
        let mut session = session(Duration::ZERO);

        assert!(session.result().is_none());
        assert!(session.upload_image(&dialogs, UploadSource::Button));
        assert!(session.is_busy());
        wait_idle(&mut session, |_| {});

        let result = session.result().unwrap();
        assert_eq!(result.headline, "class_2 (100.00%)");
        assert!(is_formatted_result(&result.headline));
        assert!(!result.is_error);

        let preview = session.preview().unwrap();
        assert_eq!((preview.width, preview.height), (200, 200));
        assert_eq!(&preview.pixels[..4], &[255, 0, 0, 255]);
        assert!(dialogs.warnings.borrow().is_empty());

        let _ = std::fs::remove_file(&red);
    }

    #[test]
    fn test_cancel_warns_once_and_keeps_state() {
        let blue = solid_image("session_blue.png", [0, 0, 255]);
        let dialogs = ScriptedDialogs::new(vec![Some(blue.clone()), None]);
        let mut session = session(Duration::ZERO);

        session.upload_image(&dialogs, UploadSource::Canvas);
        wait_idle(&mut session, |_| {});
        let result_before = session.result().cloned();
        let preview_before = session.preview().cloned();
        let revision_before = session.preview_revision();

        assert!(!session.upload_image(&dialogs, UploadSource::Canvas));
        assert!(!session.is_busy());
        assert!(!session.poll());

        let warnings = dialogs.warnings.borrow();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0], (NO_FILE_TITLE.to_string(), NO_FILE_MESSAGE.to_string()));
        assert_eq!(session.result().cloned(), result_before);
        assert_eq!(session.preview().cloned(), preview_before);
        assert_eq!(session.preview_revision(), revision_before);
        assert_eq!(dialogs.picks_made.get(), 2);

        let _ = std::fs::remove_file(&blue);
    }

    #[test]
    fn test_cancel_before_any_upload_changes_nothing() {
        let dialogs = ScriptedDialogs::new(vec![None]);
        let mut session = session(Duration::ZERO);

        assert!(!session.upload_image(&dialogs, UploadSource::Button));
        assert_eq!(dialogs.warnings.borrow().len(), 1);
        assert!(session.result().is_none());
        assert!(session.preview().is_none());
    }

    #[test]
    fn test_second_upload_replaces_preview_and_result() {
        let red = solid_image("session_replace_red.png", [255, 0, 0]);
        let blue = solid_image("session_replace_blue.png", [0, 0, 255]);
        let dialogs = ScriptedDialogs::new(vec![Some(red.clone()), Some(blue.clone())]);
        let mut session = session(Duration::ZERO);

        session.upload_image(&dialogs, UploadSource::Button);
        wait_idle(&mut session, |_| {});
        assert_eq!(session.result().unwrap().headline, "class_2 (100.00%)");

        session.upload_image(&dialogs, UploadSource::Button);
        wait_idle(&mut session, |_| {});
        let result = session.result().unwrap();
        assert_eq!(result.headline, "class_0 (100.00%)");
        assert!(result.details.is_empty());
        assert_eq!(&session.preview().unwrap().pixels[..4], &[0, 0, 255, 255]);

        let _ = std::fs::remove_file(&red);
        let _ = std::fs::remove_file(&blue);
    }

    #[test]
    fn test_superseded_job_is_never_displayed() {
        let red = solid_image("session_stale_red.png", [255, 0, 0]);
        let blue = solid_image("session_stale_blue.png", [0, 0, 255]);
        let mut session = session(Duration::from_millis(150));

        session.start(SelectedImage::new(red.clone(), UploadSource::Button));
        session.start(SelectedImage::new(blue.clone(), UploadSource::Button));

        wait_idle(&mut session, |s| {
            if let Some(result) = s.result() {
                assert_ne!(result.headline, "class_2 (100.00%)");
            }
        });
        // Give the first worker time to finish and try to post
        std::thread::sleep(Duration::from_millis(300));
        assert!(!session.poll());

        assert_eq!(session.result().unwrap().headline, "class_0 (100.00%)");
        assert_eq!(&session.preview().unwrap().pixels[..4], &[0, 0, 255, 255]);

        let _ = std::fs::remove_file(&red);
        let _ = std::fs::remove_file(&blue);
    }

    #[test]
    fn test_new_upload_drops_previous_preview_immediately() {
        let red = solid_image("session_pending_red.png", [255, 0, 0]);
        let blue = solid_image("session_pending_blue.png", [0, 0, 255]);
        let mut session = session(Duration::from_millis(100));

        session.start(SelectedImage::new(red.clone(), UploadSource::Button));
        wait_idle(&mut session, |_| {});
        assert!(session.preview().is_some());
        let revision = session.preview_revision();

        session.start(SelectedImage::new(blue.clone(), UploadSource::Button));
        assert!(session.is_busy());
        assert!(session.preview().is_none());
        assert!(session.preview_revision() > revision);

        // Never shows red again while the blue upload is in flight
        wait_idle(&mut session, |s| {
            if let Some(preview) = s.preview() {
                assert_eq!(&preview.pixels[..4], &[0, 0, 255, 255]);
            }
        });
        assert_eq!(&session.preview().unwrap().pixels[..4], &[0, 0, 255, 255]);

        let _ = std::fs::remove_file(&red);
        let _ = std::fs::remove_file(&blue);
    }

    #[test]
    fn test_non_image_file_shows_error() {
        let bogus = temp_path("session_bogus.jpg");
        std::fs::write(&bogus, b"this is a text file").unwrap();
        let red = solid_image("session_error_red.png", [255, 0, 0]);
        let dialogs = ScriptedDialogs::new(vec![Some(red.clone()), Some(bogus.clone())]);
        let mut session = session(Duration::ZERO);

        session.upload_image(&dialogs, UploadSource::Button);
        wait_idle(&mut session, |_| {});
        assert!(session.preview().is_some());

        session.upload_image(&dialogs, UploadSource::Button);
        wait_idle(&mut session, |_| {});

        let result = session.result().unwrap();
        assert!(result.is_error);
        assert!(result.headline.starts_with("Error: could not load image"));
        assert!(session.preview().is_none());

        let _ = std::fs::remove_file(&bogus);
        let _ = std::fs::remove_file(&red);
    }

    #[test]
    fn test_drop_picks_first_image_file() {
        let blue = solid_image("session_drop.jpeg", [0, 0, 255]);
        let mut session = session(Duration::ZERO);

        assert!(!session.handle_dropped(&[PathBuf::from("/tmp/readme.txt")]));
        assert!(!session.is_busy());

        assert!(session.handle_dropped(&[PathBuf::from("/tmp/readme.txt"), blue.clone()]));
        wait_idle(&mut session, |_| {});
        // JPEG is lossy, so only the winning class is exact
        let headline = &session.result().unwrap().headline;
        assert!(headline.starts_with("class_0 ("), "{}", headline);
        assert!(is_formatted_result(headline));

        let _ = std::fs::remove_file(&blue);
    }

    #[test]
    fn test_display_result_updates_in_place() {
        let mut session = session(Duration::ZERO);
        assert!(session.result().is_none());

        session.display_result(ResultView::error("first"));
        session.display_result(ResultView::error("second"));
        assert_eq!(session.result().unwrap().headline, "Error: second");
    }

    #[test]
    fn test_result_format_checker() {
        assert!(is_formatted_result("tabby (87.31%)"));
        assert!(is_formatted_result("Labrador retriever (100.00%)"));
        assert!(!is_formatted_result("tabby (87.3%)"));
        assert!(!is_formatted_result("tabby (187.30%)"));
        assert!(!is_formatted_result("(87.30%)"));
    }
}
