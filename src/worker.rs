// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background classification jobs.
//!
//! Each upload runs on its own short-lived thread so the UI keeps painting
//! while the model works. The file is decoded once; the preview and the
//! model input both come from that decode. The thread reports back over a
//! channel owned by the job handle; dropping or cancelling the handle
//! discards anything the thread produces afterwards.

use crate::classifier::{Classifier, ClassifyError};
use crate::io::media;
use crate::models::classification::ClassificationResult;
use crate::models::image::{PreviewBitmap, SelectedImage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;

/// Callback invoked after each event is posted, e.g. to wake the UI.
pub type Notify = Arc<dyn Fn() + Send + Sync>;

/// Progress reported by a job, in order: at most one preview, then the outcome.
#[derive(Debug)]
pub enum JobEvent {
    Preview(PreviewBitmap),
    Finished(Result<ClassificationResult, ClassifyError>),
}

/// What [`ClassificationJob::poll`] found on the channel.
#[derive(Debug)]
pub enum JobPoll {
    Event(JobEvent),
    Pending,
    /// The worker exited without reporting an outcome.
    Lost,
}

/// Handle to one in-flight classification.
pub struct ClassificationJob {
    generation: u64,
    image: SelectedImage,
    cancelled: Arc<AtomicBool>,
    receiver: Receiver<JobEvent>,
}

impl ClassificationJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> &SelectedImage {
        &self.image
    }

    /// Ask the worker to stop at its next checkpoint.
    ///
    /// Inference already running is not interrupted; its result is dropped.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fetch the next event without blocking.
    pub fn poll(&self) -> JobPoll {
        if self.is_cancelled() {
            return JobPoll::Pending;
        }
        match self.receiver.try_recv() {
            Ok(event) => JobPoll::Event(event),
            Err(TryRecvError::Empty) => JobPoll::Pending,
            Err(TryRecvError::Disconnected) => JobPoll::Lost,
        }
    }
}

impl Drop for ClassificationJob {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Start building the preview and classifying `image` in the background.
pub fn spawn_job(
    generation: u64,
    image: SelectedImage,
    classifier: Classifier,
    notify: Notify,
) -> ClassificationJob {
    let (sender, receiver) = channel();
    let cancelled = Arc::new(AtomicBool::new(false));

    let worker = Worker {
        generation,
        image: image.clone(),
        cancelled: cancelled.clone(),
        sender,
        notify,
    };
    std::thread::spawn(move || worker.run(&classifier));

    ClassificationJob {
        generation,
        image,
        cancelled,
        receiver,
    }
}

struct Worker {
    generation: u64,
    image: SelectedImage,
    cancelled: Arc<AtomicBool>,
    sender: Sender<JobEvent>,
    notify: Notify,
}

impl Worker {
    fn run(self, classifier: &Classifier) {
        // The preview is built from the same decoded image the model sees
        let result = classifier.classify_image(&self.image.path, |img| {
            self.post(JobEvent::Preview(media::make_preview(img))) && !self.is_cancelled()
        });

        match result {
            Err(ClassifyError::Cancelled) => {
                log::debug!("Job {} cancelled before inference", self.generation);
            }
            result => {
                self.post(JobEvent::Finished(result));
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Send an event unless the job was cancelled. Returns false when the
    /// job should stop.
    fn post(&self, event: JobEvent) -> bool {
        if self.is_cancelled() {
            log::debug!("Job {} cancelled, dropping {:?}", self.generation, event_name(&event));
            return false;
        }
        let delivered = self.sender.send(event).is_ok();
        (self.notify)();
        delivered
    }
}

fn event_name(event: &JobEvent) -> &'static str {
    match event {
        JobEvent::Preview(_) => "preview",
        JobEvent::Finished(_) => "result",
    }
}
