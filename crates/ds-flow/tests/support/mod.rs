//! Fakes for the three collaborators of a flow.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use ds_analysis::{AnalysisError, AnalysisPipeline, EncodedImage, VisionModel};
use ds_capture::{CaptureConstraints, CaptureDevice, DeviceError, Frame};
use ds_core::{Period, Sector, StorageLayout};
use ds_flow::{CaptureFlow, FlowOptions};
use ds_storage::{Entry, ImageStore, ObjectImageStore, StorageError};

pub const MUG_REPLY: &str = "```json\n{\"stagnantItems\":[\"mug\"],\"trashItems\":[\"pizza box\"]}\n```";

pub fn period(s: &str) -> Period {
    s.parse().unwrap()
}

pub fn sector(name: &str) -> Sector {
    Sector::new(name).unwrap()
}

// ── Camera ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CameraControls {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub deny: AtomicBool,
    pub cold: AtomicBool,
}

impl CameraControls {
    pub fn live(&self) -> usize {
        self.opened.load(Ordering::SeqCst) - self.closed.load(Ordering::SeqCst)
    }
}

pub struct FakeCamera {
    pub controls: Arc<CameraControls>,
}

impl FakeCamera {
    pub fn new() -> (Self, Arc<CameraControls>) {
        let controls = Arc::new(CameraControls::default());
        (
            Self {
                controls: Arc::clone(&controls),
            },
            controls,
        )
    }
}

impl CaptureDevice for FakeCamera {
    type Handle = ();

    async fn open(&self, _constraints: &CaptureConstraints) -> Result<(), DeviceError> {
        if self.controls.deny.load(Ordering::SeqCst) {
            return Err(DeviceError::PermissionDenied);
        }
        self.controls.opened.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self, _handle: ()) {
        self.controls.closed.fetch_add(1, Ordering::SeqCst);
    }

    async fn read_frame(&self, _handle: &()) -> Option<Frame> {
        if self.controls.cold.load(Ordering::SeqCst) {
            return None;
        }
        Some(Frame::new(8, 8, vec![128; 8 * 8 * 4]))
    }
}

// ── Store ──────────────────────────────────────────────────────────

/// In-memory store whose writes can be made to fail.
pub struct FlakyStore {
    pub inner: ObjectImageStore,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: ObjectImageStore::in_memory(),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }
}

fn outage() -> StorageError {
    StorageError::Api {
        status: 502,
        message: "bad gateway".into(),
    }
}

impl ImageStore for FlakyStore {
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(outage());
        }
        self.inner.read(path).await
    }

    async fn write(&self, path: &str, bytes: &[u8], message: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(outage());
        }
        self.inner.write(path, bytes, message).await
    }

    async fn list_children(&self, path: &str) -> Result<Vec<Entry>, StorageError> {
        self.inner.list_children(path).await
    }
}

// ── Model ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ScriptedModel {
    pub reply: String,
    pub delay: Duration,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedModel {
    pub fn new(reply: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                reply: reply.to_string(),
                delay: Duration::ZERO,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl VisionModel for ScriptedModel {
    async fn submit(
        &self,
        _api_key: &str,
        _prompt: &str,
        _first: &EncodedImage,
        _second: &EncodedImage,
    ) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }
}

// ── Harness ────────────────────────────────────────────────────────

pub type TestFlow = CaptureFlow<FakeCamera, Arc<FlakyStore>, ScriptedModel>;

pub struct Harness {
    pub flow: TestFlow,
    pub camera: Arc<CameraControls>,
    pub store: Arc<FlakyStore>,
    pub model_calls: Arc<AtomicUsize>,
}

pub struct HarnessBuilder {
    current: Period,
    require_baseline: bool,
    api_key: String,
    model: ScriptedModel,
    model_calls: Arc<AtomicUsize>,
    deadline: Duration,
    store: Arc<FlakyStore>,
}

impl HarnessBuilder {
    pub fn new(current: &str) -> Self {
        let (model, model_calls) = ScriptedModel::new(MUG_REPLY);
        Self {
            current: period(current),
            require_baseline: false,
            api_key: "test-key".into(),
            model,
            model_calls,
            deadline: Duration::from_secs(5),
            store: Arc::new(FlakyStore::new()),
        }
    }

    pub fn require_baseline(mut self) -> Self {
        self.require_baseline = true;
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn reply(mut self, reply: &str) -> Self {
        self.model.reply = reply.into();
        self
    }

    pub fn slow_model(mut self, delay: Duration, deadline: Duration) -> Self {
        self.model.delay = delay;
        self.deadline = deadline;
        self
    }

    pub fn store(mut self, store: Arc<FlakyStore>) -> Self {
        self.store = store;
        self
    }

    pub async fn seed(self, path: &str, bytes: &[u8]) -> Self {
        self.store.inner.write(path, bytes, "seed").await.unwrap();
        self
    }

    pub fn build(self) -> Harness {
        let (camera, controls) = FakeCamera::new();
        let pipeline = AnalysisPipeline::new(self.model, self.api_key, self.deadline);
        let options = FlowOptions {
            layout: StorageLayout::default(),
            require_baseline: self.require_baseline,
            current: self.current,
        };
        Harness {
            flow: CaptureFlow::new(camera, Arc::clone(&self.store), pipeline, options),
            camera: controls,
            store: self.store,
            model_calls: self.model_calls,
        }
    }
}
