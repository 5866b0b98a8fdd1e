//! Fakes for the pipeline ports.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use controller::{AssistantController, CommitRouter};
use pipeline::{
    CatalogError, ContentKind, GenerationClient, GenerationError, MachineryCatalog,
    MachineryDraft, MachineryId, MachineryRecord, Prompt, RawModelResponse, TrainingCatalog,
    TrainingDraft, TrainingModuleId, TrainingModuleRecord,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

struct Scripted {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<RawModelResponse, GenerationError>,
}

/// Replays scripted responses in order and records every call.
#[derive(Default)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(ContentKind, String)>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, result: Result<RawModelResponse, GenerationError>) {
        self.script.lock().unwrap().push_back(Scripted { gate: None, result });
    }

    pub fn respond_json(&self, value: &Value) {
        self.respond(Ok(RawModelResponse::new(value.to_string())));
    }

    /// Queues a response that is only delivered once the returned sender fires.
    pub fn respond_later(&self, value: &Value) -> oneshot::Sender<()> {
        self.respond_later_with(Ok(RawModelResponse::new(value.to_string())))
    }

    pub fn respond_later_with(
        &self,
        result: Result<RawModelResponse, GenerationError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back(Scripted {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub fn calls(&self) -> Vec<(ContentKind, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(
        &self,
        kind: ContentKind,
        prompt: &Prompt,
    ) -> Result<RawModelResponse, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((kind, prompt.as_str().to_string()));
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected generation call");
        if let Some(gate) = next.gate {
            let _ = gate.await;
        }
        next.result
    }
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// Records inserted machinery drafts; optionally fails or holds inserts.
#[derive(Default)]
pub struct RecordingMachinery {
    pub inserted: Mutex<Vec<MachineryDraft>>,
    pub fail_with: Mutex<Option<CatalogError>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl RecordingMachinery {
    /// Makes the next insert wait until the returned sender fires.
    pub fn hold_next_insert(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }
}

#[async_trait]
impl MachineryCatalog for RecordingMachinery {
    async fn insert(&self, draft: MachineryDraft) -> Result<MachineryRecord, CatalogError> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let failure = self.fail_with.lock().unwrap().clone();
        if let Some(err) = failure {
            return Err(err);
        }
        let mut inserted = self.inserted.lock().unwrap();
        inserted.push(draft.clone());
        Ok(MachineryRecord {
            id: MachineryId::new(inserted.len() as u64),
            draft,
            rating: None,
            distance_km: None,
            owner: "Test Owner".to_string(),
            phone: "000".to_string(),
            address: "Test Farm".to_string(),
        })
    }

    async fn list(&self) -> Result<Vec<MachineryRecord>, CatalogError> {
        Ok(Vec::new())
    }
}

/// Records inserted training drafts.
#[derive(Default)]
pub struct RecordingTraining {
    pub inserted: Mutex<Vec<TrainingDraft>>,
}

#[async_trait]
impl TrainingCatalog for RecordingTraining {
    async fn insert(&self, draft: TrainingDraft) -> Result<TrainingModuleRecord, CatalogError> {
        let mut inserted = self.inserted.lock().unwrap();
        inserted.push(draft.clone());
        Ok(TrainingModuleRecord {
            id: TrainingModuleId::new(inserted.len() as u64),
            draft,
        })
    }

    async fn list(&self) -> Result<Vec<TrainingModuleRecord>, CatalogError> {
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub controller: Arc<AssistantController>,
    pub client: Arc<ScriptedClient>,
    pub machinery: Arc<RecordingMachinery>,
    pub training: Arc<RecordingTraining>,
}

pub fn harness() -> Harness {
    let client = ScriptedClient::new();
    let machinery = Arc::new(RecordingMachinery::default());
    let training = Arc::new(RecordingTraining::default());
    let router = CommitRouter::new(machinery.clone(), training.clone());
    let controller = Arc::new(AssistantController::new(client.clone(), router));
    Harness {
        controller,
        client,
        machinery,
        training,
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

pub fn machinery_json(name: &str) -> Value {
    json!({
        "name": name,
        "type": "Tractor",
        "power": "90 HP",
        "price": 2800,
        "image": "🚜",
        "location": "Kolhapur",
        "suitable": ["Sugarcane"],
        "demand": "high",
        "soilSuitability": ["Black", "Clay"]
    })
}

pub fn training_json(title: &str) -> Value {
    json!({
        "title": title,
        "type": "Manual",
        "machineryType": ["Tractor"],
        "difficulty": "Intermediate",
        "duration": 20,
        "icon": "📖",
        "description": "Step-by-step plowing guide.",
        "content": {
            "type": "checklist",
            "items": ["Inspect plow", "Set depth", "Start at headland"]
        }
    })
}
