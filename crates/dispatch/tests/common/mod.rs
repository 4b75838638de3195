//! Hand-written fake collaborators with call counters.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use dispatch::Dispatcher;
use intake::{
    Credential, Cryptographer, CryptographerError, Document, File, FileName, FixedClock,
    FormatVersion, Recognizer, Sender, SignedPayload, Timestamp,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The instant every test treats as "now".
pub fn now() -> Timestamp {
    Timestamp::from_utc(Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap())
}

pub fn days_ago(days: u64) -> Timestamp {
    now().checked_sub_days(days).unwrap()
}

pub fn file(name: &str, content: &[u8]) -> File {
    File::new(FileName::new(name).unwrap(), content.to_vec())
}

pub fn document_for(file: &File, format: &str, created: Timestamp) -> Document {
    Document::new(
        file.name().clone(),
        file.content().to_vec(),
        created,
        FormatVersion::new(format),
    )
}

pub fn signed(content: &[u8]) -> SignedPayload {
    let mut bytes = b"signed:".to_vec();
    bytes.extend_from_slice(content);
    SignedPayload::new(bytes)
}

pub fn credential() -> Credential {
    Credential::new(b"certificate".to_vec())
}

// ---------------------------------------------------------------------------
// Recognizer
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeRecognizer {
    documents: Mutex<HashMap<FileName, Document>>,
    delays: Mutex<HashMap<FileName, Duration>>,
    panics_on: Mutex<HashSet<FileName>>,
    calls: AtomicUsize,
}

impl FakeRecognizer {
    pub fn recognizes(&self, file: &File, document: Document) {
        self.documents
            .lock()
            .unwrap()
            .insert(file.name().clone(), document);
    }

    pub fn delays(&self, file: &File, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(file.name().clone(), delay);
    }

    pub fn panics_on(&self, file: &File) {
        self.panics_on.lock().unwrap().insert(file.name().clone());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Recognizer for FakeRecognizer {
    async fn recognize(&self, file: &File) -> Option<Document> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.lock().unwrap().get(file.name()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let crash = self.panics_on.lock().unwrap().contains(file.name());
        if crash {
            panic!("recognizer crashed on {}", file.name());
        }
        self.documents.lock().unwrap().get(file.name()).cloned()
    }
}

// ---------------------------------------------------------------------------
// Cryptographer
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeCryptographer {
    rejects: Mutex<HashSet<Vec<u8>>>,
    credentials: Mutex<Vec<Credential>>,
    calls: AtomicUsize,
}

impl FakeCryptographer {
    pub fn rejects(&self, content: &[u8]) {
        self.rejects.lock().unwrap().insert(content.to_vec());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn credentials(&self) -> Vec<Credential> {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl Cryptographer for FakeCryptographer {
    async fn sign(
        &self,
        content: &[u8],
        credential: &Credential,
    ) -> Result<SignedPayload, CryptographerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.credentials.lock().unwrap().push(credential.clone());
        if self.rejects.lock().unwrap().contains(content) {
            return Err(CryptographerError::Rejected {
                reason: "content refused".into(),
            });
        }
        Ok(signed(content))
    }
}

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeSender {
    fails_for: Mutex<HashSet<SignedPayload>>,
    sent: Mutex<Vec<SignedPayload>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeSender {
    pub fn fails_for(&self, payload: SignedPayload) {
        self.fails_for.lock().unwrap().insert(payload);
    }

    pub fn delay_each(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<SignedPayload> {
        self.sent.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sender for FakeSender {
    async fn try_send(&self, payload: &SignedPayload) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.fails_for.lock().unwrap().contains(payload) {
            return false;
        }
        self.sent.lock().unwrap().push(payload.clone());
        true
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub recognizer: Arc<FakeRecognizer>,
    pub cryptographer: Arc<FakeCryptographer>,
    pub sender: Arc<FakeSender>,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        Self {
            recognizer: Arc::new(FakeRecognizer::default()),
            cryptographer: Arc::new(FakeCryptographer::default()),
            sender: Arc::new(FakeSender::default()),
        }
    }

    /// A dispatcher over the fakes whose clock is frozen at [`now`].
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            self.recognizer.clone(),
            self.cryptographer.clone(),
            self.sender.clone(),
        )
        .with_clock(Arc::new(FixedClock::new(now())))
    }

    /// Registers `file` as recognized into a valid, fresh `"4.0"` document.
    pub fn valid(&self, file: &File) {
        self.recognizer
            .recognizes(file, document_for(file, "4.0", now()));
    }
}
