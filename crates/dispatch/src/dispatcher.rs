//! Batch dispatch: fan out one independent attempt per file and collect the
//! files that did not make it, in input order.

use std::sync::Arc;

use intake::{
    Clock, ConfigError, Credential, Cryptographer, DispatchConfig, DispatchResult, DispatchRunId,
    DocumentPolicy, File, Recognizer, Sender, SystemClock,
};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, info_span, Instrument};

use crate::attempt::Stages;

/// Validates, signs, and transmits batches of files.
///
/// Each file is processed independently: one file's failure never affects
/// another's outcome. Files are processed concurrently up to the configured
/// `max_concurrency`, but the skipped list in the result always follows input
/// order.
///
/// Collaborators are shared handles; the dispatcher does not own them.
pub struct Dispatcher {
    recognizer: Arc<dyn Recognizer>,
    cryptographer: Arc<dyn Cryptographer>,
    sender: Arc<dyn Sender>,
    clock: Arc<dyn Clock>,
    policy: Arc<DocumentPolicy>,
    max_concurrency: usize,
}

impl Dispatcher {
    /// Creates a dispatcher with the default configuration and the system clock.
    pub fn new(
        recognizer: Arc<dyn Recognizer>,
        cryptographer: Arc<dyn Cryptographer>,
        sender: Arc<dyn Sender>,
    ) -> Self {
        let config = DispatchConfig::default();
        Self {
            recognizer,
            cryptographer,
            sender,
            clock: Arc::new(SystemClock),
            policy: Arc::new(DocumentPolicy::from_config(&config)),
            max_concurrency: config.max_concurrency,
        }
    }

    /// Replaces the configuration after validating it.
    pub fn with_config(mut self, config: &DispatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.policy = Arc::new(DocumentPolicy::from_config(config));
        self.max_concurrency = config.max_concurrency;
        Ok(self)
    }

    /// Replaces the clock used for freshness checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Dispatches every file in `files` under `credential`.
    ///
    /// Business failures (unrecognized, unsupported format, stale, signing or
    /// send failure) are reported only through
    /// [`DispatchResult::skipped_files`]. An attempt that panics inside a
    /// collaborator is logged and its file counted as skipped.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn dispatch(&self, files: Vec<File>, credential: Credential) -> DispatchResult {
        let run_id = DispatchRunId::new_random();
        let span = info_span!("dispatch", run_id = %run_id, files = files.len());
        self.run(run_id, files, credential).instrument(span).await
    }

    async fn run(
        &self,
        run_id: DispatchRunId,
        files: Vec<File>,
        credential: Credential,
    ) -> DispatchResult {
        let attempted = files.len();
        let files: Vec<Arc<File>> = files.into_iter().map(Arc::new).collect();
        let credential = Arc::new(credential);
        let stages = Arc::new(self.stages());
        let semaphore = Arc::new(Semaphore::new(
            self.max_concurrency.min(Semaphore::MAX_PERMITS),
        ));

        // Indexed by input position; anything not explicitly delivered is skipped.
        let mut delivered = vec![false; attempted];
        let mut join_set = JoinSet::new();

        for (index, file) in files.iter().enumerate() {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                error!("dispatch semaphore closed; remaining files are skipped");
                break;
            };
            let stages = Arc::clone(&stages);
            let file = Arc::clone(file);
            let credential = Arc::clone(&credential);
            join_set.spawn(
                async move {
                    let _permit = permit;
                    (index, stages.attempt_logged(&file, &credential).await)
                }
                .in_current_span(),
            );
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, ok)) => delivered[index] = ok,
                Err(err) => error!(error = %err, "file attempt aborted; file is skipped"),
            }
        }

        let skipped_files: Vec<File> = files
            .into_iter()
            .zip(delivered)
            .filter(|(_, ok)| !ok)
            .map(|(file, _)| Arc::try_unwrap(file).unwrap_or_else(|shared| (*shared).clone()))
            .collect();

        info!(
            delivered = attempted - skipped_files.len(),
            skipped = skipped_files.len(),
            "dispatch complete"
        );
        DispatchResult::new(run_id, attempted, skipped_files)
    }

    fn stages(&self) -> Stages {
        Stages {
            recognizer: Arc::clone(&self.recognizer),
            cryptographer: Arc::clone(&self.cryptographer),
            sender: Arc::clone(&self.sender),
            clock: Arc::clone(&self.clock),
            policy: Arc::clone(&self.policy),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("policy", &self.policy)
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}
