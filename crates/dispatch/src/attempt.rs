//! The per-file pipeline: recognize → validate → sign → send.
//!
//! Stages run strictly in that order and stop at the first failure, so a
//! collaborator is only called for files that cleared every earlier stage.

use std::sync::Arc;

use intake::{
    Clock, Credential, Cryptographer, DocumentPolicy, File, Recognizer, Sender, SkipReason,
};
use tracing::{debug, warn};

/// Shared handles needed by every file attempt of one dispatch run.
pub(crate) struct Stages {
    pub(crate) recognizer: Arc<dyn Recognizer>,
    pub(crate) cryptographer: Arc<dyn Cryptographer>,
    pub(crate) sender: Arc<dyn Sender>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) policy: Arc<DocumentPolicy>,
}

impl Stages {
    /// Runs one file through every stage.
    pub(crate) async fn attempt(
        &self,
        file: &File,
        credential: &Credential,
    ) -> Result<(), SkipReason> {
        let document = self
            .recognizer
            .recognize(file)
            .await
            .ok_or(SkipReason::Unrecognized)?;

        // "now" is read per file, at the moment the document is evaluated.
        self.policy.evaluate(&document, self.clock.now())?;

        let payload = self
            .cryptographer
            .sign(&document.content, credential)
            .await
            .map_err(|err| {
                warn!(file = %file.name(), error = %err, "signing failed");
                SkipReason::SigningFailed
            })?;

        if !self.sender.try_send(&payload).await {
            return Err(SkipReason::SendFailed);
        }
        Ok(())
    }

    /// Runs [`Self::attempt`] and logs the outcome.
    pub(crate) async fn attempt_logged(&self, file: &File, credential: &Credential) -> bool {
        match self.attempt(file, credential).await {
            Ok(()) => {
                debug!(file = %file.name(), "file delivered");
                true
            }
            Err(reason) => {
                debug!(file = %file.name(), %reason, "file skipped");
                false
            }
        }
    }
}
