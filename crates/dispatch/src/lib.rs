//! Courier batch dispatcher.
//!
//! Takes a batch of files and a signing credential, and for every file
//! independently runs the pipeline:
//!
//! 1. **Recognize** the file into a [`intake::Document`] via [`intake::Recognizer`].
//! 2. **Validate** the format token and freshness via [`intake::DocumentPolicy`].
//! 3. **Sign** the content via [`intake::Cryptographer`].
//! 4. **Send** the signed payload via [`intake::Sender`].
//!
//! A file that fails any stage is skipped; later stages are not run for it.
//! The [`intake::DispatchResult`] lists skipped files in input order.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The dispatcher sequences calls between the
//! business rules in [`intake`] and the collaborator ports. It contains no
//! domain rules of its own.

mod attempt;
mod dispatcher;

pub use dispatcher::Dispatcher;
