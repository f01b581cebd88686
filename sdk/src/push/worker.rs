// Copyright 2018-2020 Cargill Incorporated
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A background thread that performs push delivery, so senders never wait on the push provider.

use std::thread;

use crossbeam_channel::{Receiver, Sender};

use super::{PushDispatcher, PushMessage};
use crate::error::InternalError;
use crate::threading::lifecycle::ShutdownHandle;

enum PushCommand {
    Dispatch {
        message: PushMessage,
        tokens: Vec<String>,
    },
    Shutdown,
}

/// Queues push jobs for a `PushWorker`.
///
/// Sending never blocks and never fails the caller; if the worker has stopped the job is dropped
/// with a warning.
#[derive(Clone)]
pub struct PushSender {
    sender: Sender<PushCommand>,
}

impl PushSender {
    pub fn send(&self, message: PushMessage, tokens: Vec<String>) {
        if tokens.is_empty() {
            debug!("No device tokens for notification {}; skipping push", message.id);
            return;
        }

        let id = message.id.clone();
        if self
            .sender
            .send(PushCommand::Dispatch { message, tokens })
            .is_err()
        {
            warn!("Push worker has stopped; dropping push for notification {}", id);
        }
    }
}

/// Owns the push delivery thread.
pub struct PushWorker {
    sender: Sender<PushCommand>,
    join_handle: thread::JoinHandle<()>,
}

impl PushWorker {
    /// Starts the delivery thread around `dispatcher`.
    pub fn start(dispatcher: Box<dyn PushDispatcher>) -> Result<Self, InternalError> {
        Self::start_with(move || Ok(dispatcher))
    }

    /// Starts the delivery thread, building the dispatcher on that thread.
    ///
    /// A dispatcher that owns a blocking HTTP client must be created and dropped outside any
    /// async runtime, so callers running inside one pass a constructor here. Returns once the
    /// dispatcher is built, with its error if building failed.
    pub fn start_with<F>(build_dispatcher: F) -> Result<Self, InternalError>
    where
        F: FnOnce() -> Result<Box<dyn PushDispatcher>, InternalError> + Send + 'static,
    {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let (ready_sender, ready_receiver) = crossbeam_channel::bounded(1);

        let join_handle = thread::Builder::new()
            .name("PushWorker".into())
            .spawn(move || {
                let dispatcher = match build_dispatcher() {
                    Ok(dispatcher) => {
                        let _ = ready_sender.send(Ok(()));
                        dispatcher
                    }
                    Err(err) => {
                        let _ = ready_sender.send(Err(err.to_string()));
                        return;
                    }
                };
                run_dispatch_loop(dispatcher, receiver)
            })
            .map_err(|err| {
                InternalError::from_source_with_prefix(
                    Box::new(err),
                    "Unable to start push worker thread".to_string(),
                )
            })?;

        match ready_receiver.recv() {
            Ok(Ok(())) => Ok(PushWorker {
                sender,
                join_handle,
            }),
            Ok(Err(message)) => {
                let _ = join_handle.join();
                Err(InternalError::with_message(format!(
                    "Unable to start push worker: {}",
                    message
                )))
            }
            Err(_) => Err(InternalError::with_message(
                "Push worker thread exited before it was ready".to_string(),
            )),
        }
    }

    pub fn sender(&self) -> PushSender {
        PushSender {
            sender: self.sender.clone(),
        }
    }
}

fn run_dispatch_loop(dispatcher: Box<dyn PushDispatcher>, receiver: Receiver<PushCommand>) {
    loop {
        match receiver.recv() {
            Ok(PushCommand::Dispatch { message, tokens }) => {
                let report = dispatcher.dispatch(&message, &tokens);
                if report.failed > 0 {
                    warn!(
                        "Push for notification {} failed for {} of {} device(s)",
                        message.id,
                        report.failed,
                        report.failed + report.delivered
                    );
                }
            }
            Ok(PushCommand::Shutdown) => break,
            // every sender is gone
            Err(_) => break,
        }
    }
    debug!("Push worker exiting");
}

impl ShutdownHandle for PushWorker {
    /// Jobs queued before the shutdown signal are still delivered.
    fn signal_shutdown(&mut self) {
        if self.sender.send(PushCommand::Shutdown).is_err() {
            error!("Unable to signal push worker shutdown: worker has already stopped");
        }
    }

    fn wait_for_shutdown(self) -> Result<(), InternalError> {
        self.join_handle.join().map_err(|err| {
            InternalError::with_message(format!("Push worker thread panicked: {:?}", err))
        })
    }
}
