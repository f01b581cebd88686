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

//! Shutdown sequencing for components that own threads.

use crate::error::InternalError;

/// Two-phase shutdown for a component with background threads.
///
/// `signal_shutdown` asks the component to stop accepting work and to wind down its loops.
/// `wait_for_shutdown` blocks until the work already accepted is finished and the threads are
/// joined.
///
/// When stopping several components, signal all of them first and then wait on each, so they
/// wind down in parallel.
pub trait ShutdownHandle {
    /// Instructs the component to begin shutting down.
    fn signal_shutdown(&mut self);

    /// Waits until the component has completely shut down, joining its threads.
    fn wait_for_shutdown(self) -> Result<(), InternalError>;
}
