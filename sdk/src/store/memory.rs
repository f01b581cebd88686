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

use crate::credentials::{CredentialsStore, MemoryCredentialsStore};
use crate::notifications::{MemoryNotificationStore, NotificationStore};
use crate::users::{MemoryUserStore, UserStore};

use super::StoreFactory;

/// A `StoreFactory` backed by memory. Every store it hands out shares the same state.
#[derive(Default)]
pub struct MemoryStoreFactory {
    user_store: MemoryUserStore,
    credentials_store: MemoryCredentialsStore,
    notification_store: MemoryNotificationStore,
}

impl MemoryStoreFactory {
    pub fn new() -> Self {
        MemoryStoreFactory::default()
    }
}

impl StoreFactory for MemoryStoreFactory {
    fn get_user_store(&self) -> Box<dyn UserStore> {
        Box::new(self.user_store.clone())
    }

    fn get_credentials_store(&self) -> Box<dyn CredentialsStore> {
        Box::new(self.credentials_store.clone())
    }

    fn get_notification_store(&self) -> Box<dyn NotificationStore> {
        Box::new(self.notification_store.clone())
    }
}
