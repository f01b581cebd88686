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

use super::schema::user_credentials;
use crate::credentials::UserCredentials;

#[derive(Queryable, PartialEq, Debug)]
pub struct UserCredentialsModel {
    pub id: i64,
    pub user_id: String,
    pub email: String,
    pub password: String,
}

#[derive(Insertable, PartialEq, Debug)]
#[table_name = "user_credentials"]
pub struct NewUserCredentialsModel {
    pub user_id: String,
    pub email: String,
    pub password: String,
}

impl From<UserCredentialsModel> for UserCredentials {
    fn from(model: UserCredentialsModel) -> Self {
        Self {
            user_id: model.user_id,
            email: model.email,
            password: model.password,
        }
    }
}

impl From<UserCredentials> for NewUserCredentialsModel {
    fn from(credentials: UserCredentials) -> Self {
        Self {
            user_id: credentials.user_id,
            email: credentials.email,
            password: credentials.password,
        }
    }
}
