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

use super::schema::herald_user;
use crate::users::User;

#[derive(Insertable, Queryable, PartialEq, Debug)]
#[table_name = "herald_user"]
pub struct UserModel {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub push_token: String,
}

impl From<User> for UserModel {
    fn from(user: User) -> Self {
        UserModel {
            uid: user.uid,
            email: user.email,
            name: user.name,
            is_admin: user.is_admin,
            push_token: user.push_token,
        }
    }
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            uid: model.uid,
            email: model.email,
            name: model.name,
            is_admin: model.is_admin,
            push_token: model.push_token,
        }
    }
}
