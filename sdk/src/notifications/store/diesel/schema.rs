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

table! {
    notification (id) {
        id -> Text,
        title -> Text,
        message -> Text,
        sender_uid -> Text,
        sender_name -> Text,
        recipient_uid -> Nullable<Text>,
        timestamp -> BigInt,
        notification_type -> Text,
        is_read -> Bool,
    }
}

table! {
    read_marker (user_id, notification_id) {
        user_id -> Text,
        notification_id -> Text,
    }
}

allow_tables_to_appear_in_same_query!(notification, read_marker);
