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

//! Firebase Cloud Messaging client using the legacy HTTP API.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client as BlockingClient;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use super::{plan_dispatch, DispatchReport, PushDispatcher, PushMessage, PushTarget};
use crate::error::InternalError;

pub const DEFAULT_FCM_URL: &str = "https://fcm.googleapis.com/fcm/send";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CLICK_ACTION: &str = "OPEN_NOTIFICATION_ACTIVITY";

#[derive(Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
    sound: &'static str,
    badge: &'static str,
    click_action: &'static str,
}

#[derive(Serialize)]
struct FcmRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    registration_ids: Option<&'a [String]>,
    notification: FcmNotification<'a>,
    data: BTreeMap<&'static str, String>,
    priority: &'static str,
    content_available: bool,
}

#[derive(Deserialize, Debug, Default)]
struct FcmResponse {
    #[serde(default)]
    success: usize,
    #[serde(default)]
    failure: usize,
    #[serde(default)]
    results: Vec<FcmResult>,
}

#[derive(Deserialize, Debug, Default)]
struct FcmResult {
    #[serde(default)]
    error: Option<String>,
}

/// Sends push messages through the FCM legacy HTTP endpoint, authenticated with a server key.
pub struct FcmPushClient {
    client: BlockingClient,
    url: String,
    server_key: String,
}

impl FcmPushClient {
    pub fn new(url: &str, server_key: &str) -> Result<Self, InternalError> {
        let client = BlockingClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| {
                InternalError::from_source_with_prefix(
                    Box::new(err),
                    "Unable to build push client".to_string(),
                )
            })?;

        Ok(FcmPushClient {
            client,
            url: url.to_string(),
            server_key: server_key.to_string(),
        })
    }

    fn send(&self, message: &PushMessage, target: &PushTarget) -> DispatchReport {
        let request = build_request(message, target);
        let attempted = target.len();

        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, format!("key={}", self.server_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send();

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                warn!("Unable to send push for notification {}: {}", message.id, err);
                return DispatchReport {
                    requests: 1,
                    delivered: 0,
                    failed: attempted,
                };
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            warn!(
                "Push provider rejected notification {} with {}: {}",
                message.id, status, body
            );
            return DispatchReport {
                requests: 1,
                delivered: 0,
                failed: attempted,
            };
        }

        let fcm_response = match response.json::<FcmResponse>() {
            Ok(fcm_response) => fcm_response,
            Err(err) => {
                // the request was accepted, only the summary is unreadable
                warn!("Unable to read push response for {}: {}", message.id, err);
                return DispatchReport {
                    requests: 1,
                    delivered: attempted,
                    failed: 0,
                };
            }
        };

        if fcm_response.failure > 0 {
            let tokens = target.tokens();
            for (index, result) in fcm_response.results.iter().enumerate() {
                if let Some(error) = &result.error {
                    warn!(
                        "Push for notification {} to token {} failed: {}",
                        message.id,
                        tokens.get(index).copied().unwrap_or("<unknown>"),
                        error
                    );
                }
            }
        }

        DispatchReport {
            requests: 1,
            delivered: fcm_response.success,
            failed: fcm_response.failure,
        }
    }
}

impl PushDispatcher for FcmPushClient {
    fn dispatch(&self, message: &PushMessage, tokens: &[String]) -> DispatchReport {
        let mut report = DispatchReport::default();
        for target in plan_dispatch(tokens) {
            report += self.send(message, &target);
        }

        debug!(
            "Dispatched notification {}: {} request(s), {} delivered, {} failed",
            message.id, report.requests, report.delivered, report.failed
        );

        report
    }
}

fn build_request<'a>(message: &'a PushMessage, target: &'a PushTarget) -> FcmRequest<'a> {
    let mut data = BTreeMap::new();
    data.insert("id", message.id.clone());
    data.insert("title", message.title.clone());
    data.insert("message", message.body.clone());
    data.insert("type", message.notification_type.to_string());
    data.insert("timestamp", message.timestamp.to_string());
    if let Some(recipient) = &message.recipient_uid {
        data.insert("userId", recipient.clone());
    }

    let (to, registration_ids) = match target {
        PushTarget::Single(token) => (Some(token.as_str()), None),
        PushTarget::Multicast(tokens) => (None, Some(tokens.as_slice())),
    };

    FcmRequest {
        to,
        registration_ids,
        notification: FcmNotification {
            title: &message.title,
            body: &message.body,
            sound: "default",
            badge: "1",
            click_action: CLICK_ACTION,
        },
        data,
        priority: "high",
        content_available: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mockito::{self, Matcher};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::notifications::NotificationType;

    const SERVER_KEY: &str = "test-server-key";

    fn message(recipient: Option<&str>) -> PushMessage {
        PushMessage {
            id: "n1".to_string(),
            title: "Maintenance".to_string(),
            body: "Tonight at 22:00".to_string(),
            notification_type: NotificationType::Alert,
            recipient_uid: recipient.map(String::from),
            timestamp: 1_600_000_000_000,
        }
    }

    #[test]
    fn test_request_payload_single() {
        let message = message(Some("u1"));
        let target = PushTarget::Single("tok".to_string());

        let payload = serde_json::to_value(build_request(&message, &target))
            .expect("Unable to serialize request");

        assert_eq!(
            payload,
            json!({
                "to": "tok",
                "notification": {
                    "title": "Maintenance",
                    "body": "Tonight at 22:00",
                    "sound": "default",
                    "badge": "1",
                    "click_action": "OPEN_NOTIFICATION_ACTIVITY",
                },
                "data": {
                    "id": "n1",
                    "title": "Maintenance",
                    "message": "Tonight at 22:00",
                    "type": "ALERT",
                    "timestamp": "1600000000000",
                    "userId": "u1",
                },
                "priority": "high",
                "content_available": true,
            })
        );
    }

    #[test]
    fn test_request_payload_multicast_has_no_user_id() {
        let message = message(None);
        let target = PushTarget::Multicast(vec!["a".to_string(), "b".to_string()]);

        let payload = serde_json::to_value(build_request(&message, &target))
            .expect("Unable to serialize request");

        assert_eq!(payload["registration_ids"], json!(["a", "b"]));
        assert!(payload.get("to").is_none());
        assert!(payload["data"].get("userId").is_none());
    }

    #[test]
    fn test_dispatch_single_token() {
        let endpoint = mockito::mock("POST", "/fcm/single")
            .match_header("authorization", format!("key={}", SERVER_KEY).as_str())
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({"to": "tok-1"})))
            .with_status(200)
            .with_body(r#"{"success": 1, "failure": 0, "results": [{"message_id": "m1"}]}"#)
            .create();

        let client =
            FcmPushClient::new(&format!("{}/fcm/single", mockito::server_url()), SERVER_KEY)
                .expect("Unable to create client");
        let report = client.dispatch(&message(Some("u1")), &["tok-1".to_string()]);

        endpoint.assert();
        assert_eq!(
            report,
            DispatchReport {
                requests: 1,
                delivered: 1,
                failed: 0
            }
        );
    }

    /// Per-token failures reported by the provider are counted, not returned as errors.
    #[test]
    fn test_dispatch_multicast_with_failures() {
        let tokens: Vec<String> = (0..6).map(|i| format!("tok-{}", i)).collect();
        let endpoint = mockito::mock("POST", "/fcm/multicast")
            .match_body(Matcher::PartialJson(json!({ "registration_ids": tokens })))
            .with_status(200)
            .with_body(
                r#"{"success": 4, "failure": 2, "results": [
                    {"message_id": "m0"}, {"error": "NotRegistered"}, {"message_id": "m2"},
                    {"message_id": "m3"}, {"error": "InvalidRegistration"}, {"message_id": "m5"}
                ]}"#,
            )
            .create();

        let client =
            FcmPushClient::new(&format!("{}/fcm/multicast", mockito::server_url()), SERVER_KEY)
                .expect("Unable to create client");
        let report = client.dispatch(&message(None), &tokens);

        endpoint.assert();
        assert_eq!(
            report,
            DispatchReport {
                requests: 1,
                delivered: 4,
                failed: 2
            }
        );
    }

    #[test]
    fn test_dispatch_provider_error() {
        let endpoint = mockito::mock("POST", "/fcm/unauthorized")
            .with_status(401)
            .with_body("Unauthorized")
            .expect(2)
            .create();

        let client =
            FcmPushClient::new(&format!("{}/fcm/unauthorized", mockito::server_url()), SERVER_KEY)
                .expect("Unable to create client");
        let report = client.dispatch(&message(None), &["a".to_string(), "b".to_string()]);

        endpoint.assert();
        assert_eq!(
            report,
            DispatchReport {
                requests: 2,
                delivered: 0,
                failed: 2
            }
        );
    }
}
