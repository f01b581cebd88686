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

use jsonwebtoken::{encode, Header};

use super::{Claims, TokenIssuer, TokenIssuerError};

/// Signs access tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct AccessTokenIssuer {
    secret: String,
}

impl AccessTokenIssuer {
    pub fn new(secret: String) -> AccessTokenIssuer {
        AccessTokenIssuer { secret }
    }
}

impl TokenIssuer<Claims> for AccessTokenIssuer {
    fn issue_token_with_claims(&self, claims: Claims) -> Result<String, TokenIssuerError> {
        Ok(encode(
            &Header::default(),
            &claims,
            self.secret.as_bytes(),
        )?)
    }
}
