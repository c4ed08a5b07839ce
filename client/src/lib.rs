mod api;
mod auth;
mod error;
mod session;
mod transport;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use walls_protocol::{
    ApiRequest, AttackRequest, AttackResponse, BuyItemRequest, Endpoint, EquipItemRequest,
    JoinBattleResponse, MoveRequest, PlayerStat, QueueRequest, StatRequest, StateSnapshot,
    TravelDestinations, UseItemRequest,
};

pub use api::GameApi;
pub use auth::authenticate;
pub use error::{ClientError, TOKEN_EXPIRED_MESSAGE};
pub use session::Credentials;
pub use transport::{API_URL, HttpTransport, RawResponse, Transport};

use session::Session;

/// Authenticated War of Walls API client
///
/// Owns the account's bearer token. When credentials are supplied, a call
/// rejected for an expired token is replayed once after logging in again.
pub struct GameClient<T: Transport = HttpTransport> {
    transport: T,
    session: Session,
}

impl GameClient<HttpTransport> {
    /// Client for the live API using an existing token
    pub fn new(token: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self::with_transport(HttpTransport::default(), token, credentials)
    }

    /// Log in against the live API and keep the credentials for refresh
    pub async fn login(username: &str, password: &str) -> Result<Self, ClientError> {
        Self::login_with_transport(HttpTransport::default(), username, password).await
    }
}

impl<T: Transport> GameClient<T> {
    pub fn with_transport(
        transport: T,
        token: impl Into<String>,
        credentials: Option<Credentials>,
    ) -> Self {
        tracing::info!(
            refresh = credentials.is_some(),
            "War of Walls API client initialized"
        );
        Self {
            transport,
            session: Session::new(token.into(), credentials),
        }
    }

    pub async fn login_with_transport(
        transport: T,
        username: &str,
        password: &str,
    ) -> Result<Self, ClientError> {
        let token = authenticate(&transport, username, password).await?;
        Ok(Self::with_transport(
            transport,
            token,
            Some(Credentials::new(username, password)),
        ))
    }

    /// Current bearer token
    pub fn token(&self) -> String {
        self.session.token()
    }

    /// Exchange credentials for a token without touching this client's session
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, ClientError> {
        authenticate(&self.transport, username, password).await
    }

    /// Issue an authenticated request.
    ///
    /// An expired-token rejection triggers at most one re-authentication and
    /// one replay of the same request. A second expiry is surfaced.
    pub async fn call(&self, request: &ApiRequest) -> Result<Value, ClientError> {
        let token = self.session.token();
        let response = self.transport.send(request, Some(&token)).await?;

        if !response.is_token_expired() {
            return into_body(request, response);
        }

        let Some(credentials) = self.session.credentials() else {
            return Err(ClientError::TokenExpired(response.message()));
        };

        tracing::info!(
            endpoint = request.endpoint.path(),
            username = %credentials.username,
            "Token expired, re-authenticating"
        );

        let fresh =
            authenticate(&self.transport, &credentials.username, &credentials.password).await?;
        self.session.replace(fresh.clone());

        let retried = self.transport.send(request, Some(&fresh)).await?;
        if retried.is_token_expired() {
            tracing::warn!(
                endpoint = request.endpoint.path(),
                "Token rejected again after refresh"
            );
            return Err(ClientError::TokenExpired(retried.message()));
        }

        into_body(request, retried)
    }

    async fn post<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> Result<Value, ClientError> {
        let request = ApiRequest::with_body(endpoint, body)
            .map_err(|e| walls_protocol::ParseError::InvalidFormat(e.to_string()))?;
        self.call(&request).await
    }
}

fn into_body(request: &ApiRequest, response: RawResponse) -> Result<Value, ClientError> {
    if response.is_success() {
        return Ok(response.body);
    }

    let error = ClientError::Request {
        status: response.status,
        message: response.message(),
    };
    tracing::debug!(endpoint = request.endpoint.path(), error = %error, "Request rejected");
    Err(error)
}

#[async_trait]
impl<T: Transport> GameApi for GameClient<T> {
    async fn poll_state(&self) -> Result<StateSnapshot, ClientError> {
        let body = self.call(&ApiRequest::new(Endpoint::Sync)).await?;
        Ok(walls_protocol::decode(body)?)
    }

    async fn move_to(&self, destination_id: u32) -> Result<(), ClientError> {
        self.post(Endpoint::Move, &MoveRequest::new(destination_id)).await?;
        Ok(())
    }

    async fn travel_destinations(&self) -> Result<TravelDestinations, ClientError> {
        let body = self.call(&ApiRequest::new(Endpoint::TravelDestinations)).await?;
        Ok(walls_protocol::decode(body)?)
    }

    async fn submit_attack(
        &self,
        battle_id: &str,
        target_id: &str,
        attack_position: u8,
        defense_positions: [u8; 2],
    ) -> Result<AttackResponse, ClientError> {
        let body = AttackRequest {
            battle_id,
            target_id,
            attack_position,
            defense_positions,
        };
        let response = self.post(Endpoint::CombatAction, &body).await?;
        Ok(walls_protocol::decode(response)?)
    }

    async fn enter_matchmaking_queue(&self, level_range: u32) -> Result<(), ClientError> {
        match self.post(Endpoint::JoinQueue, &QueueRequest { level_range }).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_already_in_queue() => {
                tracing::debug!(level_range, "Already in queue");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn leave_queue_immediately(&self) -> Result<JoinBattleResponse, ClientError> {
        let body = self.call(&ApiRequest::new(Endpoint::SkipQueue)).await?;
        Ok(walls_protocol::decode(body)?)
    }

    async fn use_consumable(&self, target_id: &str, user_item_id: &str) -> Result<(), ClientError> {
        let body = UseItemRequest {
            target_id,
            user_item_id,
        };
        self.post(Endpoint::UseItem, &body).await?;
        Ok(())
    }

    async fn allocate_stat_point(&self, stat: PlayerStat) -> Result<(), ClientError> {
        self.post(Endpoint::AddStat, &StatRequest { stat }).await?;
        Ok(())
    }

    async fn reduce_stat_point(&self, stat: PlayerStat) -> Result<(), ClientError> {
        self.post(Endpoint::ReduceStat, &StatRequest { stat }).await?;
        Ok(())
    }

    async fn buy_item(&self, item_id: &str) -> Result<(), ClientError> {
        self.post(Endpoint::BuyItem, &BuyItemRequest { item_id }).await?;
        Ok(())
    }

    async fn equip_item(&self, slot: &str, user_item_id: &str) -> Result<(), ClientError> {
        self.post(Endpoint::EquipItem, &EquipItemRequest { slot, user_item_id }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    /// Replays canned responses in order and records what was sent
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<RawResponse>>,
        sent: Mutex<Vec<(Endpoint, Option<String>, Option<Value>)>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<RawResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<(Endpoint, Option<String>, Option<Value>)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(
            &self,
            request: &ApiRequest,
            token: Option<&str>,
        ) -> Result<RawResponse, ClientError> {
            self.sent.lock().unwrap().push((
                request.endpoint,
                token.map(str::to_string),
                request.body.clone(),
            ));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ClientError::Network("script exhausted".to_string()))
        }
    }

    fn expired() -> RawResponse {
        RawResponse::new(403, json!({ "message": "Invalid or expired token" }))
    }

    fn login_ok(token: &str) -> RawResponse {
        RawResponse::new(200, json!({ "token": token }))
    }

    fn ok() -> RawResponse {
        RawResponse::new(200, json!({ "success": true }))
    }

    fn client(
        responses: Vec<RawResponse>,
        with_credentials: bool,
    ) -> GameClient<ScriptedTransport> {
        let credentials = with_credentials.then(|| Credentials::new("knight", "hunter2"));
        GameClient::with_transport(ScriptedTransport::new(responses), "old", credentials)
    }

    #[tokio::test]
    async fn test_expired_token_refreshed_once() {
        let client = client(vec![expired(), login_ok("fresh"), ok()], true);

        client.move_to(10).await.unwrap();

        let sent = client.transport.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].0, Endpoint::Move);
        assert_eq!(sent[0].1.as_deref(), Some("old"));
        assert_eq!(sent[1].0, Endpoint::Login);
        assert_eq!(sent[1].1, None);
        assert_eq!(sent[1].2, Some(json!({ "username": "knight", "password": "hunter2" })));
        assert_eq!(sent[2].0, Endpoint::Move);
        assert_eq!(sent[2].1.as_deref(), Some("fresh"));
        assert_eq!(sent[2].2, sent[0].2);
        assert_eq!(client.token(), "fresh");
    }

    #[tokio::test]
    async fn test_second_expiry_surfaced() {
        let client = client(vec![expired(), login_ok("fresh"), expired(), ok()], true);

        let result = client.move_to(10).await;

        assert!(matches!(result, Err(ClientError::TokenExpired(_))));
        let logins = client
            .transport
            .sent()
            .iter()
            .filter(|(endpoint, _, _)| *endpoint == Endpoint::Login)
            .count();
        assert_eq!(logins, 1);
        assert_eq!(client.transport.sent().len(), 3);
    }

    #[tokio::test]
    async fn test_expiry_without_credentials() {
        let client = client(vec![expired()], false);

        let result = client.poll_state().await;

        assert!(matches!(result, Err(ClientError::TokenExpired(_))));
        assert_eq!(client.transport.sent().len(), 1);
        assert_eq!(client.token(), "old");
    }

    #[tokio::test]
    async fn test_refresh_login_failure_surfaced() {
        let client = client(
            vec![expired(), RawResponse::new(401, json!({ "message": "Bad password" }))],
            true,
        );

        let result = client.move_to(3).await;

        assert_eq!(result, Err(ClientError::Auth("Bad password".to_string())));
        assert_eq!(client.token(), "old");
    }

    #[tokio::test]
    async fn test_other_forbidden_not_retried() {
        let client = client(
            vec![RawResponse::new(403, json!({ "message": "Location is guarded" }))],
            true,
        );

        let result = client.move_to(28).await;

        assert_eq!(
            result,
            Err(ClientError::Request {
                status: 403,
                message: "Location is guarded".to_string()
            })
        );
        assert_eq!(client.transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_already_in_queue_is_ok() {
        let client = client(
            vec![RawResponse::new(400, json!({ "message": "Already in queue" }))],
            false,
        );

        client.enter_matchmaking_queue(5).await.unwrap();

        let sent = client.transport.sent();
        assert_eq!(sent[0].0, Endpoint::JoinQueue);
        assert_eq!(sent[0].2, Some(json!({ "levelRange": 5 })));
    }

    #[tokio::test]
    async fn test_queue_error_propagated() {
        let client = client(
            vec![RawResponse::new(400, json!({ "message": "Not enough health" }))],
            false,
        );

        let result = client.enter_matchmaking_queue(5).await;

        assert_eq!(
            result,
            Err(ClientError::Request {
                status: 400,
                message: "Not enough health".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_join_shadow_battle() {
        let client = client(
            vec![
                ok(),
                RawResponse::new(
                    200,
                    json!({ "success": true, "isShadow": true, "battle": { "id": "b-1" } }),
                ),
            ],
            false,
        );

        let response = client.join_shadow_battle(7).await.unwrap();

        assert!(response.is_shadow);
        let endpoints: Vec<Endpoint> = client.transport.sent().iter().map(|s| s.0).collect();
        assert_eq!(endpoints, vec![Endpoint::JoinQueue, Endpoint::SkipQueue]);
    }

    #[tokio::test]
    async fn test_authenticate_rejected() {
        let transport = ScriptedTransport::new(vec![RawResponse::new(
            401,
            json!({ "message": "Invalid credentials" }),
        )]);

        let result = GameClient::login_with_transport(transport, "knight", "wrong").await;

        assert!(matches!(result, Err(ClientError::Auth(m)) if m == "Invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_server_error_is_not_auth() {
        let transport = ScriptedTransport::new(vec![RawResponse::new(
            500,
            json!({ "message": "Internal server error" }),
        )]);

        let result = GameClient::login_with_transport(transport, "knight", "hunter2").await;

        assert_eq!(
            result.err(),
            Some(ClientError::Request {
                status: 500,
                message: "Internal server error".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_refresh_gateway_error_surfaced_as_request() {
        let client = client(
            vec![expired(), RawResponse::new(502, json!({ "message": "Bad gateway" }))],
            true,
        );

        let result = client.poll_state().await;

        assert_eq!(
            result.map(|_| ()),
            Err(ClientError::Request {
                status: 502,
                message: "Bad gateway".to_string()
            })
        );
        assert_eq!(client.token(), "old");
    }

    #[tokio::test]
    async fn test_travel_destinations_decoded() {
        let client = client(
            vec![RawResponse::new(
                200,
                json!({
                    "destinations": [
                        { "id": "11", "name": "Forest", "hasBattle": true },
                        { "id": "28", "name": "Castle", "isGuarded": true, "travelCostGold": 40 }
                    ],
                    "currentLocation": { "id": "10", "name": "Town" }
                }),
            )],
            false,
        );

        let destinations = client.travel_destinations().await.unwrap();

        assert_eq!(destinations.current_location.id, "10");
        assert_eq!(destinations.destinations.len(), 2);
        assert!(destinations.destinations[0].has_battle);
        assert!(destinations.destinations[1].is_guarded);
        assert_eq!(destinations.destinations[1].travel_cost_gold, 40);

        let sent = client.transport.sent();
        assert_eq!(sent[0].0, Endpoint::TravelDestinations);
        assert_eq!(sent[0].1.as_deref(), Some("old"));
        assert_eq!(sent[0].2, None);
    }

    #[tokio::test]
    async fn test_item_and_stat_request_bodies() {
        let client = client(vec![ok(), ok(), ok(), ok()], false);

        client.use_consumable("u-1", "ui-7").await.unwrap();
        client.buy_item("potion-small").await.unwrap();
        client.equip_item("weapon", "ui-9").await.unwrap();
        client.reduce_stat_point(PlayerStat::Vitality).await.unwrap();

        let sent: Vec<(Endpoint, Option<Value>)> = client
            .transport
            .sent()
            .into_iter()
            .map(|(endpoint, _, body)| (endpoint, body))
            .collect();
        assert_eq!(
            sent,
            vec![
                (
                    Endpoint::UseItem,
                    Some(json!({ "targetId": "u-1", "userItemId": "ui-7" }))
                ),
                (Endpoint::BuyItem, Some(json!({ "itemId": "potion-small" }))),
                (
                    Endpoint::EquipItem,
                    Some(json!({ "slot": "weapon", "userItemId": "ui-9" }))
                ),
                (Endpoint::ReduceStat, Some(json!({ "stat": "vitality" }))),
            ]
        );
    }

    #[tokio::test]
    async fn test_network_failure_surfaced() {
        let client = client(vec![], true);

        let result = client.poll_state().await;

        assert!(matches!(result, Err(ClientError::Network(_))));
    }

    #[tokio::test]
    async fn test_poll_state_and_attack() {
        let client = client(
            vec![
                RawResponse::new(
                    200,
                    json!({
                        "player": {
                            "id": "u-1",
                            "username": "knight",
                            "health": { "current": 90, "max": 100 }
                        },
                        "battle": { "inBattle": false }
                    }),
                ),
                RawResponse::new(200, json!({ "success": true, "resolved": false })),
            ],
            false,
        );

        let snapshot = client.poll_state().await.unwrap();
        assert_eq!(snapshot.player.health.current, 90);

        let response = client.submit_attack("b-1", "p-2", 1, [0, 3]).await.unwrap();
        assert!(response.is_unresolved());

        let sent = client.transport.sent();
        assert_eq!(
            sent[1].2,
            Some(json!({
                "battleId": "b-1",
                "targetId": "p-2",
                "attackPosition": 1,
                "defensePositions": [0, 3],
            }))
        );
    }
}
