#[cfg(test)]
mod tests {
    use crate::auth::{AuthError, AuthLifecycle, Credential, TokenStore};
    use agendify_config::OAuthConfig;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn oauth_config() -> OAuthConfig {
        OAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_uri: "http://localhost:10000/auth/callback".to_string(),
            post_auth_redirect: "http://localhost:10000/".to_string(),
        }
    }

    fn lifecycle_at(dir: &std::path::Path, server: &MockServer) -> AuthLifecycle {
        let store = TokenStore::new(dir.join("token.json"));
        AuthLifecycle::new(oauth_config(), store)
            .unwrap()
            .with_endpoints(
                &format!("{}/auth", server.uri()),
                &format!("{}/token", server.uri()),
            )
    }

    #[test]
    fn authorization_url_requests_offline_calendar_access() {
        let store = TokenStore::new("unused-token.json");
        let auth = AuthLifecycle::new(oauth_config(), store).unwrap();
        let url = auth.authorization_url();
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains(&urlencoding::encode(
            "https://www.googleapis.com/auth/calendar"
        ).into_owned()));
        assert!(url.contains("client_id=test-client"));
    }

    #[test]
    fn credential_expiry_boundary() {
        let now = Utc::now();
        let expired = Credential {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: now.timestamp(),
        };
        assert!(expired.is_expired(now));

        let valid = Credential {
            expires_at: now.timestamp() + 3600,
            ..expired
        };
        assert!(!valid.is_expired(now));
    }

    #[test]
    fn token_store_round_trips_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        assert!(store.load().unwrap().is_none());

        let credential = Credential {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: 1_900_000_000,
        };
        store.save(&credential).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "access");
        assert_eq!(loaded.refresh_token, "refresh");
        assert_eq!(loaded.expires_at, 1_900_000_000);
        // No temp file left behind from the rename dance.
        assert!(!dir.path().join("token.tmp").exists());
    }

    #[tokio::test]
    async fn exchange_code_installs_and_persists_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh-access",
                "refresh_token": "fresh-refresh",
                "expires_in": 3599,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let auth = lifecycle_at(dir.path(), &server);

        let credential = auth.exchange_code("the-code").await.unwrap();
        assert_eq!(credential.access_token, "fresh-access");
        assert!(credential.expires_at > Utc::now().timestamp());

        // Survives a process restart through the store.
        let reloaded = TokenStore::new(dir.path().join("token.json"))
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.refresh_token, "fresh-refresh");

        assert!(auth.current_credential().await.is_some());
    }

    #[tokio::test]
    async fn rejected_exchange_stays_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let auth = lifecycle_at(dir.path(), &server);

        let err = auth.exchange_code("already-used-code").await.unwrap_err();
        assert!(matches!(err, AuthError::ExchangeRejected(_)));
        assert!(auth.current_credential().await.is_none());
    }

    fn seed_expired_credential(dir: &std::path::Path) {
        let store = TokenStore::new(dir.join("token.json"));
        store
            .save(&Credential {
                access_token: "stale-access".to_string(),
                refresh_token: "good-refresh".to_string(),
                expires_at: Utc::now().timestamp() - 60,
            })
            .unwrap();
    }

    #[tokio::test]
    async fn expired_credential_triggers_exactly_one_refresh_for_racing_callers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "access_token": "refreshed-access",
                        "expires_in": 3600,
                    }))
                    .set_delay(std::time::Duration::from_millis(50)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        seed_expired_credential(dir.path());
        let auth = Arc::new(lifecycle_at(dir.path(), &server));

        let first = tokio::spawn({
            let auth = auth.clone();
            async move { auth.current_credential().await }
        });
        let second = tokio::spawn({
            let auth = auth.clone();
            async move { auth.current_credential().await }
        });

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(first.access_token, "refreshed-access");
        assert_eq!(second.access_token, "refreshed-access");
        // The refresh response carried no refresh token; the old one is kept.
        assert_eq!(first.refresh_token, "good-refresh");
    }

    #[tokio::test]
    async fn failed_refresh_demotes_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        seed_expired_credential(dir.path());
        let auth = lifecycle_at(dir.path(), &server);

        assert!(auth.current_credential().await.is_none());
        // Refresh is attempted once per read; the credential is gone now, so
        // a second read must not hit the token endpoint again.
        assert!(auth.current_credential().await.is_none());
    }
}
