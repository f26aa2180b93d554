use super::*;

impl TwitchApiClient {
    /// Get user profile by login name.
    pub async fn get_user_by_login(
        &self,
        token: &AccessToken,
        login: &str,
    ) -> Result<Option<TwitchUser>, TwitchError> {
        let logins = [login.to_string()];
        let users = self.get_users_by_logins(token, &logins).await?;
        Ok(users.into_iter().next())
    }

    /// Get users by login names (up to 100). Unknown logins are simply absent.
    pub async fn get_users_by_logins(
        &self,
        token: &AccessToken,
        logins: &[String],
    ) -> Result<Vec<TwitchUser>, TwitchError> {
        if logins.is_empty() {
            return Ok(Vec::new());
        }

        let query: Vec<(&str, String)> = logins
            .iter()
            .take(MAX_IDS_PER_REQUEST)
            .map(|login| ("login", login.to_lowercase()))
            .collect();
        let url = format!("{}/users", self.base_url);
        let body = self.authenticated_get(&url, &query, token).await?;
        let resp: HelixResponse<TwitchUser> = serde_json::from_str(&body)?;
        Ok(resp.data)
    }
}
