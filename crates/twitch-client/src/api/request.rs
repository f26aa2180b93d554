use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::*;

impl TwitchApiClient {
    /// Build auth headers from the given token.
    fn auth_headers(&self, token: &AccessToken) -> Result<HeaderMap, TwitchError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", token.secret());
        let mut bearer = HeaderValue::from_str(&bearer)
            .map_err(|_| TwitchError::InvalidHeader("Authorization"))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            "Client-Id",
            HeaderValue::from_str(&self.client_id)
                .map_err(|_| TwitchError::InvalidHeader("Client-Id"))?,
        );
        Ok(headers)
    }

    /// Execute a GET request with auth headers and return the raw body.
    ///
    /// `query` pairs are form-encoded, so values cannot add filters of their
    /// own. A 401 is returned as [`TwitchError::ApiError`]; the caller decides
    /// whether to regenerate the token.
    pub(super) async fn authenticated_get(
        &self,
        url: &str,
        query: &[(&str, String)],
        token: &AccessToken,
    ) -> Result<String, TwitchError> {
        let headers = self.auth_headers(token)?;
        let resp = self
            .http
            .get(url)
            .query(query)
            .headers(headers)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!(url, "Got 401 from Helix, access token is expired or invalid");
            return Err(TwitchError::ApiError {
                status: 401,
                message: body,
            });
        }

        if !status.is_success() {
            return Err(TwitchError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }
}
