use super::*;

/// Helix accepts at most 100 `user_id` filters per `/streams` request.
pub const MAX_IDS_PER_REQUEST: usize = 100;

impl TwitchApiClient {
    /// Get live streams for the given broadcasters.
    ///
    /// Broadcasters that are offline have no entry in the result. Lists longer
    /// than [`MAX_IDS_PER_REQUEST`] are sent as consecutive requests and the
    /// first failing request fails the whole call.
    pub async fn get_streams_by_user_ids(
        &self,
        token: &AccessToken,
        user_ids: &[String],
    ) -> Result<Vec<StreamInfo>, TwitchError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut streams = Vec::new();
        for chunk in user_ids.chunks(MAX_IDS_PER_REQUEST) {
            let query = build_streams_query(chunk);
            let url = format!("{}/streams", self.base_url);
            let body = self.authenticated_get(&url, &query, token).await?;
            let resp: HelixResponse<StreamInfo> = serde_json::from_str(&body)?;
            streams.extend(resp.data);
        }
        Ok(streams)
    }
}

pub(super) fn build_streams_query(user_ids: &[String]) -> Vec<(&'static str, String)> {
    let limited = &user_ids[..user_ids.len().min(MAX_IDS_PER_REQUEST)];
    let first = limited.len().clamp(1, MAX_IDS_PER_REQUEST);
    std::iter::once(("first", first.to_string()))
        .chain(limited.iter().map(|id| ("user_id", id.clone())))
        .collect()
}
