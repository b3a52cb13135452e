use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    error::ApiError,
    types::{CommentRequest, CommentsResponse, LikeRequest, VoteRequest, VoteStatsResponse},
    ApiResult, PollApi,
};
use crate::model::{
    Candidate, CandidateId, Chhetra, ChhetraId, Comment, ContactAck, ContactRequest, VoteCounts,
    VoteStatus, VoteTotals,
};

/// Response body after the status check passed.
enum Body {
    Json(String),
    Text(String),
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = self.url(endpoint);
        debug!(%method, %url, "api request");
        self.client
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json")
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<Body> {
        let response = builder.send().await.map_err(|e| {
            warn!("api network error: {e}");
            ApiError::Network(e)
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response).await;
            debug!(%status, %detail, "api error response");
            return Err(ApiError::Status { status, detail });
        }

        let is_json = is_json(&response);
        let text = response.text().await?;
        Ok(if is_json {
            Body::Json(text)
        } else {
            Body::Text(text)
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        // lenient about the content type header, strict about the payload
        let text = match self.send(builder).await? {
            Body::Json(t) | Body::Text(t) => t,
        };
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.fetch(self.request(Method::GET, endpoint)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.fetch(self.request(Method::POST, endpoint).json(body))
            .await
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false)
}

async fn error_detail(response: Response) -> String {
    let json = is_json(&response);
    match response.text().await {
        Ok(text) if json => match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(serde_json::Value::String(s)) => s,
            Ok(v) => v.to_string(),
            Err(_) => text,
        },
        Ok(text) => text,
        Err(e) => e.to_string(),
    }
}

/// `GET /comments` answers either a bare list or `{ comments: [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CommentList {
    Bare(Vec<Comment>),
    Wrapped(CommentsResponse),
}

#[async_trait]
impl PollApi for ApiClient {
    async fn candidates(&self) -> ApiResult<Vec<Candidate>> {
        self.get("/candidates").await
    }

    async fn candidate(&self, id: CandidateId) -> ApiResult<Candidate> {
        self.get(&format!("/candidates/{id}")).await
    }

    async fn chhetras(&self) -> ApiResult<Vec<Chhetra>> {
        self.get("/chhetras").await
    }

    async fn chhetra_candidates(&self, id: ChhetraId) -> ApiResult<Vec<Candidate>> {
        self.get(&format!("/chhetras/{id}/candidates")).await
    }

    async fn cast_vote(&self, req: &VoteRequest) -> ApiResult<VoteCounts> {
        self.post("/votes", req).await
    }

    async fn vote_status(
        &self,
        candidate_id: CandidateId,
        fingerprint: &str,
    ) -> ApiResult<VoteStatus> {
        let builder = self.request(Method::GET, "/votes").query(&[
            ("candidateId", candidate_id.to_string()),
            ("fingerprint", fingerprint.to_string()),
        ]);
        self.fetch(builder).await
    }

    async fn vote_stats(&self) -> ApiResult<VoteTotals> {
        let res: VoteStatsResponse = self.get("/api/votes/stats").await?;
        Ok(res.totals)
    }

    async fn post_comment(&self, req: &CommentRequest) -> ApiResult<CommentsResponse> {
        self.post("/comments", req).await
    }

    async fn comments(
        &self,
        candidate_id: CandidateId,
        fingerprint: Option<&str>,
    ) -> ApiResult<Vec<Comment>> {
        let mut query = vec![("candidateId", candidate_id.to_string())];
        if let Some(fp) = fingerprint {
            query.push(("fingerprint", fp.to_string()));
        }
        let builder = self.request(Method::GET, "/comments").query(&query);
        let list: CommentList = self.fetch(builder).await?;
        Ok(match list {
            CommentList::Bare(comments) => comments,
            CommentList::Wrapped(res) => res.comments,
        })
    }

    async fn like_comment(&self, comment_id: i64, fingerprint: &str) -> ApiResult<()> {
        let req = LikeRequest {
            fingerprint: fingerprint.to_string(),
        };
        // body is not used, any 2xx counts
        self.send(
            self.request(Method::POST, &format!("/comments/{comment_id}/like"))
                .json(&req),
        )
        .await?;
        Ok(())
    }

    async fn send_contact(&self, req: &ContactRequest) -> ApiResult<ContactAck> {
        let body = self
            .send(self.request(Method::POST, "/contact").json(req))
            .await?;
        match body {
            Body::Json(text) => serde_json::from_str(&text)
                .map(ContactAck::Json)
                .map_err(|e| ApiError::Decode(e.to_string())),
            Body::Text(text) => Ok(ContactAck::Text(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiClient;

    #[test]
    fn normalizes_base_and_endpoint_slashes() {
        let client = ApiClient::new("http://localhost:5000///");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("votes"), "http://localhost:5000/votes");
        assert_eq!(client.url("/votes"), "http://localhost:5000/votes");
    }
}
