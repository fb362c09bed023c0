//! HTTP client for the judge backend.

mod err;
pub mod model;

pub use self::err::*;
use self::model::*;
use crate::{config::PortalConfig, verdict::VerdictSource};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

pub const GET_SUBMISSIONS: &str = "/getSubmissions";
pub const GET_USER_DATA: &str = "/getUserData";
pub const UPDATE_USER_DATA: &str = "/updateUserData";
pub const GET_VERDICT: &str = "/getVerdict";

#[derive(Debug, Clone)]
pub struct PortalClient {
    client: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    pub fn new(cfg: &PortalConfig) -> Result<PortalClient, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .build()?;
        Ok(PortalClient {
            client,
            base_url: cfg.base_url(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post<Req, Res>(&self, path: &str, body: &Req) -> Result<Res, ApiError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let endpoint = self.endpoint(path);
        tracing::debug!("POST {}", endpoint);

        let res = self.client.post(&endpoint).json(body).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Status(status, body));
        }

        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get_verdict(&self, submission_id: &str) -> Result<VerdictResponse, ApiError> {
        self.post(
            GET_VERDICT,
            &VerdictRequest {
                token: submission_id.to_owned(),
            },
        )
        .await
    }

    pub async fn get_submissions(
        &self,
        req: &SubmissionsRequest,
    ) -> Result<SubmissionsResponse, ApiError> {
        self.post(GET_SUBMISSIONS, req).await
    }

    pub async fn get_user_data(&self, uid: &str) -> Result<UserDataResponse, ApiError> {
        self.post(
            GET_USER_DATA,
            &UserDataRequest {
                uid: uid.to_owned(),
            },
        )
        .await
    }

    pub async fn update_user_data(
        &self,
        req: &UpdateUserDataRequest,
    ) -> Result<UpdateUserDataResponse, ApiError> {
        self.post(UPDATE_USER_DATA, req).await
    }
}

#[async_trait]
impl VerdictSource for PortalClient {
    async fn fetch_verdict(&self, submission_id: &str) -> Result<VerdictResponse, ApiError> {
        self.get_verdict(submission_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_prefix_and_path() {
        let cfg = PortalConfig {
            host: "judge.example.org:8080".into(),
            api_prefix: "/api/".into(),
            ..Default::default()
        };
        let client = PortalClient::new(&cfg).unwrap();
        assert_eq!(
            client.endpoint(GET_VERDICT),
            "http://judge.example.org:8080/api/getVerdict"
        );

        let client = PortalClient::new(&PortalConfig::default()).unwrap();
        assert_eq!(
            client.endpoint(UPDATE_USER_DATA),
            "http://localhost:5001/updateUserData"
        );
    }
}
