// Session-presence client for the external authentication provider.
//
// shelfly only ever *reads* session presence; account management lives
// with the provider. Cookie-based: a successful sign-in sets a session
// cookie in the shared jar, and every later call rides on it.
//
//   POST   {base}/session  -> sign in, sets cookie, returns the user
//   GET    {base}/session  -> current user, 401 when signed out
//   DELETE {base}/session  -> sign out

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::Error;
use crate::catalog::parse_error;
use crate::types::{Session, UserProfile};

#[derive(serde::Serialize)]
struct SignInRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Client for the authentication provider's session endpoint.
pub struct SessionClient {
    http: reqwest::Client,
    session_url: Url,
}

impl SessionClient {
    /// Build from the provider base URL and transport config.
    ///
    /// The transport config should carry a cookie jar shared with the
    /// catalog client so the session cookie applies to catalog calls.
    pub fn new(base_url: &str, transport: &crate::TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let mut url = Url::parse(base_url)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/session"));
        Ok(Self {
            http,
            session_url: url,
        })
    }

    /// Sign in with username and password.
    pub async fn sign_in(&self, username: &str, password: &SecretString) -> Result<Session, Error> {
        debug!(%username, "POST {}", self.session_url);

        let body = SignInRequest {
            username,
            password: password.expose_secret(),
        };
        let resp = self
            .http
            .post(self.session_url.clone())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })
        } else if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            Err(Error::Authentication {
                message: "invalid username or password".into(),
            })
        } else {
            Err(parse_error(status, resp).await)
        }
    }

    /// Who is currently signed in, if anyone.
    ///
    /// Returns `Ok(None)` on 401 -- an absent session is an answer,
    /// not an error.
    pub async fn current_user(&self) -> Result<Option<UserProfile>, Error> {
        debug!("GET {}", self.session_url);

        let resp = self.http.get(self.session_url.clone()).send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if status.is_success() {
            let body = resp.text().await?;
            let session: Session =
                serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body,
                })?;
            return Ok(Some(session.user));
        }
        Err(parse_error(status, resp).await)
    }

    /// Drop the current session. Best-effort; a 401 means it was
    /// already gone.
    pub async fn sign_out(&self) -> Result<(), Error> {
        debug!("DELETE {}", self.session_url);

        let resp = self.http.delete(self.session_url.clone()).send().await?;
        let status = resp.status();
        if status.is_success() || status == reqwest::StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(parse_error(status, resp).await)
        }
    }
}
