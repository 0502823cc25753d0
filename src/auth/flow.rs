use tracing::{debug, info};
use url::Url;

use crate::auth::session::Session;
use crate::backend::BackendApi;
use crate::error::{AppError, Result};

/// A consumed login callback: the session it carried, plus the location the
/// boundary must rewrite the visible URL to (same path, query stripped) so
/// the callback cannot be replayed from a refresh or a shared link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    pub session: Session,
    pub clean_location: String,
}

/// Ask the backend for the authorization URL the user must visit. The caller
/// performs the actual navigation; on failure nothing is navigated and the
/// error surfaces as a single message.
pub async fn begin_login(api: &impl BackendApi) -> Result<String> {
    let url = api.login_url().await?;
    info!("login redirect target received");
    Ok(url)
}

/// Inspect a location for OAuth callback parameters.
///
/// Returns `Ok(None)` when no `accessToken` parameter is present — the normal
/// non-callback case, including a second look at an already-stripped URL.
/// Missing optional parameters default to empty strings.
pub fn parse_callback(current_url: &str) -> Result<Option<Callback>> {
    let url = Url::parse(current_url)
        .map_err(|e| AppError::Validation(format!("Invalid redirect URL: {}", e)))?;

    let mut access_token = None;
    let mut refresh_token = String::new();
    let mut user_id = String::new();
    let mut display_name = String::new();

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "accessToken" => access_token = Some(value.into_owned()),
            "refreshToken" => refresh_token = value.into_owned(),
            "userId" => user_id = value.into_owned(),
            "displayName" => display_name = value.into_owned(),
            _ => {}
        }
    }

    let Some(access_token) = access_token else {
        debug!("no login callback parameters in URL");
        return Ok(None);
    };

    let mut clean = url;
    clean.set_query(None);
    clean.set_fragment(None);

    info!("login callback consumed for user {}", user_id);

    Ok(Some(Callback {
        session: Session {
            access_token,
            refresh_token,
            user_id,
            display_name,
        },
        clean_location: clean.to_string(),
    }))
}
