use std::convert::Infallible;

use axum::{RequestPartsExt, extract::FromRequestParts};
use axum_extra::{TypedHeader, headers};
use http::request::Parts;
use login_context::SessionCookieJar;

/// The session cookie of the request, as an Axum extractor
///
/// A missing or malformed cookie yields an empty jar: the steps then treat
/// the user as unknown instead of rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct SessionCookies(pub SessionCookieJar);

impl<S> FromRequestParts<S> for SessionCookies
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let jar = match parts.extract::<TypedHeader<headers::Cookie>>().await {
            Ok(TypedHeader(cookies)) => SessionCookieJar::from_cookies(&cookies),
            Err(_) => {
                tracing::debug!("No cookies in request");
                SessionCookieJar::default()
            }
        };
        Ok(Self(jar))
    }
}
