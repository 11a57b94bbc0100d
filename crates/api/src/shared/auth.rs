use crate::error::NotifierError;
use actix_web::HttpRequest;
use salon_notifier_infra::NotifierContext;
use salon_notifier_utils::secrets_match;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const WEBHOOK_KEY_HEADER: &str = "x-webhook-key";

fn header_value<'a>(http_req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    http_req
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}

/// Only the booking application and the operators know the api key
pub fn protect_route(http_req: &HttpRequest, ctx: &NotifierContext) -> Result<(), NotifierError> {
    match header_value(http_req, API_KEY_HEADER) {
        Some(key) if secrets_match(&ctx.config.api_key, key) => Ok(()),
        Some(_) => Err(NotifierError::Unauthorized(format!(
            "Invalid api key provided in the `{}` header",
            API_KEY_HEADER
        ))),
        None => Err(NotifierError::Unauthorized(format!(
            "Missing the `{}` header",
            API_KEY_HEADER
        ))),
    }
}

/// The email webhook is open unless a webhook key is configured
pub fn protect_webhook_route(
    http_req: &HttpRequest,
    ctx: &NotifierContext,
) -> Result<(), NotifierError> {
    let expected = match &ctx.config.email_webhook_key {
        Some(key) => key,
        None => return Ok(()),
    };
    match header_value(http_req, WEBHOOK_KEY_HEADER) {
        Some(key) if secrets_match(expected, key) => Ok(()),
        _ => Err(NotifierError::Unauthorized(format!(
            "Missing or invalid `{}` header",
            WEBHOOK_KEY_HEADER
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn checks_the_api_key() {
        let mut ctx = NotifierContext::create_inmemory();
        ctx.config.api_key = "secret".into();

        let req = TestRequest::default()
            .insert_header((API_KEY_HEADER, "secret"))
            .to_http_request();
        assert!(protect_route(&req, &ctx).is_ok());

        let req = TestRequest::default()
            .insert_header((API_KEY_HEADER, "guess"))
            .to_http_request();
        assert!(protect_route(&req, &ctx).is_err());
        assert!(protect_route(&TestRequest::default().to_http_request(), &ctx).is_err());
    }

    #[test]
    fn webhook_key_is_optional() {
        let mut ctx = NotifierContext::create_inmemory();
        ctx.config.email_webhook_key = None;
        let req = TestRequest::default().to_http_request();
        assert!(protect_webhook_route(&req, &ctx).is_ok());

        ctx.config.email_webhook_key = Some("hook".into());
        assert!(protect_webhook_route(&req, &ctx).is_err());
        let req = TestRequest::default()
            .insert_header((WEBHOOK_KEY_HEADER, "hook"))
            .to_http_request();
        assert!(protect_webhook_route(&req, &ctx).is_ok());
    }
}
