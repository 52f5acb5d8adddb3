//! Turns provider token responses into [`Token`] values.
//!
//! Bodies are decoded as a JSON object first and fall back to form encoding only when JSON
//! yields no object. Error aliases are checked before anything else, so a body that carries
//! both an error and an access token is reported as an error.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{EndOfLife, Token},
	error::{ResponseParseError, TransportError},
	provider::ResponseNormalization,
};

const ACCESS_TOKEN: &str = "access_token";
const REFRESH_TOKEN: &str = "refresh_token";
const PREVIEW_CHARS: usize = 64;

/// Decodes a token endpoint body into a field mapping.
///
/// A JSON document must be a single object with nothing but whitespace after it.
pub fn decode_body(body: &str) -> Result<JsonMap<String, JsonValue>, ResponseParseError> {
	let mut de = serde_json::Deserializer::from_str(body);
	let json_error = match JsonValue::deserialize(&mut de).and_then(|value| de.end().map(|_| value))
	{
		Ok(JsonValue::Object(map)) => return Ok(map),
		Ok(_) => None,
		Err(e) => Some(e),
	};

	decode_form(body).ok_or_else(|| ResponseParseError::Undecodable {
		body_preview: preview(body),
		source: json_error,
	})
}

/// Turns a raw response body into text, rejecting anything that is not valid UTF-8.
pub fn decode_utf8(body: Vec<u8>) -> Result<String, ResponseParseError> {
	String::from_utf8(body).map_err(|e| ResponseParseError::Undecodable {
		body_preview: preview(&String::from_utf8_lossy(e.as_bytes())),
		source: None,
	})
}

fn preview(body: &str) -> String {
	body.chars().take(PREVIEW_CHARS).collect()
}

// Every `&`-separated segment must be `key=value` with a non-empty key.
fn decode_form(body: &str) -> Option<JsonMap<String, JsonValue>> {
	let body = body.trim();

	if body.is_empty() || body.contains(char::is_whitespace) {
		return None;
	}
	if !body.split('&').all(|pair| matches!(pair.split_once('='), Some((key, _)) if !key.is_empty()))
	{
		return None;
	}

	Some(
		form_urlencoded::parse(body.as_bytes())
			.map(|(key, value)| (key.into_owned(), JsonValue::String(value.into_owned())))
			.collect(),
	)
}

/// Returns the provider error carried by `fields`, if any.
///
/// Aliases are checked in order and the first present non-null one wins. String values are
/// passed through verbatim; other JSON values are rendered as JSON.
pub fn classify_error(
	fields: &JsonMap<String, JsonValue>,
	normalization: &ResponseNormalization,
) -> Option<String> {
	normalization.error_fields.iter().find_map(|alias| match fields.get(alias)? {
		JsonValue::Null => None,
		JsonValue::String(message) => Some(message.clone()),
		other => Some(other.to_string()),
	})
}

/// Decodes, classifies, and normalizes a successful token endpoint body.
///
/// `issued_at` anchors relative lifetimes, so the same body and instant always produce the
/// same token.
pub fn normalize_response(
	body: &str,
	normalization: &ResponseNormalization,
	issued_at: OffsetDateTime,
) -> Result<Token> {
	let fields = decode_body(body)?;

	if let Some(message) = classify_error(&fields, normalization) {
		return Err(Error::TokenExchange { message, status: None });
	}

	Ok(normalize_fields(fields, normalization, issued_at)?)
}

/// Maps an already decoded, error-free field mapping onto a [`Token`].
pub fn normalize_fields(
	mut fields: JsonMap<String, JsonValue>,
	normalization: &ResponseNormalization,
	issued_at: OffsetDateTime,
) -> Result<Token, ResponseParseError> {
	let access_token = match fields.remove(ACCESS_TOKEN) {
		Some(JsonValue::String(token)) if !token.is_empty() => token,
		None | Some(JsonValue::Null) | Some(JsonValue::String(_)) =>
			return Err(ResponseParseError::MissingAccessToken),
		Some(_) => return Err(invalid(ACCESS_TOKEN, "expected a string")),
	};
	let refresh_token = match fields.remove(REFRESH_TOKEN) {
		Some(JsonValue::String(token)) if !token.is_empty() => Some(token),
		None | Some(JsonValue::Null) | Some(JsonValue::String(_)) => None,
		Some(_) => return Err(invalid(REFRESH_TOKEN, "expected a string")),
	};
	let mut end_of_life = None;

	for alias in &normalization.expiry_fields {
		let Some(value) = fields.remove(alias) else { continue };

		if end_of_life.is_some() || value.is_null() {
			continue;
		}

		let lifetime = lifetime_secs(&value).ok_or_else(|| invalid(alias, "expected seconds"))?;

		end_of_life = Some(
			EndOfLife::from_lifetime(issued_at, lifetime)
				.ok_or_else(|| invalid(alias, "lifetime is negative or out of range"))?,
		);
	}

	let mut builder = Token::builder()
		.access_token(access_token)
		.end_of_life(end_of_life.unwrap_or(normalization.missing_expiry.end_of_life()))
		.extra_params(fields.into_iter().collect());

	if let Some(refresh_token) = refresh_token {
		builder = builder.refresh_token(refresh_token);
	}

	builder.build().map_err(|_| ResponseParseError::MissingAccessToken)
}

/// Reclassifies a non-2xx transport failure whose body names a provider error.
///
/// Any other error is returned unchanged.
pub fn recover_provider_error(error: Error, normalization: &ResponseNormalization) -> Error {
	let Error::Transport(TransportError::Status { status, body, .. }) = &error else {
		return error;
	};
	let Ok(fields) = decode_body(body) else {
		return error;
	};

	match classify_error(&fields, normalization) {
		Some(message) => Error::TokenExchange { message, status: Some(*status) },
		None => error,
	}
}

fn lifetime_secs(value: &JsonValue) -> Option<i64> {
	match value {
		JsonValue::Number(number) => number.as_i64().or_else(|| {
			number.as_f64().filter(|secs| secs.is_finite() && secs.fract() == 0.0).and_then(|secs| {
				(secs >= i64::MIN as f64 && secs <= i64::MAX as f64).then_some(secs as i64)
			})
		}),
		JsonValue::String(raw) => raw.trim().parse().ok(),
		_ => None,
	}
}

fn invalid(field: &str, reason: &'static str) -> ResponseParseError {
	ResponseParseError::InvalidField { field: field.to_owned(), reason }
}
