// crates.io
use oauth2::{
	HttpRequest,
	http::{Method, Request},
};
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::ConfigError};

const CONTENT_TYPE: &str = "content-type";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP methods used for token and API requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// `GET`.
	Get,
	/// `POST`.
	#[default]
	Post,
	/// `PUT`.
	Put,
	/// `PATCH`.
	Patch,
	/// `DELETE`.
	Delete,
}
impl HttpMethod {
	/// Returns the method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}

	/// Returns `true` for methods whose parameters travel in the request body.
	pub const fn carries_body(self) -> bool {
		matches!(self, Self::Post | Self::Put | Self::Patch)
	}

	fn to_http(self) -> Method {
		match self {
			Self::Get => Method::GET,
			Self::Post => Method::POST,
			Self::Put => Method::PUT,
			Self::Patch => Method::PATCH,
			Self::Delete => Method::DELETE,
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Payload of an [`OutboundRequest`].
#[derive(Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// Form-encoded parameters.
	Form(Vec<(String, String)>),
	/// Raw body sent as-is.
	Raw(String),
}
impl Debug for RequestBody {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Empty => f.write_str("Empty"),
			Self::Form(pairs) => f
				.debug_tuple("Form")
				.field(&pairs.iter().map(|(key, _)| key.as_str()).collect::<Vec<_>>())
				.finish(),
			Self::Raw(raw) => f.debug_tuple("Raw").field(&raw.len()).finish(),
		}
	}
}

/// Transport-agnostic description of a request before it is handed to a [`TransportClient`].
///
/// Header names are stored lowercase so later writers replace earlier ones.
///
/// [`TransportClient`]: crate::http::TransportClient
#[derive(Clone, PartialEq, Eq)]
pub struct OutboundRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Target URL, including any query parameters.
	pub url: Url,
	/// Lowercase header names mapped to values.
	pub headers: BTreeMap<String, String>,
	/// Request payload.
	pub body: RequestBody,
}
impl OutboundRequest {
	/// Creates an empty request.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, headers: BTreeMap::new(), body: RequestBody::Empty }
	}

	/// Sets a header, replacing any previous value regardless of name casing.
	pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
		self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());
	}

	/// Returns a header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Appends a query parameter to the URL.
	pub fn push_query(&mut self, key: &str, value: &str) {
		self.url.query_pairs_mut().append_pair(key, value);
	}

	/// Appends a request parameter.
	///
	/// Body-carrying methods put parameters in a form body unless a raw body is set; every
	/// other request puts them in the query string.
	pub fn push_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let (key, value) = (key.into(), value.into());

		if self.method.carries_body() {
			match &mut self.body {
				RequestBody::Form(pairs) => {
					pairs.push((key, value));

					return;
				},
				RequestBody::Empty => {
					self.body = RequestBody::Form(vec![(key, value)]);

					return;
				},
				RequestBody::Raw(_) => {},
			}
		}

		self.push_query(&key, &value);
	}

	/// Looks up a parameter in the form body first, then in the query string.
	pub fn param(&self, key: &str) -> Option<String> {
		let from_form = match &self.body {
			RequestBody::Form(pairs) =>
				pairs.iter().find(|(name, _)| name == key).map(|(_, value)| value.clone()),
			_ => None,
		};

		from_form.or_else(|| {
			self.url
				.query_pairs()
				.find(|(name, _)| name == key)
				.map(|(_, value)| value.into_owned())
		})
	}

	/// Converts the request into an [`HttpRequest`] understood by transport handles.
	pub fn into_http_request(self) -> Result<HttpRequest, ConfigError> {
		let Self { method, mut url, mut headers, body } = self;
		let payload = match body {
			RequestBody::Empty => Vec::new(),
			RequestBody::Form(pairs) if method.carries_body() => {
				headers.entry(CONTENT_TYPE.into()).or_insert_with(|| FORM_CONTENT_TYPE.into());

				form_urlencoded::Serializer::new(String::new())
					.extend_pairs(pairs)
					.finish()
					.into_bytes()
			},
			RequestBody::Form(pairs) => {
				url.query_pairs_mut().extend_pairs(pairs);

				Vec::new()
			},
			RequestBody::Raw(raw) => raw.into_bytes(),
		};
		let mut builder = Request::builder().method(method.to_http()).uri(url.as_str());

		for (name, value) in &headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		Ok(builder.body(payload)?)
	}
}
impl Debug for OutboundRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OutboundRequest")
			.field("method", &self.method)
			.field(
				"url",
				&format_args!("{}{}", self.url.origin().ascii_serialization(), self.url.path()),
			)
			.field("headers", &self.headers.keys().collect::<Vec<_>>())
			.field("body", &self.body)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url() -> Url {
		Url::parse("https://provider.example.com/token").expect("Fixture URL should parse.")
	}

	#[test]
	fn params_follow_the_method() {
		let mut post = OutboundRequest::new(HttpMethod::Post, url());

		post.push_param("code", "abc");
		post.push_param("grant_type", "authorization_code");

		assert_eq!(
			post.body,
			RequestBody::Form(vec![
				("code".into(), "abc".into()),
				("grant_type".into(), "authorization_code".into()),
			])
		);
		assert_eq!(post.url.query(), None);

		let mut get = OutboundRequest::new(HttpMethod::Get, url());

		get.push_param("code", "abc");

		assert_eq!(get.body, RequestBody::Empty);
		assert_eq!(get.url.query(), Some("code=abc"));
		assert_eq!(get.param("code"), Some("abc".into()));
	}

	#[test]
	fn raw_bodies_push_params_into_the_query() {
		let mut request = OutboundRequest::new(HttpMethod::Post, url());

		request.body = RequestBody::Raw("{\"a\":1}".into());
		request.push_param("access_token", "tok");

		assert_eq!(request.url.query(), Some("access_token=tok"));
	}

	#[test]
	fn headers_are_case_insensitive() {
		let mut request = OutboundRequest::new(HttpMethod::Get, url());

		request.set_header("Authorization", "Bearer a");
		request.set_header("authorization", "Bearer b");

		assert_eq!(request.headers.len(), 1);
		assert_eq!(request.header("AUTHORIZATION"), Some("Bearer b"));
	}

	#[test]
	fn form_requests_convert_to_http() {
		let mut request = OutboundRequest::new(HttpMethod::Post, url());

		request.push_param("redirect_uri", "https://app.example.com/cb?x=1");
		request.set_header("Accept", "application/json");

		let http = request.into_http_request().expect("Request should convert.");

		assert_eq!(http.method(), Method::POST);
		assert_eq!(
			http.headers().get("content-type").and_then(|value| value.to_str().ok()),
			Some(FORM_CONTENT_TYPE)
		);
		assert_eq!(
			http.body().as_slice(),
			b"redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb%3Fx%3D1".as_slice()
		);
	}

	#[test]
	fn debug_hides_secrets() {
		let mut request = OutboundRequest::new(HttpMethod::Get, url());

		request.push_param("client_secret", "hunter2");
		request.set_header("Authorization", "Bearer hunter2");

		assert!(!format!("{request:?}").contains("hunter2"));
	}
}
