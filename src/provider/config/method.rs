// self
use crate::{_prelude::*, provider::ServiceConfigError};

/// Closed set of credential injection strategies.
///
/// Header strategies put the access token in an `Authorization` header with a scheme prefix;
/// query strategies append it as a query parameter whose name differs per provider family.
///
/// Serialized by name; deserialization also accepts the numeric codes of older configuration
/// files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MethodRepr", into = "String")]
pub enum AuthorizationMethod {
	/// `Authorization: OAuth <token>`.
	#[default]
	HeaderOauth,
	/// `Authorization: Bearer <token>`.
	HeaderBearer,
	/// `Authorization: token <token>`.
	HeaderToken,
	/// `?access_token=<token>`.
	QueryString,
	/// `?oauth2_access_token=<token>`.
	QueryStringV2,
	/// `?apikey=<token>`.
	QueryStringV3,
	/// `?auth=<token>`.
	QueryStringV4,
	/// `?user_token=<token>`.
	QueryStringV5,
}
impl AuthorizationMethod {
	/// Every strategy, in legacy code order.
	pub const ALL: [Self; 8] = [
		Self::HeaderOauth,
		Self::HeaderBearer,
		Self::QueryString,
		Self::QueryStringV2,
		Self::QueryStringV3,
		Self::QueryStringV4,
		Self::HeaderToken,
		Self::QueryStringV5,
	];

	/// Returns the configuration name of the strategy.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::HeaderOauth => "header_oauth",
			Self::HeaderBearer => "header_bearer",
			Self::HeaderToken => "header_token",
			Self::QueryString => "query_string",
			Self::QueryStringV2 => "query_string_v2",
			Self::QueryStringV3 => "query_string_v3",
			Self::QueryStringV4 => "query_string_v4",
			Self::QueryStringV5 => "query_string_v5",
		}
	}

	/// Returns the numeric code used by older configuration files.
	pub const fn legacy_code(self) -> u8 {
		match self {
			Self::HeaderOauth => 0,
			Self::HeaderBearer => 1,
			Self::QueryString => 2,
			Self::QueryStringV2 => 3,
			Self::QueryStringV3 => 4,
			Self::QueryStringV4 => 5,
			Self::HeaderToken => 6,
			Self::QueryStringV5 => 7,
		}
	}

	/// Describes where the access token is placed on API calls.
	pub const fn placement(self) -> TokenPlacement {
		match self {
			Self::HeaderOauth => TokenPlacement::Header { scheme: "OAuth" },
			Self::HeaderBearer => TokenPlacement::Header { scheme: "Bearer" },
			Self::HeaderToken => TokenPlacement::Header { scheme: "token" },
			Self::QueryString => TokenPlacement::Query { param: "access_token" },
			Self::QueryStringV2 => TokenPlacement::Query { param: "oauth2_access_token" },
			Self::QueryStringV3 => TokenPlacement::Query { param: "apikey" },
			Self::QueryStringV4 => TokenPlacement::Query { param: "auth" },
			Self::QueryStringV5 => TokenPlacement::Query { param: "user_token" },
		}
	}
}
impl Display for AuthorizationMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for AuthorizationMethod {
	type Err = ServiceConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_lowercase();

		Self::ALL
			.into_iter()
			.find(|method| method.as_str() == normalized)
			.ok_or_else(|| ServiceConfigError::UnknownAuthorizationMethod { value: s.to_owned() })
	}
}
impl TryFrom<u8> for AuthorizationMethod {
	type Error = ServiceConfigError;

	fn try_from(code: u8) -> Result<Self, Self::Error> {
		Self::ALL
			.into_iter()
			.find(|method| method.legacy_code() == code)
			.ok_or_else(|| ServiceConfigError::UnknownAuthorizationMethod { value: code.to_string() })
	}
}
impl TryFrom<MethodRepr> for AuthorizationMethod {
	type Error = ServiceConfigError;

	fn try_from(repr: MethodRepr) -> Result<Self, Self::Error> {
		match repr {
			MethodRepr::Name(name) => name.parse(),
			MethodRepr::Code(code) => Self::try_from(code),
		}
	}
}
impl From<AuthorizationMethod> for String {
	fn from(method: AuthorizationMethod) -> Self {
		method.as_str().to_owned()
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MethodRepr {
	Name(String),
	Code(u8),
}

/// Location of an access token on an outgoing API request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenPlacement {
	/// `Authorization: <scheme> <token>`.
	Header {
		/// Scheme prefix placed before the token.
		scheme: &'static str,
	},
	/// Query parameter carrying the token.
	Query {
		/// Parameter name.
		param: &'static str,
	},
}
