use axum::{
  body::Bytes,
  extract::{
    rejection::{BytesRejection, JsonRejection},
    FromRequest, Request,
  },
  http::{header, StatusCode},
  response::{IntoResponse, Response},
  Json,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::{Validate, ValidationErrors};

/// JSON body that has been deserialized and passed its `validator` rules.
///
/// A body sent without a `Content-Type` is still parsed as JSON. Every
/// rejection is a 422 carrying a list of per-field problems.
pub struct ValidatedJson<T>(pub T);

#[derive(Debug, Serialize)]
pub struct ValidationIssue {
  pub loc: Vec<String>,
  pub msg: String,
  #[serde(rename = "type")]
  pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationRejection {
  pub detail: Vec<ValidationIssue>,
}

impl IntoResponse for ValidationRejection {
  fn into_response(self) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response()
  }
}

impl From<JsonRejection> for ValidationRejection {
  fn from(rejection: JsonRejection) -> Self {
    let kind = match &rejection {
      JsonRejection::JsonDataError(_) => "json_data",
      JsonRejection::JsonSyntaxError(_) => "json_invalid",
      JsonRejection::MissingJsonContentType(_) => "content_type",
      _ => "body",
    };

    ValidationRejection {
      detail: vec![ValidationIssue {
        loc: vec!["body".to_string()],
        msg: rejection.body_text(),
        kind: kind.to_string(),
      }],
    }
  }
}

impl From<BytesRejection> for ValidationRejection {
  fn from(rejection: BytesRejection) -> Self {
    ValidationRejection {
      detail: vec![ValidationIssue {
        loc: vec!["body".to_string()],
        msg: rejection.body_text(),
        kind: "body".to_string(),
      }],
    }
  }
}

impl From<ValidationErrors> for ValidationRejection {
  fn from(errors: ValidationErrors) -> Self {
    let mut detail: Vec<ValidationIssue> = errors
      .field_errors()
      .into_iter()
      .flat_map(|(field, field_errors)| {
        field_errors.iter().map(move |error| ValidationIssue {
          loc: vec!["body".to_string(), field.to_string()],
          msg: error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| match error.code.as_ref() {
              "email" => "value is not a valid email address".to_string(),
              "length" => "Invalid length".to_string(),
              "range" => "Value out of range".to_string(),
              _ => format!("Invalid {}", field),
            }),
          kind: error.code.to_string(),
        })
      })
      .collect();

    detail.sort_by(|a, b| a.loc.cmp(&b.loc));
    ValidationRejection { detail }
  }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
  T: DeserializeOwned + Validate + Send,
  S: Send + Sync,
{
  type Rejection = ValidationRejection;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = if req.headers().contains_key(header::CONTENT_TYPE) {
      Json::<T>::from_request(req, state).await?
    } else {
      let bytes = Bytes::from_request(req, state).await?;
      Json::<T>::from_bytes(&bytes)?
    };
    value.validate()?;
    Ok(Self(value))
  }
}
