use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::SkinsError;

pub(crate) mod skin;

pub(crate) use skin::*;

/// A validated JSON body.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ValidatedJson<T>(pub(crate) T);

impl<T> ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
{
    /// Parse and validate a request body. A missing or blank body reads as `{}`.
    pub(crate) fn from_body(body: Option<&str>) -> Result<Self, SkinsError> {
        let body = body.map(str::trim).filter(|body| !body.is_empty());
        let value: T = serde_json::from_str(body.unwrap_or("{}"))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
