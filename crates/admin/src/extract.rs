//! Extractors whose rejections render as JSON [`AppError`]s.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `Json<T>` with a 400 `{error}` body on malformed input.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Query<T>` with a 400 `{error}` body on unparseable parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// `Path<T>` with a 400 `{error}` body on a non-numeric id.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Parse an optional filter value. Blank values mean "no filter".
///
/// # Errors
///
/// Returns `BadRequest` naming the parameter when the value does not parse.
pub fn parse_filter<T>(name: &str, raw: Option<&str>) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("invalid {name}: {value}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use storedash_core::{OrderStatus, StoreId};

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter::<OrderStatus>("status", Some("shipped")).unwrap(),
            Some(OrderStatus::Shipped)
        );
        assert_eq!(parse_filter::<OrderStatus>("status", Some("  ")).unwrap(), None);
        assert_eq!(parse_filter::<StoreId>("storeId", None).unwrap(), None);

        let err = parse_filter::<StoreId>("storeId", Some("abc")).unwrap_err();
        assert_eq!(err.to_string(), "invalid storeId: abc");
    }
}
