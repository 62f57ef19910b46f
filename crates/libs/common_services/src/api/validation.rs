use validator::ValidationErrors;

/// Picks a single `(field, reason)` pair out of a `validator` report.
///
/// Fields are visited in name order so the reported field is stable.
#[must_use]
pub fn first_violation(errors: &ValidationErrors) -> (String, String) {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .find_map(|(field, errors)| {
            errors.first().map(|error| {
                let reason = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                (field.to_string(), reason)
            })
        })
        .unwrap_or_else(|| ("body".to_owned(), "invalid request body".to_owned()))
}

/// Rejects latitudes outside [-90, 90].
pub fn check_latitude(field: &str, value: f64) -> Result<(), (String, String)> {
    if value.is_finite() && (-90.0..=90.0).contains(&value) {
        Ok(())
    } else {
        Err((field.to_owned(), "latitude must be between -90 and 90".to_owned()))
    }
}

/// Rejects longitudes outside [-180, 180].
pub fn check_longitude(field: &str, value: f64) -> Result<(), (String, String)> {
    if value.is_finite() && (-180.0..=180.0).contains(&value) {
        Ok(())
    } else {
        Err((field.to_owned(), "longitude must be between -180 and 180".to_owned()))
    }
}
