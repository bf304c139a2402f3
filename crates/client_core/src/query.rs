use shared::domain::FilterContext;

/// Query parameters sent with every report request.
///
/// At most one range pair is emitted: the date range wins, then the month
/// range. Selectors follow in a fixed order.
pub fn query_params(filters: &FilterContext) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(range) = &filters.date_range {
        params.push(("start_date", range.start.format("%Y-%m-%d").to_string()));
        params.push(("end_date", range.end.format("%Y-%m-%d").to_string()));
    } else if let Some(range) = &filters.month_range {
        params.push(("start_month", range.start.to_string()));
        params.push(("end_month", range.end.to_string()));
    }
    for (name, value) in [
        ("practitioner", &filters.practitioner),
        ("program", &filters.program),
        ("location", &filters.location),
    ] {
        if let Some(value) = value {
            params.push((name, value.clone()));
        }
    }
    params
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
