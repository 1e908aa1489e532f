//! Path templates for the case API, relative to the server base URL.

pub const API_ROUTE: &str = "/api";

/// Lists cases (GET) and creates them (POST).
pub const CASE_MAIN: &str = "/api/case";
pub const CASE_SEARCH: &str = "/api/case/_search";
pub const CASE_BULK_UPDATE: &str = "/api/case/_bulk";
pub const CASE_STATS: &str = "/api/case/_stats";

/// A single case (GET, PATCH, DELETE). The id is interpolated as-is.
pub fn case_route(id: &str) -> String {
    format!("{CASE_MAIN}/{id}")
}

pub fn case_links(id: &str) -> String {
    format!("{}/links", case_route(id))
}

pub fn case_merge(id: &str, other: &str) -> String {
    format!("{}/_merge/{other}", case_route(id))
}

/// One page of cases covering the offsets `[start, start + page_size)`.
pub fn case_page(start: i64, page_size: i64) -> String {
    format!("{CASE_MAIN}?range={start}-{}", start + page_size)
}
