//! Builds the two GraphQL queries the pipeline sends: the sensor search and the per-sensor
//! hourly volume query. Both are pure functions of their inputs.

use crate::query::request::GraphQlRequest;
use crate::types::filter::SearchFilter;
use crate::types::window::TimeWindow;
use crate::utils::format_service_time;
use std::fmt::Display;

const SENSOR_FIELDS: &str = "id name location {coordinates {latLon {lat lon}}}";
const EDGE_FIELDS: &str =
    "edges {node {from to total {volumeNumbers {volume} coverage {percentage}}}}";

/// Builds the sensor search query. Unset filter keys produce no clause at all.
///
/// # Examples
///
/// ```
/// use trafikkdata::{build_search_query, SearchFilter};
///
/// let request = build_search_query(&SearchFilter::builder().is_operational(true).build());
/// assert!(request.query.contains("searchQuery: {isOperational: true}"));
/// ```
pub fn build_search_query(filter: &SearchFilter) -> GraphQlRequest {
    let mut clauses = Vec::new();
    if let Some(categories) = &filter.road_categories {
        clauses.push(format!("roadCategoryIds: {}", list(categories)));
    }
    if let Some(counties) = &filter.county_numbers {
        clauses.push(format!("countyNumbers: {}", list(counties)));
    }
    if let Some(is_operational) = filter.is_operational {
        clauses.push(format!("isOperational: {}", is_operational));
    }
    if let Some(traffic_type) = filter.traffic_type {
        clauses.push(format!("trafficType: {}", traffic_type.code()));
    }
    if let Some(frequency) = filter.registration_frequency {
        clauses.push(format!("registrationFrequency: {}", frequency.code()));
    }

    GraphQlRequest::new(format!(
        "{{trafficRegistrationPoints(searchQuery: {{{}}}) {{{}}}}}",
        clauses.join(", "),
        SENSOR_FIELDS
    ))
}

/// Builds the query for every hourly edge of one sensor within `window`.
pub fn build_volume_query(sensor_id: &str, window: &TimeWindow) -> GraphQlRequest {
    GraphQlRequest::new(format!(
        "{{trafficData(trafficRegistrationPointId: {}) {{volume {{byHour(from: {}, to: {}) {{{}}}}}}}}}",
        string_literal(sensor_id),
        string_literal(&format_service_time(&window.start)),
        string_literal(&format_service_time(&window.stop)),
        EDGE_FIELDS
    ))
}

/// GraphQL string literals share JSON's escaping rules.
fn string_literal(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

fn list<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    let items: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    format!("[{}]", items.join(", "))
}
