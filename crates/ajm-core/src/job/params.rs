//! Request parameters for a job.

use serde_json::{Map, Value};

use crate::partition::DateWindow;

/// Request parameters sent with a submission (a JSON object).
pub type JobParams = Map<String, Value>;

/// Key under which the window is merged into the template.
pub const TIME_RANGE_KEY: &str = "time_range";

/// Template parameters plus `time_range: {since, until}` for `window`.
/// The window always wins over a `time_range` already in the template.
pub fn merge_params(template: &JobParams, window: &DateWindow) -> JobParams {
    let mut params = template.clone();
    params.insert(
        TIME_RANGE_KEY.to_string(),
        Value::Object(window_to_map(window)),
    );
    params
}

fn window_to_map(window: &DateWindow) -> Map<String, Value> {
    let mut range = Map::new();
    range.insert(
        "since".to_string(),
        Value::String(window.since.format("%Y-%m-%d").to_string()),
    );
    range.insert(
        "until".to_string(),
        Value::String(window.until.format("%Y-%m-%d").to_string()),
    );
    range
}
