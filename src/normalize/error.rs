use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Failed to parse JSON response")]
    Json(#[from] serde_json::Error),

    #[error("Response is missing the sensor list{}", format_messages(.messages))]
    MissingSensors { messages: Vec<String> },
}

fn format_messages(messages: &[String]) -> String {
    if messages.is_empty() {
        String::new()
    } else {
        format!(": {}", messages.join("; "))
    }
}
