//! Developer commands: `classify` and `log`

use crate::errors::EXIT_SUCCESS;
use crate::output;
use anyhow::Result;
use dpw_common::remote_log::{LogLevel, LogPayload};
use dpw_common::{classify as classify_failure, AppContext, Failure};
use serde_json::{Map, Value};

/// Classify `message` as if an operation had failed with that text.
///
/// The text is wrapped as an error value so the rule table applies.
pub fn classify(message: &str) -> Result<i32> {
    let failure = Failure::from(anyhow::anyhow!(message.to_string()));
    output::print_classification(&classify_failure(&failure));
    Ok(EXIT_SUCCESS)
}

/// Send one event to the log sink and wait for delivery.
pub async fn log(ctx: &AppContext, message: String, level: LogLevel, category: String) -> Result<i32> {
    let mut data = Map::new();
    data.insert("source".into(), Value::String("dpwctl log".into()));

    ctx.remote_log
        .log(LogPayload {
            level,
            message,
            category,
            data: Some(data),
        })
        .await;

    println!("Sent to {}", ctx.remote_log.endpoint());
    println!("Session: {}", ctx.remote_log.session_id());
    Ok(EXIT_SUCCESS)
}
