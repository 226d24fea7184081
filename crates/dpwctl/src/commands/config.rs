//! `dpwctl config`

use crate::errors::EXIT_SUCCESS;
use crate::output;
use anyhow::Result;
use dpw_common::AppContext;
use serde_json::json;

pub async fn config(ctx: &AppContext, json: bool) -> Result<i32> {
    if json {
        let doc = json!({
            "source": ctx.loaded.source.to_string(),
            "fallback": ctx.loaded.is_fallback(),
            "fallbackReason": ctx.loaded.fallback_reason,
            "runtime": ctx.config(),
            "settings": ctx.settings,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        output::print_config(&ctx.loaded);
        println!();
        println!("[CLIENT SETTINGS]");
        println!("  Table page size:  {}", ctx.settings.table.page_size);
        println!("  Log level:        {}", ctx.settings.logging.level);
        println!("  Directory API:    {}", ctx.settings.profile.graph_base);
        println!("  Log sink:         {}", ctx.remote_log.endpoint());
    }
    Ok(EXIT_SUCCESS)
}
