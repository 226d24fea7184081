//! `dpwctl whoami`

use crate::errors::{EXIT_NOT_AUTHENTICATED, EXIT_SUCCESS};
use crate::output;
use anyhow::Result;
use dpw_common::auth::ACCOUNT_ENV;
use dpw_common::AppContext;

pub async fn whoami(ctx: &AppContext) -> Result<i32> {
    match ctx.profiles.fetch(ctx.identity.as_ref()).await {
        Some(profile) => {
            output::print_profile(&profile);
            Ok(EXIT_SUCCESS)
        }
        None => {
            println!("Authentication Required");
            println!("Please sign in to access the Demand Planning Web application.");
            println!("(complete sign-in and export {})", ACCOUNT_ENV);
            Ok(EXIT_NOT_AUTHENTICATED)
        }
    }
}
