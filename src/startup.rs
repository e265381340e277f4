use anyhow::Context;

use crate::{
    configuration::Settings,
    services::{checkpoint, maps_scraper, Droid},
};

/*
 1. Start the browser session; failing here is fatal
 2. Run the lead search; a search failure is logged, not fatal
 3. Hold the session open for the operator, then quit on every path
*/
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    println!("Starting business search...");
    let droid = Droid::start(&settings.webdriver.url)
        .await
        .context("Failed to start the browser session")?;
    println!("Browser started successfully");

    if let Err(e) = maps_scraper::find_leads(&droid.driver, &settings.search).await {
        log::error!("Error during search: {:?}", e);
    }

    checkpoint::pause_for_operator("\nSearch complete. Press Enter to close the browser...");

    droid
        .quit()
        .await
        .context("Failed to shut down the browser session")?;

    Ok(())
}
