use thirtyfour::{
    error::WebDriverResult, ChromeCapabilities, ChromiumLikeCapabilities, DesiredCapabilities,
    WebDriver,
};

// Stability flags for an operator-watched session; verbose Chrome logging
// is suppressed so the console stays readable.
const CHROME_ARGS: [&str; 6] = [
    "--disable-gpu",
    "--disable-features=TranslateUI",
    "--disable-extensions",
    "--disable-notifications",
    "--log-level=3",
    "--silent",
];

pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn start(webdriver_url: &str) -> WebDriverResult<Self> {
        let caps = build_capabilities()?;

        let driver = WebDriver::new(webdriver_url, caps).await?;
        driver.maximize_window().await?;

        Ok(Droid { driver })
    }

    pub async fn quit(self) -> WebDriverResult<()> {
        self.driver.quit().await
    }
}

fn build_capabilities() -> WebDriverResult<ChromeCapabilities> {
    let mut caps = DesiredCapabilities::chrome();
    for arg in CHROME_ARGS {
        caps.add_arg(arg)?;
    }
    caps.add_experimental_option("excludeSwitches", ["enable-logging"])?;

    Ok(caps)
}
