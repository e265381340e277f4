use std::fmt;
use std::time::Duration;

use thirtyfour::{
    error::{WebDriverError, WebDriverResult},
    By, Key, WebDriver, WebElement,
};
use tokio::time::sleep;

use crate::{
    configuration::SearchSettings,
    domain::{
        review,
        run::{RunState, ScrollAction},
    },
    services::checkpoint,
};

const MAPS_URL: &str = "https://www.google.com/maps";
const SEARCH_BOX_ID: &str = "searchboxinput";

// Result feed selectors, current as of the map service's rendered markup
const RESULT_CONTAINER: &str = "div.Nv2PK";
const RESULT_NAME: &str = "div.qBF1Pd";
const WEBSITE_LINK: &str = "a.lcr4fd.S9kvJb";
const DETAILS_LINK: &str = "a.hfpxzc";
const REVIEWS_TAB: &str = "button[aria-label*=\"Reviews\"]";
const RATING_NUMERAL: &str = "div.fontDisplayLarge";
const REVIEW_DATE_LABEL: &str = "span.rsqaWe";
const RESULTS_FEED: &str = "div.m6QErb";

// Fixed settle durations; the map service renders asynchronously and offers
// no completion signal we can subscribe to from here.
const NAV_SETTLE: Duration = Duration::from_secs(3);
const SEARCH_BOX_SETTLE: Duration = Duration::from_secs(1);
const RESULTS_SETTLE: Duration = Duration::from_secs(7);
const DETAILS_SETTLE: Duration = Duration::from_secs(3);
const REVIEWS_SETTLE: Duration = Duration::from_secs(2);
const HIGHLIGHT_SETTLE: Duration = Duration::from_secs(1);
const SCROLL_SETTLE: Duration = Duration::from_secs(3);

// Displayed in stall warnings only; the scroll-attempt budget is what
// actually ends the loop
const NOMINAL_STALL_ATTEMPTS: u32 = 5;
const OVERSIZED_SCROLL_PX: u32 = 1000;

const HIGHLIGHT_SCRIPT: &str = "\
    arguments[0].style.backgroundColor = '#ffeb3b';\
    arguments[0].style.border = '4px solid #f44336';\
    arguments[0].style.padding = '10px';\
    arguments[0].style.boxShadow = '0 0 10px rgba(0,0,0,0.5)';\
    arguments[0].scrollIntoView({behavior: 'smooth', block: 'center'});";

#[derive(Debug)]
pub enum EntryEvaluation {
    Qualified {
        name: String,
        rating: f64,
        latest_review: String,
    },
    Rejected(RejectReason),
    Skipped(SkipCause),
}

#[derive(Debug, PartialEq)]
pub enum RejectReason {
    EmptyName,
    AlreadyProcessed,
    HasWebsite,
    LowRating(f64),
    NoRecentReviews,
}

#[derive(Debug)]
pub enum SkipCause {
    NameUnreadable(WebDriverError),
    WebsiteCheckFailed(WebDriverError),
    DetailsUnavailable(WebDriverError),
    ReviewsUnavailable(WebDriverError),
    RatingUnreadable(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::EmptyName => write!(f, "Empty name"),
            RejectReason::AlreadyProcessed => write!(f, "Already checked"),
            RejectReason::HasWebsite => write!(f, "Has website"),
            RejectReason::LowRating(rating) => write!(f, "Rating too low ({})", rating),
            RejectReason::NoRecentReviews => write!(f, "No recent reviews"),
        }
    }
}

/*
 The whole search, front to back:
 1. Submit the query on the map service
 2. Scan rendered result containers, claiming each name before evaluating it
 3. Qualify entries with no website link, rating >= 3.0 and a recent review
 4. Scroll the feed for more results until the target or the scroll budget
    is hit, forcing an oversized jump when the feed stalls
 Any failure before the scan loop aborts the run; failures inside it are
 logged and skipped.
*/
pub async fn find_leads(driver: &WebDriver, settings: &SearchSettings) -> WebDriverResult<RunState> {
    let mut state = RunState::new(settings.target_count, settings.max_scroll_attempts);

    log::info!("Navigating to {}", MAPS_URL);
    driver.goto(MAPS_URL).await?;
    sleep(NAV_SETTLE).await;

    println!("Searching for businesses in {}...", settings.location);
    submit_search(driver, &settings.query).await?;

    println!(
        "\nSearching for {} unique businesses without websites...",
        state.target_count
    );
    println!("(This may take a few minutes as we check each business)\n");
    sleep(RESULTS_SETTLE).await;

    println!("\nScrolling through results to find businesses...");
    while !state.target_reached() && !state.scroll_budget_exhausted() {
        let mut found_new_lead = false;

        match driver.find_all(By::Css(RESULT_CONTAINER)).await {
            Ok(containers) => {
                for container in containers.iter() {
                    if state.target_reached() {
                        break;
                    }

                    match evaluate_entry(driver, container, &mut state).await {
                        EntryEvaluation::Qualified {
                            name,
                            rating,
                            latest_review,
                        } => {
                            state.record_lead(&name);
                            found_new_lead = true;
                            announce_lead(&state, &name, rating, &latest_review);

                            if let Err(e) = highlight_element(driver, container).await {
                                log::error!("Failed to highlight {}: {:?}", name, e);
                            }
                            checkpoint::pause_for_operator(
                                "📝 Take note of this business and press Enter to continue...\n",
                            );
                        }
                        EntryEvaluation::Rejected(_) => {}
                        EntryEvaluation::Skipped(cause) => {
                            log::error!("Entry skipped after failed inspection: {:?}", cause);
                        }
                    }
                }
            }
            Err(e) => {
                log::error!("Error reading result containers: {:?}", e);
                state.note_scroll_attempt();
                continue;
            }
        }

        if !state.target_reached() {
            advance_feed(driver, &mut state, found_new_lead).await;
        }
    }

    print_summary(&state);

    Ok(state)
}

async fn submit_search(driver: &WebDriver, query: &str) -> WebDriverResult<()> {
    let search_box = driver.find(By::Id(SEARCH_BOX_ID)).await?;
    search_box.click().await?;
    sleep(SEARCH_BOX_SETTLE).await;

    search_box.clear().await?;
    search_box.send_keys(query + Key::Enter).await?;
    println!("Search query submitted: '{}'", query);

    Ok(())
}

/*
 One candidate entry, in claim order:
 1. Name is read and claimed before anything can fail, so a broken entry is
    never re-inspected on the next scroll pass
 2. A website link rejects immediately, details are never opened
 3. Otherwise open details, read the rating numeral and scan recency labels
*/
async fn evaluate_entry(
    driver: &WebDriver,
    container: &WebElement,
    state: &mut RunState,
) -> EntryEvaluation {
    let name = match read_entry_name(container).await {
        Ok(name) => name,
        Err(e) => return EntryEvaluation::Skipped(SkipCause::NameUnreadable(e)),
    };

    if name.is_empty() {
        return EntryEvaluation::Rejected(RejectReason::EmptyName);
    }
    if !state.claim(&name) {
        return EntryEvaluation::Rejected(RejectReason::AlreadyProcessed);
    }
    println!(
        "\nChecking business: {} ({} total checked)",
        name,
        state.checked_count()
    );

    match container.find(By::Css(WEBSITE_LINK)).await {
        Ok(_) => {
            println!("Skipping {} - {}", name, RejectReason::HasWebsite);
            return EntryEvaluation::Rejected(RejectReason::HasWebsite);
        }
        // Only a confirmed-absent link means "no website"; any other
        // lookup failure skips the entry instead of inspecting it
        Err(e) if is_missing_element(&e) => {}
        Err(e) => {
            log::error!("Error checking website link for {}: {:?}", name, e);
            return EntryEvaluation::Skipped(SkipCause::WebsiteCheckFailed(e));
        }
    }

    let (rating, latest_recent) = match inspect_reviews(driver, container).await {
        Ok(evidence) => evidence,
        Err(cause) => {
            log::error!("Error checking reviews for {}: {:?}", name, cause);
            return EntryEvaluation::Skipped(cause);
        }
    };

    println!("Found rating: {} ⭐", rating);
    match &latest_recent {
        Some(latest_review) => println!("Found recent review: {}", latest_review),
        None => println!("No recent reviews found - skipping"),
    }

    match latest_recent {
        Some(latest_review) if review::meets_lead_criteria(rating, true) => {
            EntryEvaluation::Qualified {
                name,
                rating,
                latest_review,
            }
        }
        _ => {
            let reason = failed_gate_reason(rating);
            println!("Skipping {} - {}", name, reason);
            EntryEvaluation::Rejected(reason)
        }
    }
}

// When both gates fail the rating is reported first, so the console
// transcript always names the low rating over the missing recent review.
fn failed_gate_reason(rating: f64) -> RejectReason {
    match rating < review::MIN_LEAD_RATING {
        true => RejectReason::LowRating(rating),
        false => RejectReason::NoRecentReviews,
    }
}

fn is_missing_element(error: &WebDriverError) -> bool {
    matches!(error, WebDriverError::NoSuchElement(_))
}

async fn read_entry_name(container: &WebElement) -> WebDriverResult<String> {
    let name_element = container.find(By::Css(RESULT_NAME)).await?;
    let name = name_element.text().await?;

    Ok(name.trim().to_string())
}

// Opens the details pane and reads rating plus the first recent review
// label, if any. Label scanning stops at the first match.
async fn inspect_reviews(
    driver: &WebDriver,
    container: &WebElement,
) -> Result<(f64, Option<String>), SkipCause> {
    let details_link = container
        .find(By::Css(DETAILS_LINK))
        .await
        .map_err(SkipCause::DetailsUnavailable)?;
    script_click(driver, &details_link)
        .await
        .map_err(SkipCause::DetailsUnavailable)?;
    sleep(DETAILS_SETTLE).await;

    let reviews_tab = driver
        .find(By::Css(REVIEWS_TAB))
        .await
        .map_err(SkipCause::ReviewsUnavailable)?;
    script_click(driver, &reviews_tab)
        .await
        .map_err(SkipCause::ReviewsUnavailable)?;
    sleep(REVIEWS_SETTLE).await;

    let rating_element = driver
        .find(By::Css(RATING_NUMERAL))
        .await
        .map_err(|e| SkipCause::RatingUnreadable(e.to_string()))?;
    let rating_text = rating_element
        .text()
        .await
        .map_err(|e| SkipCause::RatingUnreadable(e.to_string()))?;
    let rating = review::parse_rating(&rating_text).ok_or_else(|| {
        SkipCause::RatingUnreadable(format!("could not parse rating '{}'", rating_text.trim()))
    })?;

    let date_labels = driver
        .find_all(By::Css(REVIEW_DATE_LABEL))
        .await
        .map_err(SkipCause::ReviewsUnavailable)?;

    let mut latest_recent = None;
    for label_element in date_labels.iter() {
        let label = match label_element.text().await {
            Ok(text) => text.trim().to_lowercase(),
            Err(e) => return Err(SkipCause::ReviewsUnavailable(e)),
        };
        println!("Found review date: {}", label);

        if review::is_recent_review(&label) {
            println!("Found recent review: {}", label);
            latest_recent = Some(label);
            break;
        }
    }

    Ok((rating, latest_recent))
}

/*
 Scroll step, once per outer iteration:
 1. Read the feed offset and let the run state decide whether this is a
    stall; a stall gets an oversized jump to force new content
 2. Always scroll to the bottom afterwards and settle
 Scroll failures only grow the stall streak, never end the loop.
*/
async fn advance_feed(driver: &WebDriver, state: &mut RunState, found_new_lead: bool) {
    if let Err(e) = feed_scroll(driver, state, found_new_lead).await {
        log::error!("Error scrolling results feed: {:?}", e);
        state.note_scroll_failure();
    }
}

async fn feed_scroll(
    driver: &WebDriver,
    state: &mut RunState,
    found_new_lead: bool,
) -> WebDriverResult<()> {
    let feed = driver.find(By::Css(RESULTS_FEED)).await?;

    let offset = driver
        .execute("return arguments[0].scrollTop;", vec![feed.to_json()?])
        .await?
        .convert::<f64>()?;

    if let ScrollAction::ForcedJump = state.note_feed_offset(offset, found_new_lead) {
        println!(
            "\nTrying to find more results... (Attempt {}/{})",
            state.stall_streak, NOMINAL_STALL_ATTEMPTS
        );
        let jump = format!(
            "arguments[0].scrollTop = arguments[0].scrollHeight + {};",
            OVERSIZED_SCROLL_PX
        );
        driver.execute(jump.as_str(), vec![feed.to_json()?]).await?;
    }

    state.note_scroll_attempt();
    driver
        .execute(
            "arguments[0].scrollTop = arguments[0].scrollHeight;",
            vec![feed.to_json()?],
        )
        .await?;
    println!(
        "\nScrolling for more businesses... (Scroll {}/{})",
        state.scroll_attempts, state.max_scroll_attempts
    );
    sleep(SCROLL_SETTLE).await;

    Ok(())
}

async fn script_click(driver: &WebDriver, element: &WebElement) -> WebDriverResult<()> {
    driver
        .execute("arguments[0].click();", vec![element.to_json()?])
        .await?;

    Ok(())
}

async fn highlight_element(driver: &WebDriver, element: &WebElement) -> WebDriverResult<()> {
    driver
        .execute(HIGHLIGHT_SCRIPT, vec![element.to_json()?])
        .await?;
    sleep(HIGHLIGHT_SETTLE).await;

    Ok(())
}

fn announce_lead(state: &RunState, name: &str, rating: f64, latest_review: &str) {
    println!("\n{}", "=".repeat(50));
    println!(
        "✅ POTENTIAL LEAD FOUND! ({}/{})",
        state.found_count(),
        state.target_count
    );
    println!("Business Name: {}", name);
    println!("Rating: {} ⭐", rating);
    println!("Most Recent Review: {}", latest_review);
    println!("Status: No website, rating ≥ 3.0, has recent reviews");
    println!("{}", "=".repeat(50));
}

fn print_summary(state: &RunState) {
    println!("\n{}", summary_lines(state));
}

fn summary_lines(state: &RunState) -> String {
    match state.target_reached() {
        true => format!(
            "Success! Found {} businesses matching all criteria!\n\
             Checked a total of {} businesses",
            state.found_count(),
            state.checked_count()
        ),
        false => format!(
            "Only found {} of {} matching businesses after checking {} total.\n\
             Try modifying the search query or checking a different area.",
            state.found_count(),
            state.target_count,
            state.checked_count()
        ),
    }
}

#[cfg(test)]
mod tests {
    use thirtyfour::error::{no_such_element, WebDriverError};

    use crate::domain::run::RunState;

    use super::{failed_gate_reason, is_missing_element, summary_lines, RejectReason};

    #[test]
    fn reject_reasons_format_for_the_operator() {
        assert_eq!(RejectReason::HasWebsite.to_string(), "Has website");
        assert_eq!(
            RejectReason::LowRating(2.9).to_string(),
            "Rating too low (2.9)"
        );
        assert_eq!(
            RejectReason::NoRecentReviews.to_string(),
            "No recent reviews"
        );
    }

    #[test]
    fn only_a_confirmed_absent_link_counts_as_no_website() {
        // an absent link lets the inspection proceed
        let absent = no_such_element("no website link".to_string());
        assert!(is_missing_element(&absent));

        // any other lookup failure must not be read as "no website"
        let timeout = WebDriverError::Timeout("element lookup timed out".to_string());
        assert!(!is_missing_element(&timeout));
        let request = WebDriverError::RequestFailed("connection reset".to_string());
        assert!(!is_missing_element(&request));
    }

    #[test]
    fn low_rating_is_reported_before_missing_recent_reviews() {
        // both gates failed: the rating gate names the rejection
        assert_eq!(failed_gate_reason(2.5), RejectReason::LowRating(2.5));
        // rating passed, so only the recency gate is left to blame
        assert_eq!(failed_gate_reason(4.2), RejectReason::NoRecentReviews);
        assert_eq!(failed_gate_reason(3.0), RejectReason::NoRecentReviews);
    }

    #[test]
    fn partial_summary_reports_found_versus_target() {
        let mut state = RunState::new(5, 30);
        for name in ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"] {
            state.claim(name);
        }
        for name in ["A", "B", "C"] {
            state.record_lead(name);
        }

        let summary = summary_lines(&state);
        assert!(summary.contains("Only found 3 of 5 matching businesses after checking 10 total."));
        assert!(summary.contains("Try modifying the search query"));
    }

    #[test]
    fn complete_summary_reports_success() {
        let mut state = RunState::new(2, 30);
        state.claim("Joe's Garage");
        state.record_lead("Joe's Garage");
        state.claim("Keller Auto Care");
        state.record_lead("Keller Auto Care");

        let summary = summary_lines(&state);
        assert!(summary.contains("Success! Found 2 businesses matching all criteria!"));
        assert!(summary.contains("Checked a total of 2 businesses"));
    }
}
