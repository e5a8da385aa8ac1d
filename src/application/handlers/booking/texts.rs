//! User-facing reply texts.

use crate::domain::booking::PriceRange;
use crate::domain::search::trim_float;

pub const START: &str = "Hi! I look for hotels on hotels.com.\n\n\
/lowprice - cheapest hotels first\n\
/highprice - most expensive hotels first\n\
/bestdeal - best price close to the centre\n\
/history - your previous searches\n\
/help - what I can do";

pub const HELP: &str = "Pick a search with /lowprice, /highprice or /bestdeal. \
I will ask for the city, the number of hotels, the dates and who is coming. \
Every answer can be changed later with the buttons under the summary.\n\n\
/history lists your previous searches.";

pub const UNKNOWN_COMMAND: &str = "I don't know that command. Try /help.";

pub const ASK_DESTINATION: &str = "Which city are we going to?";
pub const CHOOSE_DESTINATION: &str = "Please specify the location:";
pub const DESTINATION_NOT_FOUND: &str =
    "I couldn't find that place. Check the spelling and send the city again.";
pub const FINISH_DESTINATION_FIRST: &str = "Pick a location from the list first.";

pub const ASK_HOTEL_COUNT: &str = "How many hotels should I show?";
pub const ASK_CHECK_IN: &str = "Select the check-in date:";
pub const ASK_CHECK_OUT: &str = "Select the check-out date:";
pub const ASK_CHILDREN: &str = "Any children in this room?";

pub const ASK_PRICE_RANGE: &str =
    "Send the price range per night as two numbers, e.g. 50 150";
pub const ASK_MAX_DISTANCE: &str =
    "Send the maximum distance to the city centre in km, e.g. 2.5";
pub const WRONG_FORMAT: &str = "Wrong format, please try again.";

pub const ASK_PHOTOS: &str = "Show hotel photos?";
pub const ASK_PHOTO_COUNT: &str = "How many photos per hotel?";
pub const SEARCHING: &str = "Searching...";

pub const NOTHING_FOUND: &str = "Nothing found for these criteria.";
pub const SEARCH_UNAVAILABLE: &str =
    "The hotel service is unavailable right now. Please start the search again later.";
pub const PHOTOS_UNAVAILABLE: &str = "Photos unavailable";

pub const HISTORY_EMPTY: &str = "Your search history is empty.";
pub const HISTORY_UNAVAILABLE: &str = "History is unavailable right now.";

pub const OUTDATED: &str = "This button is outdated.";

pub fn ask_adults(room: usize) -> String {
    format!("Room {}: how many adults?", room + 1)
}

pub fn ask_child_age(room: usize, child: u8) -> String {
    format!("Room {}: age of child {}?", room + 1, child)
}

pub fn price_range_set(range: PriceRange, currency: &str) -> String {
    format!(
        "Price per night: {} - {} {}",
        trim_float(range.min()),
        trim_float(range.max()),
        currency
    )
}

pub fn max_distance_set(distance: f64) -> String {
    format!("Maximum distance to the centre: {} km", trim_float(distance))
}

pub fn closest_distance(distance: f64) -> String {
    format!(
        "The closest hotel is {} km from the centre. Try a larger distance.",
        trim_float(distance)
    )
}

pub fn found_only(shown: usize) -> String {
    format!("Found only {} hotel(s).", shown)
}

/// Summary text with a question underneath, used when a control is shown on
/// a live summary message.
pub fn over_summary(summary: &str, question: &str) -> String {
    if summary.is_empty() {
        question.to_string()
    } else {
        format!("{}\n\n{}", summary, question)
    }
}
