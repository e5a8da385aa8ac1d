//! End-to-end conversations through the booking dispatcher.
//!
//! Each test plays a user against in-memory adapters: a recording chat
//! transport, the mock hotel service, an in-memory (or file) session store and
//! an in-memory history log. Buttons are pressed on the messages the bot
//! actually sent, with the keyboards those messages carry.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use hotel_wizard::adapters::{
    FileSessionStore, FixedClock, InMemoryHistoryLog, InMemorySessionStore, MockHotelService,
    RecordingTransport,
};
use hotel_wizard::application::handlers::booking::texts;
use hotel_wizard::application::{BookingDispatcher, SearchOrchestrator};
use hotel_wizard::domain::booking::{BookingSession, PhotoRequest, SearchCommand, Stage};
use hotel_wizard::domain::foundation::{CallbackId, ChatId, MessageId, Timestamp, UserId};
use hotel_wizard::domain::search::{DestinationCandidate, HotelOffer};
use hotel_wizard::ports::{HistoryLog, InboundEvent, SessionStore};

const CHAT: ChatId = ChatId::new(100);
const USER: UserId = UserId::new(42);
const PARIS: &str = "504261";

// =============================================================================
// Test Infrastructure
// =============================================================================

fn noon_june_first() -> Timestamp {
    Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
}

fn offer(id: i64, name: &str, price: Option<f64>, distance: Option<f64>) -> HotelOffer {
    HotelOffer {
        id,
        name: name.to_string(),
        star_rating: Some(3.5),
        address: "1 Rue de Rivoli".to_string(),
        distance_km: distance,
        nightly_price: price,
    }
}

fn paris_hotels() -> MockHotelService {
    MockHotelService::new()
        .with_destination(
            "paris",
            vec![
                DestinationCandidate::new(PARIS, "Paris, France"),
                DestinationCandidate::new("1633", "Paris, Texas"),
            ],
        )
        .with_destination("pari", vec![DestinationCandidate::new(PARIS, "Paris, France")])
}

struct Bot {
    transport: RecordingTransport,
    hotels: MockHotelService,
    store: Arc<dyn SessionStore>,
    history: Arc<InMemoryHistoryLog>,
    dispatcher: BookingDispatcher,
}

impl Bot {
    fn new(hotels: MockHotelService) -> Self {
        Self::with_store(hotels, Arc::new(InMemorySessionStore::new()))
    }

    fn with_store(hotels: MockHotelService, store: Arc<dyn SessionStore>) -> Self {
        let transport = RecordingTransport::new();
        let history = Arc::new(InMemoryHistoryLog::new());
        Self::assemble(transport, hotels, store, history)
    }

    fn assemble(
        transport: RecordingTransport,
        hotels: MockHotelService,
        store: Arc<dyn SessionStore>,
        history: Arc<InMemoryHistoryLog>,
    ) -> Self {
        let clock = Arc::new(FixedClock::new(noon_june_first()));
        let orchestrator = SearchOrchestrator::new(
            Arc::new(hotels.clone()),
            history.clone(),
            clock.clone(),
            "USD",
        );
        let dispatcher = BookingDispatcher::new(
            Arc::new(transport.clone()),
            store.clone(),
            Arc::new(hotels.clone()),
            history.clone(),
            clock,
            orchestrator,
        );
        Self {
            transport,
            hotels,
            store,
            history,
            dispatcher,
        }
    }

    /// Same chat, same storage, fresh dispatcher.
    fn restart(self) -> Self {
        Self::assemble(self.transport, self.hotels, self.store, self.history)
    }

    async fn say(&self, text: &str) -> MessageId {
        let message_id = self.transport.user_message(CHAT, text);
        self.dispatcher
            .dispatch(InboundEvent::Text {
                user_id: USER,
                chat_id: CHAT,
                message_id,
                text: text.to_string(),
            })
            .await
            .expect("text handled");
        message_id
    }

    async fn press(&self, message_id: MessageId, data: &str) {
        let controls = self
            .transport
            .message(CHAT, message_id)
            .and_then(|m| m.controls);
        self.dispatcher
            .dispatch(InboundEvent::Callback {
                user_id: USER,
                chat_id: CHAT,
                callback_id: CallbackId::new(format!("cb-{}", message_id)),
                message_id,
                data: data.to_string(),
                controls,
            })
            .await
            .expect("callback handled");
    }

    /// Presses `data` on the last message the bot sent.
    async fn press_last(&self, data: &str) -> MessageId {
        let (id, _) = self.last();
        self.press(id, data).await;
        id
    }

    fn last(&self) -> (MessageId, String) {
        let (id, message) = self.transport.last_sent(CHAT).expect("bot has spoken");
        (id, message.text)
    }

    fn text_of(&self, message_id: MessageId) -> String {
        self.transport
            .message(CHAT, message_id)
            .map(|m| m.text)
            .unwrap_or_default()
    }

    fn last_notice(&self) -> Option<String> {
        self.transport.callback_answers().pop().and_then(|a| a.text)
    }

    async fn session(&self) -> BookingSession {
        self.store
            .get(USER)
            .await
            .expect("store readable")
            .expect("session stored")
    }

    /// Runs a search command up to the first adults question.
    async fn fill_criteria(&self, command: &str, hotels: u8) {
        self.say(command).await;
        self.say("Paris").await;
        self.press_last(&format!("id={}", PARIS)).await;
        self.press_last(&format!("h={}", hotels)).await;
        self.press_last("cal1:p:2025-06-05").await;
        self.press_last("cal2:p:2025-06-08").await;
    }

    /// Answers the adults question of `room` and declines children.
    async fn room_without_children(&self, room: usize, adults: u8) {
        self.press_last(&format!("my_a{},{}", adults, room)).await;
        self.press_last(&format!("-,{}", room)).await;
    }

    async fn rooms_surface(&self) -> MessageId {
        self.session()
            .await
            .surfaces()
            .rooms
            .expect("rooms summary posted")
    }
}

// =============================================================================
// Complete searches
// =============================================================================

#[tokio::test]
async fn low_price_search_from_start_to_results() {
    let hotels = paris_hotels().with_offers(vec![
        offer(1, "Grand", Some(250.0), Some(0.4)),
        offer(2, "Budget", Some(99.5), Some(5.0)),
        offer(3, "Mystery", None, Some(1.0)),
        offer(4, "Middle", Some(140.0), Some(2.0)),
    ]);
    let bot = Bot::new(hotels);

    bot.fill_criteria("/lowprice", 3).await;
    assert_eq!(bot.last().1, "Room 1: how many adults?");
    bot.room_without_children(0, 2).await;

    let summary = bot.session().await.surfaces().summary.unwrap();
    let overall = bot.text_of(summary);
    assert!(overall.contains("Paris, France"));
    assert!(overall.contains("2025-06-05"));
    assert!(overall.contains("2025-06-08"));
    assert!(bot.text_of(bot.rooms_surface().await).contains("Adults: 2"));

    bot.press(bot.rooms_surface().await, "finish").await;
    assert_eq!(bot.last().1, texts::ASK_PHOTOS);
    bot.press_last("photo-").await;

    let session = bot.session().await;
    assert!(session.is_finished());
    assert_eq!(session.photos(), Some(PhotoRequest::None));

    let results: Vec<String> = bot
        .transport
        .live_messages(CHAT)
        .into_iter()
        .filter(|(_, m)| m.html)
        .map(|(_, m)| m.text)
        .collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].contains("Budget"));
    assert!(results[0].contains("<b>Per night:</b> 100$"));
    assert!(results[0].contains("<b>Total:</b> 300$"));
    assert!(results[1].contains("Middle"));
    assert!(results[2].contains("Grand"));

    let searches = bot.hotels.searches();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].destination_id, PARIS);
    assert_eq!(searches[0].command, SearchCommand::LowPrice);
}

#[tokio::test]
async fn search_is_recorded_in_history() {
    let hotels = paris_hotels().with_offers(vec![offer(9, "Le Petit", Some(80.0), Some(1.0))]);
    let bot = Bot::new(hotels);

    bot.fill_criteria("/highprice", 2).await;
    bot.room_without_children(0, 1).await;
    bot.press(bot.rooms_surface().await, "finish").await;
    bot.press_last("photo-").await;

    assert_eq!(bot.last().1, "Found only 1 hotel(s).");
    let records = bot.history.query_by_user(USER).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].command, SearchCommand::HighPrice);

    bot.say("/history").await;
    assert!(bot.last().1.contains("Le Petit"));
}

#[tokio::test]
async fn photos_are_sent_as_an_album() {
    let hotels = paris_hotels()
        .with_offers(vec![offer(5, "Photogenic", Some(120.0), Some(0.8))])
        .with_photos(5, vec!["https://img/1.jpg".into(), "https://img/2.jpg".into(), "https://img/3.jpg".into()]);
    let bot = Bot::new(hotels);

    bot.fill_criteria("/lowprice", 1).await;
    bot.room_without_children(0, 2).await;
    bot.press(bot.rooms_surface().await, "finish").await;
    bot.press_last("photo+").await;
    assert_eq!(bot.last().1, texts::ASK_PHOTO_COUNT);
    bot.press_last("photo2").await;

    let photos: Vec<String> = bot
        .transport
        .live_messages(CHAT)
        .into_iter()
        .flat_map(|(_, m)| m.photos)
        .collect();
    assert_eq!(photos, vec!["https://img/1.jpg".to_string(), "https://img/2.jpg".to_string()]);
    assert_eq!(
        bot.session().await.photos(),
        Some(PhotoRequest::count(2).unwrap())
    );
}

#[tokio::test]
async fn best_deal_reports_the_closest_hotel_when_nothing_fits() {
    let hotels = paris_hotels().with_offers(vec![
        offer(1, "Far", Some(60.0), Some(3.0)),
        offer(2, "Nearer", Some(90.0), Some(1.2)),
        offer(3, "Nowhere", Some(70.0), None),
    ]);
    let bot = Bot::new(hotels);

    bot.fill_criteria("/bestdeal", 3).await;
    bot.room_without_children(0, 2).await;
    bot.press(bot.rooms_surface().await, "finish").await;
    assert_eq!(bot.last().1, texts::ASK_PRICE_RANGE);

    bot.say("price?").await;
    assert!(bot.last().1.starts_with(texts::WRONG_FORMAT));
    bot.say("150 50").await;
    assert_eq!(bot.last().1, texts::ASK_MAX_DISTANCE);
    bot.say("0.5").await;
    assert_eq!(bot.last().1, texts::ASK_PHOTOS);
    bot.press_last("photo-").await;

    let session = bot.session().await;
    let range = session.price_range().unwrap();
    assert_eq!((range.min(), range.max()), (50.0, 150.0));
    assert_eq!(session.max_distance(), Some(0.5));

    let (_, reply) = bot.last();
    assert!(reply.starts_with(texts::NOTHING_FOUND));
    assert!(reply.contains("1.2 km"));
}

// =============================================================================
// Destination disambiguation
// =============================================================================

#[tokio::test]
async fn typing_again_while_choosing_a_destination_is_held_back() {
    let bot = Bot::new(paris_hotels());
    bot.say("/lowprice").await;
    bot.say("Pari").await;
    let (list, text) = bot.last();
    assert_eq!(text, texts::CHOOSE_DESTINATION);

    let retyped = bot.say("Paris").await;
    let (pointer, _) = bot.last();
    assert_ne!(pointer, list);
    assert_eq!(bot.hotels.lookups(), vec!["Pari".to_string()]);

    bot.press(list, &format!("id={}", PARIS)).await;

    assert!(bot.transport.is_deleted(CHAT, retyped));
    assert!(bot.transport.is_deleted(CHAT, pointer));
    let session = bot.session().await;
    assert!(!session.destination_lock().is_held());
    assert_eq!(session.destination().unwrap().name, "Paris, France");
    assert_eq!(session.stage(), Stage::ChooseHotelCount);
}

#[tokio::test]
async fn unknown_destination_asks_again() {
    let bot = Bot::new(paris_hotels());
    bot.say("/lowprice").await;
    bot.say("Atlantis").await;

    assert_eq!(bot.last().1, texts::DESTINATION_NOT_FOUND);
    bot.say("paris").await;
    assert_eq!(bot.last().1, texts::CHOOSE_DESTINATION);
}

// =============================================================================
// Rooms
// =============================================================================

#[tokio::test]
async fn deleting_the_first_room_shifts_the_second_down() {
    let bot = Bot::new(paris_hotels());
    bot.fill_criteria("/lowprice", 3).await;

    // Room 1: two adults, children aged 4 and 9
    bot.press_last("my_a2,0").await;
    bot.press_last("+,0").await;
    bot.press_last("ch_age=4,0").await;
    bot.press_last("ch_age=9,0").await;
    bot.press_last("-,0").await;
    let rooms = bot.rooms_surface().await;
    assert!(bot.text_of(rooms).contains("Children: 2 (4, 9)"));

    // Room 2: one adult
    bot.press(rooms, "change_new_room").await;
    assert_eq!(bot.last().1, "Room 2: how many adults?");
    bot.room_without_children(1, 1).await;

    bot.press(rooms, "change_room").await;
    bot.press(rooms, "change_delete").await;
    bot.press(rooms, "change_d0_room").await;

    let session = bot.session().await;
    assert_eq!(session.rooms().len(), 1);
    let room = session.rooms().get(0).unwrap();
    assert_eq!(room.adults(), Some(1));
    assert!(room.children().is_empty());
    assert_eq!(bot.text_of(rooms), "Room 1:\nAdults: 1\n");
    assert!(session.check_consistency().is_ok());
}

#[tokio::test]
async fn stale_buttons_are_answered_as_outdated() {
    let bot = Bot::new(paris_hotels());
    bot.fill_criteria("/lowprice", 3).await;
    bot.room_without_children(0, 2).await;
    let rooms = bot.rooms_surface().await;

    // The adults keyboard of room 1 was replaced by the rooms menu.
    bot.press(rooms, "my_a3,0").await;
    assert_eq!(bot.last_notice().as_deref(), Some(texts::OUTDATED));
    assert_eq!(bot.session().await.rooms().get(0).unwrap().adults(), Some(2));

    bot.press(rooms, "change_d0_room").await;
    assert_eq!(bot.session().await.rooms().len(), 1);
}

#[tokio::test]
async fn pressing_a_guest_button_twice_counts_once() {
    let bot = Bot::new(paris_hotels());
    bot.fill_criteria("/lowprice", 3).await;
    bot.press_last("my_a2,0").await;

    let question = bot.press_last("+,0").await;
    let (age_prompt, text) = bot.last();
    assert_eq!(text, "Room 1: age of child 1?");
    bot.press(question, "+,0").await;
    assert_eq!(bot.last_notice().as_deref(), Some(texts::OUTDATED));
    assert_eq!(bot.last().0, age_prompt);

    bot.press(age_prompt, "ch_age=4,0").await;
    assert_eq!(bot.last_notice(), None);
    bot.press(age_prompt, "ch_age=4,0").await;
    assert_eq!(bot.last_notice().as_deref(), Some(texts::OUTDATED));

    let session = bot.session().await;
    assert_eq!(session.rooms().get(0).unwrap().children(), &[4]);
    assert_eq!(session.guest_cycle().open_room(), Some(0));
    let age_prompts = bot
        .transport
        .live_messages(CHAT)
        .into_iter()
        .filter(|(_, m)| m.text.contains("age of child"))
        .count();
    assert_eq!(age_prompts, 1);
    assert_eq!(bot.last().1, "Room 1: age of child 2?");
}

#[tokio::test]
async fn a_new_search_retires_the_old_form() {
    let bot = Bot::new(paris_hotels());
    bot.fill_criteria("/lowprice", 3).await;
    let old_summary = bot.session().await.surfaces().summary.unwrap();

    bot.say("/bestdeal").await;

    assert!(bot
        .transport
        .message(CHAT, old_summary)
        .map(|m| m.controls.is_none())
        .unwrap_or(true));
    let session = bot.session().await;
    assert_eq!(session.command(), Some(SearchCommand::BestDeal));
    assert_eq!(session.stage(), Stage::Locate);
    assert_eq!(bot.last().1, texts::ASK_DESTINATION);

    bot.press(old_summary, "main").await;
    assert_eq!(bot.last_notice().as_deref(), Some(texts::OUTDATED));
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn conversation_survives_a_restart_with_file_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(dir.path()));
    let bot = Bot::with_store(paris_hotels(), store);

    bot.say("/lowprice").await;
    bot.say("Paris").await;
    bot.press_last(&format!("id={}", PARIS)).await;

    let bot = bot.restart();
    bot.press_last("h=4").await;

    let session = bot.session().await;
    assert_eq!(session.hotel_count(), Some(4));
    assert_eq!(session.stage(), Stage::ChooseCheckIn);
    assert_eq!(bot.last().1, texts::ASK_CHECK_IN);
}
