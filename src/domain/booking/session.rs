//! Booking session aggregate - one user's booking form in progress.
//!
//! A session owns every piece of conversation state: the stage mark, the
//! scalar criteria, the room registry and its guest cycle, the summary memory
//! behind the two live messages, and the destination lock.
//!
//! # Invariants
//!
//! - `stage` only moves forward, except through [`BookingSession::begin`]
//! - at most one room is open for editing
//! - summary room keys never reach past the registry
//! - a finished form accepts no further edits to rooms or scalar criteria

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::command::SearchCommand;
use super::criteria::{PhotoRequest, PriceRange, RoomOccupancy, SearchCriteria};
use super::destination_lock::DestinationLock;
use super::errors::BookingError;
use super::guest_cycle::{GuestCycle, RoomEditState};
use super::room_registry::{RoomDraft, RoomRegistry};
use super::stage::Stage;
use super::summary::{ControlRef, ScalarField, SummaryMemory, SummarySlot};
use super::validator::{self, ValidationReport};
use crate::domain::controls::menus::{self, ChildrenExit, MAX_HOTELS};
use crate::domain::controls::{Calendar, InlineKeyboard};
use crate::domain::foundation::{ChatId, MessageId, Timestamp, UserId, ValidationError};
use crate::domain::search::DestinationCandidate;

/// Free-text answer the session is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPrompt {
    Destination,
    PriceRange,
    MaxDistance,
}

/// Ids of the two editable summary messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveSurfaces {
    pub summary: Option<MessageId>,
    pub rooms: Option<MessageId>,
}

/// Messages to clean up when a session is replaced by a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetiredSession {
    /// Messages whose controls must be stripped.
    pub controls: Vec<MessageId>,
    /// Queued messages to delete.
    pub pending: Vec<MessageId>,
}

/// Result of adding a child to the open room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildAdded {
    pub children: usize,
    /// True when the ceiling closed the room.
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSession {
    user_id: UserId,
    chat_id: ChatId,
    stage: Stage,
    command: Option<SearchCommand>,
    destination: Option<DestinationCandidate>,
    hotel_count: Option<u8>,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    rooms: RoomRegistry,
    guest_cycle: GuestCycle,
    summary: SummaryMemory,
    surfaces: LiveSurfaces,
    destination_lock: DestinationLock,
    awaiting: Option<TextPrompt>,
    current_prompt: Option<MessageId>,
    price_range: Option<PriceRange>,
    max_distance: Option<f64>,
    photos: Option<PhotoRequest>,
    finished: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl BookingSession {
    /// A session with no command; what a first contact creates.
    pub fn new(user_id: UserId, chat_id: ChatId) -> Self {
        let now = Timestamp::now();
        Self {
            user_id,
            chat_id,
            stage: Stage::Start,
            command: None,
            destination: None,
            hotel_count: None,
            check_in: None,
            check_out: None,
            rooms: RoomRegistry::new(),
            guest_cycle: GuestCycle::new(),
            summary: SummaryMemory::new(),
            surfaces: LiveSurfaces::default(),
            destination_lock: DestinationLock::new(),
            awaiting: None,
            current_prompt: None,
            price_range: None,
            max_distance: None,
            photos: None,
            finished: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// A fresh form for `command`, waiting for a destination.
    pub fn begin(user_id: UserId, chat_id: ChatId, command: SearchCommand) -> Self {
        let mut session = Self::new(user_id, chat_id);
        session.command = Some(command);
        session.stage = Stage::Locate;
        session.awaiting = Some(TextPrompt::Destination);
        session
    }

    /// Messages this session leaves behind when it is replaced.
    pub fn retire(&self) -> RetiredSession {
        let mut controls = Vec::new();
        for id in [
            self.surfaces.summary,
            self.surfaces.rooms,
            self.current_prompt,
            self.destination_lock.prompt(),
        ]
        .into_iter()
        .flatten()
        {
            if !controls.contains(&id) {
                controls.push(id);
            }
        }
        RetiredSession {
            controls,
            pending: self.destination_lock.pending().to_vec(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn command(&self) -> Option<SearchCommand> {
        self.command
    }

    pub fn destination(&self) -> Option<&DestinationCandidate> {
        self.destination.as_ref()
    }

    pub fn hotel_count(&self) -> Option<u8> {
        self.hotel_count
    }

    pub fn check_in(&self) -> Option<NaiveDate> {
        self.check_in
    }

    pub fn check_out(&self) -> Option<NaiveDate> {
        self.check_out
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn guest_cycle(&self) -> &GuestCycle {
        &self.guest_cycle
    }

    pub fn summary(&self) -> &SummaryMemory {
        &self.summary
    }

    pub fn surfaces(&self) -> LiveSurfaces {
        self.surfaces
    }

    pub fn destination_lock(&self) -> &DestinationLock {
        &self.destination_lock
    }

    pub fn destination_lock_mut(&mut self) -> &mut DestinationLock {
        self.touch();
        &mut self.destination_lock
    }

    pub fn awaiting(&self) -> Option<TextPrompt> {
        self.awaiting
    }

    pub fn current_prompt(&self) -> Option<MessageId> {
        self.current_prompt
    }

    pub fn price_range(&self) -> Option<PriceRange> {
        self.price_range
    }

    pub fn max_distance(&self) -> Option<f64> {
        self.max_distance
    }

    pub fn photos(&self) -> Option<PhotoRequest> {
        self.photos
    }

    /// True once the form passed validation and lost its controls.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Conversation bookkeeping
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves the stage mark to `stage` if it is later. Returns true when the
    /// mark moved, which is when the caller should ask the next question.
    pub fn enter(&mut self, stage: Stage) -> bool {
        let moved = self.stage.advance_to(stage);
        if moved {
            self.touch();
        }
        moved
    }

    pub fn await_text(&mut self, prompt: Option<TextPrompt>) {
        self.awaiting = prompt;
        self.touch();
    }

    /// Records the message holding the question asked last.
    pub fn set_current_prompt(&mut self, prompt: Option<MessageId>) {
        self.current_prompt = prompt;
        self.touch();
    }

    /// Adopts `message` as the overall summary unless one exists. Returns the
    /// summary surface.
    pub fn claim_summary_surface(&mut self, message: MessageId) -> MessageId {
        *self.surfaces.summary.get_or_insert(message)
    }

    /// Adopts `message` as the rooms summary unless one exists. Returns the
    /// rooms surface.
    pub fn claim_rooms_surface(&mut self, message: MessageId) -> MessageId {
        *self.surfaces.rooms.get_or_insert(message)
    }

    pub fn is_summary_surface(&self, message: MessageId) -> bool {
        self.surfaces.summary == Some(message)
    }

    pub fn is_rooms_surface(&self, message: MessageId) -> bool {
        self.surfaces.rooms == Some(message)
    }

    /// True if `message` is either live summary.
    pub fn is_surface(&self, message: MessageId) -> bool {
        self.is_summary_surface(message) || self.is_rooms_surface(message)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scalar criteria
    // ─────────────────────────────────────────────────────────────────────────

    /// Stores the chosen destination and releases the destination lock.
    ///
    /// `control` is the disambiguation keyboard with the choice marked.
    /// Returns the queued messages to delete.
    pub fn select_destination(
        &mut self,
        candidate: DestinationCandidate,
        control: InlineKeyboard,
    ) -> Result<Vec<MessageId>, BookingError> {
        self.ensure_editable()?;
        let pending = self.destination_lock.release();
        self.summary.set_scalar(
            SummarySlot::Location,
            ScalarField::new(format!("Location: {}", candidate.name))
                .with_control(ControlRef::Keyboard(control)),
        );
        self.destination = Some(candidate);
        if self.awaiting == Some(TextPrompt::Destination) {
            self.awaiting = None;
        }
        self.touch();
        Ok(pending)
    }

    /// # Errors
    ///
    /// - `AlreadyFinished` after the form was submitted
    /// - `Invalid` unless `count` is 1 through 10
    pub fn set_hotel_count(
        &mut self,
        count: u8,
        control: InlineKeyboard,
    ) -> Result<(), BookingError> {
        self.ensure_editable()?;
        if count == 0 || count > MAX_HOTELS {
            return Err(ValidationError::out_of_range(
                "hotel_count",
                1,
                MAX_HOTELS.into(),
                count.into(),
            )
            .into());
        }
        self.hotel_count = Some(count);
        self.summary.set_scalar(
            SummarySlot::HotelCount,
            ScalarField::new(format!("Hotels: {}", count))
                .with_control(ControlRef::Keyboard(control)),
        );
        self.touch();
        Ok(())
    }

    /// `pick` is the payload of the calendar button that chose `date`.
    pub fn set_check_in(&mut self, date: NaiveDate, pick: String) -> Result<(), BookingError> {
        self.ensure_editable()?;
        self.check_in = Some(date);
        self.summary.set_scalar(
            SummarySlot::CheckIn,
            ScalarField::new(format!("Check-in: {}", date))
                .with_control(ControlRef::CalendarPick(pick)),
        );
        self.touch();
        Ok(())
    }

    pub fn set_check_out(&mut self, date: NaiveDate, pick: String) -> Result<(), BookingError> {
        self.ensure_editable()?;
        self.check_out = Some(date);
        self.summary.set_scalar(
            SummarySlot::CheckOut,
            ScalarField::new(format!("Check-out: {}", date))
                .with_control(ControlRef::CalendarPick(pick)),
        );
        self.touch();
        Ok(())
    }

    /// Check-in picker starting at `today`.
    pub fn check_in_calendar(&self, today: NaiveDate) -> Calendar {
        Calendar::check_in(today, self.check_in)
    }

    /// Check-out picker; needs a check-in date.
    pub fn check_out_calendar(&self) -> Option<Calendar> {
        self.check_in
            .map(|check_in| Calendar::check_out(check_in, self.check_out))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rooms
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends an empty room and opens it for the adults question.
    ///
    /// # Errors
    ///
    /// - `RoomAlreadyOpen` while another room is being edited
    /// - `RoomLimitReached` once seven rooms exist
    pub fn add_room(&mut self) -> Result<usize, BookingError> {
        self.ensure_editable()?;
        self.ensure_idle()?;
        let room = self.rooms.append(RoomDraft::empty())?;
        self.guest_cycle.open(room)?;
        self.touch();
        Ok(room)
    }

    /// Reopens an existing room for the adults question.
    pub fn edit_room(&mut self, room: usize) -> Result<(), BookingError> {
        self.ensure_editable()?;
        self.ensure_idle()?;
        if self.rooms.get(room).is_none() {
            return Err(BookingError::RoomOutOfRange {
                room,
                total: self.rooms.len(),
            });
        }
        self.guest_cycle.open(room)?;
        self.touch();
        Ok(())
    }

    /// The adults keyboard for `room`.
    ///
    /// A room that already has an answer gets its stored keyboard back, with
    /// the previous choice marked; payloads are rebound when the stored
    /// keyboard belongs to another index (the room was renumbered).
    pub fn adults_control(&self, room: usize) -> InlineKeyboard {
        let stored = self
            .summary
            .rooms()
            .get(room)
            .and_then(|summary| summary.adults.keyboard())
            .cloned();
        match stored {
            Some(mut kb) => {
                let scoped = kb
                    .buttons()
                    .next()
                    .is_some_and(|b| b.callback_data.ends_with(&format!(",{}", room)));
                if !scoped {
                    kb.rebind(|position| menus::adults_payload(position, room));
                }
                kb
            }
            None => menus::adults(room),
        }
    }

    /// Stores the adult count of the open room and clears its children.
    ///
    /// # Errors
    ///
    /// `RoomNotOpen` unless `room` is waiting for its adults.
    pub fn supply_adults(
        &mut self,
        room: usize,
        count: u8,
        control: InlineKeyboard,
    ) -> Result<(), BookingError> {
        if self.guest_cycle.state_of(room) != RoomEditState::OpenAdults {
            return Err(BookingError::RoomNotOpen { room });
        }
        self.rooms.set_adults(room, count)?;
        self.guest_cycle.adults_supplied(room)?;
        self.summary.rooms_mut().set_adults(
            room,
            ScalarField::new(format!("Adults: {}", count))
                .with_control(ControlRef::Keyboard(control)),
        );
        self.touch();
        Ok(())
    }

    /// Checks that `room` is collecting children. Returns the number of the
    /// child asked about next.
    pub fn want_children(&self, room: usize) -> Result<u8, BookingError> {
        self.guest_cycle.child_slot(room)
    }

    /// Adds a child of `age` to the open room.
    pub fn add_child(&mut self, room: usize, age: u8) -> Result<ChildAdded, BookingError> {
        self.guest_cycle.child_slot(room)?;
        let children = self.rooms.add_child(room, age)?;
        let state = self.guest_cycle.child_added(room, children)?;
        self.refresh_children_line(room);
        self.touch();
        Ok(ChildAdded {
            children,
            closed: state.is_closed(),
        })
    }

    /// Ends the children list of the open room.
    pub fn close_room(&mut self, room: usize) -> Result<(), BookingError> {
        self.guest_cycle.close(room)?;
        self.refresh_children_line(room);
        self.touch();
        Ok(())
    }

    /// Label of the button that ends the children list of `room`.
    pub fn children_exit(&self, room: usize) -> ChildrenExit {
        let has_children = self
            .rooms
            .get(room)
            .is_some_and(|r| !r.children().is_empty());
        if self.summary.rooms().get(room + 1).is_some() {
            ChildrenExit::Done
        } else if has_children {
            ChildrenExit::NextStep
        } else {
            ChildrenExit::Without
        }
    }

    /// Deletes `room`; later rooms and their summaries move down by one.
    ///
    /// # Errors
    ///
    /// - `RoomAlreadyOpen` while any room is being edited
    /// - `NothingToDelete` with fewer than two rooms
    /// - `RoomOutOfRange` for an unknown index
    pub fn delete_room(&mut self, room: usize) -> Result<RoomDraft, BookingError> {
        self.ensure_editable()?;
        self.ensure_idle()?;
        if self.rooms.len() < 2 {
            return Err(BookingError::NothingToDelete);
        }
        let removed = self.rooms.delete(room)?;
        self.summary.rooms_mut().remove_and_shift(room);
        self.touch();
        Ok(removed)
    }

    fn refresh_children_line(&mut self, room: usize) {
        let ages = match self.rooms.get(room) {
            Some(draft) if !draft.children().is_empty() => draft.children().to_vec(),
            _ => return,
        };
        let listed = ages
            .iter()
            .map(|age| if *age == 0 { "<1".to_string() } else { age.to_string() })
            .collect::<Vec<_>>()
            .join(", ");
        self.summary.rooms_mut().set_children(
            room,
            ScalarField::new(format!("Children: {} ({})", ages.len(), listed)),
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────────

    /// Runs the validator against the current form.
    pub fn validate(&self) -> ValidationReport {
        validator::validate(self.check_in, self.check_out, &self.rooms, &self.guest_cycle)
    }

    /// Closes the form if it validates.
    ///
    /// On success returns the live surfaces whose controls must be stripped;
    /// both are forgotten. Best-deal forms go on to ask for a price range.
    ///
    /// # Errors
    ///
    /// The validation report when any check fails; nothing changes.
    pub fn finish(&mut self) -> Result<Vec<MessageId>, ValidationReport> {
        let report = self.validate();
        if !report.is_ok() {
            return Err(report);
        }
        let surfaces = [self.surfaces.summary.take(), self.surfaces.rooms.take()]
            .into_iter()
            .flatten()
            .collect();
        self.finished = true;
        if self.command.is_some_and(|c| c.needs_price_and_distance()) {
            self.awaiting = Some(TextPrompt::PriceRange);
        }
        self.touch();
        Ok(surfaces)
    }

    pub fn set_price_range(&mut self, range: PriceRange) -> Result<(), BookingError> {
        self.ensure_finished()?;
        self.price_range = Some(range);
        self.awaiting = Some(TextPrompt::MaxDistance);
        self.enter(Stage::SetPriceRange);
        self.touch();
        Ok(())
    }

    pub fn set_max_distance(&mut self, distance: f64) -> Result<(), BookingError> {
        self.ensure_finished()?;
        if self.price_range.is_none() {
            return Err(BookingError::MissingCriterion("price range"));
        }
        self.max_distance = Some(distance);
        self.awaiting = None;
        self.enter(Stage::SetMaxDistance);
        self.touch();
        Ok(())
    }

    pub fn set_photos(&mut self, photos: PhotoRequest) -> Result<(), BookingError> {
        self.ensure_finished()?;
        self.photos = Some(photos);
        self.touch();
        Ok(())
    }

    /// True when the form only waits for the photo answer.
    pub fn ready_for_photos(&self) -> bool {
        self.finished
            && self.awaiting.is_none()
            && match self.command {
                Some(c) if c.needs_price_and_distance() => {
                    self.price_range.is_some() && self.max_distance.is_some()
                }
                Some(_) => true,
                None => false,
            }
    }

    /// Assembles the search request.
    ///
    /// # Errors
    ///
    /// `MissingCriterion` naming the first absent value.
    pub fn criteria(&self) -> Result<SearchCriteria, BookingError> {
        let command = self.command.ok_or(BookingError::MissingCriterion("command"))?;
        let destination = self
            .destination
            .as_ref()
            .ok_or(BookingError::MissingCriterion("destination"))?;
        let hotel_count = self
            .hotel_count
            .ok_or(BookingError::MissingCriterion("hotel count"))?;
        let check_in = self
            .check_in
            .ok_or(BookingError::MissingCriterion("check-in"))?;
        let check_out = self
            .check_out
            .ok_or(BookingError::MissingCriterion("check-out"))?;
        if self.rooms.is_empty() {
            return Err(BookingError::MissingCriterion("rooms"));
        }
        let rooms = self
            .rooms
            .iter()
            .map(|draft| {
                draft
                    .adults()
                    .map(|adults| RoomOccupancy {
                        adults,
                        children: draft.children().to_vec(),
                    })
                    .ok_or(BookingError::MissingCriterion("adults"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (price_range, max_distance) = if command.needs_price_and_distance() {
            (
                Some(
                    self.price_range
                        .ok_or(BookingError::MissingCriterion("price range"))?,
                ),
                Some(
                    self.max_distance
                        .ok_or(BookingError::MissingCriterion("max distance"))?,
                ),
            )
        } else {
            (None, None)
        };

        Ok(SearchCriteria {
            destination_id: destination.id.clone(),
            destination_name: destination.name.clone(),
            hotel_count,
            check_in,
            check_out,
            rooms,
            command,
            price_range,
            max_distance,
            photos: self.photos.unwrap_or(PhotoRequest::None),
        })
    }

    /// Verifies the registry and its mirrors agree.
    ///
    /// # Errors
    ///
    /// `RoomOutOfRange` for the first index that points past the registry.
    pub fn check_consistency(&self) -> Result<(), BookingError> {
        let total = self.rooms.len();
        let stray = self
            .summary
            .rooms()
            .keys()
            .chain(self.guest_cycle.open_room())
            .find(|room| *room >= total);
        match stray {
            Some(room) => Err(BookingError::RoomOutOfRange { room, total }),
            None => Ok(()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    pub fn overall_text(&self) -> String {
        self.summary.render_overall()
    }

    pub fn rooms_text(&self) -> String {
        self.summary.render_rooms()
    }

    fn ensure_editable(&self) -> Result<(), BookingError> {
        if self.finished {
            return Err(BookingError::AlreadyFinished);
        }
        Ok(())
    }

    fn ensure_finished(&self) -> Result<(), BookingError> {
        if !self.finished {
            return Err(BookingError::NotFinished);
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), BookingError> {
        match self.guest_cycle.open_room() {
            Some(open) => Err(BookingError::RoomAlreadyOpen { open }),
            None => Ok(()),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
