//! Callback payload grammar.
//!
//! Every button carries a short string payload (the platform caps it at 64
//! bytes). `CallbackAction` is the closed set of payloads this bot emits, so
//! routing is a `match` instead of prefix probing.

use chrono::NaiveDate;
use std::fmt;

/// Which of the two date pickers a calendar payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarKind {
    CheckIn,
    CheckOut,
}

impl CalendarKind {
    pub fn id(&self) -> u8 {
        match self {
            CalendarKind::CheckIn => 1,
            CalendarKind::CheckOut => 2,
        }
    }

    fn from_id(id: &str) -> Option<Self> {
        match id {
            "1" => Some(CalendarKind::CheckIn),
            "2" => Some(CalendarKind::CheckOut),
            _ => None,
        }
    }
}

/// What a calendar button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarStep {
    /// Show the month starting at this date.
    Navigate(NaiveDate),
    /// Choose this day.
    Pick(NaiveDate),
}

/// Fields of the overall summary that can be re-edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    Location,
    HotelCount,
    CheckIn,
    CheckOut,
}

impl SummaryField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryField::Location => "location",
            SummaryField::HotelCount => "hotel_count",
            SummaryField::CheckIn => "check_in",
            SummaryField::CheckOut => "check_out",
        }
    }
}

/// A parsed callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    SelectDestination(String),
    HotelCount(u8),
    Calendar { kind: CalendarKind, step: CalendarStep },
    Adults { count: u8, room: usize },
    WantChildren { room: usize },
    NoMoreChildren { room: usize },
    ChildAge { age: u8, room: usize },
    RoomsEditMenu,
    AddRoom,
    EditRoom(usize),
    DeleteMenu,
    DeleteRoom(usize),
    Back,
    SummaryMenu,
    EditField(SummaryField),
    Finish,
    PhotosWanted,
    NoPhotos,
    PhotoCount(u8),
    Ignore,
}

impl CallbackAction {
    /// Parses a payload. Unknown or malformed payloads yield `None`.
    pub fn parse(data: &str) -> Option<Self> {
        use CallbackAction::*;

        match data {
            "change_room" => return Some(RoomsEditMenu),
            "change_new_room" => return Some(AddRoom),
            "change_delete" => return Some(DeleteMenu),
            "change_back" => return Some(Back),
            "main" => return Some(SummaryMenu),
            "location" => return Some(EditField(SummaryField::Location)),
            "hotel_count" => return Some(EditField(SummaryField::HotelCount)),
            "check_in" => return Some(EditField(SummaryField::CheckIn)),
            "check_out" => return Some(EditField(SummaryField::CheckOut)),
            "finish" => return Some(Finish),
            "photo+" => return Some(PhotosWanted),
            "photo-" => return Some(NoPhotos),
            "ignore" => return Some(Ignore),
            _ => {}
        }

        if let Some(id) = data.strip_prefix("id=") {
            return (!id.is_empty()).then(|| SelectDestination(id.to_string()));
        }
        if let Some(n) = data.strip_prefix("h=") {
            return n.parse().ok().map(HotelCount);
        }
        if let Some(rest) = data.strip_prefix("cal") {
            return parse_calendar(rest);
        }
        if let Some(rest) = data.strip_prefix("my_a") {
            let (count, room) = pair(rest)?;
            return Some(Adults {
                count: count.parse().ok()?,
                room: room.parse().ok()?,
            });
        }
        if let Some(room) = data.strip_prefix("+,") {
            return room.parse().ok().map(|room| WantChildren { room });
        }
        if let Some(room) = data.strip_prefix("-,") {
            return room.parse().ok().map(|room| NoMoreChildren { room });
        }
        if let Some(rest) = data.strip_prefix("ch_age=") {
            let (age, room) = pair(rest)?;
            return Some(ChildAge {
                age: age.parse().ok()?,
                room: room.parse().ok()?,
            });
        }
        if let Some(rest) = data.strip_prefix("change_d") {
            if let Some(room) = rest.strip_suffix("_room") {
                return room.parse().ok().map(DeleteRoom);
            }
        }
        if let Some(rest) = data.strip_prefix("change_") {
            if let Some(room) = rest.strip_suffix("_room") {
                return room.parse().ok().map(EditRoom);
            }
        }
        if let Some(n) = data.strip_prefix("photo") {
            return n.parse().ok().map(PhotoCount);
        }
        None
    }
}

fn pair(s: &str) -> Option<(&str, &str)> {
    s.split_once(',')
}

fn parse_calendar(rest: &str) -> Option<CallbackAction> {
    let mut parts = rest.splitn(3, ':');
    let kind = CalendarKind::from_id(parts.next()?)?;
    let verb = parts.next()?;
    let date = NaiveDate::parse_from_str(parts.next()?, "%Y-%m-%d").ok()?;
    let step = match verb {
        "n" => CalendarStep::Navigate(date),
        "p" => CalendarStep::Pick(date),
        _ => return None,
    };
    Some(CallbackAction::Calendar { kind, step })
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CallbackAction::*;

        match self {
            SelectDestination(id) => write!(f, "id={}", id),
            HotelCount(n) => write!(f, "h={}", n),
            Calendar { kind, step } => match step {
                CalendarStep::Navigate(d) => write!(f, "cal{}:n:{}", kind.id(), d.format("%Y-%m-%d")),
                CalendarStep::Pick(d) => write!(f, "cal{}:p:{}", kind.id(), d.format("%Y-%m-%d")),
            },
            Adults { count, room } => write!(f, "my_a{},{}", count, room),
            WantChildren { room } => write!(f, "+,{}", room),
            NoMoreChildren { room } => write!(f, "-,{}", room),
            ChildAge { age, room } => write!(f, "ch_age={},{}", age, room),
            RoomsEditMenu => f.write_str("change_room"),
            AddRoom => f.write_str("change_new_room"),
            EditRoom(room) => write!(f, "change_{}_room", room),
            DeleteMenu => f.write_str("change_delete"),
            DeleteRoom(room) => write!(f, "change_d{}_room", room),
            Back => f.write_str("change_back"),
            SummaryMenu => f.write_str("main"),
            EditField(field) => f.write_str(field.as_str()),
            Finish => f.write_str("finish"),
            PhotosWanted => f.write_str("photo+"),
            NoPhotos => f.write_str("photo-"),
            PhotoCount(n) => write!(f, "photo{}", n),
            Ignore => f.write_str("ignore"),
        }
    }
}
