//! Keyboard factories for every prompt of the booking form.

use super::callback::{CallbackAction, SummaryField};
use super::keyboard::{InlineButton, InlineKeyboard};
use crate::domain::booking::{MAX_ADULTS, MAX_CHILD_AGE, MAX_ROOMS};
use crate::domain::search::DestinationCandidate;

/// Largest selectable hotel count.
pub const MAX_HOTELS: u8 = 10;

/// Largest selectable photo count.
pub const MAX_PHOTOS: u8 = 10;

fn button(text: impl Into<String>, action: CallbackAction) -> InlineButton {
    InlineButton::new(text, action.to_string())
}

fn back() -> InlineButton {
    button("Back", CallbackAction::Back)
}

/// Disambiguation list, one candidate per row.
pub fn destinations(candidates: &[DestinationCandidate]) -> InlineKeyboard {
    InlineKeyboard::column(
        candidates
            .iter()
            .map(|c| button(&c.name, CallbackAction::SelectDestination(c.id.clone())))
            .collect(),
    )
}

/// Hotel count, 1 through 10 in rows of five.
pub fn hotel_count() -> InlineKeyboard {
    InlineKeyboard::grid(
        (1..=MAX_HOTELS)
            .map(|n| button(n.to_string(), CallbackAction::HotelCount(n)))
            .collect(),
        5,
    )
}

/// Single "Edit" button under the overall summary.
pub fn summary_edit() -> InlineKeyboard {
    InlineKeyboard::column(vec![button("Edit", CallbackAction::SummaryMenu)])
}

/// Fields of the overall summary that already have a value, then "Back".
pub fn summary_fields(has_hotel_count: bool, has_check_in: bool, has_check_out: bool) -> InlineKeyboard {
    let mut buttons = vec![button("Location", CallbackAction::EditField(SummaryField::Location))];
    if has_hotel_count {
        buttons.push(button(
            "Number of hotels",
            CallbackAction::EditField(SummaryField::HotelCount),
        ));
    }
    if has_check_in {
        buttons.push(button("Check-in date", CallbackAction::EditField(SummaryField::CheckIn)));
    }
    if has_check_out {
        buttons.push(button("Check-out date", CallbackAction::EditField(SummaryField::CheckOut)));
    }
    buttons.push(back());
    InlineKeyboard::column(buttons)
}

/// Adult count for `room`, 1 through 14 in rows of four.
pub fn adults(room: usize) -> InlineKeyboard {
    InlineKeyboard::grid(
        (1..=MAX_ADULTS)
            .map(|count| button(count.to_string(), CallbackAction::Adults { count, room }))
            .collect(),
        4,
    )
}

/// Payload of the `position`-th adults button for `room`.
pub fn adults_payload(position: usize, room: usize) -> String {
    let count = u8::try_from(position).unwrap_or(u8::MAX);
    CallbackAction::Adults { count, room }.to_string()
}

/// "+" / "-" question about children in `room`.
pub fn children_question(room: usize) -> InlineKeyboard {
    InlineKeyboard::grid(
        vec![
            button("+", CallbackAction::WantChildren { room }),
            button("-", CallbackAction::NoMoreChildren { room }),
        ],
        2,
    )
}

/// Label of the button that ends the children list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildrenExit {
    /// No child added yet.
    Without,
    /// Room has children; creating the last room.
    NextStep,
    /// Editing a room that is followed by others.
    Done,
}

impl ChildrenExit {
    pub fn label(&self) -> &'static str {
        match self {
            ChildrenExit::Without => "Without children",
            ChildrenExit::NextStep => "Next step",
            ChildrenExit::Done => "Done",
        }
    }
}

/// Age of the next child in `room`: "<1", 1 through 17 in rows of six, then
/// the exit button.
pub fn child_age(room: usize, exit: ChildrenExit) -> InlineKeyboard {
    let ages = (0..=MAX_CHILD_AGE)
        .map(|age| {
            let text = if age == 0 { "<1".to_string() } else { age.to_string() };
            button(text, CallbackAction::ChildAge { age, room })
        })
        .collect();
    InlineKeyboard::grid(ages, 6)
        .with_row(vec![button(exit.label(), CallbackAction::NoMoreChildren { room })])
}

/// Menu on the rooms summary. "Add room" is withdrawn once the ceiling is
/// reached.
pub fn rooms_menu(total_rooms: usize) -> InlineKeyboard {
    let mut buttons = vec![button("Edit rooms", CallbackAction::RoomsEditMenu)];
    if total_rooms < MAX_ROOMS {
        buttons.push(button("Add room", CallbackAction::AddRoom));
    }
    buttons.push(button("Start search", CallbackAction::Finish));
    InlineKeyboard::column(buttons)
}

/// One button per room, "Delete room" when there is more than one, "Back".
pub fn edit_rooms(total_rooms: usize) -> InlineKeyboard {
    let mut buttons: Vec<InlineButton> = (0..total_rooms)
        .map(|r| button(format!("Room {}", r + 1), CallbackAction::EditRoom(r)))
        .collect();
    if total_rooms > 1 {
        buttons.push(button("Delete room", CallbackAction::DeleteMenu));
    }
    buttons.push(back());
    InlineKeyboard::column(buttons)
}

/// One delete button per room, two per row, then "Back".
pub fn delete_rooms(total_rooms: usize) -> InlineKeyboard {
    let mut buttons: Vec<InlineButton> = (0..total_rooms)
        .map(|r| button(format!("Delete room {}", r + 1), CallbackAction::DeleteRoom(r)))
        .collect();
    buttons.push(back());
    InlineKeyboard::grid(buttons, 2)
}

/// "Yes" / "No" to photos.
pub fn photo_question() -> InlineKeyboard {
    InlineKeyboard::grid(
        vec![
            button("Yes", CallbackAction::PhotosWanted),
            button("No", CallbackAction::NoPhotos),
        ],
        2,
    )
}

/// Photo count, 1 through 10 in rows of five.
pub fn photo_count() -> InlineKeyboard {
    InlineKeyboard::grid(
        (1..=MAX_PHOTOS)
            .map(|n| button(n.to_string(), CallbackAction::PhotoCount(n)))
            .collect(),
        5,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(kb: &InlineKeyboard) -> Vec<String> {
        kb.buttons().map(|b| b.callback_data.clone()).collect()
    }

    #[test]
    fn hotel_count_has_two_rows_of_five() {
        let kb = hotel_count();
        assert_eq!(kb.rows().len(), 2);
        assert_eq!(payloads(&kb)[9], "h=10");
    }

    #[test]
    fn adults_keyboard_is_scoped_to_room() {
        let kb = adults(2);
        assert_eq!(kb.buttons().count(), 14);
        assert_eq!(kb.rows()[0].len(), 4);
        assert!(payloads(&kb).iter().all(|p| p.ends_with(",2")));
        assert_eq!(payloads(&kb)[0], adults_payload(1, 2));
    }

    #[test]
    fn child_age_keyboard_ends_with_exit() {
        let kb = child_age(1, ChildrenExit::NextStep);
        let last = kb.rows().last().unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].text, "Next step");
        assert_eq!(last[0].callback_data, "-,1");
        assert_eq!(kb.rows()[0][0].text, "<1");
        assert_eq!(kb.rows()[0][0].callback_data, "ch_age=0,1");
        assert_eq!(kb.buttons().count(), 19);
    }

    #[test]
    fn rooms_menu_withdraws_add_at_ceiling() {
        assert!(payloads(&rooms_menu(6)).contains(&"change_new_room".to_string()));
        assert!(!payloads(&rooms_menu(7)).contains(&"change_new_room".to_string()));
        assert_eq!(payloads(&rooms_menu(7)).last().unwrap(), "finish");
    }

    #[test]
    fn edit_rooms_offers_delete_only_with_several_rooms() {
        assert_eq!(payloads(&edit_rooms(1)), vec!["change_0_room", "change_back"]);
        assert_eq!(
            payloads(&edit_rooms(2)),
            vec!["change_0_room", "change_1_room", "change_delete", "change_back"]
        );
    }

    #[test]
    fn delete_rooms_lists_every_room() {
        assert_eq!(
            payloads(&delete_rooms(3)),
            vec!["change_d0_room", "change_d1_room", "change_d2_room", "change_back"]
        );
    }

    #[test]
    fn summary_fields_follow_known_values() {
        assert_eq!(payloads(&summary_fields(false, false, false)), vec!["location", "change_back"]);
        assert_eq!(
            payloads(&summary_fields(true, true, false)),
            vec!["location", "hotel_count", "check_in", "change_back"]
        );
    }

    #[test]
    fn destinations_keep_candidate_order() {
        let kb = destinations(&[
            DestinationCandidate::new("1", "Paris, France"),
            DestinationCandidate::new("2", "Paris, Texas"),
        ]);
        assert_eq!(payloads(&kb), vec!["id=1", "id=2"]);
        assert_eq!(kb.label_for("id=2"), Some("Paris, Texas"));
    }
}
