//! Rooms: adults, children, and the edit/add/delete menus on the rooms
//! summary.

use tracing::{debug, info, warn};

use super::texts;
use super::turn::Turn;
use crate::domain::booking::{BookingError, Stage};
use crate::domain::controls::{menus, InlineKeyboard};
use crate::domain::foundation::MessageId;
use crate::ports::TransportError;

/// Answers a rejected room operation: stale buttons are outdated, invariant
/// violations are shown as they are.
fn reject(turn: &mut Turn<'_>, error: BookingError) {
    match error {
        BookingError::RoomNotOpen { .. }
        | BookingError::RoomOutOfRange { .. }
        | BookingError::AlreadyFinished => {
            debug!(code = %error.code(), error = %error, "stale room button");
            turn.outdated()
        }
        other => {
            warn!(code = %other.code(), error = %other, "room operation rejected");
            turn.warn(other.to_string())
        }
    }
}

/// True when `message_id` is the guest question asked last.
fn answers_prompt(turn: &Turn<'_>, message_id: MessageId) -> bool {
    !turn.session.is_finished() && turn.session.current_prompt() == Some(message_id)
}

/// True when `message_id` is the rooms summary of an open form.
fn on_rooms_surface(turn: &Turn<'_>, message_id: MessageId) -> bool {
    !turn.session.is_finished() && turn.session.is_rooms_surface(message_id)
}

pub async fn adults(
    turn: &mut Turn<'_>,
    message_id: MessageId,
    count: u8,
    room: usize,
    controls: Option<InlineKeyboard>,
) -> Result<(), TransportError> {
    if !answers_prompt(turn, message_id) {
        turn.outdated();
        return Ok(());
    }
    let marked = controls
        .unwrap_or_else(|| menus::adults(room))
        .marked(&count.to_string());
    if let Err(e) = turn.session.supply_adults(room, count, marked) {
        reject(turn, e);
        return Ok(());
    }

    turn.session.enter(Stage::AskChildren);
    turn.session.claim_rooms_surface(message_id);
    turn.refresh_rooms(None).await?;
    turn.delete_prompt(message_id).await?;

    turn.ask(texts::ASK_CHILDREN, Some(menus::children_question(room)))
        .await?;
    Ok(())
}

/// "+" on the children question.
pub async fn want_children(
    turn: &mut Turn<'_>,
    message_id: MessageId,
    room: usize,
) -> Result<(), TransportError> {
    if !answers_prompt(turn, message_id) {
        turn.outdated();
        return Ok(());
    }
    let child = match turn.session.want_children(room) {
        Ok(child) => child,
        Err(e) => {
            reject(turn, e);
            return Ok(());
        }
    };

    turn.session.enter(Stage::CollectChildren);
    turn.delete_prompt(message_id).await?;
    ask_child_age(turn, room, child).await
}

pub async fn child_age(
    turn: &mut Turn<'_>,
    message_id: MessageId,
    age: u8,
    room: usize,
) -> Result<(), TransportError> {
    if !answers_prompt(turn, message_id) {
        turn.outdated();
        return Ok(());
    }
    let added = match turn.session.add_child(room, age) {
        Ok(added) => added,
        Err(e) => {
            reject(turn, e);
            return Ok(());
        }
    };

    turn.delete_prompt(message_id).await?;
    if added.closed {
        turn.session.set_current_prompt(None);
        return turn.show_rooms_menu().await;
    }

    turn.refresh_rooms(None).await?;
    match turn.session.want_children(room) {
        Ok(child) => ask_child_age(turn, room, child).await,
        Err(e) => {
            reject(turn, e);
            Ok(())
        }
    }
}

/// "-" on the children question, or the exit button under child ages.
pub async fn no_more_children(
    turn: &mut Turn<'_>,
    message_id: MessageId,
    room: usize,
) -> Result<(), TransportError> {
    if !answers_prompt(turn, message_id) {
        turn.outdated();
        return Ok(());
    }
    if let Err(e) = turn.session.close_room(room) {
        reject(turn, e);
        return Ok(());
    }
    debug!(room, "room closed");

    turn.session.set_current_prompt(None);
    turn.show_rooms_menu().await?;
    turn.delete_prompt(message_id).await
}

async fn ask_child_age(turn: &mut Turn<'_>, room: usize, child: u8) -> Result<(), TransportError> {
    let controls = menus::child_age(room, turn.session.children_exit(room));
    turn.ask(texts::ask_child_age(room, child), Some(controls))
        .await?;
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Rooms summary menus
// ════════════════════════════════════════════════════════════════════════════

/// "Edit rooms": one button per room.
pub async fn edit_menu(turn: &mut Turn<'_>, message_id: MessageId) -> Result<(), TransportError> {
    if !on_rooms_surface(turn, message_id) {
        turn.outdated();
        return Ok(());
    }
    let total = turn.session.rooms().len();
    turn.edit_controls(message_id, Some(menus::edit_rooms(total)))
        .await
}

pub async fn delete_menu(turn: &mut Turn<'_>, message_id: MessageId) -> Result<(), TransportError> {
    if !on_rooms_surface(turn, message_id) {
        turn.outdated();
        return Ok(());
    }
    let total = turn.session.rooms().len();
    turn.edit_controls(message_id, Some(menus::delete_rooms(total)))
        .await
}

pub async fn add_room(turn: &mut Turn<'_>, message_id: MessageId) -> Result<(), TransportError> {
    if !on_rooms_surface(turn, message_id) {
        turn.outdated();
        return Ok(());
    }
    let room = match turn.session.add_room() {
        Ok(room) => room,
        Err(e) => {
            reject(turn, e);
            return Ok(());
        }
    };
    info!(room, "room added");

    let total = turn.session.rooms().len();
    turn.edit_controls(message_id, Some(menus::rooms_menu(total)))
        .await?;
    let controls = turn.session.adults_control(room);
    turn.ask(texts::ask_adults(room), Some(controls)).await?;
    Ok(())
}

/// Reopens `room` from the edit list.
pub async fn edit_room(
    turn: &mut Turn<'_>,
    message_id: MessageId,
    room: usize,
) -> Result<(), TransportError> {
    if !on_rooms_surface(turn, message_id) {
        turn.outdated();
        return Ok(());
    }
    if let Err(e) = turn.session.edit_room(room) {
        reject(turn, e);
        return Ok(());
    }
    debug!(room, "room reopened");

    let total = turn.session.rooms().len();
    turn.edit_controls(message_id, Some(menus::rooms_menu(total)))
        .await?;
    let controls = turn.session.adults_control(room);
    turn.ask(texts::ask_adults(room), Some(controls)).await?;
    Ok(())
}

pub async fn delete_room(
    turn: &mut Turn<'_>,
    message_id: MessageId,
    room: usize,
) -> Result<(), TransportError> {
    if !on_rooms_surface(turn, message_id) {
        turn.outdated();
        return Ok(());
    }
    if let Err(e) = turn.session.delete_room(room) {
        reject(turn, e);
        return Ok(());
    }
    info!(room, remaining = turn.session.rooms().len(), "room deleted");
    turn.show_rooms_menu().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordingTransport;
    use crate::domain::booking::{BookingSession, RoomEditState, SearchCommand, MAX_CHILDREN};
    use crate::domain::foundation::{ChatId, UserId};
    use crate::ports::{ChatTransport, OutgoingMessage};

    const CHAT: ChatId = ChatId::new(7);

    /// A form with room 0 open and its adults question sent.
    async fn with_open_room(transport: &RecordingTransport) -> (BookingSession, MessageId) {
        let mut session = BookingSession::begin(UserId::new(1), CHAT, SearchCommand::LowPrice);
        session.enter(Stage::OpenRoom);
        let room = session.add_room().unwrap();
        let prompt = transport
            .send_message(
                CHAT,
                OutgoingMessage::text(texts::ask_adults(room))
                    .with_controls(session.adults_control(room)),
            )
            .await
            .unwrap();
        session.set_current_prompt(Some(prompt));
        (session, prompt)
    }

    fn last_prompt(transport: &RecordingTransport) -> (MessageId, String) {
        let (id, message) = transport.last_sent(CHAT).unwrap();
        (id, message.text)
    }

    mod guests {
        use super::*;

        #[tokio::test]
        async fn adults_turn_prompt_into_rooms_summary() {
            let transport = RecordingTransport::default();
            let (session, prompt) = with_open_room(&transport).await;
            let mut turn = Turn::new(&transport, session, CHAT);

            super::super::adults(&mut turn, prompt, 2, 0, None).await.unwrap();

            assert_eq!(turn.session.surfaces().rooms, Some(prompt));
            let summary = transport.message(CHAT, prompt).unwrap();
            assert!(summary.text.contains("Adults: 2"));
            assert!(summary.controls.is_none());
            assert_eq!(last_prompt(&transport).1, texts::ASK_CHILDREN);
            assert_eq!(turn.session.stage(), Stage::AskChildren);
        }

        #[tokio::test]
        async fn adults_for_a_closed_room_are_outdated() {
            let transport = RecordingTransport::default();
            let (session, prompt) = with_open_room(&transport).await;
            let mut turn = Turn::new(&transport, session, CHAT);

            super::super::adults(&mut turn, prompt, 2, 3, None).await.unwrap();

            assert_eq!(turn.notice(), Some(texts::OUTDATED));
        }

        #[tokio::test]
        async fn children_ages_then_exit_shows_rooms_menu() {
            let transport = RecordingTransport::default();
            let (session, prompt) = with_open_room(&transport).await;
            let mut turn = Turn::new(&transport, session, CHAT);
            super::super::adults(&mut turn, prompt, 2, 0, None).await.unwrap();

            let (question, _) = last_prompt(&transport);
            want_children(&mut turn, question, 0).await.unwrap();
            let (age_prompt, text) = last_prompt(&transport);
            assert_eq!(text, texts::ask_child_age(0, 1));

            child_age(&mut turn, age_prompt, 4, 0).await.unwrap();
            let (age_prompt, text) = last_prompt(&transport);
            assert_eq!(text, texts::ask_child_age(0, 2));

            no_more_children(&mut turn, age_prompt, 0).await.unwrap();

            assert!(turn.session.guest_cycle().is_idle());
            assert!(transport.is_deleted(CHAT, age_prompt));
            let summary = transport.message(CHAT, prompt).unwrap();
            assert!(summary.text.contains("Children: 1 (4)"));
            assert_eq!(summary.controls, Some(menus::rooms_menu(1)));
        }

        #[tokio::test]
        async fn sixth_child_closes_the_room() {
            let transport = RecordingTransport::default();
            let (session, prompt) = with_open_room(&transport).await;
            let mut turn = Turn::new(&transport, session, CHAT);
            super::super::adults(&mut turn, prompt, 1, 0, None).await.unwrap();
            let (question, _) = last_prompt(&transport);
            want_children(&mut turn, question, 0).await.unwrap();

            for _ in 0..MAX_CHILDREN {
                let (age_prompt, _) = last_prompt(&transport);
                child_age(&mut turn, age_prompt, 5, 0).await.unwrap();
            }

            assert!(turn.session.guest_cycle().is_idle());
            assert_eq!(turn.session.rooms().get(0).unwrap().children().len(), MAX_CHILDREN);
            assert_eq!(
                transport.message(CHAT, prompt).unwrap().controls,
                Some(menus::rooms_menu(1))
            );
        }
    }

    mod repeated_presses {
        use super::*;

        #[tokio::test]
        async fn second_age_press_on_the_same_question_is_outdated() {
            let transport = RecordingTransport::default();
            let (session, prompt) = with_open_room(&transport).await;
            let mut turn = Turn::new(&transport, session, CHAT);
            super::super::adults(&mut turn, prompt, 2, 0, None).await.unwrap();
            let (question, _) = last_prompt(&transport);
            want_children(&mut turn, question, 0).await.unwrap();
            let (age_prompt, _) = last_prompt(&transport);

            child_age(&mut turn, age_prompt, 4, 0).await.unwrap();
            assert_eq!(turn.notice(), None);
            child_age(&mut turn, age_prompt, 4, 0).await.unwrap();

            assert_eq!(turn.notice(), Some(texts::OUTDATED));
            assert_eq!(turn.session.rooms().get(0).unwrap().children(), &[4]);
            assert_eq!(last_prompt(&transport).1, texts::ask_child_age(0, 2));
        }

        #[tokio::test]
        async fn second_plus_does_not_ask_twice() {
            let transport = RecordingTransport::default();
            let (session, prompt) = with_open_room(&transport).await;
            let mut turn = Turn::new(&transport, session, CHAT);
            super::super::adults(&mut turn, prompt, 2, 0, None).await.unwrap();
            let (question, _) = last_prompt(&transport);

            want_children(&mut turn, question, 0).await.unwrap();
            let (age_prompt, _) = last_prompt(&transport);
            want_children(&mut turn, question, 0).await.unwrap();

            assert_eq!(turn.notice(), Some(texts::OUTDATED));
            assert_eq!(last_prompt(&transport).0, age_prompt);
        }

        #[tokio::test]
        async fn adults_on_the_rooms_summary_are_outdated() {
            let transport = RecordingTransport::default();
            let (session, prompt) = with_open_room(&transport).await;
            let mut turn = Turn::new(&transport, session, CHAT);
            super::super::adults(&mut turn, prompt, 2, 0, None).await.unwrap();

            super::super::adults(&mut turn, prompt, 3, 0, None).await.unwrap();

            assert_eq!(turn.notice(), Some(texts::OUTDATED));
            assert_eq!(turn.session.rooms().get(0).unwrap().adults(), Some(2));
            assert_eq!(turn.session.stage(), Stage::AskChildren);
        }
    }

    mod menus_on_rooms_summary {
        use super::*;

        async fn closed_room(transport: &RecordingTransport) -> Turn<'_> {
            let (session, prompt) = with_open_room(transport).await;
            let mut turn = Turn::new(transport, session, CHAT);
            super::super::adults(&mut turn, prompt, 2, 0, None).await.unwrap();
            let (question, _) = last_prompt(transport);
            no_more_children(&mut turn, question, 0).await.unwrap();
            turn
        }

        #[tokio::test]
        async fn second_room_cannot_open_while_one_is_open() {
            let transport = RecordingTransport::default();
            let mut turn = closed_room(&transport).await;
            let surface = turn.session.surfaces().rooms.unwrap();

            add_room(&mut turn, surface).await.unwrap();
            assert_eq!(turn.session.guest_cycle().open_room(), Some(1));

            add_room(&mut turn, surface).await.unwrap();
            assert_eq!(turn.session.rooms().len(), 2);
            assert!(turn.notice().is_some());
        }

        #[tokio::test]
        async fn edit_list_reopens_a_room() {
            let transport = RecordingTransport::default();
            let mut turn = closed_room(&transport).await;
            let surface = turn.session.surfaces().rooms.unwrap();

            edit_menu(&mut turn, surface).await.unwrap();
            let controls = transport.message(CHAT, surface).unwrap().controls.unwrap();
            assert_eq!(controls, menus::edit_rooms(1));

            edit_room(&mut turn, surface, 0).await.unwrap();

            assert_eq!(turn.session.guest_cycle().open_room(), Some(0));
            let (_, asked) = transport.last_sent(CHAT).unwrap();
            let adults = asked.controls.unwrap();
            assert_eq!(adults.buttons().filter(|b| b.is_marked()).count(), 1);
        }

        #[tokio::test]
        async fn deleting_the_only_room_is_refused() {
            let transport = RecordingTransport::default();
            let mut turn = closed_room(&transport).await;
            let surface = turn.session.surfaces().rooms.unwrap();

            delete_room(&mut turn, surface, 0).await.unwrap();

            assert_eq!(turn.session.rooms().len(), 1);
            assert!(turn.notice().is_some());
        }

        #[tokio::test]
        async fn menus_only_work_on_the_rooms_summary() {
            let transport = RecordingTransport::default();
            let mut turn = closed_room(&transport).await;

            delete_menu(&mut turn, MessageId::new(99)).await.unwrap();

            assert_eq!(turn.notice(), Some(texts::OUTDATED));
        }
    }
}
