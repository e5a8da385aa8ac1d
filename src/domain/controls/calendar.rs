//! Month-grid date picker rendered as an inline keyboard.

use chrono::{Datelike, Days, Months, NaiveDate};

use super::callback::{CallbackAction, CalendarKind, CalendarStep};
use super::keyboard::{InlineButton, InlineKeyboard, CHOICE_MARK};

/// Days after today the check-in picker reaches.
pub const CHECK_IN_HORIZON_DAYS: u64 = 365;

/// Days after check-in the check-out picker reaches.
pub const CHECK_OUT_HORIZON_DAYS: u64 = 366;

const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
const BLANK: &str = " ";

/// Result of pressing a calendar button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarOutcome {
    /// Redraw with another month.
    Month(InlineKeyboard),
    /// A day inside the allowed range was chosen.
    Picked(NaiveDate),
    /// Out-of-range day or month; nothing changes.
    Rejected,
}

/// A date picker limited to `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    kind: CalendarKind,
    min: NaiveDate,
    max: NaiveDate,
    current: Option<NaiveDate>,
}

impl Calendar {
    /// Check-in picker: today through a year ahead.
    pub fn check_in(today: NaiveDate, current: Option<NaiveDate>) -> Self {
        Self {
            kind: CalendarKind::CheckIn,
            min: today,
            max: today + Days::new(CHECK_IN_HORIZON_DAYS),
            current,
        }
    }

    /// Check-out picker: the day after check-in through a year after that.
    pub fn check_out(check_in: NaiveDate, current: Option<NaiveDate>) -> Self {
        Self {
            kind: CalendarKind::CheckOut,
            min: check_in + Days::new(1),
            max: check_in + Days::new(CHECK_OUT_HORIZON_DAYS),
            current,
        }
    }

    pub fn kind(&self) -> CalendarKind {
        self.kind
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.min && date <= self.max
    }

    /// First view: the month of the earliest selectable day.
    pub fn initial(&self) -> InlineKeyboard {
        self.month_view(first_of_month(self.min))
    }

    /// Applies a button press.
    pub fn process(&self, step: CalendarStep) -> CalendarOutcome {
        match step {
            CalendarStep::Pick(date) if self.contains(date) => CalendarOutcome::Picked(date),
            CalendarStep::Navigate(month) if self.month_in_range(first_of_month(month)) => {
                CalendarOutcome::Month(self.month_view(first_of_month(month)))
            }
            _ => CalendarOutcome::Rejected,
        }
    }

    /// Keyboard for the month starting at `month` (a first-of-month date).
    pub fn month_view(&self, month: NaiveDate) -> InlineKeyboard {
        let mut kb = InlineKeyboard::default();
        kb.push_row(vec![ignore(month.format("%B %Y").to_string())]);
        kb.push_row(WEEKDAYS.iter().map(|d| ignore(*d)).collect());

        let lead = month.weekday().num_days_from_monday() as usize;
        let mut cells: Vec<InlineButton> = (0..lead).map(|_| ignore(BLANK)).collect();
        let mut day = month;
        while day.month() == month.month() {
            cells.push(if self.contains(day) {
                InlineButton::new(day.day().to_string(), self.payload(CalendarStep::Pick(day)))
            } else {
                ignore(BLANK)
            });
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        while cells.len() % 7 != 0 {
            cells.push(ignore(BLANK));
        }
        for week in cells.chunks(7) {
            kb.push_row(week.to_vec());
        }

        kb.push_row(vec![
            self.nav_button("<", month.checked_sub_months(Months::new(1))),
            self.nav_button(">", month.checked_add_months(Months::new(1))),
        ]);

        if let Some(current) = self.current.filter(|d| self.contains(*d)) {
            kb.push_row(vec![InlineButton::new(
                format!("{}Current choice: {}", CHOICE_MARK, current),
                self.payload(CalendarStep::Pick(current)),
            )]);
        }
        kb
    }

    fn nav_button(&self, text: &str, target: Option<NaiveDate>) -> InlineButton {
        match target.filter(|m| self.month_in_range(*m)) {
            Some(m) => InlineButton::new(text, self.payload(CalendarStep::Navigate(m))),
            None => ignore(BLANK),
        }
    }

    /// True if any day of the month starting at `month` is selectable.
    fn month_in_range(&self, month: NaiveDate) -> bool {
        let last = month
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(month);
        last >= self.min && month <= self.max
    }

    fn payload(&self, step: CalendarStep) -> String {
        CallbackAction::Calendar {
            kind: self.kind,
            step,
        }
        .to_string()
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn ignore(text: impl Into<String>) -> InlineButton {
    InlineButton::new(text, CallbackAction::Ignore.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pickable_days(kb: &InlineKeyboard) -> Vec<String> {
        kb.buttons()
            .filter(|b| b.callback_data.contains(":p:") && !b.is_marked())
            .map(|b| b.text.clone())
            .collect()
    }

    #[test]
    fn check_in_bounds_span_a_year() {
        let cal = Calendar::check_in(date(2025, 6, 15), None);
        assert!(cal.contains(date(2025, 6, 15)));
        assert!(!cal.contains(date(2025, 6, 14)));
        assert!(cal.contains(date(2026, 6, 15)));
        assert!(!cal.contains(date(2026, 6, 16)));
    }

    #[test]
    fn check_out_starts_the_day_after_check_in() {
        let cal = Calendar::check_out(date(2025, 6, 15), None);
        assert!(!cal.contains(date(2025, 6, 15)));
        assert!(cal.contains(date(2025, 6, 16)));
        assert!(cal.contains(date(2026, 6, 16)));
        assert!(!cal.contains(date(2026, 6, 17)));
    }

    #[test]
    fn initial_view_hides_past_days() {
        let cal = Calendar::check_in(date(2025, 6, 28), None);
        let days = pickable_days(&cal.initial());
        assert_eq!(days, vec!["28", "29", "30"]);
    }

    #[test]
    fn no_navigation_before_first_month() {
        let cal = Calendar::check_in(date(2025, 6, 28), None);
        let kb = cal.initial();
        let nav = kb.rows().iter().rev().next().unwrap();
        assert_eq!(nav[0].callback_data, "ignore");
        assert_eq!(nav[1].callback_data, "cal1:n:2025-07-01");
    }

    #[test]
    fn weeks_start_on_monday() {
        // 2025-06-01 is a Sunday.
        let cal = Calendar::check_in(date(2025, 6, 1), None);
        let kb = cal.initial();
        let first_week = &kb.rows()[2];
        assert_eq!(first_week.len(), 7);
        assert_eq!(first_week[6].text, "1");
        assert!(first_week[..6].iter().all(|b| b.callback_data == "ignore"));
    }

    #[test]
    fn pick_outside_range_is_rejected() {
        let cal = Calendar::check_out(date(2025, 6, 15), None);
        assert_eq!(
            cal.process(CalendarStep::Pick(date(2025, 6, 15))),
            CalendarOutcome::Rejected
        );
        assert_eq!(
            cal.process(CalendarStep::Pick(date(2025, 6, 20))),
            CalendarOutcome::Picked(date(2025, 6, 20))
        );
    }

    #[test]
    fn navigate_redraws_month() {
        let cal = Calendar::check_in(date(2025, 6, 15), None);
        match cal.process(CalendarStep::Navigate(date(2025, 8, 1))) {
            CalendarOutcome::Month(kb) => assert_eq!(kb.rows()[0][0].text, "August 2025"),
            other => panic!("expected month view, got {:?}", other),
        }
        assert_eq!(
            cal.process(CalendarStep::Navigate(date(2027, 1, 1))),
            CalendarOutcome::Rejected
        );
    }

    #[test]
    fn current_choice_button_reselects_date() {
        let cal = Calendar::check_in(date(2025, 6, 15), Some(date(2025, 7, 2)));
        let kb = cal.initial();
        let last = kb.rows().last().unwrap();
        assert_eq!(last[0].text, "✅ Current choice: 2025-07-02");
        assert_eq!(last[0].callback_data, "cal1:p:2025-07-02");
    }
}
