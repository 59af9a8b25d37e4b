use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::bookings::BookingState;

/// Transition rules and derived-state computation for the booking lifecycle
pub struct StateMachine;

impl StateMachine {
    /// Check if a state transition is valid
    ///
    /// # Valid transitions
    /// - Scheduled → WaitingForFeedback (slot end time passed)
    /// - Scheduled → Cancelled (explicit client action, terminal)
    /// - WaitingForFeedback → Completed (feedback submitted, terminal)
    ///
    /// Completed and Cancelled are terminal. A booking stuck in
    /// WaitingForFeedback with no feedback stays there indefinitely.
    pub fn is_valid_transition(from: BookingState, to: BookingState) -> bool {
        matches!(
            (from, to),
            (BookingState::Scheduled, BookingState::WaitingForFeedback)
                | (BookingState::Scheduled, BookingState::Cancelled)
                | (BookingState::WaitingForFeedback, BookingState::Completed)
        )
    }

    /// Attempt a transition, returning the new state or an error message
    pub fn transition(from: BookingState, to: BookingState) -> Result<BookingState, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid state transition from {} to {}", from, to))
        }
    }

    /// Compute the authoritative state from the stored one plus the clock.
    ///
    /// The scheduled → waiting_for_feedback transition is time-driven and
    /// lazily evaluated: no background job rewrites rows, so a stored
    /// `scheduled` whose slot end has passed reads as `waiting_for_feedback`.
    /// All other states are returned as stored. The server clock is
    /// authoritative; client clocks are never consulted.
    pub fn derive(
        stored: BookingState,
        booking_date: NaiveDate,
        slot_end: NaiveTime,
        now: NaiveDateTime,
    ) -> BookingState {
        match stored {
            BookingState::Scheduled if booking_date.and_time(slot_end) <= now => {
                BookingState::WaitingForFeedback
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_scheduled_to_waiting() {
        assert!(StateMachine::is_valid_transition(
            BookingState::Scheduled,
            BookingState::WaitingForFeedback
        ));
    }

    #[test]
    fn test_scheduled_to_cancelled() {
        assert!(StateMachine::is_valid_transition(
            BookingState::Scheduled,
            BookingState::Cancelled
        ));
    }

    #[test]
    fn test_waiting_to_completed() {
        assert!(StateMachine::is_valid_transition(
            BookingState::WaitingForFeedback,
            BookingState::Completed
        ));
    }

    #[test]
    fn test_scheduled_cannot_complete_directly() {
        assert!(!StateMachine::is_valid_transition(
            BookingState::Scheduled,
            BookingState::Completed
        ));
    }

    #[test]
    fn test_waiting_cannot_cancel() {
        assert!(!StateMachine::is_valid_transition(
            BookingState::WaitingForFeedback,
            BookingState::Cancelled
        ));
    }

    #[test]
    fn test_completed_is_terminal() {
        for to in [
            BookingState::Scheduled,
            BookingState::WaitingForFeedback,
            BookingState::Cancelled,
        ] {
            assert!(!StateMachine::is_valid_transition(BookingState::Completed, to));
        }
    }

    #[test]
    fn test_cancelled_is_terminal() {
        for to in [
            BookingState::Scheduled,
            BookingState::WaitingForFeedback,
            BookingState::Completed,
        ] {
            assert!(!StateMachine::is_valid_transition(BookingState::Cancelled, to));
        }
    }

    #[test]
    fn test_transition_valid() {
        let result = StateMachine::transition(
            BookingState::WaitingForFeedback,
            BookingState::Completed,
        );
        assert_eq!(result.unwrap(), BookingState::Completed);
    }

    #[test]
    fn test_transition_invalid() {
        let result = StateMachine::transition(BookingState::Completed, BookingState::Cancelled);
        assert!(result.unwrap_err().contains("Invalid state transition"));
    }

    #[test]
    fn test_derive_scheduled_before_slot_end() {
        let derived = StateMachine::derive(
            BookingState::Scheduled,
            date(2025, 4, 15),
            time(10, 0),
            date(2025, 4, 15).and_time(time(9, 30)),
        );
        assert_eq!(derived, BookingState::Scheduled);
    }

    #[test]
    fn test_derive_scheduled_after_slot_end() {
        let derived = StateMachine::derive(
            BookingState::Scheduled,
            date(2025, 4, 15),
            time(10, 0),
            date(2025, 4, 15).and_time(time(10, 1)),
        );
        assert_eq!(derived, BookingState::WaitingForFeedback);
    }

    #[test]
    fn test_derive_scheduled_exactly_at_slot_end() {
        let derived = StateMachine::derive(
            BookingState::Scheduled,
            date(2025, 4, 15),
            time(10, 0),
            date(2025, 4, 15).and_time(time(10, 0)),
        );
        assert_eq!(derived, BookingState::WaitingForFeedback);
    }

    #[test]
    fn test_derive_scheduled_on_past_date() {
        let derived = StateMachine::derive(
            BookingState::Scheduled,
            date(2025, 4, 14),
            time(18, 0),
            date(2025, 4, 15).and_time(time(8, 0)),
        );
        assert_eq!(derived, BookingState::WaitingForFeedback);
    }

    #[test]
    fn test_derive_leaves_other_states_alone() {
        let past = date(2020, 1, 1);
        let now = date(2025, 4, 15).and_time(time(12, 0));
        for state in [
            BookingState::WaitingForFeedback,
            BookingState::Completed,
            BookingState::Cancelled,
        ] {
            assert_eq!(StateMachine::derive(state, past, time(9, 0), now), state);
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn booking_state_strategy() -> impl Strategy<Value = BookingState> {
        prop_oneof![
            Just(BookingState::Scheduled),
            Just(BookingState::WaitingForFeedback),
            Just(BookingState::Completed),
            Just(BookingState::Cancelled),
        ]
    }

    /// Terminal states admit no outgoing transitions
    #[test]
    fn prop_terminal_states_have_no_transitions() {
        proptest!(|(to in booking_state_strategy())| {
            prop_assert!(!StateMachine::is_valid_transition(BookingState::Completed, to));
            prop_assert!(!StateMachine::is_valid_transition(BookingState::Cancelled, to));
        });
    }

    /// Completed is reachable only from WaitingForFeedback
    #[test]
    fn prop_completed_only_via_waiting() {
        proptest!(|(from in booking_state_strategy())| {
            if StateMachine::is_valid_transition(from, BookingState::Completed) {
                prop_assert_eq!(from, BookingState::WaitingForFeedback);
            }
        });
    }

    /// Cancelled is reachable only from Scheduled
    #[test]
    fn prop_cancelled_only_from_scheduled() {
        proptest!(|(from in booking_state_strategy())| {
            if StateMachine::is_valid_transition(from, BookingState::Cancelled) {
                prop_assert_eq!(from, BookingState::Scheduled);
            }
        });
    }

    /// transition() and is_valid_transition() agree
    #[test]
    fn prop_transition_consistency() {
        proptest!(|(
            from in booking_state_strategy(),
            to in booking_state_strategy()
        )| {
            let is_valid = StateMachine::is_valid_transition(from, to);
            let result = StateMachine::transition(from, to);
            prop_assert_eq!(is_valid, result.is_ok());
        });
    }

    /// Deriving never resurrects a terminal or waiting state into Scheduled
    #[test]
    fn prop_derive_only_advances_scheduled() {
        proptest!(|(stored in booking_state_strategy())| {
            let date = chrono::NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
            let end = chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap();
            let now = date.and_time(chrono::NaiveTime::from_hms_opt(23, 0, 0).unwrap());
            let derived = StateMachine::derive(stored, date, end, now);
            if stored != BookingState::Scheduled {
                prop_assert_eq!(derived, stored);
            } else {
                prop_assert_eq!(derived, BookingState::WaitingForFeedback);
            }
        });
    }
}
