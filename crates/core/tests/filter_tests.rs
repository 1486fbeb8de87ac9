// ═══════════════════════════════════════════════════════════════════
// Filter Tests — parse_multi_value, FilterController validation,
// defaults, reset, search text and debounce
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use stock_variance_core::errors::CoreError;
use stock_variance_core::models::filters::{FilterInput, Filters, TextField};
use stock_variance_core::services::filter_service::{parse_multi_value, FilterController};
use stock_variance_core::services::search_service::SearchDebouncer;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn controller() -> FilterController {
    FilterController::new(date(2025, 3, 15), Duration::from_millis(200))
}

// ── parse_multi_value ───────────────────────────────────────────────

mod parse_multi_value_tests {
    use super::*;

    #[test]
    fn splits_on_mixed_delimiter_runs() {
        assert_eq!(parse_multi_value("a, b;;c\nd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_string_yields_nothing() {
        assert!(parse_multi_value("").is_empty());
    }

    #[test]
    fn only_delimiters_and_spaces_yield_nothing() {
        assert!(parse_multi_value(" ,;\n ; , ").is_empty());
    }

    #[test]
    fn keeps_inner_spaces() {
        assert_eq!(
            parse_multi_value("blue widget; red gadget"),
            vec!["blue widget", "red gadget"]
        );
    }

    #[test]
    fn pre_split_list_is_trimmed_and_filtered() {
        let input = FilterInput::from(vec![" A1 ", "", "   ", "B2"]);
        assert_eq!(parse_multi_value(input), vec!["A1", "B2"]);
    }

    #[test]
    fn pre_split_list_is_not_split_again() {
        let input = FilterInput::List(vec!["a,b".to_string()]);
        assert_eq!(parse_multi_value(input), vec!["a,b"]);
    }
}

// ── Defaults ────────────────────────────────────────────────────────

mod defaults {
    use super::*;

    #[test]
    fn year_to_date_range() {
        let c = controller();
        assert_eq!(c.from_date(), Some(date(2025, 1, 1)));
        assert_eq!(c.to_date(), Some(date(2025, 3, 15)));
    }

    #[test]
    fn text_fields_start_empty() {
        let c = controller();
        for field in TextField::ALL {
            assert!(c.text_field(field).is_empty());
        }
        assert_eq!(c.search_query(), "");
    }

    #[test]
    fn defaults_produce_valid_filters() {
        let filters = controller().get_values().unwrap();
        assert_eq!(filters, Filters::new(date(2025, 1, 1), date(2025, 3, 15)));
    }

    #[test]
    fn new_years_day_range_is_a_single_day() {
        let c = FilterController::new(date(2025, 1, 1), Duration::from_millis(200));
        let filters = c.get_values().unwrap();
        assert_eq!(filters.from_date, filters.to_date);
    }
}

// ── Validation ──────────────────────────────────────────────────────

mod validation {
    use super::*;

    #[test]
    fn missing_from_date_fails() {
        let mut c = controller();
        c.set_from_date(None);
        assert!(matches!(c.get_values(), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn missing_to_date_fails() {
        let mut c = controller();
        c.set_to_date(None);
        assert!(matches!(c.get_values(), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn both_dates_missing_fails_with_message() {
        let mut c = controller();
        c.set_from_date(None);
        c.set_to_date(None);
        let err = c.get_values().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Please select both From Date and To Date."
        );
    }

    #[test]
    fn inverted_range_fails() {
        let mut c = controller();
        c.set_from_date(Some(date(2025, 4, 1)));
        c.set_to_date(Some(date(2025, 3, 1)));
        let err = c.get_values().unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(err.to_string().contains("cannot be later"));
    }

    #[test]
    fn text_fields_flow_into_filters() {
        let mut c = controller();
        c.set_text_field(TextField::Code, "ABC1, ABC2");
        c.set_text_field(TextField::Brand, vec!["Acme"]);
        let filters = c.get_values().unwrap();
        assert_eq!(filters.code, vec!["ABC1", "ABC2"]);
        assert_eq!(filters.brand, vec!["Acme"]);
        assert!(filters.designation.is_empty());
        assert!(filters.main_category.is_empty());
    }

    #[test]
    fn clearing_a_text_field_removes_it() {
        let mut c = controller();
        c.set_text_field(TextField::Designation, "widget");
        c.set_text_field(TextField::Designation, " ; ");
        assert!(c.text_field(TextField::Designation).is_empty());
    }

    #[test]
    fn empty_text_fields_are_omitted_from_request_json() {
        let mut c = controller();
        c.set_text_field(TextField::MainCategory, "Tools");
        let json = serde_json::to_value(c.get_values().unwrap()).unwrap();
        assert_eq!(json["from_date"], "2025-01-01");
        assert_eq!(json["to_date"], "2025-03-15");
        assert_eq!(json["main_category"], serde_json::json!(["Tools"]));
        assert!(json.get("code").is_none());
        assert!(json.get("brand").is_none());
    }
}

// ── Reset ───────────────────────────────────────────────────────────

mod reset {
    use super::*;

    #[test]
    fn restores_defaults_and_clears_text() {
        let mut c = controller();
        c.set_from_date(None);
        c.set_text_field(TextField::Code, "X1");
        c.set_search("Widget");
        c.reset();

        assert_eq!(c.from_date(), Some(date(2025, 1, 1)));
        assert_eq!(c.to_date(), Some(date(2025, 3, 15)));
        assert!(c.text_field(TextField::Code).is_empty());
        assert_eq!(c.search_query(), "");
    }

    #[test]
    fn recomputes_defaults_from_the_current_date() {
        let clock = Arc::new(Mutex::new(date(2025, 12, 31)));
        let source = Arc::clone(&clock);
        let mut c = FilterController::with_date_source(
            move || *source.lock().unwrap(),
            Duration::from_millis(200),
        );
        assert_eq!(c.from_date(), Some(date(2025, 1, 1)));
        assert_eq!(c.to_date(), Some(date(2025, 12, 31)));

        *clock.lock().unwrap() = date(2026, 1, 2);
        c.reset();

        assert_eq!(c.from_date(), Some(date(2026, 1, 1)));
        assert_eq!(c.to_date(), Some(date(2026, 1, 2)));
    }

    #[test]
    fn pinned_date_survives_reset() {
        let mut c = controller();
        c.set_to_date(Some(date(2025, 2, 1)));
        c.reset();
        assert_eq!(c.to_date(), Some(date(2025, 3, 15)));
    }

    #[test]
    fn drops_pending_search_input() {
        let mut c = controller();
        let t0 = Instant::now();
        c.input_search("abc", t0);
        c.reset();
        assert!(!c.has_pending_search());
        assert_eq!(c.poll_search(t0 + Duration::from_secs(1)), None);
    }
}

// ── Search text ─────────────────────────────────────────────────────

mod search_text {
    use super::*;

    #[test]
    fn set_search_normalizes() {
        let mut c = controller();
        assert!(c.set_search("  ABC Widget "));
        assert_eq!(c.search_query(), "abc widget");
    }

    #[test]
    fn set_search_reports_unchanged_query() {
        let mut c = controller();
        assert!(c.set_search("abc"));
        assert!(!c.set_search(" ABC "));
        assert!(c.set_search(""));
    }

    #[test]
    fn keystroke_burst_settles_once() {
        let mut c = controller();
        let t0 = Instant::now();
        c.input_search("a", t0);
        c.input_search("ab", t0 + Duration::from_millis(50));
        c.input_search("abc", t0 + Duration::from_millis(100));

        assert_eq!(c.poll_search(t0 + Duration::from_millis(250)), None);
        assert_eq!(
            c.poll_search(t0 + Duration::from_millis(300)),
            Some("abc".to_string())
        );
        assert_eq!(c.poll_search(t0 + Duration::from_millis(600)), None);
    }

    #[test]
    fn settled_input_equal_to_current_query_is_not_reported() {
        let mut c = controller();
        c.set_search("abc");
        let t0 = Instant::now();
        c.input_search("ABC", t0);
        assert_eq!(c.poll_search(t0 + Duration::from_millis(200)), None);
        assert!(!c.has_pending_search());
    }
}

// ── SearchDebouncer ─────────────────────────────────────────────────

mod debouncer {
    use super::*;

    #[test]
    fn nothing_pending_initially() {
        let mut d = SearchDebouncer::new(Duration::from_millis(200));
        assert!(!d.is_pending());
        assert_eq!(d.poll(Instant::now()), None);
    }

    #[test]
    fn deadline_moves_with_each_input() {
        let mut d = SearchDebouncer::new(Duration::from_millis(200));
        let t0 = Instant::now();
        d.input("a", t0);
        assert_eq!(d.deadline(), Some(t0 + Duration::from_millis(200)));
        d.input("ab", t0 + Duration::from_millis(150));
        assert_eq!(d.deadline(), Some(t0 + Duration::from_millis(350)));
    }

    #[test]
    fn cancel_drops_pending_text() {
        let mut d = SearchDebouncer::new(Duration::from_millis(200));
        let t0 = Instant::now();
        d.input("a", t0);
        d.cancel();
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn zero_window_fires_on_next_poll() {
        let mut d = SearchDebouncer::new(Duration::ZERO);
        let t0 = Instant::now();
        d.input("x", t0);
        assert_eq!(d.poll(t0), Some("x".to_string()));
    }
}
