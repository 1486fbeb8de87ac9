// ═══════════════════════════════════════════════════════════════════
// Provider Tests — payload coercion, Frappe endpoint & fault parsing,
// DashboardSettings
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use serde_json::{json, Value};

use stock_variance_core::errors::CoreError;
use stock_variance_core::models::filters::Filters;
use stock_variance_core::models::settings::{DashboardSettings, DEFAULT_METHOD};
use stock_variance_core::providers::frappe::{
    endpoint_url, extract_fault_message, FrappeStockHistoryProvider,
};
use stock_variance_core::providers::payload::{
    coerce_price, coerce_quantity, parse_items, parse_items_str,
};
use stock_variance_core::providers::traits::StockHistoryProvider;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

fn settings_for(base_url: &str) -> DashboardSettings {
    DashboardSettings {
        base_url: base_url.to_string(),
        ..DashboardSettings::default()
    }
}

/// Encode `_server_messages` the way Frappe does: a JSON array of JSON strings.
fn server_messages(messages: &[&str]) -> String {
    let entries: Vec<String> = messages
        .iter()
        .map(|m| json!({ "message": m, "indicator": "red" }).to_string())
        .collect();
    serde_json::to_string(&entries).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Coercion policies
// ═══════════════════════════════════════════════════════════════════

mod coercion {
    use super::*;

    #[test]
    fn quantity_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_quantity(Some(&json!(12))), 12.0);
        assert_eq!(coerce_quantity(Some(&json!(-3.5))), -3.5);
        assert_eq!(coerce_quantity(Some(&json!(" 12.5 "))), 12.5);
    }

    #[test]
    fn quantity_defaults_to_zero() {
        assert_eq!(coerce_quantity(None), 0.0);
        assert_eq!(coerce_quantity(Some(&Value::Null)), 0.0);
        assert_eq!(coerce_quantity(Some(&json!("abc"))), 0.0);
        assert_eq!(coerce_quantity(Some(&json!(true))), 0.0);
        assert_eq!(coerce_quantity(Some(&json!("NaN"))), 0.0);
        assert_eq!(coerce_quantity(Some(&json!("inf"))), 0.0);
    }

    #[test]
    fn price_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_price(Some(&json!(4.5))), Some(4.5));
        assert_eq!(coerce_price(Some(&json!("12.5"))), Some(12.5));
        assert_eq!(coerce_price(Some(&json!(0))), Some(0.0));
    }

    #[test]
    fn price_is_absent_when_unreadable() {
        assert_eq!(coerce_price(None), None);
        assert_eq!(coerce_price(Some(&Value::Null)), None);
        assert_eq!(coerce_price(Some(&json!("abc"))), None);
        assert_eq!(coerce_price(Some(&json!(""))), None);
        assert_eq!(coerce_price(Some(&json!([1.0]))), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Payload parsing
// ═══════════════════════════════════════════════════════════════════

mod payload {
    use super::*;

    #[test]
    fn null_document_is_empty() {
        assert!(parse_items(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn missing_or_null_items_is_empty() {
        assert!(parse_items(json!({})).unwrap().is_empty());
        assert!(parse_items(json!({ "items": null })).unwrap().is_empty());
        assert!(parse_items_str(r#"{"items": []}"#).unwrap().is_empty());
    }

    #[test]
    fn unreadable_shape_is_deserialization_error() {
        let err = parse_items(json!({ "items": "nope" })).unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));

        let err = parse_items_str("{not json").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn full_item_is_typed() {
        let items = parse_items(json!({
            "items": [{
                "code": "ABC123",
                "designation": "Widget",
                "brand": "BrandX",
                "main_category": "Catg1",
                "price": "4.5",
                "last_updated": "2025-02-01 10:00:00",
                "history": [
                    { "label": "Opening", "date": "", "stock": 100, "price": 4.0 },
                    { "label": "24-01-2025 10:30", "stock": "80", "price": "n/a" }
                ],
                "differences": [
                    { "date": "24-01-2025", "period": "Opening → 24-01-2025 10:30", "difference": -20 }
                ]
            }]
        }))
        .unwrap();

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.code, "ABC123");
        assert_eq!(item.designation.as_deref(), Some("Widget"));
        assert_eq!(item.brand.as_deref(), Some("BrandX"));
        assert_eq!(item.main_category.as_deref(), Some("Catg1"));
        assert_eq!(item.price, Some(4.5));
        assert_eq!(item.last_updated.as_deref(), Some("2025-02-01 10:00:00"));

        assert_eq!(item.history[0].date, "Opening");
        assert_eq!(item.history[0].price, Some(4.0));
        assert_eq!(item.history[1].date, "24-01-2025");
        assert_eq!(item.history[1].stock, 80.0);
        assert_eq!(item.history[1].price, None);

        assert_eq!(item.differences[0].date, "24-01-2025");
        assert_eq!(item.differences[0].difference, -20.0);
        assert_eq!(item.totals.negative, -20.0);
    }

    #[test]
    fn non_numeric_stock_is_zero_but_price_is_absent() {
        let items = parse_items(json!({
            "items": [{
                "code": "X",
                "price": "abc",
                "history": [{ "label": "01-01-2025 08:00", "stock": "abc", "price": "abc" }],
                "differences": [{ "date": "01-01-2025", "difference": "abc" }]
            }]
        }))
        .unwrap();
        let item = &items[0];
        assert_eq!(item.price, None);
        assert_eq!(item.history[0].stock, 0.0);
        assert_eq!(item.history[0].price, None);
        assert_eq!(item.differences[0].difference, 0.0);
    }

    #[test]
    fn difference_date_falls_back_to_period() {
        let items = parse_items(json!({
            "items": [{
                "code": "X",
                "differences": [
                    { "period": "05-01-2025 10:00 → 06-01-2025 09:00", "difference": 2 },
                    { "date": null, "difference": 1 }
                ]
            }]
        }))
        .unwrap();
        assert_eq!(items[0].differences[0].date, "05-01-2025");
        assert_eq!(items[0].differences[1].date, "");
    }

    #[test]
    fn server_totals_are_ignored() {
        let items = parse_items(json!({
            "items": [{
                "code": "X",
                "differences": [
                    { "date": "a", "difference": 30 },
                    { "date": "b", "difference": -5 },
                    { "date": "c", "difference": -15 }
                ],
                "totals": { "positive": 999, "negative": -999 }
            }]
        }))
        .unwrap();
        let totals = items[0].totals;
        assert_eq!(totals.positive, 30.0);
        assert_eq!(totals.negative, -20.0);
        assert_eq!(totals.total_out(), 20.0);
        assert_eq!(totals.total_in(), 30.0);
    }

    #[test]
    fn missing_lists_are_empty() {
        let items = parse_items(json!({ "items": [{ "code": 42 }] })).unwrap();
        assert_eq!(items[0].code, "42");
        assert!(items[0].history.is_empty());
        assert!(!items[0].has_differences());
        assert_eq!(items[0].designation, None);
    }

    #[test]
    fn blank_text_fields_are_absent() {
        let items = parse_items(json!({
            "items": [{ "code": "X", "designation": "  ", "brand": "", "price": "" }]
        }))
        .unwrap();
        assert_eq!(items[0].designation, None);
        assert_eq!(items[0].brand, None);
        assert_eq!(items[0].price, None);
    }

    #[test]
    fn item_order_is_preserved() {
        let items = parse_items_str(
            r#"{"items": [{"code": "C"}, {"code": "A"}, {"code": "B"}]}"#,
        )
        .unwrap();
        let codes: Vec<&str> = items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["C", "A", "B"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Frappe transport helpers
// ═══════════════════════════════════════════════════════════════════

mod frappe {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_method() {
        assert_eq!(
            endpoint_url("https://erp.example.com", DEFAULT_METHOD),
            "https://erp.example.com/api/method/stock_history.api.fetch_stock_variance"
        );
    }

    #[test]
    fn endpoint_tolerates_stray_slashes() {
        assert_eq!(
            endpoint_url(" https://erp.example.com/ ", "/my.method"),
            "https://erp.example.com/api/method/my.method"
        );
    }

    #[test]
    fn server_messages_take_priority() {
        let body = json!({
            "_server_messages": server_messages(&["Too many items", "Narrow your filters"]),
            "message": "ignored",
            "exception": "frappe.exceptions.ValidationError"
        });
        assert_eq!(
            extract_fault_message(&body).as_deref(),
            Some("Too many items\nNarrow your filters")
        );
    }

    #[test]
    fn plain_string_server_messages_are_kept() {
        let raw = serde_json::to_string(&vec!["Plain message".to_string()]).unwrap();
        let body = json!({ "_server_messages": raw });
        assert_eq!(extract_fault_message(&body).as_deref(), Some("Plain message"));
    }

    #[test]
    fn falls_back_to_message_then_exception() {
        let body = json!({ "message": "  Not permitted  " });
        assert_eq!(extract_fault_message(&body).as_deref(), Some("Not permitted"));

        let body = json!({ "message": "", "exception": "PermissionError" });
        assert_eq!(extract_fault_message(&body).as_deref(), Some("PermissionError"));
    }

    #[test]
    fn unreadable_server_messages_fall_through() {
        let body = json!({ "_server_messages": "not json", "message": "fallback" });
        assert_eq!(extract_fault_message(&body).as_deref(), Some("fallback"));
    }

    #[test]
    fn no_message_is_none() {
        assert_eq!(extract_fault_message(&json!({})), None);
        assert_eq!(extract_fault_message(&Value::Null), None);
        assert_eq!(extract_fault_message(&json!({ "message": { "items": [] } })), None);
    }

    #[test]
    fn provider_requires_base_url() {
        let err = FrappeStockHistoryProvider::new(&settings_for("  ")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidSettings(_)));
    }

    #[test]
    fn provider_rejects_invalid_settings() {
        let settings = DashboardSettings {
            method: String::new(),
            ..settings_for("https://erp.example.com")
        };
        assert!(matches!(
            FrappeStockHistoryProvider::new(&settings),
            Err(CoreError::InvalidSettings(_))
        ));
    }

    #[test]
    fn provider_builds_endpoint_from_settings() {
        let provider = FrappeStockHistoryProvider::new(&settings_for("https://erp.example.com/")).unwrap();
        assert_eq!(provider.name(), "Frappe");
        assert_eq!(
            provider.endpoint(),
            "https://erp.example.com/api/method/stock_history.api.fetch_stock_variance"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let settings = DashboardSettings {
            request_timeout_secs: 2,
            ..settings_for("http://127.0.0.1:9")
        };
        let provider = FrappeStockHistoryProvider::new(&settings).unwrap();
        let filters = Filters::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        );
        let err = provider.fetch_stock_history(&filters).await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
        assert!(!err.to_string().contains("127.0.0.1:9"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// DashboardSettings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = DashboardSettings::default();
        assert_eq!(s.method, DEFAULT_METHOD);
        assert_eq!(s.search_debounce_ms, 200);
        assert_eq!(s.request_timeout_secs, 30);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let s = DashboardSettings::from_json(r#"{"base_url": "https://erp.example.com"}"#).unwrap();
        assert_eq!(s.base_url, "https://erp.example.com");
        assert_eq!(s.method, DEFAULT_METHOD);
        assert_eq!(s.search_debounce().as_millis(), 200);
    }

    #[test]
    fn from_json_rejects_out_of_range_debounce() {
        let err = DashboardSettings::from_json(r#"{"search_debounce_ms": 60000}"#).unwrap_err();
        assert!(matches!(err, CoreError::InvalidSettings(_)));
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        let err = DashboardSettings::from_json("42").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let s = DashboardSettings {
            request_timeout_secs: 0,
            ..DashboardSettings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn authorization_needs_both_credentials() {
        let mut s = DashboardSettings::default();
        assert_eq!(s.authorization_header(), None);

        s.api_keys.insert("api_key".into(), "k1".into());
        assert_eq!(s.authorization_header(), None);

        s.api_keys.insert("api_secret".into(), "s1".into());
        assert_eq!(s.authorization_header().as_deref(), Some("token k1:s1"));
    }

    #[test]
    fn serde_roundtrip_keeps_credentials() {
        let mut s = settings_for("https://erp.example.com");
        s.api_keys.insert("api_key".into(), "k".into());
        s.currency_symbol = Some("€".into());
        let back: DashboardSettings = serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();
        assert_eq!(back, s);
    }
}
