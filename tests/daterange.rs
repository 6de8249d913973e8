use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use stratus::{
    clear_registry, load_signatures, ComputedObject, DateRange, DateRangeArg, ErrorKind,
    ParamType, Parameter, Signature, Value,
};

// Global test mutex to prevent concurrent access to the shared registry
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn catalog() -> Vec<Signature> {
    vec![
        Signature::new(
            "DateRange",
            "DateRange",
            vec![
                Parameter::new("start", ParamType::Date),
                Parameter::optional("end", ParamType::Date),
                Parameter::optional("timeZone", ParamType::String),
            ],
        ),
        Signature::new("DateRange.unbounded", "DateRange", vec![]),
        Signature::new(
            "DateRange.contains",
            "Boolean",
            vec![
                Parameter::new("dateRange", ParamType::Object("DateRange".to_string())),
                Parameter::new("other", ParamType::Any),
            ],
        ),
    ]
}

fn setup() {
    clear_registry().unwrap();
    load_signatures(catalog()).unwrap();
}

fn millis(y: i32, mo: u32, d: u32, h: u32) -> i64 {
    Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap().timestamp_millis()
}

#[test]
fn test_numeric_endpoints() {
    let _lock = TEST_MUTEX.lock().unwrap();
    setup();

    let start = millis(2017, 6, 24, 7);
    let end = millis(2017, 6, 24, 14);
    assert_eq!(start, 1498287600000);
    assert_eq!(end, 1498312800000);

    let range = DateRange::new(start, Some(end.into()), None).unwrap();
    assert_eq!(range.func().unwrap().name(), "DateRange");
    assert_eq!(range.args().len(), 2);
    assert_eq!(
        range.args()["start"].as_literal(),
        Some(&Value::Number(start as f64))
    );
    assert_eq!(
        range.args()["end"].as_literal(),
        Some(&Value::Number(end as f64))
    );
    assert!(!range.args().contains_key("timeZone"));
    assert_eq!(range.var_name(), None);
}

#[test]
fn test_string_endpoints_with_time_zone() {
    let _lock = TEST_MUTEX.lock().unwrap();
    setup();

    let range = DateRange::new(
        "2017-06-24",
        Some("2017-07-24".into()),
        Some("UTC".into()),
    )
    .unwrap();
    assert_eq!(range.args().len(), 3);
    assert_eq!(
        range.args()["start"].as_literal(),
        Some(&Value::String("2017-06-24".to_string()))
    );
    assert_eq!(
        range.args()["end"].as_literal(),
        Some(&Value::String("2017-07-24".to_string()))
    );
    assert_eq!(
        range.args()["timeZone"].as_literal(),
        Some(&Value::String("UTC".to_string()))
    );
}

#[test]
fn test_time_zone_without_end() {
    let _lock = TEST_MUTEX.lock().unwrap();
    setup();

    let range = DateRange::new(
        "2017-06-24T07:00:00",
        None,
        Some("America/Los_Angeles".into()),
    )
    .unwrap();
    assert_eq!(range.args().len(), 2);
    assert!(range.args().contains_key("start"));
    assert!(range.args().contains_key("timeZone"));
    assert!(!range.args().contains_key("end"));
}

#[test]
fn test_start_only() {
    let _lock = TEST_MUTEX.lock().unwrap();
    setup();

    let range = DateRange::new(1498287600000i64, None, None).unwrap();
    assert_eq!(range.args().len(), 1);
    assert_eq!(
        range.args()["start"].as_literal(),
        Some(&Value::Number(1498287600000.0))
    );
}

#[test]
fn test_cast_adopts_node_already_returning_date_range() {
    let _lock = TEST_MUTEX.lock().unwrap();
    setup();

    let first = DateRange::new("2017-06-24", Some("2017-07-24".into()), None).unwrap();
    let node: ComputedObject = first.clone().into();

    let second = DateRange::new(node, None, None).unwrap();
    assert_eq!(second.func(), first.func());
    assert_eq!(second.args(), first.args());
    assert_eq!(second.var_name(), first.var_name());
}

#[test]
fn test_cast_skipped_when_end_is_present() {
    let _lock = TEST_MUTEX.lock().unwrap();
    setup();

    let first = DateRange::new("2017-06-24", None, None).unwrap();
    let node: ComputedObject = first.into();

    // With an extra argument present this is a fresh invocation, not a
    // cast; the node lands in the argument mapping instead.
    let wrapped = DateRange::new(node.clone(), Some("2017-07-24".into()), None).unwrap();
    assert_eq!(wrapped.func().unwrap().name(), "DateRange");
    assert_eq!(wrapped.args()["start"].as_node(), Some(&node));
    assert_eq!(
        wrapped.args()["end"].as_literal(),
        Some(&Value::String("2017-07-24".to_string()))
    );
}

#[test]
fn test_cast_skipped_for_node_of_another_type() {
    let _lock = TEST_MUTEX.lock().unwrap();
    setup();

    let var = ComputedObject::variable("window");
    let range = DateRange::new(var.clone(), None, None).unwrap();
    assert_eq!(range.func().unwrap().name(), "DateRange");
    assert_eq!(range.args()["start"].as_node(), Some(&var));
}

#[test]
fn test_invalid_time_zone_type() {
    let _lock = TEST_MUTEX.lock().unwrap();
    setup();

    let err = DateRange::new(
        "2017-06-24",
        None,
        Some(DateRangeArg::Number(3600.0)),
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert!(err.message.contains("timeZone"));
}

#[test]
fn test_missing_catalog_entry() {
    let _lock = TEST_MUTEX.lock().unwrap();
    clear_registry().unwrap();

    let err = DateRange::new(0i64, None, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownFunction);
}
