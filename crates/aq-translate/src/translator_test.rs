use super::*;
use crate::error::TranslateError;

fn students_only() -> Schema {
    Schema::from_tables([("students", vec!["id", "name", "city"])]).unwrap()
}

fn school() -> Schema {
    Schema::from_tables([
        ("students", vec!["id", "name", "city"]),
        ("courses", vec!["id", "course_name"]),
    ])
    .unwrap()
}

#[test]
fn test_grouped_count_question() {
    let generated = translate(
        "how many students by city",
        &students_only(),
        &VocabularyConfig::default(),
    )
    .unwrap();
    assert_eq!(
        generated.sql,
        "SELECT city, COUNT(*) AS count FROM students GROUP BY city;"
    );
    assert!(generated.params.is_empty());
}

#[test]
fn test_filter_and_sort_question() {
    let generated = translate(
        "students in bangalore order by name",
        &students_only(),
        &VocabularyConfig::default(),
    )
    .unwrap();
    assert_eq!(
        generated.display_sql,
        "SELECT * FROM students WHERE city = 'Bangalore' ORDER BY name ASC;"
    );
    assert_eq!(
        generated.sql,
        "SELECT * FROM students WHERE city = ? ORDER BY name ASC;"
    );
    assert_eq!(generated.params, vec!["Bangalore"]);
}

#[test]
fn test_no_table_in_multi_table_schema() {
    let err = translate("show me everything", &school(), &VocabularyConfig::default()).unwrap_err();
    assert!(matches!(err, TranslateError::NoTableDetected));
    assert_eq!(err.to_string(), "[T001] No valid table mentioned in question");
}

#[test]
fn test_typo_corrected_before_counting() {
    let translator = Translator::new(VocabularyConfig::default()).unwrap();
    let translation = translator
        .translate("How  MNY courses", &school())
        .unwrap();
    assert_eq!(translation.question.as_str(), "how many courses");
    assert!(translation.intent.aggregate);
    assert_eq!(translation.sql.sql, "SELECT COUNT(*) AS count FROM courses;");
}

#[test]
fn test_limit_and_columns() {
    let generated = translate(
        "name of top 3 courses",
        &school(),
        &VocabularyConfig::default(),
    )
    .unwrap();
    assert_eq!(generated.sql, "SELECT * FROM courses LIMIT 3;");
}

#[test]
fn test_projected_columns() {
    let generated = translate(
        "course_name of courses",
        &school(),
        &VocabularyConfig::default(),
    )
    .unwrap();
    assert_eq!(generated.sql, "SELECT course_name FROM courses;");
}

#[test]
fn test_custom_city_vocabulary() {
    let vocabulary = VocabularyConfig {
        cities: vec!["Pune".to_string()],
        ..VocabularyConfig::default()
    };
    let generated = translate("students in pune", &students_only(), &vocabulary).unwrap();
    assert_eq!(generated.params, vec!["Pune"]);
    assert_eq!(
        translate("students in delhi", &students_only(), &vocabulary)
            .unwrap()
            .params
            .len(),
        0
    );
}

#[test]
fn test_deterministic() {
    let schema = school();
    let vocabulary = VocabularyConfig::default();
    let first = translate("top 5 students in chennai by name", &schema, &vocabulary).unwrap();
    for _ in 0..10 {
        assert_eq!(
            translate("top 5 students in chennai by name", &schema, &vocabulary).unwrap(),
            first
        );
    }
    assert_eq!(
        first.sql,
        "SELECT * FROM students WHERE city = ? ORDER BY name ASC LIMIT 5;"
    );
}

#[test]
fn test_output_always_safe() {
    let schema = school();
    let vocabulary = VocabularyConfig::default();
    for q in [
        "students",
        "how many courses",
        "total students by city",
        "students in delhi order by id",
        "first 2 courses",
    ] {
        let generated = translate(q, &schema, &vocabulary).unwrap();
        assert!(aq_sql::is_safe_sql(&generated.sql), "{}", generated.sql);
        assert!(generated.sql.ends_with(';'));
    }
}

#[test]
fn test_translation_json_shape() {
    let translator = Translator::new(VocabularyConfig::default()).unwrap();
    let translation = translator
        .translate("Students in Bangalore order by name", &students_only())
        .unwrap();

    let body = serde_json::to_value(&translation).unwrap();
    assert_eq!(
        body["question"],
        serde_json::json!("students in bangalore order by name")
    );
    assert_eq!(body["intent"]["table"], serde_json::json!("students"));
    assert_eq!(body["intent"]["city"], serde_json::json!("Bangalore"));
    assert_eq!(body["intent"]["order_by"], serde_json::json!("name"));
    assert_eq!(body["intent"]["limit"], serde_json::Value::Null);
    assert_eq!(
        body["sql"],
        serde_json::json!({
            "sql": "SELECT * FROM students WHERE city = ? ORDER BY name ASC;",
            "display_sql": "SELECT * FROM students WHERE city = 'Bangalore' ORDER BY name ASC;",
            "params": ["Bangalore"]
        })
    );
}

#[test]
fn test_oversized_limit_stays_bounded() {
    let generated = translate(
        "top 99999999999999999999999 students",
        &students_only(),
        &VocabularyConfig::default(),
    )
    .unwrap();
    assert_eq!(
        generated.sql,
        format!("SELECT * FROM students LIMIT {};", u64::MAX)
    );
}
