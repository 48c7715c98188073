use chrono::NaiveDate;
use ecfr_dashboard::model::{MetricName, Rank};
use ecfr_dashboard::query::{MetricQuery, QueryForm, parse_agencies};

#[test]
fn default_form_is_a_valid_query() {
    let query = QueryForm::default().to_query().unwrap();

    assert_eq!(query.metric, MetricName::WordCount);
    assert_eq!(query.rank, Rank::Chapter);
    assert_eq!(query.start, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
    assert_eq!(query.end, NaiveDate::from_ymd_opt(2022, 2, 1).unwrap());
    assert_eq!(query.agencies, ["BIA"]);
}

#[test]
fn params_send_level_as_index() {
    let query = MetricQuery::parse(
        "Lexical diversity",
        "Subpart",
        "2022-01-01",
        "2022-03-31",
        "BIA, NSF",
    )
    .unwrap();

    assert_eq!(
        query.params(),
        vec![
            ("metric_name", "Lexical diversity".to_string()),
            ("level", "4".to_string()),
            ("start_dt", "2022-01-01".to_string()),
            ("end_dt", "2022-03-31".to_string()),
            ("agencies", "BIA,NSF".to_string()),
        ]
    );
    assert_eq!(
        query.query_string(),
        "metric_name=Lexical%20diversity&level=4&start_dt=2022-01-01&end_dt=2022-03-31&agencies=BIA%2CNSF"
    );
}

#[test]
fn levels_round_trip_through_index() {
    for (i, rank) in Rank::ALL.iter().enumerate() {
        assert_eq!(rank.index(), i);
        assert_eq!(Rank::from_index(i), Some(*rank));
    }
    assert_eq!("section".parse::<Rank>().unwrap(), Rank::Section);
    assert!("Paragraph".parse::<Rank>().is_err());
}

#[test]
fn metric_names_match_wire_text() {
    assert_eq!(
        "cross-references Average".parse::<MetricName>().unwrap(),
        MetricName::CrossReferencesAverage
    );
    assert!("word count".parse::<MetricName>().is_err());
}

#[test]
fn agencies_are_trimmed_and_validated() {
    assert_eq!(parse_agencies(" BIA ,,NSF, ").unwrap(), ["BIA", "NSF"]);
    assert_eq!(parse_agencies("agriculture-department").unwrap(), ["agriculture-department"]);

    let err = parse_agencies(" , ").unwrap_err();
    assert_eq!(err.to_string(), "Enter at least one agency");

    let err = parse_agencies("BIA,NSF&x=1").unwrap_err();
    assert!(err.to_string().contains("NSF&x=1"));
}

#[test]
fn rejects_bad_dates() {
    let err = MetricQuery::parse("Word count", "Title", "2022-13-01", "2022-02-01", "BIA")
        .unwrap_err();
    assert!(err.to_string().starts_with("Invalid start date"));

    let err = MetricQuery::parse("Word count", "Title", "2022-03-01", "2022-02-01", "BIA")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Start date 2022-03-01 is after end date 2022-02-01"
    );

    // A single-day range is fine
    assert!(MetricQuery::parse("Word count", "Title", "2022-02-01", "2022-02-01", "BIA").is_ok());
}
