mod common;

use common::{row, two_agency_rows};
use ecfr_dashboard::export::to_csv;
use ecfr_dashboard::table::{SortDirection, display_date, sort_rows, table_rows};
use serde_json::json;

#[test]
fn descending_is_the_default() {
    assert_eq!(SortDirection::default(), SortDirection::Descending);
}

#[test]
fn sorts_by_value_both_ways() {
    let rows = two_agency_rows();

    let desc: Vec<f64> = sort_rows(&rows, SortDirection::Descending)
        .iter()
        .map(|r| r.numeric_value())
        .collect();
    assert_eq!(desc, [20.0, 10.0, 5.0, 2.5]);

    let asc: Vec<f64> = sort_rows(&rows, SortDirection::Ascending)
        .iter()
        .map(|r| r.numeric_value())
        .collect();
    assert_eq!(asc, [2.5, 5.0, 10.0, 20.0]);

    // Input order untouched
    assert_eq!(rows[0].numeric_value(), 10.0);
}

#[test]
fn equal_values_keep_service_order() {
    let rows = vec![
        row("EPA", "2022-01-01", json!(3)),
        row("BIA", "2022-01-01", json!(3)),
        row("NSF", "2022-01-01", json!(3)),
    ];
    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        let agencies: Vec<&str> = sort_rows(&rows, direction)
            .iter()
            .map(|r| r.agency.as_str())
            .collect();
        assert_eq!(agencies, ["EPA", "BIA", "NSF"]);
    }
}

#[test]
fn toggling_twice_restores_direction() {
    let dir = SortDirection::Descending;
    assert_eq!(dir.toggled(), SortDirection::Ascending);
    assert_eq!(dir.toggled().toggled(), dir);
    assert_eq!(dir.aria(), "descending");
    assert_eq!(dir.toggled().arrow(), "▲");
}

#[test]
fn dates_display_without_padding() {
    assert_eq!(display_date("2022-01-05"), "1/5/2022");
    assert_eq!(display_date("2022-11-25T00:00:00"), "11/25/2022");
    assert_eq!(display_date("sometime"), "sometime");
}

#[test]
fn table_rows_format_cells() {
    let table = table_rows(&two_agency_rows(), SortDirection::Descending);

    assert_eq!(table.len(), 4);
    assert_eq!(table[0].agency, "BIA");
    assert_eq!(table[0].title, "25");
    assert_eq!(table[0].level, "I");
    assert_eq!(table[0].date, "1/2/2022");
    assert_eq!(table[0].value, "20");
    assert_eq!(table[3].value, "2.5");
}

#[test]
fn csv_follows_sort_order() {
    let csv = to_csv(&two_agency_rows(), SortDirection::Ascending);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "agency,title,level,date,value");
    assert_eq!(lines[1], "BIA,25,I,2022-01-01T12:30:00,2.5");
    assert_eq!(lines[4], "BIA,25,I,2022-01-02,20");
}

#[test]
fn csv_of_nothing_is_just_the_header() {
    assert_eq!(to_csv(&[], SortDirection::Descending), "agency,title,level,date,value\n");
}
