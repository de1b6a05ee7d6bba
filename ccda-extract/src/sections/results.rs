//! Results section: LOINC-coded observations grouped into panels, one per entry.

use std::collections::BTreeSet;

use ccda_core::{ResultItem, ResultPanel, ResultsSection};

use super::{first_non_empty, statement_of, EffectiveTime};
use crate::codes::resolve_code;
use crate::value::{resolve_value, text_or_reference};
use crate::xml::Element;

pub fn extract(sections: &[Element<'_>]) -> ResultsSection {
    let panels: Vec<ResultPanel> = sections
        .iter()
        .flat_map(|section| {
            section
                .children_named("entry")
                .filter_map(move |entry| extract_panel(entry, *section))
        })
        .collect();

    tracing::trace!(
        panels = panels.len(),
        items = panels.iter().map(|panel| panel.items.len()).sum::<usize>(),
        "results extracted"
    );

    ResultsSection { panels }
}

fn extract_panel(entry: Element<'_>, section: Element<'_>) -> Option<ResultPanel> {
    let statement = statement_of(entry);
    let code = resolve_code(statement);

    let mut observations: Vec<Element<'_>> = statement
        .children_named("component")
        .filter_map(|component| component.child("observation"))
        .collect();
    if observations.is_empty() && statement.is("observation") {
        observations.push(statement);
    }

    let items: Vec<ResultItem> = observations
        .into_iter()
        .filter_map(|observation| extract_item(observation, section))
        .collect();
    if items.is_empty() {
        return None;
    }

    Some(ResultPanel {
        title: first_non_empty([code.display_name.clone(), code.code.clone()]),
        code,
        dates: unique_dates(&items),
        items,
    })
}

fn extract_item(observation: Element<'_>, section: Element<'_>) -> Option<ResultItem> {
    let code = resolve_code(observation);
    if !code.is_loinc() {
        return None;
    }

    let value = resolve_value(observation, section);
    let unit = observation
        .child("value")
        .map(|value| value.attr_or_empty("unit"))
        .unwrap_or_default();
    let time = EffectiveTime::of(observation);

    let ranges: Vec<Element<'_>> = observation
        .children_named("referenceRange")
        .filter_map(|range| range.child("observationRange"))
        .collect();
    let range_texts: Vec<String> = ranges
        .iter()
        .map(|range| {
            range
                .child("text")
                .map(|text| text_or_reference(text, section))
                .unwrap_or_default()
        })
        .collect();
    let (low, high) = ranges.first().map(|range| bounds(*range)).unwrap_or_default();

    Some(ResultItem {
        title: first_non_empty([code.display_name.clone(), code.code.clone()]),
        is_out_of_range: is_out_of_range(&value, &low, &high),
        code,
        value,
        unit,
        datetime: time.value,
        datetime_low: time.low,
        datetime_high: time.high,
        reference_range_low: low,
        reference_range_high: high,
        reference_range_text: range_texts.first().cloned().unwrap_or_default(),
        reference_range_text_items: range_texts
            .into_iter()
            .filter(|text| !text.is_empty())
            .collect(),
    })
}

fn bounds(range: Element<'_>) -> (String, String) {
    let Some(value) = range.child("value") else {
        return (String::new(), String::new());
    };
    let bound = |name: &str| {
        value
            .child(name)
            .map(|bound| bound.attr_or_empty("value"))
            .unwrap_or_default()
    };
    (bound("low"), bound("high"))
}

/// True only when value, low and high all parse as finite numbers and the
/// value falls outside `[low, high]`.
pub fn is_out_of_range(value: &str, low: &str, high: &str) -> bool {
    match (finite(value), finite(low), finite(high)) {
        (Some(value), Some(low), Some(high)) => value < low || value > high,
        _ => false,
    }
}

fn finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Sorted union of every item's point, low and high times.
fn unique_dates(items: &[ResultItem]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| [&item.datetime, &item.datetime_low, &item.datetime_high])
        .filter(|date| !date.is_empty())
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::is_out_of_range;

    #[test]
    fn missing_or_non_numeric_inputs_are_in_range() {
        assert!(!is_out_of_range("", "1", "2"));
        assert!(!is_out_of_range("5", "", "2"));
        assert!(!is_out_of_range("5", "1", ""));
        assert!(!is_out_of_range("positive", "1", "2"));
        assert!(!is_out_of_range("NaN", "1", "2"));
        assert!(!is_out_of_range("inf", "1", "2"));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(!is_out_of_range("1", "1", "2"));
        assert!(!is_out_of_range("2", "1", "2"));
        assert!(is_out_of_range("0.99", "1", "2"));
        assert!(is_out_of_range(" 2.5 ", "1", "2"));
    }

    proptest! {
        #[test]
        fn matches_numeric_comparison(
            value in -1.0e6f64..1.0e6,
            low in -1.0e6f64..1.0e6,
            high in -1.0e6f64..1.0e6,
        ) {
            let expected = value < low || value > high;
            prop_assert_eq!(
                is_out_of_range(&value.to_string(), &low.to_string(), &high.to_string()),
                expected
            );
        }
    }
}
