//! Predicate and aggregate evaluation over records
//!
//! The in-memory backend's query engine. Null handling follows SQL
//! three-valued logic collapsed to match/no-match: a null field value
//! satisfies only IS NULL; comparisons, LIKE, BETWEEN, and membership checks
//! against null never match. Sorting places nulls first in ascending order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::filter::{AggregateFunction, SortDirection};
use crate::query::{AggregatePlan, CompareOp, Predicate, SortKey, COUNT_ALL_FIELD};
use crate::schema::{FieldType, FieldValue, Queryable};

/// Whether a record satisfies a predicate
pub fn matches<E: Queryable>(record: &E, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::True => true,
        Predicate::Compare { field, op, value } => {
            let actual = field_value(record, field);
            match op {
                CompareOp::Eq => !actual.is_null() && actual == *value,
                CompareOp::Ne => !actual.is_null() && actual != *value,
                CompareOp::Gt => cmp_is(&actual, value, |o| o == Ordering::Greater),
                CompareOp::Gte => cmp_is(&actual, value, |o| o != Ordering::Less),
                CompareOp::Lt => cmp_is(&actual, value, |o| o == Ordering::Less),
                CompareOp::Lte => cmp_is(&actual, value, |o| o != Ordering::Greater),
            }
        }
        Predicate::Between { field, low, high } => {
            let actual = field_value(record, field);
            cmp_is(&actual, low, |o| o != Ordering::Less)
                && cmp_is(&actual, high, |o| o != Ordering::Greater)
        }
        Predicate::Like {
            field,
            needle,
            case_insensitive,
        } => match field_value(record, field) {
            FieldValue::Text(haystack) => {
                if *case_insensitive {
                    haystack.to_lowercase().contains(&needle.to_lowercase())
                } else {
                    haystack.contains(needle.as_str())
                }
            }
            _ => false,
        },
        Predicate::In {
            field,
            values,
            negated,
        } => {
            let actual = field_value(record, field);
            if actual.is_null() {
                return false;
            }
            let contained = values.contains(&actual);
            contained != *negated
        }
        Predicate::Null { field, negated } => field_value(record, field).is_null() != *negated,
        Predicate::And(parts) => parts.iter().all(|part| matches(record, part)),
        Predicate::Or(parts) => parts.iter().any(|part| matches(record, part)),
    }
}

/// Sort records in place by the given keys, stable within equal keys
pub fn sort_records<E: Queryable>(records: &mut [E], sort: &[SortKey]) {
    if sort.is_empty() {
        return;
    }
    records.sort_by(|a, b| {
        for key in sort {
            let ordering = cmp_for_sort(&field_value(a, &key.field), &field_value(b, &key.field));
            let ordering = match key.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Compute an aggregate plan over an already-filtered row set
///
/// Returns one result map for an ungrouped plan, or one per distinct
/// group-key tuple (first-seen order, then the plan's post-aggregation sort).
pub fn aggregate_records<E: Queryable>(
    records: &[&E],
    plan: &AggregatePlan,
) -> Vec<BTreeMap<String, FieldValue>> {
    if !plan.is_grouped() {
        return vec![compute_aggregates(records, plan)];
    }

    let mut keys: Vec<Vec<FieldValue>> = Vec::new();
    let mut partitions: Vec<Vec<&E>> = Vec::new();
    for record in records {
        let key: Vec<FieldValue> = plan
            .group_fields
            .iter()
            .map(|field| field_value(*record, field))
            .collect();
        match keys.iter().position(|existing| *existing == key) {
            Some(index) => partitions[index].push(*record),
            None => {
                keys.push(key);
                partitions.push(vec![*record]);
            }
        }
    }

    let mut rows: Vec<BTreeMap<String, FieldValue>> = keys
        .into_iter()
        .zip(partitions)
        .map(|(key, partition)| {
            let mut row = compute_aggregates(&partition, plan);
            for (field, value) in plan.group_fields.iter().zip(key) {
                row.insert(field.clone(), value);
            }
            row
        })
        .collect();

    if !plan.sort.is_empty() {
        rows.sort_by(|a, b| {
            for key in &plan.sort {
                let left = a.get(&key.field).cloned().unwrap_or(FieldValue::Null);
                let right = b.get(&key.field).cloned().unwrap_or(FieldValue::Null);
                let ordering = match key.direction {
                    SortDirection::Asc => cmp_for_sort(&left, &right),
                    SortDirection::Desc => cmp_for_sort(&left, &right).reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    rows
}

fn compute_aggregates<E: Queryable>(
    records: &[&E],
    plan: &AggregatePlan,
) -> BTreeMap<String, FieldValue> {
    let mut row = BTreeMap::new();
    for aggregate in &plan.aggregates {
        let value = match aggregate.function {
            AggregateFunction::Count => count(records, &aggregate.field),
            AggregateFunction::Sum => sum::<E>(records, &aggregate.field),
            AggregateFunction::Avg => avg(records, &aggregate.field),
            AggregateFunction::Max => fold_extremum(records, &aggregate.field, Ordering::Greater),
            AggregateFunction::Min => fold_extremum(records, &aggregate.field, Ordering::Less),
        };
        row.insert(aggregate.key.clone(), value);
    }
    row
}

fn count<E: Queryable>(records: &[&E], field: &str) -> FieldValue {
    let n = if field == COUNT_ALL_FIELD {
        records.len()
    } else {
        records
            .iter()
            .filter(|record| !field_value(**record, field).is_null())
            .count()
    };
    FieldValue::Integer(n as i64)
}

fn sum<E: Queryable>(records: &[&E], field: &str) -> FieldValue {
    let total: f64 = numeric_values(records, field).sum();
    // SUM keeps the field's declared type; zero rows sum to a typed zero.
    match E::schema().field_type(field) {
        Some(FieldType::Integer) => FieldValue::Integer(total as i64),
        _ => FieldValue::Float(total),
    }
}

fn avg<E: Queryable>(records: &[&E], field: &str) -> FieldValue {
    let values: Vec<f64> = numeric_values(records, field).collect();
    if values.is_empty() {
        FieldValue::Null
    } else {
        FieldValue::Float(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn fold_extremum<E: Queryable>(records: &[&E], field: &str, keep: Ordering) -> FieldValue {
    let mut extremum = FieldValue::Null;
    for record in records {
        let value = field_value(*record, field);
        if value.is_null() {
            continue;
        }
        if extremum.is_null() || value.compare(&extremum) == Some(keep) {
            extremum = value;
        }
    }
    extremum
}

fn numeric_values<'a, E: Queryable>(
    records: &'a [&'a E],
    field: &'a str,
) -> impl Iterator<Item = f64> + 'a {
    records
        .iter()
        .filter_map(move |record| match field_value(*record, field) {
            FieldValue::Integer(n) => Some(n as f64),
            FieldValue::Float(n) => Some(n),
            _ => None,
        })
}

fn field_value<E: Queryable>(record: &E, field: &str) -> FieldValue {
    record.field(field).unwrap_or(FieldValue::Null)
}

fn cmp_is(actual: &FieldValue, expected: &FieldValue, test: impl Fn(Ordering) -> bool) -> bool {
    actual.compare(expected).is_some_and(test)
}

/// Total ordering used for sorting: nulls first, incomparable values equal
fn cmp_for_sort(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}
