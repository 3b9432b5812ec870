//! Condition rows → UI schema rule.
//!
//! Rows are grouped left to right: a row joined by `OR` opens a new group,
//! anything else extends the current one. Each group is a conjunction, the
//! groups together a disjunction. A predicate that cannot be expressed (a
//! non-numeric value on a numeric operator, an inverted `between` range) is
//! dropped from its group instead of failing the whole rule.

use fw_core::ConditionRow;
use fw_core::enums::{Effect, LogicalJoin, Operator};
use serde_json::{Number, Value, json};

const REGEX_METACHARACTERS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Compile a node's visibility rows into `{effect, condition}`.
///
/// Returns `None` when no row names a dependency or every predicate was
/// dropped.
#[must_use]
pub fn compile_rule(rows: &[ConditionRow], effect: Effect) -> Option<Value> {
    let mut groups: Vec<Vec<Option<Value>>> = Vec::new();
    for (position, row) in rows
        .iter()
        .filter(|row| !row.depends_on_key.is_empty())
        .enumerate()
    {
        let join = if position == 0 {
            LogicalJoin::None
        } else {
            row.logical_join
        };
        let predicate = compile_predicate(row);
        match groups.last_mut() {
            Some(group) if join != LogicalJoin::Or => group.push(predicate),
            _ => groups.push(vec![predicate]),
        }
    }
    if groups.is_empty() {
        return None;
    }

    let mut branches: Vec<Value> = groups
        .into_iter()
        .filter_map(|group| {
            let mut predicates: Vec<Value> = group.into_iter().flatten().collect();
            match predicates.len() {
                0 => None,
                1 => predicates.pop(),
                _ => Some(json!({ "allOf": predicates })),
            }
        })
        .collect();

    let schema = match branches.len() {
        0 => {
            tracing::debug!(%effect, "rule: every predicate dropped, omitting rule");
            return None;
        }
        1 => branches.pop()?,
        _ => json!({ "anyOf": branches }),
    };

    Some(json!({
        "effect": effect,
        "condition": {
            "scope": "#",
            "schema": schema,
            "failWhenUndefined": true
        }
    }))
}

/// `{properties: {key: constraint}, required: [key]}` for one row.
#[must_use]
pub fn compile_predicate(row: &ConditionRow) -> Option<Value> {
    let Some(constraint) = constraint_for(row.operator, &row.value) else {
        tracing::debug!(
            key = %row.depends_on_key,
            operator = %row.operator,
            value = %row.value,
            "rule: dropping predicate"
        );
        return None;
    };
    let key = row.depends_on_key.as_str();
    Some(json!({
        "properties": { key: constraint },
        "required": [key]
    }))
}

fn constraint_for(operator: Operator, value: &Value) -> Option<Value> {
    let constraint = match operator {
        Operator::Equals => json!({ "const": value }),
        Operator::NotEquals => json!({ "not": { "const": value } }),
        Operator::Eq => json!({ "type": "number", "const": numeric(value)? }),
        Operator::Neq => json!({ "type": "number", "not": { "const": numeric(value)? } }),
        Operator::Gt => json!({ "type": "number", "exclusiveMinimum": numeric(value)? }),
        Operator::Gte => json!({ "type": "number", "minimum": numeric(value)? }),
        Operator::Lt => json!({ "type": "number", "exclusiveMaximum": numeric(value)? }),
        Operator::Lte => json!({ "type": "number", "maximum": numeric(value)? }),
        Operator::Pattern => json!({ "type": "string", "pattern": escape_regex(&text(value)) }),
        Operator::StartsWith => {
            json!({ "type": "string", "pattern": format!("^{}", escape_regex(&text(value))) })
        }
        Operator::EndsWith => {
            json!({ "type": "string", "pattern": format!("{}$", escape_regex(&text(value))) })
        }
        Operator::Between => {
            let (min, max) = bounds(value)?;
            if min.as_f64()? > max.as_f64()? {
                return None;
            }
            json!({ "type": "number", "minimum": min, "maximum": max })
        }
    };
    Some(constraint)
}

/// Coerce a row value to a JSON number, keeping integer representation when
/// the text is integral (`"18"` → `18`, `"2.5"` → `2.5`).
fn numeric(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(text) => parse_number(text),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::from(n));
    }
    if let Ok(n) = text.parse::<u64>() {
        return Some(Value::from(n));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// `between` bounds from `{min, max}`, `[min, max]`, or `"min,max"`.
fn bounds(value: &Value) -> Option<(Value, Value)> {
    match value {
        Value::Object(map) => Some((numeric(map.get("min")?)?, numeric(map.get("max")?)?)),
        Value::Array(items) if items.len() == 2 => Some((numeric(&items[0])?, numeric(&items[1])?)),
        Value::String(text) => {
            let (min, max) = text.split_once(',')?;
            Some((parse_number(min)?, parse_number(max)?))
        }
        _ => None,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Escape ECMA-262 metacharacters so user text matches literally.
#[must_use]
pub fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if REGEX_METACHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn row(key: &str, operator: Operator, value: Value) -> ConditionRow {
        ConditionRow::new(key, operator, value)
    }

    fn schema_of(rule: &Value) -> &Value {
        &rule["condition"]["schema"]
    }

    #[test]
    fn single_numeric_row() {
        let rule = compile_rule(&[row("age", Operator::Gte, json!("18"))], Effect::Show).unwrap();
        assert_eq!(
            rule,
            json!({
                "effect": "SHOW",
                "condition": {
                    "scope": "#",
                    "schema": {
                        "properties": {"age": {"type": "number", "minimum": 18}},
                        "required": ["age"]
                    },
                    "failWhenUndefined": true
                }
            })
        );
    }

    #[test]
    fn or_opens_group_and_and_extends_it() {
        let a = row("a", Operator::Equals, json!("x"));
        let b = row("b", Operator::Equals, json!("y")).joined(LogicalJoin::Or);
        let c = row("c", Operator::Equals, json!("z")).joined(LogicalJoin::And);
        let rule = compile_rule(&[a.clone(), b.clone(), c.clone()], Effect::Hide).unwrap();
        let [pa, pb, pc] = [&a, &b, &c].map(|r| compile_predicate(r).unwrap());
        assert_eq!(
            schema_of(&rule),
            &json!({"anyOf": [pa, {"allOf": [pb, pc]}]})
        );
        assert_eq!(rule["effect"], json!("HIDE"));
    }

    #[test]
    fn first_row_join_is_ignored() {
        let a = row("a", Operator::Equals, json!(1)).joined(LogicalJoin::Or);
        let b = row("b", Operator::Equals, json!(2)).joined(LogicalJoin::And);
        let rule = compile_rule(&[a, b], Effect::Show).unwrap();
        assert!(schema_of(&rule).get("allOf").is_some());
    }

    #[test]
    fn rows_without_dependency_are_discarded() {
        assert_eq!(compile_rule(&[row("", Operator::Equals, json!(1))], Effect::Show), None);
        assert_eq!(compile_rule(&[], Effect::Show), None);

        let rule = compile_rule(
            &[
                row("", Operator::Equals, json!(1)),
                row("b", Operator::Equals, json!(2)).joined(LogicalJoin::Or),
            ],
            Effect::Show,
        )
        .unwrap();
        assert_eq!(schema_of(&rule)["required"], json!(["b"]));
    }

    #[test]
    fn inverted_between_is_dropped_from_its_group() {
        let rule = compile_rule(
            &[
                row("n", Operator::Between, json!({"min": 10, "max": 1})),
                row("m", Operator::Equals, json!("ok")).joined(LogicalJoin::And),
            ],
            Effect::Enable,
        )
        .unwrap();
        assert_eq!(
            schema_of(&rule),
            &json!({"properties": {"m": {"const": "ok"}}, "required": ["m"]})
        );
    }

    #[test]
    fn rule_with_only_dropped_predicates_is_omitted() {
        let rows = [
            row("n", Operator::Gt, json!("lots")),
            row("m", Operator::Between, json!("5,1")).joined(LogicalJoin::Or),
        ];
        assert_eq!(compile_rule(&rows, Effect::Show), None);
    }

    #[rstest]
    #[case::equals(Operator::Equals, json!("yes"), json!({"const": "yes"}))]
    #[case::not_equals(Operator::NotEquals, json!(3), json!({"not": {"const": 3}}))]
    #[case::eq(Operator::Eq, json!("7"), json!({"type": "number", "const": 7}))]
    #[case::neq(Operator::Neq, json!(7), json!({"type": "number", "not": {"const": 7}}))]
    #[case::gt(Operator::Gt, json!("2.5"), json!({"type": "number", "exclusiveMinimum": 2.5}))]
    #[case::lt(Operator::Lt, json!(" 40 "), json!({"type": "number", "exclusiveMaximum": 40}))]
    #[case::lte(Operator::Lte, json!(-1), json!({"type": "number", "maximum": -1}))]
    #[case::pattern(Operator::Pattern, json!("a.b"), json!({"type": "string", "pattern": "a\\.b"}))]
    #[case::starts_with(Operator::StartsWith, json!("(x"), json!({"type": "string", "pattern": "^\\(x"}))]
    #[case::ends_with(Operator::EndsWith, json!("$"), json!({"type": "string", "pattern": "\\$$"}))]
    #[case::between_object(Operator::Between, json!({"min": 1, "max": 5}), json!({"type": "number", "minimum": 1, "maximum": 5}))]
    #[case::between_array(Operator::Between, json!([0, "9"]), json!({"type": "number", "minimum": 0, "maximum": 9}))]
    #[case::between_text(Operator::Between, json!("3,3"), json!({"type": "number", "minimum": 3, "maximum": 3}))]
    fn operator_constraints(#[case] operator: Operator, #[case] value: Value, #[case] expected: Value) {
        let predicate = compile_predicate(&row("k", operator, value)).unwrap();
        assert_eq!(predicate["properties"]["k"], expected);
        assert_eq!(predicate["required"], json!(["k"]));
    }

    #[rstest]
    #[case::text_on_numeric(Operator::Gte, json!("eighteen"))]
    #[case::bool_on_numeric(Operator::Eq, json!(true))]
    #[case::inverted_between(Operator::Between, json!([5, 1]))]
    #[case::malformed_between(Operator::Between, json!("5"))]
    fn unexpressible_predicates_are_dropped(#[case] operator: Operator, #[case] value: Value) {
        assert_eq!(compile_predicate(&row("k", operator, value)), None);
    }

    #[test]
    fn escapes_every_metacharacter() {
        assert_eq!(
            escape_regex(r"1+1=2? [a](b){c}|^$.*\"),
            r"1\+1=2\? \[a\]\(b\)\{c\}\|\^\$\.\*\\"
        );
    }
}
