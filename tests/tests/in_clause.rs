use compositekey::{stmt::Value, Flavor, ParamStyle};
use compositekey_sql::{Formatter, InRhs};
use pretty_assertions::assert_eq;
use tests::*;

fn render(
    serializer: &compositekey::Serializer<'_>,
    lhs: &[&str],
    values: &[Value],
) -> compositekey::Result<(String, Vec<Value>)> {
    let lhs: Vec<String> = lhs.iter().map(|column| column.to_string()).collect();
    let mut sql = String::new();
    let mut params: Vec<Value> = vec![];

    let mut f = Formatter::new(&mut sql, &mut params, ParamStyle::Format);
    serializer
        .compiler()
        .in_clause(serializer.context(), &lhs, InRhs::Values(values), &mut f)?;

    Ok((sql, params))
}

#[test]
fn tuple_in_with_format_placeholders() {
    let schema = schema();
    let serializer = aware(&schema, Flavor::Postgresql);

    let (sql, params) = render(&serializer, &["a", "b"], &[key("eu", 7), key("us", 9)]).unwrap();

    assert_eq!(sql, "(a, b) IN ((%s, %s), (%s, %s))");
    assert_eq!(
        params,
        vec![Value::from("eu"), 7.into(), "us".into(), 9.into()]
    );
}

#[test]
fn single_column_in() {
    let schema = schema();
    let serializer = aware(&schema, Flavor::Postgresql);

    let (sql, params) = render(&serializer, &["a"], &[1.into(), 2.into()]).unwrap();

    assert_eq!(sql, "a IN (%s, %s)");
    assert_eq!(params.len(), 2);
}

#[test]
fn empty_values_match_nothing() {
    let schema = schema();
    let serializer = aware(&schema, Flavor::Postgresql);

    let (sql, params) = render(&serializer, &["a", "b"], &[]).unwrap();

    assert_eq!(sql, "0 = 1");
    assert!(params.is_empty());
}

#[test]
fn value_arity_must_match_columns() {
    let schema = schema();
    let serializer = aware(&schema, Flavor::Postgresql);

    let err = render(&serializer, &["a", "b"], &[1.into()]).unwrap_err();
    assert!(err.is_arity());

    let err = render(&serializer, &["a"], &[key("eu", 7)]).unwrap_err();
    assert!(err.is_arity());
}

#[test]
fn single_column_compiler_rejects_tuples() {
    let schema = schema();
    let serializer = single(&schema, Flavor::Postgresql);

    let err = render(&serializer, &["a", "b"], &[key("eu", 7)]).unwrap_err();
    assert!(err.is_unsupported_operation());

    let (sql, _) = render(&serializer, &["a"], &[1.into()]).unwrap();
    assert_eq!(sql, "a IN (%s)");
}
