use compositekey::{
    stmt::{Connector, Lookup, Query, Value, Where, WhereNode},
    Flavor,
};
use pretty_assertions::assert_eq;
use tests::*;

const ORDER_COLUMNS: &str = r#""app_order"."id", "app_order"."customer_region", "app_order"."customer_number", "app_order"."referrer_region", "app_order"."referrer_number", "app_order"."total""#;

#[test]
fn composite_exact_is_tuple_equality() {
    let schema = schema();
    let mut query = Query::new(ORDER);
    query
        .add_filter(&schema, "customer", Lookup::Exact(key("eu", 7)))
        .unwrap();

    let stmt = aware(&schema, Flavor::Postgresql).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        format!(
            r#"SELECT {ORDER_COLUMNS} FROM "app_order" WHERE ("app_order"."customer_region" = $1 AND "app_order"."customer_number" = $2)"#
        )
    );
    assert_eq!(stmt.params, vec![Value::from("eu"), 7.into()]);
}

#[test]
fn join_on_composite_foreign_key() {
    let schema = schema();
    let mut query = Query::new(ORDER);
    query
        .add_filter(&schema, "customer__name", Lookup::Exact("Ann".into()))
        .unwrap();

    let stmt = aware(&schema, Flavor::Postgresql).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        format!(
            r#"SELECT {ORDER_COLUMNS} FROM "app_order" INNER JOIN "app_customer" ON ("app_order"."customer_region" = "app_customer"."region" AND "app_order"."customer_number" = "app_customer"."number") WHERE "app_customer"."name" = $1"#
        )
    );
    assert_eq!(stmt.params, vec![Value::from("Ann")]);
}

#[test]
fn composite_in_values() {
    let schema = schema();
    let mut query = Query::new(ORDER);
    query
        .add_filter(
            &schema,
            "customer",
            Lookup::In(vec![key("eu", 7), key("us", 9)]),
        )
        .unwrap();

    let stmt = aware(&schema, Flavor::Sqlite).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        format!(
            r#"SELECT {ORDER_COLUMNS} FROM "app_order" WHERE ("app_order"."customer_region", "app_order"."customer_number") IN ((?1, ?2), (?3, ?4))"#
        )
    );
    assert_eq!(
        stmt.params,
        vec![Value::from("eu"), 7.into(), "us".into(), 9.into()]
    );
}

#[test]
fn empty_in_matches_nothing() {
    let schema = schema();
    let mut query = Query::new(ORDER);
    query
        .add_filter(&schema, "customer", Lookup::In(vec![]))
        .unwrap();

    let stmt = aware(&schema, Flavor::Postgresql).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        format!(r#"SELECT {ORDER_COLUMNS} FROM "app_order" WHERE 0 = 1"#)
    );
    assert!(stmt.params.is_empty());
}

#[test]
fn negated_or_node() {
    let schema = schema();
    let mut query = Query::new(ORDER);
    query
        .add_filter(&schema, "total", Lookup::Exact(1.into()))
        .unwrap();
    query
        .add_filter(&schema, "total", Lookup::In(vec![]))
        .unwrap();

    let mut or = WhereNode::new(Connector::Or);
    or.children = std::mem::take(&mut query.filter.children);
    query.filter.add(Where::Node(or.negate()));

    let stmt = aware(&schema, Flavor::Postgresql).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        format!(
            r#"SELECT {ORDER_COLUMNS} FROM "app_order" WHERE NOT ("app_order"."total" = $1 OR 0 = 1)"#
        )
    );
}

#[test]
fn composite_is_null() {
    let schema = schema();
    let mut query = Query::new(ORDER);
    query
        .add_filter(&schema, "referrer", Lookup::IsNull(true))
        .unwrap();

    let stmt = aware(&schema, Flavor::Postgresql).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        format!(
            r#"SELECT {ORDER_COLUMNS} FROM "app_order" WHERE ("app_order"."referrer_region" IS NULL AND "app_order"."referrer_number" IS NULL)"#
        )
    );
}

#[test]
fn is_null_through_nullable_join_uses_outer_join() {
    let schema = schema();
    let mut query = Query::new(ORDER);
    query
        .add_filter(&schema, "referrer__name", Lookup::IsNull(true))
        .unwrap();

    let stmt = aware(&schema, Flavor::Postgresql).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        format!(
            r#"SELECT {ORDER_COLUMNS} FROM "app_order" LEFT OUTER JOIN "app_customer" ON ("app_order"."referrer_region" = "app_customer"."region" AND "app_order"."referrer_number" = "app_customer"."number") WHERE "app_customer"."name" IS NULL"#
        )
    );
}

#[test]
fn exact_null_through_nullable_join_uses_outer_join() {
    let schema = schema();
    let mut query = Query::new(ORDER);
    query
        .add_filter(&schema, "referrer__name", Lookup::Exact(Value::Null))
        .unwrap();

    let stmt = aware(&schema, Flavor::Postgresql).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        format!(
            r#"SELECT {ORDER_COLUMNS} FROM "app_order" LEFT OUTER JOIN "app_customer" ON ("app_order"."referrer_region" = "app_customer"."region" AND "app_order"."referrer_number" = "app_customer"."number") WHERE "app_customer"."name" IS NULL"#
        )
    );
    assert!(stmt.params.is_empty());
}

#[test]
fn exact_with_wrong_arity_fails() {
    let schema = schema();
    let mut query = Query::new(ORDER);
    query
        .add_filter(&schema, "customer", Lookup::Exact("eu".into()))
        .unwrap();

    let err = aware(&schema, Flavor::Postgresql)
        .select(&mut query)
        .unwrap_err();
    assert!(err.is_arity());
}

#[test]
fn sub_select_continues_parameter_numbering() {
    let schema = schema();

    let mut customers = Query::new(CUSTOMER);
    customers.add_fields(&schema, &["id"]).unwrap();
    customers
        .add_filter(&schema, "name", Lookup::Exact("Ann".into()))
        .unwrap();

    let mut query = Query::new(ORDER);
    query
        .add_filter(&schema, "total", Lookup::Exact(100.into()))
        .unwrap();
    query
        .add_filter(&schema, "customer", Lookup::InQuery(Box::new(customers)))
        .unwrap();

    let stmt = aware(&schema, Flavor::Postgresql).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        format!(
            r#"SELECT {ORDER_COLUMNS} FROM "app_order" WHERE "app_order"."total" = $1 AND ("app_order"."customer_region", "app_order"."customer_number") IN (SELECT "app_customer"."region", "app_customer"."number" FROM "app_customer" WHERE "app_customer"."name" = $2)"#
        )
    );
    assert_eq!(stmt.params, vec![Value::from(100), "Ann".into()]);
}

#[test]
fn sub_select_column_count_must_match() {
    let schema = schema();

    let mut names = Query::new(CUSTOMER);
    names.add_fields(&schema, &["name"]).unwrap();

    let mut query = Query::new(ORDER);
    query
        .add_filter(&schema, "customer", Lookup::InQuery(Box::new(names)))
        .unwrap();

    let err = aware(&schema, Flavor::Postgresql)
        .select(&mut query)
        .unwrap_err();
    assert!(err.is_arity());
    assert_eq!(err.to_string(), "arity mismatch: expected 2 values, got 1");
}

#[test]
fn inherited_field_filter_joins_parent() {
    let schema = schema();
    let mut query = Query::new(RESTAURANT);
    query
        .add_filter(&schema, "name", Lookup::Exact("Chez".into()))
        .unwrap();

    let stmt = aware(&schema, Flavor::Postgresql).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        r#"SELECT "app_place"."id", "app_place"."name", "app_place"."address", "app_restaurant"."place_ptr_id", "app_restaurant"."serves_pizza" FROM "app_restaurant" INNER JOIN "app_place" ON ("app_restaurant"."place_ptr_id" = "app_place"."id") WHERE "app_place"."name" = $1"#
    );
}

#[test]
fn extra_tables_follow_joins() {
    let schema = schema();
    let mut query = Query::new(BOOK);
    query.extra_tables.push("app_author".to_string());

    let stmt = aware(&schema, Flavor::Postgresql).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        r#"SELECT "app_book"."id", "app_book"."author_id", "app_book"."title" FROM "app_book", "app_author""#
    );
}

#[test]
fn mysql_quoting() {
    let schema = schema();
    let mut query = Query::new(BOOK);
    query
        .add_filter(&schema, "author", Lookup::In(vec![1.into(), 2.into()]))
        .unwrap();

    let stmt = aware(&schema, Flavor::Mysql).select(&mut query).unwrap();

    assert_eq!(
        stmt.sql,
        "SELECT `app_book`.`id`, `app_book`.`author_id`, `app_book`.`title` FROM `app_book` WHERE `app_book`.`author_id` IN (?, ?)"
    );
}
