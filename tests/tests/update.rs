use compositekey::{
    driver::Capability,
    err,
    stmt::{Lookup, UpdateQuery, Value},
    Connection, Flavor, Result,
};
use pretty_assertions::assert_eq;
use tests::*;

fn order_update(schema: &compositekey::Schema) -> UpdateQuery {
    let mut update = UpdateQuery::new(ORDER);
    update
        .add_update_values(schema, [("total", Value::from(5))])
        .unwrap();
    update
        .query
        .add_filter(schema, "customer__name", Lookup::Exact("Bob".into()))
        .unwrap();
    update
}

fn customer_update(schema: &compositekey::Schema) -> UpdateQuery {
    let mut update = UpdateQuery::new(CUSTOMER);
    update
        .add_update_values(schema, [("name", Value::from("Zed"))])
        .unwrap();
    update
        .query
        .add_filter(schema, "referred_by__name", Lookup::Exact("Ann".into()))
        .unwrap();
    update
}

#[test]
fn single_table_update_keeps_its_filter() {
    let schema = schema();
    let mut update = UpdateQuery::new(CUSTOMER);
    update
        .add_update_values(&schema, [("name", Value::from("Zed"))])
        .unwrap();
    update
        .query
        .add_filter(&schema, "pk", Lookup::Exact(key("eu", 7)))
        .unwrap();

    let mut conn = MockConnection::new(Capability::POSTGRESQL);
    let stmts = aware(&schema, Flavor::Postgresql)
        .update(&mut update, &mut conn)
        .unwrap();

    assert!(conn.log().is_empty());
    assert_eq!(stmts.len(), 1);
    assert_eq!(
        stmts[0].sql,
        r#"UPDATE "app_customer" SET "name" = $1 WHERE ("app_customer"."region" = $2 AND "app_customer"."number" = $3)"#
    );
    assert_eq!(stmts[0].params, vec![Value::from("Zed"), "eu".into(), 7.into()]);
}

#[test]
fn null_assignment_is_literal() {
    let schema = schema();
    let mut update = UpdateQuery::new(ORDER);
    update
        .add_update_values(&schema, [("referrer", Value::Null)])
        .unwrap();

    let mut conn = MockConnection::new(Capability::POSTGRESQL);
    let stmts = aware(&schema, Flavor::Postgresql)
        .update(&mut update, &mut conn)
        .unwrap();

    assert_eq!(
        stmts[0].sql,
        r#"UPDATE "app_order" SET "referrer_region" = NULL, "referrer_number" = NULL"#
    );
    assert!(stmts[0].params.is_empty());
}

#[test]
fn related_filter_becomes_pk_subselect() {
    let schema = schema();
    let mut update = order_update(&schema);

    let mut conn = MockConnection::new(Capability::POSTGRESQL);
    let stmts = aware(&schema, Flavor::Postgresql)
        .update(&mut update, &mut conn)
        .unwrap();

    assert!(conn.log().is_empty());
    assert_eq!(stmts.len(), 1);
    assert_eq!(
        stmts[0].sql,
        r#"UPDATE "app_order" SET "total" = $1 WHERE "app_order"."id" IN (SELECT U0."id" FROM "app_order" U0 INNER JOIN "app_customer" U1 ON (U0."customer_region" = U1."region" AND U0."customer_number" = U1."number") WHERE U1."name" = $2)"#
    );
    assert_eq!(stmts[0].params, vec![Value::from(5), "Bob".into()]);
}

#[test]
fn no_self_select_materializes_pks() {
    let schema = schema();
    let mut update = order_update(&schema);

    let mut conn =
        MockConnection::new(Capability::MYSQL).returning(vec![vec![1.into()], vec![2.into()]]);
    let stmts = aware(&schema, Flavor::Mysql)
        .update(&mut update, &mut conn)
        .unwrap();

    assert_eq!(
        conn.log(),
        [Executed {
            query: true,
            sql: "SELECT U0.`id` FROM `app_order` U0 INNER JOIN `app_customer` U1 ON (U0.`customer_region` = U1.`region` AND U0.`customer_number` = U1.`number`) WHERE U1.`name` = ?".to_string(),
            params: vec!["Bob".into()],
        }]
    );
    assert_eq!(stmts.len(), 1);
    assert_eq!(
        stmts[0].sql,
        "UPDATE `app_order` SET `total` = ? WHERE `app_order`.`id` IN (?, ?)"
    );
    assert_eq!(stmts[0].params, vec![Value::from(5), 1.into(), 2.into()]);
    assert_eq!(update.related_ids, Some(vec![1.into(), 2.into()]));
}

#[test]
fn composite_pk_materialized_as_tuples() {
    let schema = schema();
    let mut update = customer_update(&schema);

    let mut conn = MockConnection::new(Capability::MYSQL).returning(vec![
        vec!["eu".into(), 7.into()],
        vec!["us".into(), 9.into()],
    ]);
    let stmts = aware(&schema, Flavor::Mysql)
        .update(&mut update, &mut conn)
        .unwrap();

    assert_eq!(conn.log().len(), 1);
    assert_eq!(
        conn.log()[0].sql,
        "SELECT U0.`region`, U0.`number` FROM `app_customer` U0 INNER JOIN `app_customer` U1 ON (U0.`referred_by_region` = U1.`region` AND U0.`referred_by_number` = U1.`number`) WHERE U1.`name` = ?"
    );
    assert_eq!(
        stmts[0].sql,
        "UPDATE `app_customer` SET `name` = ? WHERE (`app_customer`.`region`, `app_customer`.`number`) IN ((?, ?), (?, ?))"
    );
    assert_eq!(
        stmts[0].params,
        vec![Value::from("Zed"), "eu".into(), 7.into(), "us".into(), 9.into()]
    );
}

#[test]
fn composite_pk_subselect() {
    let schema = schema();
    let mut update = customer_update(&schema);

    let mut conn = MockConnection::new(Capability::POSTGRESQL);
    let stmts = aware(&schema, Flavor::Postgresql)
        .update(&mut update, &mut conn)
        .unwrap();

    assert!(conn.log().is_empty());
    assert_eq!(
        stmts[0].sql,
        r#"UPDATE "app_customer" SET "name" = $1 WHERE ("app_customer"."region", "app_customer"."number") IN (SELECT U0."region", U0."number" FROM "app_customer" U0 INNER JOIN "app_customer" U1 ON (U0."referred_by_region" = U1."region" AND U0."referred_by_number" = U1."number") WHERE U1."name" = $2)"#
    );
}

#[test]
fn malformed_pk_row_is_an_arity_error() {
    let schema = schema();
    let mut update = customer_update(&schema);

    let mut conn = MockConnection::new(Capability::MYSQL).returning(vec![vec!["eu".into()]]);
    let err = aware(&schema, Flavor::Mysql)
        .update(&mut update, &mut conn)
        .unwrap_err();

    assert!(err.is_arity());
}

#[test]
fn inherited_fields_update_parent_table() {
    let schema = schema();
    let mut update = UpdateQuery::new(RESTAURANT);
    update
        .add_update_values(
            &schema,
            [("name", Value::from("Chez")), ("serves_pizza", true.into())],
        )
        .unwrap();
    update
        .query
        .add_filter(&schema, "serves_pizza", Lookup::Exact(false.into()))
        .unwrap();

    let mut conn = MockConnection::new(Capability::POSTGRESQL)
        .returning(vec![vec![3.into()], vec![4.into()]]);
    let stmts = aware(&schema, Flavor::Postgresql)
        .update(&mut update, &mut conn)
        .unwrap();

    assert_eq!(
        conn.log(),
        [Executed {
            query: true,
            sql: r#"SELECT U0."place_ptr_id" FROM "app_restaurant" U0 WHERE U0."serves_pizza" = $1"#
                .to_string(),
            params: vec![false.into()],
        }]
    );

    let sql: Vec<&str> = stmts.iter().map(|stmt| stmt.sql.as_str()).collect();
    assert_eq!(
        sql,
        [
            r#"UPDATE "app_restaurant" SET "serves_pizza" = $1 WHERE "app_restaurant"."place_ptr_id" IN ($2, $3)"#,
            r#"UPDATE "app_place" SET "name" = $1 WHERE "app_place"."id" IN ($2, $3)"#,
        ]
    );
    assert_eq!(stmts[0].params, vec![Value::from(true), 3.into(), 4.into()]);
    assert_eq!(stmts[1].params, vec![Value::from("Chez"), 3.into(), 4.into()]);
}

#[test]
fn single_column_compiler_rejects_composite_pk() {
    let schema = schema();
    let mut update = customer_update(&schema);

    let mut conn = MockConnection::new(Capability::POSTGRESQL);
    let err = single(&schema, Flavor::Postgresql)
        .update(&mut update, &mut conn)
        .unwrap_err();

    assert!(err.is_unsupported_operation());
    assert!(conn.log().is_empty());
}

#[derive(Debug)]
struct Unreachable;

impl Connection for Unreachable {
    fn capability(&self) -> &Capability {
        &Capability::MYSQL
    }

    fn query(&mut self, _sql: &str, _params: &[Value]) -> Result<Vec<Vec<Value>>> {
        Err(err!("connection reset"))
    }

    fn execute(&mut self, _sql: &str, _params: &[Value]) -> Result<u64> {
        Err(err!("connection reset"))
    }
}

#[test]
fn materialization_failure_names_the_table() {
    let schema = schema();
    let mut update = order_update(&schema);

    let err = aware(&schema, Flavor::Mysql)
        .update(&mut update, &mut Unreachable)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "materializing primary keys of `app_order`: connection reset"
    );
}
