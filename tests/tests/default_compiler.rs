use compositekey::{
    stmt::{InsertQuery, Lookup, Query, Record, UpdateQuery, Value},
    Flavor,
};
use pretty_assertions::assert_eq;
use tests::*;

#[test]
fn single_column_schema_compiles_identically() {
    let schema = schema();

    let compile = |serializer: compositekey::Serializer<'_>| {
        let mut query = Query::new(BOOK);
        query
            .add_filter(&schema, "author__name", Lookup::Exact("Le Guin".into()))
            .unwrap();
        serializer.select(&mut query).unwrap()
    };

    let stmt = compile(single(&schema, Flavor::Postgresql));
    assert_eq!(
        stmt.sql,
        r#"SELECT "app_book"."id", "app_book"."author_id", "app_book"."title" FROM "app_book" INNER JOIN "app_author" ON ("app_book"."author_id" = "app_author"."id") WHERE "app_author"."name" = $1"#
    );
    assert_eq!(stmt, compile(aware(&schema, Flavor::Postgresql)));
}

#[test]
fn single_column_insert_matches() {
    let schema = schema();
    let mut insert = InsertQuery::new(BOOK);
    insert.insert_values(
        fields(&schema, BOOK, &["author", "title"]),
        vec![Record::new().set("author", 1).set("title", "Dune")],
        false,
    );

    let stmts = single(&schema, Flavor::Sqlite).insert(&insert).unwrap();
    assert_eq!(
        stmts[0].sql,
        r#"INSERT INTO "app_book" ("author_id", "title") SELECT ?1 AS "author_id", ?2 AS "title""#
    );
    assert_eq!(stmts, aware(&schema, Flavor::Sqlite).insert(&insert).unwrap());
}

#[test]
fn composite_columns_are_rejected() {
    let schema = schema();

    let mut query = Query::new(ORDER);
    let err = single(&schema, Flavor::Postgresql)
        .select(&mut query)
        .unwrap_err();
    assert!(err.is_unsupported_operation(), "{err}");

    let mut insert = InsertQuery::new(ORDER);
    insert.insert_values(
        fields(&schema, ORDER, &["id", "customer"]),
        vec![Record::new().set("id", 1).set("customer", key("eu", 7))],
        false,
    );
    let err = single(&schema, Flavor::Postgresql)
        .insert(&insert)
        .unwrap_err();
    assert!(err.is_unsupported_operation(), "{err}");
}

#[test]
fn composite_join_is_rejected() {
    let schema = schema();
    let mut query = Query::new(ORDER);
    query.add_fields(&schema, &["id"]).unwrap();
    query
        .add_filter(&schema, "customer__name", Lookup::Exact("Ann".into()))
        .unwrap();

    let err = single(&schema, Flavor::Postgresql)
        .select(&mut query)
        .unwrap_err();
    assert!(err.is_unsupported_operation(), "{err}");
}

#[test]
fn composite_update_is_rejected() {
    let schema = schema();
    let mut update = UpdateQuery::new(CUSTOMER);
    update
        .add_update_values(&schema, [("name", Value::from("Zed"))])
        .unwrap();

    let mut conn = MockConnection::new(compositekey::Capability::POSTGRESQL);
    let err = single(&schema, Flavor::Postgresql)
        .update(&mut update, &mut conn)
        .unwrap_err();
    assert!(err.is_unsupported_operation(), "{err}");
}
