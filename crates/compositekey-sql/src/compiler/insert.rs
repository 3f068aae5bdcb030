use super::StatementCompiler;
use crate::serializer::{CompiledStatement, Comma, Context, Formatter, ToSql};

use compositekey_core::{
    schema::Field,
    stmt::{InsertQuery, Value},
    Error, Result,
};

/// One slot of a VALUES row.
#[derive(Debug, Clone)]
enum Token<'a> {
    Param {
        value: Value,
        template: Option<&'a str>,
    },
    Literal(&'static str),
}

impl ToSql for &Token<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Token::Param { value, template } => f.param_with_template(*template, value),
            Token::Literal(token) => f.write_str(token),
        }
    }
}

struct Row<'a, 'b>(&'b [Token<'a>]);

impl ToSql for Row<'_, '_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "(" Comma(self.0) ")");
    }
}

pub(super) fn insert_sql<C: StatementCompiler + ?Sized>(
    compiler: &C,
    cx: &Context<'_>,
    insert: &InsertQuery,
) -> Result<Vec<CompiledStatement>> {
    let schema = cx.schema;
    let model = schema.model(insert.query.model);
    let pk = model.pk();

    let has_fields = !insert.fields.is_empty();
    let fields: Vec<&Field> = if has_fields {
        insert.fields.iter().map(|id| schema.field(*id)).collect()
    } else {
        vec![pk]
    };

    let mut columns = vec![];
    for field in &fields {
        columns.extend(compiler.columns(&field.column)?.iter().map(|column| cx.quote_name(column)));
    }

    let rows: Vec<Vec<Token<'_>>> = if has_fields {
        insert
            .objs
            .iter()
            .map(|obj| -> Result<Vec<Token>> {
                let mut row = vec![];
                for field in &fields {
                    let value = if insert.raw {
                        obj.get(&field.name).cloned().unwrap_or_default()
                    } else {
                        field.pre_save(obj)
                    };

                    for value in field.db_prep_save(value)? {
                        row.push(Token::Param {
                            value,
                            template: field.placeholder.as_deref(),
                        });
                    }
                }
                Ok(row)
            })
            .collect::<Result<_>>()?
    } else {
        let token = Token::Literal(cx.flavor.pk_default_value());
        insert.objs.iter().map(|_| vec![token.clone(); columns.len()]).collect()
    };

    let can_bulk = fields.iter().all(|field| field.placeholder.is_none())
        && !insert.return_id
        && cx.capability.has_bulk_insert;

    let rows = cx.flavor.modify_insert_params(rows);

    let table = cx.quote_name(&model.db_table);
    let head = format!("INSERT INTO {table} ({})", columns.join(", "));

    let can_return_key =
        cx.capability.can_return_id_from_insert && cx.capability.can_return_columns_from_insert;

    if insert.return_id && pk.column.is_composite() && !can_return_key {
        return Err(Error::unsupported_operation(format!(
            "returning composite primary key {} from INSERT into {table}",
            pk.column
        )));
    }

    if insert.return_id && cx.capability.can_return_id_from_insert {
        let Some(first) = rows.first() else {
            return Ok(vec![]);
        };

        let returning: Vec<String> = compiler
            .columns(&pk.column)?
            .iter()
            .map(|column| format!("{table}.{}", cx.quote_name(column)))
            .collect();

        let stmt = CompiledStatement::build(cx, |f| {
            fmt!(f, &head " VALUES " Row(first) " RETURNING " Comma(&returning));
            Ok(())
        })?;
        return Ok(vec![stmt]);
    }

    if can_bulk {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let stmt = CompiledStatement::build(cx, |f| {
            fmt!(f, &head " ");
            bulk_insert(cx, &columns, &rows, f);
            Ok(())
        })?;
        return Ok(vec![stmt]);
    }

    rows.iter()
        .map(|row| {
            CompiledStatement::build(cx, |f| {
                fmt!(f, &head " VALUES " Row(row));
                Ok(())
            })
        })
        .collect()
}

/// All rows in one statement. SQLite gets a `UNION ALL` of selects, naming
/// the columns on the first one.
fn bulk_insert(cx: &Context<'_>, columns: &[String], rows: &[Vec<Token<'_>>], f: &mut Formatter<'_>) {
    if !cx.flavor.is_sqlite() {
        fmt!(f, "VALUES " Comma(rows.iter().map(|row| Row(row))));
        return;
    }

    for (i, row) in rows.iter().enumerate() {
        if i == 0 {
            fmt!(f, "SELECT ");
            for (j, (token, column)) in row.iter().zip(columns).enumerate() {
                let sep = if j == 0 { "" } else { ", " };
                fmt!(f, sep token " AS " column);
            }
        } else {
            fmt!(f, " UNION ALL SELECT " Comma(row));
        }
    }
}
