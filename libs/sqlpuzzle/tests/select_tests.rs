// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use sqlpuzzle::{
    Arg, Conditions, CustomSql, ExpressionBuilder, QueryError, RenderConfig, TableSource, args, kw,
    select, select_from,
};
use sqlpuzzle_env::MapEnvironment;

#[test_log::test]
fn select_with_limit_and_offset() {
    let mut query = select(["id", "name"]).unwrap();
    query
        .from_(["users"])
        .unwrap()
        .where_([("active", true)])
        .unwrap()
        .limit_offset(10, 20)
        .unwrap();

    insta::assert_snapshot!(
        query.to_sql().unwrap(),
        @"SELECT `id`, `name` FROM `users` WHERE `active` = 1 LIMIT 10 OFFSET 20"
    );
}

#[test_log::test]
fn inner_join_absorbs_outer_joins() {
    let mut query = select_from(["users"]).unwrap();
    query
        .left_join("posts")
        .unwrap()
        .on([("users.id", "posts.user_id")])
        .unwrap()
        .right_join("posts")
        .unwrap()
        .on([("posts.user_id", "users.id")])
        .unwrap()
        .join("posts")
        .unwrap()
        .on([("users.id", "posts.user_id")])
        .unwrap()
        .left_join("tags")
        .unwrap()
        .on([("tags.user_id", "users.id")])
        .unwrap();

    let expected = "SELECT * FROM `users` JOIN `posts` ON (`users`.`id` = `posts`.`user_id`) \
                    LEFT JOIN `tags` ON (`tags`.`user_id` = `users`.`id`)";
    assert_eq!(query.to_sql().unwrap(), expected);

    // Rendering is repeatable and minimizing in place doesn't change the output
    assert_eq!(query.to_sql().unwrap(), expected);
    query.minimize_joins();
    assert_eq!(query.tables().tables()[0].joins().len(), 2);
    assert_eq!(query.to_sql().unwrap(), expected);
}

#[test_log::test]
fn joins_with_different_conditions_are_kept() {
    let mut query = select_from(["users"]).unwrap();
    query
        .left_join("posts")
        .unwrap()
        .on([("users.id", "posts.user_id")])
        .unwrap()
        .join("posts")
        .unwrap()
        .on([("users.id", "posts.editor_id")])
        .unwrap();

    insta::assert_snapshot!(
        query.to_sql().unwrap(),
        @"SELECT * FROM `users` LEFT JOIN `posts` ON (`users`.`id` = `posts`.`user_id`) JOIN `posts` ON (`users`.`id` = `posts`.`editor_id`)"
    );
}

#[test_log::test]
fn join_without_on() {
    let mut query = select_from(["users"]).unwrap();
    query.left_join(("posts", "p")).unwrap();

    insta::assert_debug_snapshot!(query.to_sql().unwrap_err(), @r#"
    InvalidQuery(
        "You can't use join without on.",
    )
    "#);
}

#[test_log::test]
fn tables_are_unique_and_empty_arguments_skipped() {
    let mut query = select(args!["id", None::<&str>, ""]).unwrap();
    query
        .from_(args!["users", "users", Arg::map([("posts", "p")]), ""])
        .unwrap()
        .from_([kw("p", "posts")])
        .unwrap();

    let tables = query.tables().tables();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].source(), &TableSource::Name("users".to_string()));
    assert_eq!(tables[0].alias(), None);
    assert_eq!(tables[1].source(), &TableSource::Name("posts".to_string()));
    assert_eq!(tables[1].alias(), Some("p"));
    insta::assert_snapshot!(
        query.to_sql().unwrap(),
        @"SELECT `id` FROM `users`, `posts` AS `p`"
    );
}

#[test_log::test]
fn nested_conditions() {
    let mut query = select_from(["products"]).unwrap();
    query
        .where_(args![("price", "<=", 100.5), ("name", "like", "%chair%")])
        .unwrap()
        .where_group(
            Conditions::any(args![("category", vec!["office", "home"]), ("featured", true)])
                .unwrap(),
        )
        .where_([("tags", "not in", Vec::<i64>::new())])
        .unwrap()
        .order_by([("price", "ASC")])
        .unwrap();

    insta::assert_snapshot!(
        query.to_sql().unwrap(),
        @"SELECT * FROM `products` WHERE `price` <= 100.5 AND `name` LIKE '%chair%' AND (`category` IN ('office', 'home') OR `featured` = 1) AND TRUE ORDER BY `price` ASC"
    );
}

#[test_log::test]
fn render_with_config_from_environment() {
    let env = MapEnvironment::from([
        ("SQLPUZZLE_QUOTE_STYLE", "double"),
        ("SQLPUZZLE_BOOLEAN_KEYWORDS", "true"),
    ]);
    let config = RenderConfig::from_env(&env).unwrap();

    let mut query = select(args!["id", kw("label", CustomSql::new("UPPER(name)"))]).unwrap();
    query
        .from_([("users", "u")])
        .unwrap()
        .where_([("u.active", true)])
        .unwrap();

    insta::assert_snapshot!(
        query.to_sql_with(&config).unwrap(),
        @r#"SELECT "id", UPPER(name) AS "label" FROM "users" AS "u" WHERE "u"."active" = TRUE"#
    );
}

#[test_log::test]
fn invalid_configuration() {
    let env = MapEnvironment::from([("SQLPUZZLE_QUOTE_STYLE", "brackets")]);
    let error: QueryError = RenderConfig::from_env(&env).unwrap_err().into();
    assert!(matches!(error, QueryError::Config(_)));
}

#[test_log::test]
fn invalid_arguments() {
    let mut query = select_from(["users"]).unwrap();

    assert!(matches!(
        query.where_([("age", "between", 18)]),
        Err(QueryError::InvalidArgument(_))
    ));
    assert!(matches!(
        query.limit(-5),
        Err(QueryError::InvalidArgument(_))
    ));
    assert!(matches!(
        query.from_(args![("users", "u", "x")]),
        Err(QueryError::InvalidArgument(_))
    ));
    assert_eq!(query.to_sql().unwrap(), "SELECT * FROM `users`");
}
